//! Property tests: held items never overlap and stay inside the grid

use proptest::prelude::*;
use void_inventory::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Add { shape: Shape },
    AddAt { shape: Shape, x: i32, y: i32 },
    Remove(usize),
    Drop(usize),
    Move { index: usize, x: i32, y: i32 },
    Resize { width: u32, height: u32 },
}

fn arb_shape() -> impl Strategy<Value = Shape> {
    (1u32..4, 1u32..4)
        .prop_flat_map(|(w, h)| (Just(w), Just(h), prop::collection::vec(any::<bool>(), (w * h) as usize)))
        .prop_map(|(w, h, mask)| Shape::new(w, h, mask).unwrap_or_else(|_| Shape::rect(w, h)))
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => arb_shape().prop_map(|shape| Op::Add { shape }),
        2 => (arb_shape(), -2i32..8, -2i32..8).prop_map(|(shape, x, y)| Op::AddAt { shape, x, y }),
        1 => (0usize..16).prop_map(Op::Remove),
        1 => (0usize..16).prop_map(Op::Drop),
        2 => (0usize..16, -2i32..8, -2i32..8).prop_map(|(index, x, y)| Op::Move { index, x, y }),
        1 => (1u32..8, 1u32..8).prop_map(|(width, height)| Op::Resize { width, height }),
    ]
}

fn held(grid: &InventoryManager, index: usize) -> Option<Item> {
    let items = grid.all_items();
    if items.is_empty() {
        return None;
    }
    Some(items[index % items.len()].clone())
}

fn apply(grid: &mut InventoryManager, ids: &ItemIdGenerator, op: Op) {
    match op {
        Op::Add { shape } => {
            grid.try_add(&Item::new(ids.next(), shape, ItemKind::Misc));
        }
        Op::AddAt { shape, x, y } => {
            grid.try_add_at(&Item::new(ids.next(), shape, ItemKind::Misc), GridPoint::new(x, y));
        }
        Op::Remove(index) => {
            if let Some(item) = held(grid, index) {
                grid.try_remove(&item);
            }
        }
        Op::Drop(index) => {
            if let Some(item) = held(grid, index) {
                grid.try_drop(&item);
            }
        }
        Op::Move { index, x, y } => {
            if let Some(item) = held(grid, index) {
                grid.move_item(&item, GridPoint::new(x, y));
            }
        }
        Op::Resize { width, height } => grid.resize(width, height),
    }
}

fn check_layout(grid: &InventoryManager) -> Result<(), TestCaseError> {
    let items = grid.all_items();
    for (i, a) in items.iter().enumerate() {
        prop_assert!(
            grid.rect().contains_padded(&a.bounds(), grid.config().bounds_padding),
            "{} at {} escapes {}",
            a.id(),
            a.position(),
            grid.rect()
        );
        for b in &items[i + 1..] {
            prop_assert!(!overlaps(a, b), "{} overlaps {}", a.id(), b.id());
        }
    }

    let covered: usize = items.iter().map(|item| item.shape().cell_count()).sum();
    prop_assert_eq!(covered + grid.free_cells(), grid.size().area());
    Ok(())
}

proptest! {
    #[test]
    fn layout_holds_under_random_operations(
        width in 1u32..8,
        height in 1u32..8,
        ops in prop::collection::vec(arb_op(), 1..40),
    ) {
        let ids = ItemIdGenerator::new();
        let mut grid = InventoryManager::new(ContainerProvider::new(), width, height);

        for op in ops {
            apply(&mut grid, &ids, op);
            check_layout(&grid)?;
        }
    }

    #[test]
    fn first_fit_is_lowest_x_then_y(
        width in 1u32..7,
        height in 1u32..7,
        fillers in prop::collection::vec(arb_shape(), 0..8),
        probe in arb_shape(),
    ) {
        let ids = ItemIdGenerator::new();
        let mut grid = InventoryManager::new(ContainerProvider::new(), width, height);
        for shape in fillers {
            grid.try_add(&Item::new(ids.next(), shape, ItemKind::Misc));
        }

        let item = Item::new(ids.next(), probe, ItemKind::Misc);
        let found = grid.find_first_fit(&item);

        let mut expected = None;
        'scan: for x in 0..width as i32 {
            for y in 0..height as i32 {
                let point = GridPoint::new(x, y);
                if grid.can_place_at(&item, point) {
                    expected = Some(point);
                    break 'scan;
                }
            }
        }
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn exact_size_item_lands_at_origin(width in 1u32..9, height in 1u32..9) {
        let grid = InventoryManager::new(ContainerProvider::new(), width, height);
        let slab = Item::new(ItemId(0), Shape::rect(width, height), ItemKind::Misc);
        prop_assert_eq!(grid.find_first_fit(&slab), Some(GridPoint::ZERO));
    }

    #[test]
    fn add_then_remove_is_identity(
        fillers in prop::collection::vec(arb_shape(), 0..6),
        extra in arb_shape(),
    ) {
        let ids = ItemIdGenerator::new();
        let mut grid = InventoryManager::new(ContainerProvider::new(), 6, 6);
        for shape in fillers {
            grid.try_add(&Item::new(ids.next(), shape, ItemKind::Misc));
        }
        let before = grid.all_items().to_vec();

        let item = Item::new(ids.next(), extra, ItemKind::Misc);
        if grid.try_add(&item) {
            prop_assert!(grid.try_remove(&item));
        }
        prop_assert_eq!(grid.all_items(), before.as_slice());
    }
}
