//! Provider contract and the default vector-backed provider
//!
//! A provider owns the backing store of a container and decides policy:
//! capacity, which item types are admitted, and whether items may leave.
//! It knows nothing about placement geometry; the
//! [`InventoryManager`](crate::manager::InventoryManager) does.

use crate::geometry::GridPoint;
use crate::item::{Item, ItemCategory, ItemId};
use serde::{Deserialize, Serialize};

/// How a container lays out its items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderMode {
    /// One logical slot, item rendered centered, no placement search
    Single,
    /// Items anchored anywhere on a width × height grid
    Grid,
}

impl Default for RenderMode {
    fn default() -> Self {
        Self::Grid
    }
}

/// Policy and backing store behind an inventory container
///
/// `can_*` queries must be pure. Mutations either succeed and update the
/// backing store or return `false` with no side effect.
pub trait ItemProvider: Send + Sync {
    /// Number of items in the backing store
    fn item_count(&self) -> usize;

    /// Item at `index` in backing-store order
    fn get_item(&self, index: usize) -> Option<&Item>;

    /// Whether the provider can take no more items
    fn is_full(&self) -> bool;

    /// Whether `item` would be admitted
    fn can_admit(&self, item: &Item) -> bool;

    /// Take ownership of `item`
    fn admit(&mut self, item: Item) -> bool;

    /// Whether `item` may leave to another container
    fn can_release(&self, item: &Item) -> bool;

    /// Give up `item` for a transfer elsewhere
    fn release(&mut self, item: &Item) -> bool;

    /// Whether `item` may be dropped into the world
    fn can_discard(&self, item: &Item) -> bool;

    /// Give up `item` into the world
    fn discard(&mut self, item: &Item) -> bool;

    /// Update the stored anchor of a held item
    fn reposition(&mut self, id: ItemId, position: GridPoint) -> bool;

    /// Layout of the container this provider backs
    fn render_mode(&self) -> RenderMode;

    /// Snapshot of every item in backing-store order
    fn enumerate(&self) -> Vec<Item> {
        (0..self.item_count())
            .filter_map(|index| self.get_item(index).cloned())
            .collect()
    }
}

impl<P: ItemProvider + ?Sized> ItemProvider for Box<P> {
    fn item_count(&self) -> usize {
        (**self).item_count()
    }

    fn get_item(&self, index: usize) -> Option<&Item> {
        (**self).get_item(index)
    }

    fn is_full(&self) -> bool {
        (**self).is_full()
    }

    fn can_admit(&self, item: &Item) -> bool {
        (**self).can_admit(item)
    }

    fn admit(&mut self, item: Item) -> bool {
        (**self).admit(item)
    }

    fn can_release(&self, item: &Item) -> bool {
        (**self).can_release(item)
    }

    fn release(&mut self, item: &Item) -> bool {
        (**self).release(item)
    }

    fn can_discard(&self, item: &Item) -> bool {
        (**self).can_discard(item)
    }

    fn discard(&mut self, item: &Item) -> bool {
        (**self).discard(item)
    }

    fn reposition(&mut self, id: ItemId, position: GridPoint) -> bool {
        (**self).reposition(id, position)
    }

    fn render_mode(&self) -> RenderMode {
        (**self).render_mode()
    }

    fn enumerate(&self) -> Vec<Item> {
        (**self).enumerate()
    }
}

/// Default provider backed by a `Vec<Item>`
///
/// Backs inventory panels and hotbars out of the box. Dropped items are kept
/// aside until the host takes them with [`take_discarded`](Self::take_discarded)
/// and spawns them in the world.
#[derive(Debug, Clone, Default)]
pub struct ContainerProvider {
    items: Vec<Item>,
    mode: RenderMode,
    /// Admitted categories (empty = any)
    allowed: Vec<ItemCategory>,
    /// Count-based capacity (None = unlimited)
    max_items: Option<usize>,
    /// Refuse every release and discard
    locked: bool,
    discarded: Vec<Item>,
}

impl ContainerProvider {
    /// Create an unrestricted grid provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a single-slot provider holding at most one item
    pub fn single() -> Self {
        Self {
            mode: RenderMode::Single,
            max_items: Some(1),
            ..Self::default()
        }
    }

    /// Restrict admission to the given categories
    pub fn with_allowed(mut self, categories: impl IntoIterator<Item = ItemCategory>) -> Self {
        self.allowed = categories.into_iter().collect();
        self
    }

    /// Set count-based capacity
    pub fn with_max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    /// Pre-populate the backing store
    pub fn with_items(mut self, items: impl IntoIterator<Item = Item>) -> Self {
        self.items = items.into_iter().collect();
        self
    }

    /// Lock or unlock the container
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Items in backing-store order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Replace the backing store out of band
    ///
    /// The owning manager must `rebuild(false)` afterwards.
    pub fn replace_items(&mut self, items: Vec<Item>) {
        self.items = items;
    }

    /// Take every item dropped into the world since the last call
    pub fn take_discarded(&mut self) -> Vec<Item> {
        std::mem::take(&mut self.discarded)
    }

    /// Check if a category passes the type filter
    pub fn admits_category(&self, category: ItemCategory) -> bool {
        self.allowed.is_empty() || self.allowed.contains(&category)
    }

    fn index_of(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    fn contains(&self, id: ItemId) -> bool {
        self.index_of(id).is_some()
    }
}

impl ItemProvider for ContainerProvider {
    fn item_count(&self) -> usize {
        self.items.len()
    }

    fn get_item(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    fn is_full(&self) -> bool {
        self.max_items.is_some_and(|max| self.items.len() >= max)
    }

    fn can_admit(&self, item: &Item) -> bool {
        !self.is_full() && self.admits_category(item.category()) && !self.contains(item.id())
    }

    fn admit(&mut self, item: Item) -> bool {
        if !self.can_admit(&item) {
            return false;
        }
        self.items.push(item);
        true
    }

    fn can_release(&self, item: &Item) -> bool {
        !self.locked && self.contains(item.id())
    }

    fn release(&mut self, item: &Item) -> bool {
        if !self.can_release(item) {
            return false;
        }
        match self.index_of(item.id()) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    fn can_discard(&self, item: &Item) -> bool {
        !self.locked && item.can_drop() && self.contains(item.id())
    }

    fn discard(&mut self, item: &Item) -> bool {
        if !self.can_discard(item) {
            return false;
        }
        match self.index_of(item.id()) {
            Some(index) => {
                let dropped = self.items.remove(index);
                self.discarded.push(dropped);
                true
            }
            None => false,
        }
    }

    fn reposition(&mut self, id: ItemId, position: GridPoint) -> bool {
        match self.items.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                item.set_position(position);
                true
            }
            None => false,
        }
    }

    fn render_mode(&self) -> RenderMode {
        self.mode
    }
}

/// Providers for exercising refusal paths in tests
#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Grid provider whose `admit` refuses `refusals` times although `can_admit` agrees
    #[derive(Debug, Default)]
    pub(crate) struct FlakyProvider {
        pub(crate) inner: ContainerProvider,
        pub(crate) refusals: usize,
    }

    impl FlakyProvider {
        pub(crate) fn new(items: impl IntoIterator<Item = Item>) -> Self {
            Self {
                inner: ContainerProvider::new().with_items(items),
                refusals: 0,
            }
        }
    }

    impl ItemProvider for FlakyProvider {
        fn item_count(&self) -> usize {
            self.inner.item_count()
        }

        fn get_item(&self, index: usize) -> Option<&Item> {
            self.inner.get_item(index)
        }

        fn is_full(&self) -> bool {
            self.inner.is_full()
        }

        fn can_admit(&self, item: &Item) -> bool {
            self.inner.can_admit(item)
        }

        fn admit(&mut self, item: Item) -> bool {
            if self.refusals > 0 {
                self.refusals -= 1;
                return false;
            }
            self.inner.admit(item)
        }

        fn can_release(&self, item: &Item) -> bool {
            self.inner.can_release(item)
        }

        fn release(&mut self, item: &Item) -> bool {
            self.inner.release(item)
        }

        fn can_discard(&self, item: &Item) -> bool {
            self.inner.can_discard(item)
        }

        fn discard(&mut self, item: &Item) -> bool {
            self.inner.discard(item)
        }

        fn reposition(&mut self, id: ItemId, position: GridPoint) -> bool {
            self.inner.reposition(id, position)
        }

        fn render_mode(&self) -> RenderMode {
            self.inner.render_mode()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemKind;
    use crate::shape::Shape;

    fn item(id: u64, kind: ItemKind) -> Item {
        Item::new(ItemId(id), Shape::rect(1, 1), kind)
    }

    #[test]
    fn test_admission_filters() {
        let mut provider = ContainerProvider::new()
            .with_allowed([ItemCategory::Consumable])
            .with_max_items(1);

        let potion = item(1, ItemKind::Consumable { charges: 3 });
        let sword = item(2, ItemKind::Weapon { damage: 5.0 });

        assert!(!provider.can_admit(&sword));
        assert!(!provider.admit(sword));
        assert!(provider.admit(potion.clone()));
        assert!(provider.is_full());
        // Same id twice is refused
        assert!(!provider.can_admit(&potion));
    }

    #[test]
    fn test_discard_collects_dropped_items() {
        let mut provider = ContainerProvider::new();
        let herb = item(1, ItemKind::Material { quantity: 4 });
        let key = item(2, ItemKind::Key);
        provider.admit(herb.clone());
        provider.admit(key.clone());

        assert!(!provider.discard(&key));
        assert!(provider.discard(&herb));
        assert_eq!(provider.item_count(), 1);

        let dropped = provider.take_discarded();
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].id(), herb.id());
        assert!(provider.take_discarded().is_empty());
    }

    #[test]
    fn test_locked_refuses_release() {
        let mut provider = ContainerProvider::new();
        let herb = item(1, ItemKind::Misc);
        provider.admit(herb.clone());
        provider.set_locked(true);

        assert!(!provider.release(&herb));
        assert!(!provider.discard(&herb));
        provider.set_locked(false);
        assert!(provider.release(&herb));
        assert_eq!(provider.item_count(), 0);
    }

    #[test]
    fn test_enumerate_preserves_order() {
        let provider = ContainerProvider::new().with_items([
            item(3, ItemKind::Misc),
            item(1, ItemKind::Misc),
            item(2, ItemKind::Misc),
        ]);
        let ids: Vec<_> = provider.enumerate().iter().map(|i| i.id().0).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_boxed_provider_delegates() {
        let mut boxed: Box<dyn ItemProvider> = Box::new(ContainerProvider::single());
        assert_eq!(boxed.render_mode(), RenderMode::Single);
        assert!(boxed.admit(item(1, ItemKind::Misc)));
        assert!(boxed.is_full());
        assert!(boxed.reposition(ItemId(1), GridPoint::new(2, 2)));
        assert_eq!(boxed.get_item(0).map(|i| i.position()), Some(GridPoint::new(2, 2)));
    }
}
