//! Item definitions and placeable item instances

use crate::equipment::EquipmentSlot;
use crate::geometry::{GridPoint, GridRect, GridSize};
use crate::shape::Shape;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identity of an item instance
///
/// Containers track items by id; two items with equal shape and position
/// are still distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// Thread-safe item id generator
#[derive(Debug, Default)]
pub struct ItemIdGenerator {
    next: AtomicU64,
}

impl ItemIdGenerator {
    /// Create a new generator starting at zero
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }

    /// Generate the next unique id
    pub fn next(&self) -> ItemId {
        ItemId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// Item type tag used by container admission filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    /// Weapons (swords, guns, etc.)
    Weapon,
    /// Armor pieces
    Armor,
    /// Consumables (potions, food, etc.)
    Consumable,
    /// Materials for crafting
    Material,
    /// Quest items
    Quest,
    /// Key items
    Key,
    /// Misc items
    Misc,
}

impl ItemCategory {
    /// Whether items of this category may leave into the world by default
    pub fn droppable_by_default(&self) -> bool {
        !matches!(self, Self::Quest | Self::Key)
    }
}

impl Default for ItemCategory {
    fn default() -> Self {
        Self::Misc
    }
}

/// Item rarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemRarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Default for ItemRarity {
    fn default() -> Self {
        Self::Common
    }
}

/// Kind-specific item payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemKind {
    Weapon { damage: f32 },
    Armor { slot: EquipmentSlot, defense: f32 },
    Consumable { charges: u32 },
    Material { quantity: u32 },
    Quest { quest_id: String },
    Key,
    Misc,
}

impl ItemKind {
    /// Type tag for this payload
    pub fn category(&self) -> ItemCategory {
        match self {
            Self::Weapon { .. } => ItemCategory::Weapon,
            Self::Armor { .. } => ItemCategory::Armor,
            Self::Consumable { .. } => ItemCategory::Consumable,
            Self::Material { .. } => ItemCategory::Material,
            Self::Quest { .. } => ItemCategory::Quest,
            Self::Key => ItemCategory::Key,
            Self::Misc => ItemCategory::Misc,
        }
    }
}

impl Default for ItemKind {
    fn default() -> Self {
        Self::Misc
    }
}

/// Template every instance of an item is produced from
#[derive(Debug, Clone)]
pub struct ItemDefinition {
    /// Unique identifier
    pub id: Arc<str>,
    /// Display name
    pub name: String,
    /// Payload given to each instance
    pub kind: ItemKind,
    /// Rarity
    pub rarity: ItemRarity,
    /// Footprint shared by every instance
    pub shape: Arc<Shape>,
    /// Whether instances can be dropped into the world
    pub droppable: bool,
}

impl ItemDefinition {
    /// Create a new misc item definition
    pub fn new(id: impl Into<Arc<str>>, name: impl Into<String>, shape: Shape) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: ItemKind::Misc,
            rarity: ItemRarity::default(),
            shape: Arc::new(shape),
            droppable: true,
        }
    }

    /// Set the payload
    ///
    /// Quest and key items become non-droppable.
    pub fn with_kind(mut self, kind: ItemKind) -> Self {
        self.droppable = self.droppable && kind.category().droppable_by_default();
        self.kind = kind;
        self
    }

    /// Set rarity
    pub fn with_rarity(mut self, rarity: ItemRarity) -> Self {
        self.rarity = rarity;
        self
    }

    /// Make non-droppable
    pub fn non_droppable(mut self) -> Self {
        self.droppable = false;
        self
    }

    /// Type tag of the payload
    pub fn category(&self) -> ItemCategory {
        self.kind.category()
    }

    /// Produce a new, unplaced instance
    pub fn instantiate(&self, ids: &ItemIdGenerator) -> Item {
        Item {
            id: ids.next(),
            definition: Arc::clone(&self.id),
            shape: Arc::clone(&self.shape),
            position: GridPoint::ZERO,
            can_drop: self.droppable,
            rarity: self.rarity,
            kind: self.kind.clone(),
        }
    }
}

/// A placeable item instance
///
/// Cloning is cheap: the shape is shared. A container keeps its own copy
/// of every item it holds, keyed by [`ItemId`].
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    id: ItemId,
    definition: Arc<str>,
    shape: Arc<Shape>,
    position: GridPoint,
    can_drop: bool,
    rarity: ItemRarity,
    kind: ItemKind,
}

impl Item {
    /// Create an item directly, without a definition
    pub fn new(id: ItemId, shape: impl Into<Arc<Shape>>, kind: ItemKind) -> Self {
        let can_drop = kind.category().droppable_by_default();
        Self {
            id,
            definition: Arc::from(""),
            shape: shape.into(),
            position: GridPoint::ZERO,
            can_drop,
            rarity: ItemRarity::default(),
            kind,
        }
    }

    /// Anchor the item at `position`
    ///
    /// Only meaningful before handing the item to a container; held items
    /// are positioned by the container.
    pub fn at(mut self, position: GridPoint) -> Self {
        self.position = position;
        self
    }

    /// Override the drop flag
    pub fn with_can_drop(mut self, can_drop: bool) -> Self {
        self.can_drop = can_drop;
        self
    }

    pub(crate) fn set_position(&mut self, position: GridPoint) {
        self.position = position;
    }

    #[inline]
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Id of the definition this item was produced from (empty for ad-hoc items)
    pub fn definition(&self) -> &str {
        &self.definition
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub fn position(&self) -> GridPoint {
        self.position
    }

    #[inline]
    pub fn size(&self) -> GridSize {
        self.shape.size()
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.shape.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.shape.height()
    }

    /// Top-left corner
    #[inline]
    pub fn min_point(&self) -> GridPoint {
        self.position
    }

    /// Exclusive bottom-right corner
    #[inline]
    pub fn max_point(&self) -> GridPoint {
        self.position.offset(self.size())
    }

    /// Bounding box at the current position
    #[inline]
    pub fn bounds(&self) -> GridRect {
        self.shape.bounds_at(self.position)
    }

    #[inline]
    pub fn can_drop(&self) -> bool {
        self.can_drop
    }

    pub fn rarity(&self) -> ItemRarity {
        self.rarity
    }

    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    pub fn category(&self) -> ItemCategory {
        self.kind.category()
    }

    /// Does the item cover grid cell `point`
    pub fn contains_world(&self, point: GridPoint) -> bool {
        self.shape.contains_local(point - self.position)
    }

    pub fn occupied_world_cells(&self) -> HashSet<GridPoint> {
        self.shape.occupied_world_cells(self.position)
    }

    /// Do the two items share an occupied cell at their current positions
    pub fn overlaps(&self, other: &Item) -> bool {
        self.shape
            .overlaps_at(self.position, &other.shape, other.position)
    }
}

/// Do two items share an occupied cell
pub fn overlaps(a: &Item, b: &Item) -> bool {
    a.overlaps(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_instantiate() {
        let ids = ItemIdGenerator::new();
        let sword = ItemDefinition::new("iron_sword", "Iron Sword", Shape::rect(1, 3))
            .with_kind(ItemKind::Weapon { damage: 12.0 })
            .with_rarity(ItemRarity::Rare);

        let a = sword.instantiate(&ids);
        let b = sword.instantiate(&ids);

        assert_ne!(a.id(), b.id());
        assert_eq!(a.definition(), "iron_sword");
        assert_eq!(a.category(), ItemCategory::Weapon);
        assert_eq!(a.rarity(), ItemRarity::Rare);
        assert!(a.can_drop());
        assert!(Arc::ptr_eq(&a.shape, &b.shape));
    }

    #[test]
    fn test_quest_items_not_droppable() {
        let ids = ItemIdGenerator::new();
        let letter = ItemDefinition::new("letter", "Sealed Letter", Shape::rect(1, 1)).with_kind(
            ItemKind::Quest {
                quest_id: "courier".into(),
            },
        );
        assert!(!letter.droppable);
        assert!(!letter.instantiate(&ids).can_drop());

        let key = Item::new(ItemId(9), Shape::rect(1, 1), ItemKind::Key);
        assert!(!key.can_drop());
    }

    #[test]
    fn test_min_max_points() {
        let item = Item::new(ItemId(1), Shape::rect(2, 3), ItemKind::Misc).at(GridPoint::new(1, 1));
        assert_eq!(item.min_point(), GridPoint::new(1, 1));
        assert_eq!(item.max_point(), GridPoint::new(3, 4));
        assert!(item.contains_world(GridPoint::new(2, 3)));
        assert!(!item.contains_world(GridPoint::new(3, 3)));
    }

    #[test]
    fn test_overlaps_uses_mask() {
        let l = Arc::new(Shape::parse(&["#.", "##"]).unwrap());
        let a = Item::new(ItemId(1), Arc::clone(&l), ItemKind::Misc);
        let b = Item::new(ItemId(2), Shape::rect(1, 1), ItemKind::Misc).at(GridPoint::new(1, 0));
        let c = Item::new(ItemId(3), Shape::rect(1, 1), ItemKind::Misc).at(GridPoint::new(0, 1));

        assert!(!overlaps(&a, &b));
        assert!(overlaps(&a, &c));
    }
}
