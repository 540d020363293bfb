//! Void Inventory - Grid Item Placement
//!
//! This crate packs arbitrarily shaped items into bounded 2D slot grids.
//! The same engine backs inventory panels, hotbars and equipment slots.
//!
//! # Features
//!
//! - Per-cell item shapes (L-shapes, hollow footprints)
//! - Deterministic first-fit placement search
//! - Overlap and containment guarantees for held items
//! - Resize with eviction of items that no longer fit
//! - Provider abstraction for capacity, type filters and drop rules
//! - Synchronous change notifications for UI layers
//! - Equipment slots and container-to-container transfers with rollback
//!
//! # Architecture
//!
//! ```text
//!   caller / UI ──► InventoryManager ──► ItemProvider (policy + backing store)
//!                        │
//!                        ├── placement search, overlap, resize
//!                        └── Listeners ──► InventoryEvent
//! ```
//!
//! # Example
//!
//! ```ignore
//! use void_inventory::prelude::*;
//!
//! let ids = ItemIdGenerator::new();
//! let sword = ItemDefinition::new("iron_sword", "Iron Sword", Shape::rect(1, 3))
//!     .with_kind(ItemKind::Weapon { damage: 12.0 });
//!
//! let mut bag = InventoryManager::new(ContainerProvider::new(), 8, 4);
//! bag.subscribe(|event| println!("{:?}", event.kind()));
//!
//! let item = sword.instantiate(&ids);
//! assert!(bag.try_add(&item));
//! ```

pub mod config;
pub mod equipment;
pub mod error;
pub mod events;
pub mod geometry;
pub mod item;
pub mod manager;
pub mod provider;
pub mod shape;
pub mod transfer;

pub mod prelude {
    pub use crate::config::InventoryConfig;
    pub use crate::equipment::{Equipment, EquipmentSlot, SlotProvider};
    pub use crate::error::{EquipError, Rejection, RejectionKind, ShapeError, TransferError};
    pub use crate::events::{EventKind, InventoryEvent, SubscriberId};
    pub use crate::geometry::{GridPoint, GridRect, GridSize};
    pub use crate::item::{
        overlaps, Item, ItemCategory, ItemDefinition, ItemId, ItemIdGenerator, ItemKind, ItemRarity,
    };
    pub use crate::manager::InventoryManager;
    pub use crate::provider::{ContainerProvider, ItemProvider, RenderMode};
    pub use crate::shape::Shape;
    pub use crate::transfer::{transfer, transfer_to};
}

pub use prelude::*;
