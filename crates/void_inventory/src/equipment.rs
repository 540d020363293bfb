//! Equipment system
//!
//! Each equipment slot is a single-mode [`InventoryManager`] backed by a
//! [`SlotProvider`], so equipping is an ordinary transfer between two
//! containers and both sides re-validate the item.

use crate::config::InventoryConfig;
use crate::error::{EquipError, EquipResult, Rejection};
use crate::geometry::{GridPoint, GridSize};
use crate::item::{Item, ItemId, ItemKind};
use crate::manager::InventoryManager;
use crate::provider::{ItemProvider, RenderMode};
use crate::transfer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Equipment slot types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentSlot {
    /// Head armor (helmet, hat)
    Head,
    /// Chest armor
    Chest,
    /// Leg armor
    Legs,
    /// Foot armor (boots)
    Feet,
    /// Hand armor (gloves)
    Hands,
    /// Main hand weapon
    MainHand,
    /// Off hand (shield, second weapon)
    OffHand,
    /// Accessory slot 1 (ring, amulet)
    Accessory1,
    /// Accessory slot 2
    Accessory2,
    /// Back slot (cape, backpack)
    Back,
    /// Belt slot (quick consumables)
    Belt,
}

impl EquipmentSlot {
    /// Get all standard slots
    pub fn all_standard() -> Vec<Self> {
        vec![
            Self::Head,
            Self::Chest,
            Self::Legs,
            Self::Feet,
            Self::Hands,
            Self::MainHand,
            Self::OffHand,
            Self::Accessory1,
            Self::Accessory2,
            Self::Back,
            Self::Belt,
        ]
    }

    /// Check if this is a weapon slot
    pub fn is_weapon(&self) -> bool {
        matches!(self, Self::MainHand | Self::OffHand)
    }

    /// Check if this is an accessory slot
    pub fn is_accessory(&self) -> bool {
        matches!(self, Self::Accessory1 | Self::Accessory2)
    }

    /// Footprint of the slot container, large enough for what the slot accepts
    pub fn default_size(&self) -> GridSize {
        match self {
            Self::Chest | Self::Legs | Self::Back => GridSize::new(2, 3),
            Self::Belt => GridSize::new(1, 2),
            _ if self.is_weapon() => GridSize::new(2, 4),
            _ if self.is_accessory() => GridSize::new(1, 1),
            _ => GridSize::new(2, 2),
        }
    }

    /// Whether an item of this kind may be equipped here
    pub fn accepts(&self, kind: &ItemKind) -> bool {
        match kind {
            ItemKind::Weapon { .. } => self.is_weapon(),
            ItemKind::Armor { slot, .. } => slot == self,
            ItemKind::Consumable { .. } => *self == Self::Belt,
            ItemKind::Material { .. } | ItemKind::Quest { .. } | ItemKind::Key | ItemKind::Misc => {
                false
            }
        }
    }
}

/// Provider for one equipment slot: holds at most one accepted item
#[derive(Debug, Clone)]
pub struct SlotProvider {
    slot: EquipmentSlot,
    item: Option<Item>,
}

impl SlotProvider {
    pub fn new(slot: EquipmentSlot) -> Self {
        Self { slot, item: None }
    }

    pub fn slot(&self) -> EquipmentSlot {
        self.slot
    }

    fn holds(&self, id: ItemId) -> bool {
        self.item.as_ref().is_some_and(|item| item.id() == id)
    }
}

impl ItemProvider for SlotProvider {
    fn item_count(&self) -> usize {
        usize::from(self.item.is_some())
    }

    fn get_item(&self, index: usize) -> Option<&Item> {
        if index == 0 {
            self.item.as_ref()
        } else {
            None
        }
    }

    fn is_full(&self) -> bool {
        self.item.is_some()
    }

    fn can_admit(&self, item: &Item) -> bool {
        self.item.is_none() && self.slot.accepts(item.kind())
    }

    fn admit(&mut self, item: Item) -> bool {
        if !self.can_admit(&item) {
            return false;
        }
        self.item = Some(item);
        true
    }

    fn can_release(&self, item: &Item) -> bool {
        self.holds(item.id())
    }

    fn release(&mut self, item: &Item) -> bool {
        if !self.can_release(item) {
            return false;
        }
        self.item = None;
        true
    }

    fn can_discard(&self, item: &Item) -> bool {
        self.holds(item.id()) && item.can_drop()
    }

    fn discard(&mut self, item: &Item) -> bool {
        if !self.can_discard(item) {
            return false;
        }
        self.item = None;
        true
    }

    fn reposition(&mut self, id: ItemId, position: GridPoint) -> bool {
        match self.item.as_mut() {
            Some(item) if item.id() == id => {
                item.set_position(position);
                true
            }
            _ => false,
        }
    }

    fn render_mode(&self) -> RenderMode {
        RenderMode::Single
    }
}

/// A set of equipment slots
#[derive(Debug)]
pub struct Equipment {
    slots: HashMap<EquipmentSlot, InventoryManager<SlotProvider>>,
    /// Available slots, in display order
    available_slots: Vec<EquipmentSlot>,
}

impl Equipment {
    /// Create equipment with the standard slots
    pub fn new() -> Self {
        Self::with_slots(EquipmentSlot::all_standard())
    }

    /// Create with custom slots, each sized by [`EquipmentSlot::default_size`]
    pub fn with_slots(slots: Vec<EquipmentSlot>) -> Self {
        let managers = slots
            .iter()
            .map(|&slot| {
                let size = slot.default_size();
                let config = InventoryConfig::single_slot().with_size(size.width, size.height);
                (slot, InventoryManager::from_config(SlotProvider::new(slot), &config))
            })
            .collect();
        Self {
            slots: managers,
            available_slots: slots,
        }
    }

    /// Check if slot is available
    pub fn has_slot(&self, slot: EquipmentSlot) -> bool {
        self.slots.contains_key(&slot)
    }

    /// Container behind a slot, for UI subscriptions
    pub fn slot(&self, slot: EquipmentSlot) -> Option<&InventoryManager<SlotProvider>> {
        self.slots.get(&slot)
    }

    pub fn slot_mut(&mut self, slot: EquipmentSlot) -> Option<&mut InventoryManager<SlotProvider>> {
        self.slots.get_mut(&slot)
    }

    /// Get equipped item in slot
    pub fn equipped(&self, slot: EquipmentSlot) -> Option<&Item> {
        self.slots.get(&slot)?.all_items().first()
    }

    /// Check if slot is occupied
    pub fn is_slot_occupied(&self, slot: EquipmentSlot) -> bool {
        self.equipped(slot).is_some()
    }

    /// Equipped items in slot order
    pub fn iter(&self) -> impl Iterator<Item = (EquipmentSlot, &Item)> {
        self.available_slots
            .iter()
            .filter_map(|&slot| self.equipped(slot).map(|item| (slot, item)))
    }

    /// Equip `item` from `source` into `slot`
    ///
    /// Whatever was in the slot moves into `source`. If any step is refused,
    /// every completed step is undone and both containers are left as they
    /// were. Returns the previously equipped item as now held by `source`.
    /// If undoing a step is itself refused, the stranded item is returned in
    /// [`EquipError::Orphaned`].
    pub fn equip<P: ItemProvider>(
        &mut self,
        source: &mut InventoryManager<P>,
        item: &Item,
        slot: EquipmentSlot,
    ) -> EquipResult<Option<Item>> {
        let target = self
            .slots
            .get_mut(&slot)
            .ok_or(EquipError::SlotNotAvailable(slot))?;
        if !slot.accepts(item.kind()) {
            return Err(EquipError::WrongSlot {
                slot,
                category: item.category(),
            });
        }

        let held = source.check_remove(item).map_err(EquipError::Source)?;
        let origin = held.position();
        if !source.try_remove(&held) {
            return Err(EquipError::Source(Rejection::ProviderRefused));
        }

        let previous = target.all_items().first().cloned();
        if let Some(prev) = &previous {
            if !target.try_remove(prev) {
                return Err(rolled_back(
                    restore(source, &held, origin),
                    EquipError::Slot(Rejection::ReleaseRefused),
                ));
            }
            let moved = source.check_add(prev).and_then(|_| {
                if source.try_add(prev) {
                    Ok(())
                } else {
                    Err(Rejection::ProviderRefused)
                }
            });
            if let Err(reason) = moved {
                // Both restores run even if the first is refused
                let stranded = restore(target, prev, prev.position())
                    .or(restore(source, &held, origin));
                return Err(rolled_back(stranded, EquipError::Source(reason)));
            }
        }

        let equipped = target.check_add(&held).and_then(|_| {
            if target.try_add(&held) {
                Ok(())
            } else {
                Err(Rejection::ProviderRefused)
            }
        });
        if let Err(reason) = equipped {
            let mut stranded = None;
            if let Some(prev) = &previous {
                if source.try_remove(prev) {
                    stranded = restore(target, prev, prev.position());
                } else {
                    log::warn!("{} stays in the source after a refused equip", prev.id());
                }
            }
            let stranded = stranded.or(restore(source, &held, origin));
            return Err(rolled_back(stranded, EquipError::Slot(reason)));
        }
        log::debug!("Equipped {} in {:?}", held.id(), slot);

        Ok(previous.and_then(|prev| source.get(prev.id()).cloned()))
    }

    /// Move the item in `slot` into `dest`
    pub fn unequip<P: ItemProvider>(
        &mut self,
        slot: EquipmentSlot,
        dest: &mut InventoryManager<P>,
    ) -> EquipResult<Item> {
        let target = self
            .slots
            .get_mut(&slot)
            .ok_or(EquipError::SlotNotAvailable(slot))?;
        let item = target
            .all_items()
            .first()
            .cloned()
            .ok_or(EquipError::SlotEmpty(slot))?;

        Ok(transfer::transfer(target, dest, &item)?)
    }
}

impl Default for Equipment {
    fn default() -> Self {
        Self::new()
    }
}

/// Put an item back where it came from during rollback
///
/// Returns the item if the container refused it.
fn restore<P: ItemProvider>(
    manager: &mut InventoryManager<P>,
    item: &Item,
    position: GridPoint,
) -> Option<Item> {
    if manager.try_add_at(item, position) {
        return None;
    }
    log::warn!("Failed to restore {} at {} during rollback", item.id(), position);
    Some(item.clone())
}

/// Error to report once a rollback finished
fn rolled_back(stranded: Option<Item>, err: EquipError) -> EquipError {
    stranded.map_or(err, EquipError::Orphaned)
}
