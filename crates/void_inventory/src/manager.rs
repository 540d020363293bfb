//! Grid allocator
//!
//! [`InventoryManager`] owns the authoritative item cache of one container,
//! the container rectangle, and every placement decision. Policy questions
//! (capacity, admission, whether an item may leave) are delegated to an
//! [`ItemProvider`].
//!
//! Every public operation runs to completion before returning. A mutating
//! operation either fully succeeds (provider updated, cache rebuilt, event
//! fired) or fully fails (nothing changed, failure event fired). Hosts that
//! share a manager across threads must serialize access themselves, e.g. with
//! a `parking_lot::Mutex<InventoryManager>`.

use crate::config::InventoryConfig;
use crate::error::Rejection;
use crate::events::{EventKind, InventoryEvent, Listeners, SubscriberId};
use crate::geometry::{GridPoint, GridRect, GridSize};
use crate::item::{Item, ItemId};
use crate::provider::{ContainerProvider, ItemProvider, RenderMode};

/// Spatial allocator for one inventory container
#[derive(Debug)]
pub struct InventoryManager<P: ItemProvider = ContainerProvider> {
    /// None once disposed
    provider: Option<P>,
    config: InventoryConfig,
    rect: GridRect,
    /// Mirror of `provider.enumerate()` as of the last rebuild
    items: Vec<Item>,
    listeners: Listeners,
}

impl<P: ItemProvider> InventoryManager<P> {
    /// Create a manager over `provider` with a `width` × `height` grid
    pub fn new(provider: P, width: u32, height: u32) -> Self {
        Self::from_config(provider, &InventoryConfig::default().with_size(width, height))
    }

    /// Create a manager from a configuration
    pub fn from_config(provider: P, config: &InventoryConfig) -> Self {
        let mut manager = Self {
            provider: Some(provider),
            config: config.clone(),
            rect: GridRect::from_size(config.size()),
            items: Vec::new(),
            listeners: Listeners::new(),
        };
        manager.rebuild(true);
        manager
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.config.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.config.height
    }

    #[inline]
    pub fn size(&self) -> GridSize {
        self.config.size()
    }

    /// Container rectangle, anchored at the origin
    #[inline]
    pub fn rect(&self) -> GridRect {
        self.rect
    }

    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    /// Layout reported by the provider (Grid once disposed)
    pub fn mode(&self) -> RenderMode {
        self.provider
            .as_ref()
            .map(|provider| provider.render_mode())
            .unwrap_or_default()
    }

    pub fn provider(&self) -> Option<&P> {
        self.provider.as_ref()
    }

    /// Mutable provider access for out-of-band changes
    ///
    /// Call [`rebuild`](Self::rebuild) afterwards.
    pub fn provider_mut(&mut self) -> Option<&mut P> {
        self.provider.as_mut()
    }

    pub fn is_disposed(&self) -> bool {
        self.provider.is_none()
    }

    /// Items held, in provider order
    pub fn all_items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Held copy of an item
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.get(id).is_some()
    }

    /// Listen to every event
    ///
    /// Listeners must not assume the manager is reachable from inside the
    /// callback; they only see the event.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriberId
    where
        F: Fn(&InventoryEvent) + Send + Sync + 'static,
    {
        self.listeners.subscribe(listener)
    }

    /// Listen to one kind of event
    pub fn subscribe_to<F>(&mut self, kind: EventKind, listener: F) -> SubscriberId
    where
        F: Fn(&InventoryEvent) + Send + Sync + 'static,
    {
        self.listeners.subscribe_to(kind, listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Drop every listener, e.g. when the panel showing this container closes
    pub fn unsubscribe_all(&mut self) {
        self.listeners.clear();
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    // ---- queries ----

    /// Item covering grid cell `point`
    pub fn get_at_point(&self, point: GridPoint) -> Option<&Item> {
        self.items.iter().find(|item| item.contains_world(point))
    }

    /// Items covering at least one cell of the region
    pub fn get_at_region(&self, point: GridPoint, size: GridSize) -> Vec<&Item> {
        let region = GridRect::new(point, size);
        self.items
            .iter()
            .filter(|item| {
                item.bounds()
                    .intersection(&region)
                    .is_some_and(|shared| shared.cells().any(|cell| item.contains_world(cell)))
            })
            .collect()
    }

    /// Number of grid cells no item covers
    pub fn free_cells(&self) -> usize {
        self.rect
            .cells()
            .filter(|&cell| self.get_at_point(cell).is_none())
            .count()
    }

    /// Whether nothing more can be placed
    ///
    /// True if the provider says so; in grid mode also true when every cell
    /// is covered, whatever the provider's own count says.
    pub fn is_full(&self) -> bool {
        let Some(provider) = &self.provider else {
            return false;
        };
        if provider.is_full() {
            return true;
        }
        match self.mode() {
            RenderMode::Single => false,
            RenderMode::Grid => self.rect.cells().all(|cell| self.get_at_point(cell).is_some()),
        }
    }

    // ---- placement ----

    /// First anchor where `item` can be placed
    ///
    /// Candidates are scanned with x as the outer loop and y as the inner
    /// loop, so the lowest x wins, then the lowest y. Single-mode containers
    /// have no search; the centered anchor is returned if the provider admits
    /// the item.
    pub fn find_first_fit(&self, item: &Item) -> Option<GridPoint> {
        self.check_admission(item).ok()?;
        if !item.size().fits_within(self.size()) {
            return None;
        }
        if self.mode() == RenderMode::Single {
            return Some(self.rect.center_anchor(item.size()));
        }

        let max_x = (self.width() - item.width()) as i32;
        let max_y = (self.height() - item.height()) as i32;
        for x in 0..=max_x {
            for y in 0..=max_y {
                let candidate = GridPoint::new(x, y);
                if self.check_geometry(item, candidate).is_ok() {
                    return Some(candidate);
                }
            }
        }
        None
    }

    /// Whether `item` could sit at `point` given the current contents
    pub fn can_place_at(&self, item: &Item, point: GridPoint) -> bool {
        self.check_place_at(item, point).is_ok()
    }

    /// Admission plus containment and, in grid mode, overlap at `point`
    ///
    /// The check works on the hypothetical footprint at `point`; the item
    /// itself is never moved. Single-mode containers ignore `point` and only
    /// require the item to fit.
    pub fn check_place_at(&self, item: &Item, point: GridPoint) -> Result<(), Rejection> {
        self.check_admission(item)?;
        match self.mode() {
            RenderMode::Single if item.size().fits_within(self.size()) => Ok(()),
            RenderMode::Single => Err(Rejection::TooLarge),
            RenderMode::Grid => self.check_geometry(item, point),
        }
    }

    pub fn can_add(&self, item: &Item) -> bool {
        self.check_add(item).is_ok()
    }

    /// Anchor `try_add` would use, or why it would fail
    pub fn check_add(&self, item: &Item) -> Result<GridPoint, Rejection> {
        self.check_not_held(item)?;
        self.check_admission(item)?;
        if !item.size().fits_within(self.size()) {
            return Err(Rejection::TooLarge);
        }
        self.find_first_fit(item).ok_or(Rejection::NoFit)
    }

    pub fn can_add_at(&self, item: &Item, point: GridPoint) -> bool {
        self.check_add_at(item, point).is_ok()
    }

    pub fn check_add_at(&self, item: &Item, point: GridPoint) -> Result<(), Rejection> {
        self.check_not_held(item)?;
        self.check_place_at(item, point)
    }

    /// Place `item` at the first fitting anchor
    pub fn try_add(&mut self, item: &Item) -> bool {
        match self.check_add(item) {
            Ok(point) => self.try_add_at(item, point),
            Err(reason) => {
                self.notify_rejected(InventoryEvent::ItemAddFailed {
                    item: item.clone(),
                    reason,
                });
                false
            }
        }
    }

    /// Place `item` at `point`
    ///
    /// In single mode `point` is ignored and the item is centered.
    pub fn try_add_at(&mut self, item: &Item, point: GridPoint) -> bool {
        if let Err(reason) = self.check_add_at(item, point) {
            self.notify_rejected(InventoryEvent::ItemAddFailed {
                item: item.clone(),
                reason,
            });
            return false;
        }

        let position = match self.mode() {
            RenderMode::Single => self.rect.center_anchor(item.size()),
            RenderMode::Grid => point,
        };
        let mut placed = item.clone();
        placed.set_position(position);

        let admitted = self
            .provider
            .as_mut()
            .is_some_and(|provider| provider.admit(placed.clone()));
        if !admitted {
            self.notify_rejected(InventoryEvent::ItemAddFailed {
                item: item.clone(),
                reason: Rejection::ProviderRefused,
            });
            return false;
        }

        self.rebuild(true);
        log::trace!("Added {} at {}", item.id(), position);
        let added = self.get(item.id()).cloned().unwrap_or(placed);
        self.listeners.emit(&InventoryEvent::ItemAdded { item: added });
        true
    }

    pub fn check_remove(&self, item: &Item) -> Result<Item, Rejection> {
        let provider = self.provider.as_ref().ok_or(Rejection::Disposed)?;
        let held = self.get(item.id()).ok_or(Rejection::NotHeld(item.id()))?;
        if !provider.can_release(held) {
            return Err(Rejection::ReleaseRefused);
        }
        Ok(held.clone())
    }

    /// Release `item` for a transfer to another container
    pub fn try_remove(&mut self, item: &Item) -> bool {
        let held = match self.check_remove(item) {
            Ok(held) => held,
            Err(reason) => {
                self.notify_rejected(InventoryEvent::ItemRemoveFailed {
                    item: item.clone(),
                    reason,
                });
                return false;
            }
        };

        let released = self
            .provider
            .as_mut()
            .is_some_and(|provider| provider.release(&held));
        if !released {
            self.notify_rejected(InventoryEvent::ItemRemoveFailed {
                item: held,
                reason: Rejection::ProviderRefused,
            });
            return false;
        }

        self.rebuild(true);
        log::trace!("Removed {}", held.id());
        self.listeners.emit(&InventoryEvent::ItemRemoved { item: held });
        true
    }

    pub fn check_drop(&self, item: &Item) -> Result<Item, Rejection> {
        let provider = self.provider.as_ref().ok_or(Rejection::Disposed)?;
        let held = self.get(item.id()).ok_or(Rejection::NotHeld(item.id()))?;
        if !held.can_drop() {
            return Err(Rejection::NotDroppable);
        }
        if !provider.can_discard(held) {
            return Err(Rejection::DiscardRefused);
        }
        Ok(held.clone())
    }

    /// Drop `item` out of the container into the world
    pub fn try_drop(&mut self, item: &Item) -> bool {
        let held = match self.check_drop(item) {
            Ok(held) => held,
            Err(reason) => {
                self.notify_rejected(InventoryEvent::ItemDropFailed {
                    item: item.clone(),
                    reason,
                });
                return false;
            }
        };

        let discarded = self
            .provider
            .as_mut()
            .is_some_and(|provider| provider.discard(&held));
        if !discarded {
            self.notify_rejected(InventoryEvent::ItemDropFailed {
                item: held,
                reason: Rejection::ProviderRefused,
            });
            return false;
        }

        self.rebuild(true);
        log::trace!("Dropped {}", held.id());
        self.listeners.emit(&InventoryEvent::ItemDropped { item: held });
        true
    }

    /// Move a held item to a new anchor in the same grid
    ///
    /// The item's current footprint does not block its own destination.
    /// Single-mode containers have nowhere to move to.
    pub fn move_item(&mut self, item: &Item, point: GridPoint) -> bool {
        let Some(held) = self.get(item.id()).cloned() else {
            log::debug!("Cannot move {}: not in this container", item.id());
            return false;
        };
        if self.mode() == RenderMode::Single {
            return false;
        }
        if let Err(reason) = self.check_geometry(&held, point) {
            log::debug!("Cannot move {} to {}: {}", held.id(), point, reason);
            return false;
        }

        let from = held.position();
        if from == point {
            return true;
        }
        let moved = self
            .provider
            .as_mut()
            .is_some_and(|provider| provider.reposition(held.id(), point));
        if !moved {
            return false;
        }

        self.rebuild(true);
        let item = self.get(held.id()).cloned().unwrap_or(held);
        self.listeners.emit(&InventoryEvent::ItemMoved { item, from });
        true
    }

    // ---- resize / rebuild ----

    /// Change the grid dimensions, dropping items that no longer fit
    ///
    /// Items the provider refuses to drop stay tracked even though they lie
    /// outside the new bounds. Single-mode containers re-center the items
    /// that still fit and evict the rest. `Resized` fires once, after all
    /// evictions.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.provider.is_none() {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.rect = GridRect::from_size(self.config.size());

        let snapshot = self.items.clone();
        match self.mode() {
            RenderMode::Single => {
                let size = self.size();
                let (fitting, oversized): (Vec<_>, Vec<_>) = snapshot
                    .iter()
                    .partition(|item| item.size().fits_within(size));
                for item in fitting {
                    let anchor = self.rect.center_anchor(item.size());
                    if let Some(provider) = self.provider.as_mut() {
                        provider.reposition(item.id(), anchor);
                    }
                }
                self.rebuild(true);
                for item in oversized {
                    self.evict(item);
                }
            }
            RenderMode::Grid => {
                let padding = self.config.effective_padding();
                for item in &snapshot {
                    if !self.rect.contains_padded(&item.bounds(), padding) {
                        self.evict(item);
                    }
                }
            }
        }

        log::debug!("Resized container to {}x{}", width, height);
        self.listeners.emit(&InventoryEvent::Resized {
            size: self.size(),
        });
    }

    /// Re-read the item cache from the provider
    ///
    /// `silent` suppresses the `Rebuilt` event; internal callers use it
    /// after mutations that fire their own event.
    pub fn rebuild(&mut self, silent: bool) {
        let previous = self.items.len();
        self.items = self
            .provider
            .as_ref()
            .map(|provider| provider.enumerate())
            .unwrap_or_default();

        if self.items.len() != previous {
            log::debug!("Rebuilt item cache: {} -> {} items", previous, self.items.len());
        }
        if !silent {
            self.listeners.emit(&InventoryEvent::Rebuilt);
        }
    }

    /// Release the provider and clear the cache
    ///
    /// Every later operation is a no-op returning `false` or nothing.
    pub fn dispose(&mut self) -> Option<P> {
        self.items.clear();
        self.provider.take()
    }

    // ---- internals ----

    /// Drop an item that no longer fits after a resize
    fn evict(&mut self, item: &Item) {
        if !self.try_drop(item) {
            log::warn!(
                "{} lies outside the {}x{} grid but could not be evicted",
                item.id(),
                self.width(),
                self.height()
            );
        }
    }

    fn check_not_held(&self, item: &Item) -> Result<(), Rejection> {
        if self.provider.is_none() {
            return Err(Rejection::Disposed);
        }
        if self.contains(item.id()) {
            return Err(Rejection::AlreadyHeld(item.id()));
        }
        Ok(())
    }

    fn check_admission(&self, item: &Item) -> Result<(), Rejection> {
        let provider = self.provider.as_ref().ok_or(Rejection::Disposed)?;
        if provider.is_full() {
            return Err(Rejection::ProviderFull);
        }
        if !provider.can_admit(item) {
            return Err(Rejection::NotAdmitted(item.category()));
        }
        Ok(())
    }

    /// Containment and overlap of `item` anchored at `point`
    fn check_geometry(&self, item: &Item, point: GridPoint) -> Result<(), Rejection> {
        let bounds = item.shape().bounds_at(point);
        if !self.rect.contains_padded(&bounds, self.config.effective_padding()) {
            return Err(Rejection::OutOfBounds);
        }
        for other in &self.items {
            if other.id() == item.id() {
                continue;
            }
            if item.shape().overlaps_at(point, other.shape(), other.position()) {
                return Err(Rejection::Overlap { other: other.id() });
            }
        }
        Ok(())
    }

    fn notify_rejected(&self, event: InventoryEvent) {
        if let (Some(item), Some(reason)) = (event.item(), event.reason()) {
            log::debug!("{:?} for {}: {}", event.kind(), item.id(), reason);
        }
        self.listeners.emit(&event);
    }
}
