//! Inventory change notifications
//!
//! Listeners run synchronously, in subscription order, after a mutation
//! has fully completed. They receive a shared reference to the event and
//! no handle to the manager, so they cannot re-enter it.

use crate::error::Rejection;
use crate::geometry::{GridPoint, GridSize};
use crate::item::Item;
use std::fmt;

/// Inventory events
#[derive(Debug, Clone)]
pub enum InventoryEvent {
    /// Item placed in the container
    ItemAdded { item: Item },
    /// Item could not be placed
    ItemAddFailed { item: Item, reason: Rejection },
    /// Item released for a transfer elsewhere
    ItemRemoved { item: Item },
    /// Item could not be released
    ItemRemoveFailed { item: Item, reason: Rejection },
    /// Item dropped into the world
    ItemDropped { item: Item },
    /// Item could not be dropped
    ItemDropFailed { item: Item, reason: Rejection },
    /// Held item moved to a new anchor
    ItemMoved { item: Item, from: GridPoint },
    /// Container dimensions changed (after any evictions)
    Resized { size: GridSize },
    /// Item cache re-read from the provider
    Rebuilt,
}

impl InventoryEvent {
    /// Discriminant of this event
    pub fn kind(&self) -> EventKind {
        match self {
            Self::ItemAdded { .. } => EventKind::ItemAdded,
            Self::ItemAddFailed { .. } => EventKind::ItemAddFailed,
            Self::ItemRemoved { .. } => EventKind::ItemRemoved,
            Self::ItemRemoveFailed { .. } => EventKind::ItemRemoveFailed,
            Self::ItemDropped { .. } => EventKind::ItemDropped,
            Self::ItemDropFailed { .. } => EventKind::ItemDropFailed,
            Self::ItemMoved { .. } => EventKind::ItemMoved,
            Self::Resized { .. } => EventKind::Resized,
            Self::Rebuilt => EventKind::Rebuilt,
        }
    }

    /// Item the event is about, if any
    pub fn item(&self) -> Option<&Item> {
        match self {
            Self::ItemAdded { item }
            | Self::ItemAddFailed { item, .. }
            | Self::ItemRemoved { item }
            | Self::ItemRemoveFailed { item, .. }
            | Self::ItemDropped { item }
            | Self::ItemDropFailed { item, .. }
            | Self::ItemMoved { item, .. } => Some(item),
            Self::Resized { .. } | Self::Rebuilt => None,
        }
    }

    /// Rejection carried by a failure event
    pub fn reason(&self) -> Option<&Rejection> {
        match self {
            Self::ItemAddFailed { reason, .. }
            | Self::ItemRemoveFailed { reason, .. }
            | Self::ItemDropFailed { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Event discriminant, used to subscribe to a single kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ItemAdded,
    ItemAddFailed,
    ItemRemoved,
    ItemRemoveFailed,
    ItemDropped,
    ItemDropFailed,
    ItemMoved,
    Resized,
    Rebuilt,
}

/// Subscriber ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u64);

/// Listener function type
pub type Listener = Box<dyn Fn(&InventoryEvent) + Send + Sync>;

/// Ordered list of listeners
pub struct Listeners {
    entries: Vec<(SubscriberId, Option<EventKind>, Listener)>,
    next_subscriber_id: u64,
}

impl Listeners {
    /// Create an empty listener list
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_subscriber_id: 1,
        }
    }

    /// Subscribe to every event
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriberId
    where
        F: Fn(&InventoryEvent) + Send + Sync + 'static,
    {
        self.push(None, Box::new(listener))
    }

    /// Subscribe to one kind of event
    pub fn subscribe_to<F>(&mut self, kind: EventKind, listener: F) -> SubscriberId
    where
        F: Fn(&InventoryEvent) + Send + Sync + 'static,
    {
        self.push(Some(kind), Box::new(listener))
    }

    fn push(&mut self, filter: Option<EventKind>, listener: Listener) -> SubscriberId {
        let id = SubscriberId(self.next_subscriber_id);
        self.next_subscriber_id += 1;
        self.entries.push((id, filter, listener));
        id
    }

    /// Unsubscribe, returning whether the subscriber existed
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(sub_id, _, _)| *sub_id != id);
        self.entries.len() != before
    }

    /// Invoke every matching listener
    pub fn emit(&self, event: &InventoryEvent) {
        let kind = event.kind();
        for (_, filter, listener) in &self.entries {
            if filter.map_or(true, |f| f == kind) {
                listener(event);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every listener
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for Listeners {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}
