//! Error types for the inventory system

use crate::equipment::EquipmentSlot;
use crate::item::{Item, ItemCategory, ItemId};
use thiserror::Error;

/// Invalid item footprint, raised when a [`Shape`](crate::shape::Shape) is built
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// Width or height is zero
    #[error("Shape dimensions must be non-zero, got {width}x{height}")]
    ZeroSize { width: u32, height: u32 },

    /// No cell is occupied
    #[error("Shape mask has no occupied cells")]
    EmptyMask,

    /// Mask length does not match width * height
    #[error("Shape mask has {actual} cells, expected {expected}")]
    MaskLength { expected: usize, actual: usize },

    /// Occupied cell lies outside the shape bounds
    #[error("Shape cell ({x}, {y}) is outside {width}x{height}")]
    CellOutOfBounds { x: u32, y: u32, width: u32, height: u32 },

    /// ASCII rows have differing lengths
    #[error("Shape row {row} has length {len}, expected {expected}")]
    RaggedRow { row: usize, len: usize, expected: usize },

    /// Unknown character in an ASCII shape
    #[error("Invalid shape character '{0}'")]
    InvalidChar(char),
}

/// Broad family a [`Rejection`] belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionKind {
    /// Item does not fit the grid geometrically
    Geometric,
    /// The provider's policy refused the request
    Policy,
    /// Item is not in the state the operation requires
    State,
}

/// Why an inventory operation was refused
///
/// Rejections are expected outcomes, not faults: every mutating operation
/// returns `false` and fires a matching `*Failed` event carrying one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Item is larger than the container on at least one axis
    #[error("Item is larger than the container")]
    TooLarge,

    /// No anchor in the grid can hold the item
    #[error("No free space fits the item")]
    NoFit,

    /// Requested anchor puts the item outside the container
    #[error("Item would lie outside the container bounds")]
    OutOfBounds,

    /// Requested anchor collides with a held item
    #[error("Item would overlap {other}")]
    Overlap { other: ItemId },

    /// Provider reports it cannot take more items
    #[error("Container is full")]
    ProviderFull,

    /// Provider does not admit this item
    #[error("Container does not accept {0:?} items")]
    NotAdmitted(ItemCategory),

    /// Item is flagged as non-droppable
    #[error("Item cannot be dropped")]
    NotDroppable,

    /// Provider refuses to let the item leave
    #[error("Container refuses to release the item")]
    ReleaseRefused,

    /// Provider refuses to drop the item into the world
    #[error("Container refuses to drop the item")]
    DiscardRefused,

    /// Provider accepted the check but refused the mutation
    #[error("Container refused the change")]
    ProviderRefused,

    /// Item is already held by this container
    #[error("Item {0} is already in this container")]
    AlreadyHeld(ItemId),

    /// Item is not held by this container
    #[error("Item {0} is not in this container")]
    NotHeld(ItemId),

    /// Container has been disposed
    #[error("Container has been disposed")]
    Disposed,
}

impl Rejection {
    /// Which family of failure this is
    pub fn kind(&self) -> RejectionKind {
        match self {
            Self::TooLarge | Self::NoFit | Self::OutOfBounds | Self::Overlap { .. } => {
                RejectionKind::Geometric
            }
            Self::ProviderFull
            | Self::NotAdmitted(_)
            | Self::NotDroppable
            | Self::ReleaseRefused
            | Self::DiscardRefused
            | Self::ProviderRefused => RejectionKind::Policy,
            Self::AlreadyHeld(_) | Self::NotHeld(_) | Self::Disposed => RejectionKind::State,
        }
    }
}

/// Why a transfer between two containers failed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransferError {
    /// Source container would not give up the item; nothing changed
    #[error("Source container refused: {0}")]
    Source(Rejection),

    /// Destination container refused the item; it is back in the source
    #[error("Destination container refused: {0}")]
    Destination(Rejection),

    /// Both containers refused the item after it left the source
    ///
    /// The caller now owns the item and must place or spawn it.
    #[error("{} was refused by both containers", .0.id())]
    Orphaned(Item),
}

/// Result type for transfers
pub type TransferResult<T> = std::result::Result<T, TransferError>;

/// Equipment errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EquipError {
    /// Slot not available on this equipment set
    #[error("Equipment slot {0:?} is not available")]
    SlotNotAvailable(EquipmentSlot),

    /// Item kind cannot go in this slot
    #[error("{category:?} item cannot be equipped in {slot:?}")]
    WrongSlot { slot: EquipmentSlot, category: ItemCategory },

    /// Slot holds nothing
    #[error("Equipment slot {0:?} is empty")]
    SlotEmpty(EquipmentSlot),

    /// Source container refused to give up the item
    #[error("Source container refused: {0}")]
    Source(Rejection),

    /// Slot refused the item
    #[error("Equipment slot refused: {0}")]
    Slot(Rejection),

    /// Destination container refused the item
    #[error("Destination container refused the item")]
    Destination,

    /// Rollback failed; the item is in neither container
    #[error("{} was lost while rolling back", .0.id())]
    Orphaned(Item),
}

impl From<TransferError> for EquipError {
    fn from(err: TransferError) -> Self {
        match err {
            TransferError::Source(reason) => Self::Slot(reason),
            TransferError::Destination(_) => Self::Destination,
            TransferError::Orphaned(item) => Self::Orphaned(item),
        }
    }
}

/// Result type for equipment operations
pub type EquipResult<T> = std::result::Result<T, EquipError>;
