//! Moving items between containers
//!
//! A transfer is a release from the source followed by an add on the
//! destination, so each side checks its own rules. The destination is asked
//! first; if it still refuses once the item has left, the item goes back to
//! its original anchor in the source.

use crate::error::{Rejection, TransferError, TransferResult};
use crate::geometry::GridPoint;
use crate::item::Item;
use crate::manager::InventoryManager;
use crate::provider::ItemProvider;

/// Move `item` from `from` to the first free anchor in `to`
///
/// Returns the copy now held by `to`.
pub fn transfer<A, B>(
    from: &mut InventoryManager<A>,
    to: &mut InventoryManager<B>,
    item: &Item,
) -> TransferResult<Item>
where
    A: ItemProvider,
    B: ItemProvider,
{
    move_between(from, to, item, None)
}

/// Move `item` from `from` to `point` in `to`
pub fn transfer_to<A, B>(
    from: &mut InventoryManager<A>,
    to: &mut InventoryManager<B>,
    item: &Item,
    point: GridPoint,
) -> TransferResult<Item>
where
    A: ItemProvider,
    B: ItemProvider,
{
    move_between(from, to, item, Some(point))
}

fn move_between<A, B>(
    from: &mut InventoryManager<A>,
    to: &mut InventoryManager<B>,
    item: &Item,
    point: Option<GridPoint>,
) -> TransferResult<Item>
where
    A: ItemProvider,
    B: ItemProvider,
{
    let held = from.check_remove(item).map_err(TransferError::Source)?;
    match point {
        Some(point) => to.check_add_at(&held, point),
        None => to.check_add(&held).map(|_| ()),
    }
    .map_err(TransferError::Destination)?;

    if !from.try_remove(&held) {
        return Err(TransferError::Source(Rejection::ProviderRefused));
    }

    let added = match point {
        Some(point) => to.try_add_at(&held, point),
        None => to.try_add(&held),
    };
    if added {
        return Ok(to.get(held.id()).cloned().unwrap_or(held));
    }

    if from.try_add_at(&held, held.position()) {
        return Err(TransferError::Destination(Rejection::ProviderRefused));
    }
    log::warn!("{} refused by both containers during transfer", held.id());
    Err(TransferError::Orphaned(held))
}
