//! Order math: auction pricing and trigger predicates.

use crate::types::{Order, OrderType, Price, Slot};

/// True once the order's auction window has elapsed at `slot`.
pub fn is_auction_complete(order: &Order, slot: Slot) -> bool {
    if order.auction_duration == 0 {
        return true;
    }
    slot >= order.slot.saturating_add(order.auction_duration as u64)
}

/// Price of a market-class order at `slot`.
///
/// Walks linearly from `auction_start_price` to `auction_end_price` over
/// `auction_duration` slots, then stays at the end price. The curve is
/// the same for bids and asks; only the endpoints differ.
pub fn auction_price(order: &Order, slot: Slot) -> Price {
    if is_auction_complete(order, slot) {
        return order.auction_end_price;
    }

    let elapsed = slot.saturating_sub(order.slot);
    let start = order.auction_start_price as i128;
    let end = order.auction_end_price as i128;
    // Widened so (end - start) * elapsed cannot overflow; the result
    // stays inside the [start, end] segment.
    let delta = (end - start) * elapsed as i128 / order.auction_duration as i128;
    (start + delta) as Price
}

/// True for conditional orders, which park on a trigger list until
/// activated.
pub fn must_be_triggered(order: &Order) -> bool {
    matches!(
        order.order_type,
        OrderType::TriggerLimit | OrderType::TriggerMarket
    )
}

/// True once a conditional order has been activated.
pub fn is_triggered(order: &Order) -> bool {
    order.triggered
}
