//! Crossing resolution between the merged ask and bid streams.

use crate::types::{Price, Side};

use super::node::{BookNode, OrderNode};

/// Cap on crossings emitted per matching pass. Downstream packs one
/// chain transaction per pass.
pub const MAX_FILLS_PER_PASS: usize = 10;

/// Taker and maker queued for filling. A missing maker means the node
/// fills against the vAMM instead of a resting order.
#[derive(Clone, Copy, Debug)]
pub struct NodeToFill {
    pub node: OrderNode,
    pub maker_node: Option<OrderNode>,
}

/// Conditional order whose trigger threshold the oracle has crossed.
#[derive(Clone, Copy, Debug)]
pub struct NodeToTrigger {
    pub node: OrderNode,
}

/// Verdict on the currently-best (ask, bid) pair.
#[derive(Clone, Copy, Debug)]
pub(crate) enum CrossingVerdict {
    /// The books no longer cross; matching is done.
    NoCross,
    /// Step past the head of the given side without emitting.
    Advance(Side),
    /// Emit a fill and step past the taker.
    Fill {
        fill: NodeToFill,
        taker_side: Side,
    },
}

/// Resolve the best ask against the best bid.
///
/// `ask_price` and `bid_price` are the heads' live merge prices. Maker
/// assignment: a post-only side makes unconditionally; between two
/// takers the older order makes, and an exact placement-slot tie makes
/// the ask the maker. Two post-only orders cannot fill each other; the
/// newer one steps aside so the older keeps its place in the book.
pub(crate) fn find_crossing_orders(
    ask: BookNode<'_>,
    ask_price: Price,
    bid: BookNode<'_>,
    bid_price: Price,
) -> CrossingVerdict {
    if bid_price < ask_price {
        return CrossingVerdict::NoCross;
    }

    // A user order crossing the vAMM quote has no peer to match with;
    // the caller routes it to the vAMM separately.
    let (ask, bid) = match (ask.order_node(), bid.order_node()) {
        (None, _) => return CrossingVerdict::Advance(Side::Bid),
        (_, None) => return CrossingVerdict::Advance(Side::Ask),
        (Some(ask), Some(bid)) => (ask, bid),
    };

    let ask_order = ask.order();
    let bid_order = bid.order();

    match (ask_order.post_only, bid_order.post_only) {
        (true, true) => {
            if bid_order.slot > ask_order.slot {
                CrossingVerdict::Advance(Side::Bid)
            } else {
                CrossingVerdict::Advance(Side::Ask)
            }
        }
        (true, false) => CrossingVerdict::Fill {
            fill: NodeToFill {
                node: *bid,
                maker_node: Some(*ask),
            },
            taker_side: Side::Bid,
        },
        (false, true) => CrossingVerdict::Fill {
            fill: NodeToFill {
                node: *ask,
                maker_node: Some(*bid),
            },
            taker_side: Side::Ask,
        },
        (false, false) => {
            if bid_order.slot < ask_order.slot {
                CrossingVerdict::Fill {
                    fill: NodeToFill {
                        node: *ask,
                        maker_node: Some(*bid),
                    },
                    taker_side: Side::Ask,
                }
            } else {
                CrossingVerdict::Fill {
                    fill: NodeToFill {
                        node: *bid,
                        maker_node: Some(*ask),
                    },
                    taker_side: Side::Bid,
                }
            }
        }
    }
}
