mod order;

pub use order::{Order, OrderDirection, OrderStatus, OrderType, Side, TriggerCondition};

use std::fmt;

use solana_sdk::pubkey::Pubkey;

/// Index of a perpetual market.
pub type MarketIndex = u16;

/// Chain slot. Doubles as the placement timestamp on orders and as
/// "now" when evaluating auction progress.
pub type Slot = u64;

/// Scaled fixed-point price with [`PRICE_PRECISION`] units per 1.0.
pub type Price = u64;

/// User-scoped order ID as assigned by the chain program.
pub type OrderId = u32;

/// Number of price units per 1.0.
pub const PRICE_PRECISION: Price = 1_000_000;

/// Oracle price sample supplied by the caller per read.
///
/// The book holds no oracle state of its own; every read that needs an
/// oracle takes the freshest sample the caller has.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OraclePriceData {
    /// Oracle price in [`PRICE_PRECISION`] units. Signed, as delivered
    /// by the feed.
    pub price: i64,
}

/// Globally unique identity of an order: the owning user account plus
/// the user-scoped order ID.
///
/// This is the dedup key of the open-order set and the reverse indexes.
/// The [`fmt::Display`] form (`<user>-<order_id>`) appears in logs only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OrderSignature {
    user_account: Pubkey,
    order_id: OrderId,
}

impl OrderSignature {
    pub fn new(user_account: Pubkey, order_id: OrderId) -> Self {
        Self {
            user_account,
            order_id,
        }
    }

    /// Account that placed the order.
    pub fn user_account(&self) -> Pubkey {
        self.user_account
    }

    /// User-scoped order ID.
    pub fn order_id(&self) -> OrderId {
        self.order_id
    }
}

impl fmt::Display for OrderSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.user_account, self.order_id)
    }
}
