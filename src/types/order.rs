use super::{MarketIndex, OrderId, Price, Slot};

/// Type of the placed order.
///
/// * [`OrderType::Limit`] rests at a fixed or oracle-relative price.
/// * [`OrderType::Market`] walks a price auction from its start price to
///   its end price and is expected to fill immediately after.
/// * [`OrderType::TriggerLimit`] and [`OrderType::TriggerMarket`] park on
///   a trigger list until the oracle crosses their trigger price, then
///   behave as their non-trigger counterpart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OrderType {
    #[default]
    Limit,
    Market,
    TriggerLimit,
    TriggerMarket,
}

/// Lifecycle status of an order account.
///
/// Only [`OrderStatus::Open`] orders participate in matching; `Init`
/// slots are account padding and never enter the book.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Init,
    #[default]
    Open,
    Filled,
    Canceled,
}

/// Direction of the position the order opens or extends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OrderDirection {
    #[default]
    Long,
    Short,
}

/// Book side an order rests on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Bid,
    Ask,
}

impl OrderDirection {
    /// Longs bid, shorts ask.
    pub fn side(&self) -> Side {
        match self {
            OrderDirection::Long => Side::Bid,
            OrderDirection::Short => Side::Ask,
        }
    }
}

/// Which way the oracle must cross the trigger price to activate a
/// conditional order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TriggerCondition {
    #[default]
    Above,
    Below,
}

/// User order as decoded from its chain account.
///
/// The book consumes orders read-only; the only mutation path is a
/// wholesale swap through an update event. Prices are scaled integers
/// in [`super::PRICE_PRECISION`] units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Order {
    pub market_index: MarketIndex,
    pub order_id: OrderId,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub direction: OrderDirection,
    /// Crossing direction for conditional orders; meaningless otherwise.
    pub trigger_condition: TriggerCondition,
    /// Set once a conditional order has been activated on chain.
    pub triggered: bool,
    /// Fixed limit price. Zero for pure market and oracle-offset orders.
    pub price: Price,
    /// Signed offset from the oracle price. Nonzero makes a limit order
    /// float with the oracle.
    pub oracle_price_offset: i32,
    /// Activation threshold for conditional orders.
    pub trigger_price: Price,
    /// Slot the order was placed at. Time priority and auction origin.
    pub slot: Slot,
    /// Auction length in slots. Zero means no auction.
    pub auction_duration: u8,
    pub auction_start_price: Price,
    pub auction_end_price: Price,
    /// Maker-only flag. Post-only orders never take.
    pub post_only: bool,
}
