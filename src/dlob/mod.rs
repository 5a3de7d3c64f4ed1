//! Multi-market priority book over user orders, merged per side with a
//! caller-supplied vAMM quote.
//!
//! [`Dlob`] is the write side: four mutators driven by external order
//! events. Everything else is a pure read over the current state; the
//! caller serializes mutations and keeps readers off the book while one
//! runs.

mod list;
mod matching;
mod merge;
mod node;


pub use matching::{NodeToFill, NodeToTrigger, MAX_FILLS_PER_PASS};
pub use merge::BookSide;
pub use node::{BookNode, OrderNode};

use std::collections::{HashMap, HashSet};

use solana_sdk::pubkey::Pubkey;
use tracing::{debug, warn};

use crate::{
    error::{DlobError, DlobResult},
    math,
    types::{
        MarketIndex, OraclePriceData, Order, OrderId, OrderSignature, OrderStatus, Price, Side,
        Slot, TriggerCondition,
    },
};

use list::{MarketNodeLists, NodeList};
use matching::CrossingVerdict;
use node::NodeClass;

/// Observer fired after a mutation commits. By the time it runs, the
/// change is visible to every read.
pub type DoneCallback<'a> = Box<dyn FnOnce() + 'a>;

/// In-memory projection of the open orders of a fixed set of markets.
///
/// Each market keeps eight lists: fixed-price limit, oracle-offset
/// floating limit and market-auction orders per side, plus the two
/// trigger lists. A global signature set deduplicates across event
/// replays.
pub struct Dlob {
    markets: HashMap<MarketIndex, MarketNodeLists>,
    open_orders: HashSet<OrderSignature>,
}

impl Dlob {
    /// Create a book tracking exactly `market_indexes`. Markets cannot
    /// be added afterwards; events for any other market are rejected
    /// with [`DlobError::UnknownMarket`].
    pub fn new(market_indexes: impl IntoIterator<Item = MarketIndex>) -> Self {
        Self {
            markets: market_indexes
                .into_iter()
                .map(|market_index| (market_index, MarketNodeLists::new()))
                .collect(),
            open_orders: HashSet::new(),
        }
    }

    /// Markets this book tracks, in no particular order.
    pub fn market_indexes(&self) -> impl Iterator<Item = MarketIndex> + '_ {
        self.markets.keys().copied()
    }

    /// Number of distinct open orders across all markets.
    pub fn open_order_count(&self) -> usize {
        self.open_orders.len()
    }

    /// Number of nodes resident in one market's lists, trigger lists
    /// included.
    pub fn market_order_count(&self, market_index: MarketIndex) -> DlobResult<usize> {
        Ok(self
            .market(market_index)?
            .all()
            .into_iter()
            .map(NodeList::len)
            .sum())
    }

    fn market(&self, market_index: MarketIndex) -> DlobResult<&MarketNodeLists> {
        self.markets
            .get(&market_index)
            .ok_or(DlobError::UnknownMarket(market_index))
    }

    fn market_mut(&mut self, market_index: MarketIndex) -> DlobResult<&mut MarketNodeLists> {
        self.markets
            .get_mut(&market_index)
            .ok_or(DlobError::UnknownMarket(market_index))
    }

    /// The list an order routes to, per its class and side. Inactive
    /// conditional orders go by trigger condition, everything else by
    /// direction.
    fn list_for_order<'a>(lists: &'a mut MarketNodeLists, order: &Order) -> &'a mut NodeList {
        match node::node_class(order) {
            NodeClass::Trigger => match order.trigger_condition {
                TriggerCondition::Above => &mut lists.trigger_above,
                TriggerCondition::Below => &mut lists.trigger_below,
            },
            NodeClass::Market => match order.direction.side() {
                Side::Bid => &mut lists.market_bids,
                Side::Ask => &mut lists.market_asks,
            },
            NodeClass::FloatingLimit => match order.direction.side() {
                Side::Bid => &mut lists.floating_bids,
                Side::Ask => &mut lists.floating_asks,
            },
            NodeClass::Limit => match order.direction.side() {
                Side::Bid => &mut lists.limit_bids,
                Side::Ask => &mut lists.limit_asks,
            },
        }
    }

    /// Insert an order observed on chain.
    ///
    /// `Init` slots are ignored. Only `Open` orders join the open set;
    /// re-inserting a known signature replaces the resident node rather
    /// than duplicating it.
    pub fn insert(
        &mut self,
        order: Order,
        user_account: Pubkey,
        on_done: Option<DoneCallback<'_>>,
    ) -> DlobResult<()> {
        if order.status == OrderStatus::Init {
            return Ok(());
        }

        let signature = OrderSignature::new(user_account, order.order_id);
        let lists = self
            .markets
            .get_mut(&order.market_index)
            .ok_or(DlobError::UnknownMarket(order.market_index))?;

        if lists.remove_any(&signature).is_some() {
            debug!(%signature, "insert replaced a resident order");
        }
        if order.status == OrderStatus::Open {
            self.open_orders.insert(signature);
        } else {
            self.open_orders.remove(&signature);
        }
        Self::list_for_order(lists, &order).insert(order, user_account);

        if let Some(on_done) = on_done {
            on_done();
        }
        Ok(())
    }

    /// Remove an order. Removals of absent orders are no-ops, so event
    /// replays are safe.
    pub fn remove(
        &mut self,
        order: Order,
        user_account: Pubkey,
        on_done: Option<DoneCallback<'_>>,
    ) -> DlobResult<()> {
        let signature = OrderSignature::new(user_account, order.order_id);
        let lists = self
            .markets
            .get_mut(&order.market_index)
            .ok_or(DlobError::UnknownMarket(order.market_index))?;

        self.open_orders.remove(&signature);
        if Self::list_for_order(lists, &order).remove(&signature).is_none() {
            debug!(%signature, "remove for an order not in the book");
        }

        if let Some(on_done) = on_done {
            on_done();
        }
        Ok(())
    }

    /// Replace the stored order of a resident node.
    ///
    /// The node keeps its position in its list; readers evaluate prices
    /// live. Updates for unknown orders are dropped.
    pub fn update(
        &mut self,
        order: Order,
        user_account: Pubkey,
        on_done: Option<DoneCallback<'_>>,
    ) -> DlobResult<()> {
        let lists = self.market_mut(order.market_index)?;

        if !Self::list_for_order(lists, &order).update(order, user_account) {
            let signature = OrderSignature::new(user_account, order.order_id);
            debug!(%signature, "update for an order not in the book");
        }

        if let Some(on_done) = on_done {
            on_done();
        }
        Ok(())
    }

    /// Migrate an activated conditional order from its trigger list to
    /// the market or limit list it now belongs to. The caller flips
    /// `order.triggered` before invoking, mirroring the chain.
    pub fn trigger(
        &mut self,
        order: Order,
        user_account: Pubkey,
        on_done: Option<DoneCallback<'_>>,
    ) -> DlobResult<()> {
        let signature = OrderSignature::new(user_account, order.order_id);
        let lists = self.market_mut(order.market_index)?;

        let trigger_list = match order.trigger_condition {
            TriggerCondition::Above => &mut lists.trigger_above,
            TriggerCondition::Below => &mut lists.trigger_below,
        };
        if trigger_list.remove(&signature).is_none() {
            warn!(%signature, "trigger for an order not on a trigger list");
        }
        Self::list_for_order(lists, &order).insert(order, user_account);
        debug!(%signature, "conditional order activated");

        if let Some(on_done) = on_done {
            on_done();
        }
        Ok(())
    }

    /// Look up a resident order by identity.
    pub fn get_order(
        &self,
        market_index: MarketIndex,
        order_id: OrderId,
        user_account: Pubkey,
    ) -> DlobResult<Option<&Order>> {
        let signature = OrderSignature::new(user_account, order_id);
        Ok(self
            .market(market_index)?
            .all()
            .into_iter()
            .find_map(|l| l.get(&signature))
            .map(OrderNode::order))
    }

    /// Merged ask stream: limit, floating-limit and market asks plus
    /// the vAMM ask, lowest price first.
    pub fn get_asks<'a>(
        &'a self,
        market_index: MarketIndex,
        vamm_ask: Price,
        slot: Slot,
        oracle: Option<&'a OraclePriceData>,
    ) -> DlobResult<BookSide<'a>> {
        let lists = self.market(market_index)?;
        Ok(BookSide::new(
            Side::Ask,
            &lists.limit_asks,
            &lists.floating_asks,
            &lists.market_asks,
            vamm_ask,
            slot,
            oracle,
        ))
    }

    /// Merged bid stream: limit, floating-limit and market bids plus
    /// the vAMM bid, highest price first.
    pub fn get_bids<'a>(
        &'a self,
        market_index: MarketIndex,
        vamm_bid: Price,
        slot: Slot,
        oracle: Option<&'a OraclePriceData>,
    ) -> DlobResult<BookSide<'a>> {
        let lists = self.market(market_index)?;
        Ok(BookSide::new(
            Side::Bid,
            &lists.limit_bids,
            &lists.floating_bids,
            &lists.market_bids,
            vamm_bid,
            slot,
            oracle,
        ))
    }

    /// Price of the best merged ask. The vAMM quote guarantees one.
    pub fn get_best_ask(
        &self,
        market_index: MarketIndex,
        vamm_ask: Price,
        slot: Slot,
        oracle: Option<&OraclePriceData>,
    ) -> DlobResult<Price> {
        match self.get_asks(market_index, vamm_ask, slot, oracle)?.next() {
            Some(head) => head?.price(oracle, slot),
            None => Ok(vamm_ask),
        }
    }

    /// Price of the best merged bid. The vAMM quote guarantees one.
    pub fn get_best_bid(
        &self,
        market_index: MarketIndex,
        vamm_bid: Price,
        slot: Slot,
        oracle: Option<&OraclePriceData>,
    ) -> DlobResult<Price> {
        match self.get_bids(market_index, vamm_bid, slot, oracle)?.next() {
            Some(head) => head?.price(oracle, slot),
            None => Ok(vamm_bid),
        }
    }

    /// Market-auction asks in time priority.
    pub fn get_market_asks(
        &self,
        market_index: MarketIndex,
    ) -> DlobResult<impl Iterator<Item = &OrderNode>> {
        Ok(self.market(market_index)?.market_asks.iter())
    }

    /// Market-auction bids in time priority.
    pub fn get_market_bids(
        &self,
        market_index: MarketIndex,
    ) -> DlobResult<impl Iterator<Item = &OrderNode>> {
        Ok(self.market(market_index)?.market_bids.iter())
    }

    /// Everything fillable this slot: peer crossings first, then
    /// completed auctions routed to the vAMM.
    pub fn find_nodes_to_fill(
        &self,
        market_index: MarketIndex,
        vamm_bid: Price,
        vamm_ask: Price,
        slot: Slot,
        oracle: Option<&OraclePriceData>,
    ) -> DlobResult<Vec<NodeToFill>> {
        let mut fills =
            self.find_crossing_nodes_to_fill(market_index, vamm_bid, vamm_ask, slot, oracle)?;
        fills.extend(self.find_market_nodes_to_fill(market_index, slot)?);
        Ok(fills)
    }

    /// Pairs of crossing orders, taker first, capped at
    /// [`MAX_FILLS_PER_PASS`].
    ///
    /// Walks the two merged streams in lockstep. Both streams are
    /// monotone, so the first non-crossing pair ends the pass.
    pub fn find_crossing_nodes_to_fill(
        &self,
        market_index: MarketIndex,
        vamm_bid: Price,
        vamm_ask: Price,
        slot: Slot,
        oracle: Option<&OraclePriceData>,
    ) -> DlobResult<Vec<NodeToFill>> {
        let mut asks = self.get_asks(market_index, vamm_ask, slot, oracle)?;
        let mut bids = self.get_bids(market_index, vamm_bid, slot, oracle)?;

        let mut fills = Vec::new();
        let mut ask = asks.next().transpose()?;
        let mut bid = bids.next().transpose()?;

        while let (Some(ask_node), Some(bid_node)) = (ask, bid) {
            if fills.len() == MAX_FILLS_PER_PASS {
                break;
            }
            let ask_price = ask_node.price(oracle, slot)?;
            let bid_price = bid_node.price(oracle, slot)?;

            match matching::find_crossing_orders(ask_node, ask_price, bid_node, bid_price) {
                CrossingVerdict::NoCross => break,
                CrossingVerdict::Advance(Side::Ask) => ask = asks.next().transpose()?,
                CrossingVerdict::Advance(Side::Bid) => bid = bids.next().transpose()?,
                CrossingVerdict::Fill { fill, taker_side } => {
                    fills.push(fill);
                    match taker_side {
                        Side::Ask => ask = asks.next().transpose()?,
                        Side::Bid => bid = bids.next().transpose()?,
                    }
                }
            }
        }

        Ok(fills)
    }

    /// Market-class orders whose auction has completed, bids before
    /// asks. These fill against the vAMM, so no maker is assigned.
    pub fn find_market_nodes_to_fill(
        &self,
        market_index: MarketIndex,
        slot: Slot,
    ) -> DlobResult<Vec<NodeToFill>> {
        let lists = self.market(market_index)?;
        Ok(lists
            .market_bids
            .iter()
            .chain(lists.market_asks.iter())
            .filter(|node| math::is_auction_complete(node.order(), slot))
            .map(|node| NodeToFill {
                node: *node,
                maker_node: None,
            })
            .collect())
    }

    /// Conditional orders whose threshold the oracle has crossed and
    /// whose auction window has elapsed.
    ///
    /// Each trigger list is walked from its best threshold; the walk
    /// ends at the first uncrossed node. Nodes still inside their
    /// auction window are skipped, not terminal, since later nodes may
    /// have been placed earlier.
    pub fn find_nodes_to_trigger(
        &self,
        market_index: MarketIndex,
        slot: Slot,
        oracle_price: Price,
    ) -> DlobResult<Vec<NodeToTrigger>> {
        let lists = self.market(market_index)?;

        let above = lists
            .trigger_above
            .iter()
            .take_while(|node| oracle_price > node.order().trigger_price);
        let below = lists
            .trigger_below
            .iter()
            .take_while(|node| oracle_price < node.order().trigger_price);

        Ok(above
            .chain(below)
            .filter(|node| math::is_auction_complete(node.order(), slot))
            .map(|node| NodeToTrigger { node: *node })
            .collect())
    }
}
