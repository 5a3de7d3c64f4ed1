//! Ordered node storage for one (class, side) of a market.

use std::collections::{btree_map, BTreeMap, HashMap};

use solana_sdk::pubkey::Pubkey;

use super::node::OrderNode;
use crate::types::{Order, OrderSignature, Slot};

/// How a list derives its primary sort key from an order.
#[derive(Clone, Copy, Debug)]
pub(crate) enum SortSpec {
    /// Fixed limit price.
    Price(SortDirection),
    /// Oracle price offset. Offset order matches live-price order within
    /// one list because every node shares the same oracle at read time.
    OracleOffset(SortDirection),
    /// Placement slot, oldest first. Market orders carry no resting
    /// quote to sort on.
    TimePriority,
    /// Trigger threshold.
    TriggerPrice(SortDirection),
}

#[derive(Clone, Copy, Debug)]
pub(crate) enum SortDirection {
    Ascending,
    Descending,
}

/// Priority key: class primary, then placement slot, then arrival order.
/// Descending lists store a negated primary so the map's natural order
/// is always best-first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct SortKey {
    primary: i128,
    slot: Slot,
    seq: u64,
}

/// Ordered sequence of nodes for one (class, side) of a market.
///
/// A sorted map keyed by priority plus a signature index: logarithmic
/// insert and remove, constant-time identity lookup, and traversal in
/// priority order for free.
#[derive(Clone, Debug)]
pub(crate) struct NodeList {
    sort: SortSpec,
    seq: u64,
    nodes: BTreeMap<SortKey, OrderNode>,
    index: HashMap<OrderSignature, SortKey>,
}

impl NodeList {
    pub(crate) fn new(sort: SortSpec) -> Self {
        Self {
            sort,
            seq: 0,
            nodes: BTreeMap::new(),
            index: HashMap::new(),
        }
    }

    fn next_key(&mut self, order: &Order) -> SortKey {
        let (raw, direction) = match self.sort {
            SortSpec::Price(direction) => (order.price as i128, direction),
            SortSpec::OracleOffset(direction) => (order.oracle_price_offset as i128, direction),
            SortSpec::TimePriority => (order.slot as i128, SortDirection::Ascending),
            SortSpec::TriggerPrice(direction) => (order.trigger_price as i128, direction),
        };
        let primary = match direction {
            SortDirection::Ascending => raw,
            SortDirection::Descending => -raw,
        };
        let key = SortKey {
            primary,
            slot: order.slot,
            seq: self.seq,
        };
        self.seq += 1;
        key
    }

    /// Insert a node in priority order, replacing any node already
    /// registered under the same signature.
    pub(crate) fn insert(&mut self, order: Order, user_account: Pubkey) {
        let node = OrderNode::new(order, user_account);
        let signature = node.signature();
        if let Some(stale) = self.index.remove(&signature) {
            self.nodes.remove(&stale);
        }
        let key = self.next_key(&order);
        self.index.insert(signature, key);
        self.nodes.insert(key, node);
    }

    /// Remove by identity. Replayed removals are no-ops.
    pub(crate) fn remove(&mut self, signature: &OrderSignature) -> Option<OrderNode> {
        let key = self.index.remove(signature)?;
        self.nodes.remove(&key)
    }

    /// Swap the stored order of an existing node in place. Returns false
    /// when the node is not resident.
    ///
    /// The node keeps its placement-time position even if the update
    /// touches a price field: readers evaluate prices live, and update
    /// events never change an order's class or side. Callers that do
    /// reprice an order remove and re-insert it.
    pub(crate) fn update(&mut self, order: Order, user_account: Pubkey) -> bool {
        let signature = OrderSignature::new(user_account, order.order_id);
        match self
            .index
            .get(&signature)
            .and_then(|key| self.nodes.get_mut(key))
        {
            Some(node) => {
                node.set_order(order);
                true
            }
            None => false,
        }
    }

    pub(crate) fn get(&self, signature: &OrderSignature) -> Option<&OrderNode> {
        self.index
            .get(signature)
            .and_then(|key| self.nodes.get(key))
    }

    /// Nodes in priority order, best first.
    pub(crate) fn iter(&self) -> btree_map::Values<'_, SortKey, OrderNode> {
        self.nodes.values()
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// The eight per-market lists: four classes by two sides.
#[derive(Clone, Debug)]
pub(crate) struct MarketNodeLists {
    pub(crate) limit_asks: NodeList,
    pub(crate) limit_bids: NodeList,
    pub(crate) floating_asks: NodeList,
    pub(crate) floating_bids: NodeList,
    pub(crate) market_asks: NodeList,
    pub(crate) market_bids: NodeList,
    pub(crate) trigger_above: NodeList,
    pub(crate) trigger_below: NodeList,
}

impl MarketNodeLists {
    pub(crate) fn new() -> Self {
        Self {
            limit_asks: NodeList::new(SortSpec::Price(SortDirection::Ascending)),
            limit_bids: NodeList::new(SortSpec::Price(SortDirection::Descending)),
            floating_asks: NodeList::new(SortSpec::OracleOffset(SortDirection::Ascending)),
            floating_bids: NodeList::new(SortSpec::OracleOffset(SortDirection::Descending)),
            market_asks: NodeList::new(SortSpec::TimePriority),
            market_bids: NodeList::new(SortSpec::TimePriority),
            trigger_above: NodeList::new(SortSpec::TriggerPrice(SortDirection::Ascending)),
            trigger_below: NodeList::new(SortSpec::TriggerPrice(SortDirection::Descending)),
        }
    }

    pub(crate) fn all(&self) -> [&NodeList; 8] {
        [
            &self.limit_asks,
            &self.limit_bids,
            &self.floating_asks,
            &self.floating_bids,
            &self.market_asks,
            &self.market_bids,
            &self.trigger_above,
            &self.trigger_below,
        ]
    }

    pub(crate) fn all_mut(&mut self) -> [&mut NodeList; 8] {
        [
            &mut self.limit_asks,
            &mut self.limit_bids,
            &mut self.floating_asks,
            &mut self.floating_bids,
            &mut self.market_asks,
            &mut self.market_bids,
            &mut self.trigger_above,
            &mut self.trigger_below,
        ]
    }

    /// Remove a node by identity wherever it resides. Used when an
    /// insert replaces an order whose class may have changed since it
    /// was first observed.
    pub(crate) fn remove_any(&mut self, signature: &OrderSignature) -> Option<OrderNode> {
        self.all_mut()
            .into_iter()
            .find_map(|list| list.remove(signature))
    }
}
