//! Book nodes: user orders wrapped with their pricing model, plus the
//! synthetic vAMM quote that pads both sides of the merged book.

use solana_sdk::pubkey::Pubkey;

use crate::{
    error::{DlobError, DlobResult},
    math,
    types::{Order, OrderSignature, OrderType, OraclePriceData, Price, Slot},
};

/// Pricing and routing class of an order at its current trigger state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NodeClass {
    Limit,
    FloatingLimit,
    Market,
    Trigger,
}

/// Class of an order, derived from its type, trigger state and oracle
/// offset. Pure; the same order always classifies the same way until a
/// trigger event flips `triggered`.
pub(crate) fn node_class(order: &Order) -> NodeClass {
    if math::must_be_triggered(order) && !math::is_triggered(order) {
        NodeClass::Trigger
    } else if matches!(order.order_type, OrderType::Market | OrderType::TriggerMarket) {
        NodeClass::Market
    } else if order.oracle_price_offset != 0 {
        NodeClass::FloatingLimit
    } else {
        NodeClass::Limit
    }
}

/// User order resident in one of the book's lists.
#[derive(Clone, Copy, Debug)]
pub struct OrderNode {
    order: Order,
    user_account: Pubkey,
}

impl OrderNode {
    pub(crate) fn new(order: Order, user_account: Pubkey) -> Self {
        Self {
            order,
            user_account,
        }
    }

    /// The wrapped order.
    pub fn order(&self) -> &Order {
        &self.order
    }

    /// Account that placed the order.
    pub fn user_account(&self) -> Pubkey {
        self.user_account
    }

    /// Identity of the node in the open-order set and reverse indexes.
    pub fn signature(&self) -> OrderSignature {
        OrderSignature::new(self.user_account, self.order.order_id)
    }

    pub(crate) fn set_order(&mut self, order: Order) {
        self.order = order;
    }

    /// Price of the node at the supplied oracle and slot.
    ///
    /// Fixed limits quote their limit price, oracle-offset limits quote
    /// `oracle + offset`, market-class orders quote along their auction
    /// curve. Inactive conditional orders quote their trigger price;
    /// they are scanned against it, never merged.
    pub fn price(&self, oracle: Option<&OraclePriceData>, slot: Slot) -> DlobResult<Price> {
        match node_class(&self.order) {
            NodeClass::Limit => Ok(self.order.price),
            NodeClass::FloatingLimit => {
                let oracle = oracle.ok_or(DlobError::MissingOracle)?;
                let price = oracle.price.saturating_add(self.order.oracle_price_offset as i64);
                Ok(price.max(0) as Price)
            }
            NodeClass::Market => Ok(math::auction_price(&self.order, slot)),
            NodeClass::Trigger => Ok(self.order.trigger_price),
        }
    }
}

/// Element of a merged book side: a resident user order or the
/// synthetic vAMM quote.
///
/// The vAMM quote carries a price and nothing else; it has no order and
/// no user account.
#[derive(Clone, Copy, Debug)]
pub enum BookNode<'a> {
    Order(&'a OrderNode),
    Vamm { price: Price },
}

impl<'a> BookNode<'a> {
    pub fn is_vamm(&self) -> bool {
        matches!(self, BookNode::Vamm { .. })
    }

    /// The resident node, unless this is the vAMM quote.
    pub fn order_node(&self) -> Option<&'a OrderNode> {
        match self {
            BookNode::Order(node) => Some(node),
            BookNode::Vamm { .. } => None,
        }
    }

    pub fn order(&self) -> Option<&'a Order> {
        self.order_node().map(OrderNode::order)
    }

    pub fn user_account(&self) -> Option<Pubkey> {
        self.order_node().map(OrderNode::user_account)
    }

    /// Live price of the element at the supplied oracle and slot.
    pub fn price(&self, oracle: Option<&OraclePriceData>, slot: Slot) -> DlobResult<Price> {
        match self {
            BookNode::Order(node) => node.price(oracle, slot),
            BookNode::Vamm { price } => Ok(*price),
        }
    }
}
