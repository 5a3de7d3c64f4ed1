//! In-memory order book core for a perpetual futures order filler.
//!
//! # Overview
//!
//! The book ingests user orders observed on chain and answers, once per
//! slot, two questions: which orders should be filled against each other
//! or against the virtual AMM ([`dlob::Dlob::find_nodes_to_fill`]), and
//! which conditional orders should be triggered
//! ([`dlob::Dlob::find_nodes_to_trigger`]).
//!
//! State changes arrive only through the four mutators
//! ([`dlob::Dlob::insert`], [`dlob::Dlob::update`],
//! [`dlob::Dlob::remove`], [`dlob::Dlob::trigger`]); every reader is a
//! pure function over the current state. Account decoding, RPC
//! subscriptions, signing and transaction construction live with the
//! caller, which also serializes mutations against reads.
//!
//! Prices are scaled fixed-point integers
//! ([`types::PRICE_PRECISION`] units per 1.0) as stored by the chain
//! program; the oracle sample and the two vAMM quotes are supplied per
//! call and never cached.
//!
//! See `./tests` for the invariant suite.

pub mod dlob;
pub mod error;
pub mod math;
pub mod types;

pub use dlob::{
    BookNode, BookSide, Dlob, DoneCallback, NodeToFill, NodeToTrigger, OrderNode,
    MAX_FILLS_PER_PASS,
};
pub use error::{DlobError, DlobResult};
