//! Error types for book operations.

use thiserror::Error;

use crate::types::MarketIndex;

/// Error type for book operations.
///
/// Malformed chain input never lands here: replayed removals, `Init`
/// inserts and updates for unknown orders degrade to no-ops instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DlobError {
    /// An oracle-offset order was priced without oracle data.
    #[error("oracle price data required to price an oracle-offset order")]
    MissingOracle,

    /// A market index outside the set fixed at construction.
    #[error("market {0} is not tracked by this book")]
    UnknownMarket(MarketIndex),
}

/// Result type for book operations.
pub type DlobResult<T> = Result<T, DlobError>;
