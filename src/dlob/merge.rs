//! Lazy merge of one market side's price streams.

use std::collections::btree_map;

use crate::{
    error::DlobResult,
    types::{OraclePriceData, Price, Side, Slot},
};

use super::{
    list::{NodeList, SortKey},
    node::{BookNode, OrderNode},
};

/// One market side merged across its three resident lists and the
/// synthetic vAMM quote, yielded best price first.
///
/// Prices are evaluated against the live `(oracle, slot)` on every
/// advance, which is what resolves the floating-limit lists' offset
/// keying into correct price order. At equal prices the earlier source
/// wins (limit, floating limit, market, then vAMM), so user orders
/// always precede the vAMM quote.
///
/// The stream is single-pass; obtain a fresh one per read. It is
/// invalidated by any book mutation.
pub struct BookSide<'a> {
    side: Side,
    oracle: Option<&'a OraclePriceData>,
    slot: Slot,
    sources: [Source<'a>; 4],
}

struct Source<'a> {
    head: Option<BookNode<'a>>,
    rest: SourceIter<'a>,
}

enum SourceIter<'a> {
    List(btree_map::Values<'a, SortKey, OrderNode>),
    Vamm,
}

impl<'a> BookSide<'a> {
    pub(crate) fn new(
        side: Side,
        limit: &'a NodeList,
        floating: &'a NodeList,
        market: &'a NodeList,
        vamm_price: Price,
        slot: Slot,
        oracle: Option<&'a OraclePriceData>,
    ) -> Self {
        let list_source = |list: &'a NodeList| {
            let mut iter = list.iter();
            Source {
                head: iter.next().map(BookNode::Order),
                rest: SourceIter::List(iter),
            }
        };
        Self {
            side,
            oracle,
            slot,
            sources: [
                list_source(limit),
                list_source(floating),
                list_source(market),
                Source {
                    head: Some(BookNode::Vamm { price: vamm_price }),
                    rest: SourceIter::Vamm,
                },
            ],
        }
    }
}

impl<'a> Iterator for BookSide<'a> {
    type Item = DlobResult<BookNode<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut best: Option<(usize, Price)> = None;
        for (i, source) in self.sources.iter().enumerate() {
            let Some(head) = source.head else { continue };
            let price = match head.price(self.oracle, self.slot) {
                Ok(price) => price,
                Err(e) => return Some(Err(e)),
            };
            // Strictly better only, so ties keep the earliest source.
            let better = match best {
                None => true,
                Some((_, best_price)) => match self.side {
                    Side::Ask => price < best_price,
                    Side::Bid => price > best_price,
                },
            };
            if better {
                best = Some((i, price));
            }
        }

        let (i, _) = best?;
        let source = &mut self.sources[i];
        let yielded = source.head.take();
        source.head = match &mut source.rest {
            SourceIter::List(iter) => iter.next().map(BookNode::Order),
            SourceIter::Vamm => None,
        };
        yielded.map(Ok)
    }
}
