//! Property suite over the book's universal invariants.
//!
//! Scenarios live with the book module; this file checks the rules that
//! must hold for arbitrary event sequences: dedup of the open-order set,
//! monotonicity of the merged quote streams, maker/taker assignment,
//! the per-pass fill cap and trigger-scan completeness.

use std::collections::HashSet;

use itertools::Itertools;
use proptest::prelude::*;
use solana_sdk::pubkey::Pubkey;

use dlob_core::{
    types::{OraclePriceData, Order, OrderDirection, OrderStatus, OrderType, TriggerCondition},
    Dlob, MAX_FILLS_PER_PASS,
};

fn arb_user() -> impl Strategy<Value = Pubkey> {
    (1u8..=4).prop_map(|seed| Pubkey::new_from_array([seed; 32]))
}

fn arb_order_type() -> impl Strategy<Value = OrderType> {
    prop_oneof![
        Just(OrderType::Limit),
        Just(OrderType::Market),
        Just(OrderType::TriggerLimit),
        Just(OrderType::TriggerMarket),
    ]
}

fn arb_direction() -> impl Strategy<Value = OrderDirection> {
    prop_oneof![Just(OrderDirection::Long), Just(OrderDirection::Short)]
}

fn arb_trigger_condition() -> impl Strategy<Value = TriggerCondition> {
    prop_oneof![Just(TriggerCondition::Above), Just(TriggerCondition::Below)]
}

prop_compose! {
    /// Open order with bounded fields. The market index derives from the
    /// order ID so replays of one identity stay within one market.
    fn arb_order()(
        order_id in 1u32..48,
        order_type in arb_order_type(),
        direction in arb_direction(),
        trigger_condition in arb_trigger_condition(),
        triggered in any::<bool>(),
        price in 1u64..400,
        oracle_price_offset in -40i32..40,
        trigger_price in 1u64..400,
        slot in 0u64..64,
        auction_duration in 0u8..16,
        auction_start_price in 1u64..400,
        auction_end_price in 1u64..400,
        post_only in any::<bool>(),
    ) -> Order {
        Order {
            market_index: (order_id % 2) as u16,
            order_id,
            order_type,
            status: OrderStatus::Open,
            direction,
            trigger_condition,
            triggered,
            price,
            oracle_price_offset,
            trigger_price,
            slot,
            auction_duration,
            auction_start_price,
            auction_end_price,
            post_only,
        }
    }
}

prop_compose! {
    /// Resting limit order, fixed-price or oracle-offset.
    fn arb_resting_order()(
        order_id in 1u32..48,
        direction in arb_direction(),
        price in 1u64..400,
        oracle_price_offset in -40i32..40,
        slot in 0u64..64,
        post_only in any::<bool>(),
    ) -> Order {
        Order {
            order_id,
            direction,
            price,
            oracle_price_offset,
            slot,
            post_only,
            ..Order::default()
        }
    }
}

prop_compose! {
    /// Inactive conditional order.
    fn arb_conditional()(
        order_id in 1u32..48,
        is_market in any::<bool>(),
        direction in arb_direction(),
        trigger_condition in arb_trigger_condition(),
        trigger_price in 1u64..400,
        slot in 0u64..64,
        auction_duration in 0u8..16,
    ) -> Order {
        Order {
            order_id,
            order_type: if is_market {
                OrderType::TriggerMarket
            } else {
                OrderType::TriggerLimit
            },
            direction,
            trigger_condition,
            trigger_price,
            slot,
            auction_duration,
            ..Order::default()
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn open_set_tracks_resident_open_orders(
        ops in proptest::collection::vec((arb_order(), arb_user(), any::<bool>()), 1..64)
    ) {
        let mut dlob = Dlob::new([0, 1]);
        let mut model: HashSet<(Pubkey, u32)> = HashSet::new();

        for (order, user, is_insert) in ops {
            if is_insert {
                dlob.insert(order, user, None).unwrap();
                model.insert((user, order.order_id));
            } else {
                dlob.remove(order, user, None).unwrap();
                model.remove(&(user, order.order_id));
            }
        }

        prop_assert_eq!(dlob.open_order_count(), model.len());
    }

    #[test]
    fn duplicate_inserts_never_duplicate_nodes(
        orders in proptest::collection::vec(arb_order(), 1..32),
        user in arb_user(),
    ) {
        let mut dlob = Dlob::new([0, 1]);
        let mut seen: HashSet<(u16, u32)> = HashSet::new();

        for order in orders {
            dlob.insert(order, user, None).unwrap();
            seen.insert((order.market_index, order.order_id));
        }

        let resident: usize = [0u16, 1]
            .iter()
            .map(|&market| dlob.market_order_count(market).unwrap())
            .sum();
        prop_assert_eq!(resident, seen.len());
    }

    #[test]
    fn inserted_open_orders_are_retrievable(order in arb_order(), user in arb_user()) {
        let mut dlob = Dlob::new([0, 1]);
        dlob.insert(order, user, None).unwrap();
        prop_assert!(dlob
            .get_order(order.market_index, order.order_id, user)
            .unwrap()
            .is_some());
    }

    #[test]
    fn merged_asks_are_nondecreasing(
        orders in proptest::collection::vec(arb_resting_order(), 0..32),
        vamm_ask in 1u64..400,
        oracle_price in 1i64..400,
        slot in 0u64..64,
    ) {
        let mut dlob = Dlob::new([0]);
        for mut order in orders {
            order.market_index = 0;
            dlob.insert(order, Pubkey::new_from_array([9; 32]), None).unwrap();
        }

        let oracle = OraclePriceData { price: oracle_price };
        let prices: Vec<u64> = dlob
            .get_asks(0, vamm_ask, slot, Some(&oracle))
            .unwrap()
            .map(|node| node.unwrap().price(Some(&oracle), slot).unwrap())
            .collect();

        prop_assert!(prices.iter().tuple_windows().all(|(a, b)| a <= b));
    }

    #[test]
    fn merged_bids_are_nonincreasing(
        orders in proptest::collection::vec(arb_resting_order(), 0..32),
        vamm_bid in 1u64..400,
        oracle_price in 1i64..400,
        slot in 0u64..64,
    ) {
        let mut dlob = Dlob::new([0]);
        for mut order in orders {
            order.market_index = 0;
            dlob.insert(order, Pubkey::new_from_array([9; 32]), None).unwrap();
        }

        let oracle = OraclePriceData { price: oracle_price };
        let prices: Vec<u64> = dlob
            .get_bids(0, vamm_bid, slot, Some(&oracle))
            .unwrap()
            .map(|node| node.unwrap().price(Some(&oracle), slot).unwrap())
            .collect();

        prop_assert!(prices.iter().tuple_windows().all(|(a, b)| a >= b));
    }

    #[test]
    fn best_quotes_never_fail_with_the_vamm_present(
        orders in proptest::collection::vec(arb_order(), 0..32),
        vamm_bid in 1u64..400,
        vamm_ask in 1u64..400,
        oracle_price in 1i64..400,
        slot in 0u64..64,
    ) {
        let mut dlob = Dlob::new([0, 1]);
        for order in orders {
            dlob.insert(order, Pubkey::new_from_array([9; 32]), None).unwrap();
        }

        let oracle = OraclePriceData { price: oracle_price };
        prop_assert!(dlob.get_best_ask(0, vamm_ask, slot, Some(&oracle)).is_ok());
        prop_assert!(dlob.get_best_bid(0, vamm_bid, slot, Some(&oracle)).is_ok());
    }

    #[test]
    fn crossing_fills_respect_maker_taker_rules(
        orders in proptest::collection::vec(arb_order(), 0..48),
        vamm_bid in 1u64..400,
        vamm_ask in 1u64..400,
        oracle_price in 1i64..400,
        slot in 0u64..64,
    ) {
        let mut dlob = Dlob::new([0]);
        for (i, mut order) in orders.into_iter().enumerate() {
            order.market_index = 0;
            order.order_id = i as u32 + 1;
            let user = Pubkey::new_from_array([(i % 4 + 1) as u8; 32]);
            dlob.insert(order, user, None).unwrap();
        }

        let oracle = OraclePriceData { price: oracle_price };
        let fills = dlob
            .find_crossing_nodes_to_fill(0, vamm_bid, vamm_ask, slot, Some(&oracle))
            .unwrap();

        prop_assert!(fills.len() <= MAX_FILLS_PER_PASS);
        for fill in &fills {
            let maker = fill.maker_node.expect("crossing fills always pair a maker");
            let taker = fill.node;

            prop_assert_ne!(taker.signature(), maker.signature());
            prop_assert!(!taker.order().post_only);
            if !maker.order().post_only {
                prop_assert!(maker.order().slot <= taker.order().slot);
            }
        }
    }

    #[test]
    fn trigger_scan_emits_exactly_the_crossed_complete_nodes(
        orders in proptest::collection::vec(arb_conditional(), 0..32),
        oracle_price in 1u64..400,
        slot in 0u64..64,
    ) {
        let mut dlob = Dlob::new([0]);
        let user = Pubkey::new_from_array([9; 32]);
        let mut inserted = Vec::new();
        for (i, mut order) in orders.into_iter().enumerate() {
            order.market_index = 0;
            order.order_id = i as u32 + 1;
            dlob.insert(order, user, None).unwrap();
            inserted.push(order);
        }

        let triggers = dlob.find_nodes_to_trigger(0, slot, oracle_price).unwrap();
        let emitted: HashSet<u32> = triggers
            .iter()
            .map(|t| t.node.order().order_id)
            .collect();

        let expected: HashSet<u32> = inserted
            .iter()
            .filter(|order| {
                let crossed = match order.trigger_condition {
                    TriggerCondition::Above => oracle_price > order.trigger_price,
                    TriggerCondition::Below => oracle_price < order.trigger_price,
                };
                let complete = order.auction_duration == 0
                    || slot >= order.slot.saturating_add(order.auction_duration as u64);
                crossed && complete
            })
            .map(|order| order.order_id)
            .collect();

        prop_assert_eq!(emitted, expected);
    }
}
