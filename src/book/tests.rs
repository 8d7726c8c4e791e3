//! Tests for the order book snapshot model.

use alloy::primitives::{Address, I256, U256};

use super::*;
use crate::{
    num::WAD,
    testing::{self, MAKER, OrderBuilder, TAKER, bids, offers, wad},
    types::StateInstant,
};

fn signed_wad(units: i64) -> I256 {
    I256::try_from(units).unwrap() * I256::try_from(WAD).unwrap()
}

fn ids<'a>(orders: impl Iterator<Item = &'a RestingOrder>) -> Vec<OrderId> {
    orders.map(|o| o.id()).collect()
}

// ============================================================================
// ON-CHAIN TRANSLATION
// ============================================================================

#[test]
fn from_chain_accepts_matching_sign() {
    let bid = RestingOrder::from_chain(
        4,
        OrderSide::Bid,
        signed_wad(3),
        wad(100),
        U256::from(1_000),
        MAKER,
    )
    .unwrap();
    assert_eq!(bid.id(), 4);
    assert_eq!(bid.amount(), wad(3));
    assert_eq!(bid.price(), wad(100));
    assert_eq!(bid.expiration(), 1_000);
    assert_eq!(bid.owner(), MAKER);
    assert_eq!(bid.signed_amount(OrderSide::Bid), signed_wad(3));

    let offer = RestingOrder::from_chain(
        0,
        OrderSide::Offer,
        signed_wad(-2),
        wad(90),
        U256::from(1_000),
        MAKER,
    )
    .unwrap();
    assert_eq!(offer.amount(), wad(2));
    assert_eq!(offer.signed_amount(OrderSide::Offer), signed_wad(-2));
}

#[test]
fn from_chain_rejects_inconsistent_records() {
    assert_eq!(
        RestingOrder::from_chain(1, OrderSide::Bid, signed_wad(-1), wad(1), U256::ZERO, MAKER),
        Err(OrderBookError::WrongSign {
            order_id: 1,
            side: OrderSide::Bid
        })
    );
    assert_eq!(
        RestingOrder::from_chain(2, OrderSide::Offer, signed_wad(1), wad(1), U256::ZERO, MAKER),
        Err(OrderBookError::WrongSign {
            order_id: 2,
            side: OrderSide::Offer
        })
    );
    assert_eq!(
        RestingOrder::from_chain(4, OrderSide::Bid, signed_wad(1), wad(1), U256::MAX, MAKER),
        Err(OrderBookError::ExpirationOverflow {
            order_id: 4,
            side: OrderSide::Bid
        })
    );
}

#[test]
fn from_chain_keeps_emptied_slots() {
    for side in [OrderSide::Bid, OrderSide::Offer] {
        let order =
            RestingOrder::from_chain(1, side, I256::ZERO, wad(1), U256::from(5), MAKER).unwrap();
        assert!(order.amount().is_zero());
    }

    // An emptied slot does not break the dense indices of the side.
    let emptied =
        RestingOrder::from_chain(1, OrderSide::Offer, I256::ZERO, wad(1), U256::ZERO, MAKER)
            .unwrap();
    let book = BookSide::new(
        OrderSide::Offer,
        vec![
            OrderBuilder::new(0).price(wad(2)).build(),
            emptied,
            OrderBuilder::new(2).price(wad(3)).build(),
        ],
    )
    .unwrap();
    assert_eq!(book.len(), 3);
    assert_eq!(book.total_amount(), wad(2));
}

// ============================================================================
// BOOK SIDE
// ============================================================================

#[test]
fn book_side_requires_dense_ids() {
    let dup = BookSide::new(
        OrderSide::Bid,
        vec![OrderBuilder::new(0).build(), OrderBuilder::new(0).build()],
    );
    assert_eq!(
        dup.unwrap_err(),
        OrderBookError::DuplicateOrderId {
            order_id: 0,
            side: OrderSide::Bid
        }
    );

    let gap = BookSide::new(
        OrderSide::Offer,
        vec![OrderBuilder::new(0).build(), OrderBuilder::new(2).build()],
    );
    assert_eq!(
        gap.unwrap_err(),
        OrderBookError::NonDenseIds {
            side: OrderSide::Offer,
            missing: 1
        }
    );

    // Index order does not have to match supplied order.
    let shuffled = BookSide::new(
        OrderSide::Offer,
        vec![OrderBuilder::new(1).build(), OrderBuilder::new(0).build()],
    )
    .unwrap();
    assert_eq!(shuffled.len(), 2);
}

#[test]
fn offers_priority_cheapest_first() {
    let book = offers(&[(1, 110), (1, 90), (1, 100), (1, 90)]);
    assert_eq!(ids(book.by_priority()), vec![1, 3, 2, 0]);
}

#[test]
fn bids_priority_highest_first() {
    let book = bids(&[(1, 100), (1, 120), (1, 90), (1, 120)]);
    assert_eq!(ids(book.by_priority()), vec![1, 3, 0, 2]);
}

#[test]
fn best_aggregates_top_price() {
    let book = offers(&[(2, 101), (3, 100), (4, 100)]);
    assert_eq!(book.best(), Some((wad(100), wad(7))));
    assert_eq!(BookSide::empty(OrderSide::Offer).best(), None);
    assert_eq!(book.total_amount(), wad(9));
}

#[test]
fn impact_walks_priority() {
    let book = offers(&[(2, 110), (2, 100)]);

    assert_eq!(book.impact(wad(1)), Some((wad(100), wad(1), wad(100))));
    // 2 @ 100 + 2 @ 110 averages at 105
    assert_eq!(book.impact(wad(4)), Some((wad(110), wad(4), wad(105))));
    // Asking for more than the book holds fills what is there.
    assert_eq!(book.impact(wad(10)), Some((wad(110), wad(4), wad(105))));
    assert_eq!(book.impact(U256::ZERO), None);
    assert_eq!(BookSide::empty(OrderSide::Offer).impact(wad(1)), None);
}

#[test]
fn lookup_by_id_and_owner() {
    let book = testing::side(
        OrderSide::Bid,
        vec![
            OrderBuilder::new(0).owner(TAKER).build(),
            OrderBuilder::new(1).build(),
            OrderBuilder::new(2).owner(TAKER).build(),
        ],
    );

    assert_eq!(book.get(1).map(|o| o.owner()), Ok(MAKER));
    assert_eq!(
        book.get(3).unwrap_err(),
        OrderBookError::OrderNotFound {
            order_id: 3,
            side: OrderSide::Bid
        }
    );
    assert_eq!(ids(book.owned_by(TAKER)), vec![0, 2]);
    assert_eq!(book.owned_by(Address::ZERO).count(), 0);
}

#[test]
fn snapshot_spread() {
    let snapshot = OrderBookSnapshot::new(
        StateInstant::new(10, 1_000),
        U256::from(7),
        bids(&[(1, 95), (1, 97)]),
        offers(&[(1, 103), (1, 101)]),
    );

    assert_eq!(snapshot.spread(), Some(wad(4)));
    assert_eq!(snapshot.long_option_id(), U256::from(7));
    assert_eq!(snapshot.side(OrderSide::Bid).len(), 2);
    assert_eq!(snapshot.instant().block_number(), 10);

    let one_sided = OrderBookSnapshot::new(
        StateInstant::default(),
        U256::ZERO,
        BookSide::empty(OrderSide::Bid),
        offers(&[(1, 101)]),
    );
    assert_eq!(one_sided.spread(), None);
}

// ============================================================================
// SINGLE ORDER TAKE
// ============================================================================

#[test]
fn take_fraction_follows_taker_direction() {
    let offer = OrderBuilder::new(5).amount(wad(10)).price(wad(90)).build();
    let take = offer.take_fraction(OrderSide::Offer, 25);
    assert_eq!(take.id, U256::from(5));
    assert_eq!(take.amount, signed_wad(10) / I256::try_from(4).unwrap());
    assert_eq!(take.price, wad(90));

    let bid = OrderBuilder::new(1).amount(wad(10)).price(wad(80)).build();
    assert_eq!(bid.take_fraction(OrderSide::Bid, 100).amount, signed_wad(-10));
}

#[test]
fn take_fraction_clamps_percent() {
    let offer = OrderBuilder::new(0).amount(wad(10)).build();
    assert_eq!(offer.take_fraction(OrderSide::Offer, 250).amount, signed_wad(10));
    assert_eq!(
        offer.take_fraction(OrderSide::Offer, 0).amount,
        signed_wad(10) / I256::try_from(100).unwrap()
    );
}
