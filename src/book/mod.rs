//! Order book snapshot model.
//!
//! The on-chain order book keeps bids and offers in two dense arrays indexed
//! from zero. [`OrderBookSnapshot`] captures both sides at one block, and
//! [`BookSide`] provides the price-priority view the sweep planner and the
//! book display rely on.

mod error;
mod order;
mod snapshot;

#[cfg(test)]
mod tests;

pub use error::{OrderBookError, OrderBookResult};
pub use order::RestingOrder;
pub use snapshot::BookSnapshotBuilder;

pub(crate) use order::signed;

use std::cmp::Ordering;

use alloy::primitives::{Address, U256};
use itertools::{FoldWhile, Itertools};

use crate::types::{self, OrderId, OrderSide};

/// All resting orders of one side of the book, in index order.
#[derive(Clone, Debug)]
pub struct BookSide {
    side: OrderSide,
    orders: Vec<RestingOrder>,
}

impl BookSide {
    /// Create a side from its orders.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The same order id appears twice
    /// - The ids do not cover `0..orders.len()`
    pub fn new(side: OrderSide, orders: Vec<RestingOrder>) -> OrderBookResult<Self> {
        let mut ids = orders.iter().map(|o| o.id()).collect::<Vec<_>>();
        ids.sort_unstable();
        if let Some((dup, _)) = ids.iter().tuple_windows().find(|(a, b)| a == b) {
            return Err(OrderBookError::DuplicateOrderId {
                order_id: *dup,
                side,
            });
        }
        if let Some((expected, _)) = ids
            .iter()
            .enumerate()
            .find(|(expected, id)| *expected as OrderId != **id)
        {
            return Err(OrderBookError::NonDenseIds {
                side,
                missing: expected as OrderId,
            });
        }
        Ok(Self { side, orders })
    }

    pub fn empty(side: OrderSide) -> Self {
        Self {
            side,
            orders: vec![],
        }
    }

    pub fn side(&self) -> OrderSide {
        self.side
    }

    /// Orders in the order they were supplied (index order when read from chain).
    pub fn orders(&self) -> &[RestingOrder] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn get(&self, order_id: OrderId) -> OrderBookResult<&RestingOrder> {
        self.orders
            .iter()
            .find(|o| o.id() == order_id)
            .ok_or(OrderBookError::OrderNotFound {
                order_id,
                side: self.side,
            })
    }

    /// Orders placed by the given address.
    pub fn owned_by(&self, owner: Address) -> impl Iterator<Item = &RestingOrder> {
        self.orders.iter().filter(move |o| o.owner() == owner)
    }

    /// Sum of all order amounts on this side.
    pub fn total_amount(&self) -> U256 {
        self.orders
            .iter()
            .fold(U256::ZERO, |acc, o| acc.saturating_add(o.amount()))
    }

    /// Orders in price priority: bids highest first, offers cheapest first.
    ///
    /// The sort is stable, equally priced orders keep their supplied order.
    pub fn by_priority(&self) -> impl Iterator<Item = &RestingOrder> {
        let side = self.side;
        self.orders
            .iter()
            .sorted_by(move |a, b| priority(side, a.price(), b.price()))
    }

    /// Best price and the total amount resting at it.
    pub fn best(&self) -> Option<(U256, U256)> {
        let mut orders = self.by_priority();
        let first = orders.next()?;
        let amount = orders
            .take_while(|o| o.price() == first.price())
            .fold(first.amount(), |acc, o| acc.saturating_add(o.amount()));
        Some((first.price(), amount))
    }

    /// Impact price for the requested amount, along with the fillable amount
    /// and the amount-weighted average price.
    ///
    /// Walks every order regardless of expiration or owner.
    pub fn impact(&self, want_amount: U256) -> Option<(U256, U256, U256)> {
        let (price, unfilled, price_amount) = self
            .by_priority()
            .fold_while(
                (U256::ZERO, want_amount, U256::ZERO),
                |(_, unfilled, price_amount), order| {
                    if unfilled > order.amount() {
                        FoldWhile::Continue((
                            order.price(),
                            unfilled - order.amount(),
                            price_amount.saturating_add(order.price().saturating_mul(order.amount())),
                        ))
                    } else {
                        FoldWhile::Done((
                            order.price(),
                            U256::ZERO,
                            price_amount.saturating_add(order.price().saturating_mul(unfilled)),
                        ))
                    }
                },
            )
            .into_inner();
        let filled = want_amount - unfilled;
        if filled > U256::ZERO {
            Some((price, filled, price_amount / filled))
        } else {
            None
        }
    }
}

/// Both sides of one option order book at a single block.
#[derive(Clone, Debug)]
pub struct OrderBookSnapshot {
    instant: types::StateInstant,
    long_option_id: U256,
    bids: BookSide,
    offers: BookSide,
}

impl OrderBookSnapshot {
    pub fn new(
        instant: types::StateInstant,
        long_option_id: U256,
        bids: BookSide,
        offers: BookSide,
    ) -> Self {
        Self {
            instant,
            long_option_id,
            bids,
            offers,
        }
    }

    pub fn instant(&self) -> types::StateInstant {
        self.instant
    }

    /// ID of the long option traded in this book.
    pub fn long_option_id(&self) -> U256 {
        self.long_option_id
    }

    pub fn bids(&self) -> &BookSide {
        &self.bids
    }

    pub fn offers(&self) -> &BookSide {
        &self.offers
    }

    pub fn side(&self, side: OrderSide) -> &BookSide {
        match side {
            OrderSide::Bid => &self.bids,
            OrderSide::Offer => &self.offers,
        }
    }

    /// Best offer price minus best bid price, if both sides are populated.
    pub fn spread(&self) -> Option<U256> {
        let (ask, _) = self.offers.best()?;
        let (bid, _) = self.bids.best()?;
        Some(ask.saturating_sub(bid))
    }
}

fn priority(side: OrderSide, a: U256, b: U256) -> Ordering {
    match side {
        OrderSide::Bid => b.cmp(&a),
        OrderSide::Offer => a.cmp(&b),
    }
}
