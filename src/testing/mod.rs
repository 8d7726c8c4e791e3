//! Test utilities.
//!
//! [`OrderBuilder`] creates resting orders with controlled values, while
//! [`offers`] and [`bids`] build whole book sides from `(amount, price)` pairs
//! with dense ids in the supplied order.
//!
//! Amounts and prices in the helpers are whole units, scaled by [`wad`].

use alloy::primitives::{Address, U256};

use crate::{
    book::{BookSide, RestingOrder},
    num::WAD,
    types::{OrderId, OrderSide, Timestamp},
};

/// Default owner of orders created by the helpers.
pub const MAKER: Address = Address::with_last_byte(0xAA);

/// Default trader sweeping the books created by the helpers.
pub const TAKER: Address = Address::with_last_byte(0xBB);

/// Expiration far enough in the future for any test.
pub const NEVER: Timestamp = Timestamp::MAX;

/// Whole units in 1e18 fixed point.
pub fn wad(units: u64) -> U256 {
    U256::from(units) * WAD
}

pub fn scale(amount: u64, decimals: u8) -> U256 {
    U256::from(amount) * U256::from(10).pow(U256::from(decimals))
}

/// Builder for creating test [`RestingOrder`] instances.
///
/// # Example
///
/// ```ignore
/// use scholes_sdk::testing::{OrderBuilder, wad};
///
/// let order = OrderBuilder::new(3)
///     .amount(wad(10))
///     .price(wad(95))
///     .expiration(1_000)
///     .build();
/// ```
#[derive(Clone, Debug)]
pub struct OrderBuilder {
    id: OrderId,
    amount: U256,
    price: U256,
    expiration: Timestamp,
    owner: Address,
}

impl OrderBuilder {
    /// Create a new order builder: one unit at price one, owned by [`MAKER`], never expiring.
    pub fn new(id: OrderId) -> Self {
        Self {
            id,
            amount: WAD,
            price: WAD,
            expiration: NEVER,
            owner: MAKER,
        }
    }

    pub fn amount(mut self, amount: U256) -> Self {
        self.amount = amount;
        self
    }

    pub fn price(mut self, price: U256) -> Self {
        self.price = price;
        self
    }

    pub fn expiration(mut self, expiration: Timestamp) -> Self {
        self.expiration = expiration;
        self
    }

    pub fn owner(mut self, owner: Address) -> Self {
        self.owner = owner;
        self
    }

    pub fn build(self) -> RestingOrder {
        RestingOrder::new(
            self.id,
            self.amount,
            self.price,
            self.expiration,
            self.owner,
        )
    }
}

/// Book side from orders that are already built.
///
/// # Panics
///
/// If the ids are not dense from zero.
pub fn side(side: OrderSide, orders: Vec<RestingOrder>) -> BookSide {
    BookSide::new(side, orders).expect("dense order ids")
}

/// Offers from `(amount, price)` pairs in whole units, owned by [`MAKER`].
pub fn offers(levels: &[(u64, u64)]) -> BookSide {
    side(OrderSide::Offer, orders(levels))
}

/// Bids from `(amount, price)` pairs in whole units, owned by [`MAKER`].
pub fn bids(levels: &[(u64, u64)]) -> BookSide {
    side(OrderSide::Bid, orders(levels))
}

fn orders(levels: &[(u64, u64)]) -> Vec<RestingOrder> {
    levels
        .iter()
        .enumerate()
        .map(|(id, (amount, price))| {
            OrderBuilder::new(id as OrderId)
                .amount(wad(*amount))
                .price(wad(*price))
                .build()
        })
        .collect()
}
