//! Resting order representation.

use alloy::primitives::{Address, I256, Sign, U256};

use super::error::{OrderBookError, OrderBookResult};
use crate::{
    abi::order_book::OrderBook::TakeOrder,
    types::{OrderId, OrderSide, Timestamp},
};

/// Resting order as recorded on one side of the order book.
///
/// The amount is kept as an unsigned magnitude, the side is carried by the
/// [`super::BookSide`] holding the order. Signed on-chain amounts are
/// translated by [`RestingOrder::from_chain`] and [`RestingOrder::signed_amount`].
#[derive(Clone, Copy, derive_more::Debug, PartialEq, Eq)]
pub struct RestingOrder {
    id: OrderId,
    #[debug("{amount}")]
    amount: U256,
    #[debug("{price}")]
    price: U256,
    expiration: Timestamp,
    owner: Address,
}

impl RestingOrder {
    pub fn new(
        id: OrderId,
        amount: U256,
        price: U256,
        expiration: Timestamp,
        owner: Address,
    ) -> Self {
        Self {
            id,
            amount,
            price,
            expiration,
            owner,
        }
    }

    /// Translate the on-chain record of an order read from the given side.
    ///
    /// A zero amount is accepted with either side, the slot stays in the
    /// book to keep indices dense and the planner never takes it.
    pub fn from_chain(
        id: OrderId,
        side: OrderSide,
        amount: I256,
        price: U256,
        expiration: U256,
        owner: Address,
    ) -> OrderBookResult<Self> {
        match (side, amount.sign()) {
            _ if amount.is_zero() => {}
            (OrderSide::Bid, Sign::Positive) | (OrderSide::Offer, Sign::Negative) => {}
            _ => return Err(OrderBookError::WrongSign { order_id: id, side }),
        }
        let expiration = u64::try_from(expiration)
            .map_err(|_| OrderBookError::ExpirationOverflow { order_id: id, side })?;
        Ok(Self::new(id, amount.unsigned_abs(), price, expiration, owner))
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    /// Unsigned quantity, scaled by 1e18.
    pub fn amount(&self) -> U256 {
        self.amount
    }

    pub fn price(&self) -> U256 {
        self.price
    }

    pub fn expiration(&self) -> Timestamp {
        self.expiration
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expiration < now
    }

    /// Amount in the book's own representation: positive for bids, negative for offers.
    pub fn signed_amount(&self, side: OrderSide) -> I256 {
        signed(self.amount, side == OrderSide::Offer)
    }

    /// Take `percent` of this order on its own, as a single `take` call would.
    ///
    /// The amount follows the taker's direction: taking an offer buys (positive),
    /// taking a bid sells (negative). The percentage is clamped to `1..=100`.
    pub fn take_fraction(&self, side: OrderSide, percent: u8) -> TakeOrder {
        let percent = U256::from(percent.clamp(1, 100));
        let amount = self.amount.saturating_mul(percent) / U256::from(100u8);
        TakeOrder {
            id: U256::from(self.id),
            amount: signed(amount, side == OrderSide::Bid),
            price: self.price,
        }
    }
}

/// Attach a sign to a magnitude, saturating at the I256 bounds.
pub(crate) fn signed(magnitude: U256, negative: bool) -> I256 {
    let sign = if negative {
        Sign::Negative
    } else {
        Sign::Positive
    };
    I256::checked_from_sign_and_abs(sign, magnitude).unwrap_or(match sign {
        Sign::Negative => I256::MIN,
        Sign::Positive => I256::MAX,
    })
}
