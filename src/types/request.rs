use alloy::primitives::{Address, U256};

use super::*;

/// Request to sweep the book and rest whatever remains.
///
/// Amounts and prices are fixed-point numbers scaled by 1e18, see [`crate::num::WAD`].
/// `now` is supplied by the caller, the planner never reads the clock.
#[derive(Clone, Copy, derive_more::Debug, PartialEq, Eq)]
pub struct SweepRequest {
    side: TradeSide,
    #[debug("{amount}")]
    amount: U256,
    #[debug("{limit_price}")]
    limit_price: U256,
    expiration_offset: u64,
    trader: Address,
    now: Timestamp,
}

impl SweepRequest {
    /// Create a new sweep request.
    ///
    /// * `amount` - quantity to trade, must be positive to be planned.
    /// * `limit_price` - worst acceptable price, also the price of the residual order.
    /// * `expiration_offset` - lifetime of the residual order in seconds, counted from `now`.
    /// * `trader` - address submitting the trade, its own orders are never taken.
    pub fn new(
        side: TradeSide,
        amount: U256,
        limit_price: U256,
        expiration_offset: u64,
        trader: Address,
        now: Timestamp,
    ) -> Self {
        Self {
            side,
            amount,
            limit_price,
            expiration_offset,
            trader,
            now,
        }
    }

    pub fn side(&self) -> TradeSide {
        self.side
    }

    pub fn amount(&self) -> U256 {
        self.amount
    }

    pub fn limit_price(&self) -> U256 {
        self.limit_price
    }

    pub fn expiration_offset(&self) -> u64 {
        self.expiration_offset
    }

    pub fn trader(&self) -> Address {
        self.trader
    }

    pub fn now(&self) -> Timestamp {
        self.now
    }

    /// Whether a resting order at `price` is acceptable under the limit.
    ///
    /// Buying accepts offers at or below the limit, selling accepts bids at or above it.
    pub fn accepts_price(&self, price: U256) -> bool {
        match self.side {
            TradeSide::Buy => price <= self.limit_price,
            TradeSide::Sell => price >= self.limit_price,
        }
    }
}
