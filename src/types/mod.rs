mod order;
mod request;

pub use order::{OrderSide, TradeSide};
pub use request::SweepRequest;

/// Index of a resting order within one side of the order book.
///
/// Indices are dense from zero and stay stable only until an order at a lower
/// index gets cancelled or fully filled, at which point the contract shifts
/// the orders after it.
pub type OrderId = u64;

/// Unix timestamp, seconds.
pub type Timestamp = u64;

/// Instant in chain history the state is up to date with.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Eq, Ord, Hash, Default)]
pub struct StateInstant {
    block_number: u64,
    block_timestamp: u64,
}

impl StateInstant {
    pub fn new(block_number: u64, block_timestamp: u64) -> Self {
        Self {
            block_number,
            block_timestamp,
        }
    }

    pub fn block_number(&self) -> u64 {
        self.block_number
    }

    pub fn block_timestamp(&self) -> u64 {
        self.block_timestamp
    }
}
