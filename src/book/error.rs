//! Error types for order book snapshot validation.

use std::fmt;

use crate::types::{OrderId, OrderSide};

/// Error type for order book snapshot operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderBookError {
    /// On-chain amount sign contradicts the side the order was read from.
    WrongSign { order_id: OrderId, side: OrderSide },

    /// Expiration does not fit unix seconds.
    ExpirationOverflow { order_id: OrderId, side: OrderSide },

    /// The same index appears more than once on one side.
    DuplicateOrderId { order_id: OrderId, side: OrderSide },

    /// Indices on one side are not dense from zero.
    NonDenseIds { side: OrderSide, missing: OrderId },

    /// Requested order is not in the snapshot.
    OrderNotFound { order_id: OrderId, side: OrderSide },
}

impl fmt::Display for OrderBookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderBookError::WrongSign { order_id, side } => {
                write!(f, "{} {} has amount of the wrong sign", side, order_id)
            }
            OrderBookError::ExpirationOverflow { order_id, side } => {
                write!(f, "{} {} expiration is out of range", side, order_id)
            }
            OrderBookError::DuplicateOrderId { order_id, side } => {
                write!(f, "{} {} appears more than once", side, order_id)
            }
            OrderBookError::NonDenseIds { side, missing } => {
                write!(f, "{} ids are not dense, {} is missing", side, missing)
            }
            OrderBookError::OrderNotFound { order_id, side } => {
                write!(f, "{} {} not found in book", side, order_id)
            }
        }
    }
}

impl std::error::Error for OrderBookError {}

/// Result type for order book operations.
pub type OrderBookResult<T> = Result<T, OrderBookError>;
