use std::fmt::Display;

use alloy::{
    contract,
    primitives::Bytes,
    providers::{MulticallError, PendingTransactionError, WatchTxError},
    sol_types::{self, GenericContractError, SolInterface},
    transports,
};

use crate::{book::OrderBookError, sweep::SweepError};

/// Error of the order book, option and token contract interactions.
///
/// The contracts do not publish custom errors, so reverts are decoded as
/// standard `Error(string)`/`Panic(uint256)` payloads.
pub type ExchangeError = ProviderError<GenericContractError>;

/// Why a call or transaction reverted, decoded against `R` when possible.
#[derive(Debug)]
pub enum RevertReason<R> {
    Known(R),
    Generic(String),
    Unknown,
}

/// JSON-RPC error code nodes use for a call that executed and reverted.
const EXECUTION_REVERTED: i64 = 3;

/// Failure of a contract read or transaction.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError<R> {
    /// Request can not succeed as sent, e.g. bad calldata or unknown contract.
    #[error("fatal error: {0}")]
    Fatal(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("unexpected empty RPC response")]
    NullResp,

    #[error("transaction reverted: {0:?}")]
    Reverted(Box<RevertReason<R>>),

    /// Node or connection failure, the request may be retried.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("transaction timed out")]
    Timeout,

    #[error("order book error: {0}")]
    OrderBook(#[from] OrderBookError),

    #[error("sweep error: {0}")]
    Sweep(#[from] SweepError),
}

impl<R: SolInterface> From<contract::Error> for ProviderError<R> {
    fn from(value: contract::Error) -> Self {
        match value {
            contract::Error::TransportError(err) => err.into(),
            contract::Error::PendingTransactionError(err) => err.into(),
            other => Self::Fatal(other.to_string()),
        }
    }
}

impl<R: SolInterface> From<PendingTransactionError> for ProviderError<R> {
    fn from(value: PendingTransactionError) -> Self {
        match value {
            PendingTransactionError::TransportError(err) => err.into(),
            PendingTransactionError::TxWatcher(WatchTxError::Timeout) => Self::Timeout,
            other => Self::Transport(other.to_string()),
        }
    }
}

impl<E: Display, R: SolInterface> From<transports::RpcError<E>> for ProviderError<R> {
    fn from(value: transports::RpcError<E>) -> Self {
        match value {
            transports::RpcError::ErrorResp(ref resp) if resp.code == EXECUTION_REVERTED => {
                Self::Reverted(Box::new(RevertReason::from(value)))
            }
            transports::RpcError::NullResp => Self::NullResp,
            other => Self::Transport(other.to_string()),
        }
    }
}

impl<R: SolInterface> From<sol_types::Error> for ProviderError<R> {
    fn from(value: sol_types::Error) -> Self {
        Self::Fatal(value.to_string())
    }
}

impl<R: SolInterface> From<MulticallError> for ProviderError<R> {
    fn from(value: MulticallError) -> Self {
        match value {
            MulticallError::CallFailed(bytes) => Self::Reverted(Box::new(bytes.into())),
            MulticallError::NoReturnData => Self::NullResp,
            MulticallError::TransportError(err) => err.into(),
            other => Self::Fatal(other.to_string()),
        }
    }
}

impl<E: Display, R: SolInterface> From<transports::RpcError<E>> for RevertReason<R> {
    fn from(value: transports::RpcError<E>) -> Self {
        match value.as_error_resp() {
            Some(payload) => match payload.as_decoded_interface_error::<R>() {
                Some(known) => Self::Known(known),
                None => Self::Generic(value.to_string()),
            },
            None => Self::Generic(value.to_string()),
        }
    }
}

impl<R: SolInterface> From<Bytes> for RevertReason<R> {
    fn from(value: Bytes) -> Self {
        match R::abi_decode(&value) {
            Ok(known) => Self::Known(known),
            Err(_) => Self::Generic(value.to_string()),
        }
    }
}
