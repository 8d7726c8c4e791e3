//! Scholes options order book SDK.
//!
//! # Overview
//!
//! Client side of the on-chain option order book: reads the book, plans
//! market orders against it and submits them.
//!
//! Use [`book::BookSnapshotBuilder`] to capture both sides of the book at a
//! single block, then [`sweep::plan`] to decide which resting orders a buy or
//! sell should take and what remains to be posted at the limit price.
//! [`trader::Trader`] combines both with the approval and submission of the
//! resulting `sweepAndMake` transaction.
//! [`stream::book_events`] follows the order book logs block by block, to
//! know when a snapshot went stale.
//!
//! See `./tests` for examples.
//!
//! # Limitations/follow-ups
//!
//! * Plans are computed against a snapshot and are not re-validated before
//!   submission. If the book moves in between, the transaction may revert.
//!
//! * Collateral deposits and option exercise are not covered.
//!
//! # Testing
//!
//! [`testing`] module provides builders for in-memory order books.

pub mod abi;
pub mod book;
pub mod error;
pub mod num;
pub mod stream;
pub mod sweep;
pub mod testing;
pub mod trader;
pub mod types;

use alloy::primitives::{Address, address};

#[derive(Clone, Debug)]
/// Chain the order book is operating on.
pub struct Chain {
    chain_id: u64,
    options: Address,
    order_book: Address,
}

impl Chain {
    /// Holesky testnet deployment.
    pub fn holesky() -> Self {
        Self {
            chain_id: 17000,
            options: address!("0x30DC1F6C1b50c9118163504f09C165C891E760d5"),
            order_book: address!("0x4661450F8C83274be7cBeBD7dC4489E27D3e085D"),
        }
    }

    pub fn custom(chain_id: u64, options: Address, order_book: Address) -> Self {
        Self {
            chain_id,
            options,
            order_book,
        }
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Option token contract.
    pub fn options(&self) -> Address {
        self.options
    }

    /// Order book of a single option.
    pub fn order_book(&self) -> Address {
        self.order_book
    }
}
