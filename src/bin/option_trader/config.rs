//! Configuration for the option trader.
//!
//! Configuration comes from two sources:
//! - Environment variables (via .env file or shell): connection details, keys, deployment
//! - CLI arguments: the command to run and its order parameters

use alloy::primitives::{Address, U256};
use clap::{Args, Parser, Subcommand, ValueEnum};
use fastnum::{UD256, decimal::Context};
use scholes_sdk::{
    Chain,
    num::Converter,
    types::{OrderId, OrderSide, TradeSide},
};

const SECONDS_PER_HOUR: u64 = 3_600;

/// Environment configuration (connection details, credentials).
#[derive(Debug, serde::Deserialize)]
pub struct EnvConfig {
    /// Chain ID, only used with a custom deployment (default: Holesky)
    pub chain_id: Option<u64>,

    /// Order book contract address, Holesky deployment if not set
    pub order_book_address: Option<String>,

    /// Option token contract address, Holesky deployment if not set
    pub options_address: Option<String>,

    /// Private key for signing transactions
    pub private_key: String,

    /// RPC URL for the node
    pub node_rpc_url: String,

    /// Optional timeout for transaction confirmations (default: 30s)
    pub timeout_seconds: Option<u64>,
}

impl EnvConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    /// Deployment to trade on.
    ///
    /// Both contract addresses have to be set for a custom deployment,
    /// neither for the Holesky one.
    pub fn chain(&self) -> Result<Chain, ConfigError> {
        match (&self.order_book_address, &self.options_address) {
            (None, None) => Ok(Chain::holesky()),
            (Some(order_book), Some(options)) => {
                let holesky = Chain::holesky();
                Ok(Chain::custom(
                    self.chain_id.unwrap_or(holesky.chain_id()),
                    parse_address("OPTIONS_ADDRESS", options)?,
                    parse_address("ORDER_BOOK_ADDRESS", order_book)?,
                ))
            }
            _ => Err(ConfigError::PartialDeployment),
        }
    }
}

fn parse_address(name: &'static str, value: &str) -> Result<Address, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidAddress(name, value.to_string()))
}

/// CLI arguments.
#[derive(Debug, Parser)]
#[command(name = "option-trader")]
#[command(about = "Trade options on the Scholes order book")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print both sides of the order book
    Book {
        /// Keep printing the book as it changes
        #[arg(long)]
        follow: bool,

        /// Interval in milliseconds between checks for new blocks when following
        #[arg(long, default_value = "5000")]
        poll_interval: u64,

        /// Number of orders to display per side (0 = all)
        #[arg(short, long, default_value = "10")]
        depth: usize,
    },

    /// Plan a market order against the current book without sending it
    Plan {
        #[arg(value_enum)]
        side: TradeArg,

        #[command(flatten)]
        order: OrderArgs,
    },

    /// Buy, taking offers up to the limit price and bidding the remainder
    Buy(OrderArgs),

    /// Sell, taking bids down to the limit price and offering the remainder
    Sell(OrderArgs),

    /// Post a bid without taking anything
    Bid(OrderArgs),

    /// Post an offer without taking anything
    Offer(OrderArgs),

    /// Take a single resting order
    Take {
        #[arg(value_enum)]
        side: SideArg,

        id: OrderId,

        /// Percentage of the order to take
        #[arg(long, default_value = "100", value_parser = clap::value_parser!(u8).range(1..=100))]
        percent: u8,
    },

    /// Cancel one of your resting orders
    Cancel {
        #[arg(value_enum)]
        side: SideArg,

        id: OrderId,
    },
}

/// Amount, price and lifetime of an order.
#[derive(Debug, Args)]
pub struct OrderArgs {
    /// Number of options (e.g., 1.5)
    pub amount: String,

    /// Limit price per option in the base token (e.g., 0.05)
    pub price: String,

    /// Hours until the resting part of the order expires
    #[arg(long, default_value = "1")]
    pub expiration_hours: u64,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TradeArg {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SideArg {
    Bid,
    Offer,
}

impl From<TradeArg> for TradeSide {
    fn from(value: TradeArg) -> Self {
        match value {
            TradeArg::Buy => TradeSide::Buy,
            TradeArg::Sell => TradeSide::Sell,
        }
    }
}

impl From<SideArg> for OrderSide {
    fn from(value: SideArg) -> Self {
        match value {
            SideArg::Bid => OrderSide::Bid,
            SideArg::Offer => OrderSide::Offer,
        }
    }
}

/// Order parameters in order book fixed point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrderParams {
    pub amount: U256,
    pub price: U256,
    pub expiration_offset: u64,
}

impl OrderArgs {
    /// Convert decimal CLI values to order book fixed point.
    pub fn to_order_params(&self) -> Result<OrderParams, ConfigError> {
        let amount = parse_wad(&self.amount).ok_or(ConfigError::InvalidAmount)?;
        if amount.is_zero() {
            return Err(ConfigError::ZeroAmount);
        }
        let price = parse_wad(&self.price).ok_or(ConfigError::InvalidPrice)?;
        let expiration_offset = self
            .expiration_hours
            .checked_mul(SECONDS_PER_HOUR)
            .ok_or(ConfigError::InvalidExpiration)?;

        Ok(OrderParams {
            amount,
            price,
            expiration_offset,
        })
    }
}

fn parse_wad(value: &str) -> Option<U256> {
    UD256::from_str(value, Context::default())
        .ok()
        .map(|v| Converter::wad().to_unsigned(v))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid amount value")]
    InvalidAmount,

    #[error("amount cannot be zero")]
    ZeroAmount,

    #[error("Invalid price value")]
    InvalidPrice,

    #[error("expiration_hours is too large")]
    InvalidExpiration,

    #[error("Invalid {0} value: {1}")]
    InvalidAddress(&'static str, String),

    #[error("ORDER_BOOK_ADDRESS and OPTIONS_ADDRESS must be set together")]
    PartialDeployment,
}
