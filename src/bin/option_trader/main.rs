//! Option trader for the Scholes order book.
//!
//! This binary prints the order book of one option and sends market and
//! limit orders to it. Market orders sweep the opposite side of the book up
//! to the limit price and rest the remainder in a single transaction.

mod config;
mod display;
mod error;

use std::{
    pin::pin,
    process::exit,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use alloy::{
    network::EthereumWallet,
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::client::RpcClient,
    signers::local::PrivateKeySigner,
};
use clap::Parser;
use futures::StreamExt;
use scholes_sdk::{
    error::ExchangeError,
    stream,
    trader::Trader,
    types::{OrderSide, SweepRequest, Timestamp, TradeSide},
};
use tracing::{debug, error, info, warn};
use url::Url;

use config::{CliConfig, Command, EnvConfig, OrderArgs};
use error::Result;

#[tokio::main]
async fn main() {
    // Load .env file
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Warning: Failed to load .env file: {}", e);
    }

    let env_config = match EnvConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to parse environment configuration: {}", e);
            exit(1);
        }
    };

    let cli_config = CliConfig::parse();

    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", "info");
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let trader = match connect(&env_config) {
        Ok(trader) => trader,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            exit(1);
        }
    };

    if let Err(e) = run(&trader, cli_config.command).await {
        error!(%e, "Command failed");
        exit(1);
    }
}

fn connect(env_config: &EnvConfig) -> Result<Trader<DynProvider>> {
    let chain = env_config.chain()?;
    let signer: PrivateKeySigner = env_config.private_key.parse()?;
    let wallet = EthereumWallet::new(signer);
    let address = wallet.default_signer().address();
    let node_url = Url::parse(&env_config.node_rpc_url)?;

    // Default timeout is 30 seconds
    let timeout = Duration::from_secs(env_config.timeout_seconds.unwrap_or(30));

    info!(
        %address,
        chain_id = chain.chain_id(),
        order_book = %chain.order_book(),
        "Connecting"
    );
    let provider = DynProvider::new(
        ProviderBuilder::new()
            .wallet(wallet)
            .connect_client(RpcClient::new_http(node_url)),
    );

    Ok(Trader::new(&chain, provider, address, timeout))
}

async fn run(trader: &Trader<DynProvider>, command: Command) -> Result<()> {
    match command {
        Command::Book {
            follow,
            poll_interval,
            depth,
        } => watch_book(trader, follow, Duration::from_millis(poll_interval), depth).await,
        Command::Plan { side, order } => {
            let params = order.to_order_params()?;
            let request = SweepRequest::new(
                TradeSide::from(side),
                params.amount,
                params.price,
                params.expiration_offset,
                trader.address(),
                now()?,
            );
            let (plan, base) = futures::try_join!(trader.plan(&request), trader.base_token())?;
            display::print_plan(&plan, &base);
            if request.side() == TradeSide::Sell {
                let collateral = trader.collateral_requirement(request.amount()).await?;
                display::print_collateral(collateral, &base);
            }
            Ok(())
        }
        Command::Buy(order) => market(trader, TradeSide::Buy, &order).await,
        Command::Sell(order) => market(trader, TradeSide::Sell, &order).await,
        Command::Bid(order) => limit(trader, OrderSide::Bid, &order).await,
        Command::Offer(order) => limit(trader, OrderSide::Offer, &order).await,
        Command::Take { side, id, percent } => {
            let side = OrderSide::from(side);
            let snapshot = trader.snapshot().await?;
            let order = snapshot
                .side(side)
                .get(id)
                .map_err(ExchangeError::from)?;
            let tx_hash = trader.take(order, side, percent).await?;
            println!("Transaction: {}", tx_hash);
            Ok(())
        }
        Command::Cancel { side, id } => {
            let tx_hash = trader.cancel(OrderSide::from(side), id).await?;
            println!("Transaction: {}", tx_hash);
            Ok(())
        }
    }
}

async fn watch_book(
    trader: &Trader<DynProvider>,
    follow: bool,
    poll_interval: Duration,
    depth: usize,
) -> Result<()> {
    let snapshot = trader.snapshot().await?;
    display::print_book(&snapshot, depth, trader.address());
    if !follow {
        return Ok(());
    }

    trader.provider().client().set_poll_interval(poll_interval);
    let mut events = pin!(stream::book_events(
        trader.order_book(),
        trader.provider().clone(),
        snapshot.instant().block_number() + 1,
        tokio::time::sleep,
    ));
    while let Some(block) = events.next().await {
        match block {
            Ok(block) if block.changes_book() => {
                debug!(
                    block = block.block_number(),
                    events = block.events().len(),
                    "order book changed"
                );
                let snapshot = trader.snapshot().await?;
                display::print_book(&snapshot, depth, trader.address());
            }
            Ok(_) => {}
            Err(e) => {
                warn!(%e, "Failed to poll order book events");
                tokio::time::sleep(poll_interval).await;
            }
        }
    }
    Ok(())
}

async fn market(trader: &Trader<DynProvider>, side: TradeSide, order: &OrderArgs) -> Result<()> {
    let params = order.to_order_params()?;
    let base = trader.base_token().await?;
    let now = now()?;
    let outcome = match side {
        TradeSide::Buy => {
            trader
                .buy(params.amount, params.price, params.expiration_offset, now)
                .await?
        }
        TradeSide::Sell => {
            trader
                .sell(params.amount, params.price, params.expiration_offset, now)
                .await?
        }
    };
    display::print_outcome(&outcome, &base);
    Ok(())
}

async fn limit(trader: &Trader<DynProvider>, side: OrderSide, order: &OrderArgs) -> Result<()> {
    let params = order.to_order_params()?;
    let expiration = now()?.saturating_add(params.expiration_offset);
    let tx_hash = trader
        .make(side, params.amount, params.price, expiration)
        .await?;
    println!("Transaction: {}", tx_hash);
    Ok(())
}

fn now() -> Result<Timestamp> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs())
}
