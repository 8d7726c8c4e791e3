use alloy::{
    eips::BlockId,
    primitives::{Address, U256},
    providers::Provider,
};

use super::{BookSide, OrderBookResult, OrderBookSnapshot, RestingOrder};
use crate::{
    abi::order_book::OrderBook,
    error::ExchangeError,
    types::{self, OrderId, OrderSide},
};

/// Default number of orders to fetch via single multicall.
const DEFAULT_ORDERS_PER_BATCH: usize = 500;

/// Reads a consistent snapshot of both sides of an option order book.
///
/// All calls are pinned to a single block, so the returned indices are
/// consistent with each other at that block. The on-chain book may move on
/// before a plan derived from the snapshot is submitted.
pub struct BookSnapshotBuilder<P> {
    instance: OrderBook::OrderBookInstance<P>,
    provider: P,
    block_id: BlockId,
    orders_per_batch: usize,
}

impl<P: Provider + Clone> BookSnapshotBuilder<P> {
    /// Creates a new [`BookSnapshotBuilder`] which fetches the book at the latest block.
    pub fn new(order_book: Address, provider: P) -> Self {
        Self {
            instance: OrderBook::new(order_book, provider.clone()),
            provider,
            block_id: BlockId::Number(alloy::eips::BlockNumberOrTag::Latest),
            orders_per_batch: DEFAULT_ORDERS_PER_BATCH,
        }
    }

    /// Sets the block number or tag to fetch the book at (default: latest).
    /// If tag is provided, it gets converted to a specific block number first.
    pub fn at_block(mut self, block: BlockId) -> Self {
        self.block_id = block;
        self
    }

    /// Sets the number of orders to fetch in a single multicall batch (default: 500).
    pub fn with_orders_per_batch(mut self, orders_per_batch: usize) -> Self {
        self.orders_per_batch = orders_per_batch.max(1);
        self
    }

    /// Build the snapshot.
    pub async fn build(mut self) -> Result<OrderBookSnapshot, ExchangeError> {
        let instant = self.normalize_block().await?;

        let (long_option_id_call, num_orders_call) = (
            self.instance.longOptionId().block(self.block_id),
            self.instance.numOrders().block(self.block_id),
        );
        let (long_option_id, num_orders) = futures::try_join!(
            long_option_id_call.call().into_future(),
            num_orders_call.call().into_future(),
        )
        .map_err(ExchangeError::from)?;

        let (num_bids, num_offers) = (
            order_count(num_orders.numBids)?,
            order_count(num_orders.numOffers)?,
        );
        let (bids, offers) = futures::try_join!(
            self.side(OrderSide::Bid, num_bids),
            self.side(OrderSide::Offer, num_offers),
        )?;

        Ok(OrderBookSnapshot::new(instant, long_option_id, bids, offers))
    }

    async fn normalize_block(&mut self) -> Result<types::StateInstant, ExchangeError> {
        let block_header = self
            .provider
            .get_block(self.block_id)
            .await
            .map_err(ExchangeError::from)?
            .map(|b| b.into_header())
            .ok_or(ExchangeError::InvalidRequest("block not found".to_string()))?;
        self.block_id = BlockId::number(block_header.number);
        Ok(types::StateInstant::new(
            block_header.number,
            block_header.timestamp,
        ))
    }

    async fn side(&self, side: OrderSide, count: OrderId) -> Result<BookSide, ExchangeError> {
        let ids = (0..count).collect::<Vec<_>>();
        let batch_futs = ids.chunks(self.orders_per_batch).map(|chunk| {
            let multicall = self
                .provider
                .multicall()
                .block(self.block_id)
                .dynamic()
                .extend(
                    chunk
                        .iter()
                        .map(|id| self.instance.status(side.is_bid(), U256::from(*id))),
                );
            async move { multicall.aggregate().await }
        });

        let orders = futures::future::try_join_all(batch_futs)
            .await
            .map_err(ExchangeError::from)?
            .into_iter()
            .flatten()
            .zip(ids)
            .map(|(status, id)| {
                RestingOrder::from_chain(
                    id,
                    side,
                    status.amount,
                    status.price,
                    status.expiration,
                    status.owner,
                )
            })
            .collect::<OrderBookResult<Vec<_>>>()?;

        Ok(BookSide::new(side, orders)?)
    }
}

fn order_count(value: U256) -> Result<OrderId, ExchangeError> {
    OrderId::try_from(value)
        .map_err(|_| ExchangeError::Fatal(format!("order count out of range: {value}")))
}
