use std::time::Duration;

use alloy::{
    primitives::{Address, B256},
    providers::Provider,
    rpc::types::{Filter, Log},
    sol_types::SolEventInterface,
};
use futures::{Stream, stream};

use crate::{abi::order_book::OrderBook::OrderBookEvents, error::ExchangeError};

/// Log emitted by the order book contract.
#[derive(Debug)]
pub enum BookEvent {
    Known(OrderBookEvents),

    /// Log that does not decode as `Make`, `Take` or `Cancel`, with its
    /// first topic.
    Unrecognized(Option<B256>),
}

/// Order book logs of a single block, in log order.
#[derive(Debug)]
pub struct BlockEvents {
    block_number: u64,
    events: Vec<BookEvent>,
}

impl BlockEvents {
    pub fn block_number(&self) -> u64 {
        self.block_number
    }

    pub fn events(&self) -> &[BookEvent] {
        &self.events
    }

    /// Whether the book may differ from the previous block.
    pub fn changes_book(&self) -> bool {
        !self.events.is_empty()
    }
}

fn decode(log: &Log) -> BookEvent {
    match OrderBookEvents::decode_log(&log.inner) {
        Ok(event) => BookEvent::Known(event.data),
        Err(_) => BookEvent::Unrecognized(log.inner.data.topics().first().copied()),
    }
}

/// Returns stream of the order book logs, batched per block, starting from
/// the specified block.
///
/// Every block is yielded once it is available, with or without logs, so
/// the sequence is strictly continuous. Blocks past the tip of the chain
/// are waited for with `sleep` and the [`Provider`]-configured poll
/// interval. A failed request yields an error and is retried for the same
/// block on the next poll.
pub fn book_events<P, S, SFut>(
    order_book: Address,
    provider: P,
    from_block: u64,
    sleep: S,
) -> impl Stream<Item = Result<BlockEvents, ExchangeError>>
where
    P: Provider,
    S: Fn(Duration) -> SFut + Copy,
    SFut: Future<Output = ()>,
{
    stream::unfold(
        (provider, from_block),
        move |(provider, block_number)| async move {
            loop {
                // Some nodes return no logs rather than an error for blocks
                // they have not seen yet, so the tip is checked first
                let head = match provider.get_block_number().await {
                    Ok(head) => head,
                    Err(err) => {
                        return Some((Err(ExchangeError::from(err)), (provider, block_number)));
                    }
                };
                if head < block_number {
                    sleep(provider.client().poll_interval()).await;
                    continue;
                }

                let filter = Filter::new()
                    .address(order_book)
                    .from_block(block_number)
                    .to_block(block_number);
                return match provider.get_logs(&filter).await {
                    Ok(logs) => {
                        let events = BlockEvents {
                            block_number,
                            events: logs.iter().map(decode).collect(),
                        };
                        Some((Ok(events), (provider, block_number + 1)))
                    }
                    Err(err) => Some((Err(ExchangeError::from(err)), (provider, block_number))),
                };
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use alloy::{
        primitives::{LogData, U64, U256, b256},
        providers::ProviderBuilder,
        sol_types::SolEvent,
        transports::mock::Asserter,
    };
    use futures::StreamExt;

    use super::*;
    use crate::{abi::order_book::OrderBook, error::ProviderError, testing::MAKER};

    const ORDER_BOOK: Address = Address::with_last_byte(0x0B);

    fn log(block_number: u64, data: LogData) -> Log {
        Log {
            inner: alloy::primitives::Log {
                address: ORDER_BOOK,
                data,
            },
            block_number: Some(block_number),
            ..Default::default()
        }
    }

    async fn no_wait(_: Duration) {}

    #[tokio::test]
    async fn test_blocks_are_continuous_and_decoded() {
        let asserter = Asserter::new();
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_mocked_client(asserter.clone());

        // Block 10 is not mined yet on the first poll
        asserter.push_success(&U64::from(9));
        asserter.push_success(&U64::from(10));
        let cancel = OrderBook::Cancel {
            owner: MAKER,
            isBid: true,
            id: U256::from(3),
        };
        asserter.push_success(&vec![log(10, cancel.encode_log_data())]);

        asserter.push_success(&U64::from(12));
        asserter.push_success(&Vec::<Log>::new());

        let unknown = b256!("0x1111111111111111111111111111111111111111111111111111111111111111");
        asserter.push_success(&U64::from(12));
        let data = LogData::new_unchecked(vec![unknown], Default::default());
        asserter.push_success(&vec![log(12, data)]);

        let blocks = book_events(ORDER_BOOK, provider, 10, no_wait)
            .take(3)
            .collect::<Vec<_>>()
            .await;

        let block = blocks[0].as_ref().unwrap();
        assert_eq!(block.block_number(), 10);
        assert!(block.changes_book());
        assert!(matches!(
            block.events(),
            [BookEvent::Known(OrderBookEvents::Cancel(c))]
                if c.owner == MAKER && c.isBid && c.id == U256::from(3)
        ));

        let block = blocks[1].as_ref().unwrap();
        assert_eq!(block.block_number(), 11);
        assert!(!block.changes_book());

        let block = blocks[2].as_ref().unwrap();
        assert_eq!(block.block_number(), 12);
        assert!(block.changes_book());
        assert!(matches!(
            block.events(),
            [BookEvent::Unrecognized(Some(topic))] if *topic == unknown
        ));
    }

    #[tokio::test]
    async fn test_failed_poll_retries_same_block() {
        let asserter = Asserter::new();
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_mocked_client(asserter.clone());

        asserter.push_failure_msg("node unavailable");
        asserter.push_success(&U64::from(5));
        asserter.push_success(&Vec::<Log>::new());

        let blocks = book_events(ORDER_BOOK, provider, 5, no_wait)
            .take(2)
            .collect::<Vec<_>>()
            .await;

        assert!(matches!(blocks[0], Err(ProviderError::Transport(_))));
        assert_eq!(blocks[1].as_ref().unwrap().block_number(), 5);
    }
}
