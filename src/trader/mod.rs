//! Order book trading client.
//!
//! [`Trader`] wires the sweep planner to the on-chain collaborators: it reads
//! book snapshots and token metadata, makes sure the order book is allowed to
//! spend the base token, and submits plans as a single `sweepAndMake`
//! transaction. It also exposes the plain `make`, `take` and `cancel` calls.
//!
//! Submission is not retried: if the book moved after the snapshot and the
//! transaction reverts, the error is returned and the caller plans again.


use std::time::Duration;

use alloy::{
    network::{Ethereum, ReceiptResponse},
    primitives::{Address, TxHash, U256},
    providers::{PendingTransactionBuilder, Provider},
};
use tracing::{debug, info, warn};

use crate::{
    Chain,
    abi::{erc20::IERC20Metadata, options::ScholesOption, order_book::OrderBook},
    book::{BookSnapshotBuilder, OrderBookSnapshot, RestingOrder, signed},
    error::{ExchangeError, ProviderError, RevertReason},
    sweep::{self, SweepPlan},
    types::{OrderId, OrderSide, SweepRequest, Timestamp, TradeSide},
};

/// Token the option premium is paid with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseToken {
    pub address: Address,
    pub decimals: u8,
    pub symbol: String,
}

/// Submitted sweep along with the plan it was built from.
#[derive(Clone, Debug)]
pub struct SweepOutcome {
    pub plan: SweepPlan,
    pub tx_hash: TxHash,
    /// Whether an approval had to be sent before the sweep.
    pub approved: bool,
}

/// Approval letting `spender` move `required`, if `allowance` falls short.
fn approval(
    spender: Address,
    allowance: U256,
    required: U256,
) -> Option<IERC20Metadata::approveCall> {
    (allowance < required).then_some(IERC20Metadata::approveCall {
        spender,
        amount: required,
    })
}

/// Trading client bound to one option order book and one signer.
#[derive(Debug)]
pub struct Trader<P> {
    provider: P,
    address: Address,
    order_book: OrderBook::OrderBookInstance<P>,
    options: ScholesOption::ScholesOptionInstance<P>,
    timeout: Duration,
}

impl<P: Provider + Clone> Trader<P> {
    /// Create a new trader.
    ///
    /// `provider` is expected to be able to sign transactions for `address`.
    pub fn new(chain: &Chain, provider: P, address: Address, timeout: Duration) -> Self {
        Self {
            order_book: OrderBook::new(chain.order_book(), provider.clone()),
            options: ScholesOption::new(chain.options(), provider.clone()),
            provider,
            address,
            timeout,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn order_book(&self) -> Address {
        *self.order_book.address()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Snapshot both sides of the order book at the latest block.
    pub async fn snapshot(&self) -> Result<OrderBookSnapshot, ExchangeError> {
        let snapshot = BookSnapshotBuilder::new(self.order_book(), self.provider.clone())
            .build()
            .await?;
        debug!(
            block = snapshot.instant().block_number(),
            bids = snapshot.bids().len(),
            offers = snapshot.offers().len(),
            "order book snapshot taken"
        );
        Ok(snapshot)
    }

    /// Base token of the option traded in the book.
    pub async fn base_token(&self) -> Result<BaseToken, ExchangeError> {
        let short_option_id = self.short_option_id().await?;
        let address = self.options.getBaseToken(short_option_id).call().await?;

        let token = IERC20Metadata::new(address, self.provider.clone());
        let (decimals_call, symbol_call) = (token.decimals(), token.symbol());
        let (decimals, symbol) = futures::try_join!(
            decimals_call.call().into_future(),
            symbol_call.call().into_future(),
        )
        .map_err(ExchangeError::from)?;

        Ok(BaseToken {
            address,
            decimals,
            symbol,
        })
    }

    /// Collateral, in base token units, required to write `amount` of the option.
    pub async fn collateral_requirement(&self, amount: U256) -> Result<U256, ExchangeError> {
        let short_option_id = self.short_option_id().await?;
        Ok(self
            .options
            .collateralRequirement(amount, short_option_id, true)
            .call()
            .await?)
    }

    /// Plan a sweep against a fresh snapshot without submitting it.
    pub async fn plan(&self, request: &SweepRequest) -> Result<SweepPlan, ExchangeError> {
        let (snapshot, base) = futures::try_join!(self.snapshot(), self.base_token())?;
        let plan = sweep::plan(
            request,
            snapshot.side(request.side().taking_side()),
            base.decimals,
        )?;
        debug!(?plan, "sweep planned");
        Ok(plan)
    }

    /// Buy `amount` at up to `limit_price`, resting the remainder as a bid
    /// for `expiration_offset` seconds.
    pub async fn buy(
        &self,
        amount: U256,
        limit_price: U256,
        expiration_offset: u64,
        now: Timestamp,
    ) -> Result<SweepOutcome, ExchangeError> {
        self.sweep(TradeSide::Buy, amount, limit_price, expiration_offset, now)
            .await
    }

    /// Sell (write) `amount` at no less than `limit_price`, resting the remainder
    /// as an offer for `expiration_offset` seconds.
    pub async fn sell(
        &self,
        amount: U256,
        limit_price: U256,
        expiration_offset: u64,
        now: Timestamp,
    ) -> Result<SweepOutcome, ExchangeError> {
        self.sweep(TradeSide::Sell, amount, limit_price, expiration_offset, now)
            .await
    }

    async fn sweep(
        &self,
        side: TradeSide,
        amount: U256,
        limit_price: U256,
        expiration_offset: u64,
        now: Timestamp,
    ) -> Result<SweepOutcome, ExchangeError> {
        let request =
            SweepRequest::new(side, amount, limit_price, expiration_offset, self.address, now);
        let (snapshot, base) = futures::try_join!(self.snapshot(), self.base_token())?;
        let plan = sweep::plan(&request, snapshot.side(side.taking_side()), base.decimals)?;
        info!(
            ?side,
            takes = plan.takes().len(),
            taken = %plan.taken_amount(),
            residual = ?plan.residual().map(|r| r.amount()),
            authorization = %plan.required_authorization(),
            symbol = %base.symbol,
            "sweep planned"
        );

        let approved = match side {
            TradeSide::Buy => {
                self.assure_authorized(&base, plan.required_authorization())
                    .await?
            }
            TradeSide::Sell => false,
        };
        let tx_hash = self.sweep_and_make(&plan).await?;

        Ok(SweepOutcome {
            plan,
            tx_hash,
            approved,
        })
    }

    /// Make sure the order book may spend at least `amount` of the token on
    /// behalf of the trader, sending an approval for exactly `amount` otherwise.
    ///
    /// Returns whether an approval was sent.
    pub async fn assure_authorized(
        &self,
        token: &BaseToken,
        amount: U256,
    ) -> Result<bool, ExchangeError> {
        let instance = IERC20Metadata::new(token.address, self.provider.clone());
        let allowance = instance
            .allowance(self.address, self.order_book())
            .call()
            .await?;
        let Some(approve) = approval(self.order_book(), allowance, amount) else {
            debug!(%allowance, %amount, symbol = %token.symbol, "allowance sufficient");
            return Ok(false);
        };

        warn!(%allowance, %amount, symbol = %token.symbol, "allowance insufficient, approving");
        let pending = instance.call_builder(&approve).send().await?;
        self.confirm(pending, "approve").await?;
        Ok(true)
    }

    /// Submit the plan as a single `sweepAndMake` call.
    pub async fn sweep_and_make(&self, plan: &SweepPlan) -> Result<TxHash, ExchangeError> {
        let pending = self
            .order_book
            .call_builder(&plan.to_call())
            .send()
            .await?;
        self.confirm(pending, "sweepAndMake").await
    }

    /// Post a resting order without taking anything.
    pub async fn make(
        &self,
        side: OrderSide,
        amount: U256,
        price: U256,
        expiration: Timestamp,
    ) -> Result<TxHash, ExchangeError> {
        if amount.is_zero() {
            return Err(ExchangeError::InvalidRequest(
                "order amount must be positive".to_string(),
            ));
        }
        let pending = self
            .order_book
            .make(
                signed(amount, side == OrderSide::Offer),
                price,
                U256::from(expiration),
            )
            .send()
            .await?;
        self.confirm(pending, "make").await
    }

    /// Take `percent` of a single resting order from the given side.
    pub async fn take(
        &self,
        order: &RestingOrder,
        side: OrderSide,
        percent: u8,
    ) -> Result<TxHash, ExchangeError> {
        let take = order.take_fraction(side, percent);
        let pending = self
            .order_book
            .take(take.id, take.amount, take.price)
            .send()
            .await?;
        self.confirm(pending, "take").await
    }

    /// Cancel one of the trader's own resting orders.
    pub async fn cancel(&self, side: OrderSide, order_id: OrderId) -> Result<TxHash, ExchangeError> {
        let pending = self
            .order_book
            .cancel(side.is_bid(), U256::from(order_id))
            .send()
            .await?;
        self.confirm(pending, "cancel").await
    }

    async fn short_option_id(&self) -> Result<U256, ExchangeError> {
        let long_option_id = self.order_book.longOptionId().call().await?;
        Ok(self.options.getOpposite(long_option_id).call().await?)
    }

    async fn confirm(
        &self,
        pending: PendingTransactionBuilder<Ethereum>,
        call: &'static str,
    ) -> Result<TxHash, ExchangeError> {
        let tx_hash = *pending.tx_hash();
        debug!(%tx_hash, call, "transaction sent");
        let receipt = pending
            .with_timeout(Some(self.timeout))
            .get_receipt()
            .await?;
        if !ReceiptResponse::status(&receipt) {
            warn!(%tx_hash, call, "transaction reverted");
            return Err(ProviderError::Reverted(Box::new(RevertReason::Unknown)));
        }
        info!(
            %tx_hash,
            call,
            block = ?ReceiptResponse::block_number(&receipt),
            "transaction confirmed"
        );
        Ok(tx_hash)
    }
}
