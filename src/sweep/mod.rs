//! Sweep planning.
//!
//! Given a snapshot of the side of the book opposite to the trade, [`plan`]
//! decides which resting orders to take, what remains to be posted as a new
//! resting order, and how much of the base token the order book has to be
//! authorized to spend. The result is submitted as a single
//! `sweepAndMake` transaction.
//!
//! Planning is a pure computation over the snapshot: no IO, no clock reads,
//! no logging. A plan is valid only against the snapshot it was derived from,
//! if the book moves before submission the transaction may revert and the
//! caller is expected to plan again from a fresh snapshot.

mod error;


pub use error::{SweepError, SweepResult};

use alloy::primitives::{I256, U256};

use crate::{
    abi::order_book::OrderBook::{MakeOrder, TakeOrder, sweepAndMakeCall},
    book::{BookSide, signed},
    num,
    types::{OrderId, SweepRequest, Timestamp, TradeSide},
};

/// Existing order to take as part of the sweep.
#[derive(Clone, Copy, derive_more::Debug, PartialEq, Eq)]
pub struct Take {
    side: TradeSide,
    order_id: OrderId,
    #[debug("{amount}")]
    amount: U256,
    #[debug("{price}")]
    price: U256,
}

impl Take {
    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    /// Filled quantity, unsigned.
    pub fn amount(&self) -> U256 {
        self.amount
    }

    /// Price of the taken order.
    pub fn price(&self) -> U256 {
        self.price
    }

    /// Filled quantity in the trader's direction: positive when buying,
    /// negative when selling.
    pub fn fill_amount(&self) -> I256 {
        signed(self.amount, self.side == TradeSide::Sell)
    }
}

/// Unfilled remainder posted as a new resting order at the limit price.
#[derive(Clone, Copy, derive_more::Debug, PartialEq, Eq)]
pub struct Residual {
    side: TradeSide,
    #[debug("{amount}")]
    amount: U256,
    #[debug("{price}")]
    price: U256,
    expiration: Timestamp,
}

impl Residual {
    /// Remaining quantity, always positive.
    pub fn amount(&self) -> U256 {
        self.amount
    }

    pub fn price(&self) -> U256 {
        self.price
    }

    pub fn expiration(&self) -> Timestamp {
        self.expiration
    }

    /// Amount in the book's representation: a bid when buying, an offer when selling.
    pub fn signed_amount(&self) -> I256 {
        signed(self.amount, self.side == TradeSide::Sell)
    }
}

/// Orders to take and to post, computed by [`plan`].
#[derive(Clone, derive_more::Debug, PartialEq, Eq)]
pub struct SweepPlan {
    side: TradeSide,
    takes: Vec<Take>,
    residual: Option<Residual>,
    #[debug("{required_authorization}")]
    required_authorization: U256,
}

impl SweepPlan {
    pub fn side(&self) -> TradeSide {
        self.side
    }

    /// Orders to take, in descending order id.
    ///
    /// The order book removes filled orders by shifting the indices after
    /// them, taking higher indices first keeps the lower ones valid within
    /// the same batch.
    pub fn takes(&self) -> &[Take] {
        &self.takes
    }

    pub fn residual(&self) -> Option<&Residual> {
        self.residual.as_ref()
    }

    /// Base token amount, in the token's own decimals, the order book has to be
    /// allowed to spend. Always zero when selling, selling is backed by collateral.
    pub fn required_authorization(&self) -> U256 {
        self.required_authorization
    }

    /// Total quantity filled by the takes.
    pub fn taken_amount(&self) -> U256 {
        self.takes
            .iter()
            .fold(U256::ZERO, |acc, t| acc.saturating_add(t.amount))
    }

    /// Value of the `isBid` argument of `sweepAndMake`.
    pub fn is_bid(&self) -> bool {
        self.side.resting_side().is_bid()
    }

    /// Takes in the order book ABI form, in submission order.
    pub fn to_take_orders(&self) -> Vec<TakeOrder> {
        self.takes
            .iter()
            .map(|t| TakeOrder {
                id: U256::from(t.order_id),
                amount: t.fill_amount(),
                price: t.price,
            })
            .collect()
    }

    /// Residual in the order book ABI form, all-zero when there is nothing to post.
    pub fn to_make_order(&self) -> MakeOrder {
        match &self.residual {
            Some(r) => MakeOrder {
                amount: r.signed_amount(),
                price: r.price,
                expiration: U256::from(r.expiration),
            },
            None => MakeOrder {
                amount: I256::ZERO,
                price: U256::ZERO,
                expiration: U256::ZERO,
            },
        }
    }

    /// The `sweepAndMake` call submitting this plan.
    pub fn to_call(&self) -> sweepAndMakeCall {
        sweepAndMakeCall {
            isBid: self.is_bid(),
            takes: self.to_take_orders(),
            make: self.to_make_order(),
        }
    }
}

/// Plan a sweep of `book` for the given request.
///
/// `book` has to be the side opposite to the trade: offers when buying,
/// bids when selling. `base_decimals` is the number of decimals of the token
/// the buyer pays with.
///
/// Steps:
/// 1. Skip orders priced beyond the limit, expired before `now`, owned by the trader,
///    or of zero amount.
/// 2. Walk the rest in price priority (cheapest offers, highest bids; ties by
///    supplied order) filling `min(remaining, order amount)` until nothing remains.
/// 3. Post whatever remains at the limit price, expiring `expiration_offset` after `now`.
/// 4. When buying, accumulate `fill * price / 1e18` per take plus
///    `remaining * limit / 1e18` for the residual, then rescale the sum once
///    from 18 to `base_decimals`. Truncation happens exactly at these points.
///
/// # Errors
///
/// * [`SweepError::InvalidRequest`] for a zero amount.
/// * [`SweepError::WrongBookSide`] if `book` is not the side the trade takes from.
/// * [`SweepError::Overflow`] if an intermediate value does not fit 256 bits.
pub fn plan(request: &SweepRequest, book: &BookSide, base_decimals: u8) -> SweepResult<SweepPlan> {
    if request.amount().is_zero() {
        return Err(SweepError::InvalidRequest);
    }
    let side = request.side();
    if book.side() != side.taking_side() {
        return Err(SweepError::WrongBookSide {
            expected: side.taking_side(),
            actual: book.side(),
        });
    }

    let eligible = book.by_priority().filter(|order| {
        !order.amount().is_zero()
            && request.accepts_price(order.price())
            && !order.is_expired(request.now())
            && order.owner() != request.trader()
    });

    let mut remaining = request.amount();
    let mut authorization = U256::ZERO;
    let mut takes = vec![];
    for order in eligible {
        let amount = remaining.min(order.amount());
        if side == TradeSide::Buy {
            authorization = add_quote(authorization, amount, order.price())?;
        }
        takes.push(Take {
            side,
            order_id: order.id(),
            amount,
            price: order.price(),
        });
        remaining -= amount;
        if remaining.is_zero() {
            break;
        }
    }

    let residual = if remaining.is_zero() {
        None
    } else {
        if side == TradeSide::Buy {
            authorization = add_quote(authorization, remaining, request.limit_price())?;
        }
        let expiration = request
            .now()
            .checked_add(request.expiration_offset())
            .ok_or(SweepError::Overflow("residual expiration"))?;
        Some(Residual {
            side,
            amount: remaining,
            price: request.limit_price(),
            expiration,
        })
    };

    takes.sort_by(|a, b| b.order_id.cmp(&a.order_id));

    let required_authorization = match side {
        TradeSide::Buy => num::rescale(authorization, num::WAD_DECIMALS, base_decimals)
            .ok_or(SweepError::Overflow("authorization rescale"))?,
        TradeSide::Sell => U256::ZERO,
    };

    Ok(SweepPlan {
        side,
        takes,
        residual,
        required_authorization,
    })
}

fn add_quote(acc: U256, amount: U256, price: U256) -> SweepResult<U256> {
    num::mul_wad(amount, price)
        .and_then(|quote| acc.checked_add(quote))
        .ok_or(SweepError::Overflow("authorization"))
}
