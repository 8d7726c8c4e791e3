/// Side of a resting order in the book.
///
/// On-chain the side is encoded by the sign of the order amount:
/// positive for [`OrderSide::Bid`], negative for [`OrderSide::Offer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OrderSide {
    Bid,
    Offer,
}

/// Direction of a trade requested by the trader.
///
/// * [`TradeSide::Buy`] takes resting offers, cheapest first, and rests the
///   remainder as a bid.
/// * [`TradeSide::Sell`] takes resting bids, highest first, and rests the
///   remainder as an offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Value of the `isBid` flag the order book contract expects.
    pub fn is_bid(&self) -> bool {
        matches!(self, OrderSide::Bid)
    }

    pub fn opposite(&self) -> OrderSide {
        match self {
            OrderSide::Bid => OrderSide::Offer,
            OrderSide::Offer => OrderSide::Bid,
        }
    }
}

impl TradeSide {
    /// Side of the book the trade takes liquidity from.
    pub fn taking_side(&self) -> OrderSide {
        match self {
            TradeSide::Buy => OrderSide::Offer,
            TradeSide::Sell => OrderSide::Bid,
        }
    }

    /// Side of the book the unfilled remainder rests on.
    pub fn resting_side(&self) -> OrderSide {
        match self {
            TradeSide::Buy => OrderSide::Bid,
            TradeSide::Sell => OrderSide::Offer,
        }
    }
}

impl From<bool> for OrderSide {
    fn from(is_bid: bool) -> Self {
        if is_bid {
            OrderSide::Bid
        } else {
            OrderSide::Offer
        }
    }
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderSide::Bid => write!(f, "bid"),
            OrderSide::Offer => write!(f, "offer"),
        }
    }
}
