use alloy::primitives::{I256, U256};
use scholes_sdk::{
    book::{BookSide, RestingOrder},
    num,
    sweep::{self, SweepError, SweepPlan},
    testing::{self, MAKER, NEVER, OrderBuilder, TAKER, offers, wad},
    types::{OrderId, OrderSide, SweepRequest, TradeSide},
};

const NOW: u64 = 1_700_000_000;
const OFFSET: u64 = 86_400;
const ROUNDS: u64 = 500;

/// Deterministic generator for books and requests.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0 >> 33
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }

    /// Quantity with four decimals, between 0.0001 and 10.
    fn quantity(&mut self) -> U256 {
        U256::from(self.below(100_000) + 1) * U256::from(100_000_000_000_000u64)
    }

    fn price(&mut self) -> U256 {
        wad(90 + self.below(20))
    }

    fn order(&mut self, id: OrderId) -> RestingOrder {
        let expiration = match self.below(4) {
            0 => NOW - 1 - self.below(100),
            1 => NOW + self.below(100),
            _ => NEVER,
        };
        let owner = if self.below(5) == 0 { TAKER } else { MAKER };
        OrderBuilder::new(id)
            .amount(self.quantity())
            .price(self.price())
            .expiration(expiration)
            .owner(owner)
            .build()
    }

    fn book(&mut self, side: OrderSide) -> BookSide {
        let len = self.below(16);
        testing::side(side, (0..len).map(|id| self.order(id)).collect())
    }

    fn request(&mut self, side: TradeSide) -> SweepRequest {
        let amount = U256::from(self.below(6) + 1) * self.quantity();
        SweepRequest::new(side, amount, self.price(), OFFSET, TAKER, NOW)
    }

    fn decimals(&mut self) -> u8 {
        [6, 8, 18][self.below(3) as usize]
    }
}

fn is_eligible(request: &SweepRequest, order: &RestingOrder) -> bool {
    request.accepts_price(order.price())
        && !order.is_expired(request.now())
        && order.owner() != request.trader()
}

/// Plans random sweeps and hands each one to `check` along with its inputs.
fn for_random_plans(seed: u64, mut check: impl FnMut(&SweepRequest, &BookSide, u8, &SweepPlan)) {
    let mut rng = Lcg(seed);
    for round in 0..ROUNDS {
        let side = if round % 2 == 0 {
            TradeSide::Buy
        } else {
            TradeSide::Sell
        };
        let book = rng.book(side.taking_side());
        let request = rng.request(side);
        let decimals = rng.decimals();
        let plan = sweep::plan(&request, &book, decimals).unwrap();
        check(&request, &book, decimals, &plan);
    }
}

#[test]
fn test_conservation() {
    for_random_plans(1, |request, _, _, plan| {
        let residual = plan.residual().map(|r| r.amount()).unwrap_or_default();
        assert_eq!(plan.taken_amount() + residual, request.amount());
        assert!(plan.residual().is_none_or(|r| !r.amount().is_zero()));
    });
}

#[test]
fn test_takes_are_eligible_and_within_order_amount() {
    for_random_plans(2, |request, book, _, plan| {
        for take in plan.takes() {
            let order = book.get(take.order_id()).unwrap();
            assert!(is_eligible(request, order), "ineligible take {take:?}");
            assert_ne!(order.owner(), TAKER);
            assert!(order.expiration() >= NOW);
            assert_eq!(take.price(), order.price());
            assert!(!take.amount().is_zero());
            assert!(take.amount() <= order.amount());
        }
    });
}

#[test]
fn test_takes_in_descending_id_order() {
    for_random_plans(3, |_, _, _, plan| {
        let ids = plan.takes().iter().map(|t| t.order_id()).collect::<Vec<_>>();
        assert!(ids.windows(2).all(|w| w[0] > w[1]), "ids {ids:?}");
    });
}

#[test]
fn test_fill_direction_follows_trade_side() {
    for_random_plans(4, |request, _, _, plan| {
        for take in plan.to_take_orders() {
            match request.side() {
                TradeSide::Buy => assert!(take.amount > I256::ZERO),
                TradeSide::Sell => assert!(take.amount < I256::ZERO),
            }
        }
        assert_eq!(plan.is_bid(), request.side() == TradeSide::Buy);
    });
}

#[test]
fn test_residual_rests_at_limit() {
    for_random_plans(5, |request, _, _, plan| {
        let make = plan.to_make_order();
        match plan.residual() {
            Some(residual) => {
                assert_eq!(residual.price(), request.limit_price());
                assert_eq!(residual.expiration(), NOW + OFFSET);
                assert_eq!(make.amount.unsigned_abs(), residual.amount());
                assert_eq!(make.price, request.limit_price());
            }
            None => assert_eq!(make.amount, I256::ZERO),
        }
    });
}

#[test]
fn test_better_priced_orders_are_fully_taken() {
    for_random_plans(6, |request, book, _, plan| {
        let Some(worst) = plan.takes().iter().map(|t| t.price()).reduce(|a, b| match request.side() {
            TradeSide::Buy => a.max(b),
            TradeSide::Sell => a.min(b),
        }) else {
            return;
        };
        let better = |price: U256| match request.side() {
            TradeSide::Buy => price < worst,
            TradeSide::Sell => price > worst,
        };

        for order in book
            .orders()
            .iter()
            .filter(|o| is_eligible(request, o) && better(o.price()))
        {
            let take = plan
                .takes()
                .iter()
                .find(|t| t.order_id() == order.id())
                .unwrap_or_else(|| panic!("order {} skipped", order.id()));
            assert_eq!(take.amount(), order.amount());
        }

        // Nothing was left on the table while a residual rests.
        if plan.residual().is_some() {
            let eligible = book.orders().iter().filter(|o| is_eligible(request, o));
            for order in eligible {
                assert!(plan.takes().iter().any(|t| t.order_id() == order.id()));
            }
        }
    });
}

#[test]
fn test_authorization_covers_quote_value() {
    for_random_plans(7, |request, _, decimals, plan| {
        match request.side() {
            TradeSide::Buy => {
                let quote = plan
                    .takes()
                    .iter()
                    .map(|t| num::mul_wad(t.amount(), t.price()).unwrap())
                    .chain(
                        plan.residual()
                            .map(|r| num::mul_wad(r.amount(), r.price()).unwrap()),
                    )
                    .fold(U256::ZERO, |acc, q| acc + q);
                assert_eq!(
                    plan.required_authorization(),
                    num::rescale(quote, num::WAD_DECIMALS, decimals).unwrap()
                );
            }
            TradeSide::Sell => assert_eq!(plan.required_authorization(), U256::ZERO),
        }
    });
}

#[test]
fn test_deterministic() {
    for_random_plans(8, |request, book, decimals, plan| {
        assert_eq!(&sweep::plan(request, book, decimals).unwrap(), plan);
    });
}

#[test]
fn test_empty_book() {
    for side in [TradeSide::Buy, TradeSide::Sell] {
        let request = SweepRequest::new(side, wad(42), wad(3), OFFSET, TAKER, NOW);
        let plan = sweep::plan(&request, &BookSide::empty(side.taking_side()), 18).unwrap();
        assert!(plan.takes().is_empty());
        assert_eq!(plan.residual().map(|r| r.amount()), Some(wad(42)));
    }
}

#[test]
fn test_exact_fill() {
    let book = offers(&[(50, 100), (50, 100)]);
    let request = SweepRequest::new(TradeSide::Buy, wad(100), wad(100), OFFSET, TAKER, NOW);
    let plan = sweep::plan(&request, &book, 18).unwrap();

    let takes = plan.to_take_orders();
    assert_eq!(takes.len(), 2);
    assert_eq!((takes[0].id, takes[0].amount), (U256::from(1), I256::try_from(wad(50)).unwrap()));
    assert_eq!((takes[1].id, takes[1].amount), (U256::ZERO, I256::try_from(wad(50)).unwrap()));
    assert_eq!(plan.residual(), None);
    assert_eq!(plan.required_authorization(), wad(10_000));
}

#[test]
fn test_partial_fill_with_residual() {
    let book = offers(&[(30, 90)]);
    let request = SweepRequest::new(TradeSide::Buy, wad(50), wad(95), OFFSET, TAKER, NOW);
    let plan = sweep::plan(&request, &book, 18).unwrap();

    assert_eq!(plan.takes().len(), 1);
    assert_eq!(plan.takes()[0].amount(), wad(30));
    assert_eq!(plan.takes()[0].price(), wad(90));
    let residual = plan.residual().unwrap();
    assert_eq!((residual.amount(), residual.price()), (wad(20), wad(95)));
}

#[test]
fn test_price_priority() {
    let book = offers(&[(1, 110), (1, 90), (1, 100)]);
    for (amount, expected) in [(1, vec![1]), (2, vec![2, 1]), (3, vec![2, 1, 0])] {
        let request = SweepRequest::new(TradeSide::Buy, wad(amount), wad(110), OFFSET, TAKER, NOW);
        let plan = sweep::plan(&request, &book, 18).unwrap();
        let ids = plan.takes().iter().map(|t| t.order_id()).collect::<Vec<_>>();
        assert_eq!(ids, expected);
    }
}

#[test]
fn test_zero_amount_request() {
    let request = SweepRequest::new(TradeSide::Sell, U256::ZERO, wad(1), OFFSET, TAKER, NOW);
    assert_eq!(
        sweep::plan(&request, &BookSide::empty(OrderSide::Bid), 18),
        Err(SweepError::InvalidRequest)
    );
}
