//! Terminal rendering of books and plans.

use alloy::primitives::{Address, U256};
use fastnum::UD256;
use scholes_sdk::{
    book::{BookSide, OrderBookSnapshot, RestingOrder},
    num::Converter,
    sweep::SweepPlan,
    trader::{BaseToken, SweepOutcome},
    types::{OrderSide, Timestamp},
};

fn wad(value: U256) -> UD256 {
    Converter::wad().from_unsigned::<4>(value).reduce()
}

fn print_order(order: &RestingOrder, now: Timestamp, trader: Address) {
    let expiry = if order.is_expired(now) {
        format!("{} (EXPIRED)", order.expiration())
    } else {
        format!("{} (+{}s)", order.expiration(), order.expiration() - now)
    };
    let mine = if order.owner() == trader { " *" } else { "" };

    println!(
        "{:>6} │ {:>20} │ {:>20} │ {}{}",
        order.id(),
        format!("{}", wad(order.price())),
        format!("{}", wad(order.amount())),
        expiry,
        mine,
    );
}

fn print_side(side: &BookSide, depth: usize, now: Timestamp, trader: Address) {
    let title = match side.side() {
        OrderSide::Bid => "BIDS",
        OrderSide::Offer => "OFFERS",
    };
    println!("{:^80}", title);
    println!("{:-^80}", "");
    println!(
        "{:>6} │ {:>20} │ {:>20} │ {}",
        "Id", "Price", "Amount", "Expiration"
    );
    println!("{:-^80}", "");

    let count = if depth == 0 { side.len() } else { depth.min(side.len()) };
    let orders: Vec<_> = side.by_priority().take(count).collect();
    match side.side() {
        // Lowest offer closest to the spread
        OrderSide::Offer => orders
            .iter()
            .rev()
            .for_each(|o| print_order(o, now, trader)),
        OrderSide::Bid => orders.iter().for_each(|o| print_order(o, now, trader)),
    }
    if side.len() > count {
        println!("       ... and {} more orders", side.len() - count);
    }
}

pub fn print_book(snapshot: &OrderBookSnapshot, depth: usize, trader: Address) {
    let instant = snapshot.instant();
    let now = instant.block_timestamp();

    println!(
        "\n{:=^80}",
        format!(
            " OPTION {} │ BLOCK {} ",
            snapshot.long_option_id(),
            instant.block_number()
        )
    );
    print_side(snapshot.offers(), depth, now, trader);

    match (snapshot.spread(), snapshot.bids().best(), snapshot.offers().best()) {
        (Some(spread), Some((bid, bid_amount)), Some((ask, ask_amount))) => println!(
            "{:=^80}",
            format!(
                " SPREAD: {} | Best Bid: {} ({}) | Best Offer: {} ({}) ",
                wad(spread),
                wad(bid),
                wad(bid_amount),
                wad(ask),
                wad(ask_amount)
            )
        ),
        _ => println!("{:=^80}", " NO SPREAD (empty side) "),
    }

    print_side(snapshot.bids(), depth, now, trader);

    let mine: Vec<_> = [snapshot.bids(), snapshot.offers()]
        .into_iter()
        .flat_map(|side| side.owned_by(trader).map(move |o| (side.side(), o)))
        .collect();
    if !mine.is_empty() {
        println!("{:-^80}", " YOUR ORDERS ");
        for (side, order) in mine {
            print!("{:>6} ", side.to_string());
            print_order(order, now, trader);
        }
    }
    println!("{:=^80}", "");
    println!(
        "Total: {} bids ({}) │ {} offers ({}) │ * = yours",
        snapshot.bids().len(),
        wad(snapshot.bids().total_amount()),
        snapshot.offers().len(),
        wad(snapshot.offers().total_amount()),
    );
}

pub fn print_plan(plan: &SweepPlan, base: &BaseToken) {
    println!("\n{:=^80}", format!(" {:?} PLAN ", plan.side()).to_uppercase());
    for take in plan.takes() {
        println!(
            "take #{:<6} {:>20} @ {}",
            take.order_id(),
            format!("{}", wad(take.amount())),
            wad(take.price())
        );
    }
    match plan.residual() {
        Some(residual) => println!(
            "rest         {:>20} @ {} until {}",
            format!("{}", wad(residual.amount())),
            wad(residual.price()),
            residual.expiration()
        ),
        None => println!("rest         nothing"),
    }
    println!("{:-^80}", "");
    println!(
        "Taken: {} │ Authorization: {} {}",
        wad(plan.taken_amount()),
        Converter::new(base.decimals)
            .from_unsigned::<4>(plan.required_authorization())
            .reduce(),
        base.symbol,
    );
}

pub fn print_outcome(outcome: &SweepOutcome, base: &BaseToken) {
    print_plan(&outcome.plan, base);
    if outcome.approved {
        println!("Approved {} spending", base.symbol);
    }
    println!("Transaction: {}", outcome.tx_hash);
}

pub fn print_collateral(collateral: U256, base: &BaseToken) {
    println!(
        "Collateral to write: {} {}",
        Converter::new(base.decimals)
            .from_unsigned::<4>(collateral)
            .reduce(),
        base.symbol,
    );
}
