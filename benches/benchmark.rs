use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rust_decimal::Decimal;

use matchbook::orderbook::OrderBook;
use matchbook::orders::{Order, OrderType, Side};

fn setup_order_book(depth: u32, orders_per_level: u32) -> OrderBook {
    let mut ob = OrderBook::new();
    for price in 1..=depth {
        for _ in 0..orders_per_level {
            let mut ask = Order::new(
                OrderType::Limit,
                Side::Sell,
                Decimal::ONE,
                "BTC-USDT",
                Decimal::from(depth + price),
            );
            ob.process(&mut ask);
            let mut bid = Order::new(
                OrderType::Limit,
                Side::Buy,
                Decimal::ONE,
                "BTC-USDT",
                Decimal::from(price),
            );
            ob.process(&mut bid);
        }
    }
    ob
}

fn bench_process_order(c: &mut Criterion) {
    let depth = 100;
    let orders_per_level = 10;

    c.bench_function("match 1 market order", |b| {
        b.iter_batched(
            || setup_order_book(depth, orders_per_level),
            |mut ob| {
                let mut market_buy = Order::new(
                    OrderType::Market,
                    Side::Buy,
                    Decimal::from(depth * orders_per_level / 2),
                    "BTC-USDT",
                    Decimal::ZERO,
                );
                ob.process(&mut market_buy)
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("match 1 crossing limit order", |b| {
        b.iter_batched(
            || setup_order_book(depth, orders_per_level),
            |mut ob| {
                let mut limit_sell = Order::new(
                    OrderType::Limit,
                    Side::Sell,
                    Decimal::from(depth * orders_per_level),
                    "BTC-USDT",
                    Decimal::from(depth / 2),
                );
                ob.process(&mut limit_sell)
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("rest 1 limit order", |b| {
        b.iter_batched(
            || setup_order_book(depth, orders_per_level),
            |mut ob| {
                let mut deep_bid = Order::new(
                    OrderType::Limit,
                    Side::Buy,
                    Decimal::ONE,
                    "BTC-USDT",
                    Decimal::ONE,
                );
                ob.process(&mut deep_bid)
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_process_order);
criterion_main!(benches);
