use std::collections::HashMap;
use std::sync::Arc;

use tracing::{error, info};

use crate::events::{FeedEvent, L2Update, DEPTH_LEVELS};
use crate::orderbook::OrderBook;
use crate::orders::{Order, Side};
use crate::sink::SinkRegistry;
use crate::trade::Trade;

/// Routes orders to per-symbol books and publishes the resulting events.
///
/// One book per symbol, created lazily on first use and kept for the process
/// lifetime; symbol strings are used verbatim as keys. Submission is
/// serialized by the caller (the engine lives behind a mutex in
/// [`crate::state::AppState`]), which gives the ordering guarantee that all
/// events of one submit are fanned out before any event of the next.
///
/// The sink registries are shared out as `Arc`s so subscribers can attach
/// without contending with matching.
pub struct MatchingEngine {
    books: HashMap<String, OrderBook>,
    trade_feed: Arc<SinkRegistry>,
    market_data_feed: Arc<SinkRegistry>,
}

impl MatchingEngine {
    pub fn new() -> Self {
        Self {
            books: HashMap::new(),
            trade_feed: Arc::new(SinkRegistry::new()),
            market_data_feed: Arc::new(SinkRegistry::new()),
        }
    }

    /// Handle for subscribing trade feed consumers.
    pub fn trade_feed(&self) -> Arc<SinkRegistry> {
        Arc::clone(&self.trade_feed)
    }

    /// Handle for subscribing market data consumers.
    pub fn market_data_feed(&self) -> Arc<SinkRegistry> {
        Arc::clone(&self.market_data_feed)
    }

    /// Read access to a symbol's book, if it exists yet.
    pub fn book(&self, symbol: &str) -> Option<&OrderBook> {
        self.books.get(symbol)
    }

    /// Visible book state for `symbol`; an empty payload when no order for
    /// that symbol has been seen yet.
    pub fn snapshot(&self, symbol: &str) -> L2Update {
        match self.books.get(symbol) {
            Some(book) => L2Update::from_book(symbol, book),
            None => L2Update::empty(symbol),
        }
    }

    /// Matches one order against its symbol's book and returns the trades.
    ///
    /// Every trade is published to the trade feed in execution order. One
    /// `l2update` follows iff the top-[`DEPTH_LEVELS`] (price, quantity)
    /// sequence of either side changed; churn below the visible depth stays
    /// silent.
    pub fn submit(&mut self, order: &mut Order) -> Vec<Trade> {
        let symbol = order.symbol().to_string();
        let book = self.books.entry(symbol.clone()).or_default();

        let bids_before = book.depth(DEPTH_LEVELS, Side::Buy);
        let asks_before = book.depth(DEPTH_LEVELS, Side::Sell);

        let trades = book.process(order);

        let depth_changed = book.depth(DEPTH_LEVELS, Side::Buy) != bids_before
            || book.depth(DEPTH_LEVELS, Side::Sell) != asks_before;
        let update = depth_changed.then(|| L2Update::from_book(&symbol, book));

        if !trades.is_empty() {
            info!(
                symbol = %symbol,
                taker_order_id = order.id(),
                executions = trades.len(),
                "order matched"
            );
            for trade in &trades {
                emit(&self.trade_feed, &FeedEvent::Trade(trade.clone()));
            }
        }
        if let Some(update) = update {
            emit(&self.market_data_feed, &FeedEvent::L2Update(update));
        }

        trades
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializes an event once and fans the same buffer out to every sink.
fn emit(registry: &SinkRegistry, event: &FeedEvent) {
    match serde_json::to_vec(event) {
        Ok(payload) => registry.broadcast(&payload),
        Err(e) => error!(error = %e, "failed to serialize feed event"),
    }
}
