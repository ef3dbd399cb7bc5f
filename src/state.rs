use std::sync::{Arc, Mutex};

use crate::engine::MatchingEngine;
use crate::sink::SinkRegistry;

/// Shared application state.
///
/// The engine sits behind a mutex: `submit` is a blocking, CPU-bound call
/// and exactly one runs at a time, which is what gives the feed its
/// cross-submit ordering guarantee. The two feed registries are cloned out
/// of the engine so subscription endpoints never take the engine lock.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Mutex<MatchingEngine>>,
    pub trade_feed: Arc<SinkRegistry>,
    pub market_data_feed: Arc<SinkRegistry>,
}

impl AppState {
    pub fn new() -> Self {
        let engine = MatchingEngine::new();
        let trade_feed = engine.trade_feed();
        let market_data_feed = engine.market_data_feed();
        Self {
            engine: Arc::new(Mutex::new(engine)),
            trade_feed,
            market_data_feed,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
