use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_stream::{wrappers::ReceiverStream, Stream, StreamExt};
use tracing::info;

use crate::errors::OrderRejection;
use crate::events::L2Update;
use crate::orders::{Order, OrderType, Side};
use crate::sink::{ChannelSink, SinkRegistry};
use crate::state::AppState;
use crate::trade::Trade;

/// Events buffered per feed connection before the consumer counts as stuck.
const FEED_BUFFER: usize = 256;

/// Request payload for `POST /orders`.
///
/// `side` and `order_type` arrive as wire strings (`buy`/`sell`,
/// `market`/`limit`/`ioc`/`fok`); anything else is rejected here, before
/// the engine is touched. `price` is required for non-market types and
/// ignored for market orders.
#[derive(Deserialize)]
pub struct NewOrder {
    pub symbol: String,
    pub side: String,
    pub order_type: String,
    pub quantity: Decimal,
    pub price: Option<Decimal>,
}

/// Response for `POST /orders`: the assigned id plus any immediate fills.
#[derive(Serialize, Deserialize)]
pub struct OrderAck {
    pub order_id: u64,
    pub trades: Vec<Trade>,
}

/// `POST /orders`
///
/// Validates the submission contract and hands the order to the engine.
/// *Success:* 200 with an [`OrderAck`].
/// *Rejection:* 400 with `{ "error": ... }` — unknown side or type,
/// non-positive quantity, or a missing/non-positive price on a priced type.
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<NewOrder>,
) -> Result<Json<OrderAck>, OrderRejection> {
    let side: Side = payload.side.parse()?;
    let order_type: OrderType = payload.order_type.parse()?;
    if payload.quantity <= Decimal::ZERO {
        return Err(OrderRejection::NonPositiveQuantity);
    }
    let price = payload.price.unwrap_or(Decimal::ZERO);
    if order_type != OrderType::Market && price <= Decimal::ZERO {
        return Err(OrderRejection::MissingPrice(order_type.to_string()));
    }

    let mut order = Order::new(order_type, side, payload.quantity, payload.symbol, price);
    let order_id = order.id();
    let trades = state.engine.lock().unwrap().submit(&mut order);
    info!(order_id, fills = trades.len(), "order accepted");

    Ok(Json(OrderAck { order_id, trades }))
}

/// `GET /book/{symbol}`
///
/// Current visible book state in the `l2update` payload shape; an empty
/// snapshot for symbols that have not traded yet.
pub async fn get_book(
    Path(symbol): Path<String>,
    State(state): State<AppState>,
) -> Json<L2Update> {
    let engine = state.engine.lock().unwrap();
    Json(engine.snapshot(&symbol))
}

/// `GET /feed/trades` — server-sent events, one frame per execution.
pub async fn trade_feed(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("client connected to trade feed");
    feed_stream(&state.trade_feed)
}

/// `GET /feed/marketdata` — server-sent events, one frame per visible book
/// change.
pub async fn market_data_feed(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("client connected to market data feed");
    feed_stream(&state.market_data_feed)
}

/// Registers a channel-backed sink on `registry` and adapts the receiving
/// end into an SSE stream. Dropping the connection closes the channel, which
/// makes the sink unwritable and gets it evicted on the next broadcast.
fn feed_stream(
    registry: &Arc<SinkRegistry>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (tx, rx) = mpsc::channel::<Vec<u8>>(FEED_BUFFER);
    registry.attach(Arc::new(ChannelSink::new(tx)));

    let stream = ReceiverStream::new(rx).map(|payload| {
        Ok::<_, Infallible>(Event::default().data(String::from_utf8_lossy(&payload).into_owned()))
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Builds the application router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/orders", post(create_order))
        .route("/book/{symbol}", get(get_book))
        .route("/feed/trades", get(trade_feed))
        .route("/feed/marketdata", get(market_data_feed))
        .with_state(state)
}
