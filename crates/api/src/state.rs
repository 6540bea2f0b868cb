use std::sync::Arc;

use dealdrop_dispatch::{HttpPushGateway, MentionFanout, PgNotificationStore, QueueDrainer};

/// The production drainer: Postgres store, HTTP push gateway.
pub type Drainer = QueueDrainer<PgNotificationStore, HttpPushGateway>;

/// The production mention fan-out: same store and gateway.
pub type Fanout = MentionFanout<PgNotificationStore, HttpPushGateway>;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`. Cheaply cloneable.
#[derive(Clone)]
pub struct AppState {
    pub drainer: Arc<Drainer>,
    pub fanout: Arc<Fanout>,
}
