mod app;
mod http;
mod room;
mod signaling;

pub use app::{AppState, RelayConfig, router, serve, serve_on};
pub use http::{ConnectionAck, ConnectionOffer};
pub use room::{Room, RoomCommand, RoomManager};
pub use signaling::{SignalingOutput, SignalingService, ws_handler};
