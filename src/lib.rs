// src/lib.rs

//! Real-time two-party messaging core: authenticated WebSocket connections,
//! an online-user directory, chat-room membership tracking, message fan-out
//! and read-receipt propagation. Message persistence lives behind the
//! [`storage::ChatStore`] port.

pub mod auth;
pub mod bus;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod presence;
pub mod rooms;
pub mod state;
pub mod storage;
pub mod websocket;

pub use config::Config;
pub use error::ChatError;
pub use state::AppState;
