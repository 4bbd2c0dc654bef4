//! HTTP server for the reaction-time leaderboard.
//!
//! A thin JSON adapter over [`rtb_engine::Leaderboard`]: list the board,
//! submit a result, and reserve a code ahead of submission. Also hosts the
//! built frontend and applies CORS.

pub mod config;
pub mod error;
pub mod handler;
pub mod observer;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ApiError, ServerError, ServerResult};
pub use handler::{AppState, CodeResponse, EntryView, HealthResponse, SubmitResponse};
pub use observer::TracingDropObserver;
pub use router::build_router;
pub use server::BoardServer;
