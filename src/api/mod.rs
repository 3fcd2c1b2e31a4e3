//! Excel Generator API module
//!
//! HTTP surface of the service: status endpoints, workbook generation and
//! the JSON 404 fallback.

pub mod handlers;
pub mod server;

pub use server::{run_until_signal, AppContext, RunningServer, ServerConfig};
