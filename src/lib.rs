pub mod app;
pub mod config;
mod error;
pub mod mailerlite_client;
mod telemetry;
pub mod web;

// re-exports
pub use app::{App, AppState};
pub use error::{Error, Result};
pub use mailerlite_client::MailerLiteClient;
pub use telemetry::{init_dbg_tracing, init_production_tracing};
pub use web::serve;
