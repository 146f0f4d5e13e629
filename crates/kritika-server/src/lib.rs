//! # Kritika Server
//!
//! HTTP front end for the Kritika review-aggregation API: settings, the URL
//! table, request dispatch and the shared application state. The binary in
//! `main.rs` wires these to a hyper accept loop.

pub mod config;
pub mod handler;
pub mod routes;
pub mod state;

pub use config::{MailBackendKind, Settings};
pub use handler::{dispatch, handle, status_of};
pub use routes::{Route, resolve};
pub use state::AppState;
