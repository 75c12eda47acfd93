//! Kendra API Library
//!
//! This crate provides the HTTP surface of the cloud-services controllers:
//! the `CloudStorageController`, its axum handlers, error envelopes, request
//! id middleware and application setup.

mod api_doc;
pub mod constants;
pub mod controller;
pub mod error;
mod handlers;
mod middleware;
pub mod setup;
pub mod state;
mod telemetry;
mod utils;

pub use controller::{CloudStorageController, ControllerContext, ResponseEnvelope};
pub use error::{ErrorEnvelope, ErrorObject};
pub use state::AppState;
