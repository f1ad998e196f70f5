//! Tubely API Library
//!
//! HTTP handlers, authentication and application setup for the video and
//! thumbnail upload service.

mod api_doc;
pub mod constants;
mod handlers;
mod services;
pub mod setup;
mod telemetry;
mod utils;

pub mod auth;
pub mod error;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use services::sign_video;
