//! SignVote API - petition signature collection service.
//!
//! Visitors sign once per device. The service:
//! - Accepts signatures and rejects devices that already signed
//! - Shows each device its own signature
//! - Publishes a redacted signature wall and progress toward the goal
//! - Exposes full records and signature images to administrators

pub mod api;
pub mod config;
pub mod error;

pub use config::Config;
pub use error::ApiError;
