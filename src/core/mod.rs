//! Core types shared by every resolution phase.
//!
//! - [`error`]: the [`ConfigError`] type and user-facing [`ErrorContext`]
//! - [`similarity`]: "did you mean" hints for dangling references

pub mod error;
pub mod similarity;

pub use error::{ConfigError, ErrorContext, user_friendly_error};
pub use similarity::closest_match;
