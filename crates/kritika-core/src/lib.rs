//! # Kritika Core
//!
//! Shared foundation for the Kritika review-aggregation service.
//!
//! This crate carries the pieces every other Kritika crate agrees on:
//!
//! - [`exception`]: the `ApiError` taxonomy and the crate-wide `Result` alias
//! - [`role`]: the closed set of user roles
//! - [`caller`]: explicit caller identity passed into every operation
//! - [`validators`]: semantic field checks the core re-validates itself
//!   (username pattern, reserved names, score range, release year)

pub mod caller;
pub mod exception;
pub mod role;
pub mod validators;

pub use caller::{AuthUser, Caller};
pub use exception::{ApiError, Result};
pub use role::Role;
