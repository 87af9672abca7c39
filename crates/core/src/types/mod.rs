//! Core types for Mashtal.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod phone;
pub mod status;

pub use id::*;
pub use phone::{Phone, PhoneError};
pub use status::*;
