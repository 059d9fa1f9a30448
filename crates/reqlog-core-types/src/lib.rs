//! Core types shared across reqlog facilities
//!
//! This crate provides foundational types used by both error handling
//! and logging facilities:
//!
//! - **Correlation types**: RequestId and the IdGenerator provider trait
//! - **Schema constants**: Canonical field keys

pub mod correlation;
pub mod schema;

pub use correlation::{IdGenerator, RequestId, UuidV7Ids};
