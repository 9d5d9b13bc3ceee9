//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Acquires one pooled connection per call, released on drop
//! - Maps constraint violations instead of checking before insert

pub mod members;

pub use members::PgMemberStore;
