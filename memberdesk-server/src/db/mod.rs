//! Record store - member table access
//!
//! # Design Principles
//!
//! - Connection pool, one scoped acquisition per operation
//! - Every statement autocommits, no multi-statement transactions
//! - Rely on DB constraints, map violations - no check-then-insert
//! - Backends sit behind the `MemberStore` trait

pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repos;
pub mod store;

pub use memory::MemoryMemberStore;
pub use pool::create_pool;
pub use repos::PgMemberStore;
pub use store::{MemberStore, StoreError};
