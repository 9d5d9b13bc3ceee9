//! memberdesk-server: member registration over HTTP
//!
//! Accepts registration submissions, validates them against a fixed schema
//! and persists one row per submission. Submissions can be read back by id
//! or listed.

pub mod config;
pub mod db;
pub mod http;
pub mod models;

pub use config::{ConfigError, StoreConfig};
pub use db::{MemberStore, MemoryMemberStore, PgMemberStore, StoreError};
pub use http::{build_router, run_server, AppState, ServerConfig};
pub use models::{Member, MemberSubmission, ValidationErrors};
