//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **upstream**: reqwest-backed client for the departments REST API
//! - **cache**: process-local revision tracking for department views
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod cache;
pub mod upstream;
