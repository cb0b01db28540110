//! Upstream departments API adapters.
//!
//! This module provides a thin HTTP implementation of the `DepartmentApi`
//! port.

mod dto;
mod http_client;

pub use http_client::{HttpDepartmentApi, UpstreamConfigError};
