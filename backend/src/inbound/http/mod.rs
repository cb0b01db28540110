//! HTTP inbound adapter exposing the Action Layer and the Route Guard.

pub mod actions;
pub mod cache_control;
pub mod cookie_config;
pub mod cookie_session;
pub mod error;
pub mod health;
pub mod origin;
pub mod route_guard;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
