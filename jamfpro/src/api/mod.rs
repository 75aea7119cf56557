//! Jamf Pro HTTP client and typed endpoint APIs

pub mod api_roles;
pub mod auth;
pub mod buildings;
pub mod categories;
pub mod client;
pub mod common;
pub mod computer_groups;
pub mod computers;
pub mod departments;
pub mod error;
pub mod session;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use auth::{AccessToken, Credentials};
pub use client::{Client, ClientConfig, RetryConfig};
pub use error::ApiError;
