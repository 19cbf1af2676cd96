//! JSON:API backend interaction module
//!
//! This module provides the HTTP side of every command: token resolution,
//! the request client and error formatting. Response bodies are handed to
//! [`crate::jsonapi`] untouched.
//!
//! # Module Structure
//!
//! - [`auth`] - Token resolution from flag, environment and config
//! - [`client`] - Main API client for making requests against a base URL
//! - [`http`] - HTTP utilities, `ApiError` and error formatting
//!
//! # Example
//!
//! ```ignore
//! use xbe::api::client::ApiClient;
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = ApiClient::new("https://app.x-b-e.com", None)?;
//!     let response = client.get("/v1/objectives", &[]).await?;
//!     let doc = xbe::jsonapi::parse_collection(&response.body)?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;

pub use client::{member_path, ApiClient};
pub use http::{format_api_error, ApiError, ApiResponse};
