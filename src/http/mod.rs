//! HTTP client module
//!
//! Provides the HTTP client the fetchers talk through.
//!
//! # Features
//!
//! - **Base URL**: Relative paths are joined onto a configured base
//! - **Default Headers**: API keys and similar credentials set once at construction
//! - **Status Classification**: Non-success responses become `Error::HttpStatus`
//!   with the body preserved for later inspection

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
