//! Desktop client for a remote video-download API.
//!
//! [`api::ApiClient`] talks to the backend and returns typed results.
//! [`controller::Controller`] turns those results into UI events, saves files
//! and keeps the download history.

pub mod api;
pub mod config;
pub mod controller;
pub mod downloader;
pub mod error;
pub mod format;
pub mod history;
pub mod logging;
pub mod model;
pub mod notify;
pub mod storage;
pub mod validation;
pub mod view;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use controller::{Controller, UiEvent};
pub use error::{ClientError, Result};
