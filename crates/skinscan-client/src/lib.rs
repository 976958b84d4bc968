//! Client for the skinscan classifier service.
//!
//! Sends exported images to `POST /api/predict` and reads
//! `GET /api/health`. Builds for native targets (used by the CLI) and for
//! `wasm32`, where reqwest uses the browser's fetch.

pub mod client;
pub mod error;

pub use client::{ClassifierClient, ClassifierConfig, DEFAULT_API_URL};
pub use error::{ClientError, ClientResult};
