//! Client code for crumbwise.
//!
//! This crate provides the external collaborators of the analysis cache:
//! cookie enumeration and the local language model that writes analyses.

pub mod cookies;
pub mod model;

pub use cookies::{CookieJar, CookieSource, load_cookies_for_url};
pub use model::{Availability, LocalModel, ModelConfig, ModelError, build_prompt};
