//! Command Line Interface module
//!
//! - `fetch`: Look up lyrics on one, the first matching, or all platforms
//! - `platforms`: List platforms and their enabled state
//! - `config`: Inspect configuration

pub mod config;
pub mod fetch;
pub mod platforms;
