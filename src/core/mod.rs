//! Core functionality modules
//!
//! This module contains all core lyrics logic organized into layers:
//! - `lyrics`: The sectioned lyrics result type
//! - `matching`: Jaro similarity for accepting fuzzy search hits
//! - `sections`: Splitting scraped blocks into labelled sections
//! - `platforms`: One adapter per external lyrics source
//! - `services`: Platform selection and fan-out

pub mod lyrics;
pub mod matching;
pub mod platforms;
pub mod sections;
pub mod services;
