//! # lib-types
//!
//! Core type definitions for the autocorrelation lab.
//!
//! This crate provides the value types shared by the engine and its callers:
//! - The fixed catalog of signal families and their teaching context
//! - Sampled signal pairs and correlation curves

pub mod signal;
pub mod series;

pub use signal::*;
pub use series::*;
