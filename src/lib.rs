// src/lib.rs

//! Post-call summary connector library.
//!
//! Copies the Contact Lens post-contact summary of a call into the matching
//! SAP Sales and Service Cloud phone call.

pub mod config;
pub mod error;
pub mod handler;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod models;
pub mod parameters;
pub mod services;
pub mod storage;
pub mod utils;
