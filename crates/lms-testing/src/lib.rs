//! Test utilities for LMS services.
//!
//! Provides token-bearing headers and a multipart body builder.
//! Dev-dependency only.

pub mod auth;
pub mod multipart;
