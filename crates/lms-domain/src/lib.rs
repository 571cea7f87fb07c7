//! Domain types shared across LMS crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Shared by every layer of the API service, from handlers down to `infra/`.

pub mod asset;
pub mod payment;
pub mod subscription;
pub mod user;
