//! Auth types shared across LMS crates.
//!
//! Provides JWT issuance/validation, the `token` cookie builders, and
//! token extraction from an incoming request.

pub mod bearer;
pub mod cookie;
pub mod token;
