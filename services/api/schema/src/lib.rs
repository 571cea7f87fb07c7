//! sea-orm entities for the LMS API service.

pub mod courses;
pub mod lectures;
pub mod payments;
pub mod users;
