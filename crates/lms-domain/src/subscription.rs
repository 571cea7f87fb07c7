//! Subscription reference embedded in a user record.
//!
//! Status is provider-authoritative and only mirrored locally, so it is kept
//! as a free-form string. The values this system itself writes or branches on
//! are listed as constants.

use serde::{Deserialize, Serialize};

/// Status written after a successful payment verification.
pub const STATUS_ACTIVE: &str = "active";

/// Status the provider reports for a freshly created subscription.
pub const STATUS_CREATED: &str = "created";

/// Status the provider reports after cancellation.
pub const STATUS_CANCELLED: &str = "cancelled";

/// Link between a user and an external payment-provider subscription.
///
/// `none → created → active → cancelled`; a failed verification leaves it as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRef {
    pub id: Option<String>,
    pub status: Option<String>,
}

impl SubscriptionRef {
    pub fn new(id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            status: Some(status.into()),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some(STATUS_ACTIVE)
    }
}
