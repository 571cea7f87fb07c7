//! Reference to a binary object held by the asset store.

use serde::{Deserialize, Serialize};

/// Opaque asset id plus the URL it resolves to.
///
/// Field names are part of the public JSON contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub public_id: String,
    pub secure_url: String,
}

impl Asset {
    pub fn new(public_id: impl Into<String>, secure_url: impl Into<String>) -> Self {
        Self {
            public_id: public_id.into(),
            secure_url: secure_url.into(),
        }
    }
}
