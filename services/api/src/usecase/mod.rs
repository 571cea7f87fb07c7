pub mod auth;
pub mod contact;
pub mod course;
pub mod payment;
pub mod stats;
pub mod user;

use crate::domain::ports::{AssetKind, AssetStore};

/// Release an asset whose owning record is gone or was never written.
///
/// Failures are logged and swallowed; the caller's outcome does not depend on them.
pub(crate) async fn release_asset(assets: &dyn AssetStore, kind: AssetKind, public_id: &str) {
    if public_id.is_empty() {
        return;
    }
    if let Err(e) = assets.release(kind, public_id).await {
        tracing::warn!(error = %format!("{e:#}"), public_id, "failed to release asset");
    }
}
