//! Ports to external collaborators: asset hosting, payment provider, mail.
//!
//! These are held as `Arc<dyn …>` in [`crate::state::AppState`], so they use
//! `async_trait` rather than native async fns.

use async_trait::async_trait;

use lms_domain::asset::Asset;

/// A file received in a multipart request.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Storage class of an uploaded asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Video,
}

impl AssetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

/// Destination folder and storage class for an upload.
#[derive(Debug, Clone, Copy)]
pub struct AssetTarget {
    pub folder: &'static str,
    pub kind: AssetKind,
}

pub const AVATAR_TARGET: AssetTarget = AssetTarget {
    folder: "lms",
    kind: AssetKind::Image,
};

pub const THUMBNAIL_TARGET: AssetTarget = AssetTarget {
    folder: "course-thumbnails",
    kind: AssetKind::Image,
};

pub const LECTURE_TARGET: AssetTarget = AssetTarget {
    folder: "lms-lectures",
    kind: AssetKind::Video,
};

#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store the file and return its id and resolvable URL.
    async fn upload(&self, target: AssetTarget, file: UploadFile) -> anyhow::Result<Asset>;

    /// Delete a stored asset.
    async fn release(&self, kind: AssetKind, public_id: &str) -> anyhow::Result<()>;
}

/// Subscription as reported by the payment provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSubscription {
    pub id: String,
    pub status: String,
}

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Public key id handed to the checkout client.
    fn key_id(&self) -> &str;

    async fn create_subscription(&self) -> anyhow::Result<ProviderSubscription>;

    async fn cancel_subscription(&self, subscription_id: &str)
    -> anyhow::Result<ProviderSubscription>;

    /// Raw provider listing of the most recent `count` subscriptions.
    async fn list_subscriptions(&self, count: u32) -> anyhow::Result<serde_json::Value>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub reply_to: Option<String>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: MailMessage) -> anyhow::Result<()>;
}
