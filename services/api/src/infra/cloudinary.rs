//! Cloudinary-backed [`AssetStore`] using signed REST uploads.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context as _, bail};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use lms_domain::asset::Asset;

use crate::domain::ports::{AssetKind, AssetStore, AssetTarget, UploadFile};

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

pub struct CloudinaryAssetStore {
    client: Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
}

#[derive(Deserialize)]
struct DestroyResponse {
    result: String,
}

impl CloudinaryAssetStore {
    pub fn new(cloud_name: String, api_key: String, api_secret: String) -> Self {
        Self {
            client: Client::new(),
            cloud_name,
            api_key,
            api_secret,
        }
    }

    fn endpoint(&self, kind: AssetKind, action: &str) -> String {
        format!("{API_BASE}/{}/{}/{action}", self.cloud_name, kind.as_str())
    }

    fn sign(&self, params: &[(&str, &str)]) -> String {
        sign_params(params, &self.api_secret)
    }
}

/// SHA-256 request signature: `k1=v1&k2=v2…` sorted by key, followed by the secret.
fn sign_params(params: &[(&str, &str)], secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    hex::encode(Sha256::digest(format!("{joined}{secret}").as_bytes()))
}

fn unix_timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
        .to_string()
}

#[async_trait]
impl AssetStore for CloudinaryAssetStore {
    async fn upload(&self, target: AssetTarget, file: UploadFile) -> anyhow::Result<Asset> {
        let timestamp = unix_timestamp();
        let signature = self.sign(&[("folder", target.folder), ("timestamp", &timestamp)]);

        let mut part = Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(content_type) = file.content_type {
            part = part.mime_str(&content_type).context("invalid upload content type")?;
        }
        let form = Form::new()
            .part("file", part)
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", target.folder)
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let resp = self
            .client
            .post(self.endpoint(target.kind, "upload"))
            .multipart(form)
            .send()
            .await
            .context("send cloudinary upload")?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("cloudinary upload returned {status}: {body}");
        }
        let uploaded: UploadResponse = resp.json().await.context("decode cloudinary upload")?;
        tracing::debug!(public_id = %uploaded.public_id, folder = target.folder, "asset uploaded");
        Ok(Asset::new(uploaded.public_id, uploaded.secure_url))
    }

    async fn release(&self, kind: AssetKind, public_id: &str) -> anyhow::Result<()> {
        let timestamp = unix_timestamp();
        let signature = self.sign(&[("public_id", public_id), ("timestamp", &timestamp)]);
        let form = Form::new()
            .text("public_id", public_id.to_owned())
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let resp = self
            .client
            .post(self.endpoint(kind, "destroy"))
            .multipart(form)
            .send()
            .await
            .context("send cloudinary destroy")?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("cloudinary destroy returned {status}: {body}");
        }
        let destroyed: DestroyResponse = resp.json().await.context("decode cloudinary destroy")?;
        match destroyed.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => bail!("cloudinary destroy of {public_id} returned {other}"),
        }
    }
}
