use super::{MediaError, MediaStore, ThumbnailFile, UploadedMedia};
use crate::config::MediaConfig;

use async_trait::async_trait;
use awc::Client;
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use coursehub_common::now;
use log::info;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

static API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Cloudinary upload API client. Requests are signed with SHA-256 over the
/// sorted parameters followed by the API secret.
pub struct Cloudinary {
    client: Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    folder: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

impl Cloudinary {
    pub fn new(config: &MediaConfig) -> Self {
        let client = Client::builder().timeout(config.timeout).finish();
        Cloudinary {
            client,
            cloud_name: config.cloud_name.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            folder: config.folder.clone(),
        }
    }

    fn endpoint(&self, resource_type: &str, action: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            API_BASE, self.cloud_name, resource_type, action
        )
    }

    /// Adds timestamp, signature and credentials to the parameters that take
    /// part in the signature.
    fn sign(&self, mut params: BTreeMap<&'static str, String>) -> BTreeMap<&'static str, String> {
        params.insert("timestamp", now().to_string());
        let signature = signature(&params, &self.api_secret);
        params.insert("signature", signature);
        params.insert("signature_algorithm", "sha256".to_string());
        params.insert("api_key", self.api_key.clone());
        params
    }

    async fn post_form<T>(
        &self,
        url: String,
        form: &BTreeMap<&'static str, String>,
    ) -> Result<T, MediaError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let mut response = self
            .client
            .post(url)
            .send_form(form)
            .await
            .map_err(|err| MediaError::Request(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .body()
                .await
                .map(|body| String::from_utf8_lossy(&body).into_owned())
                .unwrap_or_default();
            return Err(MediaError::Rejected(status.as_u16(), body));
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait(?Send)]
impl MediaStore for Cloudinary {
    async fn upload(&self, file: ThumbnailFile) -> Result<UploadedMedia, MediaError> {
        let mut params = BTreeMap::new();
        if let Some(folder) = &self.folder {
            params.insert("folder", folder.clone());
        }
        let mut form = self.sign(params);
        form.insert("file", data_uri(&file));

        let uploaded: UploadResponse = self
            .post_form(self.endpoint("auto", "upload"), &form)
            .await?;
        info!("Uploaded media {}", uploaded.public_id);
        Ok(UploadedMedia {
            public_id: uploaded.public_id,
            secure_url: uploaded.secure_url,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), MediaError> {
        let mut params = BTreeMap::new();
        params.insert("public_id", public_id.to_string());
        let form = self.sign(params);

        let destroyed: DestroyResponse = self
            .post_form(self.endpoint("image", "destroy"), &form)
            .await?;
        info!("Deleted media {}: {}", public_id, destroyed.result);
        Ok(())
    }

    fn folder(&self) -> Option<&str> {
        self.folder.as_deref()
    }
}

/// Hex SHA-256 of `key=value&...` (keys sorted) with the secret appended.
pub fn signature(params: &BTreeMap<&'static str, String>, api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");
    format!("{:x}", Sha256::digest(format!("{}{}", to_sign, api_secret)))
}

fn data_uri(file: &ThumbnailFile) -> String {
    format!(
        "data:{};base64,{}",
        file.get_content_type(),
        BASE64_STANDARD.encode(file.get_bytes())
    )
}
