mod cloudinary;

pub use cloudinary::*;

use async_trait::async_trait;
use awc::error::JsonPayloadError;
use thiserror::Error;

/// An uploaded file as received from the client, kept in memory until it is
/// handed to the media host.
#[derive(Clone, Debug, PartialEq)]
pub struct ThumbnailFile {
    file_name: Option<String>,
    content_type: String,
    bytes: Vec<u8>,
}

impl ThumbnailFile {
    pub fn new(file_name: Option<String>, content_type: String, bytes: Vec<u8>) -> Self {
        ThumbnailFile {
            file_name,
            content_type,
            bytes,
        }
    }

    pub fn get_file_name(&self) -> Option<&String> {
        self.file_name.as_ref()
    }

    pub fn get_content_type(&self) -> &String {
        &self.content_type
    }

    pub fn get_bytes(&self) -> &[u8] {
        &self.bytes[..]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct UploadedMedia {
    pub public_id: String,
    pub secure_url: String,
}

/// Remote storage for course media. Implementations live on a single worker
/// and are not required to be `Send`.
#[async_trait(?Send)]
pub trait MediaStore {
    async fn upload(&self, file: ThumbnailFile) -> Result<UploadedMedia, MediaError>;

    async fn delete(&self, public_id: &str) -> Result<(), MediaError>;

    /// Folder that uploads are placed in. Public ids of stored assets are
    /// prefixed with it.
    fn folder(&self) -> Option<&str> {
        None
    }
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("[MediaError::Request]: {0}")]
    Request(String),
    #[error("[MediaError::JsonPayload]: {0}")]
    JsonPayload(#[from] JsonPayloadError),
    #[error("[MediaError::Rejected]: {0} {1}")]
    Rejected(u16, String),
}
