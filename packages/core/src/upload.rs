//! Receipt image uploads travelling from the browser to the OCR pipeline.

use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};

use crate::account::AccountId;
use crate::error::ValidationError;
use crate::receipt::ExpenseReceipt;

/// Maximum number of images in one upload.
pub const MAX_UPLOAD_IMAGES: usize = 20;

/// Maximum decoded size of a single image.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// One image, base64 encoded for JSON transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadImage {
    pub file_name: String,
    pub content_type: String,
    pub data_base64: String,
}

impl UploadImage {
    pub fn from_bytes(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: &[u8],
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data_base64: general_purpose::STANDARD.encode(bytes),
        }
    }

    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        general_purpose::STANDARD.decode(self.data_base64.as_bytes())
    }

    /// Decoded size, computed from the encoded length.
    pub fn approx_len(&self) -> usize {
        self.data_base64.len() / 4 * 3
    }
}

/// A batch of images uploaded by one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadBatch {
    pub account_id: AccountId,
    /// Name stamped on every receipt created from the batch.
    pub owner_name: String,
    pub images: Vec<UploadImage>,
}

impl UploadBatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.images.is_empty() {
            return Err(ValidationError::required("Receipt image"));
        }
        if self.images.len() > MAX_UPLOAD_IMAGES {
            return Err(ValidationError::invalid(
                "Receipt image",
                format!("at most {MAX_UPLOAD_IMAGES} images per upload"),
            ));
        }
        if let Some(image) = self.images.iter().find(|i| i.approx_len() > MAX_IMAGE_BYTES) {
            return Err(ValidationError::invalid(
                "Receipt image",
                format!("{} is larger than 10 MB", image.file_name),
            ));
        }
        Ok(())
    }
}

/// Result of processing one upload batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadOutcome {
    /// Newly stored receipts, in upload order.
    pub created: Vec<ExpenseReceipt>,
    /// Receipts skipped because the same receipt already exists.
    pub duplicates: usize,
    /// Pages where no amount could be read.
    pub unreadable: usize,
}

impl UploadOutcome {
    /// One-line summary for a notification toast.
    pub fn summary(&self) -> String {
        let mut parts = vec![format!(
            "{} receipt{} added",
            self.created.len(),
            if self.created.len() == 1 { "" } else { "s" }
        )];
        if self.duplicates > 0 {
            parts.push(format!("{} duplicate skipped", self.duplicates));
        }
        if self.unreadable > 0 {
            parts.push(format!("{} unreadable", self.unreadable));
        }
        parts.join(", ")
    }
}

/// `data:` URL for inline display and download of an image.
pub fn data_url(content_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        content_type,
        general_purpose::STANDARD.encode(bytes)
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;

    fn batch(images: Vec<UploadImage>) -> UploadBatch {
        UploadBatch {
            account_id: AccountId::parse("emp-demo-001").unwrap(),
            owner_name: "Juan Dela Cruz".into(),
            images,
        }
    }

    #[test]
    fn image_encodes_and_decodes() {
        let image = UploadImage::from_bytes("r.png", "image/png", b"\x89PNG");
        assert_eq!(image.decode().unwrap(), b"\x89PNG".to_vec());
        assert_eq!(data_url("image/png", b"hi"), "data:image/png;base64,aGk=");
    }

    #[test]
    fn batch_limits() {
        assert!(batch(vec![]).validate().is_err());
        let one = UploadImage::from_bytes("r.png", "image/png", b"abc");
        assert!(batch(vec![one.clone()]).validate().is_ok());
        assert!(batch(vec![one; MAX_UPLOAD_IMAGES + 1]).validate().is_err());
    }

    #[test]
    fn outcome_summary() {
        let outcome = UploadOutcome {
            created: vec![],
            duplicates: 2,
            unreadable: 1,
        };
        assert_eq!(outcome.summary(), "0 receipts added, 2 duplicate skipped, 1 unreadable");
    }
}
