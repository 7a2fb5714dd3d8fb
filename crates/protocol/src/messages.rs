//! Operation variables and result payloads.

use serde::{Deserialize, Serialize};

/// Variables for `presignedUploadPost`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresignedUploadVars {
    pub filename: String,
    pub filetype: String,
}

/// Variables for `getSignedUrl` and `deleteObject`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilenameVars {
    pub filename: String,
}

/// Result of `presignedUploadPost`.
///
/// `fields` keeps the order the backend returned the fields in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresignedPostPayload {
    pub url: String,
    #[serde(default)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}
