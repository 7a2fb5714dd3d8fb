/// Backend endpoint used when none is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:4000";

/// Form part name the storage service expects the file bytes under.
pub const FILE_FIELD_NAME: &str = "file";

/// Status code a presigned POST answers with on success.
pub const UPLOAD_SUCCESS_STATUS: u16 = 204;

/// Size of the chunks file bytes are streamed in (64 KiB).
pub const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Content type used when none can be detected.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Transport-sanitized field names and the canonical names storage expects.
///
/// GraphQL field names cannot contain hyphens, so the backend returns
/// these in sanitized form.
pub const SANITIZED_FIELD_NAMES: &[(&str, &str)] = &[
    ("ContentType", "Content-Type"),
    ("XAmzAlgorithm", "X-Amz-Algorithm"),
    ("XAmzDate", "X-Amz-Date"),
    ("XAmzCredential", "X-Amz-Credential"),
    ("XAmzSignature", "X-Amz-Signature"),
];

/// Restores a sanitized form field name to its canonical wire name.
///
/// Names outside the table (`key`, `bucket`, `Policy`, ...) pass through.
pub fn canonical_field_name(name: &str) -> &str {
    SANITIZED_FIELD_NAMES
        .iter()
        .find(|(sanitized, _)| *sanitized == name)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(name)
}

/// Backend operations issued by the authorization client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    PresignedUploadPost,
    GetSignedUrl,
    DeleteObject,
}

impl Operation {
    /// GraphQL document sent for this operation.
    pub fn document(self) -> &'static str {
        match self {
            Self::PresignedUploadPost => PRESIGNED_UPLOAD_POST,
            Self::GetSignedUrl => GET_SIGNED_URL,
            Self::DeleteObject => DELETE_OBJECT,
        }
    }

    /// Name of the root field carrying the operation result.
    pub fn field(self) -> &'static str {
        match self {
            Self::PresignedUploadPost => "presignedUploadPost",
            Self::GetSignedUrl => "getSignedUrl",
            Self::DeleteObject => "deleteObject",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field())
    }
}

const PRESIGNED_UPLOAD_POST: &str = "\
query presignedUploadPost($filename: String!, $filetype: String!) {
  presignedUploadPost(filename: $filename, filetype: $filetype) {
    url
    fields {
      ContentType
      key
      bucket
      XAmzAlgorithm
      XAmzDate
      XAmzCredential
      Policy
      XAmzSignature
    }
  }
}
";

const GET_SIGNED_URL: &str = "\
query getSignedUrl($filename: String!) {
  getSignedUrl(filename: $filename)
}
";

const DELETE_OBJECT: &str = "\
mutation deleteObject($filename: String!) {
  deleteObject(filename: $filename)
}
";
