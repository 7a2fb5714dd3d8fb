//! Multipart form layout for a presigned POST.
//!
//! Storage services validate the policy fields before they read the file,
//! so every authorization field precedes the file part.

use reqwest::Url;
use reqwest::multipart::{Form, Part};
use uplink_protocol::constants::{FILE_FIELD_NAME, canonical_field_name};
use uplink_protocol::types::UploadAuthorization;

use crate::TransferError;

/// A text part of the outgoing form, under its canonical wire name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    pub name: String,
    pub value: String,
}

/// Ordered layout of the form sent to storage.
#[derive(Debug, Clone)]
pub struct FormPlan {
    url: Url,
    fields: Vec<FormPart>,
}

impl FormPlan {
    /// Lays out the form for `auth`, restoring canonical field names.
    pub fn from_authorization(auth: &UploadAuthorization) -> Result<Self, TransferError> {
        let url = Url::parse(&auth.destination_url).map_err(|e| {
            TransferError::InvalidAuthorization(format!("{}: {e}", auth.destination_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(TransferError::InvalidAuthorization(format!(
                "unsupported scheme: {}",
                url.scheme()
            )));
        }

        let fields = auth
            .form_fields
            .iter()
            .map(|f| FormPart {
                name: canonical_field_name(&f.name).to_string(),
                value: f.value.clone(),
            })
            .collect();

        Ok(Self { url, fields })
    }

    /// Destination the form is POSTed to.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Text parts in send order.
    pub fn fields(&self) -> &[FormPart] {
        &self.fields
    }

    /// Names of every part in send order; the file part is always last.
    pub fn part_names(&self) -> Vec<&str> {
        self.fields
            .iter()
            .map(|f| f.name.as_str())
            .chain(std::iter::once(FILE_FIELD_NAME))
            .collect()
    }

    /// Builds the form, appending `file` after every field.
    pub fn into_form(self, file: Part) -> (Url, Form) {
        let form = self
            .fields
            .into_iter()
            .fold(Form::new(), |form, f| form.text(f.name, f.value))
            .part(FILE_FIELD_NAME, file);
        (self.url, form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uplink_protocol::types::FormField;

    fn auth(url: &str, fields: &[(&str, &str)]) -> UploadAuthorization {
        UploadAuthorization {
            destination_url: url.into(),
            form_fields: fields
                .iter()
                .map(|(n, v)| FormField {
                    name: (*n).into(),
                    value: (*v).into(),
                })
                .collect(),
        }
    }

    #[test]
    fn names_are_canonical_and_file_is_last() {
        let plan = FormPlan::from_authorization(&auth(
            "https://bucket.example/",
            &[
                ("ContentType", "application/pdf"),
                ("key", "report.pdf"),
                ("bucket", "b"),
                ("XAmzAlgorithm", "AWS4-HMAC-SHA256"),
                ("XAmzDate", "20240101T000000Z"),
                ("XAmzCredential", "cred"),
                ("Policy", "p"),
                ("XAmzSignature", "sig"),
            ],
        ))
        .unwrap();

        assert_eq!(
            plan.part_names(),
            vec![
                "Content-Type",
                "key",
                "bucket",
                "X-Amz-Algorithm",
                "X-Amz-Date",
                "X-Amz-Credential",
                "Policy",
                "X-Amz-Signature",
                "file",
            ]
        );
        assert!(plan.fields().iter().all(|f| !f.name.starts_with("XAmz")));
        assert_eq!(plan.fields()[7].value, "sig");
    }

    #[test]
    fn empty_authorization_still_sends_file() {
        let plan = FormPlan::from_authorization(&auth("https://b/", &[])).unwrap();
        assert_eq!(plan.part_names(), vec!["file"]);
    }

    #[test]
    fn invalid_url_rejected() {
        let err = FormPlan::from_authorization(&auth("not a url", &[])).unwrap_err();
        assert!(matches!(err, TransferError::InvalidAuthorization(_)));

        let err = FormPlan::from_authorization(&auth("ftp://bucket/", &[])).unwrap_err();
        assert!(err.to_string().contains("ftp"));
    }
}
