use serde::{Deserialize, Serialize};

use crate::messages::PresignedPostPayload;

/// One form field of a presigned POST, under its transport-sanitized name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    pub value: String,
}

/// Short-lived credential for exactly one storage write.
///
/// Never cached or persisted: the transfer consumes it once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadAuthorization {
    pub destination_url: String,
    /// Fields in issuer order. All of them precede the file in the form.
    pub form_fields: Vec<FormField>,
}

impl From<PresignedPostPayload> for UploadAuthorization {
    fn from(payload: PresignedPostPayload) -> Self {
        let form_fields = payload
            .fields
            .into_iter()
            .filter_map(|(name, value)| {
                let value = match value {
                    serde_json::Value::Null => return None,
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                Some(FormField { name, value })
            })
            .collect();

        Self {
            destination_url: payload.url,
            form_fields,
        }
    }
}

/// Time-limited URL granting read access to one stored object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignedReadLink(String);

impl SignedReadLink {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SignedReadLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_keeps_issuer_order() {
        let payload: PresignedPostPayload = serde_json::from_str(
            r#"{"url":"https://bucket.example/","fields":{
                "ContentType":"application/pdf","key":"report.pdf","bucket":"b",
                "XAmzAlgorithm":"AWS4-HMAC-SHA256","Policy":"p","XAmzSignature":"sig"}}"#,
        )
        .unwrap();
        let auth = UploadAuthorization::from(payload);

        assert_eq!(auth.destination_url, "https://bucket.example/");
        let names: Vec<&str> = auth.form_fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["ContentType", "key", "bucket", "XAmzAlgorithm", "Policy", "XAmzSignature"]
        );
    }

    #[test]
    fn null_fields_are_dropped() {
        let payload: PresignedPostPayload = serde_json::from_str(
            r#"{"url":"https://b/","fields":{"key":"a.txt","XAmzDate":null,"bucket":"b"}}"#,
        )
        .unwrap();
        let auth = UploadAuthorization::from(payload);
        assert_eq!(auth.form_fields.len(), 2);
        assert!(auth.form_fields.iter().all(|f| f.name != "XAmzDate"));
    }

    #[test]
    fn non_string_values_are_stringified() {
        let payload: PresignedPostPayload =
            serde_json::from_str(r#"{"url":"https://b/","fields":{"success_action_status":204}}"#)
                .unwrap();
        let auth = UploadAuthorization::from(payload);
        assert_eq!(auth.form_fields[0].value, "204");
    }

    #[test]
    fn read_link_is_transparent() {
        let link: SignedReadLink = serde_json::from_str(r#""https://b/report.pdf?sig=1""#).unwrap();
        assert_eq!(link.as_str(), "https://b/report.pdf?sig=1");
        assert_eq!(link.to_string(), "https://b/report.pdf?sig=1");
    }
}
