use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::constants::Operation;

/// Error entry in a GraphQL response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<serde_json::Value>>,
}

/// Request body POSTed to the backend endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest {
    pub query: &'static str,
    pub variables: serde_json::Value,
}

impl GraphQlRequest {
    /// Creates a request for `operation` with the given variables.
    pub fn new<T: Serialize>(operation: Operation, variables: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            query: operation.document(),
            variables: serde_json::to_value(variables)?,
        })
    }
}

/// Response envelope returned by the backend.
///
/// A response may carry `data`, `errors`, or both; any error entry means
/// the backend rejected the operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphQlError>,
}

impl GraphQlResponse {
    /// Joined error messages, or `None` when the response has no errors.
    pub fn error_message(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        Some(messages.join("; "))
    }

    /// Deserializes the root field of `operation` out of `data`.
    ///
    /// Returns `Ok(None)` when `data` or the field is missing or null.
    pub fn take_field<T: DeserializeOwned>(
        &mut self,
        operation: Operation,
    ) -> Result<Option<T>, serde_json::Error> {
        let value = match self.data.as_mut() {
            Some(serde_json::Value::Object(map)) => map.remove(operation.field()),
            _ => None,
        };
        match value {
            Some(serde_json::Value::Null) | None => Ok(None),
            Some(v) => Ok(Some(serde_json::from_value(v)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::FilenameVars;

    #[test]
    fn request_carries_document_and_variables() {
        let req = GraphQlRequest::new(
            Operation::GetSignedUrl,
            &FilenameVars {
                filename: "report.pdf".into(),
            },
        )
        .unwrap();
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["variables"]["filename"], "report.pdf");
        assert!(json["query"].as_str().unwrap().contains("getSignedUrl"));
    }

    #[test]
    fn error_messages_are_joined() {
        let resp: GraphQlResponse = serde_json::from_str(
            r#"{"data":null,"errors":[{"message":"bad type"},{"message":"denied"}]}"#,
        )
        .unwrap();
        assert_eq!(resp.error_message().as_deref(), Some("bad type; denied"));
    }

    #[test]
    fn no_errors_means_no_message() {
        let resp: GraphQlResponse =
            serde_json::from_str(r#"{"data":{"getSignedUrl":"https://x"}}"#).unwrap();
        assert!(resp.error_message().is_none());
    }

    #[test]
    fn take_field_extracts_root_value() {
        let mut resp: GraphQlResponse =
            serde_json::from_str(r#"{"data":{"getSignedUrl":"https://x/y"}}"#).unwrap();
        let url: Option<String> = resp.take_field(Operation::GetSignedUrl).unwrap();
        assert_eq!(url.as_deref(), Some("https://x/y"));
    }

    #[test]
    fn take_field_null_is_none() {
        let mut resp: GraphQlResponse =
            serde_json::from_str(r#"{"data":{"deleteObject":null}}"#).unwrap();
        let ok: Option<bool> = resp.take_field(Operation::DeleteObject).unwrap();
        assert!(ok.is_none());

        let mut empty = GraphQlResponse::default();
        let ok: Option<bool> = empty.take_field(Operation::DeleteObject).unwrap();
        assert!(ok.is_none());
    }
}
