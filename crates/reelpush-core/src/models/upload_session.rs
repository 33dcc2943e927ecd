use serde::Serialize;

/// Form field carrying the status code the storage endpoint answers with on success.
pub const SUCCESS_ACTION_STATUS_FIELD: &str = "success_action_status";
/// Form field carrying the MIME type the object will be stored with.
pub const CONTENT_TYPE_FIELD: &str = "Content-Type";

/// Status the storage endpoint returns when `success_action_status` is absent.
const DEFAULT_SUCCESS_STATUS: u16 = 204;

/// Pre-signed upload handshake returned by the asset service.
///
/// The form fields are opaque: they are forwarded to the storage endpoint
/// verbatim and in order. A session is consumed by exactly one upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadSession {
    pub asset_id: String,
    pub upload_url: String,
    pub fields: Vec<(String, String)>,
    /// Top-level content type reported alongside the fields, if any.
    pub fallback_content_type: Option<String>,
}

impl UploadSession {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// The only status code that counts as a successful upload: the declared
    /// one as-is, or 204 when the field is missing or not a number.
    pub fn expected_status(&self) -> u16 {
        self.field(SUCCESS_ACTION_STATUS_FIELD)
            .and_then(|value| value.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_SUCCESS_STATUS)
    }

    /// MIME type for the file part, taken from the session rather than the file name.
    pub fn content_type(&self) -> &str {
        self.field(CONTENT_TYPE_FIELD)
            .filter(|value| !value.is_empty())
            .or(self.fallback_content_type.as_deref())
            .unwrap_or("application/octet-stream")
    }
}

/// Result of posting the bytes to the pre-signed target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Accepted { status: u16 },
    Rejected { status: u16, expected: u16 },
}

impl UploadOutcome {
    pub fn evaluate(status: u16, expected: u16) -> Self {
        if status == expected {
            UploadOutcome::Accepted { status }
        } else {
            UploadOutcome::Rejected { status, expected }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(fields: &[(&str, &str)]) -> UploadSession {
        UploadSession {
            asset_id: "asset-1".to_string(),
            upload_url: "https://bucket.example/".to_string(),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            fallback_content_type: None,
        }
    }

    #[test]
    fn test_expected_status_from_fields() {
        assert_eq!(session(&[("success_action_status", "201")]).expected_status(), 201);
        assert_eq!(session(&[("success_action_status", "200")]).expected_status(), 200);
    }

    #[test]
    fn test_expected_status_keeps_any_declared_value() {
        assert_eq!(session(&[("success_action_status", "202")]).expected_status(), 202);
        assert_eq!(session(&[("success_action_status", " 302 ")]).expected_status(), 302);
    }

    #[test]
    fn test_expected_status_falls_back_to_storage_default() {
        assert_eq!(session(&[]).expected_status(), 204);
        assert_eq!(session(&[("success_action_status", "abc")]).expected_status(), 204);
        assert_eq!(session(&[("success_action_status", "")]).expected_status(), 204);
    }

    #[test]
    fn test_content_type_prefers_field() {
        let mut s = session(&[("Content-Type", "video/webm")]);
        s.fallback_content_type = Some("application/x-other".to_string());
        assert_eq!(s.content_type(), "video/webm");

        let mut s = session(&[]);
        s.fallback_content_type = Some("video/webm".to_string());
        assert_eq!(s.content_type(), "video/webm");

        assert_eq!(session(&[]).content_type(), "application/octet-stream");
    }

    #[test]
    fn test_outcome_requires_exact_status() {
        assert_eq!(
            UploadOutcome::evaluate(201, 201),
            UploadOutcome::Accepted { status: 201 }
        );
        assert_eq!(
            UploadOutcome::evaluate(200, 201),
            UploadOutcome::Rejected {
                status: 200,
                expected: 201
            }
        );
        assert_eq!(
            UploadOutcome::evaluate(204, 202),
            UploadOutcome::Rejected {
                status: 204,
                expected: 202
            }
        );
    }
}
