//! Payload and response types of the backend API, and the classification of
//! its error responses into the small set of shapes the UI knows how to
//! render.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------- payloads

#[derive(Debug, Clone, Serialize)]
pub struct LoginPayload<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    pub full_name: String,
    pub gender: String,
    pub email: String,
    pub mobile: String,
    pub password: String,
    // both serialized as null when absent, the backend expects the keys.
    pub date_of_birth: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForgotPasswordPayload<'a> {
    pub email: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpPayload<'a> {
    pub email_or_mobile_number: &'a str,
    pub otp: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationStatus {
    #[serde(default)]
    pub is_verified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralInfo {
    pub biodata_type: String,
    pub marital_status: String,
    pub birth_date: String,
    pub height: String,
    pub complexion: String,
    pub weight: String,
    pub blood_group: String,
    pub nationality: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressFields {
    pub location: String,
    pub area: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentAddress {
    pub same_as_permanent: bool,
    pub location: String,
    pub area: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub permanent_address: AddressFields,
    pub present_address: PresentAddress,
    pub grew_up_location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub highest_degree: String,
    pub institution: String,
    pub passing_year: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sibling {
    pub name: String,
    pub occupation: String,
    pub marital_status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyInfo {
    pub father_name: String,
    pub father_occupation: String,
    pub mother_name: String,
    pub mother_occupation: String,
    #[serde(default)]
    pub siblings: Vec<Sibling>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Occupation {
    pub occupation: String,
    pub description: String,
}

/// The draft stored server-side, fetched when the wizard mounts so a user
/// can resume where they left off.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Biodata {
    pub general_info: Option<GeneralInfo>,
    pub address: Option<Address>,
    pub education: Option<Education>,
    pub family_info: Option<FamilyInfo>,
    pub occupation: Option<Occupation>,
}

// ------------------------------------------------------------------ errors

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// HTTP 400 carrying a field to messages mapping.
    Validation {
        title: String,
        errors: BTreeMap<String, Vec<String>>,
    },
    /// HTTP 409, e.g. a duplicate account email.
    Conflict {
        message: String,
        details: Option<serde_json::Value>,
    },
    /// HTTP 401, or a token found expired before sending. Always tears the
    /// session down.
    SessionExpired,
    /// No response from the backend.
    Network(String),
    Unexpected(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Validation { title, errors } => {
                write!(f, "{}", title)?;
                for (field, messages) in errors {
                    write!(f, "\n{}: {}", field, messages.join(", "))?;
                }
                Ok(())
            }
            Self::Conflict { message, .. } => write!(f, "{}", message),
            Self::SessionExpired => write!(f, "Session expired. Please login again."),
            Self::Network(e) => write!(f, "Network error - please try again ({})", e),
            Self::Unexpected(e) => write!(f, "{}", e),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() || error.status().is_none() {
            ApiError::Network(error.to_string())
        } else {
            ApiError::Unexpected(error.to_string())
        }
    }
}

/// The backend sends either a single message or a list per field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for Vec<String> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ValidationBody {
    title: Option<String>,
    errors: Option<BTreeMap<String, OneOrMany>>,
}

#[derive(Debug, Clone, Deserialize)]
struct ConflictBody {
    message: Option<String>,
}

impl ApiError {
    /// Classifies a non-success response from its status and decoded body.
    pub fn classify(status: u16, body: serde_json::Value) -> ApiError {
        match status {
            400 => {
                let parsed: ValidationBody =
                    serde_json::from_value(body.clone()).unwrap_or(ValidationBody {
                        title: None,
                        errors: None,
                    });
                match parsed.errors {
                    Some(errors) => ApiError::Validation {
                        title: parsed.title.unwrap_or_else(|| "Validation failed".to_string()),
                        errors: errors.into_iter().map(|(k, v)| (k, v.into())).collect(),
                    },
                    None => ApiError::Unexpected(
                        parsed.title.unwrap_or_else(|| "Bad request".to_string()),
                    ),
                }
            }
            401 => ApiError::SessionExpired,
            409 => {
                let parsed: ConflictBody = serde_json::from_value(body.clone())
                    .unwrap_or(ConflictBody { message: None });
                ApiError::Conflict {
                    message: parsed
                        .message
                        .unwrap_or_else(|| "Conflict occurred".to_string()),
                    details: Some(body),
                }
            }
            _ => ApiError::Unexpected(format!("HTTP {}: {}", status, body)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn http_400_with_field_mapping_is_a_validation_error() {
        let err = ApiError::classify(
            400,
            json!({
                "title": "One or more validation errors occurred.",
                "errors": {
                    "Email": ["The Email field is required."],
                    "Mobile": "Must be a valid 11-digit phone number"
                }
            }),
        );
        match err {
            ApiError::Validation { title, errors } => {
                assert_eq!(title, "One or more validation errors occurred.");
                assert_eq!(
                    errors.get("Email").unwrap(),
                    &vec!["The Email field is required.".to_string()]
                );
                // single-string shape is normalized to a list.
                assert_eq!(errors.get("Mobile").unwrap().len(), 1);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn http_400_without_mapping_keeps_the_title() {
        let err = ApiError::classify(400, json!({ "title": "Bad payload" }));
        assert_eq!(err, ApiError::Unexpected("Bad payload".to_string()));
    }

    #[test]
    fn http_401_is_session_expired() {
        assert_eq!(
            ApiError::classify(401, serde_json::Value::Null),
            ApiError::SessionExpired
        );
    }

    #[test]
    fn http_409_is_a_conflict_with_details() {
        let err = ApiError::classify(409, json!({ "message": "Email already registered" }));
        match err {
            ApiError::Conflict { message, details } => {
                assert_eq!(message, "Email already registered");
                assert!(details.is_some());
            }
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[test]
    fn register_payload_serializes_missing_optionals_as_null() {
        let payload = RegisterPayload {
            full_name: "Nadia Islam".to_string(),
            gender: "Female".to_string(),
            email: "nadia@example.com".to_string(),
            mobile: "01712345678".to_string(),
            password: "Str0ngpass".to_string(),
            date_of_birth: None,
            address: None,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["fullName"], "Nadia Islam");
        assert!(value["dateOfBirth"].is_null());
        assert!(value["address"].is_null());
    }
}
