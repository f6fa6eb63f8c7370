//! Thin HTTP wrapper over the backend, holding the shared session slot.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use reqwest::{Method, RequestBuilder};
use tokio::sync::RwLock;

use crate::session::AuthSession;

use super::api::{self, ApiError};

pub type SharedSession = Arc<RwLock<Option<AuthSession>>>;

#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    session: SharedSession,
    unauthenticated: Arc<AtomicBool>,
}

impl BackendClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            session: Arc::new(RwLock::new(None)),
            unauthenticated: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn session(&self) -> SharedSession {
        self.session.clone()
    }

    pub fn is_unauthenticated(&self) -> bool {
        self.unauthenticated.load(Ordering::Relaxed)
    }

    pub async fn logout(&self) {
        self.session.write().await.take();
    }

    /// Reads the bearer token for an outbound request. A token found expired
    /// here clears the session and fails the call before anything is sent.
    async fn bearer(&self) -> Result<String, ApiError> {
        let mut slot = self.session.write().await;
        match slot.as_ref() {
            None => {
                self.unauthenticated.store(true, Ordering::Relaxed);
                Err(ApiError::SessionExpired)
            }
            Some(session) if session.is_expired() => {
                slot.take();
                self.unauthenticated.store(true, Ordering::Relaxed);
                Err(ApiError::SessionExpired)
            }
            Some(session) => Ok(session.token.clone()),
        }
    }

    fn builder(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .header("Content-Type", "application/json");
        tracing::debug!("Sending http request: {:?}", req);
        req
    }

    async fn send<D>(&self, req: RequestBuilder) -> Result<D, ApiError>
    where
        D: serde::de::DeserializeOwned,
    {
        let res = req.send().await?;
        let status = res.status();
        if status.is_success() {
            Ok(res.json().await?)
        } else {
            if status.as_u16() == 401 {
                self.session.write().await.take();
                self.unauthenticated.store(true, Ordering::Relaxed);
            }
            let body = res
                .json::<serde_json::Value>()
                .await
                .unwrap_or(serde_json::Value::Null);
            Err(ApiError::classify(status.as_u16(), body))
        }
    }

    async fn request<F, D>(&self, method: Method, path: &str, with_payload: F) -> Result<D, ApiError>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
        D: serde::de::DeserializeOwned,
    {
        let token = self.bearer().await?;
        let req = with_payload(
            self.builder(method, path)
                .header("Authorization", format!("Bearer {}", token)),
        );
        self.send(req).await
    }

    async fn request_unauth<F, D>(
        &self,
        method: Method,
        path: &str,
        with_payload: F,
    ) -> Result<D, ApiError>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
        D: serde::de::DeserializeOwned,
    {
        self.send(with_payload(self.builder(method, path))).await
    }

    // -------------------------------------------------------------- account

    /// Authenticates and stores the resulting session in the shared slot.
    /// A token whose expiry cannot be decoded is refused outright.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ApiError> {
        let res: api::LoginResponse = self
            .request_unauth(Method::POST, "/Auth/login", |r| {
                r.json(&api::LoginPayload { email, password })
            })
            .await?;
        let session =
            AuthSession::new(res.token).map_err(|e| ApiError::Unexpected(e.to_string()))?;
        *self.session.write().await = Some(session.clone());
        self.unauthenticated.store(false, Ordering::Relaxed);
        Ok(session)
    }

    pub async fn register(&self, payload: &api::RegisterPayload) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .request_unauth(Method::POST, "/Auth/register", |r| r.json(payload))
            .await?;
        Ok(())
    }

    pub async fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .request_unauth(Method::POST, "/Auth/forgot-password", |r| {
                r.json(&api::ForgotPasswordPayload { email })
            })
            .await?;
        Ok(())
    }

    // ------------------------------------------------------------------ otp

    /// The email goes in the query string with an empty JSON body, which is
    /// what the backend expects for this endpoint.
    pub async fn send_email_otp(&self, email: &str) -> Result<(), ApiError> {
        let res: api::StatusResponse = self
            .request_unauth(Method::POST, "/OTPVerification/send-email-otp", |r| {
                r.query(&[("Email", email)]).json(&serde_json::json!({}))
            })
            .await?;
        if res.success || res.message.as_deref() == Some("OTP Sent Successfully") {
            Ok(())
        } else {
            Err(ApiError::Unexpected(
                res.message.unwrap_or_else(|| "Failed to send OTP".to_string()),
            ))
        }
    }

    pub async fn verify_otp(&self, subject: &str, otp: &str) -> Result<(), ApiError> {
        let res: api::StatusResponse = self
            .request_unauth(Method::POST, "/OTPVerification/otp-verification", |r| {
                r.json(&api::VerifyOtpPayload {
                    email_or_mobile_number: subject,
                    otp,
                })
            })
            .await?;
        if res.success {
            Ok(())
        } else {
            Err(ApiError::Unexpected(
                res.message
                    .unwrap_or_else(|| "Invalid OTP. Please try again.".to_string()),
            ))
        }
    }

    pub async fn verification_status(&self) -> Result<bool, ApiError> {
        let res: api::VerificationStatus = self
            .request(Method::GET, "/OTPVerification/email-or-mobile-isverified", |r| r)
            .await?;
        Ok(res.is_verified)
    }

    // -------------------------------------------------------------- biodata

    pub async fn my_biodata(&self) -> Result<api::Biodata, ApiError> {
        self.request(Method::GET, "/BioData/my-biodata", |r| r).await
    }

    pub async fn save_general_info(&self, payload: &api::GeneralInfo) -> Result<(), ApiError> {
        self.save("/BioData/add-update-general-info", payload).await
    }

    pub async fn save_address(&self, payload: &api::Address) -> Result<(), ApiError> {
        self.save("/BioData/add-update-address", payload).await
    }

    pub async fn save_education(&self, payload: &api::Education) -> Result<(), ApiError> {
        self.save("/BioData/add-update-education", payload).await
    }

    pub async fn save_family_info(&self, payload: &api::FamilyInfo) -> Result<(), ApiError> {
        self.save("/BioData/add-update-family-info", payload).await
    }

    pub async fn save_occupation(&self, payload: &api::Occupation) -> Result<(), ApiError> {
        self.save("/BioData/add-update-occupation", payload).await
    }

    async fn save<P: serde::Serialize>(&self, path: &str, payload: &P) -> Result<(), ApiError> {
        let _: serde_json::Value = self.request(Method::POST, path, |r| r.json(payload)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::token_with_expiry;

    #[tokio::test]
    async fn expired_token_blocks_the_request_locally() {
        // The base URL is unroutable on purpose: the call must fail before
        // any request is attempted.
        let client = BackendClient::new("http://192.0.2.1:1".to_string());
        let session = AuthSession::new(token_with_expiry(0)).unwrap();
        *client.session().write().await = Some(session);

        let err = client.verification_status().await.unwrap_err();
        assert_eq!(err, ApiError::SessionExpired);
        assert!(client.session().read().await.is_none());
        assert!(client.is_unauthenticated());
    }

    #[tokio::test]
    async fn missing_session_blocks_the_request_locally() {
        let client = BackendClient::new("http://192.0.2.1:1".to_string());
        let err = client.my_biodata().await.unwrap_err();
        assert_eq!(err, ApiError::SessionExpired);
        assert!(client.is_unauthenticated());
    }
}
