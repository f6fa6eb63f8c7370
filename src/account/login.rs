use iced::widget::{button, text, Column, Container};
use iced::{Alignment, Element, Length, Task};

use crate::{
    services::{ApiError, BackendClient},
    session::AuthSession,
    ui::{self, form},
    validate::{Checker, Violations},
};

pub struct LoginPage {
    client: BackendClient,
    email: form::Value<String>,
    password: form::Value<String>,
    violations: Violations,
    processing: bool,
    warning: Option<ApiError>,
    notice: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Message {
    EmailEdited(String),
    PasswordEdited(String),
    Submit,
    LoggedIn(Result<AuthSession, ApiError>),
    // Intercepted by the router.
    StatusChecked(Result<bool, ApiError>),
    GoToRegister,
    GoToForgotPassword,
}

impl LoginPage {
    pub fn new(client: BackendClient) -> Self {
        Self {
            client,
            email: form::Value::default(),
            password: form::Value::default(),
            violations: Violations::new(),
            processing: false,
            warning: None,
            notice: None,
        }
    }

    /// A login page displaying a transient notice, e.g. after a forced
    /// logout or a completed email verification.
    pub fn with_notice(client: BackendClient, notice: String) -> Self {
        let mut page = Self::new(client);
        page.notice = Some(notice);
        page
    }

    pub fn email(&self) -> &str {
        &self.email.value
    }

    fn validate(&self) -> Violations {
        let mut checker = Checker::new();
        checker.email("email", &self.email.value);
        checker.required("password", &self.password.value);
        checker.finish()
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::EmailEdited(value) => {
                self.email.value = value;
                self.email.valid = true;
            }
            Message::PasswordEdited(value) => {
                self.password.value = value;
                self.password.valid = true;
            }
            Message::Submit => {
                if self.processing {
                    return Task::none();
                }
                self.violations = self.validate();
                self.email.valid = !self.violations.contains_key("email");
                self.password.valid = !self.violations.contains_key("password");
                if !self.violations.is_empty() {
                    return Task::none();
                }
                self.processing = true;
                self.warning = None;
                self.notice = None;
                let client = self.client.clone();
                let email = self.email.value.clone();
                let password = self.password.value.clone();
                return Task::perform(
                    async move { client.login(&email, &password).await },
                    Message::LoggedIn,
                );
            }
            Message::LoggedIn(Ok(_)) => {
                // Unverified accounts are sent back to OTP verification,
                // so check the status before entering the wizard.
                let client = self.client.clone();
                return Task::perform(
                    async move { client.verification_status().await },
                    Message::StatusChecked,
                );
            }
            Message::LoggedIn(Err(e)) => {
                self.processing = false;
                self.warning = Some(e);
            }
            Message::StatusChecked(Err(e)) => {
                self.processing = false;
                self.warning = Some(e);
            }
            // Successful status results route elsewhere, handled upstream.
            Message::StatusChecked(Ok(_)) | Message::GoToRegister | Message::GoToForgotPassword => {}
        }
        Task::none()
    }

    pub fn view(&self) -> Element<Message> {
        let mut col = Column::new()
            .spacing(20)
            .max_width(500)
            .align_x(Alignment::Center)
            .push(text("Welcome back").size(28));

        if let Some(notice) = &self.notice {
            col = col.push(ui::notice_banner(notice.clone()));
        }
        if let Some(warning) = &self.warning {
            col = col.push(ui::warning_banner("Login failed", warning.to_string()));
        }

        col = col
            .push(
                form::Form::new_trimmed("Email", &self.email, Message::EmailEdited)
                    .warning(crate::validate::INVALID_EMAIL)
                    .padding(10),
            )
            .push_maybe(ui::field_warnings(&self.violations, "email"))
            .push(
                form::Form::new("Password", &self.password, Message::PasswordEdited)
                    .secure()
                    .padding(10),
            )
            .push_maybe(ui::field_warnings(&self.violations, "password"))
            .push(
                button(text(if self.processing { "Logging in..." } else { "Login" }))
                    .width(Length::Fixed(200.0))
                    .on_press_maybe((!self.processing).then_some(Message::Submit)),
            )
            .push(
                button(text("Forgot password?"))
                    .style(button::text)
                    .on_press(Message::GoToForgotPassword),
            )
            .push(
                button(text("New here? Create an account"))
                    .style(button::text)
                    .on_press(Message::GoToRegister),
            );

        Container::new(col)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .padding(50)
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> LoginPage {
        LoginPage::new(BackendClient::new("http://192.0.2.1:1".to_string()))
    }

    #[test]
    fn submit_with_empty_fields_is_rejected_locally() {
        let mut page = page();
        let _ = page.update(Message::Submit);
        assert!(!page.processing);
        assert!(page.violations.contains_key("email"));
        assert!(page.violations.contains_key("password"));
    }

    #[test]
    fn submit_with_valid_fields_starts_processing() {
        let mut page = page();
        let _ = page.update(Message::EmailEdited("a@example.com".to_string()));
        let _ = page.update(Message::PasswordEdited("secret".to_string()));
        let _ = page.update(Message::Submit);
        assert!(page.processing);
        assert!(page.violations.is_empty());
    }

    #[test]
    fn failed_login_keeps_entered_values() {
        let mut page = page();
        let _ = page.update(Message::EmailEdited("a@example.com".to_string()));
        let _ = page.update(Message::PasswordEdited("secret".to_string()));
        let _ = page.update(Message::Submit);
        let _ = page.update(Message::LoggedIn(Err(ApiError::Network("down".to_string()))));
        assert!(!page.processing);
        assert!(page.warning.is_some());
        assert_eq!(page.email.value, "a@example.com");
        assert_eq!(page.password.value, "secret");
    }
}
