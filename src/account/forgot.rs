use iced::widget::{button, text, Column, Container};
use iced::{Alignment, Element, Length, Task};

use crate::{
    services::{ApiError, BackendClient},
    ui::{self, form},
    validate::{Checker, Violations},
};

/// Whatever the backend answers, the user only ever sees the same
/// neutral notice, so the page cannot be used to probe which emails
/// have an account.
pub const RESET_NOTICE: &str =
    "If an account exists with this email, a password reset link has been sent.";

pub struct ForgotPasswordPage {
    client: BackendClient,
    email: form::Value<String>,
    violations: Violations,
    processing: bool,
    notice: Option<&'static str>,
}

#[derive(Debug, Clone)]
pub enum Message {
    EmailEdited(String),
    Submit,
    Requested(Result<(), ApiError>),
    // Intercepted by the router.
    BackToLogin,
}

impl ForgotPasswordPage {
    pub fn new(client: BackendClient) -> Self {
        Self {
            client,
            email: form::Value::default(),
            violations: Violations::new(),
            processing: false,
            notice: None,
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::EmailEdited(v) => {
                self.email.value = v;
                if !self.violations.is_empty() {
                    let mut checker = Checker::new();
                    checker.email("email", &self.email.value);
                    self.violations = checker.finish();
                    self.email.valid = !self.violations.contains_key("email");
                }
            }
            Message::Submit => {
                if self.processing {
                    return Task::none();
                }
                let mut checker = Checker::new();
                checker.email("email", &self.email.value);
                self.violations = checker.finish();
                self.email.valid = !self.violations.contains_key("email");
                if !self.violations.is_empty() {
                    return Task::none();
                }
                self.processing = true;
                self.notice = None;
                let client = self.client.clone();
                let email = self.email.value.clone();
                return Task::perform(
                    async move { client.forgot_password(&email).await },
                    Message::Requested,
                );
            }
            Message::Requested(res) => {
                self.processing = false;
                if let Err(e) = res {
                    tracing::warn!("Password reset request failed: {}", e);
                }
                self.notice = Some(RESET_NOTICE);
            }
            Message::BackToLogin => {}
        }
        Task::none()
    }

    pub fn view(&self) -> Element<Message> {
        let mut col = Column::new()
            .spacing(20)
            .max_width(400)
            .align_x(Alignment::Center)
            .push(text("Reset your password").size(28))
            .push(text("Enter your email and we will send you a reset link.").size(14));

        if let Some(notice) = self.notice {
            col = col.push(ui::notice_banner(notice));
        }

        col = col
            .push(form::Form::new_trimmed("Email", &self.email, Message::EmailEdited).padding(10))
            .push_maybe(ui::field_warnings(&self.violations, "email"))
            .push(
                button(text(if self.processing {
                    "Sending..."
                } else {
                    "Send reset link"
                }))
                .width(Length::Fixed(200.0))
                .on_press_maybe((!self.processing).then_some(Message::Submit)),
            )
            .push(
                button(text("Back to login"))
                    .style(button::text)
                    .on_press(Message::BackToLogin),
            );

        Container::new(col).center_x(Length::Fill).padding(50).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_email_never_leaves_the_page() {
        let mut page = ForgotPasswordPage::new(BackendClient::new("http://192.0.2.1:1".to_string()));
        let _ = page.update(Message::EmailEdited("not-an-email".to_string()));
        let _ = page.update(Message::Submit);
        assert!(!page.processing);
        assert!(page.violations.contains_key("email"));
    }

    #[test]
    fn the_notice_is_the_same_on_success_and_failure() {
        let mut page = ForgotPasswordPage::new(BackendClient::new("http://192.0.2.1:1".to_string()));
        let _ = page.update(Message::EmailEdited("someone@example.com".to_string()));
        let _ = page.update(Message::Submit);
        assert!(page.processing);

        let _ = page.update(Message::Requested(Ok(())));
        assert_eq!(page.notice, Some(RESET_NOTICE));

        let _ = page.update(Message::Submit);
        let _ = page.update(Message::Requested(Err(ApiError::Network(
            "connection refused".to_string(),
        ))));
        assert_eq!(page.notice, Some(RESET_NOTICE));
    }
}
