use std::time::Duration;

use iced::widget::{button, text, Column, Container, Row};
use iced::{Alignment, Element, Length, Subscription, Task};

use crate::{
    services::{ApiError, BackendClient},
    ui::{self, form},
    validate::{is_valid_otp, INVALID_OTP},
};

pub const OTP_VALIDITY_SECS: u32 = 60;
const REDIRECT_DELAY: Duration = Duration::from_millis(1500);

/// Where to send the user once the code checks out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Fresh registration, the user still has to log in.
    Login,
    /// Already authenticated, straight to the biodata form.
    Wizard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    AwaitingInput,
    Verifying,
    Verified,
    Expired,
    Error(String),
}

pub struct OtpPage {
    client: BackendClient,
    email: String,
    destination: Destination,
    code: form::Value<String>,
    state: State,
    remaining: u32,
    resending: bool,
    // resend failures show in the banner, verify failures in the state.
    warning: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Message {
    Tick,
    CodeEdited(String),
    Submit,
    Verified(Result<(), ApiError>),
    Resend,
    Resent(Result<(), ApiError>),
    // Intercepted by the router.
    Redirect(Destination),
    BackToLogin,
}

impl OtpPage {
    pub fn new(client: BackendClient, email: String, destination: Destination) -> Self {
        Self {
            client,
            email,
            destination,
            code: form::Value::default(),
            state: State::AwaitingInput,
            remaining: OTP_VALIDITY_SECS,
            resending: false,
            warning: None,
        }
    }

    pub fn destination(&self) -> Destination {
        self.destination
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Kick off the initial code delivery. The countdown is already
    /// running, a send failure only surfaces in the banner.
    pub fn load(&self) -> Task<Message> {
        let client = self.client.clone();
        let email = self.email.clone();
        Task::perform(
            async move { client.send_email_otp(&email).await },
            Message::Resent,
        )
    }

    pub fn subscription(&self) -> Subscription<Message> {
        if self.remaining > 0 && self.state != State::Verified {
            iced::time::every(Duration::from_secs(1)).map(|_| Message::Tick)
        } else {
            Subscription::none()
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => {
                self.remaining = self.remaining.saturating_sub(1);
                if self.remaining == 0 && self.state != State::Verified {
                    self.state = State::Expired;
                }
            }
            Message::CodeEdited(v) => {
                if self.remaining == 0 {
                    return Task::none();
                }
                if v.chars().all(|c| c.is_ascii_digit()) && v.len() <= 6 {
                    self.code.value = v;
                    self.code.valid = true;
                    if matches!(self.state, State::Error(_)) {
                        self.state = State::AwaitingInput;
                    }
                }
            }
            Message::Submit => {
                if self.remaining == 0
                    || matches!(self.state, State::Verifying | State::Verified)
                {
                    return Task::none();
                }
                if !is_valid_otp(&self.code.value) {
                    self.code.valid = false;
                    self.state = State::Error(INVALID_OTP.to_string());
                    return Task::none();
                }
                self.state = State::Verifying;
                let client = self.client.clone();
                let email = self.email.clone();
                let code = self.code.value.clone();
                return Task::perform(
                    async move { client.verify_otp(&email, &code).await },
                    Message::Verified,
                );
            }
            Message::Verified(Ok(())) => {
                self.state = State::Verified;
                let destination = self.destination;
                return Task::perform(
                    async move {
                        tokio::time::sleep(REDIRECT_DELAY).await;
                        destination
                    },
                    Message::Redirect,
                );
            }
            Message::Verified(Err(e)) => {
                // the countdown keeps running, the code may simply be
                // mistyped.
                self.code.value.clear();
                self.code.valid = true;
                self.state = State::Error(e.to_string());
            }
            Message::Resend => {
                if self.remaining > 0 || self.resending {
                    return Task::none();
                }
                self.resending = true;
                self.warning = None;
                let client = self.client.clone();
                let email = self.email.clone();
                return Task::perform(
                    async move { client.send_email_otp(&email).await },
                    Message::Resent,
                );
            }
            Message::Resent(Ok(())) => {
                self.resending = false;
                self.remaining = OTP_VALIDITY_SECS;
                self.code.value.clear();
                self.code.valid = true;
                self.state = State::AwaitingInput;
            }
            Message::Resent(Err(e)) => {
                self.resending = false;
                if self.remaining == 0 {
                    self.state = State::Error(e.to_string());
                } else {
                    // the initial send failed while the countdown still
                    // runs, surface it without blocking the input.
                    self.warning = Some(e.to_string());
                }
            }
            Message::Redirect(_) | Message::BackToLogin => {}
        }
        Task::none()
    }

    pub fn view(&self) -> Element<Message> {
        let mut col = Column::new()
            .spacing(20)
            .max_width(400)
            .align_x(Alignment::Center)
            .push(text("Verify your email").size(28))
            .push(text(format!("We sent a 6-digit code to {}", self.email)).size(14));

        if let Some(warning) = &self.warning {
            col = col.push(ui::warning_banner("Could not send the code", warning.clone()));
        }

        match &self.state {
            State::Verified => {
                col = col.push(ui::notice_banner("Email verified. Redirecting..."));
            }
            State::Expired => {
                col = col.push(ui::warning_banner(
                    "Code expired",
                    "The code is no longer valid, request a new one.".to_string(),
                ));
            }
            State::Error(msg) => {
                col = col.push(ui::warning_banner("Verification failed", msg.clone()));
            }
            State::AwaitingInput | State::Verifying => {}
        }

        let countdown: Element<Message> = if self.remaining > 0 {
            text(format!("Code expires in {}s", self.remaining))
                .size(14)
                .color(ui::GREY)
                .into()
        } else {
            button(text(if self.resending {
                "Sending..."
            } else {
                "Resend code"
            }))
            .style(button::text)
            .on_press_maybe((!self.resending).then_some(Message::Resend))
            .into()
        };

        let can_submit = self.state != State::Verifying
            && self.state != State::Verified
            && self.remaining > 0;

        let code_input = if self.remaining > 0 {
            form::Form::new_trimmed("6-digit code", &self.code, Message::CodeEdited)
        } else {
            form::Form::new_disabled("6-digit code", &self.code)
        };

        col = col
            .push(code_input.padding(10).size(20))
            .push(
                Row::new()
                    .spacing(20)
                    .align_y(Alignment::Center)
                    .push(
                        button(text(if self.state == State::Verifying {
                            "Verifying..."
                        } else {
                            "Verify"
                        }))
                        .width(Length::Fixed(150.0))
                        .on_press_maybe(can_submit.then_some(Message::Submit)),
                    )
                    .push(countdown),
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

    fn page() -> OtpPage {
        OtpPage::new(
            BackendClient::new("http://192.0.2.1:1".to_string()),
            "someone@example.com".to_string(),
            Destination::Login,
        )
    }

    #[test]
    fn countdown_runs_out_after_sixty_ticks() {
        let mut page = page();
        for _ in 0..59 {
            let _ = page.update(Message::Tick);
            assert_eq!(page.state, State::AwaitingInput);
        }
        let _ = page.update(Message::Tick);
        assert_eq!(page.remaining, 0);
        assert_eq!(page.state, State::Expired);
        // further ticks are harmless.
        let _ = page.update(Message::Tick);
        assert_eq!(page.remaining, 0);
    }

    #[test]
    fn short_code_is_rejected_locally() {
        let mut page = page();
        let _ = page.update(Message::CodeEdited("12345".to_string()));
        let _ = page.update(Message::Submit);
        assert_eq!(page.state, State::Error(INVALID_OTP.to_string()));
        assert!(!page.code.valid);
    }

    #[test]
    fn non_digit_input_is_ignored() {
        let mut page = page();
        let _ = page.update(Message::CodeEdited("12a".to_string()));
        assert_eq!(page.code.value, "");
        let _ = page.update(Message::CodeEdited("1234567".to_string()));
        assert_eq!(page.code.value, "");
        let _ = page.update(Message::CodeEdited("123456".to_string()));
        assert_eq!(page.code.value, "123456");
    }

    #[test]
    fn resend_is_a_noop_while_the_countdown_runs() {
        let mut page = page();
        let _ = page.update(Message::Resend);
        assert!(!page.resending);
        for _ in 0..60 {
            let _ = page.update(Message::Tick);
        }
        let _ = page.update(Message::Resend);
        assert!(page.resending);
    }

    #[test]
    fn failed_verification_keeps_the_countdown() {
        let mut page = page();
        for _ in 0..20 {
            let _ = page.update(Message::Tick);
        }
        let _ = page.update(Message::CodeEdited("123456".to_string()));
        let _ = page.update(Message::Submit);
        assert_eq!(page.state, State::Verifying);
        let _ = page.update(Message::Verified(Err(ApiError::Unexpected(
            "Invalid OTP. Please try again.".to_string(),
        ))));
        assert_eq!(page.remaining, 40);
        assert!(matches!(page.state, State::Error(_)));
    }

    #[test]
    fn successful_resend_restarts_the_countdown() {
        let mut page = page();
        for _ in 0..60 {
            let _ = page.update(Message::Tick);
        }
        let _ = page.update(Message::Resend);
        let _ = page.update(Message::Resent(Ok(())));
        assert_eq!(page.remaining, OTP_VALIDITY_SECS);
        assert_eq!(page.state, State::AwaitingInput);
        assert!(page.code.value.is_empty());
    }

    #[test]
    fn no_ticker_once_verified() {
        let mut page = page();
        let _ = page.update(Message::CodeEdited("123456".to_string()));
        let _ = page.update(Message::Submit);
        let _ = page.update(Message::Verified(Ok(())));
        assert_eq!(page.state, State::Verified);
        // ticks keep the state as-is even with time left.
        let _ = page.update(Message::Tick);
        assert_eq!(page.state, State::Verified);
    }
}
