use iced::widget::{button, pick_list, scrollable, text, Column, Container, Row};
use iced::{Alignment, Element, Length, Task};

use crate::{
    services::{api, ApiError, BackendClient},
    ui::{self, form},
    validate::{Checker, Violations, PASSWORDS_DONT_MATCH, REQUIRED_FIELD},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Male => write!(f, "Male"),
            Self::Female => write!(f, "Female"),
        }
    }
}

pub struct RegisterPage {
    client: BackendClient,
    full_name: form::Value<String>,
    gender: Option<Gender>,
    email: form::Value<String>,
    mobile: form::Value<String>,
    password: form::Value<String>,
    confirm_password: form::Value<String>,
    date_of_birth: form::Value<String>,
    address: form::Value<String>,
    violations: Violations,
    processing: bool,
    warning: Option<ApiError>,
}

#[derive(Debug, Clone)]
pub enum Message {
    FullNameEdited(String),
    GenderSelected(Gender),
    EmailEdited(String),
    MobileEdited(String),
    PasswordEdited(String),
    ConfirmPasswordEdited(String),
    DateOfBirthEdited(String),
    AddressEdited(String),
    Submit,
    Registered(Result<(), ApiError>),
    // Intercepted by the router.
    Done(String),
    GoToLogin,
}

impl RegisterPage {
    pub fn new(client: BackendClient) -> Self {
        Self {
            client,
            full_name: form::Value::default(),
            gender: None,
            email: form::Value::default(),
            mobile: form::Value::default(),
            password: form::Value::default(),
            confirm_password: form::Value::default(),
            date_of_birth: form::Value::default(),
            address: form::Value::default(),
            violations: Violations::new(),
            processing: false,
            warning: None,
        }
    }

    /// Per-field rules first, then the cross-field password confirmation.
    fn validate(&self) -> Violations {
        let mut checker = Checker::new();
        checker.required("fullName", &self.full_name.value);
        checker.max_len("fullName", &self.full_name.value, 100);
        checker.check("gender", self.gender.is_some(), REQUIRED_FIELD);
        checker.email("email", &self.email.value);
        checker.mobile("mobile", &self.mobile.value);
        checker.password("password", &self.password.value);
        checker.required("confirmPassword", &self.confirm_password.value);
        if !self.confirm_password.value.is_empty() {
            checker.check(
                "confirmPassword",
                self.password.value == self.confirm_password.value,
                PASSWORDS_DONT_MATCH,
            );
        }
        if !self.date_of_birth.value.is_empty() {
            checker.date("dateOfBirth", &self.date_of_birth.value);
        }
        checker.finish()
    }

    fn payload(&self) -> api::RegisterPayload {
        api::RegisterPayload {
            full_name: self.full_name.value.trim().to_string(),
            gender: self
                .gender
                .map(|g| g.to_string())
                .unwrap_or_default(),
            email: self.email.value.clone(),
            mobile: self.mobile.value.clone(),
            password: self.password.value.clone(),
            date_of_birth: (!self.date_of_birth.value.is_empty())
                .then(|| self.date_of_birth.value.clone()),
            address: (!self.address.value.is_empty()).then(|| self.address.value.clone()),
        }
    }

    fn refresh_valid_flags(&mut self) {
        self.full_name.valid = !self.violations.contains_key("fullName");
        self.email.valid = !self.violations.contains_key("email");
        self.mobile.valid = !self.violations.contains_key("mobile");
        self.password.valid = !self.violations.contains_key("password");
        self.confirm_password.valid = !self.violations.contains_key("confirmPassword");
        self.date_of_birth.valid = !self.violations.contains_key("dateOfBirth");
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::FullNameEdited(v) => self.full_name.value = v,
            Message::GenderSelected(g) => self.gender = Some(g),
            Message::EmailEdited(v) => self.email.value = v,
            Message::MobileEdited(v) => self.mobile.value = v,
            Message::PasswordEdited(v) => self.password.value = v,
            Message::ConfirmPasswordEdited(v) => self.confirm_password.value = v,
            Message::DateOfBirthEdited(v) => self.date_of_birth.value = v,
            Message::AddressEdited(v) => self.address.value = v,
            Message::Submit => {
                if self.processing {
                    return Task::none();
                }
                self.violations = self.validate();
                self.refresh_valid_flags();
                if !self.violations.is_empty() {
                    return Task::none();
                }
                self.processing = true;
                self.warning = None;
                let client = self.client.clone();
                let payload = self.payload();
                return Task::perform(
                    async move {
                        client.register(&payload).await?;
                        // the verification code goes out right away so the
                        // OTP screen mounts with a code already in flight.
                        client.send_email_otp(&payload.email).await
                    },
                    Message::Registered,
                );
            }
            Message::Registered(Ok(())) => {
                self.processing = false;
                let email = self.email.value.clone();
                return Task::perform(async move { email }, Message::Done);
            }
            Message::Registered(Err(e)) => {
                self.processing = false;
                // field-level remote violations land under their fields,
                // like local ones, instead of in the banner. They stay
                // until the user edits.
                if let ApiError::Validation { errors, .. } = &e {
                    self.violations = errors.clone();
                    self.refresh_valid_flags();
                }
                self.warning = Some(e);
                return Task::none();
            }
            Message::Done(_) | Message::GoToLogin => return Task::none(),
        }
        // only reached by the edit messages: re-run validation so the
        // field map is always current.
        if !self.violations.is_empty() {
            self.violations = self.validate();
            self.refresh_valid_flags();
        }
        Task::none()
    }

    pub fn view(&self) -> Element<Message> {
        let mut col = Column::new()
            .spacing(15)
            .max_width(500)
            .align_x(Alignment::Center)
            .push(text("Create your account").size(28));

        if let Some(warning) = &self.warning {
            col = col.push(ui::warning_banner("Registration failed", warning.to_string()));
        }

        col = col
            .push(form::Form::new("Full name", &self.full_name, Message::FullNameEdited).padding(10))
            .push_maybe(ui::field_warnings(&self.violations, "fullName"))
            .push(
                Row::new()
                    .spacing(10)
                    .align_y(Alignment::Center)
                    .push(text("Gender"))
                    .push(pick_list(
                        &Gender::ALL[..],
                        self.gender,
                        Message::GenderSelected,
                    )),
            )
            .push_maybe(ui::field_warnings(&self.violations, "gender"))
            .push(form::Form::new_trimmed("Email", &self.email, Message::EmailEdited).padding(10))
            .push_maybe(ui::field_warnings(&self.violations, "email"))
            .push(
                form::Form::new_trimmed("Mobile (11 digits)", &self.mobile, Message::MobileEdited)
                    .padding(10),
            )
            .push_maybe(ui::field_warnings(&self.violations, "mobile"))
            .push(
                form::Form::new("Password", &self.password, Message::PasswordEdited)
                    .secure()
                    .padding(10),
            )
            .push_maybe(ui::field_warnings(&self.violations, "password"))
            .push(
                form::Form::new(
                    "Confirm password",
                    &self.confirm_password,
                    Message::ConfirmPasswordEdited,
                )
                .secure()
                .padding(10),
            )
            .push_maybe(ui::field_warnings(&self.violations, "confirmPassword"))
            .push(
                form::Form::new_trimmed(
                    "Date of birth (YYYY-MM-DD, optional)",
                    &self.date_of_birth,
                    Message::DateOfBirthEdited,
                )
                .padding(10),
            )
            .push_maybe(ui::field_warnings(&self.violations, "dateOfBirth"))
            .push(
                form::Form::new("Address (optional)", &self.address, Message::AddressEdited)
                    .padding(10),
            )
            .push(
                button(text(if self.processing {
                    "Creating account..."
                } else {
                    "Register"
                }))
                .width(Length::Fixed(200.0))
                .on_press_maybe((!self.processing).then_some(Message::Submit)),
            )
            .push(
                button(text("Already registered? Login"))
                    .style(button::text)
                    .on_press(Message::GoToLogin),
            );

        Container::new(scrollable(col))
            .center_x(Length::Fill)
            .padding(50)
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_page() -> RegisterPage {
        let mut page = RegisterPage::new(BackendClient::new("http://192.0.2.1:1".to_string()));
        let _ = page.update(Message::FullNameEdited("Nadia Islam".to_string()));
        let _ = page.update(Message::GenderSelected(Gender::Female));
        let _ = page.update(Message::EmailEdited("nadia@example.com".to_string()));
        let _ = page.update(Message::MobileEdited("01712345678".to_string()));
        let _ = page.update(Message::PasswordEdited("Str0ngpass".to_string()));
        let _ = page.update(Message::ConfirmPasswordEdited("Str0ngpass".to_string()));
        page
    }

    #[test]
    fn all_password_violations_are_reported_at_once() {
        let mut page = filled_page();
        let _ = page.update(Message::PasswordEdited("abcdefgh".to_string()));
        let _ = page.update(Message::ConfirmPasswordEdited("abcdefgh".to_string()));
        let _ = page.update(Message::Submit);
        assert!(!page.processing);
        let messages = page.violations.get("password").unwrap();
        assert!(messages.iter().any(|m| m.contains("uppercase")));
        assert!(messages.iter().any(|m| m.contains("number")));
    }

    #[test]
    fn mismatched_confirmation_is_a_cross_field_violation() {
        let mut page = filled_page();
        let _ = page.update(Message::ConfirmPasswordEdited("Other0pass".to_string()));
        let _ = page.update(Message::Submit);
        assert_eq!(
            page.violations.get("confirmPassword").unwrap(),
            &vec![PASSWORDS_DONT_MATCH.to_string()]
        );
    }

    #[test]
    fn valid_form_goes_out_once() {
        let mut page = filled_page();
        let _ = page.update(Message::Submit);
        assert!(page.processing);
        // second submit while processing is ignored.
        let _ = page.update(Message::Submit);
        assert!(page.processing);
    }

    #[test]
    fn remote_validation_errors_land_under_their_fields() {
        let mut page = filled_page();
        let _ = page.update(Message::Submit);
        let mut errors = std::collections::BTreeMap::new();
        errors.insert(
            "email".to_string(),
            vec!["Email already taken".to_string()],
        );
        let _ = page.update(Message::Registered(Err(ApiError::Validation {
            title: "Validation failed".to_string(),
            errors,
        })));
        assert!(!page.processing);
        assert!(!page.email.valid);
        // the remote messages stay put until the user edits something.
        assert_eq!(
            page.violations.get("email").unwrap(),
            &vec!["Email already taken".to_string()]
        );
        let _ = page.update(Message::EmailEdited("other@example.com".to_string()));
        assert!(!page.violations.contains_key("email"));
        assert!(page.email.valid);
    }
}
