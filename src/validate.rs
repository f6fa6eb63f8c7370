//! Declarative field validation for the step forms.
//!
//! Rules are evaluated synchronously on every change and on submission.
//! Every currently failing rule is recorded, not just the first, as a
//! mapping from the field path (e.g. `"permanentAddress.location"`) to its
//! messages. Submission is only permitted when the mapping is empty.

use std::collections::BTreeMap;

pub const REQUIRED_FIELD: &str = "This field is required";
pub const INVALID_EMAIL: &str = "Invalid email address";
pub const INVALID_MOBILE: &str = "Must be a valid 11-digit phone number";
pub const PASSWORDS_DONT_MATCH: &str = "Passwords don't match";
pub const INVALID_OTP: &str = "Please enter a 6-digit OTP";

pub type Violations = BTreeMap<String, Vec<String>>;

pub struct Checker {
    violations: Violations,
}

impl Checker {
    pub fn new() -> Self {
        Self {
            violations: Violations::new(),
        }
    }

    pub fn record(&mut self, field: &str, message: &str) {
        self.violations
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    /// Records `message` unless `ok` holds.
    pub fn check(&mut self, field: &str, ok: bool, message: &str) {
        if !ok {
            self.record(field, message);
        }
    }

    pub fn required(&mut self, field: &str, value: &str) {
        self.check(field, !value.trim().is_empty(), REQUIRED_FIELD);
    }

    pub fn max_len(&mut self, field: &str, value: &str, max: usize) {
        self.check(
            field,
            value.chars().count() <= max,
            &format!("Must be at most {} characters", max),
        );
    }

    /// RFC-compliance of the address, with a required TLD.
    pub fn email(&mut self, field: &str, value: &str) {
        if value.is_empty() {
            self.record(field, REQUIRED_FIELD);
            return;
        }
        let ok = email_address::EmailAddress::parse_with_options(
            value,
            email_address::Options::default().with_required_tld(),
        )
        .is_ok();
        self.check(field, ok, INVALID_EMAIL);
    }

    /// An 11-digit Bangladeshi mobile number.
    pub fn mobile(&mut self, field: &str, value: &str) {
        if value.is_empty() {
            self.record(field, REQUIRED_FIELD);
            return;
        }
        self.check(
            field,
            value.len() == 11 && is_digits(value),
            INVALID_MOBILE,
        );
    }

    /// Each failing password rule contributes its own message, so a weak
    /// password lists everything that is missing at once.
    pub fn password(&mut self, field: &str, value: &str) {
        self.check(
            field,
            value.chars().count() >= 8,
            "Password must be at least 8 characters",
        );
        self.check(
            field,
            value.chars().any(|c| c.is_ascii_uppercase()),
            "Password must contain at least one uppercase letter",
        );
        self.check(
            field,
            value.chars().any(|c| c.is_ascii_lowercase()),
            "Password must contain at least one lowercase letter",
        );
        self.check(
            field,
            value.chars().any(|c| c.is_ascii_digit()),
            "Password must contain at least one number",
        );
    }

    /// A parseable `YYYY-MM-DD` date.
    pub fn date(&mut self, field: &str, value: &str) {
        if value.is_empty() {
            self.record(field, REQUIRED_FIELD);
            return;
        }
        let ok = chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok();
        self.check(field, ok, "Invalid date format");
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn finish(self) -> Violations {
        self.violations
    }
}

impl Default for Checker {
    fn default() -> Self {
        Self::new()
    }
}

pub fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// An OTP code is exactly 6 numeric characters.
pub fn is_valid_otp(code: &str) -> bool {
    code.len() == 6 && is_digits(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weak_password_reports_every_missing_class() {
        let mut checker = Checker::new();
        checker.password("password", "abcdefgh");
        let violations = checker.finish();
        let messages = violations.get("password").unwrap();
        // no uppercase, no digit; length and lowercase are fine.
        assert_eq!(messages.len(), 2);
        assert!(messages.iter().any(|m| m.contains("uppercase")));
        assert!(messages.iter().any(|m| m.contains("number")));
    }

    #[test]
    fn short_password_stacks_with_other_failures() {
        let mut checker = Checker::new();
        checker.password("password", "ab");
        let messages = checker.finish().remove("password").unwrap();
        assert_eq!(messages.len(), 3);
    }

    #[test]
    fn email_requires_tld() {
        let mut checker = Checker::new();
        checker.email("email", "someone@localhost");
        assert!(!checker.is_empty());

        let mut checker = Checker::new();
        checker.email("email", "someone@example.com");
        assert!(checker.is_empty());
    }

    #[test]
    fn empty_email_is_a_required_violation() {
        let mut checker = Checker::new();
        checker.email("email", "");
        assert_eq!(
            checker.finish().remove("email").unwrap(),
            vec![REQUIRED_FIELD.to_string()]
        );
    }

    #[test]
    fn mobile_must_be_eleven_digits() {
        for bad in ["0123", "abcdefghijk", "012345678901"] {
            let mut checker = Checker::new();
            checker.mobile("mobile", bad);
            assert!(!checker.is_empty(), "{} should be rejected", bad);
        }
        let mut checker = Checker::new();
        checker.mobile("mobile", "01712345678");
        assert!(checker.is_empty());
    }

    #[test]
    fn otp_shape() {
        assert!(is_valid_otp("123456"));
        assert!(!is_valid_otp("12345"));
        assert!(!is_valid_otp("1234567"));
        assert!(!is_valid_otp("12345a"));
        assert!(!is_valid_otp(""));
    }

    #[test]
    fn violations_are_ordered_by_field_path() {
        let mut checker = Checker::new();
        checker.required("b", "");
        checker.required("a", "");
        let fields: Vec<_> = checker.finish().into_keys().collect();
        assert_eq!(fields, vec!["a".to_string(), "b".to_string()]);
    }
}
