use iced::widget::{text, text_input, Column, Container};
use iced::{Element, Length};

use super::RED;

/// A field value together with its current validity. Fields start out
/// valid so no warning shows before the first submission.
#[derive(Debug, Clone)]
pub struct Value<T> {
    pub value: T,
    pub valid: bool,
}

impl<T: Default> Default for Value<T> {
    fn default() -> Self {
        Self {
            value: T::default(),
            valid: true,
        }
    }
}

pub struct Form<'a, Message> {
    input: text_input::TextInput<'a, Message>,
    warning: Option<&'a str>,
    valid: bool,
}

impl<'a, Message: 'a> Form<'a, Message>
where
    Message: Clone,
{
    pub fn new<F>(placeholder: &str, value: &Value<String>, on_change: F) -> Self
    where
        F: 'static + Fn(String) -> Message,
    {
        Self {
            input: text_input::TextInput::new(placeholder, &value.value).on_input(on_change),
            warning: None,
            valid: value.valid,
        }
    }

    /// An input without an `on_input` handler, so it cannot be edited.
    pub fn new_disabled(placeholder: &str, value: &Value<String>) -> Self {
        Self {
            input: text_input::TextInput::new(placeholder, &value.value),
            warning: None,
            valid: value.valid,
        }
    }

    /// Trims whatever is typed before handing it to `on_change`. For
    /// fields where surrounding whitespace is never meaningful, like
    /// emails and codes.
    pub fn new_trimmed<F>(placeholder: &str, value: &Value<String>, on_change: F) -> Self
    where
        F: 'static + Fn(String) -> Message,
    {
        Self {
            input: text_input::TextInput::new(placeholder, &value.value)
                .on_input(move |s| on_change(s.trim().to_string())),
            warning: None,
            valid: value.valid,
        }
    }

    /// The message shown under the input while the value is invalid.
    pub fn warning(mut self, warning: &'a str) -> Self {
        self.warning = Some(warning);
        self
    }

    /// Masks the input, for passwords.
    pub fn secure(mut self) -> Self {
        self.input = self.input.secure(true);
        self
    }

    pub fn padding(mut self, units: u16) -> Self {
        self.input = self.input.padding(units);
        self
    }

    pub fn size(mut self, size: u16) -> Self {
        self.input = self.input.size(size);
        self
    }
}

impl<'a, Message: 'a + Clone> From<Form<'a, Message>> for Element<'a, Message> {
    fn from(form: Form<'a, Message>) -> Element<'a, Message> {
        Container::new(
            Column::new()
                .push(form.input)
                .push_maybe(if !form.valid {
                    form.warning.map(|message| text(message).size(13).color(RED))
                } else {
                    None
                })
                .width(Length::Fill)
                .spacing(5),
        )
        .width(Length::Fill)
        .into()
    }
}
