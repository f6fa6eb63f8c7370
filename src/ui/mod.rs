pub mod form;

use iced::widget::{container, text, Column, Container};
use iced::{Color, Element, Length};

use crate::validate::Violations;

pub const RED: Color = Color::from_rgb(0.86, 0.20, 0.27);
pub const GREEN: Color = Color::from_rgb(0.13, 0.55, 0.13);
pub const GREY: Color = Color::from_rgb(0.45, 0.45, 0.45);

const CAPTION_SIZE: u16 = 13;

/// A red banner for remote or classified errors, displayed above the form.
pub fn warning_banner<'a, Message: 'a>(title: &'a str, message: String) -> Container<'a, Message> {
    container(
        Column::new()
            .spacing(5)
            .push(text(title).color(RED))
            .push(text(message).size(CAPTION_SIZE)),
    )
    .padding(10)
    .width(Length::Fill)
}

/// A green banner for transient success notices.
pub fn notice_banner<'a, Message: 'a>(message: impl Into<String>) -> Container<'a, Message> {
    container(text(message.into()).color(GREEN))
        .padding(10)
        .width(Length::Fill)
}

/// Every violation recorded for the given field path, one caption per message.
///
/// Local validation errors are rendered inline under their field, separate
/// from remote errors which go through [`warning_banner`].
pub fn field_warnings<'a, Message: 'a>(
    violations: &'a Violations,
    field: &str,
) -> Option<Element<'a, Message>> {
    let messages = violations.get(field)?;
    let mut col = Column::new().spacing(2);
    for message in messages {
        col = col.push(text(message.as_str()).size(CAPTION_SIZE).color(RED));
    }
    Some(col.into())
}
