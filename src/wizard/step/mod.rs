pub mod address;
pub mod education;
pub mod family;
pub mod general_info;
pub mod occupation;
pub mod summary;

pub use address::DefineAddress;
pub use education::DefineEducation;
pub use family::DefineFamily;
pub use general_info::DefineGeneralInfo;
pub use occupation::DefineOccupation;
pub use summary::Summary;

use iced::widget::{text, Column};
use iced::{Element, Task};

use crate::wizard::context::Context;
use crate::wizard::message::Message;

/// One screen of the wizard. `apply` validates the form and, on success,
/// writes the whole payload into the context slot for `step`.
pub trait Step {
    fn title(&self) -> &'static str;

    fn update(&mut self, _message: Message) -> Task<Message> {
        Task::none()
    }

    fn view(&self) -> Element<Message>;

    /// Called with the shared context whenever another step changed it.
    fn load_context(&mut self, _ctx: &Context, _step: usize) {}

    fn apply(&mut self, _ctx: &mut Context, _step: usize) -> bool {
        true
    }

    /// Whether a successful apply must be pushed to the backend.
    fn needs_save(&self) -> bool {
        true
    }
}

pub fn frame<'a>(title: &'static str, content: Element<'a, Message>) -> Element<'a, Message> {
    Column::new()
        .spacing(20)
        .push(text(title).size(24))
        .push(content)
        .into()
}
