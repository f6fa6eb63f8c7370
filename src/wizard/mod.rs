pub mod context;
pub mod message;
pub mod state;
pub mod step;

use iced::widget::{button, scrollable, text, Column, Container, Row};
use iced::{Alignment, Element, Length, Task};
use tracing::{info, warn};

use crate::{
    services::{api, ApiError, BackendClient},
    ui,
};
use context::{Context, StepPayload};
use message::Message;
use state::{NavigationPolicy, WizardState};
use step::Step;

const STEP_GENERAL_INFO: usize = 1;
const STEP_ADDRESS: usize = 2;
const STEP_EDUCATION: usize = 3;
const STEP_FAMILY: usize = 4;
const STEP_OCCUPATION: usize = 5;

pub struct Wizard {
    client: BackendClient,
    context: Context,
    state: WizardState,
    steps: Vec<Box<dyn Step>>,
    loading: bool,
    saving: bool,
    warning: Option<ApiError>,
}

impl Wizard {
    pub fn new(
        client: BackendClient,
        email: String,
        policy: NavigationPolicy,
    ) -> (Self, Task<Message>) {
        let steps: Vec<Box<dyn Step>> = vec![
            step::DefineGeneralInfo::default().into(),
            step::DefineAddress::default().into(),
            step::DefineEducation::default().into(),
            step::DefineFamily::default().into(),
            step::DefineOccupation::default().into(),
            step::Summary::default().into(),
        ];
        let wizard = Self {
            state: WizardState::new(steps.len(), policy),
            context: Context::new(email),
            steps,
            client: client.clone(),
            loading: true,
            saving: false,
            warning: None,
        };
        let load = Task::perform(
            async move { client.my_biodata().await },
            |res| Message::Loaded(Box::new(res)),
        );
        (wizard, load)
    }

    fn current_step(&self) -> &dyn Step {
        self.steps[self.state.current() - 1].as_ref()
    }

    fn current_step_mut(&mut self) -> &mut Box<dyn Step> {
        let i = self.state.current() - 1;
        &mut self.steps[i]
    }

    fn reload_steps(&mut self) {
        for (i, step) in self.steps.iter_mut().enumerate() {
            step.load_context(&self.context, i + 1);
        }
    }

    /// Merge the server-side draft into the context and mark the slots it
    /// fills as completed.
    fn absorb_draft(&mut self, draft: api::Biodata) {
        let mut filled = Vec::new();
        if let Some(v) = draft.general_info {
            self.context
                .set_step_data(STEP_GENERAL_INFO, StepPayload::GeneralInfo(v));
            filled.push(STEP_GENERAL_INFO);
        }
        if let Some(v) = draft.address {
            self.context
                .set_step_data(STEP_ADDRESS, StepPayload::Address(v));
            filled.push(STEP_ADDRESS);
        }
        if let Some(v) = draft.education {
            self.context
                .set_step_data(STEP_EDUCATION, StepPayload::Education(v));
            filled.push(STEP_EDUCATION);
        }
        if let Some(v) = draft.family_info {
            self.context
                .set_step_data(STEP_FAMILY, StepPayload::FamilyInfo(v));
            filled.push(STEP_FAMILY);
        }
        if let Some(v) = draft.occupation {
            self.context
                .set_step_data(STEP_OCCUPATION, StepPayload::Occupation(v));
            filled.push(STEP_OCCUPATION);
        }
        for step in filled {
            self.state.mark_completed(step);
        }
        self.reload_steps();
    }

    fn save_task(&self, step: usize) -> Option<Task<Message>> {
        let payload = self.context.step_data(step)?.clone();
        let client = self.client.clone();
        Some(Task::perform(
            async move {
                match &payload {
                    StepPayload::GeneralInfo(v) => client.save_general_info(v).await,
                    StepPayload::Address(v) => client.save_address(v).await,
                    StepPayload::Education(v) => client.save_education(v).await,
                    StepPayload::FamilyInfo(v) => client.save_family_info(v).await,
                    StepPayload::Occupation(v) => client.save_occupation(v).await,
                }
            },
            move |res| Message::Saved(step, res),
        ))
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Loaded(res) => {
                self.loading = false;
                match *res {
                    Ok(draft) => self.absorb_draft(draft),
                    Err(ApiError::SessionExpired) => {
                        return Task::done(Message::SessionExpired);
                    }
                    Err(e) => {
                        // starting from a blank form is fine, the draft is
                        // only a convenience.
                        warn!("Failed to fetch the saved biodata: {}", e);
                    }
                }
                Task::none()
            }
            Message::Next => {
                if self.saving || self.loading {
                    return Task::none();
                }
                let current = self.state.current();
                let i = current - 1;
                if !self.steps[i].apply(&mut self.context, current) {
                    return Task::none();
                }
                if !self.steps[i].needs_save() {
                    self.state.advance();
                    self.reload_steps();
                    return Task::none();
                }
                match self.save_task(current) {
                    Some(task) => {
                        self.saving = true;
                        self.warning = None;
                        task
                    }
                    None => Task::none(),
                }
            }
            Message::Saved(step, res) => {
                self.saving = false;
                match res {
                    Ok(()) => {
                        info!("Step {} saved", step);
                        self.state.mark_completed(step);
                        if self.state.current() == step {
                            self.state.go_to(step + 1);
                        }
                        self.reload_steps();
                        Task::none()
                    }
                    Err(ApiError::SessionExpired) => Task::done(Message::SessionExpired),
                    Err(e) => {
                        warn!("Failed to save step {}: {}", step, e);
                        self.warning = Some(e);
                        Task::none()
                    }
                }
            }
            Message::Previous => {
                if !self.saving {
                    self.state.retreat();
                    self.reload_steps();
                }
                Task::none()
            }
            Message::Select(step) => {
                if !self.saving && self.state.go_to(step) {
                    self.reload_steps();
                }
                Task::none()
            }
            Message::Logout | Message::SessionExpired => Task::none(),
            msg => self.current_step_mut().update(msg),
        }
    }

    fn sidebar(&self) -> Element<Message> {
        let mut col = Column::new().spacing(5).width(Length::Fixed(220.0));
        for (i, step) in self.steps.iter().enumerate() {
            let number = i + 1;
            let mut label = format!("{}. {}", number, step.title());
            if self.state.is_completed(number) {
                label.push_str(" ✓");
            }
            let mut entry = button(
                text(label)
                    .size(14)
                    .color(if number == self.state.current() {
                        ui::GREEN
                    } else if self.state.is_completed(number) {
                        iced::Color::BLACK
                    } else {
                        ui::GREY
                    }),
            )
            .style(button::text)
            .width(Length::Fill);
            if self.state.is_reachable(number) {
                entry = entry.on_press(Message::Select(number));
            }
            col = col.push(entry);
        }
        col = col.push(
            text(format!(
                "{} of {} steps completed",
                self.state.completed_count(),
                self.state.total() - 1,
            ))
            .size(12)
            .color(ui::GREY),
        );
        col.into()
    }

    pub fn view(&self) -> Element<Message> {
        if self.loading {
            return Container::new(text("Loading your biodata..."))
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into();
        }

        let mut content = Column::new().spacing(20).max_width(600);
        if let Some(warning) = &self.warning {
            content = content.push(ui::warning_banner("Could not save", warning.to_string()));
        }
        content = content.push(self.current_step().view());

        let mut controls = Row::new().spacing(20).align_y(Alignment::Center);
        if self.state.current() > 1 {
            controls = controls.push(
                button(text("Previous"))
                    .style(button::secondary)
                    .on_press_maybe((!self.saving).then_some(Message::Previous)),
            );
        }
        if self.state.current() < self.state.total() {
            controls = controls.push(
                button(text(if self.saving { "Saving..." } else { "Save & Next" }))
                    .width(Length::Fixed(150.0))
                    .on_press_maybe((!self.saving).then_some(Message::Next)),
            );
        }
        content = content.push(controls);

        let layout = Row::new()
            .spacing(40)
            .push(
                Column::new()
                    .spacing(20)
                    .push(self.sidebar())
                    .push(button(text("Logout")).style(button::text).on_press(Message::Logout)),
            )
            .push(scrollable(content));

        Container::new(layout).padding(40).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use message::GeneralInfoMsg;

    fn wizard() -> Wizard {
        let (wizard, _) = Wizard::new(
            BackendClient::new("http://192.0.2.1:1".to_string()),
            "someone@example.com".to_string(),
            NavigationPolicy::Free,
        );
        wizard
    }

    fn loaded_wizard() -> Wizard {
        let mut w = wizard();
        let _ = w.update(Message::Loaded(Box::new(Ok(api::Biodata::default()))));
        w
    }

    #[test]
    fn unfilled_step_blocks_next() {
        let mut w = loaded_wizard();
        let _ = w.update(Message::Next);
        assert!(!w.saving);
        assert_eq!(w.state.current(), 1);
    }

    #[test]
    fn successful_save_completes_and_advances() {
        let mut w = loaded_wizard();
        w.saving = true;
        let _ = w.update(Message::Saved(1, Ok(())));
        assert!(!w.saving);
        assert!(w.state.is_completed(1));
        assert_eq!(w.state.current(), 2);
    }

    #[test]
    fn failed_save_keeps_the_position_and_shows_a_warning() {
        let mut w = loaded_wizard();
        w.saving = true;
        let _ = w.update(Message::Saved(
            1,
            Err(ApiError::Network("connection refused".to_string())),
        ));
        assert!(!w.saving);
        assert!(!w.state.is_completed(1));
        assert_eq!(w.state.current(), 1);
        assert!(w.warning.is_some());
    }

    #[test]
    fn the_server_draft_marks_its_steps_completed() {
        let mut w = wizard();
        let draft = api::Biodata {
            general_info: Some(api::GeneralInfo {
                biodata_type: "Groom".to_string(),
                marital_status: "Unmarried".to_string(),
                birth_date: "1995-04-12".to_string(),
                height: "5'8\"".to_string(),
                complexion: "Medium".to_string(),
                weight: "70".to_string(),
                blood_group: "O+".to_string(),
                nationality: "Bangladeshi".to_string(),
            }),
            ..Default::default()
        };
        let _ = w.update(Message::Loaded(Box::new(Ok(draft))));
        assert!(!w.loading);
        assert!(w.state.is_completed(1));
        assert!(!w.state.is_completed(2));
        assert!(w.context.step_data(1).is_some());
    }

    #[test]
    fn a_failed_draft_fetch_starts_blank() {
        let mut w = wizard();
        let _ = w.update(Message::Loaded(Box::new(Err(ApiError::Network(
            "connection refused".to_string(),
        )))));
        assert!(!w.loading);
        assert!(w.context.step_data.is_empty());
    }

    #[test]
    fn step_messages_reach_the_current_step() {
        let mut w = loaded_wizard();
        let _ = w.update(Message::GeneralInfo(GeneralInfoMsg::HeightEdited(
            "5'6\"".to_string(),
        )));
        // filling only one field still fails validation.
        let _ = w.update(Message::Next);
        assert_eq!(w.state.current(), 1);
    }
}
