use iced::widget::Column;
use iced::Element;

use crate::{
    services::api,
    ui::{self, form},
    validate::{Checker, Violations},
    wizard::{
        context::{Context, StepPayload},
        message::{Message, OccupationMsg},
        step::{frame, Step},
    },
};

#[derive(Default)]
pub struct DefineOccupation {
    occupation: form::Value<String>,
    description: form::Value<String>,
    violations: Violations,
}

impl DefineOccupation {
    fn validate(&self) -> Violations {
        let mut checker = Checker::new();
        checker.required("occupation", &self.occupation.value);
        checker.required("description", &self.description.value);
        checker.max_len("description", &self.description.value, 500);
        checker.finish()
    }
}

impl Step for DefineOccupation {
    fn title(&self) -> &'static str {
        "Occupation"
    }

    fn update(&mut self, message: Message) -> iced::Task<Message> {
        if let Message::Occupation(msg) = message {
            match msg {
                OccupationMsg::OccupationEdited(v) => self.occupation.value = v,
                OccupationMsg::DescriptionEdited(v) => self.description.value = v,
            }
            if !self.violations.is_empty() {
                self.violations = self.validate();
                self.occupation.valid = !self.violations.contains_key("occupation");
                self.description.valid = !self.violations.contains_key("description");
            }
        }
        iced::Task::none()
    }

    fn load_context(&mut self, ctx: &Context, step: usize) {
        if let Some(StepPayload::Occupation(occupation)) = ctx.step_data(step) {
            self.occupation.value = occupation.occupation.clone();
            self.description.value = occupation.description.clone();
        }
    }

    fn apply(&mut self, ctx: &mut Context, step: usize) -> bool {
        self.violations = self.validate();
        self.occupation.valid = !self.violations.contains_key("occupation");
        self.description.valid = !self.violations.contains_key("description");
        if self.violations.is_empty() {
            ctx.set_step_data(
                step,
                StepPayload::Occupation(api::Occupation {
                    occupation: self.occupation.value.trim().to_string(),
                    description: self.description.value.trim().to_string(),
                }),
            );
            true
        } else {
            false
        }
    }

    fn view(&self) -> Element<Message> {
        let col = Column::new()
            .spacing(15)
            .push(
                form::Form::new("Occupation", &self.occupation, |v| {
                    Message::Occupation(OccupationMsg::OccupationEdited(v))
                })
                .padding(10),
            )
            .push_maybe(ui::field_warnings(&self.violations, "occupation"))
            .push(
                form::Form::new("Describe your work", &self.description, |v| {
                    Message::Occupation(OccupationMsg::DescriptionEdited(v))
                })
                .padding(10),
            )
            .push_maybe(ui::field_warnings(&self.violations, "description"));

        frame(self.title(), col.into())
    }
}

impl From<DefineOccupation> for Box<dyn Step> {
    fn from(step: DefineOccupation) -> Box<dyn Step> {
        Box::new(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_has_a_length_cap() {
        let mut step = DefineOccupation::default();
        let _ = step.update(Message::Occupation(OccupationMsg::OccupationEdited(
            "Software engineer".to_string(),
        )));
        let _ = step.update(Message::Occupation(OccupationMsg::DescriptionEdited(
            "x".repeat(501),
        )));
        let mut ctx = Context::new("a@b.cd".to_string());
        assert!(!step.apply(&mut ctx, 5));
        assert!(step.violations.contains_key("description"));
    }
}
