use iced::widget::Column;
use iced::Element;

use crate::{
    services::api,
    ui::{self, form},
    validate::{Checker, Violations},
    wizard::{
        context::{Context, StepPayload},
        message::{EducationMsg, Message},
        step::{frame, Step},
    },
};

#[derive(Default)]
pub struct DefineEducation {
    highest_degree: form::Value<String>,
    institution: form::Value<String>,
    passing_year: form::Value<String>,
    violations: Violations,
}

impl DefineEducation {
    fn validate(&self) -> Violations {
        let mut checker = Checker::new();
        checker.required("highestDegree", &self.highest_degree.value);
        checker.required("institution", &self.institution.value);
        checker.required("passingYear", &self.passing_year.value);
        if !self.passing_year.value.is_empty() {
            checker.check(
                "passingYear",
                self.passing_year.value.len() == 4
                    && self.passing_year.value.chars().all(|c| c.is_ascii_digit()),
                "Enter a 4-digit year",
            );
        }
        checker.finish()
    }

    fn refresh_valid_flags(&mut self) {
        self.highest_degree.valid = !self.violations.contains_key("highestDegree");
        self.institution.valid = !self.violations.contains_key("institution");
        self.passing_year.valid = !self.violations.contains_key("passingYear");
    }
}

impl Step for DefineEducation {
    fn title(&self) -> &'static str {
        "Education"
    }

    fn update(&mut self, message: Message) -> iced::Task<Message> {
        if let Message::Education(msg) = message {
            match msg {
                EducationMsg::HighestDegreeEdited(v) => self.highest_degree.value = v,
                EducationMsg::InstitutionEdited(v) => self.institution.value = v,
                EducationMsg::PassingYearEdited(v) => self.passing_year.value = v,
            }
            if !self.violations.is_empty() {
                self.violations = self.validate();
                self.refresh_valid_flags();
            }
        }
        iced::Task::none()
    }

    fn load_context(&mut self, ctx: &Context, step: usize) {
        if let Some(StepPayload::Education(education)) = ctx.step_data(step) {
            self.highest_degree.value = education.highest_degree.clone();
            self.institution.value = education.institution.clone();
            self.passing_year.value = education.passing_year.clone();
        }
    }

    fn apply(&mut self, ctx: &mut Context, step: usize) -> bool {
        self.violations = self.validate();
        self.refresh_valid_flags();
        if self.violations.is_empty() {
            ctx.set_step_data(
                step,
                StepPayload::Education(api::Education {
                    highest_degree: self.highest_degree.value.trim().to_string(),
                    institution: self.institution.value.trim().to_string(),
                    passing_year: self.passing_year.value.clone(),
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
                form::Form::new("Highest degree", &self.highest_degree, |v| {
                    Message::Education(EducationMsg::HighestDegreeEdited(v))
                })
                .padding(10),
            )
            .push_maybe(ui::field_warnings(&self.violations, "highestDegree"))
            .push(
                form::Form::new("Institution", &self.institution, |v| {
                    Message::Education(EducationMsg::InstitutionEdited(v))
                })
                .padding(10),
            )
            .push_maybe(ui::field_warnings(&self.violations, "institution"))
            .push(
                form::Form::new_trimmed("Passing year", &self.passing_year, |v| {
                    Message::Education(EducationMsg::PassingYearEdited(v))
                })
                .padding(10),
            )
            .push_maybe(ui::field_warnings(&self.violations, "passingYear"));

        frame(self.title(), col.into())
    }
}

impl From<DefineEducation> for Box<dyn Step> {
    fn from(step: DefineEducation) -> Box<dyn Step> {
        Box::new(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passing_year_must_be_four_digits() {
        let mut step = DefineEducation::default();
        let _ = step.update(Message::Education(EducationMsg::HighestDegreeEdited(
            "BSc in CSE".to_string(),
        )));
        let _ = step.update(Message::Education(EducationMsg::InstitutionEdited(
            "BUET".to_string(),
        )));
        let _ = step.update(Message::Education(EducationMsg::PassingYearEdited(
            "20x5".to_string(),
        )));
        let mut ctx = Context::new("a@b.cd".to_string());
        assert!(!step.apply(&mut ctx, 3));
        assert!(step.violations.contains_key("passingYear"));

        let _ = step.update(Message::Education(EducationMsg::PassingYearEdited(
            "2015".to_string(),
        )));
        assert!(step.apply(&mut ctx, 3));
    }
}
