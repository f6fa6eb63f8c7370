use iced::widget::{button, pick_list, text, Column, Row};
use iced::{Alignment, Element};

use crate::{
    services::api,
    ui::{self, form},
    validate::{Checker, Violations, REQUIRED_FIELD},
    wizard::{
        context::{Context, MaritalStatus, StepPayload},
        message::{FamilyMsg, Message},
        step::{frame, Step},
    },
};

#[derive(Default)]
struct SiblingForm {
    name: form::Value<String>,
    occupation: form::Value<String>,
    marital_status: Option<MaritalStatus>,
}

#[derive(Default)]
pub struct DefineFamily {
    father_name: form::Value<String>,
    father_occupation: form::Value<String>,
    mother_name: form::Value<String>,
    mother_occupation: form::Value<String>,
    siblings: Vec<SiblingForm>,
    violations: Violations,
}

impl DefineFamily {
    /// Sibling violations are keyed `siblings.N.field`, matching how the
    /// backend reports them.
    fn validate(&self) -> Violations {
        let mut checker = Checker::new();
        checker.required("fatherName", &self.father_name.value);
        checker.required("fatherOccupation", &self.father_occupation.value);
        checker.required("motherName", &self.mother_name.value);
        checker.required("motherOccupation", &self.mother_occupation.value);
        for (i, sibling) in self.siblings.iter().enumerate() {
            checker.required(&format!("siblings.{}.name", i), &sibling.name.value);
            checker.required(
                &format!("siblings.{}.occupation", i),
                &sibling.occupation.value,
            );
            checker.check(
                &format!("siblings.{}.maritalStatus", i),
                sibling.marital_status.is_some(),
                REQUIRED_FIELD,
            );
        }
        checker.finish()
    }

    fn payload(&self) -> api::FamilyInfo {
        api::FamilyInfo {
            father_name: self.father_name.value.trim().to_string(),
            father_occupation: self.father_occupation.value.trim().to_string(),
            mother_name: self.mother_name.value.trim().to_string(),
            mother_occupation: self.mother_occupation.value.trim().to_string(),
            siblings: self
                .siblings
                .iter()
                .map(|s| api::Sibling {
                    name: s.name.value.trim().to_string(),
                    occupation: s.occupation.value.trim().to_string(),
                    marital_status: s.marital_status.map(|v| v.to_string()).unwrap_or_default(),
                })
                .collect(),
        }
    }

    fn refresh_valid_flags(&mut self) {
        self.father_name.valid = !self.violations.contains_key("fatherName");
        self.father_occupation.valid = !self.violations.contains_key("fatherOccupation");
        self.mother_name.valid = !self.violations.contains_key("motherName");
        self.mother_occupation.valid = !self.violations.contains_key("motherOccupation");
        for (i, sibling) in self.siblings.iter_mut().enumerate() {
            sibling.name.valid = !self.violations.contains_key(&format!("siblings.{}.name", i));
            sibling.occupation.valid = !self
                .violations
                .contains_key(&format!("siblings.{}.occupation", i));
        }
    }
}

impl Step for DefineFamily {
    fn title(&self) -> &'static str {
        "Family information"
    }

    fn update(&mut self, message: Message) -> iced::Task<Message> {
        if let Message::Family(msg) = message {
            match msg {
                FamilyMsg::FatherNameEdited(v) => self.father_name.value = v,
                FamilyMsg::FatherOccupationEdited(v) => self.father_occupation.value = v,
                FamilyMsg::MotherNameEdited(v) => self.mother_name.value = v,
                FamilyMsg::MotherOccupationEdited(v) => self.mother_occupation.value = v,
                FamilyMsg::SiblingAdded => self.siblings.push(SiblingForm::default()),
                FamilyMsg::SiblingRemoved(i) => {
                    if i < self.siblings.len() {
                        self.siblings.remove(i);
                    }
                }
                FamilyMsg::SiblingNameEdited(i, v) => {
                    if let Some(sibling) = self.siblings.get_mut(i) {
                        sibling.name.value = v;
                    }
                }
                FamilyMsg::SiblingOccupationEdited(i, v) => {
                    if let Some(sibling) = self.siblings.get_mut(i) {
                        sibling.occupation.value = v;
                    }
                }
                FamilyMsg::SiblingMaritalStatusSelected(i, v) => {
                    if let Some(sibling) = self.siblings.get_mut(i) {
                        sibling.marital_status = Some(v);
                    }
                }
            }
            if !self.violations.is_empty() {
                self.violations = self.validate();
                self.refresh_valid_flags();
            }
        }
        iced::Task::none()
    }

    fn load_context(&mut self, ctx: &Context, step: usize) {
        if let Some(StepPayload::FamilyInfo(family)) = ctx.step_data(step) {
            self.father_name.value = family.father_name.clone();
            self.father_occupation.value = family.father_occupation.clone();
            self.mother_name.value = family.mother_name.clone();
            self.mother_occupation.value = family.mother_occupation.clone();
            self.siblings = family
                .siblings
                .iter()
                .map(|s| SiblingForm {
                    name: form::Value {
                        value: s.name.clone(),
                        valid: true,
                    },
                    occupation: form::Value {
                        value: s.occupation.clone(),
                        valid: true,
                    },
                    marital_status: MaritalStatus::from_label(&s.marital_status),
                })
                .collect();
        }
    }

    fn apply(&mut self, ctx: &mut Context, step: usize) -> bool {
        self.violations = self.validate();
        self.refresh_valid_flags();
        if self.violations.is_empty() {
            ctx.set_step_data(step, StepPayload::FamilyInfo(self.payload()));
            true
        } else {
            false
        }
    }

    fn view(&self) -> Element<Message> {
        let mut col = Column::new()
            .spacing(15)
            .push(
                form::Form::new("Father's name", &self.father_name, |v| {
                    Message::Family(FamilyMsg::FatherNameEdited(v))
                })
                .padding(10),
            )
            .push_maybe(ui::field_warnings(&self.violations, "fatherName"))
            .push(
                form::Form::new("Father's occupation", &self.father_occupation, |v| {
                    Message::Family(FamilyMsg::FatherOccupationEdited(v))
                })
                .padding(10),
            )
            .push_maybe(ui::field_warnings(&self.violations, "fatherOccupation"))
            .push(
                form::Form::new("Mother's name", &self.mother_name, |v| {
                    Message::Family(FamilyMsg::MotherNameEdited(v))
                })
                .padding(10),
            )
            .push_maybe(ui::field_warnings(&self.violations, "motherName"))
            .push(
                form::Form::new("Mother's occupation", &self.mother_occupation, |v| {
                    Message::Family(FamilyMsg::MotherOccupationEdited(v))
                })
                .padding(10),
            )
            .push_maybe(ui::field_warnings(&self.violations, "motherOccupation"));

        for (i, sibling) in self.siblings.iter().enumerate() {
            col = col.push(
                Column::new()
                    .spacing(10)
                    .push(
                        Row::new()
                            .align_y(Alignment::Center)
                            .push(text(format!("Sibling {}", i + 1)).size(16))
                            .push(iced::widget::Space::with_width(iced::Length::Fill))
                            .push(
                                button(text("Remove"))
                                    .style(button::text)
                                    .on_press(Message::Family(FamilyMsg::SiblingRemoved(i))),
                            ),
                    )
                    .push(
                        form::Form::new("Name", &sibling.name, move |v| {
                            Message::Family(FamilyMsg::SiblingNameEdited(i, v))
                        })
                        .padding(10),
                    )
                    .push_maybe(ui::field_warnings(
                        &self.violations,
                        &format!("siblings.{}.name", i),
                    ))
                    .push(
                        form::Form::new("Occupation", &sibling.occupation, move |v| {
                            Message::Family(FamilyMsg::SiblingOccupationEdited(i, v))
                        })
                        .padding(10),
                    )
                    .push_maybe(ui::field_warnings(
                        &self.violations,
                        &format!("siblings.{}.occupation", i),
                    ))
                    .push(pick_list(
                        MaritalStatus::ALL,
                        sibling.marital_status,
                        move |v| Message::Family(FamilyMsg::SiblingMaritalStatusSelected(i, v)),
                    ))
                    .push_maybe(ui::field_warnings(
                        &self.violations,
                        &format!("siblings.{}.maritalStatus", i),
                    )),
            );
        }

        col = col.push(
            button(text("Add a sibling"))
                .style(button::secondary)
                .on_press(Message::Family(FamilyMsg::SiblingAdded)),
        );

        frame(self.title(), col.into())
    }
}

impl From<DefineFamily> for Box<dyn Step> {
    fn from(step: DefineFamily) -> Box<dyn Step> {
        Box::new(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> DefineFamily {
        let mut step = DefineFamily::default();
        let _ = step.update(Message::Family(FamilyMsg::FatherNameEdited(
            "Abdul Karim".to_string(),
        )));
        let _ = step.update(Message::Family(FamilyMsg::FatherOccupationEdited(
            "Teacher".to_string(),
        )));
        let _ = step.update(Message::Family(FamilyMsg::MotherNameEdited(
            "Rahima Begum".to_string(),
        )));
        let _ = step.update(Message::Family(FamilyMsg::MotherOccupationEdited(
            "Homemaker".to_string(),
        )));
        step
    }

    #[test]
    fn no_siblings_is_a_valid_family() {
        let mut step = filled();
        let mut ctx = Context::new("a@b.cd".to_string());
        assert!(step.apply(&mut ctx, 4));
        match ctx.step_data(4).unwrap() {
            StepPayload::FamilyInfo(family) => assert!(family.siblings.is_empty()),
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn an_added_sibling_must_be_filled_in() {
        let mut step = filled();
        let _ = step.update(Message::Family(FamilyMsg::SiblingAdded));
        let mut ctx = Context::new("a@b.cd".to_string());
        assert!(!step.apply(&mut ctx, 4));
        assert!(step.violations.contains_key("siblings.0.name"));
        assert!(step.violations.contains_key("siblings.0.maritalStatus"));

        let _ = step.update(Message::Family(FamilyMsg::SiblingNameEdited(
            0,
            "Tanvir".to_string(),
        )));
        let _ = step.update(Message::Family(FamilyMsg::SiblingOccupationEdited(
            0,
            "Student".to_string(),
        )));
        let _ = step.update(Message::Family(FamilyMsg::SiblingMaritalStatusSelected(
            0,
            MaritalStatus::Unmarried,
        )));
        assert!(step.apply(&mut ctx, 4));
    }

    #[test]
    fn removing_a_sibling_drops_its_violations() {
        let mut step = filled();
        let _ = step.update(Message::Family(FamilyMsg::SiblingAdded));
        let mut ctx = Context::new("a@b.cd".to_string());
        assert!(!step.apply(&mut ctx, 4));
        let _ = step.update(Message::Family(FamilyMsg::SiblingRemoved(0)));
        assert!(step.apply(&mut ctx, 4));
    }
}
