use iced::widget::{pick_list, text, Column, Row};
use iced::{Alignment, Element};

use crate::{
    services::api,
    ui::{self, form},
    validate::{Checker, Violations, REQUIRED_FIELD},
    wizard::{
        context::{BiodataType, BloodGroup, Complexion, Context, MaritalStatus, StepPayload},
        message::{GeneralInfoMsg, Message},
        step::{frame, Step},
    },
};

pub struct DefineGeneralInfo {
    biodata_type: Option<BiodataType>,
    marital_status: Option<MaritalStatus>,
    birth_date: form::Value<String>,
    height: form::Value<String>,
    complexion: Option<Complexion>,
    weight: form::Value<String>,
    blood_group: Option<BloodGroup>,
    nationality: form::Value<String>,
    violations: Violations,
}

impl Default for DefineGeneralInfo {
    fn default() -> Self {
        Self {
            biodata_type: None,
            marital_status: None,
            birth_date: form::Value::default(),
            height: form::Value::default(),
            complexion: None,
            weight: form::Value::default(),
            blood_group: None,
            nationality: form::Value {
                value: "Bangladeshi".to_string(),
                valid: true,
            },
            violations: Violations::new(),
        }
    }
}

impl DefineGeneralInfo {
    fn validate(&self) -> Violations {
        let mut checker = Checker::new();
        checker.check("biodataType", self.biodata_type.is_some(), REQUIRED_FIELD);
        checker.check(
            "maritalStatus",
            self.marital_status.is_some(),
            REQUIRED_FIELD,
        );
        checker.date("birthDate", &self.birth_date.value);
        checker.required("height", &self.height.value);
        checker.check("complexion", self.complexion.is_some(), REQUIRED_FIELD);
        checker.required("weight", &self.weight.value);
        checker.check("bloodGroup", self.blood_group.is_some(), REQUIRED_FIELD);
        checker.required("nationality", &self.nationality.value);
        checker.finish()
    }

    fn payload(&self) -> api::GeneralInfo {
        api::GeneralInfo {
            biodata_type: self.biodata_type.map(|v| v.to_string()).unwrap_or_default(),
            marital_status: self
                .marital_status
                .map(|v| v.to_string())
                .unwrap_or_default(),
            birth_date: self.birth_date.value.clone(),
            height: self.height.value.trim().to_string(),
            complexion: self.complexion.map(|v| v.to_string()).unwrap_or_default(),
            weight: self.weight.value.trim().to_string(),
            blood_group: self.blood_group.map(|v| v.to_string()).unwrap_or_default(),
            nationality: self.nationality.value.trim().to_string(),
        }
    }

    fn picker<'a, T: Clone + PartialEq + std::fmt::Display + 'static>(
        &'a self,
        label: &'a str,
        options: &'a [T],
        selected: Option<T>,
        on_select: impl Fn(T) -> Message + 'a,
        field: &str,
    ) -> Element<'a, Message> {
        Column::new()
            .spacing(5)
            .push(
                Row::new()
                    .spacing(10)
                    .align_y(Alignment::Center)
                    .push(text(label).width(120))
                    .push(pick_list(options, selected, on_select)),
            )
            .push_maybe(ui::field_warnings(&self.violations, field))
            .into()
    }
}

impl Step for DefineGeneralInfo {
    fn title(&self) -> &'static str {
        "General information"
    }

    fn update(&mut self, message: Message) -> iced::Task<Message> {
        if let Message::GeneralInfo(msg) = message {
            match msg {
                GeneralInfoMsg::BiodataTypeSelected(v) => self.biodata_type = Some(v),
                GeneralInfoMsg::MaritalStatusSelected(v) => self.marital_status = Some(v),
                GeneralInfoMsg::BirthDateEdited(v) => self.birth_date.value = v,
                GeneralInfoMsg::HeightEdited(v) => self.height.value = v,
                GeneralInfoMsg::ComplexionSelected(v) => self.complexion = Some(v),
                GeneralInfoMsg::WeightEdited(v) => self.weight.value = v,
                GeneralInfoMsg::BloodGroupSelected(v) => self.blood_group = Some(v),
                GeneralInfoMsg::NationalityEdited(v) => self.nationality.value = v,
            }
            if !self.violations.is_empty() {
                self.violations = self.validate();
                self.birth_date.valid = !self.violations.contains_key("birthDate");
                self.height.valid = !self.violations.contains_key("height");
                self.weight.valid = !self.violations.contains_key("weight");
                self.nationality.valid = !self.violations.contains_key("nationality");
            }
        }
        iced::Task::none()
    }

    fn load_context(&mut self, ctx: &Context, step: usize) {
        if let Some(StepPayload::GeneralInfo(info)) = ctx.step_data(step) {
            self.biodata_type = BiodataType::from_label(&info.biodata_type);
            self.marital_status = MaritalStatus::from_label(&info.marital_status);
            self.birth_date.value = info.birth_date.clone();
            self.height.value = info.height.clone();
            self.complexion = Complexion::from_label(&info.complexion);
            self.weight.value = info.weight.clone();
            self.blood_group = BloodGroup::from_label(&info.blood_group);
            self.nationality.value = info.nationality.clone();
        }
    }

    fn apply(&mut self, ctx: &mut Context, step: usize) -> bool {
        self.violations = self.validate();
        self.birth_date.valid = !self.violations.contains_key("birthDate");
        self.height.valid = !self.violations.contains_key("height");
        self.weight.valid = !self.violations.contains_key("weight");
        self.nationality.valid = !self.violations.contains_key("nationality");
        if self.violations.is_empty() {
            ctx.set_step_data(step, StepPayload::GeneralInfo(self.payload()));
            true
        } else {
            false
        }
    }

    fn view(&self) -> Element<Message> {
        let col = Column::new()
            .spacing(15)
            .push(self.picker(
                "I am a",
                BiodataType::ALL,
                self.biodata_type,
                |v| Message::GeneralInfo(GeneralInfoMsg::BiodataTypeSelected(v)),
                "biodataType",
            ))
            .push(self.picker(
                "Marital status",
                MaritalStatus::ALL,
                self.marital_status,
                |v| Message::GeneralInfo(GeneralInfoMsg::MaritalStatusSelected(v)),
                "maritalStatus",
            ))
            .push(
                form::Form::new_trimmed("Birth date (YYYY-MM-DD)", &self.birth_date, |v| {
                    Message::GeneralInfo(GeneralInfoMsg::BirthDateEdited(v))
                })
                .padding(10),
            )
            .push_maybe(ui::field_warnings(&self.violations, "birthDate"))
            .push(
                form::Form::new("Height (e.g. 5'6\")", &self.height, |v| {
                    Message::GeneralInfo(GeneralInfoMsg::HeightEdited(v))
                })
                .padding(10),
            )
            .push_maybe(ui::field_warnings(&self.violations, "height"))
            .push(self.picker(
                "Complexion",
                Complexion::ALL,
                self.complexion,
                |v| Message::GeneralInfo(GeneralInfoMsg::ComplexionSelected(v)),
                "complexion",
            ))
            .push(
                form::Form::new("Weight (kg)", &self.weight, |v| {
                    Message::GeneralInfo(GeneralInfoMsg::WeightEdited(v))
                })
                .padding(10),
            )
            .push_maybe(ui::field_warnings(&self.violations, "weight"))
            .push(self.picker(
                "Blood group",
                BloodGroup::ALL,
                self.blood_group,
                |v| Message::GeneralInfo(GeneralInfoMsg::BloodGroupSelected(v)),
                "bloodGroup",
            ))
            .push(
                form::Form::new("Nationality", &self.nationality, |v| {
                    Message::GeneralInfo(GeneralInfoMsg::NationalityEdited(v))
                })
                .padding(10),
            )
            .push_maybe(ui::field_warnings(&self.violations, "nationality"));

        frame(self.title(), col.into())
    }
}

impl From<DefineGeneralInfo> for Box<dyn Step> {
    fn from(step: DefineGeneralInfo) -> Box<dyn Step> {
        Box::new(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_form_reports_every_field() {
        let mut step = DefineGeneralInfo::default();
        let mut ctx = Context::new("a@b.cd".to_string());
        assert!(!step.apply(&mut ctx, 1));
        for field in [
            "biodataType",
            "maritalStatus",
            "birthDate",
            "height",
            "complexion",
            "weight",
            "bloodGroup",
        ] {
            assert!(step.violations.contains_key(field), "missing {}", field);
        }
        // nationality is prefilled and passes.
        assert!(!step.violations.contains_key("nationality"));
        assert!(ctx.step_data(1).is_none());
    }

    #[test]
    fn filled_form_lands_whole_in_the_context() {
        let mut step = DefineGeneralInfo::default();
        let _ = step.update(Message::GeneralInfo(GeneralInfoMsg::BiodataTypeSelected(
            BiodataType::Groom,
        )));
        let _ = step.update(Message::GeneralInfo(GeneralInfoMsg::MaritalStatusSelected(
            MaritalStatus::Unmarried,
        )));
        let _ = step.update(Message::GeneralInfo(GeneralInfoMsg::BirthDateEdited(
            "1995-04-12".to_string(),
        )));
        let _ = step.update(Message::GeneralInfo(GeneralInfoMsg::HeightEdited(
            "5'8\"".to_string(),
        )));
        let _ = step.update(Message::GeneralInfo(GeneralInfoMsg::ComplexionSelected(
            Complexion::Medium,
        )));
        let _ = step.update(Message::GeneralInfo(GeneralInfoMsg::WeightEdited(
            "70".to_string(),
        )));
        let _ = step.update(Message::GeneralInfo(GeneralInfoMsg::BloodGroupSelected(
            BloodGroup::OPositive,
        )));
        let mut ctx = Context::new("a@b.cd".to_string());
        assert!(step.apply(&mut ctx, 1));
        match ctx.step_data(1).unwrap() {
            StepPayload::GeneralInfo(info) => {
                assert_eq!(info.blood_group, "O+");
                assert_eq!(info.nationality, "Bangladeshi");
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }
}
