use iced::widget::{checkbox, Column};
use iced::Element;

use crate::{
    services::api,
    ui::{self, form},
    validate::{Checker, Violations},
    wizard::{
        context::{Context, StepPayload},
        message::{AddressMsg, Message},
        step::{frame, Step},
    },
};

#[derive(Default)]
pub struct DefineAddress {
    permanent_location: form::Value<String>,
    permanent_area: form::Value<String>,
    same_as_permanent: bool,
    present_location: form::Value<String>,
    present_area: form::Value<String>,
    grew_up: form::Value<String>,
    violations: Violations,
}

impl DefineAddress {
    fn validate(&self) -> Violations {
        let mut checker = Checker::new();
        checker.required("permanentLocation", &self.permanent_location.value);
        checker.required("permanentArea", &self.permanent_area.value);
        if !self.same_as_permanent {
            checker.required("presentLocation", &self.present_location.value);
            checker.required("presentArea", &self.present_area.value);
        }
        checker.required("grewUpLocation", &self.grew_up.value);
        checker.finish()
    }

    /// The mirroring happens here, not in the edit handlers, so the user's
    /// own present-address input survives toggling the checkbox on and off.
    fn payload(&self) -> api::Address {
        let (location, area) = if self.same_as_permanent {
            (
                self.permanent_location.value.trim().to_string(),
                self.permanent_area.value.trim().to_string(),
            )
        } else {
            (
                self.present_location.value.trim().to_string(),
                self.present_area.value.trim().to_string(),
            )
        };
        api::Address {
            permanent_address: api::AddressFields {
                location: self.permanent_location.value.trim().to_string(),
                area: self.permanent_area.value.trim().to_string(),
            },
            present_address: api::PresentAddress {
                same_as_permanent: self.same_as_permanent,
                location,
                area,
            },
            grew_up_location: self.grew_up.value.trim().to_string(),
        }
    }

    fn refresh_valid_flags(&mut self) {
        self.permanent_location.valid = !self.violations.contains_key("permanentLocation");
        self.permanent_area.valid = !self.violations.contains_key("permanentArea");
        self.present_location.valid = !self.violations.contains_key("presentLocation");
        self.present_area.valid = !self.violations.contains_key("presentArea");
        self.grew_up.valid = !self.violations.contains_key("grewUpLocation");
    }
}

impl Step for DefineAddress {
    fn title(&self) -> &'static str {
        "Address"
    }

    fn update(&mut self, message: Message) -> iced::Task<Message> {
        if let Message::Address(msg) = message {
            match msg {
                AddressMsg::PermanentLocationEdited(v) => self.permanent_location.value = v,
                AddressMsg::PermanentAreaEdited(v) => self.permanent_area.value = v,
                AddressMsg::SameAsPermanentToggled(v) => self.same_as_permanent = v,
                AddressMsg::PresentLocationEdited(v) => self.present_location.value = v,
                AddressMsg::PresentAreaEdited(v) => self.present_area.value = v,
                AddressMsg::GrewUpEdited(v) => self.grew_up.value = v,
            }
            if !self.violations.is_empty() {
                self.violations = self.validate();
                self.refresh_valid_flags();
            }
        }
        iced::Task::none()
    }

    fn load_context(&mut self, ctx: &Context, step: usize) {
        if let Some(StepPayload::Address(address)) = ctx.step_data(step) {
            self.permanent_location.value = address.permanent_address.location.clone();
            self.permanent_area.value = address.permanent_address.area.clone();
            self.same_as_permanent = address.present_address.same_as_permanent;
            if !self.same_as_permanent {
                self.present_location.value = address.present_address.location.clone();
                self.present_area.value = address.present_address.area.clone();
            }
            self.grew_up.value = address.grew_up_location.clone();
        }
    }

    fn apply(&mut self, ctx: &mut Context, step: usize) -> bool {
        self.violations = self.validate();
        self.refresh_valid_flags();
        if self.violations.is_empty() {
            ctx.set_step_data(step, StepPayload::Address(self.payload()));
            true
        } else {
            false
        }
    }

    fn view(&self) -> Element<Message> {
        let mut col = Column::new()
            .spacing(15)
            .push(
                form::Form::new("Permanent address", &self.permanent_location, |v| {
                    Message::Address(AddressMsg::PermanentLocationEdited(v))
                })
                .padding(10),
            )
            .push_maybe(ui::field_warnings(&self.violations, "permanentLocation"))
            .push(
                form::Form::new("Permanent area / district", &self.permanent_area, |v| {
                    Message::Address(AddressMsg::PermanentAreaEdited(v))
                })
                .padding(10),
            )
            .push_maybe(ui::field_warnings(&self.violations, "permanentArea"))
            .push(
                checkbox("Present address same as permanent", self.same_as_permanent)
                    .on_toggle(|v| Message::Address(AddressMsg::SameAsPermanentToggled(v))),
            );

        if !self.same_as_permanent {
            col = col
                .push(
                    form::Form::new("Present address", &self.present_location, |v| {
                        Message::Address(AddressMsg::PresentLocationEdited(v))
                    })
                    .padding(10),
                )
                .push_maybe(ui::field_warnings(&self.violations, "presentLocation"))
                .push(
                    form::Form::new("Present area / district", &self.present_area, |v| {
                        Message::Address(AddressMsg::PresentAreaEdited(v))
                    })
                    .padding(10),
                )
                .push_maybe(ui::field_warnings(&self.violations, "presentArea"));
        }

        col = col
            .push(
                form::Form::new("Where did you grow up?", &self.grew_up, |v| {
                    Message::Address(AddressMsg::GrewUpEdited(v))
                })
                .padding(10),
            )
            .push_maybe(ui::field_warnings(&self.violations, "grewUpLocation"));

        frame(self.title(), col.into())
    }
}

impl From<DefineAddress> for Box<dyn Step> {
    fn from(step: DefineAddress) -> Box<dyn Step> {
        Box::new(step)
    }
}
