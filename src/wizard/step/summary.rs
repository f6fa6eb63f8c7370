use iced::widget::{text, Column, Row};
use iced::Element;

use crate::{
    services::api,
    ui,
    wizard::{
        context::{Context, StepPayload},
        message::Message,
        step::{frame, Step},
    },
};

/// Read-only recap of everything the previous steps collected.
#[derive(Default)]
pub struct Summary {
    general_info: Option<api::GeneralInfo>,
    address: Option<api::Address>,
    education: Option<api::Education>,
    family_info: Option<api::FamilyInfo>,
    occupation: Option<api::Occupation>,
}

fn line<'a>(label: &'a str, value: &'a str) -> Element<'a, Message> {
    Row::new()
        .spacing(10)
        .push(text(label).size(14).color(ui::GREY).width(180))
        .push(text(value).size(14))
        .into()
}

fn section<'a>(
    title: &'a str,
    filled: bool,
    rows: Vec<Element<'a, Message>>,
) -> Element<'a, Message> {
    let mut col = Column::new().spacing(8).push(text(title).size(18));
    if filled {
        for row in rows {
            col = col.push(row);
        }
    } else {
        col = col.push(text("Not filled in yet").size(14).color(ui::RED));
    }
    col.into()
}

impl Step for Summary {
    fn title(&self) -> &'static str {
        "Summary"
    }

    fn load_context(&mut self, ctx: &Context, _step: usize) {
        self.general_info = None;
        self.address = None;
        self.education = None;
        self.family_info = None;
        self.occupation = None;
        for payload in ctx.step_data.values() {
            match payload {
                StepPayload::GeneralInfo(v) => self.general_info = Some(v.clone()),
                StepPayload::Address(v) => self.address = Some(v.clone()),
                StepPayload::Education(v) => self.education = Some(v.clone()),
                StepPayload::FamilyInfo(v) => self.family_info = Some(v.clone()),
                StepPayload::Occupation(v) => self.occupation = Some(v.clone()),
            }
        }
    }

    fn needs_save(&self) -> bool {
        false
    }

    fn view(&self) -> Element<Message> {
        let mut col = Column::new().spacing(25);

        col = col.push(section(
            "General information",
            self.general_info.is_some(),
            self.general_info
                .as_ref()
                .map(|info| {
                    vec![
                        line("Biodata type", &info.biodata_type),
                        line("Marital status", &info.marital_status),
                        line("Birth date", &info.birth_date),
                        line("Height", &info.height),
                        line("Complexion", &info.complexion),
                        line("Weight", &info.weight),
                        line("Blood group", &info.blood_group),
                        line("Nationality", &info.nationality),
                    ]
                })
                .unwrap_or_default(),
        ));

        col = col.push(section(
            "Address",
            self.address.is_some(),
            self.address
                .as_ref()
                .map(|address| {
                    vec![
                        line("Permanent", &address.permanent_address.location),
                        line("Permanent area", &address.permanent_address.area),
                        line(
                            "Present",
                            if address.present_address.same_as_permanent {
                                "Same as permanent"
                            } else {
                                &address.present_address.location
                            },
                        ),
                        line("Grew up in", &address.grew_up_location),
                    ]
                })
                .unwrap_or_default(),
        ));

        col = col.push(section(
            "Education",
            self.education.is_some(),
            self.education
                .as_ref()
                .map(|education| {
                    vec![
                        line("Highest degree", &education.highest_degree),
                        line("Institution", &education.institution),
                        line("Passing year", &education.passing_year),
                    ]
                })
                .unwrap_or_default(),
        ));

        col = col.push(section(
            "Family",
            self.family_info.is_some(),
            self.family_info
                .as_ref()
                .map(|family| {
                    let mut rows = vec![
                        line("Father", &family.father_name),
                        line("Mother", &family.mother_name),
                    ];
                    for sibling in &family.siblings {
                        rows.push(line("Sibling", &sibling.name));
                    }
                    rows
                })
                .unwrap_or_default(),
        ));

        col = col.push(section(
            "Occupation",
            self.occupation.is_some(),
            self.occupation
                .as_ref()
                .map(|occupation| {
                    vec![
                        line("Occupation", &occupation.occupation),
                        line("Description", &occupation.description),
                    ]
                })
                .unwrap_or_default(),
        ));

        frame(self.title(), col.into())
    }
}

impl From<Summary> for Box<dyn Step> {
    fn from(step: Summary) -> Box<dyn Step> {
        Box::new(step)
    }
}
