use std::collections::HashMap;

use crate::services::api;

/// The payload a step produced for its slot, ready to be sent to the
/// backend and rendered by the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepPayload {
    GeneralInfo(api::GeneralInfo),
    Address(api::Address),
    Education(api::Education),
    FamilyInfo(api::FamilyInfo),
    Occupation(api::Occupation),
}

/// Data shared between the steps. Each slot is overwritten whole when its
/// step is applied, never patched field by field.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub email: String,
    pub step_data: HashMap<usize, StepPayload>,
}

impl Context {
    pub fn new(email: String) -> Self {
        Self {
            email,
            step_data: HashMap::new(),
        }
    }

    pub fn set_step_data(&mut self, step: usize, payload: StepPayload) {
        self.step_data.insert(step, payload);
    }

    pub fn step_data(&self, step: usize) -> Option<&StepPayload> {
        self.step_data.get(&step)
    }
}

macro_rules! display_options {
    ($name:ident { $($variant:ident => $label:expr,)* }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant,)*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)*];

            pub fn from_label(label: &str) -> Option<Self> {
                Self::ALL.iter().find(|v| v.to_string() == label).copied()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                match self {
                    $($name::$variant => write!(f, $label),)*
                }
            }
        }
    };
}

display_options!(BiodataType {
    Groom => "Groom",
    Bride => "Bride",
});

display_options!(MaritalStatus {
    Unmarried => "Unmarried",
    Married => "Married",
    Divorced => "Divorced",
    Widowed => "Widowed",
});

display_options!(BloodGroup {
    APositive => "A+",
    ANegative => "A-",
    BPositive => "B+",
    BNegative => "B-",
    ABPositive => "AB+",
    ABNegative => "AB-",
    OPositive => "O+",
    ONegative => "O-",
});

display_options!(Complexion {
    Fair => "Fair",
    Medium => "Medium",
    Olive => "Olive",
    Brown => "Brown",
    Dark => "Dark",
});
