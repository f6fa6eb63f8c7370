use crate::services::{api, ApiError};
use crate::wizard::context::{BiodataType, BloodGroup, Complexion, MaritalStatus};

#[derive(Debug, Clone)]
pub enum Message {
    Next,
    Previous,
    Select(usize),
    Loaded(Box<Result<api::Biodata, ApiError>>),
    Saved(usize, Result<(), ApiError>),
    GeneralInfo(GeneralInfoMsg),
    Address(AddressMsg),
    Education(EducationMsg),
    Family(FamilyMsg),
    Occupation(OccupationMsg),
    // Both intercepted by the router.
    Logout,
    SessionExpired,
}

#[derive(Debug, Clone)]
pub enum GeneralInfoMsg {
    BiodataTypeSelected(BiodataType),
    MaritalStatusSelected(MaritalStatus),
    BirthDateEdited(String),
    HeightEdited(String),
    ComplexionSelected(Complexion),
    WeightEdited(String),
    BloodGroupSelected(BloodGroup),
    NationalityEdited(String),
}

#[derive(Debug, Clone)]
pub enum AddressMsg {
    PermanentLocationEdited(String),
    PermanentAreaEdited(String),
    SameAsPermanentToggled(bool),
    PresentLocationEdited(String),
    PresentAreaEdited(String),
    GrewUpEdited(String),
}

#[derive(Debug, Clone)]
pub enum EducationMsg {
    HighestDegreeEdited(String),
    InstitutionEdited(String),
    PassingYearEdited(String),
}

#[derive(Debug, Clone)]
pub enum FamilyMsg {
    FatherNameEdited(String),
    FatherOccupationEdited(String),
    MotherNameEdited(String),
    MotherOccupationEdited(String),
    SiblingAdded,
    SiblingRemoved(usize),
    SiblingNameEdited(usize, String),
    SiblingOccupationEdited(usize, String),
    SiblingMaritalStatusSelected(usize, MaritalStatus),
}

#[derive(Debug, Clone)]
pub enum OccupationMsg {
    OccupationEdited(String),
    DescriptionEdited(String),
}
