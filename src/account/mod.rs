pub mod forgot;
pub mod login;
pub mod otp;
pub mod register;
