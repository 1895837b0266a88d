use super::{ALL_FIELDS_MESSAGE, REQUIRED_FIELDS_MESSAGE};
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupForm {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub full_name: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub email: String,
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub password: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub confirm_password: String,
}

impl SignupForm {
    pub fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|_| Error::validation(REQUIRED_FIELDS_MESSAGE))?;
        if self.password != self.confirm_password {
            return Err(Error::PasswordMismatch);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub password: String,
}

impl LoginForm {
    pub fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|_| Error::validation(ALL_FIELDS_MESSAGE))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PolicyInquiryForm {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub name: String,
    /// Zero counts as not filled in.
    #[serde(default)]
    #[validate(range(min = 1, max = 150))]
    pub age: u32,
    pub gender: Gender,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub mobile_number: String,
    pub dob: NaiveDate,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub place: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub insurance_policy: String,
}

impl PolicyInquiryForm {
    pub fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|_| Error::validation(ALL_FIELDS_MESSAGE))
    }

    pub fn recommended_policy(&self) -> RecommendedPolicy {
        RecommendedPolicy::for_age(self.age)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendedPolicy {
    Basic,
    Comprehensive,
}

impl RecommendedPolicy {
    pub fn for_age(age: u32) -> Self {
        if age < 30 {
            Self::Basic
        } else {
            Self::Comprehensive
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "Basic Health Insurance",
            Self::Comprehensive => "Comprehensive Health Insurance",
        }
    }
}

impl fmt::Display for RecommendedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct DeniedInquiryForm {
    #[validate(length(min = 1))]
    pub patient_name: String,
    #[validate(length(min = 1))]
    pub patient_id: String,
    #[validate(length(min = 1))]
    pub policy_id: String,
    #[validate(length(min = 1))]
    pub policy_name: String,
}

impl DeniedInquiryForm {
    pub fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|_| Error::validation(REQUIRED_FIELDS_MESSAGE))
    }

    pub fn denial_reason(&self) -> DenialReason {
        DenialReason::for_patient_id(&self.patient_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    InsufficientDocumentation,
    PolicyExpired,
}

impl DenialReason {
    pub fn for_patient_id(patient_id: &str) -> Self {
        if patient_id.chars().count() < 5 {
            Self::InsufficientDocumentation
        } else {
            Self::PolicyExpired
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InsufficientDocumentation => "Insufficient documentation",
            Self::PolicyExpired => "Policy expired",
        }
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
