use crate::forms::{DenialReason, DeniedInquiryForm, PolicyInquiryForm};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Option<i64>,
    pub full_name: String,
    pub email: String,
    pub patient_id: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl User {
    pub fn new(
        full_name: String,
        email: String,
        patient_id: Option<String>,
        password_hash: String,
    ) -> Self {
        Self {
            id: None,
            full_name,
            email,
            patient_id,
            password_hash,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyInquiry {
    pub id: Option<i64>,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub mobile_number: String,
    pub dob: NaiveDate,
    pub place: String,
    pub insurance_policy: String,
    pub recommended_policy: String,
    pub created_at: DateTime<Utc>,
}

impl From<&PolicyInquiryForm> for PolicyInquiry {
    fn from(form: &PolicyInquiryForm) -> Self {
        Self {
            id: None,
            name: form.name.clone(),
            age: form.age,
            gender: form.gender.to_string(),
            mobile_number: form.mobile_number.clone(),
            dob: form.dob,
            place: form.place.clone(),
            insurance_policy: form.insurance_policy.clone(),
            recommended_policy: form.recommended_policy().to_string(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeniedInquiry {
    pub id: Option<i64>,
    pub patient_name: String,
    pub patient_id: String,
    pub policy_id: String,
    pub policy_name: String,
    pub denial_reason: String,
    pub document_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DeniedInquiry {
    pub fn new(form: &DeniedInquiryForm, reason: DenialReason, document_path: Option<String>) -> Self {
        Self {
            id: None,
            patient_name: form.patient_name.clone(),
            patient_id: form.patient_id.clone(),
            policy_id: form.policy_id.clone(),
            policy_name: form.policy_name.clone(),
            denial_reason: reason.to_string(),
            document_path,
            created_at: Utc::now(),
        }
    }
}
