//! Patient records.

use super::{empty_as_none, non_blank};
use crate::error::ValidationError;
use crate::types::PatientId;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// A persisted patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Unique identifier, assigned at creation.
    pub id: PatientId,
    /// Full name.
    pub name: String,
    /// Contact phone number.
    pub phone_number: String,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<String>,
    #[serde(
        default,
        deserialize_with = "date_or_empty",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_of_birth: Option<NaiveDate>,
}

/// Input for creating a patient.
#[derive(Debug, Clone, Default)]
pub struct NewPatient {
    pub name: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

impl NewPatient {
    pub fn new(name: impl Into<String>, phone_number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone_number: phone_number.into(),
            email: None,
            date_of_birth: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_date_of_birth(mut self, date: NaiveDate) -> Self {
        self.date_of_birth = Some(date);
        self
    }

    /// Check required fields are present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if self.phone_number.trim().is_empty() {
            return Err(ValidationError::MissingField("phoneNumber"));
        }
        Ok(())
    }

    /// Validate and build the patient under a fresh identifier.
    pub(crate) fn into_patient(self) -> Result<Patient, ValidationError> {
        self.validate()?;
        Ok(Patient {
            id: PatientId::new(),
            name: self.name.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
            email: non_blank(self.email),
            date_of_birth: self.date_of_birth,
        })
    }
}

fn date_or_empty<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match empty_as_none(deserializer)? {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_requires_name_and_phone() {
        assert_eq!(
            NewPatient::new("", "555-1000").validate(),
            Err(ValidationError::MissingField("name"))
        );
        assert_eq!(
            NewPatient::new("Jane Doe", "   ").validate(),
            Err(ValidationError::MissingField("phoneNumber"))
        );
        assert!(NewPatient::new("Jane Doe", "555-1000").validate().is_ok());
    }

    #[test]
    fn test_into_patient_trims_and_drops_blank_email() {
        let patient = NewPatient::new("  Jane Doe ", "555-1000")
            .with_email("  ")
            .into_patient()
            .unwrap();
        assert_eq!(patient.name, "Jane Doe");
        assert_eq!(patient.email, None);
    }

    #[test]
    fn test_legacy_json_with_empty_optionals() {
        let json = r#"{
            "id": "patient_1718000000000",
            "name": "Jane Doe",
            "phoneNumber": "555-1000",
            "email": "",
            "dateOfBirth": ""
        }"#;
        let patient: Patient = serde_json::from_str(json).unwrap();
        assert_eq!(patient.email, None);
        assert_eq!(patient.date_of_birth, None);
    }

    #[test]
    fn test_date_of_birth_parses() {
        let json = r#"{"id":"p1","name":"A","phoneNumber":"1","dateOfBirth":"1990-04-12"}"#;
        let patient: Patient = serde_json::from_str(json).unwrap();
        assert_eq!(
            patient.date_of_birth,
            NaiveDate::from_ymd_opt(1990, 4, 12)
        );

        let out = serde_json::to_string(&patient).unwrap();
        assert!(out.contains("\"dateOfBirth\":\"1990-04-12\""));
    }
}
