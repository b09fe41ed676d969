//! The case registration form: a string-valued draft, edited one field at a
//! time and validated as a whole on submit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::ConfigError;
use crate::model::{CaseDetails, Gender, PhoneNumber, Severity};
use crate::{DATE_FORMAT, DEFAULT_SYMPTOMS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Name,
    Dob,
    Gender,
    Phone,
    Symptom,
    Severity,
    Location,
}

impl FormField {
    pub const ALL: [Self; 7] = [
        Self::Name,
        Self::Dob,
        Self::Gender,
        Self::Phone,
        Self::Symptom,
        Self::Severity,
        Self::Location,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Dob => "dob",
            Self::Gender => "gender",
            Self::Phone => "phone",
            Self::Symptom => "symptom",
            Self::Severity => "severity",
            Self::Location => "location",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Patient Name",
            Self::Dob => "Date of Birth",
            Self::Gender => "Gender",
            Self::Phone => "Phone Number",
            Self::Symptom => "Primary Symptom",
            Self::Severity => "Severity Level",
            Self::Location => "Patient Location",
        }
    }
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldError {
    #[error("{} is required", .0.label())]
    Required(FormField),

    #[error("Date of Birth must be a valid date (YYYY-MM-DD)")]
    InvalidDate,

    #[error("Gender must be Male, Female or Other")]
    InvalidGender,

    #[error("Phone Number must be exactly 10 digits")]
    InvalidPhone,

    #[error("Primary Symptom must be chosen from the list")]
    UnknownSymptom,

    #[error("Severity Level must be Mild, Moderate or Severe")]
    InvalidSeverity,
}

impl FieldError {
    #[must_use]
    pub const fn field(self) -> FormField {
        match self {
            Self::Required(field) => field,
            Self::InvalidDate => FormField::Dob,
            Self::InvalidGender => FormField::Gender,
            Self::InvalidPhone => FormField::Phone,
            Self::UnknownSymptom => FormField::Symptom,
            Self::InvalidSeverity => FormField::Severity,
        }
    }
}

/// Every field that failed one submission, at most one error per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = FieldError> + '_ {
        self.0.iter().copied()
    }

    #[must_use]
    pub fn for_field(&self, field: FormField) -> Option<FieldError> {
        self.iter().find(|e| e.field() == field)
    }

    pub fn clear_field(&mut self, field: FormField) {
        self.0.retain(|e| e.field() != field);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut errors = self.0.iter();
        match errors.next() {
            None => f.write_str("no validation errors"),
            Some(first) => {
                write!(f, "{first}")?;
                for error in errors {
                    write!(f, "; {error}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationErrors {}

/// The fixed list of symptom labels the form offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct SymptomCatalog(Vec<String>);

impl SymptomCatalog {
    pub fn new(labels: Vec<String>) -> Result<Self, ConfigError> {
        if labels.is_empty() {
            return Err(ConfigError::EmptySymptomCatalog);
        }
        for (i, label) in labels.iter().enumerate() {
            if label.trim().is_empty() {
                return Err(ConfigError::BlankSymptom { index: i });
            }
            if labels[..i].contains(label) {
                return Err(ConfigError::DuplicateSymptom(label.clone()));
            }
        }
        Ok(Self(labels))
    }

    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|l| l == label)
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.0
    }
}

impl Default for SymptomCatalog {
    fn default() -> Self {
        Self(DEFAULT_SYMPTOMS.iter().map(|s| (*s).to_owned()).collect())
    }
}

impl TryFrom<Vec<String>> for SymptomCatalog {
    type Error = ConfigError;

    fn try_from(labels: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(labels)
    }
}

impl From<SymptomCatalog> for Vec<String> {
    fn from(catalog: SymptomCatalog) -> Self {
        catalog.0
    }
}

/// The one in-progress registration. `generation` identifies its current
/// lifetime and increases on every reset.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CaseDraft {
    pub name: String,
    pub dob: String,
    pub gender: String,
    pub phone: String,
    pub symptom: String,
    pub severity: String,
    pub location: String,
    generation: u64,
    errors: ValidationErrors,
}

impl CaseDraft {
    #[must_use]
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Dob => &self.dob,
            FormField::Gender => &self.gender,
            FormField::Phone => &self.phone,
            FormField::Symptom => &self.symptom,
            FormField::Severity => &self.severity,
            FormField::Location => &self.location,
        }
    }

    /// Replaces one field and forgets the error last reported for it.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::Name => &mut self.name,
            FormField::Dob => &mut self.dob,
            FormField::Gender => &mut self.gender,
            FormField::Phone => &mut self.phone,
            FormField::Symptom => &mut self.symptom,
            FormField::Severity => &mut self.severity,
            FormField::Location => &mut self.location,
        };
        *slot = value.into();
        self.errors.clear_field(field);
    }

    /// Empties every field and starts a new generation.
    pub fn reset(&mut self) {
        let generation = self.generation + 1;
        *self = Self {
            generation,
            ..Self::default()
        };
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        FormField::ALL.iter().all(|f| self.get(*f).is_empty())
    }

    #[must_use]
    pub const fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn set_errors(&mut self, errors: ValidationErrors) {
        self.errors = errors;
    }

    pub fn validate(&self, symptoms: &SymptomCatalog) -> Result<CaseDetails, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if self.name.trim().is_empty() {
            errors.push(FieldError::Required(FormField::Name));
        }

        let dob = required(&self.dob, FormField::Dob, &mut errors).and_then(|s| {
            let parsed = NaiveDate::parse_from_str(s, DATE_FORMAT)
                .ok()
                // only the zero-padded spelling a date input produces
                .filter(|d| d.format(DATE_FORMAT).to_string() == s);
            if parsed.is_none() {
                errors.push(FieldError::InvalidDate);
            }
            parsed
        });

        let gender = required(&self.gender, FormField::Gender, &mut errors).and_then(|s| {
            let parsed = s.parse::<Gender>().ok();
            if parsed.is_none() {
                errors.push(FieldError::InvalidGender);
            }
            parsed
        });

        let phone = required(&self.phone, FormField::Phone, &mut errors).and_then(|s| {
            let parsed = PhoneNumber::parse(s);
            if parsed.is_none() {
                errors.push(FieldError::InvalidPhone);
            }
            parsed
        });

        if let Some(s) = required(&self.symptom, FormField::Symptom, &mut errors) {
            if !symptoms.contains(s) {
                errors.push(FieldError::UnknownSymptom);
            }
        }

        let severity = required(&self.severity, FormField::Severity, &mut errors).and_then(|s| {
            let parsed = s.parse::<Severity>().ok();
            if parsed.is_none() {
                errors.push(FieldError::InvalidSeverity);
            }
            parsed
        });

        if self.location.trim().is_empty() {
            errors.push(FieldError::Required(FormField::Location));
        }

        match (dob, gender, phone, severity) {
            (Some(dob), Some(gender), Some(phone), Some(severity)) if errors.is_empty() => {
                Ok(CaseDetails {
                    name: self.name.clone(),
                    dob,
                    gender,
                    phone,
                    symptom: self.symptom.clone(),
                    severity,
                    location: self.location.clone(),
                })
            }
            _ => Err(errors),
        }
    }
}

fn required<'a>(value: &'a str, field: FormField, errors: &mut ValidationErrors) -> Option<&'a str> {
    if value.is_empty() {
        errors.push(FieldError::Required(field));
        None
    } else {
        Some(value)
    }
}

// Redact debug output because this can contain patient data.
impl fmt::Debug for CaseDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filled: Vec<&str> = FormField::ALL
            .iter()
            .filter(|field| !self.get(**field).is_empty())
            .map(|field| field.key())
            .collect();

        f.debug_struct("CaseDraft")
            .field("generation", &self.generation)
            .field("filled", &filled)
            .field("errors", &self.errors)
            .finish()
    }
}
