use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::clock::{Clock, SystemClock};
use crate::config::PortalConfig;
use crate::form::{CaseDraft, FormField};
use crate::ids::{IdGenerator, TimestampIds};
use crate::{AppError, PHONE_DIGITS};

// --- Typed IDs ---

macro_rules! typed_id {
    ($name:ident) => {
        #[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

typed_id!(CaseId);

// --- Domain enums replacing stringly-typed fields ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Self; 3] = [Self::Male, Self::Female, Self::Other];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

impl FromStr for Gender {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|g| g.as_str() == s).ok_or(())
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub const ALL: [Self; 3] = [Self::Mild, Self::Moderate, Self::Severe];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mild => "Mild",
            Self::Moderate => "Moderate",
            Self::Severe => "Severe",
        }
    }

    #[must_use]
    pub const fn category(self) -> SeverityCategory {
        match self {
            Self::Severe => SeverityCategory::HighAlert,
            Self::Moderate => SeverityCategory::Caution,
            Self::Mild => SeverityCategory::Normal,
        }
    }
}

impl FromStr for Severity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|l| l.as_str() == s).ok_or(())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a severity is styled in the case table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityCategory {
    HighAlert,
    Caution,
    Normal,
}

/// Exactly ten ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() == PHONE_DIGITS && s.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(s.to_owned()))
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// --- Case records ---

/// The validated, user-entered part of a case.
#[derive(Clone, PartialEq, Eq)]
pub struct CaseDetails {
    pub name: String,
    pub dob: NaiveDate,
    pub gender: Gender,
    pub phone: PhoneNumber,
    pub symptom: String,
    pub severity: Severity,
    pub location: String,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CaseRecord {
    pub id: CaseId,
    pub name: String,
    pub dob: NaiveDate,
    pub gender: Gender,
    pub phone: PhoneNumber,
    pub symptom: String,
    pub severity: Severity,
    pub location: String,
    pub date: NaiveDate,
}

impl CaseRecord {
    #[must_use]
    pub fn new(id: CaseId, date: NaiveDate, details: CaseDetails) -> Self {
        let CaseDetails {
            name,
            dob,
            gender,
            phone,
            symptom,
            severity,
            location,
        } = details;

        Self {
            id,
            name,
            dob,
            gender,
            phone,
            symptom,
            severity,
            location,
            date,
        }
    }
}

// Redact debug output because this contains patient data.
impl fmt::Debug for CaseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaseRecord")
            .field("id", &self.id)
            .field("severity", &self.severity)
            .field("symptom", &self.symptom)
            .field("date", &self.date)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for CaseDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaseDetails")
            .field("severity", &self.severity)
            .field("symptom", &self.symptom)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CaseStoreError {
    #[error("duplicate case id: {0}")]
    DuplicateId(CaseId),
}

impl From<CaseStoreError> for AppError {
    fn from(e: CaseStoreError) -> Self {
        AppError::new(crate::ErrorKind::Internal, e.to_string())
    }
}

/// Session-lifetime list of submitted cases, newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseStore {
    records: VecDeque<CaseRecord>,
}

impl CaseStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts `record` in front of every earlier one.
    pub fn add(&mut self, record: CaseRecord) -> Result<(), CaseStoreError> {
        if self.records.iter().any(|r| r.id == record.id) {
            return Err(CaseStoreError::DuplicateId(record.id));
        }
        self.records.push_front(record);
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CaseRecord> {
        self.records.get(index)
    }

    #[must_use]
    pub fn latest(&self) -> Option<&CaseRecord> {
        self.records.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CaseRecord> {
        self.records.iter()
    }
}

// --- Session ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub is_logged_in: bool,
    pub show_login_prompt: bool,
    pub login_error: Option<String>,
}

impl SessionState {
    pub fn open_login_prompt(&mut self) {
        if !self.is_logged_in {
            self.show_login_prompt = true;
            self.login_error = None;
        }
    }

    pub fn close_login_prompt(&mut self) {
        self.show_login_prompt = false;
        self.login_error = None;
    }

    pub fn login(&mut self) {
        self.is_logged_in = true;
        self.close_login_prompt();
    }

    pub fn logout(&mut self) {
        self.is_logged_in = false;
    }
}

// --- Demonstration data ---

struct DemoCase {
    id: &'static str,
    values: [(FormField, &'static str); 7],
    date: &'static str,
}

const DEMO_CASES: [DemoCase; 2] = [
    DemoCase {
        id: "demo-1",
        values: [
            (FormField::Name, "Anita Sharma"),
            (FormField::Dob, "1985-06-15"),
            (FormField::Gender, "Female"),
            (FormField::Phone, "9876543210"),
            (FormField::Symptom, "High Fever"),
            (FormField::Severity, "Severe"),
            (FormField::Location, "Lat: 23.2599, Lng: 77.4126"),
        ],
        date: "2026-02-28",
    },
    DemoCase {
        id: "demo-2",
        values: [
            (FormField::Name, "Rajesh Kumar"),
            (FormField::Dob, "1990-11-22"),
            (FormField::Gender, "Male"),
            (FormField::Phone, "9123456789"),
            (FormField::Symptom, "Chronic Cough"),
            (FormField::Severity, "Moderate"),
            (FormField::Location, "Lat: 23.2600, Lng: 77.4100"),
        ],
        date: "2026-02-27",
    },
];

/// The two sample cases shown on a fresh demonstration dashboard, newest first.
/// Samples whose symptom is missing from `config`'s catalog are left out.
#[must_use]
pub fn demo_cases(config: &PortalConfig) -> Vec<CaseRecord> {
    DEMO_CASES
        .iter()
        .filter_map(|demo| {
            let mut draft = CaseDraft::default();
            for (field, value) in demo.values {
                draft.set_field(field, value);
            }
            let details = draft.validate(&config.symptoms).ok()?;
            let date = NaiveDate::parse_from_str(demo.date, crate::DATE_FORMAT).ok()?;
            Some(CaseRecord::new(CaseId::new(demo.id), date, details))
        })
        .collect()
}

// --- Model ---

pub struct Model {
    pub session: SessionState,
    pub draft: CaseDraft,
    pub cases: CaseStore,
    pub config: PortalConfig,

    /// Draft generation the in-flight location request was issued for.
    pub pending_location: Option<u64>,
    pub geolocation_available: bool,

    /// Blocking notification; the shell shows it until dismissed.
    pub alert: Option<AppError>,

    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
}

impl Default for Model {
    fn default() -> Self {
        Self::with_services(Box::new(TimestampIds::default()), Box::new(SystemClock))
    }
}

impl Model {
    #[must_use]
    pub fn with_services(ids: Box<dyn IdGenerator>, clock: Box<dyn Clock>) -> Self {
        Self {
            session: SessionState::default(),
            draft: CaseDraft::default(),
            cases: CaseStore::new(),
            config: PortalConfig::default(),
            pending_location: None,
            geolocation_available: true,
            alert: None,
            ids,
            clock,
        }
    }

    pub fn set_id_generator(&mut self, ids: Box<dyn IdGenerator>) {
        self.ids = ids;
    }

    pub fn next_case_id(&mut self) -> CaseId {
        self.ids.next_id()
    }

    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    #[must_use]
    pub const fn is_fetching_location(&self) -> bool {
        self.pending_location.is_some()
    }

    pub fn raise_alert(&mut self, error: AppError) {
        self.alert = Some(error);
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }
}
