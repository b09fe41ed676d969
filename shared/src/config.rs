//! Runtime portal configuration, handed over by the shell as JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::form::SymptomCatalog;
use crate::ids::IdScheme;
use crate::PORTAL_NAME;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid configuration JSON: {0}")]
    Parse(String),

    #[error("portal name must not be blank")]
    BlankPortalName,

    #[error("symptom catalog must not be empty")]
    EmptySymptomCatalog,

    #[error("symptom at position {index} is blank")]
    BlankSymptom { index: usize },

    #[error("symptom listed twice: {0}")]
    DuplicateSymptom(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub portal_name: String,
    pub symptoms: SymptomCatalog,
    pub id_scheme: IdScheme,
    /// Fill an empty case list with the two sample cases.
    pub seed_demo_cases: bool,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            portal_name: PORTAL_NAME.into(),
            symptoms: SymptomCatalog::default(),
            id_scheme: IdScheme::default(),
            seed_demo_cases: false,
        }
    }
}

impl PortalConfig {
    /// Parses and validates. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// The symptom catalog validates itself on deserialization; this covers
    /// values built in code.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.portal_name.trim().is_empty() {
            return Err(ConfigError::BlankPortalName);
        }
        SymptomCatalog::new(self.symptoms.labels().to_vec())?;
        Ok(())
    }
}
