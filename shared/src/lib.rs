// lib.rs - Aarogyam worker portal core

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod capabilities;
pub mod clock;
pub mod config;
pub mod event;
pub mod form;
pub mod ids;
pub mod model;
pub mod view;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use crux_core::{render::Render, App as CruxApp};
pub use event::Event;
pub use model::Model;
pub use view::ViewModel;

pub const PORTAL_NAME: &str = "Aarogyam";
pub const PHONE_DIGITS: usize = 10;
pub const COORDINATE_DECIMALS: usize = 4;
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const FETCH_LABEL_IDLE: &str = "📍 Fetch";
pub const FETCH_LABEL_BUSY: &str = "📍...";

pub const DEFAULT_SYMPTOMS: &[&str] = &[
    "High Fever",
    "Chronic Cough",
    "Shortness of Breath",
    "Fatigue",
    "Body Ache",
    "Loss of Taste/Smell",
    "Sore Throat",
    "Nausea",
    "Diarrhea",
    "Skin Rash",
    "Joint Pain",
    "Dizziness",
    "Chest Pain",
    "Blurry Vision",
    "Other (Specify in Notes)",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Transient,
    Permanent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Location,
    LocationPermissionDenied,
    FeatureUnavailable,
    Config,
    Internal,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Location => "LOCATION_ERROR",
            Self::LocationPermissionDenied => "LOCATION_PERMISSION_DENIED",
            Self::FeatureUnavailable => "FEATURE_UNAVAILABLE",
            Self::Config => "CONFIG_ERROR",
            Self::Internal => "INTERNAL_ERROR",
        }
    }

    #[must_use]
    pub const fn default_severity(self) -> ErrorSeverity {
        match self {
            Self::Location | Self::LocationPermissionDenied => ErrorSeverity::Transient,
            Self::FeatureUnavailable | Self::Config | Self::Internal => ErrorSeverity::Permanent,
        }
    }

    /// Whether re-invoking the action that failed can succeed.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Location | Self::LocationPermissionDenied)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub severity: ErrorSeverity,
    pub message: String,
    pub internal_message: Option<String>,
    pub context: HashMap<String, String>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            message: message.into(),
            internal_message: None,
            context: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_internal(mut self, internal: impl Into<String>) -> Self {
        self.internal_message = Some(internal.into());
        self
    }

    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::FeatureUnavailable => self.message.clone(),
            ErrorKind::Location => {
                "Could not fetch location. Please check your GPS signal and try again.".into()
            }
            ErrorKind::LocationPermissionDenied => {
                "Could not fetch location. Please allow location permissions.".into()
            }
            ErrorKind::Config => {
                "The portal configuration could not be applied. Please contact support.".into()
            }
            ErrorKind::Internal => {
                "An unexpected error occurred. Please try again or contact support.".into()
            }
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)?;
        if let Some(internal) = &self.internal_message {
            write!(f, " (internal: {internal})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

impl From<capabilities::GeolocationError> for AppError {
    fn from(e: capabilities::GeolocationError) -> Self {
        use capabilities::GeolocationError;

        let kind = match &e {
            GeolocationError::PermissionDenied => ErrorKind::LocationPermissionDenied,
            GeolocationError::PositionUnavailable { .. } | GeolocationError::Timeout => {
                ErrorKind::Location
            }
            GeolocationError::Unsupported => ErrorKind::FeatureUnavailable,
        };

        let message = match kind {
            ErrorKind::FeatureUnavailable => "Geolocation is not supported on this device.".into(),
            _ => e.to_string(),
        };

        Self::new(kind, message).with_internal(format!("{e:?}"))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        AppError::new(ErrorKind::Config, e.to_string())
    }
}
