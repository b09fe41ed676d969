use serde::Deserialize;
use std::fmt;
use zeroize::Zeroize;

use crate::capabilities::GeolocationResult;
use crate::config::PortalConfig;
use crate::form::FormField;

// --- Secret wrapper: redacts Debug, zeroizes on Drop ---

#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for Password {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub enum Event {
    #[default]
    Noop,

    // Platform
    ConfigLoaded(Box<PortalConfig>),
    GeolocationAvailability {
        available: bool,
    },

    // Session
    LoginPromptOpened,
    LoginPromptClosed,
    LoginSubmitted {
        user_id: String,
        password: Password,
    },
    LogoutRequested,

    // Registration form
    FieldChanged {
        field: FormField,
        value: String,
    },
    CaseSubmitted,
    LocationFetchRequested,
    AlertDismissed,

    // Capability responses, never sent by the shell
    #[serde(skip)]
    LocationFetched {
        generation: u64,
        result: Box<GeolocationResult>,
    },
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Noop => "noop",
            Self::ConfigLoaded(_) => "config_loaded",
            Self::GeolocationAvailability { .. } => "geolocation_availability",
            Self::LoginPromptOpened => "login_prompt_opened",
            Self::LoginPromptClosed => "login_prompt_closed",
            Self::LoginSubmitted { .. } => "login_submitted",
            Self::LogoutRequested => "logout_requested",
            Self::FieldChanged { .. } => "field_changed",
            Self::CaseSubmitted => "case_submitted",
            Self::LocationFetchRequested => "location_fetch_requested",
            Self::AlertDismissed => "alert_dismissed",
            Self::LocationFetched { .. } => "location_fetched",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::LoginPromptOpened
                | Self::LoginPromptClosed
                | Self::LoginSubmitted { .. }
                | Self::LogoutRequested
                | Self::FieldChanged { .. }
                | Self::CaseSubmitted
                | Self::LocationFetchRequested
                | Self::AlertDismissed
        )
    }
}
