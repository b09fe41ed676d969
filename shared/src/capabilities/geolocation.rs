use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event::Event;
use crate::COORDINATE_DECIMALS;

/// Single-shot position requests answered by the shell.
pub struct Geolocation<E> {
    context: CapabilityContext<GeolocationOperation, E>,
}

impl<Ev> Capability<Ev> for Geolocation<Ev> {
    type Operation = GeolocationOperation;
    type MappedSelf<MappedEv> = Geolocation<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Geolocation::new(self.context.map_event(f))
    }
}

impl<E> Geolocation<E>
where
    E: Send + 'static,
{
    pub fn new(context: CapabilityContext<GeolocationOperation, E>) -> Self {
        Self { context }
    }

    /// Asks the shell for one coordinate fix. The shell answers exactly once,
    /// with no timeout imposed from this side.
    pub fn current_position<F>(&self, callback: F)
    where
        F: FnOnce(GeolocationResult) -> E + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context
                .request_from_shell(GeolocationOperation::GetCurrentPosition)
                .await;
            context.update_app(callback(result));
        });
    }
}

pub type GeolocationCapability = Geolocation<Event>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum GeolocationOperation {
    GetCurrentPosition,
}

impl Operation for GeolocationOperation {
    type Output = GeolocationResult;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_m: Option<f64>,
}

impl Position {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_m: None,
        }
    }

    /// Rejects fixes a broken platform provider could hand back.
    pub fn validated(self) -> Result<Self, GeolocationError> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(GeolocationError::PositionUnavailable {
                reason: "coordinate is not finite".into(),
            });
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(GeolocationError::PositionUnavailable {
                reason: format!("latitude {} is out of range", self.latitude),
            });
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(GeolocationError::PositionUnavailable {
                reason: format!("longitude {} is out of range", self.longitude),
            });
        }
        Ok(self)
    }

    /// `"Lat: 23.2599, Lng: 77.4126"`
    #[must_use]
    pub fn label(&self) -> String {
        format!(
            "Lat: {}, Lng: {}",
            fixed(self.latitude, COORDINATE_DECIMALS),
            fixed(self.longitude, COORDINATE_DECIMALS)
        )
    }
}

/// Formats `value` with `decimals` digits, rounding exact halves away from zero.
///
/// `{:.N}` rounds an exact half to even. A value sits exactly halfway at `N`
/// decimals only when it is an odd multiple of `2^-(N+1)`, so those values are
/// rounded here in integers and everything else goes through `format!`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::float_cmp
)]
fn fixed(value: f64, decimals: usize) -> String {
    let halves = value.abs() * (1u64 << (decimals + 1)) as f64;
    let is_tie = value.is_finite()
        && halves < (1u64 << f64::MANTISSA_DIGITS) as f64
        && halves.fract() == 0.0
        && halves % 2.0 == 1.0;

    if !is_tie {
        return format!("{value:.decimals$}");
    }

    // |value| * 10^N == halves * 5^N / 2, an odd numerator, so round it up.
    let Some(numerator) = 5u64
        .checked_pow(decimals as u32)
        .and_then(|p| (halves as u64).checked_mul(p))
    else {
        return format!("{value:.decimals$}");
    };
    let scaled = numerator / 2 + 1;
    let unit = 10u64.pow(decimals as u32);
    let sign = if value.is_sign_negative() { "-" } else { "" };
    if decimals == 0 {
        return format!("{sign}{scaled}");
    }
    format!(
        "{sign}{}.{:0decimals$}",
        scaled / unit,
        scaled % unit
    )
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable: {reason}")]
    PositionUnavailable { reason: String },

    #[error("location request timed out")]
    Timeout,

    #[error("geolocation is not supported on this platform")]
    Unsupported,
}

pub type GeolocationResult = Result<Position, GeolocationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_rounds_to_four_decimals() {
        let position = Position::new(23.259_91, 77.412_63);
        assert_eq!(position.label(), "Lat: 23.2599, Lng: 77.4126");
    }

    #[test]
    fn test_label_rounds_exact_halves_away_from_zero() {
        assert_eq!(
            Position::new(0.031_25, 23.906_25).label(),
            "Lat: 0.0313, Lng: 23.9063"
        );
        assert_eq!(
            Position::new(-0.031_25, -23.906_25).label(),
            "Lat: -0.0313, Lng: -23.9063"
        );
        assert_eq!(Position::new(0.031_24, 0.0).label(), "Lat: 0.0312, Lng: 0.0000");
    }

    #[test]
    fn test_label_pads_short_values() {
        assert_eq!(Position::new(10.5, -3.0).label(), "Lat: 10.5000, Lng: -3.0000");
    }

    #[test]
    fn test_validated_accepts_extremes() {
        assert!(Position::new(90.0, 180.0).validated().is_ok());
        assert!(Position::new(-90.0, -180.0).validated().is_ok());
    }

    #[test]
    fn test_validated_rejects_out_of_range() {
        assert!(matches!(
            Position::new(91.0, 0.0).validated(),
            Err(GeolocationError::PositionUnavailable { .. })
        ));
        assert!(matches!(
            Position::new(0.0, -181.0).validated(),
            Err(GeolocationError::PositionUnavailable { .. })
        ));
    }

    #[test]
    fn test_validated_rejects_non_finite() {
        assert!(Position::new(f64::NAN, 0.0).validated().is_err());
        assert!(Position::new(0.0, f64::INFINITY).validated().is_err());
    }
}
