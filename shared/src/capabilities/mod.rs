//! Shell-side effects requested by the portal core.

mod geolocation;

pub use self::geolocation::{
    Geolocation, GeolocationCapability, GeolocationError, GeolocationOperation,
    GeolocationResult, Position,
};
pub use crux_core::render::Render;

#[allow(unused_imports)]
use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub geolocation: Geolocation<Event>,
}
