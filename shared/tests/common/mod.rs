#![allow(dead_code)]

use aarogyam_shared::capabilities::GeolocationOperation;
use aarogyam_shared::clock::FixedClock;
use aarogyam_shared::event::Password;
use aarogyam_shared::form::FormField;
use aarogyam_shared::ids::SequentialIds;
use aarogyam_shared::{App, Effect, Event, Model};
use chrono::NaiveDate;
use crux_core::testing::AppTester;
use crux_core::Request;

pub type Tester = AppTester<App, Effect>;

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
}

/// Deterministic ids (`1, 2, ...`) and a fixed date.
pub fn model() -> Model {
    Model::with_services(Box::new(SequentialIds::default()), Box::new(FixedClock(today())))
}

pub fn login(app: &Tester, model: &mut Model) {
    app.update(Event::LoginPromptOpened, model);
    app.update(
        Event::LoginSubmitted {
            user_id: "CW-4421".into(),
            password: Password::new("hunter2"),
        },
        model,
    );
}

pub fn logged_in_model(app: &Tester) -> Model {
    let mut model = model();
    login(app, &mut model);
    model
}

pub fn set(app: &Tester, model: &mut Model, field: FormField, value: &str) {
    app.update(
        Event::FieldChanged {
            field,
            value: value.into(),
        },
        model,
    );
}

pub const ANITA: [(FormField, &str); 7] = [
    (FormField::Name, "Anita Sharma"),
    (FormField::Dob, "1985-06-15"),
    (FormField::Gender, "Female"),
    (FormField::Phone, "9876543210"),
    (FormField::Symptom, "High Fever"),
    (FormField::Severity, "Severe"),
    (FormField::Location, "Lat: 23.2599, Lng: 77.4126"),
];

pub fn fill(app: &Tester, model: &mut Model, values: &[(FormField, &str)]) {
    for (field, value) in values {
        set(app, model, *field, value);
    }
}

pub fn geolocation_request(effects: Vec<Effect>) -> Option<Request<GeolocationOperation>> {
    effects.into_iter().find_map(|effect| match effect {
        Effect::Geolocation(request) => Some(request),
        _ => None,
    })
}
