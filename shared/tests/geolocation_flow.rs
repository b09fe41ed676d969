mod common;

use aarogyam_shared::capabilities::{GeolocationError, GeolocationOperation, Position};
use aarogyam_shared::form::FormField;
use aarogyam_shared::view::Page;
use aarogyam_shared::{Effect, ErrorKind, Event, Model};
use common::{fill, geolocation_request, logged_in_model, Tester, ANITA};

fn fetch_button(app: &Tester, model: &Model) -> (String, bool) {
    let Page::Dashboard { form, .. } = app.view(model).page else {
        panic!("expected dashboard");
    };
    (form.fetch_button.label, form.fetch_button.disabled)
}

#[test]
fn test_fetch_fills_location() {
    let app = Tester::default();
    let mut model = logged_in_model(&app);

    let update = app.update(Event::LocationFetchRequested, &mut model);
    let mut request = geolocation_request(update.effects).expect("geolocation request");
    assert_eq!(request.operation, GeolocationOperation::GetCurrentPosition);
    assert_eq!(fetch_button(&app, &model), ("📍...".to_string(), true));

    let update = app
        .resolve(&mut request, Ok(Position::new(23.259_91, 77.412_63)))
        .expect("resolves");
    for event in update.events {
        app.update(event, &mut model);
    }

    assert_eq!(model.draft.location, "Lat: 23.2599, Lng: 77.4126");
    assert_eq!(fetch_button(&app, &model), ("📍 Fetch".to_string(), false));
    assert!(model.alert.is_none());
}

#[test]
fn test_fetch_overwrites_typed_location() {
    let app = Tester::default();
    let mut model = logged_in_model(&app);
    common::set(&app, &mut model, FormField::Location, "Ward 7, Bhopal");

    let update = app.update(Event::LocationFetchRequested, &mut model);
    let mut request = geolocation_request(update.effects).unwrap();
    let update = app
        .resolve(&mut request, Ok(Position::new(-33.868_82, 151.209_3)))
        .unwrap();
    for event in update.events {
        app.update(event, &mut model);
    }

    assert_eq!(model.draft.location, "Lat: -33.8688, Lng: 151.2093");
}

#[test]
fn test_permission_denied_raises_one_alert() {
    let app = Tester::default();
    let mut model = logged_in_model(&app);
    common::set(&app, &mut model, FormField::Location, "Ward 7");

    let update = app.update(Event::LocationFetchRequested, &mut model);
    let mut request = geolocation_request(update.effects).unwrap();
    let update = app
        .resolve(&mut request, Err(GeolocationError::PermissionDenied))
        .unwrap();
    for event in update.events {
        app.update(event, &mut model);
    }

    assert_eq!(model.draft.location, "Ward 7");
    assert!(!model.is_fetching_location());

    let alert = app.view(&model).alert.expect("alert shown");
    assert_eq!(
        alert.message,
        "Could not fetch location. Please allow location permissions."
    );
    assert_eq!(
        model.alert.as_ref().map(|e| e.kind),
        Some(ErrorKind::LocationPermissionDenied)
    );

    app.update(Event::AlertDismissed, &mut model);
    assert!(app.view(&model).alert.is_none());
}

#[test]
fn test_out_of_range_position_treated_as_unavailable() {
    let app = Tester::default();
    let mut model = logged_in_model(&app);

    let update = app.update(Event::LocationFetchRequested, &mut model);
    let mut request = geolocation_request(update.effects).unwrap();
    let update = app
        .resolve(&mut request, Ok(Position::new(f64::NAN, 77.0)))
        .unwrap();
    for event in update.events {
        app.update(event, &mut model);
    }

    assert!(model.draft.location.is_empty());
    assert_eq!(
        model.alert.as_ref().map(|e| e.kind),
        Some(ErrorKind::Location)
    );
}

#[test]
fn test_unsupported_device_alerts_without_request() {
    let app = Tester::default();
    let mut model = logged_in_model(&app);
    app.update(Event::GeolocationAvailability { available: false }, &mut model);

    let update = app.update(Event::LocationFetchRequested, &mut model);

    assert!(!update
        .effects
        .iter()
        .any(|e| matches!(e, Effect::Geolocation(_))));
    assert!(!model.is_fetching_location());
    assert_eq!(
        model.alert.as_ref().map(|e| e.kind),
        Some(ErrorKind::FeatureUnavailable)
    );
    assert_eq!(
        app.view(&model).alert.unwrap().message,
        "Geolocation is not supported on this device."
    );
}

#[test]
fn test_second_fetch_ignored_while_pending() {
    let app = Tester::default();
    let mut model = logged_in_model(&app);

    let first = app.update(Event::LocationFetchRequested, &mut model);
    assert!(geolocation_request(first.effects).is_some());

    let second = app.update(Event::LocationFetchRequested, &mut model);
    assert!(geolocation_request(second.effects).is_none());
    assert!(model.is_fetching_location());
}

#[test]
fn test_result_after_submit_does_not_touch_new_draft() {
    let app = Tester::default();
    let mut model = logged_in_model(&app);
    fill(&app, &mut model, &ANITA);

    let update = app.update(Event::LocationFetchRequested, &mut model);
    let mut request = geolocation_request(update.effects).unwrap();

    app.update(Event::CaseSubmitted, &mut model);
    assert_eq!(model.cases.len(), 1);
    assert!(model.draft.is_blank());

    let update = app
        .resolve(&mut request, Ok(Position::new(12.971_6, 77.594_6)))
        .unwrap();
    for event in update.events {
        app.update(event, &mut model);
    }

    assert!(model.draft.location.is_empty());
    assert_eq!(
        model.cases.latest().unwrap().location,
        "Lat: 23.2599, Lng: 77.4126"
    );
    assert!(!model.is_fetching_location());
    assert!(model.alert.is_none());
}

#[test]
fn test_result_after_logout_is_discarded() {
    let app = Tester::default();
    let mut model = logged_in_model(&app);

    let update = app.update(Event::LocationFetchRequested, &mut model);
    let mut request = geolocation_request(update.effects).unwrap();

    app.update(Event::LogoutRequested, &mut model);
    common::login(&app, &mut model);

    let update = app
        .resolve(&mut request, Err(GeolocationError::Timeout))
        .unwrap();
    for event in update.events {
        app.update(event, &mut model);
    }

    assert!(model.alert.is_none());
    assert!(!model.is_fetching_location());
}

#[test]
fn test_dashboard_after_relogin_can_fetch_again() {
    let app = Tester::default();
    let mut model = logged_in_model(&app);

    let update = app.update(Event::LocationFetchRequested, &mut model);
    let mut stale = geolocation_request(update.effects).unwrap();

    app.update(Event::LogoutRequested, &mut model);
    common::login(&app, &mut model);

    assert!(!model.is_fetching_location());
    assert_eq!(fetch_button(&app, &model), ("📍 Fetch".to_string(), false));

    let update = app.update(Event::LocationFetchRequested, &mut model);
    let mut fresh = geolocation_request(update.effects).expect("new request after login");
    assert!(model.is_fetching_location());

    // The answer to the first request neither fills the form nor ends the new fetch
    let update = app
        .resolve(&mut stale, Ok(Position::new(12.971_6, 77.594_6)))
        .unwrap();
    for event in update.events {
        app.update(event, &mut model);
    }
    assert!(model.draft.location.is_empty());
    assert!(model.is_fetching_location());

    let update = app
        .resolve(&mut fresh, Ok(Position::new(23.259_91, 77.412_63)))
        .unwrap();
    for event in update.events {
        app.update(event, &mut model);
    }
    assert_eq!(model.draft.location, "Lat: 23.2599, Lng: 77.4126");
    assert!(!model.is_fetching_location());
}
