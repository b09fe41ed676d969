use tracing::{debug, info, warn};

use crate::capabilities::{Capabilities, GeolocationError, GeolocationResult, Position};
use crate::config::PortalConfig;
use crate::event::{Event, Password};
use crate::form::{FormField, ValidationErrors};
use crate::model::{demo_cases, CaseRecord, Model};
use crate::view::{self, ViewModel};
use crate::AppError;

#[derive(Default)]
pub struct App;

impl App {
    fn apply_config(config: PortalConfig, model: &mut Model) {
        if let Err(e) = config.validate() {
            let error = AppError::from(e);
            warn!(code = error.code(), error = %error, "rejected portal configuration");
            return;
        }

        if config.id_scheme != model.config.id_scheme {
            model.set_id_generator(config.id_scheme.generator());
        }

        if config.seed_demo_cases && model.cases.is_empty() {
            for record in demo_cases(&config).into_iter().rev() {
                if let Err(e) = model.cases.add(record) {
                    warn!(error = %e, "skipped demo case");
                }
            }
        }

        info!(
            portal = %config.portal_name,
            symptoms = config.symptoms.labels().len(),
            id_scheme = ?config.id_scheme,
            "portal configuration applied"
        );
        model.config = config;
    }

    fn login(user_id: &str, password: &Password, model: &mut Model) {
        // Any non-empty pair is accepted; nothing is verified or kept.
        if user_id.trim().is_empty() || password.expose().is_empty() {
            model.session.login_error = Some("Please enter your User ID and Password.".into());
            debug!("login blocked by empty field");
            return;
        }

        model.session.login();
        info!("worker logged in");
    }

    fn logout(model: &mut Model) {
        model.session.logout();
        // The dashboard is torn down, taking its draft and fetch state with it.
        model.draft.reset();
        model.pending_location = None;
        info!(cases = model.cases.len(), "worker logged out");
    }

    fn submit_case(model: &mut Model) {
        let details = match model.draft.validate(&model.config.symptoms) {
            Ok(details) => details,
            Err(errors) => {
                Self::reject_submission(errors, model);
                return;
            }
        };

        let id = model.next_case_id();
        let record = CaseRecord::new(id, model.today(), details);
        let case_id = record.id.clone();
        let severity = record.severity;

        if let Err(e) = model.cases.add(record) {
            let error = AppError::from(e).with_context("case_id", case_id.as_str());
            warn!(code = error.code(), error = %error, "case not stored");
            model.raise_alert(error);
            return;
        }

        model.draft.reset();
        info!(
            case_id = %case_id,
            severity = %severity,
            total = model.cases.len(),
            "case registered"
        );
    }

    fn reject_submission(errors: ValidationErrors, model: &mut Model) {
        let fields: Vec<&str> = errors.iter().map(|e| e.field().key()).collect();
        debug!(?fields, "case submission rejected");
        model.draft.set_errors(errors);
    }

    fn request_location(model: &mut Model, caps: &Capabilities) {
        if model.is_fetching_location() {
            debug!("location request already in flight");
            return;
        }

        if !model.geolocation_available {
            Self::location_failed(GeolocationError::Unsupported, model);
            return;
        }

        let generation = model.draft.generation();
        model.pending_location = Some(generation);
        caps.geolocation.current_position(move |result| Event::LocationFetched {
            generation,
            result: Box::new(result),
        });
    }

    fn location_fetched(generation: u64, result: GeolocationResult, model: &mut Model) {
        if model.pending_location == Some(generation) {
            model.pending_location = None;
        }

        if generation != model.draft.generation() {
            debug!(
                generation,
                current = model.draft.generation(),
                "discarded location for a reset draft"
            );
            return;
        }

        match result.and_then(Position::validated) {
            Ok(position) => {
                model.draft.set_field(FormField::Location, position.label());
                debug!(accuracy_m = ?position.accuracy_m, "location received");
            }
            Err(e) => Self::location_failed(e, model),
        }
    }

    fn location_failed(error: GeolocationError, model: &mut Model) {
        let error = AppError::from(error);
        warn!(code = error.code(), error = %error, "location fetch failed");
        model.raise_alert(error);
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        let event_name = event.name();
        debug!(
            event = event_name,
            user_initiated = event.is_user_initiated(),
            "update"
        );

        match event {
            Event::Noop => return,

            Event::ConfigLoaded(config) => Self::apply_config(*config, model),

            Event::GeolocationAvailability { available } => {
                model.geolocation_available = available;
            }

            Event::LoginPromptOpened => model.session.open_login_prompt(),

            Event::LoginPromptClosed => model.session.close_login_prompt(),

            Event::LoginSubmitted { user_id, password } => {
                Self::login(&user_id, &password, model);
            }

            Event::LogoutRequested => Self::logout(model),

            Event::AlertDismissed => model.dismiss_alert(),

            Event::LocationFetched { generation, result } => {
                Self::location_fetched(generation, *result, model);
            }

            Event::FieldChanged { .. } | Event::CaseSubmitted | Event::LocationFetchRequested
                if !model.session.is_logged_in =>
            {
                debug!(event = event_name, "ignored: dashboard not shown");
                return;
            }

            Event::FieldChanged { field, value } => model.draft.set_field(field, value),

            Event::CaseSubmitted => Self::submit_case(model),

            Event::LocationFetchRequested => Self::request_location(model, caps),
        }

        caps.render.render();
    }

    fn view(&self, model: &Model) -> ViewModel {
        view::build(model)
    }
}
