use serde::{Deserialize, Serialize};

use crate::form::FormField;
use crate::model::{CaseRecord, Gender, Model, Severity, SeverityCategory};
use crate::{AppError, DATE_FORMAT, FETCH_LABEL_BUSY, FETCH_LABEL_IDLE};

pub const LANDING_HEADLINE: &str = "Empowering Community Health Workers";
pub const LANDING_HIGHLIGHTS: &[&str] = &[
    "Live Location Tracking for accurate outbreak mapping",
    "Comprehensive Symptom Logging",
    "Secure Patient Data Management",
];

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NavbarAction {
    Login,
    Logout,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginPromptView {
    pub title: String,
    pub subtitle: String,
    pub error: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlertView {
    pub message: String,
    pub error_code: String,
    pub is_retryable: bool,
}

impl From<&AppError> for AlertView {
    fn from(e: &AppError) -> Self {
        Self {
            message: e.user_facing_message(),
            error_code: e.code().to_string(),
            is_retryable: e.is_retryable(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldView {
    pub field: FormField,
    pub label: String,
    pub value: String,
    pub error: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FetchButtonView {
    pub label: String,
    pub disabled: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormView {
    pub fields: Vec<FieldView>,
    pub gender_options: Vec<String>,
    pub severity_options: Vec<String>,
    pub symptom_options: Vec<String>,
    pub fetch_button: FetchButtonView,
}

impl FormView {
    #[must_use]
    pub fn field(&self, field: FormField) -> Option<&FieldView> {
        self.fields.iter().find(|f| f.field == field)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CaseRow {
    pub id: String,
    pub name: String,
    /// `"Female • DOB: 1985-06-15"`
    pub patient_info: String,
    pub phone: String,
    pub symptom: String,
    pub severity: Severity,
    pub severity_category: SeverityCategory,
    pub location: String,
    pub date: String,
}

impl From<&CaseRecord> for CaseRow {
    fn from(c: &CaseRecord) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.name.clone(),
            patient_info: format!("{} • DOB: {}", c.gender, c.dob.format(DATE_FORMAT)),
            phone: c.phone.as_str().to_owned(),
            symptom: c.symptom.clone(),
            severity: c.severity,
            severity_category: c.severity.category(),
            location: c.location.clone(),
            date: c.date.format(DATE_FORMAT).to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CaseTableView {
    pub total: usize,
    pub rows: Vec<CaseRow>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Page {
    Landing {
        headline: String,
        highlights: Vec<String>,
    },
    Dashboard {
        form: FormView,
        table: CaseTableView,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewModel {
    pub portal_name: String,
    pub navbar: NavbarAction,
    pub page: Page,
    pub login_prompt: Option<LoginPromptView>,
    pub alert: Option<AlertView>,
}

fn build_form(model: &Model) -> FormView {
    let draft = &model.draft;
    let fields = FormField::ALL
        .iter()
        .map(|&field| FieldView {
            field,
            label: field.label().to_owned(),
            value: draft.get(field).to_owned(),
            error: draft.errors().for_field(field).map(|e| e.to_string()),
        })
        .collect();

    let fetching = model.is_fetching_location();

    FormView {
        fields,
        gender_options: Gender::ALL.iter().map(|g| g.as_str().to_owned()).collect(),
        severity_options: Severity::ALL.iter().map(|s| s.as_str().to_owned()).collect(),
        symptom_options: model.config.symptoms.labels().to_vec(),
        fetch_button: FetchButtonView {
            label: if fetching { FETCH_LABEL_BUSY } else { FETCH_LABEL_IDLE }.to_owned(),
            disabled: fetching,
        },
    }
}

fn build_table(model: &Model) -> CaseTableView {
    CaseTableView {
        total: model.cases.len(),
        rows: model.cases.iter().map(CaseRow::from).collect(),
    }
}

pub(crate) fn build(model: &Model) -> ViewModel {
    let session = &model.session;

    let (navbar, page) = if session.is_logged_in {
        (
            NavbarAction::Logout,
            Page::Dashboard {
                form: build_form(model),
                table: build_table(model),
            },
        )
    } else {
        (
            NavbarAction::Login,
            Page::Landing {
                headline: LANDING_HEADLINE.to_owned(),
                highlights: LANDING_HIGHLIGHTS.iter().map(|h| (*h).to_owned()).collect(),
            },
        )
    };

    let login_prompt = session.show_login_prompt.then(|| LoginPromptView {
        title: "Worker Login".into(),
        subtitle: format!("Access the {} Dashboard", model.config.portal_name),
        error: session.login_error.clone(),
    });

    ViewModel {
        portal_name: model.config.portal_name.clone(),
        navbar,
        page,
        login_prompt,
        alert: model.alert.as_ref().map(AlertView::from),
    }
}
