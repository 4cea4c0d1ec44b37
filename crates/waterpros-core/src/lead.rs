use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{LeadError, LeadStoreError};

// --- Submission ---

/// Raw form payload as posted by the page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct LeadSubmission {
    /// Contact name (required)
    #[serde(default)]
    pub name: String,
    /// US phone number, 10 digits or 11 starting with 1 (required)
    #[serde(default)]
    pub phone: String,
    /// Optional email address
    #[serde(default)]
    pub email: Option<String>,
    /// Human service name, e.g. "Mold Removal" (required)
    #[serde(default)]
    pub service: String,
    /// Human city name (required)
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub city_slug: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub state_abbr: Option<String>,
    /// Free-text description of the damage
    #[serde(default)]
    pub description: Option<String>,
    /// Where the form was submitted from; defaults to "website"
    #[serde(default)]
    pub source: Option<String>,
}

/// A validated lead ready for persistence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lead {
    pub name: String,
    pub phone: String,
    /// Digits only, as checked during validation.
    pub phone_digits: String,
    pub email: Option<String>,
    pub service: String,
    pub city: String,
    pub city_slug: Option<String>,
    pub state: Option<String>,
    pub state_abbr: Option<String>,
    pub description: Option<String>,
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub status: &'static str,
}

impl LeadSubmission {
    pub fn validate(&self) -> Result<Lead, LeadError> {
        self.validate_at(Utc::now())
    }

    pub fn validate_at(&self, now: DateTime<Utc>) -> Result<Lead, LeadError> {
        let required = [
            ("name", &self.name),
            ("phone", &self.phone),
            ("service", &self.service),
            ("city", &self.city),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(LeadError::MissingField(field));
            }
        }

        let email = non_blank(&self.email);
        if let Some(email) = &email {
            if !is_valid_email(email) {
                return Err(LeadError::InvalidEmail);
            }
        }

        let phone_digits = normalize_phone(&self.phone).ok_or(LeadError::InvalidPhone)?;

        Ok(Lead {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            phone_digits,
            email,
            service: self.service.trim().to_string(),
            city: self.city.trim().to_string(),
            city_slug: non_blank(&self.city_slug),
            state: non_blank(&self.state),
            state_abbr: non_blank(&self.state_abbr),
            description: non_blank(&self.description),
            source: non_blank(&self.source).unwrap_or_else(|| "website".to_string()),
            created_at: now,
            status: "new",
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// `local@domain.tld`: one `@`, no whitespace, a dot inside the domain.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Strip common separators and return the bare digits of a US number.
/// Anything left that is not a digit makes the number invalid.
pub fn normalize_phone(phone: &str) -> Option<String> {
    let digits: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')' | '+'))
        .collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    match digits.len() {
        10 => Some(digits),
        11 if digits.starts_with('1') => Some(digits),
        _ => None,
    }
}

// --- Stores ---

/// Persistence backend for leads. Implemented outside this crate.
pub trait LeadStore: Send + Sync {
    /// Persist the lead and return its backend id.
    fn insert(&self, lead: &Lead) -> Result<String, LeadStoreError>;
}

impl<T: LeadStore + ?Sized> LeadStore for std::sync::Arc<T> {
    fn insert(&self, lead: &Lead) -> Result<String, LeadStoreError> {
        (**self).insert(lead)
    }
}

/// Keeps leads in memory. Useful for tests and local runs.
#[derive(Debug, Default)]
pub struct MemoryLeadStore {
    leads: Mutex<Vec<Lead>>,
}

impl MemoryLeadStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leads(&self) -> Vec<Lead> {
        self.leads.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl LeadStore for MemoryLeadStore {
    fn insert(&self, lead: &Lead) -> Result<String, LeadStoreError> {
        let mut leads = self
            .leads
            .lock()
            .map_err(|_| LeadStoreError::Unavailable("lead store lock poisoned".into()))?;
        leads.push(lead.clone());
        Ok(format!("mem-{}", leads.len()))
    }
}

// --- Intake ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    /// Persisted by the configured store.
    Stored,
    /// Store failed; lead was logged for manual processing.
    Fallback,
    /// No store configured; lead was logged only.
    Development,
}

/// What the submitter is told. Always a success once validation passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadReceipt {
    pub success: bool,
    pub id: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub disposition: Disposition,
}

pub struct LeadIntake {
    store: Option<Box<dyn LeadStore>>,
}

impl LeadIntake {
    pub fn new(store: impl LeadStore + 'static) -> Self {
        Self {
            store: Some(Box::new(store)),
        }
    }

    /// No backend configured: every lead is logged and acknowledged.
    pub fn log_only() -> Self {
        Self { store: None }
    }

    pub fn submit(&self, submission: &LeadSubmission) -> Result<LeadReceipt, LeadError> {
        let lead = submission.validate()?;
        let stamp = lead.created_at.timestamp_millis();

        let Some(store) = &self.store else {
            tracing::warn!("lead store not configured, logging lead only");
            log_payload(&lead);
            return Ok(LeadReceipt {
                success: true,
                id: format!("dev-{stamp}"),
                message: "Lead submitted successfully (development mode)".to_string(),
                note: None,
                disposition: Disposition::Development,
            });
        };

        match store.insert(&lead) {
            Ok(id) => {
                tracing::info!(id = %id, city = %lead.city, service = %lead.service, "lead saved");
                Ok(LeadReceipt {
                    success: true,
                    id,
                    message: "Lead submitted successfully".to_string(),
                    note: None,
                    disposition: Disposition::Stored,
                })
            }
            Err(e) => {
                tracing::error!(error = %e, "lead store failed, falling back to log");
                log_payload(&lead);
                Ok(LeadReceipt {
                    success: true,
                    id: format!("fallback-{stamp}"),
                    message: "Lead submitted successfully".to_string(),
                    note: Some("Lead logged for manual processing".to_string()),
                    disposition: Disposition::Fallback,
                })
            }
        }
    }
}

fn log_payload(lead: &Lead) {
    match serde_json::to_string(lead) {
        Ok(payload) => tracing::warn!(lead = %payload, "lead recorded for manual follow-up"),
        Err(e) => tracing::error!(error = %e, lead = ?lead, "lead recorded for manual follow-up"),
    }
}
