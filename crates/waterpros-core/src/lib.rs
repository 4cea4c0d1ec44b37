pub mod allowlist;
pub mod catalog;
pub mod error;
pub mod lead;
pub mod local;
pub mod routes;
pub mod settings;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub use catalog::{Catalog, CatalogSource, CityGroup, JsonFileSource};
pub use error::{CatalogError, LeadError, LeadStoreError, RecordError, SettingsError};

/// Brand constants shared by copy, metadata and structured data.
pub const BUSINESS_NAME: &str = "Emergency Water Pros";
pub const BUSINESS_PHONE: &str = "+1-888-680-6768";
pub const BUSINESS_PHONE_DISPLAY: &str = "(888) 680-6768";
pub const BUSINESS_EMAIL: &str = "help@emergencywaterpros.com";

/// Radius used when a record carries no usable `service_area_radius_miles`.
pub const DEFAULT_SERVICE_RADIUS_MILES: u32 = 30;

// --- Types ---

/// The fixed set of services every city page can offer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    schemars::JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceKind {
    WaterDamageRestoration,
    FireDamageRestoration,
    MoldRemoval,
    StormDamageRepair,
    SewageCleanup,
    BasementFloodCleanup,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 6] = [
        ServiceKind::WaterDamageRestoration,
        ServiceKind::FireDamageRestoration,
        ServiceKind::MoldRemoval,
        ServiceKind::StormDamageRepair,
        ServiceKind::SewageCleanup,
        ServiceKind::BasementFloodCleanup,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            ServiceKind::WaterDamageRestoration => "water-damage-restoration",
            ServiceKind::FireDamageRestoration => "fire-damage-restoration",
            ServiceKind::MoldRemoval => "mold-removal",
            ServiceKind::StormDamageRepair => "storm-damage-repair",
            ServiceKind::SewageCleanup => "sewage-cleanup",
            ServiceKind::BasementFloodCleanup => "basement-flood-cleanup",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ServiceKind::WaterDamageRestoration => "Water Damage Restoration",
            ServiceKind::FireDamageRestoration => "Fire Damage Restoration",
            ServiceKind::MoldRemoval => "Mold Removal",
            ServiceKind::StormDamageRepair => "Storm Damage Repair",
            ServiceKind::SewageCleanup => "Sewage Cleanup",
            ServiceKind::BasementFloodCleanup => "Basement Flood Cleanup",
        }
    }

    /// One-line card description used when cross-linking services.
    pub fn summary(&self) -> &'static str {
        match self {
            ServiceKind::WaterDamageRestoration => "Emergency water extraction and structural drying",
            ServiceKind::FireDamageRestoration => "Smoke, soot, and fire damage cleanup",
            ServiceKind::MoldRemoval => "Professional mold remediation and prevention",
            ServiceKind::StormDamageRepair => "Weather-related property damage restoration",
            ServiceKind::SewageCleanup => "Biohazard sewage and wastewater cleanup",
            ServiceKind::BasementFloodCleanup => "Basement water removal and restoration",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.slug() == slug)
    }
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

/// One city×service landing page row. Field names match the catalog JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceRecord {
    pub city_slug: String,
    pub service_slug: ServiceKind,
    pub city: String,
    #[serde(default)]
    pub state: String,
    pub state_abbr: String,
    pub service: String,
    #[serde(default)]
    pub slug: String,

    #[serde(default, deserialize_with = "de_coordinate", skip_serializing_if = "Option::is_none")]
    pub lat: Option<String>,
    #[serde(default, deserialize_with = "de_coordinate", skip_serializing_if = "Option::is_none")]
    pub lon: Option<String>,
    #[serde(default)]
    pub state_fips: String,
    #[serde(default)]
    pub place_fips: String,
    #[serde(default)]
    pub place_geoid: String,
    #[serde(default)]
    pub place_type: String,
    #[serde(default)]
    pub classfp: String,
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub county_name: String,
    #[serde(default)]
    pub msa_cbsa_code: String,

    #[serde(default)]
    pub meta_title: String,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub intro_paragraph: String,
    #[serde(default)]
    pub why_choose_us: String,
    #[serde(default)]
    pub service_keywords: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub map_embed_url: String,

    #[serde(default, deserialize_with = "de_population")]
    pub population: u64,
    #[serde(default = "default_radius", deserialize_with = "de_radius")]
    pub service_area_radius_miles: u32,
    #[serde(default)]
    pub phone_placeholder: String,
}

impl ServiceRecord {
    /// Decode one catalog element, then check the fields every page needs.
    pub fn from_value(value: Value) -> Result<Self, RecordError> {
        let record: ServiceRecord = serde_json::from_value(value)?;
        record.validate()?;
        Ok(record)
    }

    pub fn validate(&self) -> Result<(), RecordError> {
        let required = [
            ("city_slug", &self.city_slug),
            ("city", &self.city),
            ("state_abbr", &self.state_abbr),
            ("service", &self.service),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(RecordError::EmptyField(field));
            }
        }
        Ok(())
    }

    /// Composite key `(city_slug, service_slug)`.
    pub fn key(&self) -> (&str, ServiceKind) {
        (&self.city_slug, self.service_slug)
    }

    /// Site-relative page path, e.g. `/miami/mold-removal`.
    pub fn path(&self) -> String {
        format!("/{}/{}", self.city_slug, self.service_slug.slug())
    }
}

fn default_radius() -> u32 {
    DEFAULT_SERVICE_RADIUS_MILES
}

/// Integer coercion the way the CSV export produced it: numbers pass through,
/// strings parse on their leading digits, anything else is unusable.
fn coerce_integer(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f.trunc() as u64)),
        Value::String(s) => {
            let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().ok()
        }
        _ => None,
    }
}

fn de_population<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(coerce_integer(&value).unwrap_or(0))
}

fn de_radius<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(coerce_integer(&value)
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_SERVICE_RADIUS_MILES))
}

/// Whole-number counts in the local data table. Fractions truncate and numeric
/// strings parse; anything else is an error for the caller to report.
pub(crate) fn de_count<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let value = Value::deserialize(d)?;
    coerce_integer(&value)
        .and_then(|n| T::try_from(n).ok())
        .ok_or_else(|| serde::de::Error::custom(format!("expected a non-negative count, got {value}")))
}

fn de_coordinate<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
