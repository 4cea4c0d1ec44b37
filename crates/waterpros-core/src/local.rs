use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::read_data_file;
use crate::{de_count, CatalogError};

/// FEMA flood zone designation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FloodZone {
    A,
    AE,
    X,
    D,
}

impl FloodZone {
    pub fn is_high_risk(&self) -> bool {
        matches!(self, FloodZone::A | FloodZone::AE)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FloodZone::A => "A",
            FloodZone::AE => "AE",
            FloodZone::X => "X",
            FloodZone::D => "D",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoilType {
    Clay,
    Sand,
    Loam,
    Rock,
}

impl SoilType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoilType::Clay => "clay",
            SoilType::Sand => "sand",
            SoilType::Loam => "loam",
            SoilType::Rock => "rock",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaterTableDepth {
    Shallow,
    Moderate,
    Deep,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HumidityLevels {
    pub summer_avg: f64,
    pub winter_avg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalClimateData {
    pub flood_risk_zone: FloodZone,
    pub average_rainfall_inches: f64,
    pub hurricane_risk: bool,
    pub wildfire_risk: RiskTier,
    pub humidity_levels: HumidityLevels,
    #[serde(deserialize_with = "de_count")]
    pub freeze_days_per_year: u32,
    pub tornado_risk: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalHousingData {
    #[serde(deserialize_with = "de_count")]
    pub median_home_age: u32,
    #[serde(deserialize_with = "de_count")]
    pub median_home_value: u64,
    pub homes_with_basements_percent: f64,
    #[serde(default)]
    pub primary_construction_material: Vec<String>,
    #[serde(default)]
    pub population_density: f64,
    #[serde(default, deserialize_with = "de_count")]
    pub median_household_income: u64,
    /// Share of homes carrying flood insurance, in percent.
    #[serde(default)]
    pub flood_insurance_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalRiskFactors {
    #[serde(default)]
    pub common_damage_causes: Vec<String>,
    /// Full English month names, e.g. "January".
    #[serde(default)]
    pub peak_damage_months: Vec<String>,
    #[serde(default)]
    pub seasonal_weather_events: Vec<String>,
    #[serde(default, deserialize_with = "de_count")]
    pub building_code_adoption_year: u32,
    pub soil_type: SoilType,
    pub water_table_depth: WaterTableDepth,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalBusinessData {
    #[serde(default)]
    pub local_competitors: Vec<String>,
    #[serde(deserialize_with = "de_count")]
    pub average_response_time_minutes: u32,
    #[serde(default)]
    pub insurance_companies_present: Vec<String>,
    #[serde(deserialize_with = "de_count")]
    pub building_permits_per_year: u32,
    #[serde(default)]
    pub recent_major_incidents: Vec<String>,
}

// --- Profiles ---

/// Everything known about one city beyond its catalog rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalProfile {
    pub climate: LocalClimateData,
    pub housing: LocalHousingData,
    pub risks: LocalRiskFactors,
    pub business: LocalBusinessData,
}

/// City-slug keyed profiles, read from `data/local_data.json`.
#[derive(Debug, Clone, Default)]
pub struct LocalProfiles {
    profiles: HashMap<String, LocalProfile>,
}

impl LocalProfiles {
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let serde_json::Value::Object(entries) = value else {
            return Err(CatalogError::Shape { expected: "object" });
        };

        let mut profiles = HashMap::with_capacity(entries.len());
        for (city_slug, entry) in entries {
            match serde_json::from_value::<LocalProfile>(entry) {
                Ok(profile) => {
                    profiles.insert(city_slug, profile);
                }
                Err(e) => {
                    tracing::warn!(city_slug = %city_slug, error = %e, "skipping local profile");
                }
            }
        }
        Ok(Self { profiles })
    }

    /// Read the table once at startup. Missing or broken files yield an empty
    /// table; pages then fall back to generic copy.
    pub fn load(path: &Path) -> Self {
        let loaded = read_data_file(path).and_then(|raw| Self::from_json(&raw));
        match loaded {
            Ok(profiles) => {
                tracing::info!(path = %path.display(), cities = profiles.len(), "local profiles loaded");
                profiles
            }
            Err(CatalogError::Missing(_)) => {
                tracing::warn!(path = %path.display(), "local profile table not found");
                Self::default()
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "local profile table unreadable");
                Self::default()
            }
        }
    }

    pub fn get(&self, city_slug: &str) -> Option<&LocalProfile> {
        self.profiles.get(city_slug)
    }

    pub fn insert(&mut self, city_slug: impl Into<String>, profile: LocalProfile) {
        self.profiles.insert(city_slug.into(), profile);
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
