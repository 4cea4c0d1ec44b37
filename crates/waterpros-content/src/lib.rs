pub mod faq;
pub mod generator;
pub mod meta;
pub mod rules;
pub mod schema;

use serde::Serialize;
use waterpros_core::local::LocalProfile;

pub use generator::{climate_intro, local_expertise, risk_analysis, seasonal_advice};
pub use rules::Fragment;

/// All locally generated copy for one city×service page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalContent {
    pub enhanced_intro: String,
    pub risk_analysis: String,
    pub seasonal_advice: Vec<String>,
    pub local_expertise: String,
    pub meta_description_enhancement: String,
    /// Names of every rule that fired, section by section.
    pub rules_fired: Vec<&'static str>,
}

pub fn enhance_content(city: &str, service: &str, profile: &LocalProfile) -> LocalContent {
    let LocalProfile {
        climate,
        housing,
        risks,
        business,
    } = profile;

    let mut rules_fired = Vec::new();
    let mut record = |fragments: &[Fragment]| rules_fired.extend(fragments.iter().map(|f| f.rule));
    record(&generator::climate_intro_fragments(city, climate));
    record(&generator::risk_analysis_fragments(city, risks, housing, climate));
    record(&generator::seasonal_advice_fragments(city, climate, risks));
    record(&generator::local_expertise_fragments(city, housing, business));

    let content = LocalContent {
        enhanced_intro: climate_intro(city, climate),
        risk_analysis: risk_analysis(city, risks, housing, climate),
        seasonal_advice: seasonal_advice(city, climate, risks),
        local_expertise: local_expertise(city, housing, business),
        meta_description_enhancement: generator::meta_description_enhancement(city, service, profile),
        rules_fired,
    };
    tracing::debug!(city, service, rules = content.rules_fired.len(), "generated local content");
    content
}

#[cfg(test)]
pub(crate) mod test_profiles {
    use waterpros_core::local::*;

    pub fn miami() -> LocalProfile {
        LocalProfile {
            climate: LocalClimateData {
                flood_risk_zone: FloodZone::AE,
                average_rainfall_inches: 62.0,
                hurricane_risk: true,
                wildfire_risk: RiskTier::Low,
                humidity_levels: HumidityLevels {
                    summer_avg: 75.0,
                    winter_avg: 60.0,
                },
                freeze_days_per_year: 0,
                tornado_risk: false,
            },
            housing: LocalHousingData {
                median_home_age: 38,
                median_home_value: 410_000,
                homes_with_basements_percent: 2.0,
                primary_construction_material: vec!["concrete block".into()],
                population_density: 12_000.0,
                median_household_income: 54_000,
                flood_insurance_rate: 48.0,
            },
            risks: LocalRiskFactors {
                common_damage_causes: vec!["hurricanes".into(), "roof leaks".into()],
                peak_damage_months: vec!["August".into(), "September".into()],
                seasonal_weather_events: vec!["tropical storms".into()],
                building_code_adoption_year: 2002,
                soil_type: SoilType::Sand,
                water_table_depth: WaterTableDepth::Shallow,
            },
            business: LocalBusinessData {
                local_competitors: Vec::new(),
                average_response_time_minutes: 40,
                insurance_companies_present: vec!["Citizens".into()],
                building_permits_per_year: 3200,
                recent_major_incidents: Vec::new(),
            },
        }
    }

    /// Matches no content rule anywhere.
    pub fn quiet() -> LocalProfile {
        LocalProfile {
            climate: LocalClimateData {
                flood_risk_zone: FloodZone::X,
                average_rainfall_inches: 25.0,
                hurricane_risk: false,
                wildfire_risk: RiskTier::Low,
                humidity_levels: HumidityLevels {
                    summer_avg: 50.0,
                    winter_avg: 40.0,
                },
                freeze_days_per_year: 5,
                tornado_risk: false,
            },
            housing: LocalHousingData {
                median_home_age: 20,
                median_home_value: 300_000,
                homes_with_basements_percent: 10.0,
                primary_construction_material: Vec::new(),
                population_density: 0.0,
                median_household_income: 0,
                flood_insurance_rate: 0.0,
            },
            risks: LocalRiskFactors {
                common_damage_causes: Vec::new(),
                peak_damage_months: vec!["October".into()],
                seasonal_weather_events: Vec::new(),
                building_code_adoption_year: 0,
                soil_type: SoilType::Loam,
                water_table_depth: WaterTableDepth::Deep,
            },
            business: LocalBusinessData {
                local_competitors: Vec::new(),
                average_response_time_minutes: 90,
                insurance_companies_present: Vec::new(),
                building_permits_per_year: 500,
                recent_major_incidents: Vec::new(),
            },
        }
    }
}
