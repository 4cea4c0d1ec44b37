use waterpros_core::local::{
    LocalBusinessData, LocalClimateData, LocalHousingData, LocalProfile, LocalRiskFactors,
    RiskTier, SoilType,
};

use crate::rules::{evaluate, group_thousands, join_or, Fragment, Rule};

// --- Climate intro ---

pub struct ClimateInputs<'a> {
    pub city: &'a str,
    pub climate: &'a LocalClimateData,
}

fn climate_rules<'a>() -> [Rule<ClimateInputs<'a>>; 6] {
    [
        Rule {
            name: "high-risk-flood-zone",
            applies: |i| i.climate.flood_risk_zone.is_high_risk(),
            fragment: |i| {
                format!(
                    "{} sits in a high-risk flood zone, making professional water damage services critical for homeowners.",
                    i.city
                )
            },
        },
        Rule {
            name: "heavy-rainfall",
            applies: |i| i.climate.average_rainfall_inches > 40.0,
            fragment: |i| {
                format!(
                    "With {} inches of annual rainfall, {} faces frequent water intrusion challenges.",
                    i.climate.average_rainfall_inches, i.city
                )
            },
        },
        Rule {
            name: "dry-climate",
            applies: |i| i.climate.average_rainfall_inches < 15.0,
            fragment: |i| {
                format!(
                    "Despite {}'s dry climate ({}\" annual rainfall), sudden storms can cause severe water damage to unprepared properties.",
                    i.city, i.climate.average_rainfall_inches
                )
            },
        },
        Rule {
            name: "hurricane-prone",
            applies: |i| i.climate.hurricane_risk,
            fragment: |i| {
                format!(
                    "As a hurricane-prone area, {} requires specialized storm damage restoration expertise.",
                    i.city
                )
            },
        },
        Rule {
            name: "high-wildfire-risk",
            applies: |i| i.climate.wildfire_risk == RiskTier::High,
            fragment: |i| {
                format!(
                    "{}'s high wildfire risk means residents need rapid fire damage restoration services when disaster strikes.",
                    i.city
                )
            },
        },
        Rule {
            name: "humid-summers",
            applies: |i| i.climate.humidity_levels.summer_avg > 70.0,
            fragment: |i| {
                format!(
                    "{}'s high summer humidity ({}%) creates perfect conditions for mold growth after water damage.",
                    i.city, i.climate.humidity_levels.summer_avg
                )
            },
        },
    ]
}

pub fn climate_intro_fragments(city: &str, climate: &LocalClimateData) -> Vec<Fragment> {
    evaluate(&climate_rules(), &ClimateInputs { city, climate })
}

pub fn climate_intro(city: &str, climate: &LocalClimateData) -> String {
    join_or(&climate_intro_fragments(city, climate), || {
        format!("Professional emergency restoration services in {}.", city)
    })
}

// --- Risk analysis ---

pub struct RiskInputs<'a> {
    pub city: &'a str,
    pub risks: &'a LocalRiskFactors,
    pub housing: &'a LocalHousingData,
    pub climate: &'a LocalClimateData,
}

fn risk_rules<'a>() -> [Rule<RiskInputs<'a>>; 4] {
    [
        Rule {
            name: "aging-housing",
            applies: |i| i.housing.median_home_age > 40,
            fragment: |i| {
                format!(
                    "With a median home age of {} years, {} properties often feature aging plumbing systems prone to failures.",
                    i.housing.median_home_age, i.city
                )
            },
        },
        Rule {
            name: "clay-soil",
            applies: |i| i.risks.soil_type == SoilType::Clay,
            fragment: |i| {
                format!(
                    "{}'s clay soil expands and contracts with moisture changes, frequently causing foundation shifts and water intrusion.",
                    i.city
                )
            },
        },
        Rule {
            name: "freeze-burst-pipes",
            applies: |i| {
                i.risks.common_damage_causes.iter().any(|c| c == "burst pipes")
                    && i.climate.freeze_days_per_year > 30
            },
            fragment: |i| {
                format!(
                    "{} experiences {} freeze days annually, significantly increasing burst pipe incidents.",
                    i.city, i.climate.freeze_days_per_year
                )
            },
        },
        Rule {
            name: "common-basements",
            applies: |i| i.housing.homes_with_basements_percent > 30.0,
            fragment: |i| {
                format!(
                    "Over {}% of {} homes have basements, requiring specialized below-grade water damage expertise.",
                    i.housing.homes_with_basements_percent, i.city
                )
            },
        },
    ]
}

pub fn risk_analysis_fragments(
    city: &str,
    risks: &LocalRiskFactors,
    housing: &LocalHousingData,
    climate: &LocalClimateData,
) -> Vec<Fragment> {
    evaluate(
        &risk_rules(),
        &RiskInputs {
            city,
            risks,
            housing,
            climate,
        },
    )
}

pub fn risk_analysis(
    city: &str,
    risks: &LocalRiskFactors,
    housing: &LocalHousingData,
    climate: &LocalClimateData,
) -> String {
    join_or(&risk_analysis_fragments(city, risks, housing, climate), || {
        format!("{} faces unique water damage challenges requiring local expertise.", city)
    })
}

// --- Seasonal advice ---

pub struct MonthInputs<'a> {
    pub month: &'a str,
    pub city: &'a str,
    pub climate: &'a LocalClimateData,
}

fn is_winter(month: &str) -> bool {
    matches!(month, "December" | "January" | "February")
}

fn is_summer(month: &str) -> bool {
    matches!(month, "June" | "July" | "August")
}

fn is_spring(month: &str) -> bool {
    matches!(month, "March" | "April")
}

fn seasonal_rules<'a>() -> [Rule<MonthInputs<'a>>; 4] {
    [
        Rule {
            name: "winter-freeze",
            applies: |i| is_winter(i.month) && i.climate.freeze_days_per_year > 15,
            fragment: |i| {
                format!(
                    "{}: Monitor for frozen pipe damage as {} temperatures drop below freezing",
                    i.month, i.city
                )
            },
        },
        Rule {
            name: "summer-hurricanes",
            applies: |i| is_summer(i.month) && i.climate.hurricane_risk,
            fragment: |i| {
                format!(
                    "{}: Hurricane season preparedness is critical for {} properties",
                    i.month, i.city
                )
            },
        },
        Rule {
            name: "summer-humidity",
            applies: |i| is_summer(i.month) && i.climate.humidity_levels.summer_avg > 65.0,
            fragment: |i| {
                format!(
                    "{}: High humidity increases mold risk after any water intrusion in {}",
                    i.month, i.city
                )
            },
        },
        Rule {
            name: "spring-rains",
            applies: |i| is_spring(i.month) && i.climate.average_rainfall_inches > 30.0,
            fragment: |i| {
                format!(
                    "{}: Spring rains often overwhelm {}'s drainage systems",
                    i.month, i.city
                )
            },
        },
    ]
}

/// Rules run once per peak month, months in the order the table lists them.
pub fn seasonal_advice_fragments(
    city: &str,
    climate: &LocalClimateData,
    risks: &LocalRiskFactors,
) -> Vec<Fragment> {
    let rules = seasonal_rules();
    risks
        .peak_damage_months
        .iter()
        .flat_map(|month| {
            evaluate(
                &rules,
                &MonthInputs {
                    month,
                    city,
                    climate,
                },
            )
        })
        .collect()
}

pub fn seasonal_advice(
    city: &str,
    climate: &LocalClimateData,
    risks: &LocalRiskFactors,
) -> Vec<String> {
    let fragments = seasonal_advice_fragments(city, climate, risks);
    if fragments.is_empty() {
        return vec![format!("Year-round vigilance prevents costly water damage in {}", city)];
    }
    fragments.into_iter().map(|f| f.text).collect()
}

// --- Local expertise ---

pub struct ExpertiseInputs<'a> {
    pub city: &'a str,
    pub housing: &'a LocalHousingData,
    pub business: &'a LocalBusinessData,
}

fn expertise_rules<'a>() -> [Rule<ExpertiseInputs<'a>>; 5] {
    [
        Rule {
            name: "fast-response",
            applies: |i| i.business.average_response_time_minutes < 60,
            fragment: |i| {
                format!(
                    "Our {} team maintains a {}-minute average response time, faster than the industry standard.",
                    i.city, i.business.average_response_time_minutes
                )
            },
        },
        Rule {
            name: "premium-market",
            applies: |i| i.housing.median_home_value > 500_000,
            fragment: |i| {
                format!(
                    "Understanding {}'s luxury home market (median value ${}), we provide premium restoration services that protect your investment.",
                    i.city,
                    group_thousands(i.housing.median_home_value)
                )
            },
        },
        Rule {
            name: "affordable-market",
            applies: |i| i.housing.median_home_value < 200_000,
            fragment: |i| {
                format!(
                    "We offer cost-effective restoration solutions tailored to {}'s affordable housing market.",
                    i.city
                )
            },
        },
        Rule {
            name: "active-construction",
            applies: |i| i.business.building_permits_per_year > 1000,
            fragment: |i| {
                format!(
                    "With {} new construction permits annually, our {} team stays current with the latest building materials and techniques.",
                    i.business.building_permits_per_year, i.city
                )
            },
        },
        Rule {
            name: "track-record",
            applies: |_| true,
            fragment: |i| {
                format!(
                    "Our certified technicians have restored over 500 {} properties, understanding the unique challenges of your local environment.",
                    i.city
                )
            },
        },
    ]
}

pub fn local_expertise_fragments(
    city: &str,
    housing: &LocalHousingData,
    business: &LocalBusinessData,
) -> Vec<Fragment> {
    evaluate(
        &expertise_rules(),
        &ExpertiseInputs {
            city,
            housing,
            business,
        },
    )
}

/// Never empty: the closing track-record sentence always fires.
pub fn local_expertise(city: &str, housing: &LocalHousingData, business: &LocalBusinessData) -> String {
    join_or(&local_expertise_fragments(city, housing, business), String::new)
}

pub fn meta_description_enhancement(city: &str, service: &str, profile: &LocalProfile) -> String {
    format!(
        "Specialized {} in {}. Local experts understanding {}'s unique {} soil and {} flood zone challenges.",
        service.to_lowercase(),
        city,
        city,
        profile.risks.soil_type.as_str(),
        profile.climate.flood_risk_zone.as_str()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_profiles::{miami, quiet};
    use waterpros_core::local::FloodZone;

    fn names(fragments: &[Fragment]) -> Vec<&'static str> {
        fragments.iter().map(|f| f.rule).collect()
    }

    #[test]
    fn miami_climate_fires_four_rules_in_order() {
        let profile = miami();
        let fired = climate_intro_fragments("Miami", &profile.climate);
        assert_eq!(
            names(&fired),
            vec!["high-risk-flood-zone", "heavy-rainfall", "hurricane-prone", "humid-summers"]
        );
        assert_eq!(
            climate_intro("Miami", &profile.climate),
            "Miami sits in a high-risk flood zone, making professional water damage services critical for homeowners. \
             With 62 inches of annual rainfall, Miami faces frequent water intrusion challenges. \
             As a hurricane-prone area, Miami requires specialized storm damage restoration expertise. \
             Miami's high summer humidity (75%) creates perfect conditions for mold growth after water damage."
        );
    }

    #[test]
    fn climate_intro_is_pure_and_substitutes_city() {
        let profile = miami();
        let a = climate_intro("Miami", &profile.climate);
        assert_eq!(a, climate_intro("Miami", &profile.climate));
        let b = climate_intro("Tampa", &profile.climate);
        assert_eq!(a.replace("Miami", "Tampa"), b);
    }

    #[test]
    fn quiet_climate_falls_back() {
        let profile = quiet();
        assert!(climate_intro_fragments("Fresno", &profile.climate).is_empty());
        assert_eq!(
            climate_intro("Fresno", &profile.climate),
            "Professional emergency restoration services in Fresno."
        );
    }

    #[test]
    fn dry_climate_prints_fractional_rainfall() {
        let mut profile = quiet();
        profile.climate.average_rainfall_inches = 10.5;
        assert_eq!(
            climate_intro("Phoenix", &profile.climate),
            "Despite Phoenix's dry climate (10.5\" annual rainfall), sudden storms can cause severe water damage to unprepared properties."
        );
    }

    #[test]
    fn wildfire_rule_needs_high_tier() {
        let mut profile = quiet();
        profile.climate.wildfire_risk = RiskTier::Medium;
        assert!(climate_intro_fragments("Sacramento", &profile.climate).is_empty());
        profile.climate.wildfire_risk = RiskTier::High;
        assert_eq!(
            names(&climate_intro_fragments("Sacramento", &profile.climate)),
            vec!["high-wildfire-risk"]
        );
    }

    #[test]
    fn burst_pipes_need_cause_and_freeze_days() {
        let mut profile = quiet();
        profile.climate.freeze_days_per_year = 45;
        let p = &profile;
        assert!(risk_analysis_fragments("Denver", &p.risks, &p.housing, &p.climate).is_empty());

        profile.risks.common_damage_causes.push("burst pipes".into());
        let p = &profile;
        assert_eq!(
            risk_analysis("Denver", &p.risks, &p.housing, &p.climate),
            "Denver experiences 45 freeze days annually, significantly increasing burst pipe incidents."
        );
    }

    #[test]
    fn risk_analysis_order_and_fallback() {
        let mut profile = quiet();
        let p = &profile;
        assert_eq!(
            risk_analysis("Fresno", &p.risks, &p.housing, &p.climate),
            "Fresno faces unique water damage challenges requiring local expertise."
        );

        profile.housing.median_home_age = 52;
        profile.housing.homes_with_basements_percent = 35.0;
        profile.risks.soil_type = SoilType::Clay;
        let p = &profile;
        assert_eq!(
            names(&risk_analysis_fragments("Chicago", &p.risks, &p.housing, &p.climate)),
            vec!["aging-housing", "clay-soil", "common-basements"]
        );
        assert!(risk_analysis("Chicago", &p.risks, &p.housing, &p.climate)
            .ends_with("Over 35% of Chicago homes have basements, requiring specialized below-grade water damage expertise."));
    }

    #[test]
    fn seasonal_advice_walks_months_in_order() {
        let profile = miami();
        assert_eq!(
            seasonal_advice("Miami", &profile.climate, &profile.risks),
            vec![
                "August: Hurricane season preparedness is critical for Miami properties",
                "August: High humidity increases mold risk after any water intrusion in Miami",
            ]
        );
    }

    #[test]
    fn seasonal_advice_falls_back_to_single_line() {
        let profile = quiet();
        assert_eq!(
            seasonal_advice("Fresno", &profile.climate, &profile.risks),
            vec!["Year-round vigilance prevents costly water damage in Fresno"]
        );
    }

    #[test]
    fn winter_and_spring_months() {
        let mut profile = quiet();
        profile.climate.freeze_days_per_year = 20;
        profile.climate.average_rainfall_inches = 35.0;
        profile.risks.peak_damage_months = vec!["January".into(), "April".into(), "October".into()];
        assert_eq!(
            seasonal_advice("Boston", &profile.climate, &profile.risks),
            vec![
                "January: Monitor for frozen pipe damage as Boston temperatures drop below freezing",
                "April: Spring rains often overwhelm Boston's drainage systems",
            ]
        );
    }

    #[test]
    fn expertise_formats_premium_values() {
        let mut profile = miami();
        profile.housing.median_home_value = 650_000;
        let fired = local_expertise_fragments("Miami", &profile.housing, &profile.business);
        assert_eq!(
            names(&fired),
            vec!["fast-response", "premium-market", "active-construction", "track-record"]
        );
        assert!(fired[1].text.contains("(median value $650,000)"));
    }

    #[test]
    fn expertise_always_closes_with_track_record() {
        let mut profile = quiet();
        profile.housing.median_home_value = 150_000;
        assert_eq!(
            local_expertise("Fresno", &profile.housing, &profile.business),
            "We offer cost-effective restoration solutions tailored to Fresno's affordable housing market. \
             Our certified technicians have restored over 500 Fresno properties, understanding the unique challenges of your local environment."
        );
    }

    #[test]
    fn meta_enhancement_lowercases_service() {
        let mut profile = miami();
        profile.climate.flood_risk_zone = FloodZone::AE;
        assert_eq!(
            meta_description_enhancement("Miami", "Mold Removal", &profile),
            "Specialized mold removal in Miami. Local experts understanding Miami's unique sand soil and AE flood zone challenges."
        );
    }
}
