use serde::Serialize;
use waterpros_core::{ServiceKind, BUSINESS_NAME};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

fn faq(question: String, answer: String) -> Faq {
    Faq { question, answer }
}

fn general(city: &str, radius_miles: u32) -> Vec<Faq> {
    vec![
        faq(
            format!("How quickly can you respond to emergencies in {city}?"),
            format!(
                "We provide 24/7 emergency response in {city} with an average arrival time of 45 minutes. \
                 Our local team is always ready to respond to water damage, fire damage, and other restoration emergencies throughout {city}."
            ),
        ),
        faq(
            format!("Do you work with insurance companies in {city}?"),
            format!(
                "Yes, we work directly with all major insurance companies and can handle the entire claims process for {city} residents. \
                 We provide detailed documentation and work directly with your adjuster to ensure maximum coverage."
            ),
        ),
        faq(
            format!("Are you licensed and certified for restoration work in {city}?"),
            format!(
                "Absolutely. {BUSINESS_NAME} is fully licensed, bonded, and insured to operate in {city}. \
                 Our technicians are IICRC certified and follow all state and local regulations for restoration work."
            ),
        ),
        faq(
            format!("What areas of {city} do you serve?"),
            format!(
                "We serve all of {city} and surrounding areas within a {radius_miles}-mile radius. \
                 Our local team knows the area well and can quickly reach any neighborhood in {city} for emergency restoration services."
            ),
        ),
        faq(
            format!("Do you provide free estimates in {city}?"),
            format!(
                "Yes, we provide free estimates for all restoration projects in {city}. \
                 Our certified technicians will assess the damage and provide a detailed estimate with no obligation. \
                 Emergency assessments are available 24/7."
            ),
        ),
    ]
}

fn for_service(city: &str, service: ServiceKind) -> Vec<Faq> {
    match service {
        ServiceKind::WaterDamageRestoration => vec![
            faq(
                format!("How long does water damage restoration take in {city}?"),
                format!(
                    "Water damage restoration in {city} typically takes 3-7 days depending on the extent of damage. \
                     We begin water extraction immediately, followed by drying (2-3 days), then cleaning and restoration. \
                     Emergency mitigation starts within 45 minutes."
                ),
            ),
            faq(
                format!("Will my insurance cover water damage restoration in {city}?"),
                format!(
                    "Most homeowner's insurance policies cover sudden water damage in {city}, such as burst pipes or appliance failures. \
                     We work directly with your insurance company to maximize coverage and handle all paperwork."
                ),
            ),
        ],
        ServiceKind::FireDamageRestoration => vec![
            faq(
                format!("Can smoke odor be completely removed from my {city} property?"),
                format!(
                    "Yes, we use advanced ozone treatment and thermal fogging to completely eliminate smoke odors from {city} properties. \
                     Our IICRC-certified technicians ensure all smoke damage and odors are properly addressed."
                ),
            ),
            faq(
                format!("How soon should I start fire damage restoration in {city}?"),
                format!(
                    "Fire damage restoration should begin immediately in {city}. \
                     The longer smoke and soot remain, the more permanent the damage becomes. \
                     We provide 24/7 emergency response to begin mitigation within 45 minutes."
                ),
            ),
        ],
        ServiceKind::MoldRemoval => vec![
            faq(
                format!("How do you test for mold in {city} properties?"),
                format!(
                    "We provide comprehensive mold testing in {city} using air samples and surface samples. \
                     Our certified mold inspectors identify the type and extent of mold contamination before creating a customized remediation plan."
                ),
            ),
            faq(
                format!("Is mold removal safe for my family in {city}?"),
                format!(
                    "Yes, our mold removal process in {city} follows strict safety protocols. \
                     We use containment barriers and negative air pressure to prevent spore spread, \
                     ensuring your family's safety throughout the remediation process."
                ),
            ),
        ],
        ServiceKind::StormDamageRepair
        | ServiceKind::SewageCleanup
        | ServiceKind::BasementFloodCleanup => Vec::new(),
    }
}

/// General questions first, then any service-specific ones.
pub fn faqs(city: &str, service: Option<ServiceKind>, radius_miles: u32) -> Vec<Faq> {
    let mut out = general(city, radius_miles);
    if let Some(service) = service {
        out.extend(for_service(city, service));
    }
    out
}
