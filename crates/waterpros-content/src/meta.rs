use serde::Serialize;
use waterpros_core::{ServiceRecord, BUSINESS_NAME, BUSINESS_PHONE_DISPLAY};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OgImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub keywords: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub og_title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub og_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_image: Option<OgImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundKind {
    City,
    Service,
}

pub fn not_found_meta(kind: NotFoundKind) -> PageMeta {
    let (title, description) = match kind {
        NotFoundKind::City => ("City Not Found", "City not found"),
        NotFoundKind::Service => ("Service Not Found", "Service not found"),
    };
    PageMeta {
        title: title.to_string(),
        description: description.to_string(),
        ..PageMeta::default()
    }
}

pub fn service_page_meta(record: &ServiceRecord, base_url: &str) -> PageMeta {
    let base = base_url.trim_end_matches('/');
    let og_image = (!record.image_url.is_empty()).then(|| OgImage {
        url: record.image_url.clone(),
        width: 1200,
        height: 630,
        alt: format!("{} in {}", record.service, record.city),
    });
    PageMeta {
        title: record.meta_title.clone(),
        description: format!(
            "{} in {}, {} - 45-min emergency response! IICRC certified, 5-star rated, direct insurance billing. Available 24/7. Call {} now!",
            record.service, record.city, record.state_abbr, BUSINESS_PHONE_DISPLAY
        ),
        keywords: record.service_keywords.clone(),
        og_title: record.meta_title.clone(),
        og_description: format!(
            "#1 {} company in {}. 45-min response, 5-star rated, direct insurance billing. Call {}!",
            record.service.to_lowercase(),
            record.city,
            BUSINESS_PHONE_DISPLAY
        ),
        og_image,
        canonical: Some(format!("{}{}", base, record.path())),
    }
}

/// City landing page metadata. Names come from the first record, so
/// `records` must be the city's catalog rows; an empty slice is a 404.
pub fn city_page_meta(records: &[&ServiceRecord], city_slug: &str, base_url: &str) -> PageMeta {
    let Some(first) = records.first() else {
        return not_found_meta(NotFoundKind::City);
    };
    let city = &first.city;
    let state = &first.state_abbr;
    PageMeta {
        title: format!(
            "Water Damage Restoration in {city}, {state} | Emergency Response 24/7 | {BUSINESS_NAME}"
        ),
        description: format!(
            "Professional water damage restoration services in {city}, {state}. 24/7 emergency response, licensed & IICRC certified. Call now for immediate help."
        ),
        keywords: format!(
            "water damage restoration {city}, emergency water damage {city}, flood cleanup {city}, {city} water damage contractor, {state} water damage restoration"
        ),
        og_title: format!("Water Damage Restoration in {city}, {state} | {BUSINESS_NAME}"),
        og_description: format!(
            "Expert water damage restoration across all {city} neighborhoods. 45-minute emergency response, licensed & insured."
        ),
        og_image: None,
        canonical: Some(format!("{}/{}", base_url.trim_end_matches('/'), city_slug)),
    }
}
