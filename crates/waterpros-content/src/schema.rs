use serde_json::{json, Map, Value};
use waterpros_core::{ServiceKind, ServiceRecord, BUSINESS_EMAIL, BUSINESS_NAME, BUSINESS_PHONE};

use crate::faq::Faq;

const CONTEXT: &str = "https://schema.org";

/// Fields every business-shaped block carries.
fn business_base(base_url: &str) -> Map<String, Value> {
    let base = json!({
        "@context": CONTEXT,
        "name": BUSINESS_NAME,
        "telephone": BUSINESS_PHONE,
        "email": BUSINESS_EMAIL,
        "logo": format!("{}/logo.png", base_url),
        "openingHours": "Mo-Su 00:00-23:59",
        "sameAs": [
            "https://www.facebook.com/emergencywaterpros",
            "https://www.linkedin.com/company/emergencywaterpros",
            "https://www.bbb.org/us/ca/emergencywaterpros"
        ],
        "paymentAccepted": ["Cash", "Credit Card", "Insurance"],
        "currenciesAccepted": "USD"
    });
    match base {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Base fields overlaid with `fields`; later keys win.
fn with_base(base_url: &str, fields: Value) -> Value {
    let mut out = business_base(base_url);
    if let Value::Object(fields) = fields {
        out.extend(fields);
    }
    Value::Object(out)
}

fn coordinate(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("0")
}

fn aggregate_rating() -> Value {
    json!({
        "@type": "AggregateRating",
        "ratingValue": "4.9",
        "reviewCount": "500",
        "bestRating": "5",
        "worstRating": "1"
    })
}

fn located(record: &ServiceRecord) -> Value {
    json!({
        "address": {
            "@type": "PostalAddress",
            "addressLocality": record.city,
            "addressRegion": record.state_abbr,
            "addressCountry": "US"
        },
        "geo": {
            "@type": "GeoCoordinates",
            "latitude": coordinate(&record.lat),
            "longitude": coordinate(&record.lon)
        },
        "priceRange": "$$",
        "serviceArea": {
            "@type": "City",
            "name": record.city,
            "addressRegion": record.state_abbr,
            "addressCountry": "US"
        },
        "aggregateRating": aggregate_rating()
    })
}

fn merge(mut a: Value, b: Value) -> Value {
    if let (Value::Object(a), Value::Object(b)) = (&mut a, b) {
        a.extend(b);
    }
    a
}

/// Site-wide organization block; `cities` are display names in catalog order.
pub fn organization(base_url: &str, cities: &[&str]) -> Value {
    let offers: Vec<Value> = ServiceKind::ALL
        .iter()
        .map(|kind| {
            json!({
                "@type": "Offer",
                "itemOffered": {
                    "@type": "Service",
                    "name": kind.display_name(),
                    "description": kind.summary()
                }
            })
        })
        .collect();
    let area: Vec<Value> = cities
        .iter()
        .map(|name| json!({ "@type": "City", "name": name }))
        .collect();

    with_base(
        base_url,
        json!({
            "@type": "Organization",
            "description": "Professional 24/7 water damage restoration services. IICRC certified technicians, direct insurance billing, and emergency response.",
            "url": base_url,
            "address": { "@type": "PostalAddress", "addressCountry": "US" },
            "hasOfferCatalog": {
                "@type": "OfferCatalog",
                "name": "Water Damage Restoration Services",
                "itemListElement": offers
            },
            "areaServed": area
        }),
    )
}

/// City landing page block.
pub fn local_business(record: &ServiceRecord, base_url: &str) -> Value {
    let fields = json!({
        "@type": "LocalBusiness",
        "name": format!("{} {}", BUSINESS_NAME, record.city),
        "description": format!("Professional water damage restoration services in {}", record.city),
        "url": format!("{}/{}", base_url, record.city_slug),
        "image": record.image_url
    });
    with_base(base_url, merge(fields, located(record)))
}

/// Service page block with a sample review and a single-offer catalog.
pub fn service_page(record: &ServiceRecord, base_url: &str) -> Value {
    let fields = json!({
        "@type": "LocalBusiness",
        "name": format!("{} {}", BUSINESS_NAME, record.city),
        "description": record.intro_paragraph,
        "url": format!("{}{}", base_url, record.path()),
        "image": record.image_url,
        "review": [{
            "@type": "Review",
            "reviewRating": { "@type": "Rating", "ratingValue": "5", "bestRating": "5" },
            "author": { "@type": "Person", "name": "Sarah Johnson" },
            "reviewBody": format!(
                "Excellent {} service in {}. Professional team, fast response, and quality work.",
                record.service.to_lowercase(),
                record.city
            )
        }],
        "hasOfferCatalog": {
            "@type": "OfferCatalog",
            "name": record.service,
            "itemListElement": [{
                "@type": "Offer",
                "itemOffered": {
                    "@type": "Service",
                    "name": record.service,
                    "description": record.intro_paragraph,
                    "serviceType": record.service,
                    "provider": {
                        "@type": "LocalBusiness",
                        "name": BUSINESS_NAME,
                        "telephone": BUSINESS_PHONE
                    },
                    "areaServed": {
                        "@type": "City",
                        "name": record.city,
                        "addressRegion": record.state_abbr
                    },
                    "availability": "https://schema.org/InStock",
                    "businessFunction": "https://schema.org/Sell"
                },
                "availability": "https://schema.org/InStock",
                "businessFunction": "https://schema.org/Sell"
            }]
        }
    });
    with_base(base_url, merge(fields, located(record)))
}

/// `items` are `(name, absolute url)` pairs, outermost first.
pub fn breadcrumbs(items: &[(&str, &str)]) -> Value {
    let elements: Vec<Value> = items
        .iter()
        .enumerate()
        .map(|(i, (name, url))| {
            json!({
                "@type": "ListItem",
                "position": i + 1,
                "name": name,
                "item": url
            })
        })
        .collect();
    json!({
        "@context": CONTEXT,
        "@type": "BreadcrumbList",
        "itemListElement": elements
    })
}

/// Home > City > Service trail for a service page.
pub fn service_breadcrumbs(record: &ServiceRecord, base_url: &str) -> Value {
    let city_url = format!("{}/{}", base_url, record.city_slug);
    let page_url = format!("{}{}", base_url, record.path());
    breadcrumbs(&[
        ("Home", base_url),
        (record.city.as_str(), city_url.as_str()),
        (record.service.as_str(), page_url.as_str()),
    ])
}

pub fn faq_page(faqs: &[Faq]) -> Value {
    let questions: Vec<Value> = faqs
        .iter()
        .map(|faq| {
            json!({
                "@type": "Question",
                "name": faq.question,
                "acceptedAnswer": { "@type": "Answer", "text": faq.answer }
            })
        })
        .collect();
    json!({
        "@context": CONTEXT,
        "@type": "FAQPage",
        "mainEntity": questions
    })
}

/// `steps` are `(name, text)` pairs in order.
pub fn how_to(name: &str, steps: &[(&str, &str)]) -> Value {
    let steps: Vec<Value> = steps
        .iter()
        .enumerate()
        .map(|(i, (step, text))| {
            json!({
                "@type": "HowToStep",
                "position": i + 1,
                "name": step,
                "text": text
            })
        })
        .collect();
    json!({
        "@context": CONTEXT,
        "@type": "HowTo",
        "name": name,
        "step": steps
    })
}

/// The four-stage restoration process shown on every service page.
pub fn restoration_process(record: &ServiceRecord) -> Value {
    how_to(
        &format!("How {} works in {}", record.service, record.city),
        &[
            ("Emergency Response", "Our team arrives within 45 minutes to assess the damage and stop further loss."),
            ("Damage Assessment", "Technicians document moisture, smoke or mold damage and build a restoration plan."),
            ("Mitigation & Drying", "Water is extracted and industrial equipment dries and sanitizes affected areas."),
            ("Restoration", "Damaged materials are repaired or replaced and the property is returned to pre-loss condition."),
        ],
    )
}
