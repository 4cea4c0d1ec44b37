use serde::Serialize;
use serde_json::{json, Value};
use waterpros_content::faq::{self, Faq};
use waterpros_content::{enhance_content, meta, schema, LocalContent};
use waterpros_core::allowlist::{check_consistency, AllowList, ConsistencyReport};
use waterpros_core::lead::{LeadIntake, LeadReceipt, LeadSubmission};
use waterpros_core::local::LocalProfiles;
use waterpros_core::routes::{Resolver, Route};
use waterpros_core::settings::SiteSettings;
use waterpros_core::{Catalog, LeadError, ServiceKind, ServiceRecord, DEFAULT_SERVICE_RADIUS_MILES};

/// Related-service cards shown under a service page.
const RELATED_LIMIT: usize = 3;

/// Everything the tools read from, built once at startup.
pub struct Site {
    pub settings: SiteSettings,
    pub catalog: Catalog,
    pub allow: AllowList,
    pub profiles: LocalProfiles,
    pub intake: LeadIntake,
}

#[derive(Debug, Serialize)]
pub struct CitySummary<'a> {
    pub city_slug: &'a str,
    pub city: &'a str,
    pub state_abbr: &'a str,
    pub services: Vec<ServiceKind>,
}

#[derive(Debug, Serialize)]
struct RelatedCard {
    service_slug: ServiceKind,
    name: &'static str,
    summary: &'static str,
    path: String,
}

impl Site {
    pub fn new(
        settings: SiteSettings,
        catalog: Catalog,
        profiles: LocalProfiles,
        intake: LeadIntake,
    ) -> Self {
        Self {
            settings,
            catalog,
            allow: AllowList::builtin(),
            profiles,
            intake,
        }
    }

    /// Catalog and local data from the configured paths. Nothing is read from
    /// the catalog until a tool first needs it.
    pub fn from_settings(settings: SiteSettings) -> Self {
        let catalog = Catalog::from_path(&settings.catalog_path);
        let profiles = LocalProfiles::load(&settings.local_data_path);
        Self::new(settings, catalog, profiles, LeadIntake::log_only())
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.catalog, &self.allow, self.settings.build_mode())
    }

    fn base_url(&self) -> &str {
        self.settings.base_url.trim_end_matches('/')
    }

    pub fn cities(&self) -> Vec<CitySummary<'_>> {
        self.catalog
            .cities()
            .into_iter()
            .map(|group| CitySummary {
                city_slug: group.city_slug,
                city: group.city,
                state_abbr: group
                    .records
                    .first()
                    .copied()
                    .map(|r| r.state_abbr.as_str())
                    .unwrap_or_default(),
                services: group.records.iter().map(|r| r.service_slug).collect(),
            })
            .collect()
    }

    pub fn routes(&self, city_slug: Option<&str>) -> Vec<Route> {
        self.resolver()
            .enumerate_routes()
            .into_iter()
            .filter(|route| city_slug.map_or(true, |city| route.city_slug == city))
            .collect()
    }

    pub fn local_content(&self, record: &ServiceRecord) -> Option<LocalContent> {
        self.profiles
            .get(&record.city_slug)
            .map(|profile| enhance_content(&record.city, &record.service, profile))
    }

    pub fn faqs(&self, city_slug: &str, service: Option<ServiceKind>) -> Option<Vec<Faq>> {
        let records = self.resolver().resolve_city(city_slug)?;
        let first = records.first()?;
        let radius = service
            .and_then(|kind| records.iter().find(|r| r.service_slug == kind))
            .map_or(DEFAULT_SERVICE_RADIUS_MILES, |r| r.service_area_radius_miles);
        Some(faq::faqs(&first.city, service, radius))
    }

    /// Everything a service page renders: record, head metadata, local copy,
    /// FAQs, related services and JSON-LD.
    pub fn page(&self, city_slug: &str, service_slug: &str) -> Option<Value> {
        let resolver = self.resolver();
        let record = resolver.resolve_page(city_slug, service_slug)?;
        let base = self.base_url();

        let faqs = faq::faqs(
            &record.city,
            Some(record.service_slug),
            record.service_area_radius_miles,
        );
        let related: Vec<RelatedCard> = resolver
            .related_services(city_slug, record.service_slug, RELATED_LIMIT)
            .into_iter()
            .map(|r| RelatedCard {
                service_slug: r.service_slug,
                name: r.service_slug.display_name(),
                summary: r.service_slug.summary(),
                path: r.path(),
            })
            .collect();
        let structured_data = vec![
            self.organization(),
            schema::service_page(record, base),
            schema::service_breadcrumbs(record, base),
            schema::faq_page(&faqs),
            schema::restoration_process(record),
        ];

        Some(json!({
            "path": record.path(),
            "record": record,
            "meta": meta::service_page_meta(record, base),
            "local_content": self.local_content(record),
            "faqs": faqs,
            "related_services": related,
            "structured_data": structured_data,
        }))
    }

    pub fn city(&self, city_slug: &str) -> Option<Value> {
        let records = self.resolver().resolve_city(city_slug)?;
        let first = records.first()?;
        let base = self.base_url();
        let services: Vec<Value> = records
            .iter()
            .map(|r| {
                json!({
                    "service_slug": r.service_slug,
                    "service": r.service,
                    "path": r.path(),
                })
            })
            .collect();
        Some(json!({
            "city": first.city,
            "city_slug": city_slug,
            "state_abbr": first.state_abbr,
            "meta": meta::city_page_meta(&records, city_slug, base),
            "services": services,
            "structured_data": [schema::local_business(first, base)],
        }))
    }

    pub fn organization(&self) -> Value {
        let groups = self.catalog.cities();
        let names: Vec<&str> = groups.iter().map(|g| g.city).collect();
        schema::organization(self.base_url(), &names)
    }

    pub fn submit_lead(&self, submission: &LeadSubmission) -> Result<LeadReceipt, LeadError> {
        self.intake.submit(submission)
    }

    pub fn check_catalog(&self) -> ConsistencyReport {
        check_consistency(&self.allow, &self.catalog)
    }
}
