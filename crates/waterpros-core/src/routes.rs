use std::fmt::Write as _;

use serde::Serialize;

use crate::allowlist::AllowList;
use crate::{Catalog, ServiceKind, ServiceRecord};

/// How much of the site a build should enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    /// Enumerate every catalog page.
    #[default]
    Full,
    /// Local iteration: enumerate nothing and never touch the catalog.
    FastIteration,
}

impl BuildMode {
    pub fn from_fast_flag(fast: bool) -> Self {
        if fast {
            BuildMode::FastIteration
        } else {
            BuildMode::Full
        }
    }
}

/// One statically generated service page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Route {
    pub city_slug: String,
    pub service_slug: ServiceKind,
}

impl Route {
    pub fn path(&self) -> String {
        format!("/{}/{}", self.city_slug, self.service_slug.slug())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Weekly,
}

impl ChangeFrequency {
    fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Weekly => "weekly",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SitemapEntry {
    pub url: String,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

pub struct Resolver<'a> {
    catalog: &'a Catalog,
    allow: &'a AllowList,
    mode: BuildMode,
}

impl<'a> Resolver<'a> {
    pub fn new(catalog: &'a Catalog, allow: &'a AllowList, mode: BuildMode) -> Self {
        Self {
            catalog,
            allow,
            mode,
        }
    }

    /// Every (city, service) page in catalog order. The catalog guarantees
    /// composite keys are unique, so no pair repeats.
    pub fn enumerate_routes(&self) -> Vec<Route> {
        if self.mode == BuildMode::FastIteration {
            tracing::info!("fast iteration mode, skipping route enumeration");
            return Vec::new();
        }
        let routes: Vec<Route> = self
            .catalog
            .load()
            .iter()
            .map(|r| Route {
                city_slug: r.city_slug.clone(),
                service_slug: r.service_slug,
            })
            .collect();
        tracing::info!(routes = routes.len(), "enumerated service routes");
        routes
    }

    /// Allow-lists first so junk slugs never cost a catalog load.
    pub fn resolve_page(&self, city_slug: &str, service_slug: &str) -> Option<&'a ServiceRecord> {
        if !self.allow.allows_city(city_slug) {
            tracing::debug!(city_slug, "unknown city");
            return None;
        }
        if !self.allow.allows_service(service_slug) {
            tracing::debug!(service_slug, "unknown service");
            return None;
        }
        let record = self.catalog.by_slug(city_slug, service_slug);
        if record.is_none() {
            tracing::debug!(city_slug, service_slug, "no catalog record");
        }
        record
    }

    pub fn resolve_city(&self, city_slug: &str) -> Option<Vec<&'a ServiceRecord>> {
        if !self.allow.allows_city(city_slug) {
            tracing::debug!(city_slug, "unknown city");
            return None;
        }
        let records = self.catalog.by_city(city_slug);
        if records.is_empty() {
            tracing::debug!(city_slug, "city has no catalog records");
            return None;
        }
        Some(records)
    }

    /// Other services offered in the same city, catalog order.
    pub fn related_services(
        &self,
        city_slug: &str,
        current: ServiceKind,
        limit: usize,
    ) -> Vec<&'a ServiceRecord> {
        self.resolve_city(city_slug)
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.service_slug != current)
            .take(limit)
            .collect()
    }

    /// Homepage, then city pages, then service pages.
    pub fn sitemap_entries(&self, base_url: &str) -> Vec<SitemapEntry> {
        let base = base_url.trim_end_matches('/');
        let mut entries = vec![SitemapEntry {
            url: base.to_string(),
            change_frequency: ChangeFrequency::Weekly,
            priority: 1.0,
        }];
        if self.mode == BuildMode::FastIteration {
            return entries;
        }

        for city in self.catalog.cities() {
            entries.push(SitemapEntry {
                url: format!("{}/{}", base, city.city_slug),
                change_frequency: ChangeFrequency::Weekly,
                priority: 0.9,
            });
        }
        for route in self.enumerate_routes() {
            entries.push(SitemapEntry {
                url: format!("{}{}", base, route.path()),
                change_frequency: ChangeFrequency::Weekly,
                priority: 0.8,
            });
        }
        entries
    }
}

/// Render entries as a sitemap protocol document.
pub fn render_sitemap_xml(entries: &[SitemapEntry], last_modified: Option<&str>) -> String {
    let mut out = String::with_capacity(128 + entries.len() * 160);
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");
    for entry in entries {
        out.push_str("  <url>\n");
        let _ = writeln!(out, "    <loc>{}</loc>", escape_xml(&entry.url));
        if let Some(date) = last_modified {
            let _ = writeln!(out, "    <lastmod>{}</lastmod>", escape_xml(date));
        }
        let _ = writeln!(out, "    <changefreq>{}</changefreq>", entry.change_frequency.as_str());
        let _ = writeln!(out, "    <priority>{:.1}</priority>", entry.priority);
        out.push_str("  </url>\n");
    }
    out.push_str("</urlset>\n");
    out
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_source::InlineSource;
    use crate::test_support::record_json;

    fn catalog() -> (Catalog, InlineSource) {
        let source = InlineSource::new(vec![
            record_json("los-angeles", "Los Angeles", "water-damage-restoration", "Water Damage Restoration"),
            record_json("los-angeles", "Los Angeles", "mold-removal", "Mold Removal"),
            record_json("los-angeles", "Los Angeles", "sewage-cleanup", "Sewage Cleanup"),
            record_json("los-angeles", "Los Angeles", "storm-damage-repair", "Storm Damage Repair"),
            record_json("miami", "Miami", "water-damage-restoration", "Water Damage Restoration"),
        ]);
        (Catalog::new(source.clone()), source)
    }

    #[test]
    fn unknown_city_never_loads_catalog() {
        let (catalog, source) = catalog();
        let allow = AllowList::builtin();
        let resolver = Resolver::new(&catalog, &allow, BuildMode::Full);

        assert!(resolver.resolve_page("atlantis", "mold-removal").is_none());
        assert!(resolver.resolve_page("los-angeles", "roof-repair").is_none());
        assert!(resolver.resolve_city("atlantis").is_none());
        assert_eq!(source.read_count(), 0);
        assert!(!catalog.is_loaded());
    }

    #[test]
    fn resolves_known_pairs_exactly() {
        let (catalog, _) = catalog();
        let allow = AllowList::builtin();
        let resolver = Resolver::new(&catalog, &allow, BuildMode::Full);

        for route in resolver.enumerate_routes() {
            let record = resolver
                .resolve_page(&route.city_slug, route.service_slug.slug())
                .unwrap();
            assert_eq!(record.city_slug, route.city_slug);
            assert_eq!(record.service_slug, route.service_slug);
        }
        assert!(resolver.resolve_page("miami", "mold-removal").is_none());
    }

    #[test]
    fn allow_listed_city_without_rows_is_not_found() {
        let (catalog, _) = catalog();
        let allow = AllowList::builtin();
        let resolver = Resolver::new(&catalog, &allow, BuildMode::Full);
        assert!(resolver.resolve_city("denver").is_none());
        assert_eq!(resolver.resolve_city("miami").unwrap().len(), 1);
    }

    #[test]
    fn fast_mode_skips_catalog() {
        let (catalog, source) = catalog();
        let allow = AllowList::builtin();
        let resolver = Resolver::new(&catalog, &allow, BuildMode::FastIteration);
        assert!(resolver.enumerate_routes().is_empty());
        assert_eq!(resolver.sitemap_entries("https://example.com").len(), 1);
        assert_eq!(source.read_count(), 0);
    }

    #[test]
    fn related_services_exclude_current_and_respect_limit() {
        let (catalog, _) = catalog();
        let allow = AllowList::builtin();
        let resolver = Resolver::new(&catalog, &allow, BuildMode::Full);
        let related: Vec<_> = resolver
            .related_services("los-angeles", ServiceKind::MoldRemoval, 3)
            .iter()
            .map(|r| r.service_slug)
            .collect();
        assert_eq!(
            related,
            vec![
                ServiceKind::WaterDamageRestoration,
                ServiceKind::SewageCleanup,
                ServiceKind::StormDamageRepair
            ]
        );
        assert!(resolver
            .related_services("atlantis", ServiceKind::MoldRemoval, 3)
            .is_empty());
    }

    #[test]
    fn sitemap_orders_home_cities_services() {
        let (catalog, _) = catalog();
        let allow = AllowList::builtin();
        let resolver = Resolver::new(&catalog, &allow, BuildMode::Full);
        let entries = resolver.sitemap_entries("https://emergencywaterpros.com/");
        assert_eq!(entries.len(), 1 + 2 + 5);
        assert_eq!(entries[0].url, "https://emergencywaterpros.com");
        assert_eq!(entries[1].url, "https://emergencywaterpros.com/los-angeles");
        assert_eq!(entries[2].url, "https://emergencywaterpros.com/miami");
        assert_eq!(
            entries[3].url,
            "https://emergencywaterpros.com/los-angeles/water-damage-restoration"
        );
        assert!((entries[7].priority - 0.8).abs() < f32::EPSILON);

        let xml = render_sitemap_xml(&entries[..1], Some("2025-08-01"));
        assert!(xml.contains("<loc>https://emergencywaterpros.com</loc>"));
        assert!(xml.contains("<lastmod>2025-08-01</lastmod>"));
        assert!(xml.contains("<priority>1.0</priority>"));
    }

    #[test]
    fn xml_escapes_reserved_characters() {
        assert_eq!(escape_xml("a&b<c>"), "a&amp;b&lt;c&gt;");
    }
}
