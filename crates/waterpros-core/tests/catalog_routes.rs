use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::{json, Value};
use waterpros_core::allowlist::{check_consistency, AllowList, VALID_CITIES};
use waterpros_core::routes::{BuildMode, Resolver};
use waterpros_core::{Catalog, CatalogError, CatalogSource, JsonFileSource, ServiceKind};

fn title_case(slug: &str) -> String {
    slug.split('-')
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn row(city_slug: &str, kind: ServiceKind) -> Value {
    let city = title_case(city_slug);
    json!({
        "service": kind.display_name(),
        "service_slug": kind.slug(),
        "city": city,
        "city_slug": city_slug,
        "state": "Somewhere",
        "state_abbr": "SW",
        "population": 100000,
        "meta_title": format!("{} in {}", kind.display_name(), city),
        "intro_paragraph": "Local crews on call around the clock."
    })
}

/// Full site: every allow-listed city with every service, cities in list order.
fn full_site_rows() -> Vec<Value> {
    VALID_CITIES
        .iter()
        .flat_map(|city| ServiceKind::ALL.iter().map(move |kind| row(city, *kind)))
        .collect()
}

fn write_catalog(rows: Vec<Value>) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("services.json");
    std::fs::write(&path, serde_json::to_string_pretty(&Value::Array(rows)).unwrap()).unwrap();
    (dir, path)
}

struct CountingSource {
    inner: JsonFileSource,
    reads: Arc<AtomicUsize>,
}

impl CatalogSource for CountingSource {
    fn read(&self) -> Result<String, CatalogError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read()
    }

    fn describe(&self) -> String {
        self.inner.describe()
    }
}

#[test]
fn builtin_allowlists_match_full_catalog() {
    let (_dir, path) = write_catalog(full_site_rows());
    let catalog = Catalog::from_path(&path);
    let report = check_consistency(&AllowList::builtin(), &catalog);
    assert!(report.is_consistent(), "{report}");
    assert_eq!(report.catalog_records, 25 * 6);
}

#[test]
fn drift_is_reported_both_ways() {
    let mut rows: Vec<Value> = full_site_rows()
        .into_iter()
        .filter(|r| r["city_slug"] != "denver")
        .collect();
    rows.push(row("tulsa", ServiceKind::MoldRemoval));
    let (_dir, path) = write_catalog(rows);

    let report = check_consistency(&AllowList::builtin(), &Catalog::from_path(&path));
    assert!(!report.is_consistent());
    assert_eq!(report.cities_missing_from_catalog, vec!["denver"]);
    assert_eq!(report.cities_missing_from_allowlist, vec!["tulsa"]);
    assert!(report.services_missing_from_catalog.is_empty());
}

#[test]
fn every_route_resolves_to_itself() {
    let (_dir, path) = write_catalog(full_site_rows());
    let catalog = Catalog::from_path(&path);
    let allow = AllowList::builtin();
    let resolver = Resolver::new(&catalog, &allow, BuildMode::Full);

    let routes = resolver.enumerate_routes();
    assert_eq!(routes.len(), 150);
    let distinct: HashSet<_> = routes.iter().cloned().collect();
    assert_eq!(distinct.len(), routes.len());
    assert_eq!(routes, resolver.enumerate_routes());

    for route in &routes {
        let record = resolver
            .resolve_page(&route.city_slug, route.service_slug.slug())
            .expect("catalog route must resolve");
        assert_eq!(record.city_slug, route.city_slug);
        assert_eq!(record.service_slug, route.service_slug);
    }
}

#[test]
fn invalid_city_is_rejected_without_reading_the_file() {
    let (_dir, path) = write_catalog(full_site_rows());
    let reads = Arc::new(AtomicUsize::new(0));
    let catalog = Catalog::new(CountingSource {
        inner: JsonFileSource::new(&path),
        reads: reads.clone(),
    });
    let allow = AllowList::builtin();
    let resolver = Resolver::new(&catalog, &allow, BuildMode::Full);

    assert!(resolver.resolve_page("gotham", "mold-removal").is_none());
    assert!(resolver.resolve_page("miami", "gutter-cleaning").is_none());
    assert_eq!(reads.load(Ordering::SeqCst), 0);

    assert!(resolver.resolve_page("miami", "mold-removal").is_some());
    assert!(resolver.resolve_page("denver", "sewage-cleanup").is_some());
    assert_eq!(reads.load(Ordering::SeqCst), 1);
}

#[test]
fn city_services_keep_file_order() {
    let rows = vec![
        row("los-angeles", ServiceKind::SewageCleanup),
        row("san-diego", ServiceKind::SewageCleanup),
        row("los-angeles", ServiceKind::WaterDamageRestoration),
        row("los-angeles", ServiceKind::MoldRemoval),
    ];
    let (_dir, path) = write_catalog(rows);
    let catalog = Catalog::from_path(&path);

    let la = catalog.by_city("los-angeles");
    assert!(la.iter().all(|r| r.city_slug == "los-angeles"));
    let order: Vec<ServiceKind> = la.iter().map(|r| r.service_slug).collect();
    assert_eq!(
        order,
        vec![
            ServiceKind::SewageCleanup,
            ServiceKind::WaterDamageRestoration,
            ServiceKind::MoldRemoval
        ]
    );
}

#[test]
fn missing_file_means_no_routes() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::from_path(dir.path().join("absent.json"));
    let allow = AllowList::builtin();
    let resolver = Resolver::new(&catalog, &allow, BuildMode::Full);

    assert!(resolver.enumerate_routes().is_empty());
    assert!(resolver.resolve_page("miami", "mold-removal").is_none());
    assert!(resolver.resolve_city("miami").is_none());
    assert_eq!(resolver.sitemap_entries("https://emergencywaterpros.com").len(), 1);
}
