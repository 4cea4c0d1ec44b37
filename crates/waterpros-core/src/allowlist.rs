use std::collections::{BTreeSet, HashSet};

use crate::{Catalog, ServiceKind};

/// Cities the site is deployed for.
pub const VALID_CITIES: &[&str] = &[
    // California
    "los-angeles",
    "san-diego",
    "san-francisco",
    "san-jose",
    "fresno",
    "sacramento",
    "long-beach",
    "oakland",
    "bakersfield",
    "anaheim",
    // National expansion
    "new-york",
    "chicago",
    "houston",
    "phoenix",
    "philadelphia",
    "san-antonio",
    "dallas",
    "austin",
    "jacksonville",
    "fort-worth",
    // Strategic expansion
    "miami",
    "denver",
    "seattle",
    "atlanta",
    "las-vegas",
];

pub const VALID_SERVICES: &[&str] = &[
    "water-damage-restoration",
    "fire-damage-restoration",
    "mold-removal",
    "storm-damage-repair",
    "sewage-cleanup",
    "basement-flood-cleanup",
];

/// Hand-curated slug lists, checked before the catalog is touched. They must
/// track the catalog file; `check_consistency` reports drift.
#[derive(Debug, Clone)]
pub struct AllowList {
    cities: HashSet<String>,
    services: HashSet<String>,
}

impl AllowList {
    pub fn new<C, S>(cities: C, services: S) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            cities: cities.into_iter().map(Into::into).collect(),
            services: services.into_iter().map(Into::into).collect(),
        }
    }

    pub fn builtin() -> Self {
        Self::new(VALID_CITIES.iter().copied(), VALID_SERVICES.iter().copied())
    }

    pub fn allows_city(&self, city_slug: &str) -> bool {
        self.cities.contains(city_slug)
    }

    pub fn allows_service(&self, service_slug: &str) -> bool {
        self.services.contains(service_slug)
    }

    pub fn cities(&self) -> BTreeSet<&str> {
        self.cities.iter().map(String::as_str).collect()
    }

    pub fn services(&self) -> BTreeSet<&str> {
        self.services.iter().map(String::as_str).collect()
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Drift between the allow-lists and what the catalog actually contains.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ConsistencyReport {
    /// Allow-listed cities with no catalog rows (pages would 404).
    pub cities_missing_from_catalog: Vec<String>,
    /// Catalog cities the allow-list rejects (rows can never be served).
    pub cities_missing_from_allowlist: Vec<String>,
    /// Allow-listed services no catalog row uses.
    pub services_missing_from_catalog: Vec<String>,
    /// Catalog services the allow-list rejects.
    pub services_missing_from_allowlist: Vec<String>,
    pub catalog_records: usize,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.cities_missing_from_catalog.is_empty()
            && self.cities_missing_from_allowlist.is_empty()
            && self.services_missing_from_catalog.is_empty()
            && self.services_missing_from_allowlist.is_empty()
    }
}

impl std::fmt::Display for ConsistencyReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "catalog records: {}", self.catalog_records)?;
        let sections = [
            ("allow-listed cities missing from catalog", &self.cities_missing_from_catalog),
            ("catalog cities missing from allow-list", &self.cities_missing_from_allowlist),
            ("allow-listed services missing from catalog", &self.services_missing_from_catalog),
            ("catalog services missing from allow-list", &self.services_missing_from_allowlist),
        ];
        for (label, slugs) in sections {
            if !slugs.is_empty() {
                writeln!(f, "{}: {}", label, slugs.join(", "))?;
            }
        }
        if self.is_consistent() {
            writeln!(f, "allow-lists match catalog")?;
        }
        Ok(())
    }
}

/// Compare both allow-lists against the loaded catalog. Loads the catalog.
pub fn check_consistency(allow: &AllowList, catalog: &Catalog) -> ConsistencyReport {
    let catalog_cities = catalog.city_slugs();
    let catalog_services: BTreeSet<&str> = catalog
        .service_slugs()
        .into_iter()
        .map(|k: ServiceKind| k.slug())
        .collect();

    let allowed_cities = allow.cities();
    let allowed_services = allow.services();

    ConsistencyReport {
        cities_missing_from_catalog: difference(&allowed_cities, &catalog_cities),
        cities_missing_from_allowlist: difference(&catalog_cities, &allowed_cities),
        services_missing_from_catalog: difference(&allowed_services, &catalog_services),
        services_missing_from_allowlist: difference(&catalog_services, &allowed_services),
        catalog_records: catalog.len(),
    }
}

fn difference(left: &BTreeSet<&str>, right: &BTreeSet<&str>) -> Vec<String> {
    left.difference(right).map(|s| s.to_string()).collect()
}
