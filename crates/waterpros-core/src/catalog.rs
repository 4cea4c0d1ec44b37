use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Serialize;
use serde_json::Value;

use crate::{CatalogError, RecordError, ServiceKind, ServiceRecord};

// --- Sources ---

/// Where the catalog JSON comes from.
pub trait CatalogSource: Send + Sync {
    fn read(&self) -> Result<String, CatalogError>;

    /// Human-readable origin for log lines.
    fn describe(&self) -> String;
}

/// Catalog stored as a JSON array on disk (`data/services.json`).
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for JsonFileSource {
    fn read(&self) -> Result<String, CatalogError> {
        read_data_file(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Read a JSON data file, distinguishing "absent" from "unreadable".
pub(crate) fn read_data_file(path: &Path) -> Result<String, CatalogError> {
    if !path.exists() {
        return Err(CatalogError::Missing(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// --- Parsing ---

/// Records accepted from a catalog file plus the rows that were skipped.
#[derive(Debug, Default)]
pub struct ParsedCatalog {
    pub records: Vec<ServiceRecord>,
    pub rejected: Vec<(usize, RecordError)>,
}

/// Decode a catalog file row by row. Only a non-array or unparseable document
/// fails as a whole; bad rows are collected in `rejected` with their index.
pub fn parse_records(raw: &str) -> Result<ParsedCatalog, CatalogError> {
    let rows = match serde_json::from_str::<Value>(raw)? {
        Value::Array(rows) => rows,
        _ => return Err(CatalogError::Shape { expected: "array" }),
    };

    let mut parsed = ParsedCatalog::default();
    let mut seen: HashMap<String, BTreeSet<ServiceKind>> = HashMap::new();

    for (index, row) in rows.into_iter().enumerate() {
        let record = match ServiceRecord::from_value(row) {
            Ok(record) => record,
            Err(e) => {
                parsed.rejected.push((index, e));
                continue;
            }
        };
        let services = seen.entry(record.city_slug.clone()).or_default();
        if !services.insert(record.service_slug) {
            parsed.rejected.push((
                index,
                RecordError::Duplicate {
                    city_slug: record.city_slug.clone(),
                    service_slug: record.service_slug.slug().to_string(),
                },
            ));
            continue;
        }
        parsed.records.push(record);
    }

    Ok(parsed)
}

struct Loaded {
    records: Vec<ServiceRecord>,
    /// city_slug -> indices into `records`, in source order.
    by_city: HashMap<String, Vec<usize>>,
    /// city slugs in first-seen order.
    city_order: Vec<String>,
}

impl Loaded {
    fn empty() -> Self {
        Self::index(Vec::new())
    }

    fn index(records: Vec<ServiceRecord>) -> Self {
        let mut by_city: HashMap<String, Vec<usize>> = HashMap::new();
        let mut city_order = Vec::new();
        for (i, record) in records.iter().enumerate() {
            let slots = by_city.entry(record.city_slug.clone()).or_default();
            if slots.is_empty() {
                city_order.push(record.city_slug.clone());
            }
            slots.push(i);
        }
        Self {
            records,
            by_city,
            city_order,
        }
    }

    fn read(source: &dyn CatalogSource) -> Self {
        let origin = source.describe();
        tracing::info!(source = %origin, "loading service catalog");

        let raw = match source.read() {
            Ok(raw) => raw,
            Err(CatalogError::Missing(path)) => {
                tracing::error!(path = %path.display(), "service catalog not found, serving no pages");
                return Self::empty();
            }
            Err(e) => {
                tracing::error!(source = %origin, error = %e, "service catalog unreadable, serving no pages");
                return Self::empty();
            }
        };

        let parsed = match parse_records(&raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::error!(source = %origin, error = %e, "service catalog malformed, serving no pages");
                return Self::empty();
            }
        };

        for (index, reason) in &parsed.rejected {
            tracing::warn!(source = %origin, index, %reason, "skipping catalog record");
        }
        tracing::info!(
            source = %origin,
            records = parsed.records.len(),
            skipped = parsed.rejected.len(),
            "service catalog loaded"
        );
        Self::index(parsed.records)
    }
}

// --- Catalog ---

/// All records for one city, for city overview pages.
#[derive(Debug, Clone, Serialize)]
pub struct CityGroup<'a> {
    pub city: &'a str,
    pub city_slug: &'a str,
    pub records: Vec<&'a ServiceRecord>,
}

/// The catalog owns its load-once state. The backing source is read on first
/// access; every later call is served from memory.
pub struct Catalog {
    source: Box<dyn CatalogSource>,
    loaded: OnceLock<Loaded>,
}

impl Catalog {
    pub fn new(source: impl CatalogSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            loaded: OnceLock::new(),
        }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::new(JsonFileSource::new(path))
    }

    fn loaded(&self) -> &Loaded {
        self.loaded.get_or_init(|| Loaded::read(self.source.as_ref()))
    }

    /// Whether the backing source has been read yet.
    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    /// Every record, in source order. Empty when the source is missing or broken.
    pub fn load(&self) -> &[ServiceRecord] {
        &self.loaded().records
    }

    pub fn len(&self) -> usize {
        self.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.load().is_empty()
    }

    pub fn by_slug(&self, city_slug: &str, service_slug: &str) -> Option<&ServiceRecord> {
        let kind = ServiceKind::from_slug(service_slug)?;
        let loaded = self.loaded();
        loaded
            .by_city
            .get(city_slug)?
            .iter()
            .map(|&i| &loaded.records[i])
            .find(|r| r.service_slug == kind)
    }

    pub fn by_city(&self, city_slug: &str) -> Vec<&ServiceRecord> {
        let loaded = self.loaded();
        loaded
            .by_city
            .get(city_slug)
            .map(|slots| slots.iter().map(|&i| &loaded.records[i]).collect())
            .unwrap_or_default()
    }

    /// Records grouped by city, cities in first-seen order.
    pub fn cities(&self) -> Vec<CityGroup<'_>> {
        let loaded = self.loaded();
        loaded
            .city_order
            .iter()
            .map(|slug| {
                let records = self.by_city(slug);
                CityGroup {
                    city: records.first().copied().map(|r| r.city.as_str()).unwrap_or_default(),
                    city_slug: slug.as_str(),
                    records,
                }
            })
            .collect()
    }

    pub fn city_slugs(&self) -> BTreeSet<&str> {
        self.loaded().city_order.iter().map(String::as_str).collect()
    }

    pub fn service_slugs(&self) -> BTreeSet<ServiceKind> {
        self.load().iter().map(|r| r.service_slug).collect()
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("source", &self.source.describe())
            .field("loaded", &self.loaded.get().map(|l| l.records.len()))
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::test_source::InlineSource;
    use super::*;
    use crate::test_support::record_json;
    use serde_json::json;

    fn sample_rows() -> Vec<Value> {
        vec![
            record_json("los-angeles", "Los Angeles", "water-damage-restoration", "Water Damage Restoration"),
            record_json("san-diego", "San Diego", "water-damage-restoration", "Water Damage Restoration"),
            record_json("los-angeles", "Los Angeles", "mold-removal", "Mold Removal"),
            record_json("los-angeles", "Los Angeles", "sewage-cleanup", "Sewage Cleanup"),
        ]
    }

    #[test]
    fn reads_source_once() {
        let source = InlineSource::new(sample_rows());
        let catalog = Catalog::new(source.clone());
        assert!(!catalog.is_loaded());

        assert_eq!(catalog.load().len(), 4);
        assert_eq!(catalog.load().len(), 4);
        assert!(catalog.by_slug("san-diego", "water-damage-restoration").is_some());
        assert_eq!(source.read_count(), 1);
        assert!(catalog.is_loaded());
    }

    #[test]
    fn concurrent_first_callers_share_one_read() {
        let source = InlineSource::new(sample_rows());
        let catalog = Catalog::new(source.clone());
        let start = std::sync::Barrier::new(8);

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    start.wait();
                    assert!(catalog.by_slug("los-angeles", "mold-removal").is_some());
                });
            }
        });
        assert_eq!(source.read_count(), 1);
        assert_eq!(catalog.load().len(), 4);
    }

    #[test]
    fn by_city_preserves_source_order() {
        let catalog = Catalog::new(InlineSource::new(sample_rows()));
        let la: Vec<_> = catalog
            .by_city("los-angeles")
            .iter()
            .map(|r| r.service_slug.slug())
            .collect();
        assert_eq!(la, vec!["water-damage-restoration", "mold-removal", "sewage-cleanup"]);
        assert!(catalog
            .by_city("los-angeles")
            .iter()
            .all(|r| r.city_slug == "los-angeles"));
        assert!(catalog.by_city("atlantis").is_empty());
    }

    #[test]
    fn by_slug_absent_is_none() {
        let catalog = Catalog::new(InlineSource::new(sample_rows()));
        assert!(catalog.by_slug("san-diego", "mold-removal").is_none());
        assert!(catalog.by_slug("san-diego", "not-a-service").is_none());
        let hit = catalog.by_slug("los-angeles", "mold-removal").unwrap();
        assert_eq!(hit.city_slug, "los-angeles");
        assert_eq!(hit.service_slug, ServiceKind::MoldRemoval);
    }

    #[test]
    fn cities_group_in_first_seen_order() {
        let catalog = Catalog::new(InlineSource::new(sample_rows()));
        let groups = catalog.cities();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].city_slug, "los-angeles");
        assert_eq!(groups[0].city, "Los Angeles");
        assert_eq!(groups[0].records.len(), 3);
        assert_eq!(groups[1].city_slug, "san-diego");
    }

    #[test]
    fn bad_rows_are_skipped_not_fatal() {
        let mut rows = sample_rows();
        rows.push(json!({"city_slug": "fresno"}));
        rows.push(record_json("fresno", "Fresno", "roof-repair", "Roof Repair"));
        rows.push(record_json("los-angeles", "Los Angeles", "mold-removal", "Mold Removal"));

        let parsed = parse_records(&Value::Array(rows).to_string()).unwrap();
        assert_eq!(parsed.records.len(), 4);
        let indices: Vec<usize> = parsed.rejected.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![4, 5, 6]);
        assert!(matches!(parsed.rejected[2].1, RecordError::Duplicate { .. }));
    }

    #[test]
    fn non_array_document_degrades_to_empty() {
        assert!(matches!(
            parse_records(r#"{"records": []}"#),
            Err(CatalogError::Shape { .. })
        ));

        let catalog = Catalog::new(InlineSource::raw("{ not json"));
        assert!(catalog.is_empty());
        assert!(catalog.cities().is_empty());
    }

    #[test]
    fn missing_file_is_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::from_path(dir.path().join("services.json"));
        assert!(catalog.load().is_empty());
        assert!(catalog.is_loaded());
    }

    #[test]
    fn derived_slug_sets() {
        let catalog = Catalog::new(InlineSource::new(sample_rows()));
        let cities: Vec<_> = catalog.city_slugs().into_iter().collect();
        assert_eq!(cities, vec!["los-angeles", "san-diego"]);
        assert_eq!(catalog.service_slugs().len(), 3);
    }
}
