use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing_subscriber::prelude::*;
use waterpros_core::allowlist::{check_consistency, AllowList};
use waterpros_core::routes::{render_sitemap_xml, Resolver};
use waterpros_core::settings::{SiteSettings, SETTINGS_FILE};
use waterpros_core::Catalog;

const USAGE: &str = "Usage: cargo run -p xtask -- <check-catalog | routes | sitemap>";

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().collect();
    let task = args.get(1).map(|s| s.as_str()).unwrap_or("");

    let Some(root) = workspace_root() else {
        eprintln!("could not find workspace root");
        return ExitCode::FAILURE;
    };
    let settings = settings_for(&root);

    match task {
        "check-catalog" => check_catalog(&settings),
        "routes" => routes(&settings),
        "sitemap" => sitemap(&settings),
        _ => {
            eprintln!("{USAGE}");
            ExitCode::FAILURE
        }
    }
}

/// Settings file and data paths are taken relative to the workspace root so
/// the tasks behave the same from any subdirectory.
fn settings_for(root: &Path) -> SiteSettings {
    let settings_path = root.join(SETTINGS_FILE);
    let mut settings = SiteSettings::load(Some(settings_path.as_path()));
    for path in [&mut settings.catalog_path, &mut settings.local_data_path] {
        if path.is_relative() {
            *path = root.join(&*path);
        }
    }
    settings
}

fn check_catalog(settings: &SiteSettings) -> ExitCode {
    let catalog = Catalog::from_path(&settings.catalog_path);
    let report = check_consistency(&AllowList::builtin(), &catalog);
    println!("{report}");

    if report.catalog_records == 0 {
        eprintln!("catalog {} has no usable records", settings.catalog_path.display());
        return ExitCode::FAILURE;
    }
    if !report.is_consistent() {
        eprintln!("allow-lists and catalog have drifted apart");
        return ExitCode::FAILURE;
    }
    println!(
        "ok: {} records across {} cities",
        report.catalog_records,
        catalog.city_slugs().len()
    );
    ExitCode::SUCCESS
}

fn routes(settings: &SiteSettings) -> ExitCode {
    let catalog = Catalog::from_path(&settings.catalog_path);
    let allow = AllowList::builtin();
    let resolver = Resolver::new(&catalog, &allow, settings.build_mode());
    for route in resolver.enumerate_routes() {
        println!("{}/{}", route.city_slug, route.service_slug);
    }
    ExitCode::SUCCESS
}

fn sitemap(settings: &SiteSettings) -> ExitCode {
    let catalog = Catalog::from_path(&settings.catalog_path);
    let allow = AllowList::builtin();
    let resolver = Resolver::new(&catalog, &allow, settings.build_mode());
    let entries = resolver.sitemap_entries(&settings.base_url);
    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
    print!("{}", render_sitemap_xml(&entries, Some(today.as_str())));
    ExitCode::SUCCESS
}

fn workspace_root() -> Option<PathBuf> {
    // Walk up from current dir to find Cargo.toml with [workspace]
    let mut dir = env::current_dir().ok()?;
    loop {
        let manifest = dir.join("Cargo.toml");
        if let Ok(contents) = std::fs::read_to_string(&manifest) {
            if contents.contains("[workspace]") {
                return Some(dir);
            }
        }
        if !dir.pop() {
            return None;
        }
    }
}
