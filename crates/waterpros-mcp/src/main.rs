mod site;

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use serde::{Deserialize, Serialize};
use tracing_subscriber::prelude::*;
use waterpros_core::lead::LeadSubmission;
use waterpros_core::settings::SiteSettings;
use waterpros_core::ServiceKind;

use site::Site;

// --- Request types ---

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct ListRoutesRequest {
    /// Only list routes for this city slug, e.g. "los-angeles". Omit for every route.
    city_slug: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct PageRequest {
    /// City slug, e.g. "miami"
    city_slug: String,
    /// Service slug, e.g. "mold-removal"
    service_slug: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct CityRequest {
    /// City slug, e.g. "san-diego"
    city_slug: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct FaqsRequest {
    /// City slug, e.g. "houston"
    city_slug: String,
    /// Optional service slug. Water, fire and mold pages add service-specific questions.
    service_slug: Option<String>,
}

// --- Server ---

#[derive(Clone)]
pub struct SiteServer {
    site: Arc<Site>,
    tool_router: ToolRouter<Self>,
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("Serialization error: {}", e))
}

fn not_found(what: String) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::error(vec![Content::text(what)]))
}

#[tool_router]
impl SiteServer {
    pub fn new(site: Site) -> Self {
        Self {
            site: Arc::new(site),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "List every city in the service catalog with its state and the services offered there, in catalog order")]
    fn list_cities(&self) -> Result<CallToolResult, McpError> {
        let cities = self.site.cities();
        if cities.is_empty() {
            return Ok(CallToolResult::success(vec![Content::text(
                "Catalog is empty. Check the catalog path and run check_catalog.",
            )]));
        }
        Ok(CallToolResult::success(vec![Content::text(to_json(&cities))]))
    }

    #[tool(
        description = "List the statically generated service pages as `/city/service` paths, one per line. Empty in fast iteration mode."
    )]
    fn list_routes(
        &self,
        Parameters(req): Parameters<ListRoutesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let routes = self.site.routes(req.city_slug.as_deref());
        let text = if routes.is_empty() {
            "No routes.".to_string()
        } else {
            routes.iter().map(|r| r.path()).collect::<Vec<_>>().join("\n")
        };
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(
        description = "Resolve a service page and return everything it renders: the catalog record, head metadata, locally generated copy (when the city has local data), FAQs, related services and JSON-LD blocks."
    )]
    fn get_page(&self, Parameters(req): Parameters<PageRequest>) -> Result<CallToolResult, McpError> {
        match self.site.page(&req.city_slug, &req.service_slug) {
            Some(page) => Ok(CallToolResult::success(vec![Content::text(to_json(&page))])),
            None => not_found(format!(
                "Page not found: /{}/{}",
                req.city_slug, req.service_slug
            )),
        }
    }

    #[tool(description = "Resolve a city landing page: metadata, services offered and LocalBusiness JSON-LD")]
    fn get_city(&self, Parameters(req): Parameters<CityRequest>) -> Result<CallToolResult, McpError> {
        match self.site.city(&req.city_slug) {
            Some(city) => Ok(CallToolResult::success(vec![Content::text(to_json(&city))])),
            None => not_found(format!("City not found: {}", req.city_slug)),
        }
    }

    #[tool(
        description = "Generate the local content sections (climate intro, risk analysis, seasonal advice, local expertise, meta enhancement) for a page, including which content rules fired."
    )]
    fn get_local_content(
        &self,
        Parameters(req): Parameters<PageRequest>,
    ) -> Result<CallToolResult, McpError> {
        let resolver = self.site.resolver();
        let Some(record) = resolver.resolve_page(&req.city_slug, &req.service_slug) else {
            return not_found(format!(
                "Page not found: /{}/{}",
                req.city_slug, req.service_slug
            ));
        };
        match self.site.local_content(record) {
            Some(content) => Ok(CallToolResult::success(vec![Content::text(to_json(&content))])),
            None => not_found(format!("No local data for city: {}", req.city_slug)),
        }
    }

    #[tool(description = "Get the FAQ list for a city, optionally with service-specific questions")]
    fn get_faqs(&self, Parameters(req): Parameters<FaqsRequest>) -> Result<CallToolResult, McpError> {
        let service = match req.service_slug.as_deref() {
            None => None,
            Some(slug) => match ServiceKind::from_slug(slug) {
                Some(kind) => Some(kind),
                None => return not_found(format!("Unknown service: {}", slug)),
            },
        };
        match self.site.faqs(&req.city_slug, service) {
            Some(faqs) => Ok(CallToolResult::success(vec![Content::text(to_json(&faqs))])),
            None => not_found(format!("City not found: {}", req.city_slug)),
        }
    }

    #[tool(
        description = "Submit a contact-form lead. Requires name, phone, service and city; email is optional. Validation errors are returned as tool errors; storage problems never are."
    )]
    fn submit_lead(
        &self,
        Parameters(req): Parameters<LeadSubmission>,
    ) -> Result<CallToolResult, McpError> {
        match self.site.submit_lead(&req) {
            Ok(receipt) => Ok(CallToolResult::success(vec![Content::text(to_json(&receipt))])),
            Err(e) => Ok(CallToolResult::error(vec![Content::text(format!(
                "Invalid lead: {}",
                e
            ))])),
        }
    }

    #[tool(description = "Compare the built-in city/service allow-lists with the catalog contents and report any drift")]
    fn check_catalog(&self) -> Result<CallToolResult, McpError> {
        let report = self.site.check_catalog();
        let text = format!("{}\n\n{}", report, to_json(&report));
        if report.is_consistent() {
            Ok(CallToolResult::success(vec![Content::text(text)]))
        } else {
            Ok(CallToolResult::error(vec![Content::text(text)]))
        }
    }
}

#[tool_handler]
impl ServerHandler for SiteServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

const INSTRUCTIONS: &str = r#"Operator tools for the Emergency Water Pros local landing-page site.

## Catalog
The site is driven by a catalog of city×service records. A page exists at `/{city_slug}/{service_slug}` only when the city is on the city allow-list, the service is one of the six services, and the catalog has a record for the pair.

Services: water-damage-restoration, fire-damage-restoration, mold-removal, storm-damage-repair, sewage-cleanup, basement-flood-cleanup.

## Tools
- `list_cities` / `list_routes` to see what the build would generate.
- `get_page` / `get_city` return what a page renders, including metadata and JSON-LD.
- `get_local_content` shows locally generated copy and which content rules fired.
- `check_catalog` reports drift between the allow-lists and the catalog. Run it after editing catalog data.
- `submit_lead` runs the contact-form intake path."#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the protocol; logs go to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings_path = std::env::args().nth(1).map(PathBuf::from);
    let settings = SiteSettings::load(settings_path.as_deref());
    tracing::info!(
        catalog = %settings.catalog_path.display(),
        base_url = %settings.base_url,
        "starting waterpros-mcp"
    );

    let service = SiteServer::new(Site::from_settings(settings))
        .serve(rmcp::transport::io::stdio())
        .await
        .inspect_err(|e| tracing::error!(error = %e, "MCP server error"))?;
    service.waiting().await?;
    Ok(())
}
