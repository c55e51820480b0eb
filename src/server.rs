//! MCP server exposing race search over the session state.

use crate::config::Config;
use crate::tools::list_facets::{ListFacetsRequest, handle_list_facets};
use crate::tools::search_races::{SearchRacesRequest, handle_search_races};
use crate::worker::RaceState;
use anyhow::anyhow;
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars::{JsonSchema, generate::SchemaSettings},
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

/// MCP server for race discovery
#[derive(Clone)]
pub struct RaceServer {
    /// Loaded races and the fuzzy index
    state: Arc<RaceState>,

    /// Result count when a request doesn't set `limit`
    default_limit: usize,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for RaceServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RaceServer")
            .field("state", &self.state)
            .field("default_limit", &self.default_limit)
            .finish()
    }
}

#[tool_router]
impl RaceServer {
    pub fn new(state: Arc<RaceState>, default_limit: usize) -> Self {
        Self {
            state,
            default_limit: default_limit.max(1),
            tool_router: Self::tool_router(),
        }
    }

    /// Load the dataset from `config` and start indexing.
    pub async fn from_config(config: &Config) -> crate::error::Result<Self> {
        let state = RaceState::load(config).await?;
        Ok(Self::new(Arc::new(state), config.search.default_limit))
    }

    pub fn state(&self) -> &Arc<RaceState> {
        &self.state
    }

    #[tool(
        description = "Search races by free text and structured filters. Text matches race names, nicknames and locations (typo tolerant), plus categories like '5k', 'half marathon', 'ultra', 'trail' or 'fun run'. Filters narrow by date range, distance range, toggles and format; results can be sorted by date, distance or name.",
        input_schema = inline_schema_for_type::<SearchRacesRequest>()
    )]
    async fn search_races(
        &self,
        Parameters(request): Parameters<SearchRacesRequest>,
    ) -> std::result::Result<String, String> {
        handle_search_races(&self.state, &request, self.default_limit)
    }

    #[tool(
        description = "Summarize the race dataset: how many races fall in each distance class, terrain and format, which filter toggles and sort options search_races accepts, and whether the fuzzy search index is ready.",
        input_schema = inline_schema_for_type::<ListFacetsRequest>()
    )]
    async fn list_facets(
        &self,
        Parameters(request): Parameters<ListFacetsRequest>,
    ) -> std::result::Result<String, String> {
        Ok(handle_list_facets(&self.state, &request).await)
    }
}

#[tool_handler]
impl ServerHandler for RaceServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "race-finder: search a catalog of running races. \
                 Use list_facets to see what the dataset contains, then search_races \
                 with free text and filters."
                    .to_string(),
            )
    }
}

/// Generate an inline JSON schema for MCP tools
///
/// Unlike rmcp's default `schema_for_type()`, this sets `inline_subschemas = true`
/// so nested types are emitted inline instead of as `$ref` patterns.
pub fn inline_schema_for_type<T: JsonSchema>() -> Arc<JsonObject> {
    let mut settings = SchemaSettings::draft07();
    settings.inline_subschemas = true;

    let schema = settings.into_generator().into_root_schema_for::<T>();
    match try_schema_object(schema) {
        Ok(object) => Arc::new(object),
        Err(e) => {
            tracing::error!("Falling back to an empty tool schema: {}", e);
            Arc::new(JsonObject::default())
        }
    }
}

fn try_schema_object(schema: impl serde::Serialize) -> crate::error::Result<JsonObject> {
    match serde_json::to_value(schema)? {
        serde_json::Value::Object(object) => Ok(object),
        other => Err(anyhow!("schema serialized to non-object: {}", other)),
    }
}
