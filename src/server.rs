//! MCP server exposing symbol search over a loaded corpus.

use crate::config::Config;
use crate::corpus::MemoryCorpus;
use crate::schema::inline_schema_for_type;
use crate::searcher::SymbolSearcher;
use crate::tools::search::{ExplainRequest, SearchRequest, handle_explain, handle_search};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

/// MCP Server for ranked symbol search
#[derive(Clone)]
pub struct SymbolServer {
    /// Shared searcher over the loaded corpus
    searcher: Arc<SymbolSearcher<MemoryCorpus>>,

    /// Result count used when a request omits `limit`
    default_limit: usize,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for SymbolServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolServer")
            .field("searcher", &self.searcher)
            .field("default_limit", &self.default_limit)
            .finish()
    }
}

#[tool_router]
impl SymbolServer {
    /// Create a server over `corpus`, sized and capped by `config`.
    pub fn new(corpus: MemoryCorpus, config: &Config) -> Self {
        let searcher = SymbolSearcher::with_cache_size(corpus, config.cache_size)
            .with_max_limit(config.max_limit);
        Self {
            searcher: Arc::new(searcher),
            default_limit: config.default_limit,
            tool_router: Self::tool_router(),
        }
    }

    /// Get a reference to the shared searcher.
    pub fn searcher(&self) -> &Arc<SymbolSearcher<MemoryCorpus>> {
        &self.searcher
    }

    #[tool(
        description = "Search exported symbols across indexed packages. Accepts a symbol name ('Marshal'), a package-qualified reference ('json.Marshal', 'http.Client.Do'), or several words matched against symbol names and package paths ('http server'). Results are ranked by relevance and package popularity.",
        input_schema = inline_schema_for_type::<SearchRequest>()
    )]
    async fn search_symbols(
        &self,
        Parameters(request): Parameters<SearchRequest>,
    ) -> std::result::Result<String, String> {
        handle_search(&self.searcher, self.default_limit, request)
            .await
            .map_err(|e| e.to_string())
    }

    #[tool(
        description = "Show how a symbol search query is compiled: the detected query shape, the predicate tree, and the equivalent PostgreSQL text-search statement with its parameters.",
        input_schema = inline_schema_for_type::<ExplainRequest>()
    )]
    async fn explain_query(
        &self,
        Parameters(request): Parameters<ExplainRequest>,
    ) -> std::result::Result<String, String> {
        handle_explain(self.default_limit, &request).map_err(|e| e.to_string())
    }
}

#[tool_handler]
impl ServerHandler for SymbolServer {
    fn get_info(&self) -> ServerInfo {
        let mut info = ServerInfo::default();
        info.protocol_version = ProtocolVersion::V_2024_11_05;
        info.capabilities = ServerCapabilities::builder().enable_tools().build();
        info.server_info = Implementation::from_build_env();
        info.instructions = Some(
            "symbol-search: ranked search over exported symbols of indexed packages. \
             Use search_symbols with a symbol name, a package-qualified name, or several words. \
             Use explain_query to see how a query is interpreted."
                .to_string(),
        );
        info
    }
}
