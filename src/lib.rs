pub mod config;
pub mod corpus;
pub mod error;
pub mod schema;
pub mod search;
pub mod searcher;
pub mod server;
pub mod tools;
pub mod tracing;
pub mod types;

pub use config::Config;
pub use corpus::{CandidateRow, Corpus, MemoryCorpus, Snapshot};
pub use error::{CorpusError, Result, SearchError};
pub use search::{QueryDescription, Strategy, compile, compile_as};
pub use searcher::SymbolSearcher;
pub use server::SymbolServer;
pub use types::{BuildContext, Package, SearchResult, Symbol, SymbolKind};
