pub mod ast;

pub mod term;
pub use term::{Term, TermType};

pub mod schema;
pub use schema::{Association, SchemaDescriptor, SchemaRegistry, SchemaProvider};

pub mod config;
pub use config::{Config, ConflictStrategy, Durability};

pub mod translator;
pub use translator::{Translator, TranslateError};

pub mod planner;

pub mod connector;
pub use connector::{Repo, StoreRepo, StoreConnector, StoreResponse, MutationSummary, ConnectorError, RepoError};
