pub mod store_response;
pub use store_response::*;

pub mod store_connector;
pub use store_connector::*;

pub mod repo_error;
pub use repo_error::*;

pub mod repo;
pub use repo::*;
