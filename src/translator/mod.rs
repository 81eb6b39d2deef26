pub mod translate_error;
pub use translate_error::*;

pub mod record_context;
pub use record_context::*;

pub mod resolvers;
pub use resolvers::*;

pub mod engine;
pub use engine::*;

#[cfg(test)]
mod _tests;
