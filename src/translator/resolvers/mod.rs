pub mod param_binder;
pub use param_binder::*;

pub mod like_pattern;
pub use like_pattern::*;

pub mod aggregate_extractor;
pub use aggregate_extractor::*;

pub mod evaluator;
pub use evaluator::*;

pub mod join_resolver;
pub use join_resolver::*;

pub mod projection_builder;
pub use projection_builder::*;
