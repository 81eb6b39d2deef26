pub mod pipeline;
pub use pipeline::*;

pub mod plan_builder;
pub use plan_builder::*;

pub mod mutation_plan;
pub use mutation_plan::*;
