pub mod literal;
pub use literal::*;

pub mod operators;
pub use operators::*;

pub mod expr;
pub use expr::*;

pub mod source;
pub use source::*;

pub mod join;
pub use join::*;

pub mod order_by;
pub use order_by::*;

pub mod query;
pub use query::*;
