pub mod term_type;
pub use term_type::*;

pub mod term;
pub use term::*;

pub mod var_gen;
pub use var_gen::*;
