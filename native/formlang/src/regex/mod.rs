//! Regular expressions as operator trees, and the conversions between
//! them and finite automata.

mod elimination;
mod thompson;
mod tree;

pub use elimination::EliminationOrder;
pub use tree::Regex;
