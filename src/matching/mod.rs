mod aggregation_clause;
mod match_clause;
mod tag_names;

pub use aggregation_clause::*;
pub use match_clause::*;
pub use tag_names::*;

cfg_if::cfg_if! {
    if #[cfg(test)] {
    }
}
