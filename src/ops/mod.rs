pub mod arithmetic;
mod binary_op;
mod combine;
pub mod predicate;

pub use binary_op::*;
pub use combine::*;

cfg_if::cfg_if! {
    if #[cfg(test)] {
        mod ops_tests;
    }
}
