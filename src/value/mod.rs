mod histogram;
mod metric_value;
mod number;

pub use histogram::*;
pub use metric_value::*;
pub use number::*;

cfg_if::cfg_if! {
    if #[cfg(test)] {
    }
}
