mod history;
mod view;

pub use history::*;
pub use view::*;

cfg_if::cfg_if! {
    if #[cfg(test)] {
        mod window_tests;
    }
}
