mod cursor;
mod policy;

pub use cursor::*;
pub use policy::*;

cfg_if::cfg_if! {
    if #[cfg(test)] {
    }
}
