//! Expression trees and their evaluation.

mod context;
mod functions;
mod node;
mod selector;

pub use context::*;
pub use node::*;
pub use selector::*;

/// Binding strength of operators in source text, lowest first.
pub mod priority {
    pub const LOGICAL_OR: u8 = 1;
    pub const LOGICAL_AND: u8 = 2;
    pub const EQUALITY: u8 = 3;
    pub const COMPARISON: u8 = 4;
    pub const SHIFT: u8 = 5;
    pub const ADDITION: u8 = 6;
    pub const MULTIPLY: u8 = 7;
    pub const UNARY: u8 = 8;
    pub const BRACKETS: u8 = 9;
}

cfg_if::cfg_if! {
    if #[cfg(test)] {
    }
}
