mod group_key;
mod path;
mod tag_set;

pub use group_key::*;
pub use path::*;
pub use tag_set::*;
