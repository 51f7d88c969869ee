mod metric_collection;
mod path_matcher;

pub use metric_collection::*;
pub use path_matcher::*;
