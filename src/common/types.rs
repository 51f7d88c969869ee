use chrono::{DateTime, Utc};
use smallvec::SmallVec;

pub type Timestamp = DateTime<Utc>;

/// Inline storage for path segments; most group and metric paths are short.
pub type SegmentVec = SmallVec<[String; 4]>;

/// Implemented by anything that sits on a timeline, e.g. a metric collection.
pub trait Timestamped {
    fn timestamp(&self) -> Timestamp;
}

impl<T: Timestamped + ?Sized> Timestamped for &T {
    fn timestamp(&self) -> Timestamp {
        (**self).timestamp()
    }
}

impl<T: Timestamped + ?Sized> Timestamped for std::sync::Arc<T> {
    fn timestamp(&self) -> Timestamp {
        (**self).timestamp()
    }
}

impl Timestamped for Timestamp {
    fn timestamp(&self) -> Timestamp {
        *self
    }
}
