use super::ForwardCursor;
use crate::common::types::Timestamped;
use crate::common::format_duration;
use crate::error::{ExprError, ExprResult};
use crate::error_consts;
use chrono::Duration;
use std::fmt;

/// How much history an expression needs, expressed over a newest-first
/// sequence of timestamped items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LookBack {
    /// Needs nothing beyond the current item.
    #[default]
    Empty,
    /// Up to `n` items.
    ScrapeCount(usize),
    /// The first item, then every item until one at or before `first - d`,
    /// inclusive.
    Interval(Duration),
    /// `head`, followed by `next` on whatever `head` left behind.
    AndThen(Box<LookBack>, Box<LookBack>),
    /// `head`, followed by each child on its own copy of the remainder.
    AndThenMany(Box<LookBack>, Vec<LookBack>),
}

impl LookBack {
    pub fn scrape_count(n: i64) -> ExprResult<LookBack> {
        usize::try_from(n)
            .map(LookBack::ScrapeCount)
            .map_err(|_| ExprError::InvalidLookBack(error_consts::NEGATIVE_SCRAPE_COUNT))
    }

    pub fn interval(d: Duration) -> ExprResult<LookBack> {
        if d < Duration::zero() {
            return Err(ExprError::InvalidLookBack(error_consts::NEGATIVE_INTERVAL));
        }
        Ok(LookBack::Interval(d))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, LookBack::Empty)
    }

    pub fn and_then(self, next: LookBack) -> LookBack {
        match (self, next) {
            (LookBack::Empty, next) => next,
            (head, LookBack::Empty) => head,
            (head, next) => LookBack::AndThen(Box::new(head), Box::new(next)),
        }
    }

    pub fn and_then_many<I>(self, children: I) -> LookBack
    where
        I: IntoIterator<Item = LookBack>,
    {
        let mut children: Vec<LookBack> = children.into_iter().filter(|c| !c.is_empty()).collect();
        match children.len() {
            0 => self,
            1 => self.and_then(children.remove(0)),
            _ => LookBack::AndThenMany(Box::new(self), children),
        }
    }

    /// The prefix of `items` this policy selects.
    pub fn filter<'a, T: Timestamped>(&self, items: &'a [T]) -> &'a [T] {
        let mut cursor = ForwardCursor::new(items);
        self.advance(&mut cursor);
        &items[..items.len() - cursor.remaining()]
    }

    fn advance<T: Timestamped>(&self, cursor: &mut ForwardCursor<'_, T>) {
        match self {
            LookBack::Empty => {}
            LookBack::ScrapeCount(n) => {
                for _ in cursor.by_ref().take(*n) {}
            }
            LookBack::Interval(d) => {
                let Some(first) = cursor.next() else {
                    return;
                };
                let boundary = first.timestamp() - *d;
                for item in cursor.by_ref() {
                    if item.timestamp() <= boundary {
                        break;
                    }
                }
            }
            LookBack::AndThen(head, next) => {
                head.advance(cursor);
                if cursor.has_next() {
                    next.advance(cursor);
                }
            }
            LookBack::AndThenMany(head, children) => {
                head.advance(cursor);
                let start = *cursor;
                for child in children.iter() {
                    let mut fork = start;
                    child.advance(&mut fork);
                    if fork.remaining() < cursor.remaining() {
                        *cursor = fork;
                    }
                }
            }
        }
    }

    /// Rough span of history this policy covers, for sizing.
    pub fn hint_duration(&self) -> Duration {
        match self {
            LookBack::Empty | LookBack::ScrapeCount(_) => Duration::zero(),
            LookBack::Interval(d) => *d,
            LookBack::AndThen(head, next) => head.hint_duration() + next.hint_duration(),
            LookBack::AndThenMany(head, children) => {
                let widest = children
                    .iter()
                    .map(LookBack::hint_duration)
                    .max()
                    .unwrap_or_else(Duration::zero);
                head.hint_duration() + widest
            }
        }
    }
}

impl fmt::Display for LookBack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookBack::Empty => write!(f, "empty"),
            LookBack::ScrapeCount(n) => write!(f, "scrapes({})", n),
            LookBack::Interval(d) => write!(f, "interval({})", format_duration(*d)),
            LookBack::AndThen(head, next) => write!(f, "{} then {}", head, next),
            LookBack::AndThenMany(head, children) => {
                write!(f, "{} then [", head)?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, "]")
            }
        }
    }
}
