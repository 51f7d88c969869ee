//! Expression evaluation over a sliding window of tag-keyed metric collections.
//!
//! A query is an [`Expression`] tree. Before evaluation the tree's combined
//! [`LookBack`] decides how much history a [`Window`] retains; evaluation then
//! walks the tree once against an [`EvalContext`] and produces a [`ResultSet`].

pub mod aggregate;
pub mod collection;
pub mod common;
pub mod config;
pub mod error;
pub mod error_consts;
pub mod expression;
pub mod lookback;
pub mod matching;
pub mod ops;
pub mod parser;
pub mod result_set;
pub mod tags;
pub mod value;
pub mod window;

pub use collection::{Collection, CollectionBuilder, MetricGroup, PathMatcher};
pub use error::{ExprError, ExprResult};
pub use expression::{Binding, Bindings, EvalContext, Expression};
pub use lookback::LookBack;
pub use matching::{AggregationClause, MatchClause, TagNameSet};
pub use ops::BinaryOp;
pub use parser::{parse, ParseError};
pub use result_set::{ResultSet, Vector};
pub use tags::{GroupKey, SimplePath, Tags};
pub use value::{Histogram, Number, Value};
pub use window::{Window, WindowView};
