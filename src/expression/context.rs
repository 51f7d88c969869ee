use super::Expression;
use crate::common::types::Timestamp;
use crate::lookback::LookBack;
use crate::result_set::ResultSet;
use crate::tags::{GroupKey, SimplePath, Tags};
use crate::value::Value;
use crate::window::WindowView;
use ahash::AHashMap;
use std::sync::{Arc, Mutex};

/// A named alias available to expressions as `$name`.
#[derive(Debug, Clone)]
pub enum Binding {
    /// Evaluated on demand, in the context that refers to it.
    Expression(Arc<Expression>),
    /// A fixed result.
    Value(ResultSet),
    /// A group path, usable as the group of a selector: `$name metric`.
    Group(SimplePath),
}

#[derive(Debug, Clone, Default)]
pub struct Bindings {
    map: AHashMap<String, Binding>,
}

impl Bindings {
    pub fn new() -> Self {
        Bindings::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, binding: Binding) -> Option<Binding> {
        self.map.insert(name.into(), binding)
    }

    pub fn with_expression(mut self, name: impl Into<String>, expr: Expression) -> Self {
        self.insert(name, Binding::Expression(Arc::new(expr)));
        self
    }

    pub fn with_value(mut self, name: impl Into<String>, value: ResultSet) -> Self {
        self.insert(name, Binding::Value(value));
        self
    }

    pub fn with_group(mut self, name: impl Into<String>, path: SimplePath) -> Self {
        self.insert(name, Binding::Group(path));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.map.get(name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// History needed by the expression bindings.
    pub fn lookback(&self) -> LookBack {
        LookBack::Empty.and_then_many(self.map.values().filter_map(|b| match b {
            Binding::Expression(expr) => Some(expr.lookback()),
            _ => None,
        }))
    }

    /// History needed to evaluate `expr` against these bindings.
    pub fn lookback_for(&self, expr: &Expression) -> LookBack {
        LookBack::Empty.and_then_many([expr.lookback(), self.lookback()])
    }
}

/// The outcome of evaluating an alert condition for one tag set.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub key: GroupKey,
    pub rule: String,
    pub timestamp: Timestamp,
    /// `None` when the condition could not be decided.
    pub triggered: Option<bool>,
}

pub trait AlertSink: Send + Sync {
    fn accept(&self, alert: Alert);
}

#[derive(Debug, Default)]
pub struct NoopAlertSink;

impl AlertSink for NoopAlertSink {
    fn accept(&self, _alert: Alert) {}
}

/// Keeps every alert it receives.
#[derive(Debug, Default)]
pub struct CollectingAlertSink {
    alerts: Mutex<Vec<Alert>>,
}

impl CollectingAlertSink {
    pub fn new() -> Self {
        CollectingAlertSink::default()
    }

    pub fn take(&self) -> Vec<Alert> {
        match self.alerts.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl AlertSink for CollectingAlertSink {
    fn accept(&self, alert: Alert) {
        match self.alerts.lock() {
            Ok(mut guard) => guard.push(alert),
            Err(poisoned) => poisoned.into_inner().push(alert),
        }
    }
}

/// Bindings currently being resolved, innermost first.
struct ResolveFrame<'a> {
    name: &'a str,
    parent: Option<&'a ResolveFrame<'a>>,
}

impl ResolveFrame<'_> {
    fn contains(&self, name: &str) -> bool {
        self.name == name || self.parent.is_some_and(|p| p.contains(name))
    }
}

/// Everything an expression can see while it is evaluated.
#[derive(Clone, Copy)]
pub struct EvalContext<'a> {
    view: WindowView<'a>,
    bindings: &'a Bindings,
    alerts: &'a dyn AlertSink,
    resolving: Option<&'a ResolveFrame<'a>>,
}

impl<'a> EvalContext<'a> {
    pub fn new(view: WindowView<'a>, bindings: &'a Bindings, alerts: &'a dyn AlertSink) -> Self {
        EvalContext {
            view,
            bindings,
            alerts,
            resolving: None,
        }
    }

    pub fn view(&self) -> WindowView<'a> {
        self.view
    }

    pub fn bindings(&self) -> &'a Bindings {
        self.bindings
    }

    /// The same context, positioned at another view of the window.
    pub fn with_view(&self, view: WindowView<'a>) -> EvalContext<'a> {
        EvalContext { view, ..*self }
    }

    /// Evaluates the binding called `name`. Unknown and self-referencing
    /// bindings yield an empty vector.
    pub fn resolve(&self, name: &str) -> ResultSet {
        if self.resolving.is_some_and(|frame| frame.contains(name)) {
            tracing::warn!(binding = name, "cyclic binding reference");
            return ResultSet::empty_vector();
        }
        match self.bindings.get(name) {
            Some(Binding::Value(value)) => value.clone(),
            Some(Binding::Expression(expr)) => {
                let frame = ResolveFrame {
                    name,
                    parent: self.resolving,
                };
                let ctx = EvalContext {
                    view: self.view,
                    bindings: self.bindings,
                    alerts: self.alerts,
                    resolving: Some(&frame),
                };
                expr.evaluate(&ctx)
            }
            Some(Binding::Group(path)) => {
                tracing::warn!(binding = name, group = %path, "group binding used as a value");
                ResultSet::empty_vector()
            }
            None => {
                tracing::warn!(binding = name, "unresolved binding");
                ResultSet::empty_vector()
            }
        }
    }

    /// The group path bound to `name`, if it is a group binding.
    pub fn group_alias(&self, name: &str) -> Option<&'a SimplePath> {
        match self.bindings.get(name) {
            Some(Binding::Group(path)) => Some(path),
            Some(_) => {
                tracing::warn!(binding = name, "binding is not a group");
                None
            }
            None => {
                tracing::warn!(binding = name, "unresolved binding");
                None
            }
        }
    }

    /// Evaluates `condition` and reports one alert per result element under
    /// the group `name`.
    pub fn raise_alerts(&self, name: &SimplePath, condition: &Expression) {
        let rule = condition.config_string();
        let timestamp = self.view.timestamp();
        let emit = |tags: &Tags, value: &Value| {
            self.alerts.accept(Alert {
                key: GroupKey::new(name.clone(), tags.clone()),
                rule: rule.clone(),
                timestamp,
                triggered: value.as_bool(),
            });
        };
        match condition.evaluate(self) {
            ResultSet::Scalar(value) => emit(&Tags::empty(), &value),
            ResultSet::Vector(vector) => {
                for (tags, value) in vector.iter() {
                    emit(tags, value);
                }
            }
        }
    }
}
