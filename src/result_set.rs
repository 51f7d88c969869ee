use crate::tags::Tags;
use crate::value::Value;
use ahash::AHashMap;
use std::fmt;

/// Tag-keyed values with unique keys, iterated in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Vector {
    entries: Vec<(Tags, Value)>,
    index: AHashMap<Tags, usize>,
}

impl Vector {
    pub fn new() -> Self {
        Vector::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Vector {
            entries: Vec::with_capacity(capacity),
            index: AHashMap::with_capacity(capacity),
        }
    }

    /// Adds an entry. Returns false, leaving the vector unchanged, if `tags` is
    /// already present.
    pub fn insert(&mut self, tags: Tags, value: Value) -> bool {
        if self.index.contains_key(&tags) {
            return false;
        }
        self.index.insert(tags.clone(), self.entries.len());
        self.entries.push((tags, value));
        true
    }

    pub fn get(&self, tags: &Tags) -> Option<&Value> {
        self.index.get(tags).map(|idx| &self.entries[*idx].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Tags, &Value)> {
        self.entries.iter().map(|(t, v)| (t, v))
    }

    pub fn entries(&self) -> &[(Tags, Value)] {
        &self.entries
    }

    pub fn tags(&self) -> impl Iterator<Item = &Tags> {
        self.entries.iter().map(|(t, _)| t)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn into_entries(self) -> Vec<(Tags, Value)> {
        self.entries
    }
}

/// Later duplicates of a key are discarded.
impl FromIterator<(Tags, Value)> for Vector {
    fn from_iter<I: IntoIterator<Item = (Tags, Value)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut vector = Vector::with_capacity(iter.size_hint().0);
        for (tags, value) in iter {
            if !vector.insert(tags, value) {
                tracing::trace!("dropping duplicate vector key");
            }
        }
        vector
    }
}

impl PartialEq for Vector {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(t, v)| other.get(t) == Some(v))
    }
}

/// The result of evaluating an expression: either a single untagged value or
/// one value per tag set.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultSet {
    Scalar(Value),
    Vector(Vector),
}

impl ResultSet {
    pub fn scalar(value: impl Into<Value>) -> Self {
        ResultSet::Scalar(value.into())
    }

    pub fn empty_vector() -> Self {
        ResultSet::Vector(Vector::new())
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, ResultSet::Scalar(_))
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, ResultSet::Vector(_))
    }

    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            ResultSet::Scalar(v) => Some(v),
            ResultSet::Vector(_) => None,
        }
    }

    pub fn as_vector(&self) -> Option<&Vector> {
        match self {
            ResultSet::Vector(v) => Some(v),
            ResultSet::Scalar(_) => None,
        }
    }

    /// Number of values held; a scalar counts as one.
    pub fn len(&self) -> usize {
        match self {
            ResultSet::Scalar(_) => 1,
            ResultSet::Vector(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ResultSet::Scalar(v) => v.is_empty(),
            ResultSet::Vector(v) => v.is_empty(),
        }
    }

    /// Applies `f` to every value. A scalar for which `f` yields nothing
    /// becomes `Scalar(Empty)`; such vector elements are dropped.
    pub fn map_values<F>(&self, mut f: F) -> ResultSet
    where
        F: FnMut(&Value) -> Option<Value>,
    {
        match self {
            ResultSet::Scalar(v) => ResultSet::Scalar(f(v).unwrap_or_default()),
            ResultSet::Vector(vector) => ResultSet::Vector(
                vector
                    .iter()
                    .filter_map(|(t, v)| f(v).map(|r| (t.clone(), r)))
                    .collect(),
            ),
        }
    }

    /// An empty result of the same shape: `Scalar(Empty)` or an empty vector.
    pub fn empty_like(&self) -> ResultSet {
        match self {
            ResultSet::Scalar(_) => ResultSet::Scalar(Value::Empty),
            ResultSet::Vector(_) => ResultSet::empty_vector(),
        }
    }
}

impl From<Value> for ResultSet {
    fn from(value: Value) -> Self {
        ResultSet::Scalar(value)
    }
}

impl From<Vector> for ResultSet {
    fn from(value: Vector) -> Self {
        ResultSet::Vector(value)
    }
}

impl fmt::Display for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultSet::Scalar(v) => write!(f, "{}", v),
            ResultSet::Vector(vector) => {
                write!(f, "[")?;
                for (i, (t, v)) in vector.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", t, v)?;
                }
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(host: &str) -> Tags {
        Tags::new([("host", host)]).unwrap()
    }

    #[test]
    fn test_vector_keeps_first_duplicate() {
        let vector: Vector = vec![
            (tags("a"), Value::Integer(1)),
            (tags("b"), Value::Integer(2)),
            (tags("a"), Value::Integer(3)),
        ]
        .into_iter()
        .collect();
        assert_eq!(vector.len(), 2);
        assert_eq!(vector.get(&tags("a")), Some(&Value::Integer(1)));
        let order: Vec<_> = vector.tags().cloned().collect();
        assert_eq!(order, vec![tags("a"), tags("b")]);
    }

    #[test]
    fn test_vector_equality_ignores_order() {
        let x: Vector = vec![(tags("a"), Value::Integer(1)), (tags("b"), Value::Integer(2))]
            .into_iter()
            .collect();
        let y: Vector = vec![(tags("b"), Value::Integer(2)), (tags("a"), Value::Integer(1))]
            .into_iter()
            .collect();
        assert_eq!(x, y);
    }

    #[test]
    fn test_shape_predicates() {
        let scalar = ResultSet::scalar(3);
        assert!(scalar.is_scalar());
        assert!(!scalar.is_vector());
        assert_eq!(scalar.len(), 1);

        let vector = ResultSet::empty_vector();
        assert!(vector.is_vector());
        assert!(vector.is_empty());
        assert_eq!(scalar.empty_like(), ResultSet::Scalar(Value::Empty));
    }

    #[test]
    fn test_map_values() {
        let vector: Vector = vec![(tags("a"), Value::Integer(1)), (tags("b"), Value::from("x"))]
            .into_iter()
            .collect();
        let doubled = ResultSet::Vector(vector).map_values(|v| match v {
            Value::Integer(i) => Some(Value::Integer(i * 2)),
            _ => None,
        });
        let expected: Vector = vec![(tags("a"), Value::Integer(2))].into_iter().collect();
        assert_eq!(doubled, ResultSet::Vector(expected));

        assert_eq!(
            ResultSet::scalar("x").map_values(|_| None),
            ResultSet::Scalar(Value::Empty)
        );
    }
}
