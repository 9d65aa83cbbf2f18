//! Scalar attribute payloads attached to vertices and edges.

use std::{
    cmp::Ordering,
    collections::BTreeMap,
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

/// A scalar attribute value.
///
/// Floats compare with [`f64::total_cmp`] so every value can key a histogram.
///
/// # Examples
/// ```
/// use synthgraph_core::PropertyValue;
///
/// let small = PropertyValue::Float(0.5);
/// let large = PropertyValue::Float(2.0);
/// assert!(small < large);
/// assert_eq!(PropertyValue::text("tcp").to_string(), "tcp");
/// ```
#[derive(Debug, Clone)]
pub enum PropertyValue {
    /// Signed integer value, e.g. a byte count.
    Int(i64),
    /// Floating-point value, e.g. an inter-arrival time.
    Float(f64),
    /// Text value, e.g. a protocol label.
    Text(Arc<str>),
}

impl PropertyValue {
    /// Creates a text value.
    #[must_use]
    pub fn text(value: &str) -> Self {
        Self::Text(Arc::from(value))
    }

    const fn rank(&self) -> u8 {
        match self {
            Self::Int(_) => 0,
            Self::Float(_) => 1,
            Self::Text(_) => 2,
        }
    }
}

impl PartialEq for PropertyValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PropertyValue {}

impl PartialOrd for PropertyValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PropertyValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Int(left), Self::Int(right)) => left.cmp(right),
            (Self::Float(left), Self::Float(right)) => left.total_cmp(right),
            (Self::Text(left), Self::Text(right)) => left.cmp(right),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Hash for PropertyValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Self::Int(value) => value.hash(state),
            Self::Float(value) => value.to_bits().hash(state),
            Self::Text(value) => value.hash(state),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// Ordered map of property keys to scalar values.
///
/// # Examples
/// ```
/// use synthgraph_core::{Properties, PropertyValue};
///
/// let properties = Properties::new()
///     .with("bytes", PropertyValue::Int(512))
///     .with("proto", PropertyValue::text("udp"));
/// assert_eq!(properties.len(), 2);
/// assert_eq!(properties.get("bytes"), Some(&PropertyValue::Int(512)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Properties(BTreeMap<Arc<str>, PropertyValue>);

impl Properties {
    /// Creates an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the payload with `key` set to `value`.
    #[must_use]
    pub fn with(mut self, key: &str, value: PropertyValue) -> Self {
        self.insert(Arc::from(key), value);
        self
    }

    /// Sets `key` to `value`, returning the previous value.
    pub fn insert(&mut self, key: Arc<str>, value: PropertyValue) -> Option<PropertyValue> {
        self.0.insert(key, value)
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.0.get(key)
    }

    /// Iterates over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&Arc<str>, &PropertyValue)> {
        self.0.iter()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Arc<str>, PropertyValue)> for Properties {
    fn from_iter<T: IntoIterator<Item = (Arc<str>, PropertyValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
