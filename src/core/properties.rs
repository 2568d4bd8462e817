//! The property bag observed by guards.
//!
//! Owners push live simulation values (velocity components, floor contact,
//! input flags) into the bag every tick. Guards only ever read it.

use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

/// A single property value.
///
/// Serialized externally tagged (`{"float": 4.5}`) so that self-describing
/// and binary encodings both round-trip it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl PropertyValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric view of the value. Integers are widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f32> for PropertyValue {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Mapping from property name to its current value.
///
/// # Example
///
/// ```rust
/// use statebag::core::Properties;
///
/// let mut props = Properties::new();
/// props.insert("velocity_x", 3);
/// props.insert("on_floor", true);
///
/// assert_eq!(props.number("velocity_x"), Some(3.0));
/// assert!(props.flag("on_floor"));
/// assert!(!props.flag("crouch_pressed"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties {
    values: BTreeMap<String, PropertyValue>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a value, returning the previous one.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Option<PropertyValue> {
        self.values.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// True only when the property holds `Bool(true)`. Missing keys and
    /// non-boolean values read as false.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).and_then(PropertyValue::as_bool).unwrap_or(false)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(PropertyValue::as_f64)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(PropertyValue::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, PropertyValue> {
        self.values.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Properties
where
    K: Into<String>,
    V: Into<PropertyValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Properties::new();
        props.extend(iter);
        props
    }
}

impl<K, V> Extend<(K, V)> for Properties
where
    K: Into<String>,
    V: Into<PropertyValue>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl IntoIterator for Properties {
    type Item = (String, PropertyValue);
    type IntoIter = btree_map::IntoIter<String, PropertyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = (&'a String, &'a PropertyValue);
    type IntoIter = btree_map::Iter<'a, String, PropertyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_overwrites_and_returns_previous() {
        let mut props = Properties::new();
        assert_eq!(props.insert("velocity_x", 5), None);
        assert_eq!(
            props.insert("velocity_x", 0),
            Some(PropertyValue::Int(5))
        );
        assert_eq!(props.number("velocity_x"), Some(0.0));
        assert_eq!(props.len(), 1);
    }

    #[test]
    fn flag_is_false_for_missing_and_non_boolean_values() {
        let props: Properties = [("on_floor", PropertyValue::Int(1))].into_iter().collect();
        assert!(!props.flag("on_floor"));
        assert!(!props.flag("on_wall"));
    }

    #[test]
    fn number_widens_integers() {
        let mut props = Properties::new();
        props.insert("velocity_y", -3);
        props.insert("gravity", 9.5);
        props.insert("facing", "left");

        assert_eq!(props.number("velocity_y"), Some(-3.0));
        assert_eq!(props.number("gravity"), Some(9.5));
        assert_eq!(props.number("facing"), None);
        assert_eq!(props.text("facing"), Some("left"));
    }

    #[test]
    fn bag_serializes_as_tagged_object() {
        let mut props = Properties::new();
        props.insert("on_floor", true);
        props.insert("velocity_x", 2);

        let json = serde_json::to_string(&props).unwrap();
        assert_eq!(json, r#"{"on_floor":{"bool":true},"velocity_x":{"int":2}}"#);

        let back: Properties = serde_json::from_str(&json).unwrap();
        assert_eq!(back, props);
    }

    #[test]
    fn extend_applies_every_entry() {
        let mut props = Properties::new();
        props.extend([("a", 1), ("b", 2)]);
        assert!(props.contains("a"));
        assert!(props.contains("b"));
        assert_eq!(props.iter().count(), 2);
    }
}
