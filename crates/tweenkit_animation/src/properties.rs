//! Named numeric properties animated by a tween

use indexmap::IndexMap;

/// Fractional digits kept when writing interpolated values.
pub const VALUE_PRECISION: usize = 16;

/// Insertion-ordered map of property name to value
///
/// ```rust
/// use tweenkit_animation::Properties;
///
/// let props = Properties::new().with("x", 0.0).with("opacity", 1.0);
/// assert_eq!(props.get("opacity"), Some(1.0));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Properties {
    values: IndexMap<String, f64>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set a property
    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn set(&mut self, key: impl Into<String>, value: f64) {
        self.values.insert(key.into(), value);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Overwrite an existing slot in place, inserting only when absent
    pub(crate) fn write(&mut self, key: &str, value: f64) {
        match self.values.get_mut(key) {
            Some(slot) => *slot = value,
            None => {
                self.values.insert(key.to_string(), value);
            }
        }
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<K: Into<String>, const N: usize> From<[(K, f64); N]> for Properties {
    fn from(entries: [(K, f64); N]) -> Self {
        entries.into_iter().collect()
    }
}

/// Round a value to `VALUE_PRECISION` fractional digits.
///
/// Strips floating noise such as `0.30000000000000004` before values reach
/// consumers. Non-finite values pass through untouched.
pub fn fixed_precision(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", VALUE_PRECISION, value)
        .parse()
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_insertion_order() {
        let props = Properties::new().with("y", 1.0).with("x", 2.0);
        let keys: Vec<_> = props.keys().collect();
        assert_eq!(keys, vec!["y", "x"]);
    }

    #[test]
    fn test_from_array() {
        let props = Properties::from([("x", 1.0), ("y", 2.0)]);
        assert_eq!(props.len(), 2);
        assert_eq!(props.get("y"), Some(2.0));
        assert_eq!(props.get("z"), None);
    }

    #[test]
    fn test_write_overwrites_in_place() {
        let mut props = Properties::from([("a", 1.0), ("b", 2.0)]);
        props.write("a", 5.0);
        assert_eq!(props.iter().collect::<Vec<_>>(), vec![("a", 5.0), ("b", 2.0)]);
    }

    #[test]
    fn test_fixed_precision_strips_noise() {
        assert_eq!(fixed_precision(0.1 + 0.2), 0.3);
        assert_eq!(fixed_precision(100.0), 100.0);
        assert!(fixed_precision(f64::NAN).is_nan());
    }
}
