//! Request parameters.
//!
//! A [`ParamMap`] is built fresh for every call. Optional fields are stored
//! as [`ParamValue::Absent`] rather than left out, so the rule "absent fields
//! are neither signed nor sent" is applied in exactly one place
//! ([`ParamMap::present`]) instead of at every call site.

use std::collections::BTreeMap;

/// Value of a single request field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    Int(i64),
    /// The field was not supplied and must not reach the wire.
    Absent,
}

impl ParamValue {
    /// Wire representation, or `None` for [`ParamValue::Absent`].
    pub fn to_wire(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Int(n) => Some(n.to_string()),
            Self::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&String> for ParamValue {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<u32> for ParamValue {
    fn from(n: u32) -> Self {
        Self::Int(i64::from(n))
    }
}

/// Booleans go over the wire as `0`/`1`.
impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        Self::Int(i64::from(b))
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Absent, Into::into)
    }
}

/// Field name → value mapping for one API call.
///
/// Backed by a `BTreeMap`, so iteration is always in byte order of the field
/// names regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamMap(BTreeMap<String, ParamValue>);

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set `name`, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    /// Number of entries, absent ones included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Present fields in wire form, sorted by name.
    pub fn present(&self) -> impl Iterator<Item = (&str, String)> {
        self.0
            .iter()
            .filter_map(|(k, v)| v.to_wire().map(|w| (k.as_str(), w)))
    }

    /// Present fields as an owned, sorted map.
    pub fn into_wire(self) -> BTreeMap<String, String> {
        self.0
            .into_iter()
            .filter_map(|(k, v)| v.to_wire().map(|w| (k, w)))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for ParamMap
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_are_kept_but_not_present() {
        let params = ParamMap::new()
            .with("artist", "Cher")
            .with("lang", None::<&str>)
            .with("autocorrect", true);
        assert_eq!(params.len(), 3);
        assert!(params.get("lang").is_some_and(ParamValue::is_absent));

        let present: Vec<_> = params.present().collect();
        assert_eq!(
            present,
            vec![("artist", "Cher".to_owned()), ("autocorrect", "1".to_owned())]
        );
    }

    #[test]
    fn booleans_and_integers_become_digits() {
        assert_eq!(ParamValue::from(false).to_wire().as_deref(), Some("0"));
        assert_eq!(ParamValue::from(true).to_wire().as_deref(), Some("1"));
        assert_eq!(ParamValue::from(50u32).to_wire().as_deref(), Some("50"));
        assert_eq!(ParamValue::from(Some(7i64)).to_wire().as_deref(), Some("7"));
        assert_eq!(ParamValue::from(None::<u32>).to_wire(), None);
    }

    #[test]
    fn iteration_is_sorted_by_byte_order() {
        let params: ParamMap = [("track", "b"), ("Zed", "c"), ("artist", "a")]
            .into_iter()
            .collect();
        let names: Vec<_> = params.present().map(|(k, _)| k).collect();
        // uppercase sorts before lowercase in byte order
        assert_eq!(names, vec!["Zed", "artist", "track"]);
    }
}
