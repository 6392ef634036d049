//! Signature descriptors: the name → value map that analyses produce
//! and comparisons consume.
//!
//! Keys are always stored in canonical spelling. Construction (including
//! deserialization) runs every incoming name through
//! [`canonical_name`](crate::normalize::canonical_name), and every read
//! does the same, so legacy descriptors compare without special cases.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::normalize::{CanonicalKey, canonical_name};
use crate::types::DimensionsMm;

/// One descriptor entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    /// Counts.
    Int(i64),
    /// Measurements and scores.
    Float(f64),
    /// Inked area size.
    Dimensions(DimensionsMm),
    /// Categorical labels.
    Text(String),
}

impl FeatureValue {
    /// Numeric view of `Int` and `Float` values.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Dimensions(_) | Self::Text(_) => None,
        }
    }

    /// Label view of `Text` values.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<u32> for FeatureValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<DimensionsMm> for FeatureValue {
    fn from(value: DimensionsMm) -> Self {
        Self::Dimensions(value)
    }
}

impl From<&str> for FeatureValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Canonical-name → value map describing one signature.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureDescriptor {
    values: BTreeMap<String, FeatureValue>,
}

impl SignatureDescriptor {
    /// Build a descriptor from arbitrary spellings.
    ///
    /// When an alias and the canonical spelling of the same feature are
    /// both present, the canonical entry wins.
    #[must_use]
    pub fn from_entries<K: AsRef<str>>(entries: impl IntoIterator<Item = (K, FeatureValue)>) -> Self {
        let mut values = BTreeMap::new();
        let mut canonical_seen = Vec::new();
        for (name, value) in entries {
            let name = name.as_ref();
            let canonical = canonical_name(name);
            let is_canonical = canonical == name;
            if !is_canonical && canonical_seen.iter().any(|s: &String| s == canonical) {
                continue;
            }
            if is_canonical {
                canonical_seen.push(canonical.to_string());
            }
            values.insert(canonical.to_string(), value);
        }
        Self { values }
    }

    /// Entry for any known spelling of a feature.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.values.get(canonical_name(name))
    }

    /// Entry for a canonical key.
    #[must_use]
    pub fn value(&self, key: CanonicalKey) -> Option<&FeatureValue> {
        self.values.get(key.as_str())
    }

    /// Numeric entry for a canonical key.
    #[must_use]
    pub fn number(&self, key: CanonicalKey) -> Option<f64> {
        self.value(key).and_then(FeatureValue::as_f64)
    }

    /// Label entry for a canonical key.
    #[must_use]
    pub fn text(&self, key: CanonicalKey) -> Option<&str> {
        self.value(key).and_then(FeatureValue::as_text)
    }

    /// Returns `true` if any spelling of `name` is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the descriptor has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entries in canonical-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// A copy without the entry for any spelling of `name`.
    #[must_use]
    pub fn without(&self, name: &str) -> Self {
        let mut values = self.values.clone();
        values.remove(canonical_name(name));
        Self { values }
    }

    /// The entries plus the primary legacy spelling of every known key,
    /// for renderers that still read the old names.
    #[must_use]
    pub fn with_legacy_aliases(&self) -> BTreeMap<String, FeatureValue> {
        let mut out = self.values.clone();
        for (name, value) in &self.values {
            if let Some(key) = CanonicalKey::from_name(name) {
                out.entry(key.legacy_name().to_string())
                    .or_insert_with(|| value.clone());
            }
        }
        out
    }
}

impl Serialize for SignatureDescriptor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SignatureDescriptor {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, FeatureValue>::deserialize(deserializer)?;
        Ok(Self::from_entries(raw))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn legacy_names_are_canonicalized() {
        let d = SignatureDescriptor::from_entries([
            ("PressureMean", FeatureValue::from(72.0)),
            ("Curvature", FeatureValue::from(101.5)),
            ("Style", FeatureValue::from("Corsivo")),
        ]);
        assert_eq!(d.number(CanonicalKey::PressureMean), Some(72.0));
        assert_eq!(d.number(CanonicalKey::AvgCurvature), Some(101.5));
        assert_eq!(d.get("pressure_mean"), Some(&FeatureValue::Float(72.0)));
        assert_eq!(d.text(CanonicalKey::WritingStyle), Some("Corsivo"));
        assert!(d.iter().all(|(k, _)| CanonicalKey::from_name(k).is_some_and(|c| c.as_str() == k)));
    }

    #[test]
    fn canonical_spelling_wins_over_alias() {
        let d = SignatureDescriptor::from_entries([
            ("avgCurvature", FeatureValue::from(10.0)),
            ("Curvature", FeatureValue::from(99.0)),
        ]);
        assert_eq!(d.len(), 1);
        assert_eq!(d.number(CanonicalKey::AvgCurvature), Some(10.0));
    }

    #[test]
    fn legacy_aliases_are_back_filled() {
        let d = SignatureDescriptor::from_entries([
            ("baselineStdMm", FeatureValue::from(1.25)),
            ("letterConnections", FeatureValue::from(4_u32)),
        ]);
        let legacy = d.with_legacy_aliases();
        assert_eq!(legacy.get("BaselineStd"), Some(&FeatureValue::Float(1.25)));
        assert_eq!(legacy.get("LetterConnections"), Some(&FeatureValue::Int(4)));
        assert_eq!(legacy.get("baselineStdMm"), Some(&FeatureValue::Float(1.25)));
    }

    #[test]
    fn without_removes_any_spelling() {
        let d = SignatureDescriptor::from_entries([("avgCurvature", FeatureValue::from(10.0))]);
        assert!(d.without("AvgCurvature").is_empty());
    }

    #[test]
    fn json_shape() {
        let d = SignatureDescriptor::from_entries([
            ("connectedComponents", FeatureValue::from(3_u32)),
            ("velocity", FeatureValue::from(2.5)),
            (
                "dimensions",
                FeatureValue::from(DimensionsMm {
                    width: 80.04,
                    height: 20.06,
                }),
            ),
            ("readability", FeatureValue::from("High")),
        ]);
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["connectedComponents"], serde_json::json!(3));
        assert_eq!(json["velocity"], serde_json::json!(2.5));
        assert_eq!(json["dimensions"], serde_json::json!({"width": 80.0, "height": 20.1}));
        assert_eq!(json["readability"], serde_json::json!("High"));
    }

    #[test]
    fn deserialization_normalizes_keys() {
        let d: SignatureDescriptor =
            serde_json::from_str(r#"{"PressureMean": 80, "Dimensions": {"width": 10.0, "height": 5.0}}"#)
                .unwrap();
        assert_eq!(d.number(CanonicalKey::PressureMean), Some(80.0));
        assert!(matches!(
            d.value(CanonicalKey::Dimensions),
            Some(FeatureValue::Dimensions(_))
        ));
    }
}
