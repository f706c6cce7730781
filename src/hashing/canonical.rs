//! Canonical textual form of structured values and its digest.
//!
//! A [Value] is serialized as compact JSON with the keys of every mapping sorted, then the UTF-8 bytes
//! are hashed with SHA-1. The digest is rendered as 40 lowercase hexadecimal characters.
//! Two values with the same logical content get the same digest whatever the insertion order
//! of their mappings, across runs and processes.

use std::fmt::Write;

use sha1::{Digest, Sha1};

use crate::error::GeowlError;

/// length of a rendered digest (160 bits in hexadecimal)
pub const DIGEST_LEN: usize = 40;

/// The structured values we know how to canonicalize.
///
/// Mappings keep entries in insertion order, sorting happens only at serialization.
/// As a `Value` is an owned tree a cyclic structure cannot be built.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Seq(Vec<Value>),
    Map(Vec<(String, Value)>),
}

impl Value {
    /// builds a mapping from (key, value) couples, in the order given
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// builds a sequence
    pub fn seq<V, I>(items: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        Value::Seq(items.into_iter().map(|v| v.into()).collect())
    }

    /// returns the canonical text: compact JSON, keys sorted at every level.
    pub fn to_canonical_string(&self) -> Result<String, GeowlError> {
        let mut out = String::new();
        self.write_canonical(&mut out)?;
        Ok(out)
    }

    fn write_canonical(&self, out: &mut String) -> Result<(), GeowlError> {
        match self {
            Value::Int(i) => {
                write!(out, "{}", i).map_err(|e| GeowlError::serialization(e.to_string()))?;
            }
            Value::Float(f) => {
                // serde_json refuses NaN and infinities
                let num = serde_json::Number::from_f64(*f)
                    .ok_or_else(|| GeowlError::serialization(format!("float {} has no canonical form", f)))?;
                out.push_str(&num.to_string());
            }
            Value::Str(s) => {
                let quoted = serde_json::to_string(s).map_err(|e| GeowlError::serialization(e.to_string()))?;
                out.push_str(&quoted);
            }
            Value::Seq(items) => {
                out.push('[');
                for (rank, item) in items.iter().enumerate() {
                    if rank > 0 {
                        out.push(',');
                    }
                    item.write_canonical(out)?;
                }
                out.push(']');
            }
            Value::Map(entries) => {
                let mut sorted: Vec<&(String, Value)> = entries.iter().collect();
                sorted.sort_by(|a, b| a.0.cmp(&b.0));
                if let Some(w) = sorted.windows(2).find(|w| w[0].0 == w[1].0) {
                    return Err(GeowlError::serialization(format!("duplicate key {:?} in mapping", w[0].0)));
                }
                out.push('{');
                for (rank, (key, value)) in sorted.into_iter().enumerate() {
                    if rank > 0 {
                        out.push(',');
                    }
                    let quoted = serde_json::to_string(key).map_err(|e| GeowlError::serialization(e.to_string()))?;
                    out.push_str(&quoted);
                    out.push(':');
                    value.write_canonical(out)?;
                }
                out.push('}');
            }
        }
        Ok(())
    }
} // end of impl Value

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v as i64)
    }
}

/// counts and indexes, assumed to fit in an i64
impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl<T> From<Vec<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Vec<T>) -> Self {
        Value::seq(v)
    }
}

/// Hashes the canonical text of value with SHA-1, returns the 40 hexadecimal characters digest.
pub fn canonical_hash(value: &Value) -> Result<String, GeowlError> {
    let text = value.to_canonical_string()?;
    log::trace!("canonical_hash of {}", text);
    Ok(hex::encode(Sha1::digest(text.as_bytes())))
} // end of canonical_hash

//=====================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn ab(b: Vec<i64>) -> (Value, Value) {
        let first = Value::map(vec![("A", Value::seq(vec![1i64, 2])), ("B", Value::seq(b.clone()))]);
        let second = Value::map(vec![("B", Value::seq(b)), ("A", Value::seq(vec![1i64, 2]))]);
        (first, second)
    }

    #[test]
    fn same_map_different_order() {
        log_init_test();
        let (v1, v2) = ab(vec![3, 4]);
        assert_eq!(canonical_hash(&v1).unwrap(), canonical_hash(&v2).unwrap());
    }

    #[test]
    fn different_maps() {
        log_init_test();
        let (v1, _) = ab(vec![3, 4]);
        let (v2, _) = ab(vec![3, 5]);
        assert_ne!(canonical_hash(&v1).unwrap(), canonical_hash(&v2).unwrap());
    }

    #[test]
    fn sequence_order_matters() {
        log_init_test();
        let v1 = Value::seq(vec![1i64, 2]);
        let v2 = Value::seq(vec![2i64, 1]);
        assert_ne!(canonical_hash(&v1).unwrap(), canonical_hash(&v2).unwrap());
    }

    #[test]
    fn consistency_non_ascii() {
        log_init_test();
        let v1 = Value::map(vec![("greeting", "π")]);
        let v2 = Value::map(vec![("greeting", "π")]);
        assert_eq!(v1.to_canonical_string().unwrap(), "{\"greeting\":\"π\"}");
        assert_eq!(canonical_hash(&v1).unwrap(), canonical_hash(&v2).unwrap());
    }

    #[test]
    fn output_length() {
        log_init_test();
        let v = Value::map(vec![("A", 123i64)]);
        let h = canonical_hash(&v).unwrap();
        assert_eq!(h.len(), DIGEST_LEN);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn known_digest() {
        log_init_test();
        // sha1 of the text {"deg":2}
        let v = Value::map(vec![("deg", 2usize)]);
        assert_eq!(v.to_canonical_string().unwrap(), "{\"deg\":2}");
        let expected = hex::encode(Sha1::digest(b"{\"deg\":2}"));
        assert_eq!(canonical_hash(&v).unwrap(), expected);
    }

    #[test]
    fn nested_keys_sorted() {
        log_init_test();
        let inner = Value::map(vec![("z", 1.5f64), ("a", 1.0f64)]);
        let v = Value::map(vec![("y", inner), ("b", Value::seq(Vec::<Value>::new()))]);
        assert_eq!(v.to_canonical_string().unwrap(), "{\"b\":[],\"y\":{\"a\":1.0,\"z\":1.5}}");
    }

    #[test]
    fn int_and_float_differ() {
        log_init_test();
        let i = Value::map(vec![("x", 1i64)]);
        let f = Value::map(vec![("x", 1.0f64)]);
        assert_ne!(canonical_hash(&i).unwrap(), canonical_hash(&f).unwrap());
    }

    #[test]
    fn nan_rejected() {
        log_init_test();
        let v = Value::seq(vec![1.0f64, f64::NAN]);
        match canonical_hash(&v) {
            Err(GeowlError::Serialization(_)) => {}
            other => panic!("expected serialization error, got {:?}", other),
        }
        assert!(canonical_hash(&Value::Float(f64::INFINITY)).is_err());
    }

    #[test]
    fn duplicate_key_rejected() {
        log_init_test();
        let v = Value::map(vec![("k", 1i64), ("k", 2i64)]);
        assert!(matches!(v.to_canonical_string(), Err(GeowlError::Serialization(_))));
    }

    #[test]
    fn strings_escaped() {
        log_init_test();
        let v = Value::from("a\"b\\c\n");
        assert_eq!(v.to_canonical_string().unwrap(), "\"a\\\"b\\\\c\\n\"");
    }
} // end of mod tests
