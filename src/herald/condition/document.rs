// SPDX-License-Identifier: MIT

//! Condition documents as they arrive over the wire
//!
//! `serde_json::Map` keeps only the last value of a repeated key, but a
//! combinator object such as `{"eq": [1, 2], "eq": [1, 1]}` means two
//! children. `Document` therefore keeps every entry, in document order.

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Number, Value};
use std::fmt;

/// Ordered `(operator, value)` entries of a JSON object
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    entries: Vec<(String, ConditionValue)>,
}

/// Any JSON value found inside a condition document
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionValue {
    /// null, boolean, number or string
    Scalar(Value),
    List(Vec<ConditionValue>),
    Map(Document),
}

impl Document {
    pub fn new(entries: Vec<(String, ConditionValue)>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The first entry, i.e. the root operator of a top-level document
    pub fn first(&self) -> Option<(&str, &ConditionValue)> {
        self.entries.first().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConditionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Collapse into a JSON object. Repeated keys keep the last value.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (key, value) in &self.entries {
            map.insert(key.clone(), value.to_json());
        }
        Value::Object(map)
    }
}

impl ConditionValue {
    pub fn as_map(&self) -> Option<&Document> {
        match self {
            ConditionValue::Map(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ConditionValue]> {
        match self {
            ConditionValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ConditionValue::Scalar(v) => v.clone(),
            ConditionValue::List(items) => {
                Value::Array(items.iter().map(ConditionValue::to_json).collect())
            }
            ConditionValue::Map(doc) => doc.to_json(),
        }
    }
}

impl From<Value> for ConditionValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => {
                ConditionValue::List(items.into_iter().map(ConditionValue::from).collect())
            }
            Value::Object(map) => ConditionValue::Map(Document::from(map)),
            scalar => ConditionValue::Scalar(scalar),
        }
    }
}

impl From<Map<String, Value>> for Document {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            entries: map
                .into_iter()
                .map(|(k, v)| (k, ConditionValue::from(v)))
                .collect(),
        }
    }
}

impl<'de> Deserialize<'de> for ConditionValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ConditionValueVisitor)
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match ConditionValue::deserialize(deserializer)? {
            ConditionValue::Map(doc) => Ok(doc),
            _ => Err(de::Error::custom("condition document must be an object")),
        }
    }
}

struct ConditionValueVisitor;

impl<'de> Visitor<'de> for ConditionValueVisitor {
    type Value = ConditionValue;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E> {
        Ok(ConditionValue::Scalar(Value::Bool(v)))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
        Ok(ConditionValue::Scalar(Value::from(v)))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
        Ok(ConditionValue::Scalar(Value::from(v)))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Number::from_f64(v)
            .map(|n| ConditionValue::Scalar(Value::Number(n)))
            .ok_or_else(|| de::Error::custom("non-finite number"))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
        Ok(ConditionValue::Scalar(Value::String(v.to_owned())))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E> {
        Ok(ConditionValue::Scalar(Value::String(v)))
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(ConditionValue::Scalar(Value::Null))
    }

    fn visit_none<E>(self) -> Result<Self::Value, E> {
        Ok(ConditionValue::Scalar(Value::Null))
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        ConditionValue::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(ConditionValue::List(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, ConditionValue>()? {
            entries.push((key, value));
        }
        Ok(ConditionValue::Map(Document::new(entries)))
    }
}
