//! Job description document as produced by AI generation.
//!
//! The LLM may omit any field or return it in an unexpected shape. Known
//! fields that match the schema are typed; a known field that does not match
//! (KPIs as objects, a numeric level, a flat competency list) is kept verbatim
//! in `extra` under its own key, alongside unknown fields. Reading a document
//! therefore only fails when the top level is not a JSON object, and writing it
//! back reproduces what was read.

use std::fmt;

use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JdDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reports_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsibilities: Option<Responsibilities>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub kpis: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competencies: Option<Competencies>,
    /// Unknown fields, and known fields whose shape did not match, verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<'de> Deserialize<'de> for JdDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;
        Ok(JdDocument {
            job_title: take_typed(&mut fields, "job_title"),
            reports_to: take_typed(&mut fields, "reports_to"),
            department: take_typed(&mut fields, "department"),
            job_family: take_typed(&mut fields, "job_family"),
            level: take_typed(&mut fields, "level"),
            role_summary: take_typed(&mut fields, "role_summary"),
            responsibilities: take_typed(&mut fields, "responsibilities"),
            kpis: take_typed(&mut fields, "kpis"),
            competencies: take_typed(&mut fields, "competencies"),
            extra: fields,
        })
    }
}

/// Moves `key` out of `fields` into its typed form. Null means absent. A value
/// of the wrong shape is put back so it lands in `extra`.
fn take_typed<T>(fields: &mut Map<String, Value>, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let Some(value) = fields.remove(key) else {
        return T::default();
    };
    match Option::<T>::deserialize(&value) {
        Ok(typed) => typed.unwrap_or_default(),
        Err(e) => {
            debug!("Keeping JD field {key} as raw JSON: {e}");
            fields.insert(key.to_string(), value);
            T::default()
        }
    }
}

impl JdDocument {
    /// A top-level text field for display, typed or raw. Blank text is `None`.
    pub fn text(&self, key: &str) -> Option<String> {
        let typed = match key {
            "job_title" => self.job_title.as_deref(),
            "reports_to" => self.reports_to.as_deref(),
            "department" => self.department.as_deref(),
            "job_family" => self.job_family.as_deref(),
            "level" => self.level.as_deref(),
            "role_summary" => self.role_summary.as_deref(),
            _ => None,
        };
        typed
            .map(str::to_string)
            .or_else(|| self.extra.get(key).and_then(scalar_text))
            .filter(|t| !t.trim().is_empty())
    }

    /// KPIs as display lines, including KPIs returned as objects.
    pub fn kpi_lines(&self) -> Vec<String> {
        match self.extra.get("kpis") {
            Some(raw) => value_lines(raw),
            None => self.kpis.clone(),
        }
    }

    /// Non-empty competency groups as (heading, lines).
    pub fn competency_groups(&self) -> Vec<(String, Vec<String>)> {
        if let Some(raw) = self.extra.get("competencies") {
            let groups: Vec<(String, Vec<String>)> = match raw {
                Value::Object(groups) => groups
                    .iter()
                    .map(|(name, items)| (capitalize(name), value_lines(items)))
                    .collect(),
                other => vec![("Competencies".to_string(), value_lines(other))],
            };
            return groups.into_iter().filter(|(_, l)| !l.is_empty()).collect();
        }
        let Some(competencies) = &self.competencies else {
            return Vec::new();
        };
        [
            ("Technical", &competencies.technical),
            ("Behavioral", &competencies.behavioral),
        ]
        .into_iter()
        .filter(|(_, items)| !items.is_empty())
        .map(|(name, items)| (name.to_string(), items.clone()))
        .collect()
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn value_lines(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
        other => scalar_text(other).into_iter().collect(),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Extra keys make the whole value raw, so nothing is dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Competencies {
    #[serde(default, deserialize_with = "null_as_default")]
    pub technical: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub behavioral: Vec<String>,
}

/// One entry in a responsibility bucket.
///
/// Anything that is not a JSON string is carried as-is and never rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Responsibility {
    Sentence(String),
    Other(Value),
}

impl Responsibility {
    pub fn as_sentence(&self) -> Option<&str> {
        match self {
            Responsibility::Sentence(s) => Some(s),
            Responsibility::Other(_) => None,
        }
    }
}

impl fmt::Display for Responsibility {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Responsibility::Sentence(s) => f.write_str(s),
            Responsibility::Other(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for Responsibility {
    fn from(s: &str) -> Self {
        Responsibility::Sentence(s.to_string())
    }
}

/// Responsibility buckets keyed by name, in the order they were received.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Responsibilities {
    buckets: Vec<(String, Vec<Responsibility>)>,
}

impl Responsibilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a bucket. A repeated name replaces the earlier items in place.
    pub fn insert(&mut self, bucket: impl Into<String>, items: Vec<Responsibility>) {
        let bucket = bucket.into();
        match self.buckets.iter_mut().find(|(name, _)| *name == bucket) {
            Some((_, existing)) => *existing = items,
            None => self.buckets.push((bucket, items)),
        }
    }

    pub fn get(&self, bucket: &str) -> Option<&[Responsibility]> {
        self.buckets
            .iter()
            .find(|(name, _)| name == bucket)
            .map(|(_, items)| items.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Responsibility])> {
        self.buckets
            .iter()
            .map(|(name, items)| (name.as_str(), items.as_slice()))
    }

    pub fn bucket_names(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Builds a new set of buckets by mapping every item, keeping names and order.
    pub fn map_items<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&Responsibility) -> Responsibility,
    {
        Self {
            buckets: self
                .iter()
                .map(|(name, items)| (name.to_string(), items.iter().map(&mut f).collect()))
                .collect(),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<Responsibility>)> for Responsibilities {
    fn from_iter<I: IntoIterator<Item = (K, Vec<Responsibility>)>>(iter: I) -> Self {
        let mut out = Responsibilities::new();
        for (bucket, items) in iter {
            out.insert(bucket, items);
        }
        out
    }
}

impl Serialize for Responsibilities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, items) in &self.buckets {
            map.serialize_entry(name, items)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Responsibilities {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BucketsVisitor;

        impl<'de> Visitor<'de> for BucketsVisitor {
            type Value = Responsibilities;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of responsibility buckets")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut out = Responsibilities::new();
                while let Some((name, items)) =
                    access.next_entry::<String, Option<Vec<Responsibility>>>()?
                {
                    // a null bucket is an empty bucket
                    out.insert(name, items.unwrap_or_default());
                }
                Ok(out)
            }
        }

        deserializer.deserialize_map(BucketsVisitor)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
