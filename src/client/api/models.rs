use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// Result of a write, delete or upload: `{ ok, status, ...body }`.
///
/// Object bodies are merged next to `ok`/`status`; anything else ends up under
/// `data`. The transport's `ok`/`status` always win over same-named body
/// fields; those body values stay readable through [`Self::body_ok`] and
/// [`Self::body_status`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub ok: bool,
    pub status: u16,
    pub fields: Map<String, Value>,
    /// Body fields named `ok`/`status`, kept out of the flat shape.
    pub shadowed: Map<String, Value>,
}

impl ResponseEnvelope {
    pub fn new(status: StatusCode, body: Value) -> Self {
        let mut shadowed = Map::new();
        let fields = match body {
            Value::Object(mut map) => {
                for key in ["ok", "status"] {
                    if let Some(value) = map.remove(key) {
                        shadowed.insert(key.to_string(), value);
                    }
                }
                map
            }
            other => {
                let mut map = Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };
        ResponseEnvelope {
            ok: status.is_success(),
            status: status.as_u16(),
            fields,
            shadowed,
        }
    }

    /// The body's own `status` field, e.g. `"approved"` on a leave decision.
    pub fn body_status(&self) -> Option<&Value> {
        self.shadowed.get("status")
    }

    pub fn body_ok(&self) -> Option<&Value> {
        self.shadowed.get("ok")
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn data(&self) -> Option<&Value> {
        self.get("data")
    }

    /// Server-supplied `message`, falling back to `error`.
    pub fn message(&self) -> Option<&str> {
        self.get("message")
            .and_then(Value::as_str)
            .or_else(|| self.get("error").and_then(Value::as_str))
    }

    pub fn into_value(self) -> Value {
        let mut map = Map::new();
        map.insert("ok".to_string(), Value::Bool(self.ok));
        map.insert("status".to_string(), Value::from(self.status));
        map.extend(self.fields);
        Value::Object(map)
    }
}

impl Serialize for ResponseEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 2))?;
        map.serialize_entry("ok", &self.ok)?;
        map.serialize_entry("status", &self.status)?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// A single query value. `Missing` stands for null/undefined and is never sent.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Missing,
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl ParamValue {
    fn render(&self) -> Option<String> {
        match self {
            ParamValue::Missing => None,
            ParamValue::Text(s) if s.is_empty() => None,
            ParamValue::Text(s) => Some(s.clone()),
            ParamValue::Number(n) => Some(n.to_string()),
            ParamValue::Bool(b) => Some(b.to_string()),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

impl From<&String> for ParamValue {
    fn from(v: &String) -> Self {
        ParamValue::Text(v.clone())
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

macro_rules! param_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for ParamValue {
            fn from(v: $t) -> Self {
                ParamValue::Number(serde_json::Number::from(v))
            }
        })*
    };
}

param_from_int!(i32, i64, u32, u64, usize);

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        serde_json::Number::from_f64(v).map_or(ParamValue::Missing, ParamValue::Number)
    }
}

impl From<chrono::NaiveDate> for ParamValue {
    fn from(v: chrono::NaiveDate) -> Self {
        ParamValue::Text(v.format("%Y-%m-%d").to_string())
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(ParamValue::Missing, Into::into)
    }
}

impl From<&Value> for ParamValue {
    fn from(v: &Value) -> Self {
        match v {
            Value::Null => ParamValue::Missing,
            Value::String(s) => ParamValue::Text(s.clone()),
            Value::Number(n) => ParamValue::Number(n.clone()),
            Value::Bool(b) => ParamValue::Bool(*b),
            other => ParamValue::Text(other.to_string()),
        }
    }
}

/// Ordered query parameters. Keys keep insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pairs: Vec<(String, ParamValue)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.push(key, value);
        self
    }

    /// Replaces an existing key in place, otherwise appends.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Builds params from any value that serializes to a JSON object.
    pub fn from_serialize<T: serde::Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        let mut params = QueryParams::new();
        if let Value::Object(map) = serde_json::to_value(value)? {
            for (key, value) in &map {
                params.push(key.clone(), value);
            }
        }
        Ok(params)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.iter().all(|(_, v)| v.render().is_none())
    }

    /// URL-encoded query string without the leading `?`. Missing and empty
    /// values are dropped.
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            if let Some(rendered) = value.render() {
                serializer.append_pair(key, &rendered);
            }
        }
        serializer.finish()
    }

    /// Appends the query string to `path`, respecting any query it already has.
    pub fn apply_to(&self, path: &str) -> String {
        let query = self.to_query_string();
        if query.is_empty() {
            return path.to_string();
        }
        let separator = if path.contains('?') { '&' } else { '?' };
        format!("{}{}{}", path, separator, query)
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (k, v) in iter {
            params.push(k, v);
        }
        params
    }
}

/// Per-call overrides for reads.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Option<Method>,
    pub headers: HeaderMap,
}

impl RequestOptions {
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn header(mut self, name: reqwest::header::HeaderName, value: reqwest::header::HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Picks the message for a failed read: `message`, then `error`, then the raw
/// text body, then a generic status line. Only non-empty strings count.
pub fn error_message(status: StatusCode, body: &Value) -> String {
    let from_field = |key: &str| match body.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    };
    from_field("message")
        .or_else(|| from_field("error"))
        .or_else(|| match body {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        })
        .unwrap_or_else(|| format!("Request failed: {}", status.as_u16()))
}
