//! View models.

use serde::Serialize;
use serde_json::{Map, Value};

/// Variable bindings handed to a template.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Model {
    values: Map<String, Value>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// A model with a single binding.
    pub fn of(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new().with(key, value)
    }

    /// Add a binding, replacing any previous value for the key.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Build a model from any value serializing to a JSON object.
    pub fn from_serializable<T: Serialize>(value: &T) -> serde_json::Result<Self> {
        match serde_json::to_value(value)? {
            Value::Object(values) => Ok(Self { values }),
            other => Ok(Self::of("value", other)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Copy every binding of `other` that this model does not define.
    pub fn merge_missing(&mut self, other: &Model) {
        for (key, value) in &other.values {
            self.values
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.values.clone())
    }
}

impl From<Map<String, Value>> for Model {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

/// A view name paired with its bindings, rendered at serialization time.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelAndView {
    pub view: String,
    pub model: Model,
}

impl ModelAndView {
    pub fn of(view: impl Into<String>, model: Model) -> Self {
        Self {
            view: view.into(),
            model,
        }
    }

    /// A view rendered with no bindings.
    pub fn view(view: impl Into<String>) -> Self {
        Self::of(view, Model::new())
    }
}
