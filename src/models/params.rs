//! Typed parameter trees handed to model factories.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::ModelError;
use crate::geom::RotationMatrix;

/// A single configuration value of a model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Boolean(bool),
    Number(f64),
    Text(String),
    List(Vec<ParamValue>),
}

impl ParamValue {
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        if let Self::Number(v) = self {
            Some(*v)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let Self::Text(v) = self {
            Some(v)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[ParamValue]> {
        if let Self::List(v) = self {
            Some(v)
        } else {
            None
        }
    }

    fn as_numbers(&self) -> Option<Vec<f64>> {
        self.as_list()?.iter().map(Self::as_number).collect()
    }

    fn as_triple(&self) -> Option<[f64; 3]> {
        let values = self.as_numbers()?;
        <[f64; 3]>::try_from(values).ok()
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<[f64; 3]> for ParamValue {
    fn from(values: [f64; 3]) -> Self {
        Self::List(values.into_iter().map(Self::Number).collect())
    }
}

impl From<RotationMatrix> for ParamValue {
    fn from(matrix: RotationMatrix) -> Self {
        Self::List(matrix.into_iter().map(Self::from).collect())
    }
}

/// Named parameters of one model instance, looked up without case sensitivity.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct ModelParams(BTreeMap<String, ParamValue>);

impl ModelParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Looks up a key, falling back to a case-insensitive match.
    #[must_use]
    pub fn get_normalized(&self, key: &str) -> Option<&ParamValue> {
        if let Some(value) = self.0.get(key) {
            return Some(value);
        }
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get_normalized(key).is_some()
    }

    pub fn number_or(&self, key: &str, default: f64) -> Result<f64, ModelError> {
        match self.get_normalized(key) {
            None => Ok(default),
            Some(value) => value.as_number().ok_or_else(|| wrong_type(key, "a number")),
        }
    }

    pub fn number(&self, key: &str) -> Result<f64, ModelError> {
        self.required(key)?
            .as_number()
            .ok_or_else(|| wrong_type(key, "a number"))
    }

    pub fn text_or(&self, key: &str, default: &str) -> Result<String, ModelError> {
        match self.get_normalized(key) {
            None => Ok(default.to_owned()),
            Some(value) => value
                .as_text()
                .map(str::to_owned)
                .ok_or_else(|| wrong_type(key, "a string")),
        }
    }

    pub fn numbers(&self, key: &str) -> Result<Vec<f64>, ModelError> {
        self.required(key)?
            .as_numbers()
            .ok_or_else(|| wrong_type(key, "a list of numbers"))
    }

    /// Non-negative integer list, e.g. composition indices.
    pub fn indices(&self, key: &str) -> Result<Vec<usize>, ModelError> {
        self.numbers(key)?
            .into_iter()
            .map(|v| {
                if v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64 {
                    Ok(v as usize)
                } else {
                    Err(wrong_type(key, "a list of non-negative integers"))
                }
            })
            .collect()
    }

    pub fn triples(&self, key: &str) -> Result<Vec<[f64; 3]>, ModelError> {
        let list = self
            .required(key)?
            .as_list()
            .ok_or_else(|| wrong_type(key, "a list of 3-element lists"))?;
        list.iter()
            .map(|item| item.as_triple().ok_or_else(|| wrong_type(key, "a list of 3-element lists")))
            .collect()
    }

    pub fn matrices(&self, key: &str) -> Result<Vec<RotationMatrix>, ModelError> {
        let expected = "a list of 3x3 matrices";
        let list = self
            .required(key)?
            .as_list()
            .ok_or_else(|| wrong_type(key, expected))?;
        list.iter()
            .map(|item| {
                let rows = item.as_list().ok_or_else(|| wrong_type(key, expected))?;
                let rows: Vec<[f64; 3]> = rows
                    .iter()
                    .map(|row| row.as_triple().ok_or_else(|| wrong_type(key, expected)))
                    .collect::<Result<_, _>>()?;
                <RotationMatrix>::try_from(rows).map_err(|_| wrong_type(key, expected))
            })
            .collect()
    }

    fn required(&self, key: &str) -> Result<&ParamValue, ModelError> {
        self.get_normalized(key)
            .ok_or_else(|| ModelError::MissingParameter(key.to_owned()))
    }
}

fn wrong_type(key: &str, expected: &'static str) -> ModelError {
    ModelError::WrongType {
        name: key.to_owned(),
        expected,
    }
}
