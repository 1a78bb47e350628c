use super::ParamKind;
use crate::application::errors::HandlerError;

/// A coerced argument value
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Integer(i32),
    Float(f32),
    String(String),
    StringTail(Vec<String>),
}

impl ArgValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ArgValue::Integer(_) => ParamKind::Integer,
            ArgValue::Float(_) => ParamKind::Float,
            ArgValue::String(_) => ParamKind::String,
            ArgValue::StringTail(_) => ParamKind::StringTail,
        }
    }
}

/// Typed arguments handed to a handler, in declaration order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Args {
    values: Vec<ArgValue>,
}

impl Args {
    pub fn new(values: Vec<ArgValue>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ArgValue> {
        self.values.get(index)
    }

    pub fn values(&self) -> &[ArgValue] {
        &self.values
    }

    pub fn int(&self, index: usize) -> Result<i32, HandlerError> {
        match self.values.get(index) {
            Some(ArgValue::Integer(v)) => Ok(*v),
            other => Err(mismatch(index, ParamKind::Integer, other)),
        }
    }

    pub fn float(&self, index: usize) -> Result<f32, HandlerError> {
        match self.values.get(index) {
            Some(ArgValue::Float(v)) => Ok(*v),
            other => Err(mismatch(index, ParamKind::Float, other)),
        }
    }

    pub fn string(&self, index: usize) -> Result<&str, HandlerError> {
        match self.values.get(index) {
            Some(ArgValue::String(v)) => Ok(v.as_str()),
            other => Err(mismatch(index, ParamKind::String, other)),
        }
    }

    pub fn tail(&self, index: usize) -> Result<&[String], HandlerError> {
        match self.values.get(index) {
            Some(ArgValue::StringTail(v)) => Ok(v.as_slice()),
            other => Err(mismatch(index, ParamKind::StringTail, other)),
        }
    }

    /// The tail slot rejoined with single spaces
    pub fn phrase(&self, index: usize) -> Result<String, HandlerError> {
        self.tail(index).map(|tokens| tokens.join(" "))
    }
}

fn mismatch(index: usize, wanted: ParamKind, found: Option<&ArgValue>) -> HandlerError {
    let found = found
        .map(|v| v.kind().as_str())
        .unwrap_or("nothing");
    HandlerError::Internal(format!(
        "argument {} requested as {} but holds {}",
        index, wanted, found
    ))
}
