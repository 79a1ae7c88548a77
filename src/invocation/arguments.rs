//! Dynamically-typed argument lists.
//!
//! Arguments travel through the advice chain as JSON values so that advices
//! can inspect and rewrite them without knowing the operation's Rust types.
//! The target side decodes them back into concrete types.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{InterceptError, Result};

/// Encode a value for transport through the chain.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Decode a chain value back into a concrete type.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    Ok(serde_json::from_value(value)?)
}

/// Ordered arguments of one invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: Vec<Value>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Append an encoded argument.
    pub fn push<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.values.push(encode(value)?);
        Ok(())
    }

    /// Builder-style [`push`](Self::push).
    pub fn with<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self> {
        self.push(value)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Replace the argument at `index`.
    pub fn set(&mut self, index: usize, value: Value) -> Result<()> {
        let slot = self
            .values
            .get_mut(index)
            .ok_or(InterceptError::MissingArgument { index })?;
        *slot = value;
        Ok(())
    }

    /// Decode the argument at `index` into `T`.
    pub fn decode<T: DeserializeOwned>(&self, index: usize) -> Result<T> {
        let value = self
            .values
            .get(index)
            .ok_or(InterceptError::MissingArgument { index })?;
        Ok(T::deserialize(value)?)
    }

    /// Sequential decoder over the arguments, in declaration order.
    pub fn decoder(&self) -> ArgumentDecoder<'_> {
        ArgumentDecoder {
            arguments: self,
            index: 0,
        }
    }

    /// Stable textual key for the argument list.
    pub fn key(&self) -> String {
        Value::Array(self.values.clone()).to_string()
    }
}

impl From<Vec<Value>> for Arguments {
    fn from(values: Vec<Value>) -> Self {
        Self::from_values(values)
    }
}

impl Serialize for Arguments {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Arguments {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Vec::<Value>::deserialize(deserializer).map(Self::from_values)
    }
}

/// Cursor that decodes arguments one after another.
pub struct ArgumentDecoder<'a> {
    arguments: &'a Arguments,
    index: usize,
}

impl ArgumentDecoder<'_> {
    /// Decode the next argument.
    #[allow(clippy::should_implement_trait)]
    pub fn next<T: DeserializeOwned>(&mut self) -> Result<T> {
        let value = self.arguments.decode(self.index)?;
        self.index += 1;
        Ok(value)
    }

    /// Number of arguments not yet decoded.
    pub fn remaining(&self) -> usize {
        self.arguments.len().saturating_sub(self.index)
    }
}
