//! Operation identifiers and target type information.

use std::borrow::Cow;
use std::fmt;

/// Whether a target type is described by an explicit contract (a trait) or
/// only by its concrete implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Contract,
    Concrete,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Contract => write!(f, "contract"),
            Shape::Concrete => write!(f, "concrete"),
        }
    }
}

/// What pointcuts see of a target type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    name: Cow<'static, str>,
    shape: Shape,
}

impl TypeInfo {
    pub fn new(name: impl Into<Cow<'static, str>>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }

    pub fn contract(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, Shape::Contract)
    }

    pub fn concrete(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, Shape::Concrete)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Name plus parameter-type signature of a callable operation.
///
/// Displayed as `save(User)` / `find(u64, bool)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationId {
    name: Cow<'static, str>,
    params: Vec<Cow<'static, str>>,
}

impl OperationId {
    /// Create an operation identifier from a name and parameter type names.
    pub fn new(name: impl Into<Cow<'static, str>>, params: &[&'static str]) -> Self {
        Self {
            name: name.into(),
            params: params.iter().map(|p| Cow::Borrowed(*p)).collect(),
        }
    }

    /// Create an identifier for an operation without parameters.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, &[])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.as_ref())
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// `Type::operation`, the form regex pointcuts match against.
    pub fn qualified(&self, target: &TypeInfo) -> String {
        format!("{}::{}", target.name(), self.name)
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, ")")
    }
}
