//! Generic type parameters

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::{DataType, ModelError, Result};

/// Kind of type a parameter may be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TypeParameterConstraint {
    /// No constraint, the parameter binds to any type
    #[default]
    None,
    /// Only class types
    Class,
    /// Only value (simple) types other than `System.Any`
    Value,
    /// Only tuple types
    Tuple,
    /// Only interval types
    Interval,
    /// Only choice types
    Choice,
    /// The constraint type or a type derived from it
    Type,
}

/// An unbound type variable such as `T` or `T extends Collection`
///
/// Equality and hashing use the identifier only.
#[derive(Debug, Clone)]
pub struct TypeParameter {
    identifier: String,
    constraint: TypeParameterConstraint,
    constraint_type: Option<Box<DataType>>,
}

impl TypeParameter {
    /// Create an unconstrained type parameter
    pub fn new(identifier: impl Into<String>) -> Result<Self> {
        Self::with_constraint(identifier, TypeParameterConstraint::None, None)
    }

    /// Create a type parameter with a constraint kind and optional bounding type
    pub fn with_constraint(
        identifier: impl Into<String>,
        constraint: TypeParameterConstraint,
        constraint_type: Option<DataType>,
    ) -> Result<Self> {
        let identifier = identifier.into();
        if identifier.is_empty() {
            return Err(ModelError::invalid_argument("TypeParameter", "identifier"));
        }
        Ok(Self {
            identifier,
            constraint,
            constraint_type: constraint_type.map(Box::new),
        })
    }

    /// Parameter identifier
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Constraint kind
    pub fn constraint(&self) -> TypeParameterConstraint {
        self.constraint
    }

    /// Bounding type for [`TypeParameterConstraint::Type`]
    pub fn constraint_type(&self) -> Option<&DataType> {
        self.constraint_type.as_deref()
    }

    /// Check if `call_type` satisfies the constraint of this parameter
    pub fn can_bind(&self, call_type: &DataType) -> bool {
        match self.constraint {
            TypeParameterConstraint::None => true,
            TypeParameterConstraint::Choice => matches!(call_type, DataType::Choice(_)),
            TypeParameterConstraint::Tuple => matches!(call_type, DataType::Tuple(_)),
            TypeParameterConstraint::Interval => matches!(call_type, DataType::Interval(_)),
            TypeParameterConstraint::Class => matches!(call_type, DataType::Class(_)),
            TypeParameterConstraint::Value => {
                matches!(call_type, DataType::Simple(_)) && !call_type.is_any()
            }
            TypeParameterConstraint::Type => self
                .constraint_type
                .as_deref()
                .is_none_or(|bound| call_type.is_subtype_of(bound)),
        }
    }
}

impl PartialEq for TypeParameter {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
    }
}

impl Eq for TypeParameter {}

impl Hash for TypeParameter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier.hash(state);
    }
}
