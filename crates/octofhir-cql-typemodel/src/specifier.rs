//! Serializable type specifiers
//!
//! A [`TypeSpecifier`] is a plain-data snapshot of a [`DataType`] for output
//! and interchange. Class specifiers describe the class itself (base, generic
//! parameters, own elements) and refer to other classes by name only.

use serde::{Deserialize, Serialize};

use crate::{DataType, NamedType, TypeParameter, TypeParameterConstraint};

// ============================================================================
// Type Specifiers
// ============================================================================

/// Type specifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TypeSpecifier {
    /// Named type
    #[serde(rename = "NamedTypeSpecifier")]
    Named(NamedTypeSpecifier),
    /// List type
    #[serde(rename = "ListTypeSpecifier")]
    List(ListTypeSpecifier),
    /// Interval type
    #[serde(rename = "IntervalTypeSpecifier")]
    Interval(IntervalTypeSpecifier),
    /// Tuple type
    #[serde(rename = "TupleTypeSpecifier")]
    Tuple(TupleTypeSpecifier),
    /// Choice type
    #[serde(rename = "ChoiceTypeSpecifier")]
    Choice(ChoiceTypeSpecifier),
    /// Class type
    #[serde(rename = "ClassTypeSpecifier")]
    Class(ClassTypeSpecifier),
    /// Type parameter
    #[serde(rename = "ParameterTypeSpecifier")]
    Parameter(ParameterTypeSpecifier),
}

/// Named type specifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedTypeSpecifier {
    /// Namespace
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Type name
    pub name: String,
}

impl NamedTypeSpecifier {
    fn from_named(named: &dyn NamedType) -> Self {
        let namespace = named.namespace();
        Self {
            namespace: (!namespace.is_empty()).then(|| namespace.to_string()),
            name: named.simple_name().to_string(),
        }
    }
}

/// List type specifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTypeSpecifier {
    /// Element type
    pub element_type: Box<TypeSpecifier>,
}

/// Interval type specifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntervalTypeSpecifier {
    /// Point type
    pub point_type: Box<TypeSpecifier>,
}

/// Tuple type specifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TupleTypeSpecifier {
    /// Elements
    pub element: Vec<TupleElementDefinition>,
}

/// Tuple element definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TupleElementDefinition {
    /// Name
    pub name: String,
    /// Element type
    pub element_type: Box<TypeSpecifier>,
    /// One-based indexing
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub one_based: bool,
}

/// Choice type specifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceTypeSpecifier {
    /// Choice types
    pub choice: Vec<TypeSpecifier>,
}

/// Class type specifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassTypeSpecifier {
    /// Namespace
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Class name
    pub name: String,
    /// Base type, by name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_type: Option<NamedTypeSpecifier>,
    /// Generic parameters
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameter: Vec<ParameterTypeSpecifier>,
    /// Own elements
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub element: Vec<ClassElementDefinition>,
}

/// Class element definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassElementDefinition {
    /// Name
    pub name: String,
    /// Element type
    pub element_type: Box<TypeSpecifier>,
    /// Prohibited in the structural view
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub prohibited: bool,
    /// One-based indexing
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub one_based: bool,
    /// Target mapping
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// Type parameter specifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterTypeSpecifier {
    /// Identifier
    pub identifier: String,
    /// Constraint kind
    #[serde(default)]
    pub constraint: TypeParameterConstraint,
    /// Constraint type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint_type: Option<Box<TypeSpecifier>>,
}

impl From<&TypeParameter> for ParameterTypeSpecifier {
    fn from(parameter: &TypeParameter) -> Self {
        Self {
            identifier: parameter.identifier().to_string(),
            constraint: parameter.constraint(),
            constraint_type: parameter
                .constraint_type()
                .map(|bound| Box::new(bound.to_reference_specifier())),
        }
    }
}

impl DataType {
    /// Build the specifier describing this type
    ///
    /// Classes are described in full; classes they mention (bases, element
    /// types) are referred to by name.
    pub fn to_specifier(&self) -> TypeSpecifier {
        match self {
            Self::Class(class) => {
                let named = NamedTypeSpecifier::from_named(&**class);
                TypeSpecifier::Class(ClassTypeSpecifier {
                    namespace: named.namespace,
                    name: named.name,
                    base_type: class.base_type().map(|base| match base {
                        Self::Simple(simple) => NamedTypeSpecifier::from_named(simple),
                        Self::Class(base) => NamedTypeSpecifier::from_named(&**base),
                        other => NamedTypeSpecifier {
                            namespace: None,
                            name: other.to_string(),
                        },
                    }),
                    parameter: class
                        .generic_parameters()
                        .iter()
                        .map(ParameterTypeSpecifier::from)
                        .collect(),
                    element: class
                        .elements()
                        .iter()
                        .map(|element| ClassElementDefinition {
                            name: element.name().to_string(),
                            element_type: Box::new(element.element_type().to_reference_specifier()),
                            prohibited: element.is_prohibited(),
                            one_based: element.is_one_based(),
                            target: element.target().map(str::to_string),
                        })
                        .collect(),
                })
            }
            other => other.to_reference_specifier(),
        }
    }

    fn to_reference_specifier(&self) -> TypeSpecifier {
        match self {
            Self::Simple(simple) => TypeSpecifier::Named(NamedTypeSpecifier::from_named(simple)),
            Self::Class(class) => {
                TypeSpecifier::Named(NamedTypeSpecifier::from_named(&**class))
            }
            Self::List(list) => TypeSpecifier::List(ListTypeSpecifier {
                element_type: Box::new(list.element_type().to_reference_specifier()),
            }),
            Self::Interval(interval) => TypeSpecifier::Interval(IntervalTypeSpecifier {
                point_type: Box::new(interval.point_type().to_reference_specifier()),
            }),
            Self::Tuple(tuple) => TypeSpecifier::Tuple(TupleTypeSpecifier {
                element: tuple
                    .elements()
                    .iter()
                    .map(|element| TupleElementDefinition {
                        name: element.name().to_string(),
                        element_type: Box::new(element.element_type().to_reference_specifier()),
                        one_based: element.is_one_based(),
                    })
                    .collect(),
            }),
            Self::Choice(choice) => TypeSpecifier::Choice(ChoiceTypeSpecifier {
                choice: choice
                    .types()
                    .iter()
                    .map(DataType::to_reference_specifier)
                    .collect(),
            }),
            Self::Parameter(parameter) => TypeSpecifier::Parameter(parameter.into()),
        }
    }
}
