//! The DataType sum type
//!
//! [`DataType`] is the closed set of type shapes of the model. Every operation of
//! the type lattice is an exhaustive match over its variants:
//!
//! - subtype/supertype: a walk up the single-parent base chain, with structural
//!   recursion for lists, intervals and tuples
//! - compatibility: the broader relation used for implicit casts (choice
//!   membership, class/tuple structural equivalence)
//! - generic instantiation: substitution of type parameters through an
//!   [`InstantiationContext`]

use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::instantiation::{InstantiationContext, single_conversion_target};
use crate::types::{
    ChoiceType, ClassType, IntervalType, ListType, SimpleType, TupleType, TypeParameter,
};
use crate::Result;

/// Name of the universal root type
pub const ANY_TYPE_NAME: &str = "System.Any";

static ANY: LazyLock<DataType> = LazyLock::new(|| DataType::Simple(SimpleType::any()));

/// A type of the CQL type model
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Nominal leaf type, identified by name
    Simple(SimpleType),
    /// List of an element type
    List(ListType),
    /// Interval over a point type
    Interval(IntervalType),
    /// Structural record with named elements
    Tuple(TupleType),
    /// Flattened union of member types
    Choice(ChoiceType),
    /// Nominal record type with inheritance and generic parameters
    Class(Arc<ClassType>),
    /// Unbound type variable
    Parameter(TypeParameter),
}

/// Types that carry a (possibly namespace-qualified) name
pub trait NamedType {
    /// Fully qualified name (e.g. `FHIR.Patient`)
    fn name(&self) -> &str;

    /// Target mapping of the type, if any
    fn target(&self) -> Option<&str>;

    /// Namespace qualifier, empty when the name is unqualified
    fn namespace(&self) -> &str {
        let name = self.name();
        match name.find('.') {
            Some(index) if index > 0 => &name[..index],
            _ => "",
        }
    }

    /// Name without the namespace qualifier
    fn simple_name(&self) -> &str {
        let name = self.name();
        match name.find('.') {
            Some(index) if index > 0 => &name[index + 1..],
            _ => name,
        }
    }
}

impl DataType {
    /// The universal root type `System.Any`
    pub fn any() -> &'static DataType {
        &ANY
    }

    /// Check if this is the universal root type
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Simple(simple) if simple.is_any())
    }

    /// The base type of this type
    ///
    /// Every type except the root has a base; types constructed without an
    /// explicit base default to `System.Any`.
    pub fn base_type(&self) -> Option<&DataType> {
        match self {
            Self::Simple(simple) => simple.base_type(),
            Self::Class(class) => class.base_type(),
            Self::List(_)
            | Self::Interval(_)
            | Self::Tuple(_)
            | Self::Choice(_)
            | Self::Parameter(_) => Some(DataType::any()),
        }
    }

    /// Iterate over this type followed by its base chain up to the root
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors {
            current: Some(self),
        }
    }

    /// Check if this type is a subtype of `other`
    pub fn is_subtype_of(&self, other: &DataType) -> bool {
        match (self, other) {
            (Self::List(this), Self::List(that)) => {
                return this.element_type().is_subtype_of(that.element_type());
            }
            (Self::Interval(this), Self::Interval(that)) => {
                return this.point_type().is_subtype_of(that.point_type());
            }
            (Self::Tuple(this), Self::Tuple(that)) if this.len() == that.len() => {
                return this.is_subtype_of(that);
            }
            _ => {}
        }

        self.ancestors().any(|ancestor| ancestor == other)
    }

    /// Check if this type is a supertype of `other`
    pub fn is_supertype_of(&self, other: &DataType) -> bool {
        match (self, other) {
            (Self::List(this), Self::List(that)) => {
                return this.element_type().is_supertype_of(that.element_type());
            }
            (Self::Interval(this), Self::Interval(that)) => {
                return this.point_type().is_supertype_of(that.point_type());
            }
            (Self::Tuple(this), Self::Tuple(that)) if this.len() == that.len() => {
                return this.is_supertype_of(that);
            }
            _ => {}
        }

        other.ancestors().any(|ancestor| ancestor == self)
    }

    /// Check if this type is compatible with `other`
    ///
    /// Compatibility is not the implicit conversion relation: it supports casts
    /// such as a member type to its choice, or a class to its equivalent tuple.
    pub fn is_compatible_with(&self, other: &DataType) -> bool {
        match (self, other) {
            (Self::Choice(this), Self::Choice(that)) => {
                return this.is_subset_of(that) || this.is_superset_of(that);
            }
            (Self::Choice(this), _) => {
                if this.types().iter().any(|member| other.is_compatible_with(member)) {
                    return true;
                }
            }
            (_, Self::Choice(that)) => {
                if that
                    .types()
                    .iter()
                    .any(|member| self.is_subtype_of(member) || self.is_compatible_with(member))
                {
                    return true;
                }
            }
            (Self::Tuple(tuple), Self::Class(class)) | (Self::Class(class), Self::Tuple(tuple)) => {
                return class.tuple_type() == tuple;
            }
            (Self::List(this), Self::List(that)) => {
                if this.element_type().is_compatible_with(that.element_type()) {
                    return true;
                }
            }
            (Self::Interval(this), Self::Interval(that)) => {
                if this.point_type().is_compatible_with(that.point_type()) {
                    return true;
                }
            }
            _ => {}
        }

        self == other
    }

    /// Check if this type mentions an unbound type parameter
    pub fn is_generic(&self) -> bool {
        match self {
            Self::Simple(_) => false,
            Self::List(list) => list.element_type().is_generic(),
            Self::Interval(interval) => interval.point_type().is_generic(),
            Self::Tuple(tuple) => tuple.is_generic(),
            Self::Choice(choice) => choice.types().iter().any(DataType::is_generic),
            Self::Class(class) => class.is_generic(),
            Self::Parameter(_) => true,
        }
    }

    /// Check if this (generic) type can be instantiated from `call_type`
    ///
    /// Type parameter bindings are recorded in the context. When the call type is
    /// not directly usable, the context's conversion targets are consulted; more
    /// than one instantiable candidate is an ambiguity error.
    pub fn is_instantiable(
        &self,
        call_type: &DataType,
        context: &mut dyn InstantiationContext,
    ) -> Result<bool> {
        match self {
            Self::Simple(_) => {
                if self.is_supertype_of(call_type) {
                    return Ok(true);
                }
                let targets = context.simple_conversion_targets(call_type);
                single_conversion_target(call_type, targets, |target| {
                    Ok(self.is_supertype_of(&DataType::Simple(target.clone())))
                })
            }
            Self::List(list) => list.is_instantiable(call_type, context),
            Self::Interval(interval) => interval.is_instantiable(call_type, context),
            Self::Tuple(tuple) => tuple.is_instantiable(call_type, context),
            Self::Choice(_) => Ok(self.is_supertype_of(call_type)),
            Self::Class(class) => class.is_instantiable(call_type, context),
            Self::Parameter(parameter) => Ok(context.is_instantiable(parameter, call_type)),
        }
    }

    /// Substitute bound types for the type parameters of this type
    pub fn instantiate(&self, context: &dyn InstantiationContext) -> Result<DataType> {
        match self {
            Self::Simple(_) | Self::Choice(_) => Ok(self.clone()),
            Self::List(list) => Ok(ListType::new(list.element_type().instantiate(context)?).into()),
            Self::Interval(interval) => {
                Ok(IntervalType::new(interval.point_type().instantiate(context)?).into())
            }
            Self::Tuple(tuple) => Ok(tuple.instantiate(context)?.into()),
            Self::Class(class) => ClassType::instantiate(class, context),
            Self::Parameter(parameter) => Ok(context.instantiate(parameter)),
        }
    }

    /// Human-readable label
    pub fn to_label(&self) -> String {
        match self {
            Self::List(list) => format!("List of {}", list.element_type().to_label()),
            Self::Interval(interval) => format!("Interval of {}", interval.point_type().to_label()),
            Self::Tuple(tuple) => tuple.to_label(),
            Self::Class(class) => class.label().unwrap_or(class.name()).to_string(),
            Self::Simple(_) | Self::Choice(_) | Self::Parameter(_) => self.to_string(),
        }
    }

    /// Get the class type if this is a class
    pub fn as_class(&self) -> Option<&Arc<ClassType>> {
        match self {
            Self::Class(class) => Some(class),
            _ => None,
        }
    }

    /// Get the type parameter if this is a type variable
    pub fn as_parameter(&self) -> Option<&TypeParameter> {
        match self {
            Self::Parameter(parameter) => Some(parameter),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple(simple) => write!(f, "{}", simple.name()),
            Self::List(list) => write!(f, "list<{}>", list.element_type()),
            Self::Interval(interval) => write!(f, "interval<{}>", interval.point_type()),
            Self::Tuple(tuple) => write!(f, "{tuple}"),
            Self::Choice(choice) => {
                write!(f, "choice<")?;
                for (index, member) in choice.types().iter().enumerate() {
                    if index > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{member}")?;
                }
                write!(f, ">")
            }
            Self::Class(class) => write!(f, "{}", class.name()),
            Self::Parameter(parameter) => write!(f, "{}", parameter.identifier()),
        }
    }
}

impl From<SimpleType> for DataType {
    fn from(simple: SimpleType) -> Self {
        Self::Simple(simple)
    }
}

impl From<ListType> for DataType {
    fn from(list: ListType) -> Self {
        Self::List(list)
    }
}

impl From<IntervalType> for DataType {
    fn from(interval: IntervalType) -> Self {
        Self::Interval(interval)
    }
}

impl From<TupleType> for DataType {
    fn from(tuple: TupleType) -> Self {
        Self::Tuple(tuple)
    }
}

impl From<ChoiceType> for DataType {
    fn from(choice: ChoiceType) -> Self {
        Self::Choice(choice)
    }
}

impl From<ClassType> for DataType {
    fn from(class: ClassType) -> Self {
        Self::Class(Arc::new(class))
    }
}

impl From<Arc<ClassType>> for DataType {
    fn from(class: Arc<ClassType>) -> Self {
        Self::Class(class)
    }
}

impl From<TypeParameter> for DataType {
    fn from(parameter: TypeParameter) -> Self {
        Self::Parameter(parameter)
    }
}

/// Iterator over a type and its base chain
pub struct Ancestors<'a> {
    current: Option<&'a DataType>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a DataType;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.current = current.base_type();
        Some(current)
    }
}
