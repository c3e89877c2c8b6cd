//! Tuple types
//!
//! Tuples are compared structurally: elements are keyed by name and compared
//! after sorting by name, so insertion order never affects equality or subtyping.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::instantiation::InstantiationContext;
use crate::{DataType, ModelError, Result};

/// A named element of a tuple type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TupleTypeElement {
    name: String,
    element_type: DataType,
    one_based: bool,
}

impl TupleTypeElement {
    /// Create a tuple element
    pub fn new(name: impl Into<String>, element_type: DataType) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ModelError::invalid_argument("TupleTypeElement", "name"));
        }
        Ok(Self::from_parts(name, element_type, false))
    }

    pub(crate) fn from_parts(name: String, element_type: DataType, one_based: bool) -> Self {
        Self {
            name,
            element_type,
            one_based,
        }
    }

    /// Mark the element as one-based (for indexed access)
    pub fn with_one_based(mut self, one_based: bool) -> Self {
        self.one_based = one_based;
        self
    }

    /// Element name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element type
    pub fn element_type(&self) -> &DataType {
        &self.element_type
    }

    /// Whether the element is one-based
    pub fn is_one_based(&self) -> bool {
        self.one_based
    }

    /// Same name and a subtype of the other element's type
    pub fn is_subtype_of(&self, that: &TupleTypeElement) -> bool {
        self.name == that.name && self.element_type.is_subtype_of(&that.element_type)
    }

    /// Same name and a supertype of the other element's type
    pub fn is_supertype_of(&self, that: &TupleTypeElement) -> bool {
        self.name == that.name && self.element_type.is_supertype_of(&that.element_type)
    }

    /// Human-readable label
    pub fn to_label(&self) -> String {
        format!("{}: {}", self.name, self.element_type.to_label())
    }
}

impl fmt::Display for TupleTypeElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.element_type)
    }
}

/// A structural record type
#[derive(Debug, Clone, Default)]
pub struct TupleType {
    elements: Vec<TupleTypeElement>,
}

impl TupleType {
    /// Create a tuple type from its elements
    pub fn new(elements: Vec<TupleTypeElement>) -> Self {
        Self { elements }
    }

    /// Elements in insertion order
    pub fn elements(&self) -> &[TupleTypeElement] {
        &self.elements
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the tuple has no elements
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Append an element
    pub fn add_element(&mut self, element: TupleTypeElement) {
        self.elements.push(element);
    }

    /// Append several elements
    pub fn add_elements(&mut self, elements: impl IntoIterator<Item = TupleTypeElement>) {
        self.elements.extend(elements);
    }

    /// Find an element by name
    pub fn element(&self, name: &str) -> Option<&TupleTypeElement> {
        self.elements.iter().find(|element| element.name == name)
    }

    /// Elements sorted by name
    pub fn sorted_elements(&self) -> Vec<&TupleTypeElement> {
        let mut sorted: Vec<_> = self.elements.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        sorted
    }

    /// Element-wise subtype check against a tuple of the same size
    pub fn is_subtype_of(&self, that: &TupleType) -> bool {
        self.len() == that.len()
            && self
                .sorted_elements()
                .into_iter()
                .zip(that.sorted_elements())
                .all(|(this, that)| this.is_subtype_of(that))
    }

    /// Element-wise supertype check against a tuple of the same size
    pub fn is_supertype_of(&self, that: &TupleType) -> bool {
        self.len() == that.len()
            && self
                .sorted_elements()
                .into_iter()
                .zip(that.sorted_elements())
                .all(|(this, that)| this.is_supertype_of(that))
    }

    /// Check if any element type is generic
    pub fn is_generic(&self) -> bool {
        self.elements.iter().any(|element| element.element_type.is_generic())
    }

    /// Check if this tuple type can be instantiated from `call_type`
    pub fn is_instantiable(
        &self,
        call_type: &DataType,
        context: &mut dyn InstantiationContext,
    ) -> Result<bool> {
        let DataType::Tuple(tuple) = call_type else {
            return Ok(false);
        };
        if self.len() != tuple.len() {
            return Ok(false);
        }

        for (this, that) in self.sorted_elements().into_iter().zip(tuple.sorted_elements()) {
            if this.name != that.name
                || !this.element_type.is_instantiable(&that.element_type, context)?
            {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Rebuild the tuple with every element type instantiated
    pub fn instantiate(&self, context: &dyn InstantiationContext) -> Result<TupleType> {
        if !self.is_generic() {
            return Ok(self.clone());
        }

        let elements = self
            .elements
            .iter()
            .map(|element| {
                Ok(TupleTypeElement::from_parts(
                    element.name.clone(),
                    element.element_type.instantiate(context)?,
                    element.one_based,
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(TupleType::new(elements))
    }

    /// Human-readable label
    pub fn to_label(&self) -> String {
        let elements: Vec<String> = self.elements.iter().map(TupleTypeElement::to_label).collect();
        format!("tuple of {}", elements.join(", "))
    }
}

impl PartialEq for TupleType {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.sorted_elements() == other.sorted_elements()
    }
}

impl Eq for TupleType {}

impl Hash for TupleType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for element in self.sorted_elements() {
            element.hash(state);
        }
    }
}

impl fmt::Display for TupleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tuple{{")?;
        for (index, element) in self.elements.iter().enumerate() {
            if index > 0 {
                write!(f, ",")?;
            }
            write!(f, "{element}")?;
        }
        write!(f, "}}")
    }
}
