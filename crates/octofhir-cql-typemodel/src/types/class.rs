//! Class types
//!
//! A class is a nominal record type: identity is by name alone, whatever its
//! fields. It may derive from a base type, declare generic parameters and carry
//! model metadata (relationships, searches, retrieval paths).
//!
//! The structural tuple view of a class (inherited fields followed by own
//! fields, own fields overriding inherited ones by name) is derived lazily and
//! cached. The cache is reset by every method that changes elements or generic
//! parameters; those methods take `&mut self`, so a class shared behind an `Arc`
//! can no longer change and its cache cannot race with a mutation.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use log::trace;

use crate::instantiation::InstantiationContext;
use crate::{
    DataType, ModelError, NamedType, Relationship, Result, SearchType, TupleType,
    TupleTypeElement, TypeParameter,
};

/// A field of a class type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassTypeElement {
    name: String,
    element_type: DataType,
    prohibited: bool,
    one_based: bool,
    target: Option<String>,
}

impl ClassTypeElement {
    /// Create a class element
    pub fn new(name: impl Into<String>, element_type: DataType) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ModelError::invalid_argument("ClassTypeElement", "name"));
        }
        Ok(Self {
            name,
            element_type,
            prohibited: false,
            one_based: false,
            target: None,
        })
    }

    /// Mark the element as prohibited (removed from the structural view)
    pub fn with_prohibited(mut self, prohibited: bool) -> Self {
        self.prohibited = prohibited;
        self
    }

    /// Mark the element as one-based
    pub fn with_one_based(mut self, one_based: bool) -> Self {
        self.one_based = one_based;
        self
    }

    /// Set the target mapping
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Copy of this element with a different type, keeping its flags
    pub fn with_type(&self, element_type: DataType) -> Self {
        Self {
            element_type,
            ..self.clone()
        }
    }

    /// Element name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element type
    pub fn element_type(&self) -> &DataType {
        &self.element_type
    }

    /// Whether the element is prohibited
    pub fn is_prohibited(&self) -> bool {
        self.prohibited
    }

    /// Whether the element is one-based
    pub fn is_one_based(&self) -> bool {
        self.one_based
    }

    /// Target mapping
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Same name and a subtype of the other element's type
    pub fn is_subtype_of(&self, that: &ClassTypeElement) -> bool {
        self.name == that.name && self.element_type.is_subtype_of(&that.element_type)
    }

    /// Same name and a supertype of the other element's type
    pub fn is_supertype_of(&self, that: &ClassTypeElement) -> bool {
        self.name == that.name && self.element_type.is_supertype_of(&that.element_type)
    }
}

impl fmt::Display for ClassTypeElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.element_type)?;
        if self.prohibited {
            write!(f, " (prohibited)")?;
        }
        if self.one_based {
            write!(f, " (one-based)")?;
        }
        if let Some(target) = &self.target {
            write!(f, " (target: {target})")?;
        }
        Ok(())
    }
}

/// A nominal record type
#[derive(Debug, Clone)]
pub struct ClassType {
    name: String,
    base_type: Option<DataType>,
    elements: Vec<ClassTypeElement>,
    generic_parameters: Vec<TypeParameter>,
    identifier: Option<String>,
    label: Option<String>,
    target: Option<String>,
    retrievable: bool,
    primary_code_path: Option<String>,
    primary_value_set_path: Option<String>,
    relationships: Vec<Relationship>,
    target_relationships: Vec<Relationship>,
    searches: Vec<SearchType>,
    tuple_type: OnceLock<TupleType>,
}

impl ClassType {
    /// Create a class type deriving from `System.Any`
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ModelError::invalid_argument("ClassType", "name"));
        }
        Ok(Self {
            name,
            base_type: None,
            elements: Vec::new(),
            generic_parameters: Vec::new(),
            identifier: None,
            label: None,
            target: None,
            retrievable: false,
            primary_code_path: None,
            primary_value_set_path: None,
            relationships: Vec::new(),
            target_relationships: Vec::new(),
            searches: Vec::new(),
            tuple_type: OnceLock::new(),
        })
    }

    /// Set the base type
    pub fn with_base_type(mut self, base_type: DataType) -> Self {
        self.base_type = Some(base_type);
        self.invalidate();
        self
    }

    /// Class name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base type, defaulting to `System.Any`
    pub fn base_type(&self) -> Option<&DataType> {
        Some(self.base_type.as_ref().unwrap_or(DataType::any()))
    }

    /// Base class, when the base type is a class
    pub fn base_class(&self) -> Option<&Arc<ClassType>> {
        self.base_type.as_ref().and_then(DataType::as_class)
    }

    // === Elements ===

    /// Own elements in declaration order
    pub fn elements(&self) -> &[ClassTypeElement] {
        &self.elements
    }

    /// Own element by name
    pub fn element(&self, name: &str) -> Option<&ClassTypeElement> {
        self.elements.iter().find(|element| element.name == name)
    }

    /// Add an element
    ///
    /// Redeclaring an inherited element is allowed only when the inherited type
    /// is an unbound type parameter, or the new type narrows it: a subtype of it,
    /// a subtype of its list element or interval point type, or compatible with
    /// it when it is a choice.
    pub fn add_element(&mut self, element: ClassTypeElement) -> Result<()> {
        self.check_redeclaration(&element)?;
        self.elements.push(element);
        self.invalidate();
        Ok(())
    }

    /// Add several elements, stopping at the first invalid redeclaration
    pub fn add_elements(
        &mut self,
        elements: impl IntoIterator<Item = ClassTypeElement>,
    ) -> Result<()> {
        for element in elements {
            self.add_element(element)?;
        }
        Ok(())
    }

    /// Inherited and own elements; own elements override inherited ones by name
    pub fn all_elements(&self) -> Vec<&ClassTypeElement> {
        let mut elements = IndexMap::new();
        self.gather_elements(&mut elements);
        elements.into_values().collect()
    }

    /// Own elements sorted by name
    pub fn sorted_elements(&self) -> Vec<&ClassTypeElement> {
        let mut sorted: Vec<_> = self.elements.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        sorted
    }

    fn gather_elements<'a>(&'a self, elements: &mut IndexMap<&'a str, &'a ClassTypeElement>) {
        if let Some(base) = self.base_class() {
            base.gather_elements(elements);
        }
        for element in &self.elements {
            elements.insert(element.name.as_str(), element);
        }
    }

    fn base_elements(&self) -> IndexMap<&str, &ClassTypeElement> {
        let mut elements = IndexMap::new();
        if let Some(base) = self.base_class() {
            base.gather_elements(&mut elements);
        }
        elements
    }

    fn check_redeclaration(&self, element: &ClassTypeElement) -> Result<()> {
        let base_elements = self.base_elements();
        let Some(existing) = base_elements.get(element.name()) else {
            return Ok(());
        };

        let original = existing.element_type();
        let redeclared = element.element_type();
        let permitted = match original {
            DataType::Parameter(_) => true,
            _ if redeclared.is_subtype_of(original) => true,
            DataType::List(list) => redeclared.is_subtype_of(list.element_type()),
            DataType::Interval(interval) => redeclared.is_subtype_of(interval.point_type()),
            DataType::Choice(_) => redeclared.is_compatible_with(original),
            _ => false,
        };

        if permitted {
            trace!("{}.{} redeclared as {}", self.name, element.name, redeclared);
            Ok(())
        } else {
            Err(ModelError::InvalidRedeclaration {
                class_name: self.name.clone(),
                element_name: element.name.clone(),
                original_type: original.to_string(),
                redeclared_type: redeclared.to_string(),
            })
        }
    }

    // === Generic parameters ===

    /// Declared generic parameters in order
    pub fn generic_parameters(&self) -> &[TypeParameter] {
        &self.generic_parameters
    }

    /// Add a generic parameter
    pub fn add_generic_parameter(&mut self, parameter: TypeParameter) {
        self.generic_parameters.push(parameter);
        self.invalidate();
    }

    /// Add several generic parameters
    pub fn add_generic_parameters(&mut self, parameters: impl IntoIterator<Item = TypeParameter>) {
        self.generic_parameters.extend(parameters);
        self.invalidate();
    }

    /// Replace the generic parameters
    pub fn set_generic_parameters(&mut self, parameters: Vec<TypeParameter>) {
        self.generic_parameters = parameters;
        self.invalidate();
    }

    /// Find a generic parameter by identifier, ignoring case
    ///
    /// Unless `current_class_only` is set, base classes are searched when the
    /// parameter is not declared on this class.
    pub fn generic_parameter_by_identifier(
        &self,
        identifier: &str,
        current_class_only: bool,
    ) -> Option<&TypeParameter> {
        let own = self
            .generic_parameters
            .iter()
            .find(|parameter| parameter.identifier().eq_ignore_ascii_case(identifier));
        if own.is_some() || current_class_only {
            return own;
        }
        self.base_class()
            .and_then(|base| base.generic_parameter_by_identifier(identifier, false))
    }

    // === Structural view ===

    /// Tuple view of the inherited and own (non-prohibited) elements
    ///
    /// The view is a plain name to type projection; element flags are not carried.
    pub fn tuple_type(&self) -> &TupleType {
        self.tuple_type.get_or_init(|| self.build_tuple_type())
    }

    fn build_tuple_type(&self) -> TupleType {
        let mut elements = IndexMap::new();
        self.add_tuple_elements(&mut elements);
        TupleType::new(elements.into_values().collect())
    }

    fn add_tuple_elements(&self, elements: &mut IndexMap<String, TupleTypeElement>) {
        if let Some(base) = self.base_class() {
            base.add_tuple_elements(elements);
        }
        for element in &self.elements {
            if element.prohibited {
                elements.shift_remove(&element.name);
            } else {
                elements.insert(
                    element.name.clone(),
                    TupleTypeElement::from_parts(
                        element.name.clone(),
                        element.element_type.clone(),
                        false,
                    ),
                );
            }
        }
    }

    fn invalidate(&mut self) {
        self.tuple_type = OnceLock::new();
    }

    // === Type operations ===

    /// A class is generic when it declares at least one generic parameter
    pub fn is_generic(&self) -> bool {
        !self.generic_parameters.is_empty()
    }

    /// Check if this class can be instantiated from `call_type`
    ///
    /// The call type must be a class with the same number of own elements,
    /// matching by name with each element type instantiable.
    pub fn is_instantiable(
        &self,
        call_type: &DataType,
        context: &mut dyn InstantiationContext,
    ) -> Result<bool> {
        let DataType::Class(class) = call_type else {
            return Ok(false);
        };
        if self.elements.len() != class.elements.len() {
            return Ok(false);
        }

        for (this, that) in self.sorted_elements().into_iter().zip(class.sorted_elements()) {
            if this.name != that.name
                || !this.element_type.is_instantiable(&that.element_type, context)?
            {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Rebuild the class with every own element type instantiated
    ///
    /// Non-generic classes are returned as the same shared instance. The base
    /// type is kept unchanged.
    pub fn instantiate(self: &Arc<Self>, context: &dyn InstantiationContext) -> Result<DataType> {
        if !self.is_generic() {
            return Ok(DataType::Class(Arc::clone(self)));
        }

        let mut result = ClassType::new(self.name.clone())?;
        result.base_type = self.base_type.clone();
        for element in &self.elements {
            result.add_element(element.with_type(element.element_type.instantiate(context)?))?;
        }
        Ok(result.into())
    }

    // === Metadata ===

    /// Model identifier (e.g. a profile URL)
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// Set the model identifier
    pub fn set_identifier(&mut self, identifier: impl Into<String>) {
        self.identifier = Some(identifier.into());
    }

    /// Display label
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Set the display label
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = Some(label.into());
    }

    /// Set the target mapping
    pub fn set_target(&mut self, target: impl Into<String>) {
        self.target = Some(target.into());
    }

    /// Whether instances can be retrieved from a data source
    pub fn is_retrievable(&self) -> bool {
        self.retrievable
    }

    /// Set the retrievable flag
    pub fn set_retrievable(&mut self, retrievable: bool) {
        self.retrievable = retrievable;
    }

    /// Path of the primary code element used for terminology filtering
    pub fn primary_code_path(&self) -> Option<&str> {
        self.primary_code_path.as_deref()
    }

    /// Set the primary code path
    pub fn set_primary_code_path(&mut self, path: impl Into<String>) {
        self.primary_code_path = Some(path.into());
    }

    /// Path of the primary value set element
    pub fn primary_value_set_path(&self) -> Option<&str> {
        self.primary_value_set_path.as_deref()
    }

    /// Set the primary value set path
    pub fn set_primary_value_set_path(&mut self, path: impl Into<String>) {
        self.primary_value_set_path = Some(path.into());
    }

    /// Relationships to other model contexts
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Add a relationship
    pub fn add_relationship(&mut self, relationship: Relationship) {
        self.relationships.push(relationship);
    }

    /// Relationships in which this class is the target
    pub fn target_relationships(&self) -> &[Relationship] {
        &self.target_relationships
    }

    /// Add a target relationship
    pub fn add_target_relationship(&mut self, relationship: Relationship) {
        self.target_relationships.push(relationship);
    }

    /// Declared searches
    pub fn searches(&self) -> &[SearchType] {
        &self.searches
    }

    /// Add a search
    pub fn add_search(&mut self, search: SearchType) {
        self.searches.push(search);
    }

    /// Find a search by name
    pub fn find_search(&self, search_path: &str) -> Option<&SearchType> {
        self.searches.iter().find(|search| search.name() == search_path)
    }
}

impl NamedType for ClassType {
    fn name(&self) -> &str {
        &self.name
    }

    fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }
}

impl PartialEq for ClassType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ClassType {}

impl Hash for ClassType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for ClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChoiceType, IntervalType, ListType, SimpleType};
    use pretty_assertions::assert_eq;

    fn simple(name: &str) -> DataType {
        SimpleType::new(name).unwrap().into()
    }

    fn element(name: &str, element_type: DataType) -> ClassTypeElement {
        ClassTypeElement::new(name, element_type).unwrap()
    }

    fn class_with(name: &str, elements: Vec<ClassTypeElement>) -> ClassType {
        let mut class = ClassType::new(name).unwrap();
        class.add_elements(elements).unwrap();
        class
    }

    #[test]
    fn test_class_requires_name() {
        assert!(matches!(
            ClassType::new(""),
            Err(ModelError::InvalidArgument { .. })
        ));
        assert!(ClassTypeElement::new("", simple("String")).is_err());
    }

    #[test]
    fn test_equality_by_name_only() {
        let first = class_with("Foo", vec![element("a", simple("String"))]);
        let second = class_with("Foo", vec![element("b", simple("Integer"))]);
        assert_eq!(first, second);
        assert_ne!(first, class_with("Bar", vec![]));
    }

    #[test]
    fn test_add_element_appends() {
        let class = class_with(
            "Patient",
            vec![element("id", simple("String")), element("active", simple("Boolean"))],
        );
        let names: Vec<_> = class.elements().iter().map(ClassTypeElement::name).collect();
        assert_eq!(names, vec!["id", "active"]);
    }

    #[test]
    fn test_tuple_view_includes_inherited_elements() {
        let base = class_with("Resource", vec![element("id", simple("String"))]);
        let derived = class_with("Patient", vec![element("active", simple("Boolean"))])
            .with_base_type(base.into());

        let tuple = derived.tuple_type();
        let names: Vec<_> = tuple.elements().iter().map(TupleTypeElement::name).collect();
        assert_eq!(names, vec!["id", "active"]);
    }

    #[test]
    fn test_narrowing_override_replaces_inherited_element() {
        let vocabulary = simple("Vocabulary");
        let value_set: DataType = SimpleType::new("ValueSet")
            .unwrap()
            .with_base_type(vocabulary.clone())
            .into();

        let base = class_with(
            "Base",
            vec![element("binding", vocabulary), element("id", simple("String"))],
        );
        let mut derived = ClassType::new("Derived")
            .unwrap()
            .with_base_type(base.into());
        derived.add_element(element("binding", value_set.clone())).unwrap();

        let all: Vec<String> = derived.all_elements().iter().map(|e| e.to_string()).collect();
        assert_eq!(all, vec!["binding:ValueSet", "id:String"]);

        let tuple = derived.tuple_type();
        assert_eq!(tuple.len(), 2);
        assert_eq!(tuple.element("binding").map(|e| e.element_type()), Some(&value_set));
    }

    #[test]
    fn test_incompatible_redeclaration_is_rejected() {
        let base = class_with("Base", vec![element("value", simple("Integer"))]);
        let mut derived = ClassType::new("Derived")
            .unwrap()
            .with_base_type(base.into());

        let err = derived.add_element(element("value", simple("String"))).unwrap_err();
        assert_eq!(
            err,
            ModelError::InvalidRedeclaration {
                class_name: "Derived".to_string(),
                element_name: "value".to_string(),
                original_type: "Integer".to_string(),
                redeclared_type: "String".to_string(),
            }
        );
        assert!(derived.elements().is_empty());
    }

    #[test]
    fn test_redeclaration_of_wrapped_and_generic_elements() {
        let integer = simple("Integer");
        let mut base = class_with(
            "Base",
            vec![
                element("items", ListType::new(integer.clone()).into()),
                element("period", IntervalType::new(integer.clone()).into()),
                element(
                    "value",
                    ChoiceType::new(vec![integer.clone(), simple("String")]).into(),
                ),
                element("payload", TypeParameter::new("T").unwrap().into()),
            ],
        );
        base.add_generic_parameter(TypeParameter::new("T").unwrap());

        let mut derived = ClassType::new("Derived")
            .unwrap()
            .with_base_type(base.into());
        derived.add_element(element("items", integer.clone())).unwrap();
        derived.add_element(element("period", integer.clone())).unwrap();
        derived.add_element(element("value", integer)).unwrap();
        derived.add_element(element("payload", simple("Anything"))).unwrap();
        assert_eq!(derived.elements().len(), 4);
    }

    #[test]
    fn test_prohibited_element_hidden_from_tuple_view() {
        let base = class_with(
            "Base",
            vec![element("id", simple("String")), element("extension", simple("String"))],
        );
        let mut derived = ClassType::new("Profile")
            .unwrap()
            .with_base_type(base.into());
        derived
            .add_element(element("extension", simple("String")).with_prohibited(true))
            .unwrap();

        let names: Vec<_> = derived
            .tuple_type()
            .elements()
            .iter()
            .map(TupleTypeElement::name)
            .collect();
        assert_eq!(names, vec!["id"]);
    }

    #[test]
    fn test_tuple_cache_invalidated_on_mutation() {
        let mut class = class_with("Patient", vec![element("id", simple("String"))]);
        assert_eq!(class.tuple_type().len(), 1);

        class.add_element(element("active", simple("Boolean"))).unwrap();
        assert_eq!(class.tuple_type().len(), 2);
    }

    #[test]
    fn test_generic_parameter_lookup_falls_back_to_base() {
        let mut base = ClassType::new("List").unwrap();
        base.add_generic_parameter(TypeParameter::new("T").unwrap());
        let mut derived = ClassType::new("Pair")
            .unwrap()
            .with_base_type(base.into());
        derived.add_generic_parameter(TypeParameter::new("U").unwrap());

        assert!(derived.generic_parameter_by_identifier("u", true).is_some());
        assert!(derived.generic_parameter_by_identifier("t", true).is_none());
        assert_eq!(
            derived
                .generic_parameter_by_identifier("t", false)
                .map(TypeParameter::identifier),
            Some("T")
        );
        assert!(derived.is_generic());
    }

    #[test]
    fn test_element_display_flags() {
        let element = element("name", simple("String"))
            .with_prohibited(true)
            .with_one_based(true)
            .with_target("%value.name");
        assert_eq!(
            element.to_string(),
            "name:String (prohibited) (one-based) (target: %value.name)"
        );
    }

    #[test]
    fn test_metadata() {
        let mut class = ClassType::new("FHIR.Observation").unwrap();
        class.set_label("Observation");
        class.set_retrievable(true);
        class.set_primary_code_path("code");
        class.add_search(SearchType::new("subject", "subject", None).unwrap());

        assert_eq!(class.namespace(), "FHIR");
        assert_eq!(class.simple_name(), "Observation");
        assert!(class.is_retrievable());
        assert_eq!(class.primary_code_path(), Some("code"));
        assert!(class.find_search("subject").is_some());
        assert!(class.find_search("patient").is_none());
        assert_eq!(DataType::from(class).to_label(), "Observation");
    }
}
