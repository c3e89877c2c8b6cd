//! Generic instantiation policy
//!
//! The type model never decides which implicit conversions exist. It asks an
//! [`InstantiationContext`] for type parameter bindings and for conversion
//! targets, and enforces that at most one target is usable.

use indexmap::IndexMap;
use log::trace;

use crate::{DataType, IntervalType, ListType, ModelError, Result, SimpleType, TypeParameter};

/// Policy consulted while instantiating generic types at a call site
pub trait InstantiationContext {
    /// Check if `parameter` can bind to `call_type`, recording the binding
    fn is_instantiable(&mut self, parameter: &TypeParameter, call_type: &DataType) -> bool;

    /// The type bound to `parameter`
    fn instantiate(&self, parameter: &TypeParameter) -> DataType;

    /// Simple types `call_type` implicitly converts to
    fn simple_conversion_targets(&self, call_type: &DataType) -> Vec<SimpleType>;

    /// Interval types `call_type` implicitly converts to
    fn interval_conversion_targets(&self, call_type: &DataType) -> Vec<IntervalType>;

    /// List types `call_type` implicitly converts to
    fn list_conversion_targets(&self, call_type: &DataType) -> Vec<ListType>;
}

/// Check whether exactly one of `targets` satisfies `is_candidate`
///
/// Returns `Ok(false)` when none does and an ambiguity error naming the first
/// two candidates when more than one does.
pub(crate) fn single_conversion_target<T, F>(
    call_type: &DataType,
    targets: Vec<T>,
    mut is_candidate: F,
) -> Result<bool>
where
    T: Clone + Into<DataType>,
    F: FnMut(&T) -> Result<bool>,
{
    let mut found: Option<DataType> = None;
    for target in targets {
        if !is_candidate(&target)? {
            continue;
        }
        let target: DataType = target.into();
        if let Some(first) = found {
            return Err(ModelError::AmbiguousInstantiation {
                call_type: call_type.to_string(),
                first: first.to_string(),
                second: target.to_string(),
            });
        }
        found = Some(target);
    }

    if let Some(target) = &found {
        trace!("{call_type} instantiates through conversion to {target}");
    }
    Ok(found.is_some())
}

/// A reference [`InstantiationContext`] backed by explicit tables
///
/// The first call type a parameter is instantiated from becomes its binding.
/// Later call types are accepted when the binding is a supertype of them or
/// compatible with them, widen the binding when they are a supertype of it, or
/// are accepted through a registered conversion to the bound type.
#[derive(Debug, Clone, Default)]
pub struct BindingContext {
    bindings: IndexMap<String, DataType>,
    conversions: Vec<(DataType, DataType)>,
}

impl BindingContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an implicit conversion (builder form)
    pub fn with_conversion(mut self, from: DataType, to: DataType) -> Self {
        self.add_conversion(from, to);
        self
    }

    /// Register an implicit conversion
    pub fn add_conversion(&mut self, from: DataType, to: DataType) {
        self.conversions.push((from, to));
    }

    /// Bind a parameter explicitly
    pub fn bind(&mut self, identifier: impl Into<String>, data_type: DataType) {
        self.bindings.insert(identifier.into(), data_type);
    }

    /// The type bound to the parameter named `identifier`
    pub fn binding(&self, identifier: &str) -> Option<&DataType> {
        self.bindings.get(identifier)
    }

    /// Bindings in the order they were first made
    pub fn bindings(&self) -> impl Iterator<Item = (&str, &DataType)> {
        self.bindings.iter().map(|(name, bound)| (name.as_str(), bound))
    }

    /// Forget all bindings, keeping registered conversions
    pub fn clear_bindings(&mut self) {
        self.bindings.clear();
    }

    fn converts(&self, from: &DataType, to: &DataType) -> bool {
        self.conversions
            .iter()
            .any(|(source, target)| source == from && target == to)
    }

    fn targets_from<'a>(&'a self, call_type: &'a DataType) -> impl Iterator<Item = &'a DataType> {
        self.conversions
            .iter()
            .filter(move |(source, _)| source == call_type)
            .map(|(_, target)| target)
    }
}

impl InstantiationContext for BindingContext {
    fn is_instantiable(&mut self, parameter: &TypeParameter, call_type: &DataType) -> bool {
        let identifier = parameter.identifier();
        let Some(bound) = self.bindings.get(identifier) else {
            if !parameter.can_bind(call_type) {
                return false;
            }
            trace!("binding {identifier} to {call_type}");
            self.bindings.insert(identifier.to_string(), call_type.clone());
            return true;
        };

        if bound.is_supertype_of(call_type) || bound.is_compatible_with(call_type) {
            return true;
        }
        if call_type.is_supertype_of(bound) && parameter.can_bind(call_type) {
            trace!("widening {identifier} from {bound} to {call_type}");
            self.bindings.insert(identifier.to_string(), call_type.clone());
            return true;
        }
        self.converts(call_type, bound)
    }

    fn instantiate(&self, parameter: &TypeParameter) -> DataType {
        self.bindings
            .get(parameter.identifier())
            .or(parameter.constraint_type())
            .unwrap_or(DataType::any())
            .clone()
    }

    fn simple_conversion_targets(&self, call_type: &DataType) -> Vec<SimpleType> {
        self.targets_from(call_type)
            .filter_map(|target| match target {
                DataType::Simple(simple) => Some(simple.clone()),
                _ => None,
            })
            .collect()
    }

    fn interval_conversion_targets(&self, call_type: &DataType) -> Vec<IntervalType> {
        self.targets_from(call_type)
            .filter_map(|target| match target {
                DataType::Interval(interval) => Some(interval.clone()),
                _ => None,
            })
            .collect()
    }

    fn list_conversion_targets(&self, call_type: &DataType) -> Vec<ListType> {
        self.targets_from(call_type)
            .filter_map(|target| match target {
                DataType::List(list) => Some(list.clone()),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TypeParameterConstraint;
    use pretty_assertions::assert_eq;

    fn simple(name: &str) -> DataType {
        SimpleType::new(name).unwrap().into()
    }

    fn parameter(name: &str) -> DataType {
        TypeParameter::new(name).unwrap().into()
    }

    #[test]
    fn test_first_call_type_becomes_binding() {
        let mut context = BindingContext::new();
        let list_of_t = DataType::from(ListType::new(parameter("T")));
        let call = DataType::from(ListType::new(simple("Integer")));

        assert!(list_of_t.is_instantiable(&call, &mut context).unwrap());
        assert_eq!(context.binding("T"), Some(&simple("Integer")));
        assert_eq!(list_of_t.instantiate(&context).unwrap(), call);
    }

    #[test]
    fn test_conflicting_binding_is_rejected() {
        let mut context = BindingContext::new();
        let t = parameter("T");

        assert!(t.is_instantiable(&simple("Integer"), &mut context).unwrap());
        assert!(!t.is_instantiable(&simple("String"), &mut context).unwrap());
    }

    #[test]
    fn test_binding_widens_to_supertype() {
        let vocabulary = simple("Vocabulary");
        let value_set: DataType = SimpleType::new("ValueSet")
            .unwrap()
            .with_base_type(vocabulary.clone())
            .into();
        let mut context = BindingContext::new();
        let t = parameter("T");

        assert!(t.is_instantiable(&value_set, &mut context).unwrap());
        assert!(t.is_instantiable(&vocabulary, &mut context).unwrap());
        assert_eq!(context.binding("T"), Some(&vocabulary));
        assert!(t.is_instantiable(&value_set, &mut context).unwrap());
    }

    #[test]
    fn test_binding_accepts_registered_conversion() {
        let integer = simple("Integer");
        let decimal = simple("Decimal");
        let mut context = BindingContext::new().with_conversion(integer.clone(), decimal.clone());
        let t = parameter("T");

        assert!(t.is_instantiable(&decimal, &mut context).unwrap());
        assert!(t.is_instantiable(&integer, &mut context).unwrap());
        assert_eq!(context.binding("T"), Some(&decimal));
    }

    #[test]
    fn test_constraint_prevents_binding() {
        let mut context = BindingContext::new();
        let interval_only: DataType =
            TypeParameter::with_constraint("I", TypeParameterConstraint::Interval, None)
                .unwrap()
                .into();

        assert!(!interval_only.is_instantiable(&simple("Date"), &mut context).unwrap());
        assert!(context.binding("I").is_none());
    }

    #[test]
    fn test_unbound_parameter_instantiates_to_constraint_or_root() {
        let context = BindingContext::new();
        let bounded = TypeParameter::with_constraint(
            "T",
            TypeParameterConstraint::Type,
            Some(simple("Vocabulary")),
        )
        .unwrap();

        assert_eq!(context.instantiate(&bounded), simple("Vocabulary"));
        assert_eq!(
            context.instantiate(&TypeParameter::new("U").unwrap()),
            DataType::any().clone()
        );
    }

    #[test]
    fn test_single_simple_conversion_target() {
        let integer = simple("Integer");
        let decimal = simple("Decimal");
        let mut context = BindingContext::new().with_conversion(integer.clone(), decimal.clone());

        assert!(decimal.is_instantiable(&integer, &mut context).unwrap());
        assert!(!simple("String").is_instantiable(&integer, &mut context).unwrap());
    }

    #[test]
    fn test_ambiguous_list_conversion() {
        let vocabulary = simple("Vocabulary");
        let derived = |name: &str| -> DataType {
            SimpleType::new(name)
                .unwrap()
                .with_base_type(vocabulary.clone())
                .into()
        };
        let code = simple("Code");
        let mut context = BindingContext::new()
            .with_conversion(code.clone(), ListType::new(derived("ValueSet")).into())
            .with_conversion(code.clone(), ListType::new(derived("CodeSystem")).into());
        let list_of_vocabularies = DataType::from(ListType::new(vocabulary.clone()));

        let err = list_of_vocabularies
            .is_instantiable(&code, &mut context)
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::AmbiguousInstantiation {
                call_type: "Code".to_string(),
                first: "list<ValueSet>".to_string(),
                second: "list<CodeSystem>".to_string(),
            }
        );
    }
}
