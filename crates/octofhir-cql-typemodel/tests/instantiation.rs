//! Generic instantiation tests
//!
//! Tests binding through wrappers and tuples, conversion targets and the
//! ambiguity rule.

use octofhir_cql_typemodel::*;
use pretty_assertions::assert_eq;

fn simple(name: &str) -> DataType {
    SimpleType::new(name).unwrap().into()
}

fn parameter(name: &str) -> DataType {
    TypeParameter::new(name).unwrap().into()
}

fn interval(point: DataType) -> DataType {
    IntervalType::new(point).into()
}

#[test]
fn test_interval_of_parameter_binds_point_type() {
    let signature = interval(parameter("T"));
    let call = interval(simple("Date"));
    let mut context = BindingContext::new();

    assert!(signature.is_generic());
    assert!(signature.is_instantiable(&call, &mut context).unwrap());
    assert_eq!(signature.instantiate(&context).unwrap(), call);
}

#[test]
fn test_interval_through_single_conversion() {
    let date = simple("Date");
    let mut context = BindingContext::new().with_conversion(date.clone(), interval(date.clone()));
    let signature = interval(parameter("T"));

    assert!(signature.is_instantiable(&date, &mut context).unwrap());
    assert_eq!(context.binding("T"), Some(&date));
}

#[test]
fn test_no_conversion_target_is_not_instantiable() {
    let mut context = BindingContext::new();
    let signature = interval(parameter("T"));

    assert!(!signature.is_instantiable(&simple("Date"), &mut context).unwrap());
    assert!(context.binding("T").is_none());
}

#[test]
fn test_ambiguous_simple_conversion() {
    let numeric = simple("Numeric");
    let derived = |name: &str| -> DataType {
        SimpleType::new(name)
            .unwrap()
            .with_base_type(numeric.clone())
            .into()
    };
    let integer = simple("Integer");
    let mut context = BindingContext::new()
        .with_conversion(integer.clone(), derived("Decimal"))
        .with_conversion(integer.clone(), derived("Quantity"));

    let err = numeric.is_instantiable(&integer, &mut context).unwrap_err();
    assert!(matches!(err, ModelError::AmbiguousInstantiation { .. }));
    assert_eq!(err.code(), octofhir_cql_diagnostics::CQL0103);
    assert_eq!(
        err.to_string(),
        "Ambiguous generic instantiation involving Integer to Decimal and Quantity"
    );
}

#[test]
fn test_tuple_instantiation() {
    let signature = DataType::from(TupleType::new(vec![
        TupleTypeElement::new("low", parameter("T")).unwrap(),
        TupleTypeElement::new("high", parameter("T")).unwrap(),
    ]));
    let call = DataType::from(TupleType::new(vec![
        TupleTypeElement::new("high", simple("Integer")).unwrap(),
        TupleTypeElement::new("low", simple("Integer")).unwrap(),
    ]));
    let mut context = BindingContext::new();

    assert!(signature.is_instantiable(&call, &mut context).unwrap());
    assert_eq!(signature.instantiate(&context).unwrap(), call);

    let mismatched = DataType::from(TupleType::new(vec![
        TupleTypeElement::new("low", simple("Integer")).unwrap(),
        TupleTypeElement::new("high", simple("String")).unwrap(),
    ]));
    let mut context = BindingContext::new();
    assert!(!signature.is_instantiable(&mismatched, &mut context).unwrap());
}

#[test]
fn test_choice_instantiable_only_by_subtype() {
    let choice = DataType::from(ChoiceType::new(vec![simple("Integer"), simple("String")]));
    let mut context = BindingContext::new();

    assert!(choice.is_instantiable(&choice, &mut context).unwrap());
    assert!(!choice.is_instantiable(&simple("Integer"), &mut context).unwrap());
}
