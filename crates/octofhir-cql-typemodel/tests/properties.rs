//! Property tests for the type lattice

use octofhir_cql_typemodel::*;
use proptest::prelude::*;

const NAMES: &[&str] = &["Integer", "Decimal", "String", "Date", "DateTime", "Period", "Code"];

fn simple_type() -> impl Strategy<Value = DataType> {
    prop::sample::select(NAMES).prop_map(|name| SimpleType::new(name).unwrap().into())
}

fn data_type() -> impl Strategy<Value = DataType> {
    simple_type().prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(|element| ListType::new(element).into()),
            inner.clone().prop_map(|point| IntervalType::new(point).into()),
            prop::collection::vec(inner, 1..4).prop_map(|members| ChoiceType::new(members).into()),
        ]
    })
}

fn members() -> impl Strategy<Value = Vec<DataType>> {
    prop::collection::vec(simple_type(), 1..5)
}

proptest! {
    #[test]
    fn nested_choice_flattens(outer in members(), inner in members(), split in 0usize..5) {
        let split = split.min(outer.len());
        let mut nested: Vec<DataType> = outer[..split].to_vec();
        nested.push(ChoiceType::new(inner.clone()).into());
        nested.extend_from_slice(&outer[split..]);

        let mut inlined: Vec<DataType> = outer[..split].to_vec();
        inlined.extend(inner);
        inlined.extend_from_slice(&outer[split..]);

        prop_assert_eq!(ChoiceType::new(nested), ChoiceType::new(inlined));
    }

    #[test]
    fn subset_and_superset_are_consistent(x in members(), y in members()) {
        let x = ChoiceType::new(x);
        let y = ChoiceType::new(y);
        prop_assert_eq!(x.is_superset_of(&y), y.is_subset_of(&x));
        prop_assert_eq!(x.is_subset_of(&y), y.is_superset_of(&x));
    }

    #[test]
    fn tuple_equality_ignores_order(types in prop::collection::vec(data_type(), 1..6)) {
        let elements: Vec<TupleTypeElement> = types
            .into_iter()
            .enumerate()
            .map(|(index, element_type)| {
                TupleTypeElement::new(format!("e{index}"), element_type).unwrap()
            })
            .collect();
        let mut reversed = elements.clone();
        reversed.reverse();

        prop_assert_eq!(TupleType::new(elements), TupleType::new(reversed));
    }

    #[test]
    fn subtyping_is_reflexive(data_type in data_type()) {
        prop_assert!(data_type.is_subtype_of(&data_type));
        prop_assert!(data_type.is_supertype_of(&data_type));
        prop_assert!(data_type.is_compatible_with(&data_type));
    }

    #[test]
    fn every_type_derives_from_root(data_type in data_type()) {
        prop_assert!(data_type.is_subtype_of(DataType::any()));
        prop_assert!(DataType::any().is_supertype_of(&data_type));
        prop_assert!(!DataType::any().is_subtype_of(&data_type));
    }
}
