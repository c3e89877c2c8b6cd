//! Choice (union) types

use crate::DataType;

/// A flattened union of member types
///
/// Members are never choices themselves: nested choices are inlined at
/// construction. Duplicate members are kept as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChoiceType {
    types: Vec<DataType>,
}

impl ChoiceType {
    /// Create a choice type, flattening nested choices
    pub fn new(types: impl IntoIterator<Item = DataType>) -> Self {
        let mut choice = Self { types: Vec::new() };
        for member in types {
            choice.add_type(member);
        }
        choice
    }

    fn add_type(&mut self, member: DataType) {
        match member {
            DataType::Choice(nested) => {
                for inner in nested.types {
                    self.add_type(inner);
                }
            }
            other => self.types.push(other),
        }
    }

    /// Member types in declaration order
    pub fn types(&self) -> &[DataType] {
        &self.types
    }

    /// Every member of this choice is a subtype of some member of `other`
    pub fn is_subset_of(&self, other: &ChoiceType) -> bool {
        self.types.iter().all(|member| {
            other
                .types
                .iter()
                .any(|candidate| member.is_subtype_of(candidate))
        })
    }

    /// Every member of `other` is a subtype of some member of this choice
    pub fn is_superset_of(&self, other: &ChoiceType) -> bool {
        other.is_subset_of(self)
    }
}
