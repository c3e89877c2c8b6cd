//! List types

use crate::instantiation::{InstantiationContext, single_conversion_target};
use crate::{DataType, Result};

/// A list of an element type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListType {
    element_type: Box<DataType>,
}

impl ListType {
    /// Create a list type
    pub fn new(element_type: DataType) -> Self {
        Self {
            element_type: Box::new(element_type),
        }
    }

    /// Element type
    pub fn element_type(&self) -> &DataType {
        &self.element_type
    }

    /// Check if this list type can be instantiated from `call_type`
    ///
    /// A list call type binds element-wise; anything else goes through the
    /// context's list conversion targets.
    pub fn is_instantiable(
        &self,
        call_type: &DataType,
        context: &mut dyn InstantiationContext,
    ) -> Result<bool> {
        if let DataType::List(list) = call_type {
            return self.element_type.is_instantiable(list.element_type(), context);
        }

        let targets = context.list_conversion_targets(call_type);
        single_conversion_target(call_type, targets, |target| {
            self.element_type
                .is_instantiable(target.element_type(), context)
        })
    }
}
