//! Interval types

use crate::instantiation::{InstantiationContext, single_conversion_target};
use crate::{DataType, Result};

/// An interval over a point type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IntervalType {
    point_type: Box<DataType>,
}

impl IntervalType {
    /// Create an interval type
    pub fn new(point_type: DataType) -> Self {
        Self {
            point_type: Box::new(point_type),
        }
    }

    /// Point type
    pub fn point_type(&self) -> &DataType {
        &self.point_type
    }

    /// Check if this interval type can be instantiated from `call_type`
    pub fn is_instantiable(
        &self,
        call_type: &DataType,
        context: &mut dyn InstantiationContext,
    ) -> Result<bool> {
        if let DataType::Interval(interval) = call_type {
            return self.point_type.is_instantiable(interval.point_type(), context);
        }

        let targets = context.interval_conversion_targets(call_type);
        single_conversion_target(call_type, targets, |target| {
            self.point_type.is_instantiable(target.point_type(), context)
        })
    }
}
