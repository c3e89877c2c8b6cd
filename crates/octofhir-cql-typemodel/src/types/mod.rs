//! Type variants of the CQL type model
//!
//! Each variant implements the shape-specific parts of the subtype,
//! compatibility and instantiation rules; [`crate::DataType`] dispatches to them.

mod choice;
mod class;
mod interval;
mod list;
mod parameter;
mod simple;
mod tuple;

pub use choice::*;
pub use class::*;
pub use interval::*;
pub use list::*;
pub use parameter::*;
pub use simple::*;
pub use tuple::*;
