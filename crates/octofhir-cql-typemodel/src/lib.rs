//! CQL static type model
//!
//! This crate defines the closed algebra of types a CQL type-checker works with:
//! - Simple (nominal) types rooted at `System.Any`
//! - List, interval, tuple and choice types
//! - Class types with inheritance, generic parameters and a derived tuple view
//! - Unbound type parameters with constraint kinds
//!
//! It also provides the subtype/compatibility/instantiation algorithms over those
//! types and the [`GenericClassSignatureParser`] that turns signatures such as
//! `List<T>` or `List<Person>` into class types through a shared [`TypeRegistry`].

mod data_type;
mod error;
mod instantiation;
mod model_context;
mod registry;
mod signature;
mod specifier;
mod types;

pub use data_type::*;
pub use error::*;
pub use instantiation::*;
pub use model_context::*;
pub use registry::*;
pub use signature::*;
pub use specifier::*;
pub use types::*;
