//! Type registry
//!
//! An explicit name to type store shared by signature parses. It doubles as the
//! memoization cache for bound generic types, whose keys use the escaped
//! signature form (`List[Person]`) so they never collide with plain names.
//!
//! Mutation requires `&mut self`: one registry has one writer at a time. Callers
//! resolving types concurrently use one registry per session or wrap it in a lock.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::{ClassType, DataType, ModelError, Result, SimpleType};

/// Name to type store with insertion order
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: IndexMap<String, DataType>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type under `name`, returning the type it replaced
    pub fn insert(&mut self, name: impl Into<String>, data_type: DataType) -> Option<DataType> {
        self.types.insert(name.into(), data_type)
    }

    /// Register a class under its own name and return the shared handle
    pub fn register_class(&mut self, class: ClassType) -> Arc<ClassType> {
        let class = Arc::new(class);
        self.types
            .insert(class.name().to_string(), DataType::Class(Arc::clone(&class)));
        class
    }

    /// Register a simple type under its own name
    pub fn register_simple(&mut self, simple: SimpleType) -> DataType {
        let name = simple.name().to_string();
        let data_type = DataType::Simple(simple);
        self.types.insert(name, data_type.clone());
        data_type
    }

    /// Look up a type by name
    pub fn get(&self, name: &str) -> Option<&DataType> {
        self.types.get(name)
    }

    /// Look up a type by name, failing with [`ModelError::UnknownType`]
    pub fn resolve(&self, name: &str) -> Result<&DataType> {
        self.get(name).ok_or_else(|| ModelError::unknown_type(name))
    }

    /// Look up a class by name
    pub fn get_class(&self, name: &str) -> Option<&Arc<ClassType>> {
        self.get(name).and_then(DataType::as_class)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered names and types in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DataType)> {
        self.types.iter().map(|(name, data_type)| (name.as_str(), data_type))
    }
}
