//! Simple (nominal leaf) types

use std::hash::{Hash, Hasher};

use crate::{ANY_TYPE_NAME, DataType, ModelError, NamedType, Result};

/// A nominal leaf type identified by name
///
/// Equality and hashing use the name only.
#[derive(Debug, Clone)]
pub struct SimpleType {
    name: String,
    base_type: Option<Box<DataType>>,
    target: Option<String>,
}

impl SimpleType {
    /// Create a simple type deriving from `System.Any`
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(ModelError::invalid_argument("SimpleType", "name"));
        }
        Ok(Self {
            name,
            base_type: None,
            target: None,
        })
    }

    /// The universal root type
    pub(crate) fn any() -> Self {
        Self {
            name: ANY_TYPE_NAME.to_string(),
            base_type: None,
            target: None,
        }
    }

    /// Set an explicit base type
    pub fn with_base_type(mut self, base_type: DataType) -> Self {
        self.base_type = Some(Box::new(base_type));
        self
    }

    /// Set the target mapping
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if this is the root type `System.Any`
    pub fn is_any(&self) -> bool {
        self.base_type.is_none() && self.name == ANY_TYPE_NAME
    }

    /// Base type, defaulting to `System.Any` for every type but the root
    pub fn base_type(&self) -> Option<&DataType> {
        match &self.base_type {
            Some(base_type) => Some(base_type),
            None if self.is_any() => None,
            None => Some(DataType::any()),
        }
    }
}

impl NamedType for SimpleType {
    fn name(&self) -> &str {
        &self.name
    }

    fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }
}

impl PartialEq for SimpleType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for SimpleType {}

impl Hash for SimpleType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_name_rejected() {
        assert!(matches!(
            SimpleType::new(""),
            Err(ModelError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_equality_ignores_base_type() {
        let plain = SimpleType::new("Code").unwrap();
        let based = SimpleType::new("Code")
            .unwrap()
            .with_base_type(SimpleType::new("Vocabulary").unwrap().into());
        assert_eq!(plain, based);
        assert_ne!(plain, SimpleType::new("Concept").unwrap());
    }

    #[test]
    fn test_root_detection() {
        assert!(SimpleType::any().is_any());
        assert!(!SimpleType::new("Integer").unwrap().is_any());
        assert!(SimpleType::new("Integer").unwrap().target().is_none());
    }
}
