//! Model contexts, relationships and searches attached to class types

use std::sync::Arc;

use crate::{ClassType, DataType, ModelError, Result};

/// A context a model can be evaluated in (e.g. `Patient`)
#[derive(Debug, Clone)]
pub struct ModelContext {
    name: String,
    class_type: Arc<ClassType>,
    keys: Vec<String>,
    birth_date_element: Option<String>,
}

impl ModelContext {
    /// Create a model context over a class type
    pub fn new(
        name: impl Into<String>,
        class_type: Arc<ClassType>,
        keys: impl IntoIterator<Item = String>,
        birth_date_element: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            class_type,
            keys: keys.into_iter().collect(),
            birth_date_element,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class_type(&self) -> &Arc<ClassType> {
        &self.class_type
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn birth_date_element(&self) -> Option<&str> {
        self.birth_date_element.as_deref()
    }
}

/// A link from a class to a model context through key elements
#[derive(Debug, Clone)]
pub struct Relationship {
    context: ModelContext,
    related_keys: Vec<String>,
}

impl Relationship {
    pub fn new(context: ModelContext, related_keys: impl IntoIterator<Item = String>) -> Self {
        Self {
            context,
            related_keys: related_keys.into_iter().collect(),
        }
    }

    pub fn context(&self) -> &ModelContext {
        &self.context
    }

    pub fn related_keys(&self) -> &[String] {
        &self.related_keys
    }
}

/// A named search path on a class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchType {
    name: String,
    path: String,
    search_type: Option<DataType>,
}

impl SearchType {
    /// Create a search; both name and path are required
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        search_type: Option<DataType>,
    ) -> Result<Self> {
        let name = name.into();
        let path = path.into();
        if name.is_empty() {
            return Err(ModelError::invalid_argument("SearchType", "name"));
        }
        if path.is_empty() {
            return Err(ModelError::invalid_argument("SearchType", "path"));
        }
        Ok(Self {
            name,
            path,
            search_type,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Type of the values the search yields, if declared
    pub fn search_type(&self) -> Option<&DataType> {
        self.search_type.as_ref()
    }
}
