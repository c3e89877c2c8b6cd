//! Applies model script statements to a type registry

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use octofhir_cql_typemodel::{
    ClassType, ClassTypeElement, DataType, GenericClassSignatureParser, Result, SimpleType,
    TypeRegistry,
};

use crate::script::{ClassDeclaration, ScriptError, Statement, parse_script};

/// System types available to every script, with their base type
const SYSTEM_TYPES: &[(&str, Option<&str>)] = &[
    ("Boolean", None),
    ("Integer", None),
    ("Long", None),
    ("Decimal", None),
    ("String", None),
    ("Date", None),
    ("DateTime", None),
    ("Time", None),
    ("Quantity", None),
    ("Ratio", None),
    ("Code", None),
    ("Concept", None),
    ("Vocabulary", None),
    ("ValueSet", Some("Vocabulary")),
    ("CodeSystem", Some("Vocabulary")),
];

/// A declared class or a named binding, in script order
#[derive(Debug, Clone)]
pub enum Entry {
    Class(Arc<ClassType>),
    Binding { alias: String, class: Arc<ClassType> },
}

/// Builds a registry from script statements
#[derive(Debug)]
pub struct Loader {
    registry: TypeRegistry,
    entries: Vec<Entry>,
    steps: Vec<String>,
}

impl Loader {
    /// Create a loader whose registry holds the system types
    ///
    /// System types are registered under both `System.X` and `X`.
    pub fn new() -> Result<Self> {
        let mut registry = TypeRegistry::new();
        for (name, base) in SYSTEM_TYPES {
            let mut simple = SimpleType::new(format!("System.{name}"))?;
            if let Some(base) = base {
                simple = simple.with_base_type(registry.resolve(base)?.clone());
            }
            let data_type = registry.register_simple(simple);
            registry.insert(*name, data_type);
        }
        registry.insert("Any", DataType::any().clone());
        registry.insert("System.Any", DataType::any().clone());

        Ok(Self {
            registry,
            entries: Vec::new(),
            steps: Vec::new(),
        })
    }

    /// Pre-register plain classes
    pub fn with_classes<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self> {
        for name in names {
            let class = self.registry.register_class(ClassType::new(name.as_ref())?);
            self.steps.push(format!("registered class {}", class.name()));
        }
        Ok(self)
    }

    /// Load a script file
    pub fn load_file(&mut self, path: &Path) -> anyhow::Result<()> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        self.load_source(&source)?;
        Ok(())
    }

    /// Load script text
    ///
    /// Statements are applied in order; the first failure stops loading and
    /// leaves the registry with everything applied before it.
    pub fn load_source(&mut self, source: &str) -> std::result::Result<(), ScriptError> {
        for script_line in parse_script(source)? {
            let line = script_line.line;
            self.apply(&script_line.statement)
                .map_err(|err| ScriptError {
                    line,
                    diagnostic: err.to_diagnostic(),
                })?;
        }
        Ok(())
    }

    fn apply(&mut self, statement: &Statement) -> Result<()> {
        match statement {
            Statement::Class(declaration) => {
                let class = self.declare_class(declaration)?;
                self.steps.push(format!(
                    "declared {} with {} generic parameter(s) and {} element(s)",
                    class.name(),
                    class.generic_parameters().len(),
                    class.elements().len()
                ));
                self.entries.push(Entry::Class(class));
            }
            Statement::Bind { name, signature } => {
                let class = GenericClassSignatureParser::new(signature.as_str(), &mut self.registry)
                    .with_bound_type_name(name.as_str())
                    .parse_bound_signature()?;
                self.steps
                    .push(format!("bound {name} to {}", class.name()));
                self.entries.push(Entry::Binding {
                    alias: name.clone(),
                    class,
                });
            }
        }
        Ok(())
    }

    fn declare_class(&mut self, declaration: &ClassDeclaration) -> Result<Arc<ClassType>> {
        let mut parser =
            GenericClassSignatureParser::new(declaration.signature.as_str(), &mut self.registry);
        if let Some(base) = &declaration.base {
            parser = parser.with_base_type(base.as_str());
        }
        let mut class = parser.parse_generic_signature()?;

        for field in &declaration.fields {
            let field_type = match class
                .generic_parameters()
                .iter()
                .find(|parameter| parameter.identifier() == field.type_name)
            {
                Some(parameter) => DataType::Parameter(parameter.clone()),
                None => self.resolve(&field.type_name)?,
            };
            class.add_element(ClassTypeElement::new(field.name.as_str(), field_type)?)?;
        }

        Ok(self.registry.register_class(class))
    }

    fn resolve(&mut self, type_name: &str) -> Result<DataType> {
        GenericClassSignatureParser::new(type_name, &mut self.registry).resolve_type_name(type_name)
    }

    /// Declared classes and bindings in script order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Resolution steps taken so far
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }
}
