//! Generic class signature parsing
//!
//! Two forms are understood:
//!
//! - declarations such as `List<T>` or `MyType<M extends Collection, N>`, which
//!   produce a class carrying the declared type parameters
//! - bound signatures such as `List<Person>` or `Map<String, List<Person>>`,
//!   which produce a class named by the escaped signature (`List[Person]`)
//!   whose fields are the generic class's parameter-typed fields with the
//!   arguments substituted
//!
//! Bound types are cached in the [`TypeRegistry`] under their escaped name, so
//! resolving the same signature twice yields the same shared instance.
//!
//! Signature validity is a shallow check on bracket counts and ordering, not a
//! nesting validator: `Map<List<A>, List<B>>` is rejected and some malformed
//! interleavings are accepted.

use std::sync::Arc;

use log::{debug, trace};

use crate::{
    ClassType, ClassTypeElement, DataType, ModelError, Result, TypeParameter,
    TypeParameterConstraint, TypeRegistry,
};

/// Opening generic delimiter
pub const OPEN_BRACKET: char = '<';
/// Closing generic delimiter
pub const CLOSE_BRACKET: char = '>';
/// Keyword introducing a type parameter bound (case-insensitive)
pub const EXTENDS: &str = "extends";

/// Check if `signature` has the shape of a generic signature
///
/// Requires at least one `<`, as many `>` as `<`, and the last `<` before the
/// first `>`.
pub fn is_valid_generic_signature(signature: &str) -> bool {
    let open = signature.matches(OPEN_BRACKET).count();
    let close = signature.matches(CLOSE_BRACKET).count();
    if open == 0 || open != close {
        return false;
    }
    match (signature.rfind(OPEN_BRACKET), signature.find(CLOSE_BRACKET)) {
        (Some(last_open), Some(first_close)) => last_open < first_close,
        _ => false,
    }
}

/// Registry key of a bound signature: `List<Person>` becomes `List[Person]`
pub fn escape_nested_angle_brackets(signature: &str) -> String {
    signature.replace(OPEN_BRACKET, "[").replace(CLOSE_BRACKET, "]")
}

/// Split `Name<args>` into the name and the text between the first `<` and the
/// last `>`
pub fn split_signature(signature: &str) -> Option<(&str, &str)> {
    let open = signature.find(OPEN_BRACKET)?;
    let close = signature.rfind(CLOSE_BRACKET)?;
    (open < close).then(|| (signature[..open].trim(), &signature[open + 1..close]))
}

/// Split a parameter list on its top-level commas
///
/// Commas nested inside `<...>` stay part of their token, so
/// `K, List<A, B>` yields `K` and `List<A, B>`. Tokens are trimmed.
pub fn split_parameters(parameters: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for c in parameters.chars() {
        match c {
            OPEN_BRACKET => depth += 1,
            CLOSE_BRACKET => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                tokens.push(current.trim().to_string());
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    tokens.push(current.trim().to_string());
    tokens
}

/// Parser turning generic signatures into class types
///
/// Types are resolved through, and bound types recorded in, the borrowed
/// registry. A failed parse leaves behind whatever nested bound types it
/// completed before the failure.
pub struct GenericClassSignatureParser<'a> {
    generic_signature: String,
    base_type: Option<String>,
    bound_type_name: Option<String>,
    resolved_types: &'a mut TypeRegistry,
}

impl<'a> GenericClassSignatureParser<'a> {
    /// Create a parser for `generic_signature`
    pub fn new(generic_signature: impl Into<String>, resolved_types: &'a mut TypeRegistry) -> Self {
        Self {
            generic_signature: generic_signature.into(),
            base_type: None,
            bound_type_name: None,
            resolved_types,
        }
    }

    /// Set the base type signature (e.g. `List<M>`)
    pub fn with_base_type(mut self, base_type: impl Into<String>) -> Self {
        self.base_type = Some(base_type.into());
        self
    }

    /// Set the alias a bound signature is registered under (e.g. `PersonList`)
    pub fn with_bound_type_name(mut self, bound_type_name: impl Into<String>) -> Self {
        self.bound_type_name = Some(bound_type_name.into());
        self
    }

    /// Check if the configured signature is a generic signature
    pub fn is_valid_generic_signature(&self) -> bool {
        is_valid_generic_signature(&self.generic_signature)
    }

    /// Parse the configured signature as a class declaration
    ///
    /// A signature without brackets declares a plain class. When a base type
    /// signature is set, the class derives from the base's generic class, and
    /// each concrete base argument copies the base fields typed by the
    /// parameter at that position. Single-character base arguments naming one
    /// of the declared parameters stay symbolic.
    pub fn parse_generic_signature(&mut self) -> Result<ClassType> {
        let signature = self.generic_signature.clone();
        let (type_name, parameters) = if self.is_valid_generic_signature() {
            split_signature(&signature)
                .map(|(name, parameters)| (name, split_parameters(parameters)))
                .ok_or_else(|| ModelError::invalid_syntax(&signature, "unbalanced brackets"))?
        } else {
            (signature.trim(), Vec::new())
        };

        let base_signature = self.base_type.clone();
        let (base_name, base_arguments) = match base_signature.as_deref() {
            Some(base) if base.contains(OPEN_BRACKET) => {
                let (name, arguments) = split_signature(base)
                    .ok_or_else(|| ModelError::invalid_syntax(base, "unbalanced brackets"))?;
                (Some(name), Some(split_parameters(arguments)))
            }
            Some(base) => (Some(base.trim()), None),
            None => (None, None),
        };

        let base_data_type = base_name
            .map(|name| self.resolve_type_name(name))
            .transpose()?;

        let mut class = ClassType::new(type_name)?;
        if let Some(base) = &base_data_type {
            class = class.with_base_type(base.clone());
        }
        for parameter in &parameters {
            class.add_generic_parameter(self.handle_parameter_declaration(parameter)?);
        }

        if let (Some(base), Some(arguments)) = (&base_data_type, base_arguments) {
            self.bind_base_arguments(&mut class, base, &arguments)?;
        }

        debug!(
            "parsed {} with {} generic parameter(s)",
            class.name(),
            class.generic_parameters().len()
        );
        Ok(class)
    }

    /// Resolve the configured signature as a binding
    ///
    /// When a bound type name is set, the result is also registered under it.
    pub fn parse_bound_signature(&mut self) -> Result<Arc<ClassType>> {
        let signature = self.generic_signature.clone();
        let resolved = self.resolve_type_name(&signature)?;
        let class = resolved.as_class().cloned().ok_or_else(|| {
            ModelError::invalid_syntax(&signature, format!("{resolved} is not a class type"))
        })?;

        if let Some(alias) = self.bound_type_name.clone() {
            debug!("registering {} as {alias}", class.name());
            self.resolved_types
                .insert(alias, DataType::Class(Arc::clone(&class)));
        }
        Ok(class)
    }

    /// Resolve a type name or bound signature
    ///
    /// Bound signatures are built (or fetched from the cache); plain names must
    /// already be registered.
    pub fn resolve_type_name(&mut self, type_name: &str) -> Result<DataType> {
        let type_name = type_name.trim();
        if is_valid_generic_signature(type_name) {
            Ok(DataType::Class(self.handle_bound_type(type_name)?))
        } else {
            self.resolve_type(type_name)
        }
    }

    fn resolve_type(&self, type_name: &str) -> Result<DataType> {
        self.resolved_types.resolve(type_name).cloned()
    }

    fn handle_parameter_declaration(&mut self, declaration: &str) -> Result<TypeParameter> {
        let parts: Vec<&str> = declaration.split_whitespace().collect();
        match parts.as_slice() {
            [identifier] if identifier.contains([OPEN_BRACKET, CLOSE_BRACKET]) => Err(
                ModelError::invalid_syntax(declaration, "a type parameter must be an identifier"),
            ),
            [identifier] => TypeParameter::new(*identifier),
            [identifier, keyword, type_name] if keyword.eq_ignore_ascii_case(EXTENDS) => {
                let constraint_type = self.resolve_type_name(type_name)?;
                TypeParameter::with_constraint(
                    *identifier,
                    TypeParameterConstraint::Type,
                    Some(constraint_type),
                )
            }
            _ => Err(ModelError::invalid_syntax(
                declaration,
                format!("expected `T` or `T {EXTENDS} Type`"),
            )),
        }
    }

    fn bind_base_arguments(
        &mut self,
        class: &mut ClassType,
        base: &DataType,
        arguments: &[String],
    ) -> Result<()> {
        let base_signature = self.base_type.clone().unwrap_or_default();
        let base_class = base.as_class().cloned().ok_or_else(|| {
            ModelError::invalid_syntax(&base_signature, format!("{base} is not a generic class"))
        })?;

        for (index, argument) in arguments.iter().enumerate() {
            if argument.chars().count() == 1 {
                if class.generic_parameter_by_identifier(argument, true).is_some() {
                    trace!("{argument} stays symbolic in {}", class.name());
                    continue;
                }
                return Err(ModelError::UnresolvedSymbol {
                    symbol: argument.clone(),
                    signature: self.generic_signature.clone(),
                });
            }

            let Some(base_parameter) = base_class.generic_parameters().get(index) else {
                return Err(ModelError::invalid_syntax(
                    &base_signature,
                    format!(
                        "{} declares {} generic parameter(s)",
                        base_class.name(),
                        base_class.generic_parameters().len()
                    ),
                ));
            };

            let bound = self.resolve_type_name(argument)?;
            debug!("{bound} replaces parameter {}", base_parameter.identifier());
            for element in parameter_typed_elements(&base_class, base_parameter) {
                class.add_element(element.with_type(bound.clone()))?;
            }
        }
        Ok(())
    }

    fn handle_bound_type(&mut self, signature: &str) -> Result<Arc<ClassType>> {
        let key = escape_nested_angle_brackets(signature);
        if let Some(cached) = self.resolved_types.get(&key) {
            trace!("{key} resolved from cache");
            return cached.as_class().cloned().ok_or_else(|| {
                ModelError::invalid_syntax(signature, format!("{key} is not a class type"))
            });
        }

        let (generic_name, arguments) = split_signature(signature)
            .ok_or_else(|| ModelError::invalid_syntax(signature, "unbalanced brackets"))?;
        let generic_type = self.resolve_type(generic_name)?;
        let generic_class = generic_type.as_class().cloned().ok_or_else(|| {
            ModelError::invalid_syntax(signature, format!("{generic_name} is not a class type"))
        })?;

        let arguments = split_parameters(arguments);
        let parameters = generic_class.generic_parameters();
        if arguments.len() > parameters.len() {
            return Err(ModelError::invalid_syntax(
                signature,
                format!(
                    "{generic_name} declares {} generic parameter(s) but {} were given",
                    parameters.len(),
                    arguments.len()
                ),
            ));
        }

        let mut bound_type = ClassType::new(key.as_str())?.with_base_type(generic_type);
        for (argument, parameter) in arguments.iter().zip(parameters) {
            let argument_type = self.resolve_type_name(argument)?;
            for element in parameter_typed_elements(&generic_class, parameter) {
                bound_type.add_element(element.with_type(argument_type.clone()))?;
            }
        }

        debug!("created bound type {key}");
        Ok(self.resolved_types.register_class(bound_type))
    }
}

/// Own elements of `class` typed by `parameter` (matched ignoring case)
fn parameter_typed_elements<'c>(
    class: &'c ClassType,
    parameter: &'c TypeParameter,
) -> impl Iterator<Item = &'c ClassTypeElement> {
    class.elements().iter().filter(move |element| {
        matches!(
            element.element_type(),
            DataType::Parameter(typed) if typed.identifier().eq_ignore_ascii_case(parameter.identifier())
        )
    })
}
