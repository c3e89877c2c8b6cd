//! Model script parser using winnow
//!
//! A script holds one statement per line; `#` starts a comment.
//!
//! ```text
//! class Collection
//! class List<T> { element: T, size: Integer }
//! class MyList<M extends Collection> extends List<M>
//! bind CollectionList = List<Collection>
//! ```

use std::fmt;

use octofhir_cql_diagnostics::{CQL0002, Diagnostic};
use winnow::ascii::{Caseless, space0, space1};
use winnow::combinator::{alt, opt, preceded, repeat, separated};
use winnow::error::{StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{literal, take_while};

/// A script statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `class <signature> [extends <base>] [{ fields }]`
    Class(ClassDeclaration),
    /// `bind <name> = <bound signature>`
    Bind { name: String, signature: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDeclaration {
    pub signature: String,
    pub base: Option<String>,
    pub fields: Vec<FieldDeclaration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDeclaration {
    pub name: String,
    pub type_name: String,
}

/// A statement with its 1-based line number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub statement: Statement,
}

/// A failure tied to a script line
#[derive(Debug, Clone)]
pub struct ScriptError {
    pub line: usize,
    pub diagnostic: Diagnostic,
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.diagnostic)
    }
}

impl std::error::Error for ScriptError {}

/// Parse a model script
pub fn parse_script(source: &str) -> Result<Vec<ScriptLine>, ScriptError> {
    let mut statements = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let text = match raw.find('#') {
            Some(comment) => &raw[..comment],
            None => raw,
        }
        .trim();
        if text.is_empty() {
            continue;
        }

        let parsed = statement.parse(text).map_err(|e| ScriptError {
            line: index + 1,
            diagnostic: Diagnostic::error(
                CQL0002,
                format!("invalid statement at column {}: {}", e.offset() + 1, e.inner())
                    .trim_end_matches(": ")
                    .to_string(),
            ),
        })?;
        statements.push(ScriptLine {
            line: index + 1,
            statement: parsed,
        });
    }
    Ok(statements)
}

fn statement(input: &mut &str) -> ModalResult<Statement> {
    alt((class_statement, bind_statement))
        .context(StrContext::Expected(StrContextValue::StringLiteral("class")))
        .context(StrContext::Expected(StrContextValue::StringLiteral("bind")))
        .parse_next(input)
}

fn class_statement(input: &mut &str) -> ModalResult<Statement> {
    (literal("class"), space1).void().parse_next(input)?;
    let declared = signature.parse_next(input)?;
    let base = opt(preceded((space1, literal(Caseless("extends")), space1), signature))
        .parse_next(input)?;
    let fields = opt(preceded(space0, field_list)).parse_next(input)?;
    space0.parse_next(input)?;

    Ok(Statement::Class(ClassDeclaration {
        signature: declared.to_string(),
        base: base.map(str::to_string),
        fields: fields.unwrap_or_default(),
    }))
}

fn bind_statement(input: &mut &str) -> ModalResult<Statement> {
    (literal("bind"), space1).void().parse_next(input)?;
    let name = identifier.parse_next(input)?;
    (space0, '=', space0).void().parse_next(input)?;
    let bound = signature.parse_next(input)?;
    space0.parse_next(input)?;

    Ok(Statement::Bind {
        name: name.to_string(),
        signature: bound.to_string(),
    })
}

fn field_list(input: &mut &str) -> ModalResult<Vec<FieldDeclaration>> {
    ('{', space0).void().parse_next(input)?;
    let fields: Vec<FieldDeclaration> =
        separated(0.., field, (space0, ',', space0)).parse_next(input)?;
    (space0, '}')
        .void()
        .context(StrContext::Expected(StrContextValue::CharLiteral('}')))
        .parse_next(input)?;
    Ok(fields)
}

fn field(input: &mut &str) -> ModalResult<FieldDeclaration> {
    let name = identifier.parse_next(input)?;
    (space0, ':', space0).void().parse_next(input)?;
    let type_name = signature.parse_next(input)?;
    Ok(FieldDeclaration {
        name: name.to_string(),
        type_name: type_name.to_string(),
    })
}

/// A type name with an optional bracketed argument list, taken verbatim
fn signature<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    (identifier, opt(type_arguments)).take().parse_next(input)
}

fn type_arguments(input: &mut &str) -> ModalResult<()> {
    '<'.parse_next(input)?;
    let () = repeat(
        0..,
        alt((
            type_arguments,
            take_while(1.., |c: char| c != '<' && c != '>').void(),
        )),
    )
    .parse_next(input)?;
    '>'.context(StrContext::Expected(StrContextValue::CharLiteral('>')))
        .parse_next(input)?;
    Ok(())
}

fn identifier<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_' || c == '.')
        .context(StrContext::Expected(StrContextValue::Description(
            "identifier",
        )))
        .parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn class(signature: &str, base: Option<&str>, fields: &[(&str, &str)]) -> Statement {
        Statement::Class(ClassDeclaration {
            signature: signature.to_string(),
            base: base.map(str::to_string),
            fields: fields
                .iter()
                .map(|(name, type_name)| FieldDeclaration {
                    name: name.to_string(),
                    type_name: type_name.to_string(),
                })
                .collect(),
        })
    }

    #[rstest]
    #[case("class Collection", class("Collection", None, &[]))]
    #[case("class List<T> { element: T, size: Integer }", class("List<T>", None, &[("element", "T"), ("size", "Integer")]))]
    #[case("class MyList<M extends Collection> extends List<M>", class("MyList<M extends Collection>", Some("List<M>"), &[]))]
    #[case("class Pair<K, V> EXTENDS Base { value: Map<K, List<V>> }", class("Pair<K, V>", Some("Base"), &[("value", "Map<K, List<V>>")]))]
    #[case("class Empty {}", class("Empty", None, &[]))]
    #[case("bind PersonList = List<Person>", Statement::Bind { name: "PersonList".to_string(), signature: "List<Person>".to_string() })]
    fn test_statements(#[case] text: &str, #[case] expected: Statement) {
        let lines = parse_script(text).unwrap();
        assert_eq!(lines, vec![ScriptLine { line: 1, statement: expected }]);
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let source = "# model\n\nclass Person # a person\n  \nbind People = List<Person>\n";
        let lines: Vec<usize> = parse_script(source)
            .unwrap()
            .into_iter()
            .map(|line| line.line)
            .collect();
        assert_eq!(lines, vec![3, 5]);
    }

    #[rstest]
    #[case("klass Person")]
    #[case("class List<T")]
    #[case("class List<T> { element T }")]
    #[case("bind = List<Person>")]
    fn test_invalid_statements(#[case] text: &str) {
        let source = format!("class Ok\n{text}");
        let err = parse_script(&source).unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.diagnostic.code, CQL0002);
    }
}
