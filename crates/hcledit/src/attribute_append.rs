//! append a new attribute to a body
//!
//! The three possible outcomes of [AppendAttribute]
//! - the block path does not exist: document is returned unchanged, this is not an error
//! - the attribute already exists: [AppendError::AttributeExists], append never overwrites
//! - otherwise the attribute is added as the last item of the addressed body
//!
//! The new attribute is written after everything else in the body, including trailing comments. It takes the
//! indentation of the previous item, or two spaces per nesting level if there is none. A one-line body such as
//! `b "l" { a = 1 }` is expanded to one item per line first.
use crate::address::{Address, AddressError};
use crate::editor::{Document, EditError, Editor, Filter};
use hcl_edit::repr::Decorate;
use hcl_edit::structure::{Attribute, Body, Structure};
use std::io::{Read, Write};

const INDENT: &str = "  ";

#[derive(Debug, Clone)]
pub struct AppendAttribute {
    address: Address,
    attribute: Attribute,
    newline: bool,
}

impl AppendAttribute {
    /// Validates `address` and `value` before any document is touched
    ///
    /// `value` is taken as is but has to be a single valid hcl expression. With `newline` the new attribute is
    /// separated from the previous item by an empty line, unless it ends up being the first item of its body.
    pub fn new(address: &str, value: &str, newline: bool) -> Result<Self, AppendError> {
        let address: Address = address.parse()?;
        let attribute = parse_attribute(address.attribute(), value)?;

        Ok(Self {
            address,
            attribute,
            newline,
        })
    }
}

/// Parses `name = value` as a standalone attribute
fn parse_attribute(name: &str, value: &str) -> Result<Attribute, AppendError> {
    let invalid = |source: Option<hcl_edit::parser::Error>| AppendError::InvalidValue {
        value: value.to_string(),
        source,
    };

    let body = hcl_edit::parser::parse_body(&format!("{name} = {value}\n"))
        .map_err(|err| invalid(Some(err)))?;

    let mut structures = body.into_iter();
    match (structures.next(), structures.next()) {
        (Some(Structure::Attribute(attribute)), None) => Ok(attribute),
        _ => Err(invalid(None)),
    }
}

impl Filter for AppendAttribute {
    type Error = AppendError;

    #[tracing::instrument(level = "debug", skip_all, fields(address = %self.address))]
    fn filter(&self, mut document: Document) -> Result<Document, Self::Error> {
        let Some(target) = self.address.resolve_mut(&mut document.body) else {
            tracing::debug!("block not found, nothing to append");
            return Ok(document);
        };

        let name = self.address.attribute();
        if target
            .attributes()
            .any(|attribute| attribute.key.value().as_str() == name)
        {
            return Err(AppendError::AttributeExists(self.address.to_string()));
        }

        let depth = self.address.depth();
        if target.prefer_oneline() {
            expand_oneline(target, depth);
        }

        let indent = last_indent(target).unwrap_or_else(|| INDENT.repeat(depth));
        let blank = if self.newline && !target.is_empty() { "\n" } else { "" };
        let trailing = take_trailing_lines(target);

        let mut attribute = self.attribute.clone();
        attribute
            .decor_mut()
            .set_prefix(format!("{trailing}{blank}{indent}"));
        target.push(attribute);
        tracing::debug!(items = target.len(), "attribute appended");

        Ok(document)
    }
}

/// Rewrites `{ a = 1 }` or `{}` so that each item gets its own line
fn expand_oneline(body: &mut Body, depth: usize) {
    body.set_prefer_oneline(false);

    // a one-line body holds at most one item
    if let Some(mut structure) = body.pop() {
        let indent = INDENT.repeat(depth);
        match &mut structure {
            Structure::Attribute(attribute) => {
                attribute.decor_mut().set_prefix(indent);
                attribute.decor_mut().set_suffix("");
                attribute.value.decor_mut().set_suffix("");
            }
            Structure::Block(block) => {
                block.decor_mut().set_prefix(indent);
                block.decor_mut().set_suffix("");
            }
        }
        body.push(structure);
    }

    body.decor_mut().set_prefix("");
    body.decor_mut()
        .set_suffix(INDENT.repeat(depth.saturating_sub(1)));
}

/// Indentation of the last item in `body`, if it starts on its own line
fn last_indent(body: &Body) -> Option<String> {
    let prefix = match body.iter().last()? {
        Structure::Attribute(attribute) => attribute.decor().prefix(),
        Structure::Block(block) => block.decor().prefix(),
    }?;

    let line = prefix.rsplit('\n').next().unwrap_or_default();
    line.chars()
        .all(|c| c == ' ' || c == '\t')
        .then(|| line.to_string())
}

/// Removes whole lines (comments, empty lines) from the end of `body` and returns them
///
/// Whatever follows the last line break stays, that is the indentation of the closing `}`.
fn take_trailing_lines(body: &mut Body) -> String {
    let Some(suffix) = body.decor().suffix() else {
        return String::new();
    };
    let Some(end) = suffix.rfind('\n') else {
        return String::new();
    };

    let (lines, rest) = suffix.split_at(end + 1);
    let (lines, rest) = (lines.to_string(), rest.to_string());
    body.decor_mut().set_suffix(rest);
    lines
}

/// Reads hcl from `reader`, appends `address = value` and writes hcl to `writer`
///
/// Nothing is written when the attribute already exists.
pub fn append_attribute(
    reader: impl Read,
    writer: impl Write,
    name: &str,
    address: &str,
    value: &str,
    newline: bool,
) -> Result<(), EditError> {
    let filter = AppendAttribute::new(address, value, newline)
        .map_err(|err| EditError::Invalid(err.into()))?;
    Editor::filter_editor(name, filter).edit(reader, writer)
}

#[derive(thiserror::Error, Debug)]
pub enum AppendError {
    #[error("invalid address")]
    Address(#[from] AddressError),
    #[error("{value:?} is not a valid hcl expression")]
    InvalidValue {
        value: String,
        #[source]
        source: Option<hcl_edit::parser::Error>,
    },
    #[error("attribute {0} already exists")]
    AttributeExists(String),
}
