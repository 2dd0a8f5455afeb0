//! dotted addresses of attributes
//!
//! `b1.l1.a2` addresses attribute `a2` in the body of block `b1 "l1" { ... }`. Every pair of components in front of
//! the attribute name selects one block (by identifier and first label), so a well-formed address always has an odd
//! number of components. A plain `a1` is a top level attribute.
//!
//! There is no escaping: labels that contain a `.` can not be addressed.
use hcl_edit::structure::{Block, Body};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const SEPARATOR: char = '.';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    blocks: Vec<BlockSelector>,
    attribute: String,
}

/// Selects a block by its identifier and its first label
#[derive(derive_new::new, Debug, Clone, PartialEq, Eq)]
pub struct BlockSelector {
    pub ident: String,
    pub label: String,
}

impl BlockSelector {
    pub fn matches(&self, block: &Block) -> bool {
        block.ident.value().as_str() == self.ident
            && block
                .labels
                .first()
                .is_some_and(|label| label.as_str() == self.label)
    }
}

impl Address {
    /// Block selectors, outermost first
    pub fn blocks(&self) -> &[BlockSelector] {
        &self.blocks
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Number of blocks between the document root and the attribute
    pub fn depth(&self) -> usize {
        self.blocks.len()
    }

    /// Finds the body the attribute lives in
    ///
    /// Walks down one block per selector, taking the first match in document order. `None` if some block on the way
    /// does not exist, which callers treat as "nothing to do" rather than an error.
    pub fn resolve<'b>(&self, body: &'b Body) -> Option<&'b Body> {
        let mut body = body;
        for selector in &self.blocks {
            let Some(block) = body.blocks().find(|block| selector.matches(block)) else {
                tracing::trace!(?selector, "block not found");
                return None;
            };
            body = &block.body;
        }

        Some(body)
    }

    /// Mutable version of [Address::resolve]
    pub fn resolve_mut<'b>(&self, body: &'b mut Body) -> Option<&'b mut Body> {
        let mut body = body;
        for selector in &self.blocks {
            let Some(block) = body.blocks_mut().find(|block| selector.matches(block)) else {
                tracing::trace!(?selector, "block not found");
                return None;
            };
            body = &mut block.body;
        }

        Some(body)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(address: &str) -> Result<Self, Self::Err> {
        if address.is_empty() {
            return Err(AddressError::Empty);
        }

        let mut components: Vec<&str> = address.split(SEPARATOR).collect();
        if components.iter().any(|component| component.is_empty()) {
            return Err(AddressError::EmptyComponent(address.to_string()));
        }

        if components.len() % 2 == 0 {
            return Err(AddressError::EvenComponents(address.to_string()));
        }

        let attribute = components
            .pop()
            .expect("odd number of components is never zero")
            .to_string();

        if !is_identifier(&attribute) {
            return Err(AddressError::InvalidAttributeName(attribute));
        }

        let blocks = components
            .chunks_exact(2)
            .map(|pair| BlockSelector::new(pair[0].to_string(), pair[1].to_string()))
            .collect();

        Ok(Self { blocks, attribute })
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for selector in &self.blocks {
            write!(f, "{}{SEPARATOR}{}{SEPARATOR}", selector.ident, selector.label)?;
        }
        f.write_str(&self.attribute)
    }
}

/// hcl identifier: a letter or `_`, followed by letters, digits, `_` or `-`
fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|first| first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("address is empty")]
    Empty,
    #[error("address {0:?} contains an empty component")]
    EmptyComponent(String),
    #[error("address {0:?} must be an attribute name, optionally preceded by block type and label pairs")]
    EvenComponents(String),
    #[error("{0:?} is not a valid attribute name")]
    InvalidAttributeName(String),
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn address(s: &str) -> Address {
        s.parse().expect("valid address")
    }

    fn body(s: &str) -> Body {
        hcl_edit::parser::parse_body(s).expect("body must parse")
    }

    /// value of attribute `id` in the resolved body
    fn resolved_id(body: &Body, addr: &str) -> Option<String> {
        let body = address(addr).resolve(body)?;
        let id = body
            .attributes()
            .find(|attribute| attribute.key.value().as_str() == "id")
            .map(|attribute| attribute.value.to_string().trim().to_string());
        Some(id.unwrap_or_default())
    }

    #[test]
    fn parse_top_level() {
        let addr = address("a1");
        assert!(addr.blocks().is_empty());
        assert_eq!(addr.attribute(), "a1");
        assert_eq!(addr.depth(), 0);
    }

    #[test]
    fn parse_nested() {
        let addr = address("b1.l1.b2.l2.a2");
        assert_eq!(
            addr.blocks(),
            &[
                BlockSelector::new("b1".into(), "l1".into()),
                BlockSelector::new("b2".into(), "l2".into()),
            ]
        );
        assert_eq!(addr.attribute(), "a2");
        assert_eq!(addr.to_string(), "b1.l1.b2.l2.a2");
    }

    #[test]
    fn parse_malformed() {
        assert_eq!("".parse::<Address>(), Err(AddressError::Empty));
        assert_eq!(
            "b1.a1".parse::<Address>(),
            Err(AddressError::EvenComponents("b1.a1".into()))
        );
        assert_eq!(
            "b1..a1".parse::<Address>(),
            Err(AddressError::EmptyComponent("b1..a1".into()))
        );
        assert_eq!(
            ".a1".parse::<Address>(),
            Err(AddressError::EmptyComponent(".a1".into()))
        );
        assert_eq!(
            "b1.l1.1a".parse::<Address>(),
            Err(AddressError::InvalidAttributeName("1a".into()))
        );
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier("a"));
        assert!(is_identifier("_a-b_1"));
        assert!(!is_identifier("-a"));
        assert!(!is_identifier("a b"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn resolve_root() {
        let doc = body("id = 0\n");
        assert_eq!(resolved_id(&doc, "x"), Some("0".into()));
    }

    #[test]
    fn resolve_nested() {
        let doc = body(
            r#"
b1 "l1" {
  id = 1
  b2 "l2" {
    id = 2
  }
}
"#,
        );
        assert_eq!(resolved_id(&doc, "b1.l1.x"), Some("1".into()));
        assert_eq!(resolved_id(&doc, "b1.l1.b2.l2.x"), Some("2".into()));
        assert_eq!(resolved_id(&doc, "b2.l2.x"), None);
    }

    #[test]
    fn resolve_mismatch_is_none() {
        let doc = body("b1 \"l1\" {}\nb1 {}\n");
        assert_eq!(resolved_id(&doc, "b2.l1.x"), None);
        assert_eq!(resolved_id(&doc, "b1.l2.x"), None);
    }

    #[test]
    fn resolve_matches_first_label_only() {
        let doc = body("b1 \"l1\" \"l2\" {\n  id = 1\n}\n");
        assert_eq!(resolved_id(&doc, "b1.l1.x"), Some("1".into()));
        assert_eq!(resolved_id(&doc, "b1.l2.x"), None);
    }

    #[test]
    fn resolve_identifier_labels() {
        let doc = body("b1 l1 {\n  id = 1\n}\n");
        assert_eq!(resolved_id(&doc, "b1.l1.x"), Some("1".into()));
    }

    #[test]
    fn resolve_takes_first_match() {
        let doc = body("b1 \"l1\" {\n  id = 1\n}\nb1 \"l1\" {\n  id = 2\n}\n");
        assert_eq!(resolved_id(&doc, "b1.l1.x"), Some("1".into()));
    }

    #[test]
    fn resolve_mut_reaches_same_body() {
        let mut doc = body("b1 \"l1\" {\n  b2 \"l2\" {}\n}\n");
        let addr = address("b1.l1.b2.l2.x");
        let target = addr.resolve_mut(&mut doc).expect("must resolve");
        assert!(target.is_empty());
        assert!(address("b1.l1.b3.l2.x").resolve_mut(&mut doc).is_none());
    }
}
