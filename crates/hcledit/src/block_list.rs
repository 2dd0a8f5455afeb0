//! list the addresses of all blocks
//!
//! A block's address is its identifier followed by all of its labels, prefixed with the address of the enclosing
//! block: `b1.l1.b2.l2`. Blocks are listed depth first in document order.
use crate::editor::{Document, Sink};
use hcl_edit::structure::Body;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    /// one address per line
    #[default]
    Text,
    Json,
    Yaml,
}

/// [Sink] that writes block addresses instead of hcl
#[derive(derive_new::new, Debug, Default, Clone)]
pub struct ListBlocks {
    format: ListFormat,
}

impl ListBlocks {
    pub fn addresses(body: &Body) -> Vec<String> {
        let mut addresses = vec![];
        collect(body, None, &mut addresses);
        addresses
    }
}

fn collect(body: &Body, parent: Option<&str>, addresses: &mut Vec<String>) {
    for block in body.blocks() {
        let mut address = match parent {
            Some(parent) => format!("{parent}.{}", block.ident.value().as_str()),
            None => block.ident.value().to_string(),
        };
        for label in &block.labels {
            address.push('.');
            address.push_str(label.as_str());
        }

        addresses.push(address.clone());
        collect(&block.body, Some(&address), addresses);
    }
}

impl Sink for ListBlocks {
    type Error = ListError;

    fn sink(&self, document: &Document) -> Result<Vec<u8>, Self::Error> {
        let addresses = Self::addresses(&document.body);
        tracing::debug!(blocks = addresses.len(), format = ?self.format, "listing blocks");

        let output = match self.format {
            ListFormat::Text => addresses
                .iter()
                .map(|address| format!("{address}\n"))
                .collect::<String>()
                .into_bytes(),
            ListFormat::Json => {
                let mut output = serde_json::to_vec_pretty(&addresses)?;
                output.push(b'\n');
                output
            }
            ListFormat::Yaml => serde_yaml::to_string(&addresses)?.into_bytes(),
        };

        Ok(output)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ListError {
    #[error("unable to write json")]
    Json(#[from] serde_json::Error),
    #[error("unable to write yaml")]
    Yaml(#[from] serde_yaml::Error),
}
