//! print the value of an attribute
use crate::address::Address;
use crate::editor::{Document, Sink};
use std::convert::Infallible;

/// [Sink] that writes the value expression of the addressed attribute
///
/// A missing block or attribute produces empty output.
#[derive(derive_new::new, Debug, Clone)]
pub struct GetAttribute {
    address: Address,
}

impl Sink for GetAttribute {
    type Error = Infallible;

    fn sink(&self, document: &Document) -> Result<Vec<u8>, Self::Error> {
        let value = self.address.resolve(&document.body).and_then(|body| {
            body.attributes()
                .find(|attribute| attribute.key.value().as_str() == self.address.attribute())
        });

        let Some(attribute) = value else {
            tracing::debug!(address = %self.address, "attribute not found");
            return Ok(Vec::new());
        };

        Ok(format!("{}\n", attribute.value.to_string().trim()).into_bytes())
    }
}
