//! # hcledit - edit hcl by address
//!
//! ## Introduction for developers
//!
//! ### HCL Terms
//!
//! - a file gets parsed as a `body`
//! - ...which is just a list of `structures`
//! - ...where there are two kinds:
//!   - `attribute`: a "key = value" pair
//!   - or `block`:
//!     - 1 `identifier`
//!     - followed by 0 or more `labels`
//!     - and a `body` enclosed in `{` and `}`
//!
//! ```hcl
//! a0 = v0
//!
//! b1 "l1" {
//!   a1 = v1
//! }
//! ```
//!
//! ### Addresses
//!
//! An [address::Address] points at an attribute: `a0` is the top level attribute above, `b1.l1.a1` the one inside
//! the block. Blocks are selected by identifier and first label.
//!
//! ### Pipeline
//!
//! Every edit runs the same three stages (see [editor]):
//!
//! 1. a [editor::Source] parses the input into an [editor::Document] (a [hcl_edit::structure::Body] and the line
//!    ending of the input)
//! 2. a [editor::Filter] mutates the body, for example [attribute_append::AppendAttribute]
//! 3. a [editor::Sink] serializes the body, either back to hcl ([editor::Formatter]) or into something else such
//!    as [block_list::ListBlocks]
//!
//! [hcl_edit] keeps whitespace and comments attached to each node, so everything a filter does not touch is written
//! back exactly as it was read. Line endings are the one exception: [hcl_edit] reads `\r\n` as `\n`, so
//! [editor::Formatter] puts them back based on [editor::LineEnding].
//!
//! ```
//! let mut output = Vec::new();
//! hcledit::attribute_append::append_attribute(
//!     "b1 \"l1\" {\n  a1 = v1\n}\n".as_bytes(),
//!     &mut output,
//!     "example.hcl",
//!     "b1.l1.a2",
//!     "v2",
//!     false,
//! )
//! .unwrap();
//!
//! assert_eq!(String::from_utf8(output).unwrap(), "b1 \"l1\" {\n  a1 = v1\n  a2 = v2\n}\n");
//! ```
pub mod address;
pub mod attribute_append;
pub mod attribute_get;
pub mod block_list;
pub mod editor;
