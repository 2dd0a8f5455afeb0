//! edit pipeline ([Source] -> [Filter] -> [Sink])
//!
//! Every edit reads the whole input, parses it into a [Document], hands the document to a [Filter], and serializes
//! the result with a [Sink]. The stages run strictly one after another. Nothing is written unless all three succeed.
//!
//! There are two standard setups
//! - [Editor::filter_editor]: mutate the document and write it back as hcl ([Formatter])
//! - [Editor::sink_editor]: leave the document alone ([Noop]) and project it into some other output
use hcl_edit::structure::Body;
use std::convert::Infallible;
use std::io::{Read, Write};

/// Parsed hcl
///
/// [hcl_edit] keeps all whitespace and comments of the [Body] except for `\r`, so the line ending of the input is
/// tracked next to it.
#[derive(Debug, Clone)]
pub struct Document {
    pub body: Body,
    pub line_ending: LineEnding,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    /// [LineEnding::CrLf] only if every line ends with `\r\n`
    ///
    /// Mixed input is written back with `\n` only.
    pub fn detect(text: &str) -> Self {
        let lines = text.matches('\n').count();
        if lines > 0 && text.matches("\r\n").count() == lines {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        }
    }

    fn apply(self, text: String) -> String {
        match self {
            LineEnding::Lf => text,
            LineEnding::CrLf => text.replace("\r\n", "\n").replace('\n', "\r\n"),
        }
    }
}

impl From<Body> for Document {
    fn from(body: Body) -> Self {
        Self {
            body,
            line_ending: LineEnding::Lf,
        }
    }
}

/// Parses raw input into a [Document]
pub trait Source {
    fn source(&self, input: &[u8]) -> Result<Document, ParseError>;
}

/// Structural mutation of a parsed document
pub trait Filter {
    type Error: std::error::Error + Send + Sync + 'static;

    fn filter(&self, document: Document) -> Result<Document, Self::Error>;
}

/// Serializes a [Document] into output bytes
pub trait Sink {
    type Error: std::error::Error + Send + Sync + 'static;

    fn sink(&self, document: &Document) -> Result<Vec<u8>, Self::Error>;
}

/// hcl [Source]
///
/// `name` only shows up in error messages.
#[derive(Debug, Clone)]
pub struct Parser {
    name: String,
}

impl Parser {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Source for Parser {
    #[tracing::instrument(level = "trace", skip(input), fields(len = input.len()))]
    fn source(&self, input: &[u8]) -> Result<Document, ParseError> {
        let text = std::str::from_utf8(input).map_err(|err| {
            let (line, column) = line_column(&input[..err.valid_up_to()]);
            ParseError {
                name: self.name.clone(),
                line,
                column,
                message: "input is not valid utf-8".into(),
            }
        })?;

        let body = hcl_edit::parser::parse_body(text).map_err(|err| ParseError {
            name: self.name.clone(),
            line: err.location().line(),
            column: err.location().column(),
            message: err.message().to_string(),
        })?;

        Ok(Document {
            body,
            line_ending: LineEnding::detect(text),
        })
    }
}

/// 1-based line and column of the position right after `prefix`
fn line_column(prefix: &[u8]) -> (usize, usize) {
    let line = prefix.iter().filter(|b| **b == b'\n').count() + 1;
    let line_start = prefix
        .iter()
        .rposition(|b| *b == b'\n')
        .map_or(0, |pos| pos + 1);
    (line, prefix.len() - line_start + 1)
}

/// Round-trip hcl [Sink]
///
/// Untouched parts of the document keep their original whitespace, comments and line endings.
#[derive(Debug, Default, Clone, Copy)]
pub struct Formatter;

impl Sink for Formatter {
    type Error = Infallible;

    fn sink(&self, document: &Document) -> Result<Vec<u8>, Self::Error> {
        let text = document.body.to_string();
        Ok(document.line_ending.apply(text).into_bytes())
    }
}

/// Identity [Filter]
#[derive(Debug, Default, Clone, Copy)]
pub struct Noop;

impl Filter for Noop {
    type Error = Infallible;

    fn filter(&self, document: Document) -> Result<Document, Self::Error> {
        Ok(document)
    }
}

/// Runs one document through [Source], [Filter] and [Sink]
///
/// An editor holds no document state, each [Editor::edit] call parses a fresh [Document].
#[derive(derive_new::new, Debug, Clone)]
pub struct Editor<S, F, K> {
    source: S,
    filter: F,
    sink: K,
}

impl<F: Filter> Editor<Parser, F, Formatter> {
    /// Editor that applies `filter` and writes hcl
    pub fn filter_editor(name: impl Into<String>, filter: F) -> Self {
        Self::new(Parser::new(name), filter, Formatter)
    }
}

impl<K: Sink> Editor<Parser, Noop, K> {
    /// Editor that writes whatever `sink` makes of the unchanged document
    pub fn sink_editor(name: impl Into<String>, sink: K) -> Self {
        Self::new(Parser::new(name), Noop, sink)
    }
}

impl<S: Source, F: Filter, K: Sink> Editor<S, F, K> {
    /// Reads all of `reader`, edits it and writes the result to `writer`
    pub fn edit(&self, mut reader: impl Read, mut writer: impl Write) -> Result<(), EditError> {
        let mut input = Vec::new();
        reader.read_to_end(&mut input).map_err(EditError::Read)?;

        let document = self.source.source(&input)?;
        tracing::trace!(
            structures = document.body.len(),
            line_ending = ?document.line_ending,
            "parsed"
        );

        let document = self
            .filter
            .filter(document)
            .map_err(|err| EditError::Filter(err.into()))?;

        let output = self
            .sink
            .sink(&document)
            .map_err(|err| EditError::Sink(err.into()))?;
        tracing::trace!(len = output.len(), "serialized");

        writer.write_all(&output).map_err(EditError::Write)?;
        writer.flush().map_err(EditError::Write)
    }
}

/// Reads hcl from `reader`, applies `filter` and writes hcl to `writer`
pub fn filter_hcl(
    reader: impl Read,
    writer: impl Write,
    name: &str,
    filter: impl Filter,
) -> Result<(), EditError> {
    Editor::filter_editor(name, filter).edit(reader, writer)
}

/// Reads hcl from `reader` and writes the output of `sink` to `writer`
///
/// Meant for output that is not hcl, such as a listing.
pub fn sink_hcl(
    reader: impl Read,
    writer: impl Write,
    name: &str,
    sink: impl Sink,
) -> Result<(), EditError> {
    Editor::sink_editor(name, sink).edit(reader, writer)
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{name}:{line}:{column}: {message}")]
pub struct ParseError {
    pub name: String,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

#[derive(thiserror::Error, Debug)]
pub enum EditError {
    #[error("invalid edit")]
    Invalid(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("failed to read input")]
    Read(#[source] std::io::Error),
    #[error("failed to parse input")]
    Parse(#[from] ParseError),
    #[error("failed to apply edit")]
    Filter(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("failed to serialize output")]
    Sink(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("failed to write output")]
    Write(#[source] std::io::Error),
}

impl EditError {
    /// The error of the failed [Filter], if it is an `E`
    pub fn filter_error<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            EditError::Filter(err) => err.downcast_ref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, thiserror::Error)]
    #[error("rejected")]
    struct Rejected;

    struct Reject;

    impl Filter for Reject {
        type Error = Rejected;

        fn filter(&self, _document: Document) -> Result<Document, Self::Error> {
            Err(Rejected)
        }
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn round_trip(input: &str) -> String {
        let mut output = Vec::new();
        filter_hcl(input.as_bytes(), &mut output, "test", Noop).expect("must edit");
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn noop_round_trip() {
        let input = r#"
# comment
a0   =    v0 // trailing

b1 "l1" {
    a1 = "v1"

  /* odd indent */
  b2 {}
}
"#;
        assert_eq!(round_trip(input), input);
    }

    #[test]
    fn noop_round_trip_crlf() {
        let input = "a0 = v0\r\nb1 \"l1\" {\r\n  # comment\r\n  a1 = v1\r\n}\r\n";
        assert_eq!(round_trip(input), input);
    }

    #[test]
    fn line_ending_detection() {
        assert_eq!(LineEnding::detect(""), LineEnding::Lf);
        assert_eq!(LineEnding::detect("a = 1"), LineEnding::Lf);
        assert_eq!(LineEnding::detect("a = 1\n"), LineEnding::Lf);
        assert_eq!(LineEnding::detect("a = 1\r\nb = 2\r\n"), LineEnding::CrLf);
        assert_eq!(LineEnding::detect("a = 1\r\nb = 2\n"), LineEnding::Lf);
    }

    #[test]
    fn crlf_is_restored_everywhere() {
        let text = "a\nb\r\nc\n".to_string();
        assert_eq!(LineEnding::CrLf.apply(text.clone()), "a\r\nb\r\nc\r\n");
        assert_eq!(LineEnding::Lf.apply(text.clone()), text);
    }

    #[test]
    fn noop_round_trip_without_trailing_newline() {
        assert_eq!(round_trip("a = 1"), "a = 1");
    }

    #[test]
    fn parse_error_carries_name_and_position() {
        let mut output = Vec::new();
        let err = filter_hcl("a = 1\nb = = 2\n".as_bytes(), &mut output, "main.tf", Noop)
            .expect_err("must fail");

        let EditError::Parse(parse_error) = &err else {
            panic!("expected parse error, got {err:?}");
        };
        assert_eq!(parse_error.name, "main.tf");
        assert_eq!(parse_error.line, 2);
        assert!(output.is_empty());
    }

    #[test]
    fn invalid_utf8_is_a_parse_error() {
        let err = Parser::new("bin")
            .source(b"a = 1\nb = \xff\n")
            .expect_err("must fail");
        assert_eq!((err.line, err.column), (2, 5));
    }

    #[test]
    fn filter_error_writes_nothing() {
        let mut output = Vec::new();
        let err = filter_hcl("a = 1\n".as_bytes(), &mut output, "test", Reject)
            .expect_err("must fail");

        assert!(err.filter_error::<Rejected>().is_some());
        assert!(output.is_empty());
    }

    #[test]
    fn write_error() {
        let err = filter_hcl("a = 1\n".as_bytes(), BrokenWriter, "test", Noop)
            .expect_err("must fail");
        assert!(matches!(err, EditError::Write(_)));
    }

    #[test]
    fn line_column_positions() {
        assert_eq!(line_column(b""), (1, 1));
        assert_eq!(line_column(b"abc"), (1, 4));
        assert_eq!(line_column(b"a\nbc"), (2, 3));
        assert_eq!(line_column(b"a\n"), (2, 1));
    }
}
