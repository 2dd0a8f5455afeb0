//! hcledit cli interface

use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Formatter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Read from a file instead of stdin
    #[clap(short = 'f', long = "file", global(true))]
    pub file: Option<PathBuf>,

    /// Write the result back to the file given with -f/--file
    #[clap(short = 'u', long = "update", global(true), requires("file"))]
    pub update: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Edit attributes
    #[command(subcommand)]
    Attribute(AttributeCommand),

    /// Inspect blocks
    #[command(subcommand)]
    Block(BlockCommand),
}

#[derive(Subcommand, Debug)]
pub enum AttributeCommand {
    /// Append a new attribute
    ///
    /// Does nothing if the block path does not exist. Fails if the attribute already exists.
    Append(AppendCommand),

    /// Print the value of an attribute
    Get(GetCommand),
}

#[derive(Parser, Debug)]
pub struct AppendCommand {
    /// Address of the new attribute, such as `block.label.attribute`
    pub address: String,

    /// Value expression, written as is
    pub value: String,

    /// Separate the new attribute from the previous one with an empty line
    #[clap(long)]
    pub newline: bool,
}

#[derive(Parser, Debug)]
pub struct GetCommand {
    /// Address of the attribute, such as `block.label.attribute`
    pub address: String,
}

#[derive(Subcommand, Debug)]
pub enum BlockCommand {
    /// List the addresses of all blocks
    List(ListCommand),
}

#[derive(Parser, Debug)]
pub struct ListCommand {
    #[arg(short = 'F', long = "output-format", default_value_t)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Default, Debug)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Yaml => f.write_str("yaml"),
        }
    }
}

impl From<OutputFormat> for hcledit::block_list::ListFormat {
    fn from(value: OutputFormat) -> Self {
        match value {
            OutputFormat::Text => Self::Text,
            OutputFormat::Json => Self::Json,
            OutputFormat::Yaml => Self::Yaml,
        }
    }
}
