mod cli;

use anyhow::Context;
use hcledit::address::Address;
use hcledit::attribute_append::AppendAttribute;
use hcledit::attribute_get::GetAttribute;
use hcledit::block_list::ListBlocks;
use hcledit::editor::Editor;
use std::io::{Read, Write};

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("HCLEDIT_LOG"))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

fn run(cli: cli::Cli) -> anyhow::Result<()> {
    use cli::{AttributeCommand, BlockCommand, Command};

    let input = read_input(&cli)?;
    let name = cli
        .file
        .as_ref()
        .map_or_else(|| "<stdin>".to_string(), |path| path.display().to_string());

    let mut output = Vec::new();
    match cli.command {
        Command::Attribute(AttributeCommand::Append(append)) => {
            let filter = AppendAttribute::new(&append.address, &append.value, append.newline)?;
            Editor::filter_editor(name, filter).edit(input.as_slice(), &mut output)?;
        }
        Command::Attribute(AttributeCommand::Get(get)) => {
            anyhow::ensure!(!cli.update, "--update can only be used with commands that edit hcl");
            let address: Address = get.address.parse()?;
            Editor::sink_editor(name, GetAttribute::new(address))
                .edit(input.as_slice(), &mut output)?;
        }
        Command::Block(BlockCommand::List(list)) => {
            anyhow::ensure!(!cli.update, "--update can only be used with commands that edit hcl");
            Editor::sink_editor(name, ListBlocks::new(list.format.into()))
                .edit(input.as_slice(), &mut output)?;
        }
    }

    match &cli.file {
        Some(path) if cli.update => {
            std::fs::write(path, &output)
                .with_context(|| format!("unable to update {}", path.display()))?;
            tracing::info!(path=%path.display(), "file updated");
        }
        _ => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&output)?;
            stdout.flush()?;
        }
    }

    Ok(())
}

fn read_input(cli: &cli::Cli) -> anyhow::Result<Vec<u8>> {
    match &cli.file {
        Some(path) => {
            tracing::info!(path=%path.display(), "loading file");
            std::fs::read(path).with_context(|| format!("unable to read {}", path.display()))
        }
        None => {
            let mut input = Vec::new();
            std::io::stdin()
                .read_to_end(&mut input)
                .context("unable to read stdin")?;
            Ok(input)
        }
    }
}
