//! `lineup config` command - column mapping files

use clap::Subcommand;
use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::input::mapping;
use crate::cli::output::{effective_format, print_structured};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::{save_mapping, DEFAULT_MAPPING_FILE};
use crate::entities::ColumnMapping;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write the default column mapping to a file for editing
    Init(InitArgs),

    /// Print the effective column mapping
    Show,
}

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Destination file; the extension selects YAML or JSON
    #[arg(long, short = 'o', default_value = DEFAULT_MAPPING_FILE)]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Init(args) => run_init(args, global),
        ConfigCommands::Show => run_show(global),
    }
}

fn run_init(args: InitArgs, global: &GlobalOpts) -> Result<()> {
    save_mapping(&ColumnMapping::default(), &args.output, args.force)?;
    if !global.quiet {
        println!(
            "{} Created column mapping {}",
            style("✓").green(),
            style(args.output.display()).cyan()
        );
    }
    Ok(())
}

fn run_show(global: &GlobalOpts) -> Result<()> {
    let mapping = mapping(global)?;
    let format = match effective_format(global.format, false) {
        OutputFormat::Json => OutputFormat::Json,
        _ => OutputFormat::Yaml,
    };
    print_structured(&mapping, format)
}
