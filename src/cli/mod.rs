pub mod args;
pub mod commands;

pub use args::{FlattenArgs, InspectArgs, ScanArgs};
use clap::{Parser, Subcommand};

const HELP_TEMPLATE: &str = "\
{name} {version}\n\
{about-with-newline}\n\
USAGE:\n    {usage}\n\
\nOPTIONS:\n{options}\n\
COMMANDS:\n{subcommands}\n";

#[derive(Parser, Debug)]
#[command(name = "dtsx-flatten")]
#[command(version = crate::VERSION)]
#[command(about = "Flatten SSIS packages into one table per package")]
#[command(help_template = HELP_TEMPLATE)]
#[command(
    after_long_help = "Typical flow: scan a folder to see which packages will be read, inspect one of them, then flatten the folder."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(
        about = "Export every package under a path as a table",
        long_about = "Flatten discovers packages, extracts their executable trees, and writes one table per package. Pipeline components become one row each, with a Property_<name> column per component property.",
        after_help = "Example:\n    dtsx-flatten flatten ./packages --output ./tables --format csv"
    )]
    Flatten(FlattenArgs),
    #[command(
        about = "Print the executable tree of one package",
        long_about = "Inspect prints the parsed executable tree of a single package as JSON, or its flattened rows with --rows.",
        after_help = "Example:\n    dtsx-flatten inspect ./packages/Load.dtsx --rows"
    )]
    Inspect(InspectArgs),
    #[command(
        about = "List the packages that would be processed",
        after_help = "Example:\n    dtsx-flatten scan ./packages"
    )]
    Scan(ScanArgs),
}

pub async fn run(args: Args) -> crate::Result<()> {
    match args.command {
        Command::Flatten(flatten_args) => commands::flatten(flatten_args).await,
        Command::Inspect(inspect_args) => commands::inspect(inspect_args),
        Command::Scan(scan_args) => commands::scan(scan_args),
    }
}
