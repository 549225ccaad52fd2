use clap::Parser;
use dtsx_flatten::{cli, logging};

#[tokio::main]
async fn main() -> dtsx_flatten::Result<()> {
    let args = cli::Args::parse();
    let _logging = logging::init(&args.command)?;
    cli::run(args).await
}
