use clap::Parser;
use stagehand_cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = stagehand_cli::run(cli).await {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
