use std::process;
use clap::Parser;

use newsdesk::cli::Cli;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.run().await {
        Ok(_) => {
            // Command completed successfully
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
