//! Storefront - browse the product catalog from the terminal
//!
//! Lists and searches products, shows product details and adds products to
//! the cart, backed by the storefront API.

use clap::Parser;

use storefront::app::App;
use storefront::cli::Cli;
use storefront::config::Config;
use storefront::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    logging::init(cli.verbose)?;

    let config = Config::from_cli(&cli)?;
    tracing::debug!(
        base_url = %config.base_url,
        retries = config.retry.max_retries,
        "configuration loaded"
    );

    let app = App::from_config(&config);
    let report = app.run(&cli.command).await;

    for line in &report.output {
        println!("{}", line);
    }
    for line in &report.errors {
        eprintln!("{}", line);
    }

    if !report.is_success() {
        std::process::exit(1);
    }

    Ok(())
}
