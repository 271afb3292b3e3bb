use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use carhunter::{serve, Commands, Container, ContainerConfig, Router, DEFAULT_CATALOG_TTL_SECS};

#[derive(Parser)]
#[command(name = "carhunter")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Answer LLM searches with a canned reply instead of calling Perplexity
    #[arg(long, global = true)]
    mock_llm: bool,

    /// Lifetime of cached catalogue answers
    #[arg(long, global = true, default_value_t = DEFAULT_CATALOG_TTL_SECS)]
    catalog_ttl_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let container = Container::new(ContainerConfig {
        mock_llm: cli.mock_llm,
        catalog_ttl_secs: cli.catalog_ttl_secs,
    });

    if let Commands::Serve { port, public } = cli.command {
        return serve(Arc::new(container), port, public).await;
    }

    let router = Router::new(&container);
    let output = router.route(cli.command).await?;
    println!("{}", output);

    Ok(())
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn serve_defaults_to_port_3000() {
        let cli = Cli::try_parse_from(["carhunter", "serve"]).unwrap();
        match cli.command {
            Commands::Serve { port, public } => {
                assert_eq!(port, 3000);
                assert!(!public);
            }
            _ => panic!("expected serve"),
        }
        assert_eq!(cli.catalog_ttl_secs, DEFAULT_CATALOG_TTL_SECS);
    }

    #[test]
    fn search_accepts_repeated_and_comma_separated_criteria() {
        let cli = Cli::try_parse_from([
            "carhunter",
            "--mock-llm",
            "search",
            "--make",
            "Audi,BMW",
            "--site",
            "group:DK",
            "--fuel",
            "diesel",
            "--max-price",
            "300000",
            "--format",
            "json",
        ])
        .unwrap();

        assert!(cli.mock_llm);
        match cli.command {
            Commands::Search { criteria, format } => {
                assert_eq!(format, carhunter::OutputFormat::Json);
                let request = criteria.into_request().unwrap();
                assert_eq!(request.makes, vec!["Audi", "BMW"]);
                assert_eq!(request.sites, vec!["group:DK"]);
                assert_eq!(request.max_price, Some(300000.0));
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn unknown_fuel_type_is_an_error() {
        let cli = Cli::try_parse_from(["carhunter", "direct-search", "--make", "Audi", "--fuel", "steam"])
            .unwrap();
        match cli.command {
            Commands::DirectSearch { criteria, .. } => assert!(criteria.into_request().is_err()),
            _ => panic!("expected direct-search"),
        }
    }

    #[test]
    fn models_requires_a_make() {
        assert!(Cli::try_parse_from(["carhunter", "models"]).is_err());
    }
}
