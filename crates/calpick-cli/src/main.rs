use clap::{Parser, Subcommand};
use components::{labels::LabelArgs, pick::PickArgs};
use dotenv::dotenv;

mod components;
mod models;

/// Calendar date picker for the terminal
#[derive(Parser)]
#[command(name = "calpick", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive date picker and print the chosen timestamp
    Pick(PickArgs),

    /// Print the accessible label of every day in a month
    Labels(LabelArgs),
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Pick(args) => components::pick::handle_pick(args).await,
        Commands::Labels(args) => {
            // the picker installs its own in-memory logger, so env_logger
            // is only used by the non-interactive commands
            env_logger::init();
            components::labels::handle_labels(args)
        }
    };
    if let Err(e) = result {
        log::error!("{}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pick() {
        let cli = Cli::try_parse_from([
            "calpick",
            "pick",
            "--selected",
            "2024-03-10T14:22:00",
            "--locale",
            "de",
            "--block-weekends",
        ])
        .unwrap();
        match cli.command {
            Commands::Pick(args) => {
                assert_eq!(
                    args.selected.map(|s| s.to_string()).as_deref(),
                    Some("2024-03-10 14:22:00")
                );
                assert_eq!(args.locale.locale.as_deref(), Some("de"));
                assert!(args.block_weekends);
            }
            Commands::Labels(_) => panic!("expected pick"),
        }
    }

    #[test]
    fn test_parse_labels() {
        let cli = Cli::try_parse_from(["calpick", "labels", "--month", "2024-03", "--json"]).unwrap();
        match cli.command {
            Commands::Labels(args) => {
                assert_eq!(args.month.to_string(), "2024-03-01");
                assert!(args.json);
                assert!(args.events.is_none());
            }
            Commands::Pick(_) => panic!("expected labels"),
        }
    }

    #[test]
    fn test_bad_values_rejected() {
        assert!(Cli::try_parse_from(["calpick", "labels", "--month", "March"]).is_err());
        assert!(Cli::try_parse_from(["calpick", "pick", "--selected", "tomorrow"]).is_err());
        assert!(Cli::try_parse_from(["calpick"]).is_err());
    }
}
