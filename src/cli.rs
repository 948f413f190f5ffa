use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use crate::conversion::{ConversionConfig, ConversionSummary, DatasetPaths, convert_dataset};

#[derive(Debug, Parser)]
#[command(author, version, about = "Convert PLINK text datasets to Weka ARFF files", long_about = None)]
struct Cli {
    /// PLINK dataset base name; reads <DATASET>.map and <DATASET>.ped,
    /// writes <DATASET>.exemplars and <DATASET>.arff
    #[arg(value_name = "DATASET")]
    dataset: String,

    /// Validation dataset base name, converted through the primary dataset's
    /// schema so both ARFF headers declare identical attributes
    #[arg(long, value_name = "BASE")]
    validation: Option<String>,

    /// Relation name for the primary ARFF output (defaults to DATASET)
    #[arg(long, value_name = "NAME")]
    relation: Option<String>,

    /// Logging verbosity (e.g. error, warn, info, debug)
    #[arg(long, default_value = "info")]
    log_level: String,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let mut primary = DatasetPaths::from_base(&cli.dataset);
    if let Some(relation) = cli.relation {
        primary.relation = relation;
    }

    let config = ConversionConfig {
        primary,
        validation: cli.validation.as_deref().map(DatasetPaths::from_base),
    };

    let summary = convert_dataset(&config)?;
    print_summary(&summary);

    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .ok();
}

fn print_summary(summary: &ConversionSummary) {
    println!("Schema covers {count} markers.", count = summary.marker_count);

    for dataset in &summary.datasets {
        println!(
            "{relation}: wrote {rows} exemplars ({filtered} individuals dropped for missing phenotype).",
            relation = dataset.relation,
            rows = dataset.rows_emitted,
            filtered = dataset.missing_phenotype,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_primary_dataset_only() {
        let cli = Cli::parse_from(["plink2arff", "mystudy"]);
        assert_eq!(cli.dataset, "mystudy");
        assert_eq!(cli.validation, None);
        assert_eq!(cli.relation, None);
    }

    #[test]
    fn parses_validation_flag() {
        let cli = Cli::parse_from(["plink2arff", "mystudy", "--validation", "holdout"]);
        assert_eq!(cli.dataset, "mystudy");
        assert_eq!(cli.validation.as_deref(), Some("holdout"));
    }

    #[test]
    fn missing_dataset_argument_is_a_usage_error() {
        assert!(Cli::try_parse_from(["plink2arff"]).is_err());
    }
}
