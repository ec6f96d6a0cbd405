use clap::Parser;
use parse_actions_logs::{
    ExtractConfig, ExtractResult, Extractor, RunSummary, DEFAULT_OUTPUT_DIR,
};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "parse-actions-logs", version)]
#[command(about = "Parse the logs fetched from GitHub Actions")]
#[command(long_about = "Parse the logs fetched from GitHub Actions. These logs should be the \
zip files downloaded for a complete workflow run, either from the web UI or with a log \
fetching tool.

Every failing Go test module found is saved as
<output>/<module>/<test>/<test>-<zip name>.txt

Example usage:

    parse-actions-logs logs.zip logs2.zip")]
struct Cli {
    /// Output directory
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Zip files with the logs of a workflow run
    #[arg(value_name = "LOG_ZIP", required = true)]
    archives: Vec<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> ExtractResult<RunSummary> {
    let config = ExtractConfig::new().with_output_dir(cli.output);
    let extractor = Extractor::new(&config)?;
    extractor.run(&cli.archives)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use parse_actions_logs::ExtractError;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_output_dir() {
        let cli = Cli::try_parse_from(["parse-actions-logs", "logs.zip"]).unwrap();
        assert_eq!(cli.output, PathBuf::from("output"));
        assert_eq!(cli.archives, vec![PathBuf::from("logs.zip")]);
    }

    #[test]
    fn test_output_flag_and_multiple_archives() {
        let cli = Cli::try_parse_from(["parse-actions-logs", "-o", "out", "a.zip", "b.zip"]).unwrap();
        assert_eq!(cli.output, PathBuf::from("out"));
        assert_eq!(cli.archives.len(), 2);
    }

    #[test]
    fn test_run_fails_when_output_root_is_a_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let blocker = temp.path().join("output");
        std::fs::write(&blocker, b"").unwrap();

        let cli = Cli {
            output: blocker,
            archives: vec![temp.path().join("logs.zip")],
        };
        assert!(matches!(run(cli), Err(ExtractError::CreateOutputDir { .. })));
    }

    #[test]
    fn test_run_skips_missing_archive() {
        let temp = tempfile::TempDir::new().unwrap();
        let cli = Cli {
            output: temp.path().join("output"),
            archives: vec![temp.path().join("missing.zip")],
        };
        let summary = run(cli).unwrap();
        assert_eq!(summary.archives_failed, 1);
    }

    #[test]
    fn test_archives_are_required() {
        assert!(Cli::try_parse_from(["parse-actions-logs"]).is_err());
        assert!(Cli::try_parse_from(["parse-actions-logs", "-o", "out"]).is_err());
    }
}
