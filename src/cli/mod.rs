//! Command-line interface

use clap::Parser;

/// Rank AWS regions by HTTP round-trip latency from this machine
#[derive(Parser, Debug, Clone)]
#[command(name = "awsping")]
#[command(version, about, long_about = None)]
#[command(after_help = "Environment: AWSPING_REPEATS, AWSPING_TIMEOUT_SECONDS, AWSPING_ENABLE_COLOR, \
AWSPING_LOG_LEVEL, AWSPING_LOG_FORMAT (also read from a .env file)")]
pub struct Cli {
    /// Number of probe rounds per region [default: 1]
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub repeats: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["awsping"]);
        assert_eq!(cli.repeats, None);
    }

    #[test]
    fn test_cli_repeats_long_and_short() {
        let cli = Cli::parse_from(["awsping", "--repeats", "5"]);
        assert_eq!(cli.repeats, Some(5));

        let cli = Cli::parse_from(["awsping", "-r", "3"]);
        assert_eq!(cli.repeats, Some(3));
    }

    #[test]
    fn test_cli_accepts_large_repeats() {
        let cli = Cli::parse_from(["awsping", "--repeats", "1001"]);
        assert_eq!(cli.repeats, Some(1001));
    }

    #[test]
    fn test_cli_rejects_zero_repeats() {
        let result = Cli::try_parse_from(["awsping", "--repeats", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_rejects_non_numeric_repeats() {
        assert!(Cli::try_parse_from(["awsping", "-r", "abc"]).is_err());
        assert!(Cli::try_parse_from(["awsping", "-r", "-2"]).is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_flags() {
        assert!(Cli::try_parse_from(["awsping", "--url", "http://example.com"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
