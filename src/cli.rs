use clap::Parser;
use std::path::PathBuf;

/// Contract-driven mock API server
#[derive(Parser, Debug, Clone)]
#[command(name = "proteus", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "PROTEUS_CONFIG", default_value = "proteus.toml")]
    pub config: PathBuf,

    /// Path to the API contract file (JSON or YAML)
    #[arg(long, env = "PROTEUS_CONTRACT")]
    pub contract: Option<PathBuf>,

    /// Server host address
    #[arg(long, env = "PROTEUS_HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(long, env = "PROTEUS_PORT")]
    pub port: Option<u16>,

    /// Generation scenario: demo, realistic, large, or errors
    #[arg(long, env = "PROTEUS_SCENARIO")]
    pub scenario: Option<String>,

    /// Seed for reproducible generated data
    #[arg(long, env = "PROTEUS_SEED")]
    pub seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["proteus"]);
        assert_eq!(cli.config, PathBuf::from("proteus.toml"));
        assert!(cli.contract.is_none());
        assert!(cli.host.is_none());
        assert!(cli.port.is_none());
        assert!(cli.scenario.is_none());
        assert!(cli.seed.is_none());
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "proteus",
            "--contract",
            "api.yaml",
            "--host",
            "0.0.0.0",
            "--scenario",
            "errors",
        ]);
        assert_eq!(cli.contract, Some(PathBuf::from("api.yaml")));
        assert_eq!(cli.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(cli.scenario.as_deref(), Some("errors"));
    }
}
