use crate::cli::Cli;
use crate::domain::Scenario;
use config::{Config, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub mock: MockSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MockSettings {
    /// Path to the contract file (JSON or YAML).
    #[serde(default = "default_contract_path")]
    pub contract: String,
    #[serde(default)]
    pub scenario: Scenario,
    /// Seed for the generation RNG; omit for entropy seeding.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_contract_path() -> String {
    "contract.yaml".to_string()
}

impl Default for MockSettings {
    fn default() -> Self {
        Self {
            contract: default_contract_path(),
            scenario: Scenario::default(),
            seed: None,
        }
    }
}

impl Settings {
    /// Create settings from CLI arguments (config file + CLI overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let s = Config::builder()
            .add_source(File::from(cli.config.clone()).required(false))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("mock.contract", default_contract_path())?
            .build()?;

        let mut settings: Settings = s.try_deserialize()?;
        settings.apply_cli_overrides(cli)?;
        Ok(settings)
    }

    /// Apply CLI argument overrides to settings (CLI > config file)
    fn apply_cli_overrides(&mut self, cli: &Cli) -> Result<(), anyhow::Error> {
        if let Some(host) = &cli.host {
            self.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(contract) = &cli.contract {
            self.mock.contract = contract.display().to_string();
        }
        if let Some(scenario) = &cli.scenario {
            self.mock.scenario = scenario
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?;
        }
        if let Some(seed) = cli.seed {
            self.mock.seed = Some(seed);
        }
        Ok(())
    }
}
