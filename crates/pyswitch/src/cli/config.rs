use super::App;
use anyhow::Context;
use std::process::ExitCode;

/// Print the resolved configuration as TOML.
#[derive(Debug, clap::Args)]
pub struct Config {}

impl Config {
    pub fn run(self, app: &App) -> anyhow::Result<ExitCode> {
        let text = app.profile.to_toml().context("failed to render configuration")?;
        print!("{text}");
        Ok(ExitCode::SUCCESS)
    }
}
