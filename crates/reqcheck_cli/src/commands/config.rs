use miette::{IntoDiagnostic, Result};
use reqcheck_core::BotConfig;

use crate::output::Output;

/// Show current configuration with credentials masked
pub fn show(config: &BotConfig) -> Result<()> {
    let output = Output::new();

    output.section("Current Configuration");
    println!();

    let toml_str = toml::to_string_pretty(&config.redacted()).into_diagnostic()?;
    println!("{}", toml_str);

    Ok(())
}
