//! Configuration validation.

use super::error::{ConfigError, ConfigResult};
use super::schema::{LogFormat, LogOutput, SlashmuxConfig};

/// Checks values that deserialize fine but cannot work at runtime.
pub fn validate_config(config: &SlashmuxConfig) -> ConfigResult<()> {
    if let Some(guild_id) = &config.bot.guild_id
        && !guild_id.is_empty()
        && !guild_id.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(ConfigError::validation(format!(
            "bot.guild_id must be a numeric id, got `{guild_id}`"
        )));
    }

    if config.logging.output == LogOutput::File && config.logging.file_path.is_none() {
        return Err(ConfigError::missing_field("logging.file_path"));
    }

    if config.logging.format == LogFormat::Json && !cfg!(feature = "json-log") {
        return Err(ConfigError::validation(
            "logging.format = \"json\" requires the `json-log` feature",
        ));
    }

    Ok(())
}
