//! `mailticks config` — Configuration management commands.

use mailticks_config::MailTelemetryConfig;

pub fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("Validating configuration...");

    match MailTelemetryConfig::load() {
        Ok(config) => {
            println!("   OK  Config parsed successfully");

            let mut warnings = Vec::new();

            if !config.redact_credentials {
                warnings.push("redact_credentials = false: SMTP credentials will be recorded");
            }

            if config.truncation_marker.is_empty() {
                warnings.push("Empty truncation_marker: truncated values are indistinguishable");
            }

            if warnings.is_empty() {
                println!("   OK  All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   WARN  {w}");
                }
            }

            println!();
            println!("   Detail level:  {}", config.detail_level);
            println!("   Truncate at:   {}", config.truncate_at);
            println!("   Resolve host:  {}", config.resolve_host);
        }
        Err(e) => {
            println!("   ERR  Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = MailTelemetryConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub fn path() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = MailTelemetryConfig::config_dir().join("config.toml");
    println!("{}", config_path.display());
    Ok(())
}
