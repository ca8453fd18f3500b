use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sdsdump_core::{parse_ods_codes, ConfigFile, DumpService, MissingFieldPolicy};

/// Main entry point for the SDS dump runner
///
/// Builds the configuration from the environment (after loading `.env`), runs one dump and
/// exits. Any failure is returned as an error; an output file that was already started is left
/// in place with the entries written so far.
///
/// # Environment Variables
/// - `SDS_CONFIG`: YAML configuration file read before the variables below are applied
/// - `SDS_LDAP_URL`: directory server URL (default: "ldaps://orange.testlab.nhs.uk/")
/// - `SDS_BIND_DN` / `SDS_BIND_PASSWORD`: simple-bind credentials (default: anonymous)
/// - `SDS_OUTPUT`: report file (default: "sdsdump.xml")
/// - `SDS_ODS_CODES`: comma-separated ODS codes (default: "A20047,B82617")
/// - `SDS_RAW_OUTPUT`: "true" to write attribute values without markup escaping
/// - `SDS_SKIP_MISSING`: "true" to skip incomplete endpoint records instead of stopping
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sds=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config_from_env(|key| std::env::var(key).ok())?.resolve()?;
    tracing::info!("++ Dumping SDS endpoints from {}", config.directory().url);

    let summary = DumpService::new(Arc::new(config)).run()?;
    tracing::info!(
        "++ Done: {} organisation(s), {} entries, {} skipped",
        summary.organisations,
        summary.entries,
        summary.skipped
    );

    Ok(())
}

/// Overlay `SDS_*` variables onto the (optional) configuration file.
fn config_from_env(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<ConfigFile> {
    let var = |key: &str| var(key).filter(|value| !value.trim().is_empty());

    let mut file = match var("SDS_CONFIG") {
        Some(path) => ConfigFile::load(&PathBuf::from(path))?,
        None => ConfigFile::default(),
    };

    if let Some(url) = var("SDS_LDAP_URL") {
        file.ldap_url = Some(url);
    }
    if let Some(bind_dn) = var("SDS_BIND_DN") {
        file.bind_dn = Some(bind_dn);
    }
    if let Some(password) = var("SDS_BIND_PASSWORD") {
        file.bind_password = Some(password);
    }
    if let Some(output) = var("SDS_OUTPUT") {
        file.output = Some(PathBuf::from(output));
    }
    if let Some(codes) = var("SDS_ODS_CODES") {
        file.ods_codes = Some(parse_ods_codes(&codes)?);
    }
    if let Some(raw) = var("SDS_RAW_OUTPUT") {
        file.escape_markup = Some(!parse_flag(&raw)?);
    }
    if let Some(skip) = var("SDS_SKIP_MISSING") {
        if parse_flag(&skip)? {
            file.on_missing_field = Some(MissingFieldPolicy::SkipInteraction);
        }
    }

    Ok(file)
}

fn parse_flag(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => anyhow::bail!("expected a boolean flag, got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdsdump_core::Escaping;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let cfg = config_from_env(env(&[])).unwrap().resolve().unwrap();
        assert_eq!(cfg.directory().url, "ldaps://orange.testlab.nhs.uk/");
        assert_eq!(cfg.ods_codes().len(), 2);
    }

    #[test]
    fn environment_overrides_apply() {
        let cfg = config_from_env(env(&[
            ("SDS_LDAP_URL", "ldap://192.168.128.11:389"),
            ("SDS_ODS_CODES", "RHM, RR8"),
            ("SDS_OUTPUT", "opentest.xml"),
            ("SDS_RAW_OUTPUT", "true"),
            ("SDS_SKIP_MISSING", "yes"),
        ]))
        .unwrap()
        .resolve()
        .unwrap();

        assert_eq!(cfg.directory().url, "ldap://192.168.128.11:389");
        let codes: Vec<&str> = cfg.ods_codes().iter().map(|c| c.as_str()).collect();
        assert_eq!(codes, ["RHM", "RR8"]);
        assert_eq!(cfg.output_path(), std::path::Path::new("opentest.xml"));
        assert_eq!(cfg.escaping(), Escaping::None);
        assert_eq!(
            cfg.missing_field_policy(),
            MissingFieldPolicy::SkipInteraction
        );
    }

    #[test]
    fn blank_variables_are_ignored() {
        let cfg = config_from_env(env(&[("SDS_LDAP_URL", "  ")]))
            .unwrap()
            .resolve()
            .unwrap();
        assert_eq!(cfg.directory().url, "ldaps://orange.testlab.nhs.uk/");
    }

    #[test]
    fn rejects_unparseable_flag() {
        assert!(config_from_env(env(&[("SDS_RAW_OUTPUT", "maybe")])).is_err());
    }
}
