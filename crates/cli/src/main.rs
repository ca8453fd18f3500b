use clap::{Args, Parser, Subcommand};
use sdsdump_core::{
    device_record, parse_ods_codes, resolve, ConfigFile, CoreConfig, DumpService, LdapDirectory,
    MissingFieldPolicy, OdsCode,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "sds")]
#[command(about = "Spine Directory Service endpoint dump")]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct ConnectionArgs {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory server URL (e.g. ldaps://orange.testlab.nhs.uk/)
    #[arg(long, global = true)]
    server: Option<String>,
    /// Bind DN for simple authentication
    #[arg(long, global = true, requires = "bind_password")]
    bind_dn: Option<String>,
    /// Bind password for simple authentication
    #[arg(long, global = true, requires = "bind_dn")]
    bind_password: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the endpoint report for one or more organisations
    Dump {
        /// ODS codes to dump (defaults to the configured list)
        ods_codes: Vec<String>,
        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write attribute values without markup escaping
        #[arg(long)]
        raw: bool,
        /// Skip interactions with incomplete endpoint records instead of stopping
        #[arg(long)]
        skip_missing: bool,
    },
    /// Show the accredited system record for an organisation
    Device {
        /// ODS code
        ods_code: String,
    },
    /// List the resolved endpoints for an organisation
    Endpoints {
        /// ODS code
        ods_code: String,
        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },
}

impl ConnectionArgs {
    fn config_file(&self) -> Result<ConfigFile, Box<dyn std::error::Error>> {
        let mut file = match &self.config {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };
        if let Some(server) = &self.server {
            file.ldap_url = Some(server.clone());
        }
        if let Some(bind_dn) = &self.bind_dn {
            file.bind_dn = Some(bind_dn.clone());
        }
        if let Some(bind_password) = &self.bind_password {
            file.bind_password = Some(bind_password.clone());
        }
        Ok(file)
    }

    fn core_config(&self) -> Result<CoreConfig, Box<dyn std::error::Error>> {
        Ok(self.config_file()?.resolve()?)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Dump {
            ods_codes,
            output,
            raw,
            skip_missing,
        }) => {
            let mut file = cli.connection.config_file()?;
            if !ods_codes.is_empty() {
                file.ods_codes = Some(parse_ods_codes(&ods_codes.join(","))?);
            }
            if output.is_some() {
                file.output = output;
            }
            if raw {
                file.escape_markup = Some(false);
            }
            if skip_missing {
                file.on_missing_field = Some(MissingFieldPolicy::SkipInteraction);
            }

            let service = DumpService::new(Arc::new(file.resolve()?));
            let summary = service.run()?;
            println!(
                "Wrote {} entries for {} organisation(s) to {}",
                summary.entries,
                summary.organisations,
                service.config().output_path().display()
            );
            if summary.skipped > 0 {
                println!("Skipped {} incomplete interaction(s)", summary.skipped);
            }
        }
        Some(Commands::Device { ods_code }) => {
            let cfg = cli.connection.core_config()?;
            let ods_code = OdsCode::new(&ods_code)?;
            let mut directory = LdapDirectory::connect(cfg.directory())?;
            let device = device_record(&mut directory, &ods_code)?;
            println!("ODS: {}, ASID: {}", ods_code, device.asid);
            if device.interactions.is_empty() {
                println!("No interactions registered.");
            } else {
                for interaction in device.interactions {
                    println!("  {}", interaction);
                }
            }
        }
        Some(Commands::Endpoints { ods_code, json }) => {
            let cfg = cli.connection.core_config()?;
            let ods_code = OdsCode::new(&ods_code)?;
            let mut directory = LdapDirectory::connect(cfg.directory())?;
            let entries = resolve(&mut directory, &ods_code, cfg.missing_field_policy())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("No endpoints found.");
            } else {
                for entry in entries {
                    println!(
                        "Interaction: {}, Service: {}, Party key: {}, Endpoint: {}",
                        entry.soap_action(),
                        entry.service(),
                        entry.party_key(),
                        entry.endpoint()
                    );
                }
            }
        }
        None => {
            println!("Use 'sds --help' for commands");
        }
    }

    Ok(())
}
