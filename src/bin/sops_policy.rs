// src/bin/sops_policy.rs
//! Print the policy `.sops.yaml` resolves for a file

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use sops_policy::config::{lookup_config_file, OsFileSystem};
use sops_policy::consts::CONFIG_PATH_ENV;
use sops_policy::{
    load_creation_rule_for_file, load_destination_rule_for_file, parse_kms_context,
    policy_to_json, EncryptionContext,
};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "sops-policy", version, about = "Resolve the sops policy for a file")]
struct Cli {
    /// Config file; discovered from FILE's directory upwards when omitted
    #[arg(long, env = CONFIG_PATH_ENV)]
    config: Option<PathBuf>,

    /// Resolve the destination rule instead of the creation rule
    #[arg(long)]
    destination: bool,

    /// Extra KMS encryption context, `key:value,key2:value2`
    #[arg(long)]
    encryption_context: Option<String>,

    /// File the policy is resolved for
    file: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => {
            let found = lookup_config_file(&OsFileSystem, &cli.file)
                .context("Failed to find a .sops.yaml config file")?;
            if let Some(w) = &found.warning {
                warn!("{w}");
            }
            found.path
        }
    };
    info!(config = %config_path.display(), file = %cli.file.display(), "resolving policy");

    let context: EncryptionContext = match cli.encryption_context.as_deref() {
        None | Some("") => EncryptionContext::new(),
        Some(raw) => match parse_kms_context(raw) {
            Some(ctx) => ctx,
            None => bail!("invalid --encryption-context {raw:?}, expected key:value,..."),
        },
    };

    let file_name = cli
        .file
        .file_name()
        .and_then(|n| n.to_str())
        .context("non-UTF8 file name")?
        .to_owned();

    let output = if cli.destination {
        let policy = load_destination_rule_for_file(&config_path, &cli.file, &context)
            .with_context(|| format!("Failed to resolve destination policy from {}", config_path.display()))?;
        policy_to_json(&policy, Some(&file_name))
    } else {
        match load_creation_rule_for_file(&config_path, &cli.file, &context)
            .with_context(|| format!("Failed to resolve creation policy from {}", config_path.display()))?
        {
            Some(policy) => policy_to_json(&policy, Some(&file_name)),
            None => serde_json::Value::Null,
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
