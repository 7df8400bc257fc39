//! ArgMatches → CliAction conversion.
//!
//! Builds the workload configuration in layers:
//! defaults → `--config` file → individual flags.

use std::str::FromStr;

use clap::ArgMatches;
use kvpipe_core::WorkloadConfig;

/// The result of parsing the command line.
#[derive(Debug)]
pub enum CliAction {
    /// Run a workload.
    Run(RunRequest),
    /// Print example usage options for a workload.
    Usage(WorkloadConfig),
}

/// A workload to run against the in-process store.
#[derive(Debug)]
pub struct RunRequest {
    pub config: WorkloadConfig,
    pub reject_writes: Vec<String>,
}

/// Convert clap ArgMatches into a CliAction.
pub fn matches_to_action(matches: &ArgMatches) -> Result<CliAction, String> {
    let (sub_name, sub_matches) = matches
        .subcommand()
        .ok_or_else(|| "No command provided".to_string())?;

    match sub_name {
        "run" => {
            let config = parse_config(sub_matches)?;
            let reject_writes = sub_matches
                .get_many::<String>("reject-writes")
                .map(|keys| keys.cloned().collect())
                .unwrap_or_default();
            Ok(CliAction::Run(RunRequest {
                config,
                reject_writes,
            }))
        }
        "usage" => Ok(CliAction::Usage(parse_config(sub_matches)?)),
        other => Err(format!("Unknown command: {}", other)),
    }
}

fn parse_config(m: &ArgMatches) -> Result<WorkloadConfig, String> {
    let mut config = match m.get_one::<String>("config") {
        Some(path) => WorkloadConfig::from_file(path)
            .map_err(|e| format!("Failed to load {}: {}", path, e))?,
        None => WorkloadConfig::default(),
    };

    if let Some(n) = parse_opt(m, "pipeline-length")? {
        config = config.pipeline_length(n);
    }
    if let Some(n) = parse_opt(m, "value-size")? {
        config = config.value_size(n);
    }
    if let Some(prefix) = m.get_one::<String>("key-prefix") {
        config = config.key_prefix(prefix.clone());
    }
    if let Some(n) = parse_opt(m, "num-unique-keys")? {
        config = config.num_unique_keys(n);
    }
    if let Some(n) = parse_opt(m, "num-keys-to-write")? {
        config = config.num_keys_to_write(n);
    }
    if let Some(n) = parse_opt(m, "num-keys-to-read")? {
        config = config.num_keys_to_read(n);
    }
    if let Some(n) = parse_opt(m, "num-writer-threads")? {
        config = config.num_writer_threads(n);
    }
    if let Some(n) = parse_opt(m, "num-reader-threads")? {
        config = config.num_reader_threads(n);
    }
    if let Some(secs) = parse_opt(m, "duration")? {
        config = config.max_duration_secs(secs);
    }

    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn parse_opt<T>(m: &ArgMatches, name: &str) -> Result<Option<T>, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    m.get_one::<String>(name)
        .map(|s| s.parse::<T>())
        .transpose()
        .map_err(|e| format!("Invalid {}: {}", name, e))
}
