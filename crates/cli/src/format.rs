//! Output formatting for run reports, usage lines and errors.

use kvpipe_core::WorkloadConfig;
use kvpipe_workload::WorkloadReport;

/// Output mode for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Readable `name: value` lines
    Human,
    /// A single JSON document
    Json,
}

/// Format a finished run.
pub fn format_report(report: &WorkloadReport, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => {
            serde_json::to_string_pretty(report).unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
        }
        OutputMode::Human => {
            let max_key = report
                .max_written_key
                .map_or_else(|| "(nil)".to_string(), |k| k.to_string());
            [
                format!("reads verified:      {}", report.reads_verified),
                format!("writes acknowledged: {}", report.writes_acknowledged),
                format!("writes failed:       {}", report.writes_failed),
                format!("writes abandoned:    {}", report.writes_abandoned),
                format!("round-trips:         {}", report.round_trips),
                format!("max written key:     {}", max_key),
                format!("elapsed:             {} ms", report.elapsed_ms),
                format!("throughput:          {:.1} ops/s", report.ops_per_sec),
            ]
            .join("\n")
        }
    }
}

/// Example command-line options reproducing `config`.
pub fn usage_options(config: &WorkloadConfig) -> Vec<String> {
    let mut opts = vec![
        format!("--pipeline-length {}", config.pipeline_length),
        format!("--value-size {}", config.value_size),
        format!("--key-prefix {}", config.key_prefix),
        format!("--num-unique-keys {}", config.num_unique_keys),
    ];
    if let Some(n) = config.num_keys_to_write {
        opts.push(format!("--num-keys-to-write {}", n));
    }
    if let Some(n) = config.num_keys_to_read {
        opts.push(format!("--num-keys-to-read {}", n));
    }
    opts.push(format!("--num-writer-threads {}", config.num_writer_threads));
    opts.push(format!("--num-reader-threads {}", config.num_reader_threads));
    if let Some(secs) = config.max_duration_secs {
        opts.push(format!("--duration {}", secs));
    }
    opts
}

/// Format example usage for `config`.
pub fn format_usage(config: &WorkloadConfig, mode: OutputMode) -> String {
    let opts = usage_options(config);
    match mode {
        OutputMode::Json => serde_json::json!({ "options": opts }).to_string(),
        OutputMode::Human => format!("kvpipe run {}", opts.join(" ")),
    }
}

/// Format an error message.
pub fn format_error(message: &str, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::json!({ "error": message }).to_string(),
        OutputMode::Human => format!("(error) {}", message),
    }
}
