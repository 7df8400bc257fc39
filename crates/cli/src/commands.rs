//! clap command tree.

use clap::{Arg, ArgAction, Command};

/// Build the `kvpipe` command.
pub fn build_cli() -> Command {
    Command::new("kvpipe")
        .about("Pipelined key-value workload driver")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print machine-readable JSON"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Raise log verbosity (-v info, -vv debug, -vvv trace)"),
        )
        .subcommand_required(true)
        .subcommand(workload_args(
            Command::new("run")
                .about("Run a workload against the in-process store")
                .arg(
                    Arg::new("reject-writes")
                        .long("reject-writes")
                        .value_name("KEY")
                        .action(ArgAction::Append)
                        .help("Drop SETs of KEY without acknowledgement (repeatable)"),
                ),
        ))
        .subcommand(workload_args(
            Command::new("usage").about("Print example usage options for a workload"),
        ))
}

fn workload_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("config")
            .long("config")
            .short('c')
            .value_name("FILE")
            .help("TOML workload config; flags override its values"),
    )
    .arg(
        Arg::new("pipeline-length")
            .long("pipeline-length")
            .value_name("N")
            .help("Operations per pipeline round-trip"),
    )
    .arg(
        Arg::new("value-size")
            .long("value-size")
            .value_name("BYTES")
            .help("0 for text values, otherwise byte-array value size"),
    )
    .arg(
        Arg::new("key-prefix")
            .long("key-prefix")
            .value_name("PREFIX")
            .help("Prefix of store keys"),
    )
    .arg(
        Arg::new("num-unique-keys")
            .long("num-unique-keys")
            .value_name("N")
            .help("Size of the key space"),
    )
    .arg(
        Arg::new("num-keys-to-write")
            .long("num-keys-to-write")
            .value_name("N")
            .help("Stop writers after N acknowledged writes"),
    )
    .arg(
        Arg::new("num-keys-to-read")
            .long("num-keys-to-read")
            .value_name("N")
            .help("Stop readers after N verified reads"),
    )
    .arg(
        Arg::new("num-writer-threads")
            .long("num-writer-threads")
            .value_name("N")
            .help("Writer workers"),
    )
    .arg(
        Arg::new("num-reader-threads")
            .long("num-reader-threads")
            .value_name("N")
            .help("Reader workers"),
    )
    .arg(
        Arg::new("duration")
            .long("duration")
            .value_name("SECS")
            .help("Stop after SECS seconds"),
    )
}
