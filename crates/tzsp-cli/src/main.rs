use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use glob::glob;
use tracing::Level;
use tzsp_core::{
    CaptureDatagramSource, CollectError, CollectOptions, CollectSummary, DEFAULT_LISTEN_ADDR,
    DEFAULT_TZSP_PORT, DatagramSource, DecodedDatagram, ErrorPolicy, UdpDatagramSource,
    ts_to_rfc3339,
};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("TZSPCAT_BUILD_COMMIT"),
    ", ",
    env!("TZSPCAT_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "tzspcat")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decode TZSP (TaZmen Sniffer Protocol) datagrams from the wire or from captures.",
    long_about = None,
    after_help = "Examples:\n  tzspcat listen\n  tzspcat listen --listen 127.0.0.1:37008 --format json\n  tzspcat pcap read sensor.pcapng --port 37008\n  tzspcat decode datagram.bin"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Listen for TZSP datagrams on a UDP socket and print each packet.
    Listen {
        /// Address to listen for TZSP UDP datagrams
        #[arg(long, default_value = DEFAULT_LISTEN_ADDR)]
        listen: String,

        /// Stop after this many seconds without a datagram
        #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
        idle_timeout: Option<u64>,

        #[command(flatten)]
        run: RunArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Operations on PCAP/PCAPNG inputs.
    Pcap {
        #[command(subcommand)]
        command: PcapCommands,
    },
    /// Decode a single raw TZSP datagram stored in a file.
    Decode {
        /// Path to a file holding one TZSP datagram (UDP payload)
        input: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Subcommand, Debug)]
enum PcapCommands {
    /// Decode the TZSP datagrams recorded in a capture file.
    #[command(alias = "decode")]
    #[command(
        after_help = "Examples:\n  tzspcat pcap read sensor.pcapng\n  tzspcat pcap read 'captures/*.pcap' --port 37008 --format json"
    )]
    Read {
        /// Path (or glob pattern) to a .pcap or .pcapng file
        input: PathBuf,

        /// UDP destination port carrying TZSP
        #[arg(long, default_value_t = DEFAULT_TZSP_PORT)]
        port: u16,

        #[command(flatten)]
        run: RunArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Exit with an error on the first datagram that fails to decode
    #[arg(long)]
    fail_fast: bool,

    /// Stop after this many datagrams
    #[arg(long, value_name = "N")]
    count: Option<u64>,
}

impl RunArgs {
    fn options(&self) -> CollectOptions {
        CollectOptions {
            policy: if self.fail_fast {
                ErrorPolicy::Abort
            } else {
                ErrorPolicy::Skip
            },
            limit: self.count,
        }
    }
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Listen {
            listen,
            idle_timeout,
            run,
            output,
        } => cmd_listen(&listen, idle_timeout, &run, &output, cli.quiet),
        Commands::Pcap { command } => match command {
            PcapCommands::Read {
                input,
                port,
                run,
                output,
            } => cmd_pcap_read(&input, port, &run, &output, cli.quiet),
        },
        Commands::Decode { input, output } => cmd_decode(&input, &output),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .try_init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

impl From<CollectError> for CliError {
    fn from(err: CollectError) -> Self {
        let hint = match err {
            CollectError::Decode { .. } => {
                Some("drop --fail-fast to skip datagrams that fail to decode".to_string())
            }
            CollectError::Source(_) | CollectError::Io(_) => None,
        };
        CliError::new(err.to_string(), hint)
    }
}

fn cmd_listen(
    listen: &str,
    idle_timeout: Option<u64>,
    run: &RunArgs,
    output: &OutputArgs,
    quiet: bool,
) -> Result<(), CliError> {
    validate_output(output)?;
    let source = UdpDatagramSource::bind(listen).map_err(|err| {
        CliError::new(
            format!("cannot listen on '{}': {}", listen, err),
            Some("use --listen host:port with a free UDP port".to_string()),
        )
    })?;
    let source = source
        .with_idle_timeout(idle_timeout.map(Duration::from_secs))
        .map_err(|err| {
            CliError::new(
                format!("cannot set idle timeout: {}", err),
                Some("use --idle-timeout with a whole number of seconds >= 1".to_string()),
            )
        })?;
    run_collector(source, run, output, quiet)
}

fn cmd_pcap_read(
    input: &Path,
    port: u16,
    run: &RunArgs,
    output: &OutputArgs,
    quiet: bool,
) -> Result<(), CliError> {
    validate_output(output)?;
    let resolved_input = resolve_input_path(input)?;
    validate_input_file(&resolved_input)?;
    let source = CaptureDatagramSource::open(&resolved_input, port)
        .with_context(|| format!("Failed to open capture: {}", resolved_input.display()))?;
    run_collector(source, run, output, quiet)
}

fn cmd_decode(input: &Path, output: &OutputArgs) -> Result<(), CliError> {
    validate_output(output)?;
    if !input.is_file() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("pass a file holding one raw TZSP datagram".to_string()),
        ));
    }
    let bytes = fs::read(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;
    let packet = tzsp_core::decode(&bytes).map_err(|err| {
        CliError::new(
            format!("cannot decode {}: {}", input.display(), err),
            Some("expected a TZSP v1 received-tag-list datagram without UDP/IP headers".to_string()),
        )
    })?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match output.format {
        OutputFormat::Text => write!(out, "{packet}"),
        OutputFormat::Json => write_json(&mut out, &packet, output.pretty),
    }
    .and_then(|()| out.flush())
    .context("Failed to write output")?;
    Ok(())
}

fn run_collector<S: DatagramSource>(
    source: S,
    run: &RunArgs,
    output: &OutputArgs,
    quiet: bool,
) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = tzsp_core::collect(source, run.options(), |decoded| {
        write_decoded(&mut out, &decoded, output)?;
        out.flush()
    })?;
    if !quiet {
        print_summary(&summary);
    }
    Ok(())
}

fn write_decoded<W: Write>(
    out: &mut W,
    decoded: &DecodedDatagram,
    output: &OutputArgs,
) -> io::Result<()> {
    match output.format {
        OutputFormat::Text => {
            let ts = ts_to_rfc3339(decoded.ts).unwrap_or_else(|| "-".to_string());
            let peer = decoded
                .peer
                .map(|peer| peer.to_string())
                .unwrap_or_else(|| "-".to_string());
            writeln!(out, "# {} {} {}", decoded.index, ts, peer)?;
            write!(out, "{}", decoded.packet)
        }
        OutputFormat::Json => write_json(out, decoded, output.pretty),
    }
}

fn write_json<W: Write, T: serde::Serialize>(out: &mut W, value: &T, pretty: bool) -> io::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)
}

fn print_summary(summary: &CollectSummary) {
    eprintln!(
        "OK: {} decoded, {} skipped ({} datagrams)",
        summary.decoded, summary.skipped, summary.datagrams_total
    );
}

fn validate_output(output: &OutputArgs) -> Result<(), CliError> {
    if output.pretty && output.format != OutputFormat::Json {
        return Err(CliError::new(
            "--pretty only applies to JSON output",
            Some("add --format json or drop --pretty".to_string()),
        ));
    }
    Ok(())
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "pcap" && ext != "pcapng" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .pcap or .pcapng file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    let mut matches = Vec::new();
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    match matches.len() {
        0 => Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected .pcap or .pcapng".to_string()),
        )),
        1 => Ok(matches.remove(0)),
        count => {
            let mut message = format!(
                "multiple files match pattern '{}' ({} matches); matches: ",
                pattern, count
            );
            message.push_str(
                &matches
                    .iter()
                    .take(3)
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            );
            if count > 3 {
                message.push_str(", ...");
            }
            Err(CliError::new(
                message,
                Some("pass a single capture file, or run once per file".to_string()),
            ))
        }
    }
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
