use std::{
    fs::File,
    io::{self, BufWriter, Write},
};

use anyhow::{bail, Context, Result};
use camino::Utf8PathBuf;
use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};
use itertools::Itertools;
use tracing::info;
use tracing_subscriber::EnvFilter;

use seqmaker::{
    dump::{dump_diffs, dump_sequences, write_drop_rates, write_run_args},
    mmsi_counter::count_mmsi,
    record::unescape_delimiter,
    FormatPolicy, Sequencer, SplitArgs,
};

/// Cut AIS reports read from stdin into fixed-length, uniformly sampled vessel sequences.
///
/// The first five columns of each line are: reception time (UTC epoch, e.g.
/// 1456786800.005), MMSI, AIS slot second, latitude and longitude (both in 1/10000 min).
#[derive(Parser, Debug)]
#[command(author, version, long_about = None)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write one <mmsi>.bin file of interpolated sequences per vessel, plus args.txt
    Sequences(SequencesArgs),
    /// Print the fraction of reports of each vessel that ends up in no sequence
    DropRate(DropRateArgs),
    /// Print how often each MMSI occurs, most frequent first
    CountMmsi(CountMmsiArgs),
    /// Dump strided time and distance differences of all vessels
    Diff(DiffArgs),
}

#[derive(Args, Debug)]
struct DelimiterArg {
    /// Column delimiter; every character of it separates columns
    #[arg(short = 'd', long, default_value = ", ")]
    delimiter: String,
}

#[derive(Args, Debug)]
struct SplitOpts {
    #[command(flatten)]
    delimiter: DelimiterArg,

    /// Sequence length N: N + 1 grid points spanning N × interpolation length
    #[arg(short = 'N', long, default_value_t = 3600)]
    seq_length: u32,

    /// Temporal threshold in seconds between two consecutive reports of a sequence
    #[arg(short = 't', long, default_value_t = 60)]
    dt_max: u32,

    /// Spatial threshold in nautical miles between two consecutive reports of a sequence
    #[arg(short = 's', long, default_value_t = 0.1)]
    ds_max: f64,

    /// Interpolation length in seconds
    #[arg(short = 'i', long, default_value_t = 6)]
    dti: u32,

    /// Minimal average speed in knots over an interpolated sequence
    #[arg(short = 'v', long, default_value_t = 0.0)]
    v_min: f64,

    /// Apply the one-step low pass filter with the spatial threshold
    #[arg(short = 'l', long = "low-pass", action = ArgAction::SetTrue)]
    low_pass: bool,

    /// Skip malformed lines instead of aborting
    #[arg(long, action = ArgAction::SetTrue)]
    skip_malformed: bool,
}

impl SplitOpts {
    fn split_args(&self) -> Result<SplitArgs> {
        SplitArgs::builder()
            .seq_length(self.seq_length)
            .dt_max(self.dt_max)
            .ds_max(self.ds_max)
            .dti(self.dti)
            .v_min(self.v_min)
            .build()
            .context("invalid segmentation parameters")
    }

    fn policy(&self) -> FormatPolicy {
        policy_for(self.skip_malformed)
    }
}

#[derive(Args, Debug)]
struct SequencesArgs {
    #[command(flatten)]
    split: SplitOpts,

    /// Directory for the generated files
    #[arg(short = 'p', long, default_value = "", value_hint = ValueHint::DirPath)]
    path: Utf8PathBuf,
}

#[derive(Args, Debug)]
struct DropRateArgs {
    #[command(flatten)]
    split: SplitOpts,

    /// Also write a mmsi,drop_rate CSV report
    #[arg(long, value_hint = ValueHint::FilePath)]
    csv: Option<Utf8PathBuf>,
}

#[derive(Args, Debug)]
struct CountMmsiArgs {
    #[command(flatten)]
    delimiter: DelimiterArg,

    /// Skip malformed lines instead of aborting
    #[arg(long, action = ArgAction::SetTrue)]
    skip_malformed: bool,
}

#[derive(Args, Debug)]
struct DiffArgs {
    #[command(flatten)]
    delimiter: DelimiterArg,

    /// Index distance between the two reports of a difference
    #[arg(short = 's', long, default_value_t = 1)]
    stride: usize,

    /// Output file for the binary differences
    #[arg(short = 'f', long, value_hint = ValueHint::FilePath)]
    file: Utf8PathBuf,

    /// Skip malformed lines instead of aborting
    #[arg(long, action = ArgAction::SetTrue)]
    skip_malformed: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match cli.command {
        Command::Sequences(args) => handle_sequences(args),
        Command::DropRate(args) => handle_drop_rate(args),
        Command::CountMmsi(args) => handle_count_mmsi(args),
        Command::Diff(args) => handle_diff(args),
    }
}

fn policy_for(skip_malformed: bool) -> FormatPolicy {
    if skip_malformed {
        FormatPolicy::SkipMalformed
    } else {
        FormatPolicy::FailFast
    }
}

fn ingest(sequencer: &mut Sequencer, delimiter: &str, policy: FormatPolicy) -> Result<()> {
    let delimiter = unescape_delimiter(delimiter);
    sequencer
        .ingest(io::stdin().lock(), &delimiter, policy)
        .context("failed to read AIS records from stdin")?;
    Ok(())
}

fn handle_sequences(args: SequencesArgs) -> Result<()> {
    let split_args = args.split.split_args()?;
    let raw_delimiter = &args.split.delimiter.delimiter;

    write_run_args(&args.path, raw_delimiter, &split_args, args.split.low_pass)
        .with_context(|| format!("failed to write args.txt into \"{}\"", args.path))?;

    let mut sequencer = Sequencer::new(split_args);
    ingest(&mut sequencer, raw_delimiter, args.split.policy())?;

    let sequences = sequencer.make_sequences(args.split.low_pass)?;
    let n_files = dump_sequences(&args.path, &sequences)
        .with_context(|| format!("failed to write sequences into \"{}\"", args.path))?;

    info!(files = n_files, dir = %args.path, "sequences written");
    Ok(())
}

fn handle_drop_rate(args: DropRateArgs) -> Result<()> {
    let split_args = args.split.split_args()?;
    if split_args.v_min > 0. {
        bail!("drop rates ignore the minimal speed, -v must be 0");
    }

    let mut sequencer = Sequencer::new(split_args);
    ingest(
        &mut sequencer,
        &args.split.delimiter.delimiter,
        args.split.policy(),
    )?;
    let drop_rates = sequencer.drop_rates(args.split.low_pass)?;

    let mut out = BufWriter::new(io::stdout().lock());
    for (mmsi, rate) in drop_rates.iter().sorted_unstable_by_key(|(mmsi, _)| **mmsi) {
        writeln!(out, "{mmsi}: {rate}")?;
    }
    out.flush()?;

    if let Some(path) = &args.csv {
        let file = File::create(path).with_context(|| format!("failed to create {path}"))?;
        write_drop_rates(BufWriter::new(file), &drop_rates)
            .with_context(|| format!("failed to write {path}"))?;
    }
    Ok(())
}

fn handle_count_mmsi(args: CountMmsiArgs) -> Result<()> {
    let delimiter = unescape_delimiter(&args.delimiter.delimiter);
    let policy = policy_for(args.skip_malformed);
    let counts = count_mmsi(io::stdin().lock(), &delimiter, policy)
        .context("failed to read AIS records from stdin")?;

    let mut out = BufWriter::new(io::stdout().lock());
    for (mmsi, n) in counts {
        writeln!(out, "{mmsi}: {n}")?;
    }
    out.flush()?;
    Ok(())
}

fn handle_diff(args: DiffArgs) -> Result<()> {
    if args.stride == 0 {
        bail!("stride must be at least 1");
    }
    if args.file.as_str().is_empty() {
        bail!("output file name must not be empty");
    }

    let policy = policy_for(args.skip_malformed);
    let mut sequencer = Sequencer::new(SplitArgs::default());
    ingest(&mut sequencer, &args.delimiter.delimiter, policy)?;

    let diffs = sequencer.diffs(args.stride)?;
    dump_diffs(&args.file, &diffs).with_context(|| format!("failed to write {}", args.file))?;

    info!(pairs = diffs.len(), file = %args.file, "differences written");
    Ok(())
}
