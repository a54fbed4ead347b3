use clap::Parser;
use log::info;
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tfbs_scan::error::MotifError;
use tfbs_scan::fasta::{read_sequence, FastaRecord};
use tfbs_scan::report::{write_parquet, write_report, ReportOptions, ReportSummary};
use tfbs_scan::scan::ScanResult;
use tfbs_scan::table::MotifTable;

#[derive(thiserror::Error, Debug)]
pub enum ScannerError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Motif(#[from] MotifError),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Long options that may also be spelled with a single dash, e.g. `-chr`
const SINGLE_DASH_LONG_FLAGS: &[&str] = &[
    "chr",
    "table",
    "receptor",
    "seqname",
    "threshold",
    "sort-table",
    "threads",
    "output",
    "quiet",
];

/// Long options whose next argument is their value
const VALUE_FLAGS: &[&str] = &[
    "chr",
    "table",
    "receptor",
    "seqname",
    "threshold",
    "threads",
    "output",
];

#[derive(Parser)]
#[command(
    name = "tfbs-scanner",
    about = "Scans a chromosome for transcription factor binding sites using a ranked motif energy table",
    long_about = "Slides a window the width of the table's motifs across the chromosome and scores every \
                  position on both strands with the motif energy and a rank-derived probability \
                  (1 - rank / 4^L). Positions whose probability exceeds the threshold are written as \
                  a tab-separated table of putative binding sites.",
    version,
    after_help = "Example usage:\n    \
                  tfbs-scanner --chr chrY.fasta --table P10589.txt > P10589.chrY.tsv\n    \
                  tfbs-scanner -chr genome.fa -table P19793.txt --seqname chr2 --threads 8 --output hits.parquet",
    color = clap::ColorChoice::Auto
)]
#[derive(Debug)]
struct Args {
    /// Chromosome FASTA file
    #[arg(long, value_name = "FASTA")]
    chr: PathBuf,

    /// Receptor energy table, one "motif energy" pair per line
    /// (IMPORTANT: descending energy order unless --sort-table is given)
    #[arg(long, value_name = "TABLE")]
    table: PathBuf,

    /// Receptor name; defaults to the table file name without extension
    #[arg(long, allow_hyphen_values = true)]
    receptor: Option<String>,

    /// Name of the FASTA record to scan; defaults to the first record
    #[arg(long, allow_hyphen_values = true)]
    seqname: Option<String>,

    /// Probability cutoff; positions scoring strictly above it are reported
    #[arg(long, default_value = "0.5")]
    threshold: f64,

    /// Sort the table by descending energy instead of rejecting an unsorted table
    #[arg(long)]
    sort_table: bool,

    /// Scanning threads; 1 scans sequentially, 0 uses every core
    #[arg(long, default_value = "1")]
    threads: usize,

    /// Write the report here instead of stdout (.parquet writes a Parquet table)
    #[arg(long, value_name = "OUTPUT_FILE")]
    output: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(long)]
    quiet: bool,
}

/// Rewrites `-chr` style options into `--chr` so both spellings parse. The
/// argument after an option that takes a value is passed through untouched.
fn expand_single_dash_flags(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    let mut is_value = false;
    args.into_iter()
        .map(|arg| {
            if std::mem::take(&mut is_value) {
                return arg;
            }
            let expanded = arg.to_str().and_then(|s| {
                let rest = s.strip_prefix('-')?;
                if rest.starts_with('-') {
                    return None;
                }
                let name = rest.split('=').next().unwrap_or(rest);
                SINGLE_DASH_LONG_FLAGS
                    .contains(&name)
                    .then(|| OsString::from(format!("-{}", s)))
            });
            let arg = expanded.unwrap_or(arg);
            is_value = arg
                .to_str()
                .and_then(|s| s.strip_prefix("--"))
                .is_some_and(|name| VALUE_FLAGS.contains(&name));
            arg
        })
        .collect()
}

fn receptor_name(args: &Args) -> String {
    args.receptor.clone().unwrap_or_else(|| {
        args.table
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "receptor".to_string())
    })
}

fn scan_sequence(
    table: &MotifTable,
    record: &FastaRecord,
    threads: usize,
) -> Result<ScanResult, ScannerError> {
    if threads == 1 {
        return Ok(table.scan(&record.name, &record.sequence));
    }
    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
    Ok(pool.install(|| table.scan_parallel(&record.name, &record.sequence)))
}

fn is_parquet(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"))
}

fn write_output(
    output: Option<&Path>,
    result: &ScanResult,
    options: &ReportOptions,
) -> Result<ReportSummary, ScannerError> {
    match output {
        Some(path) if is_parquet(path) => Ok(write_parquet(path, result, options)?),
        Some(path) => {
            let file = File::create(path).map_err(|e| MotifError::io(e, path))?;
            Ok(write_report(&mut BufWriter::new(file), result, options)?)
        }
        None => {
            let stdout = io::stdout();
            Ok(write_report(&mut BufWriter::new(stdout.lock()), result, options)?)
        }
    }
}

fn run(args: &Args) -> Result<(), ScannerError> {
    let start_time = Instant::now();

    let options = ReportOptions::new(args.threshold)?;

    let record = read_sequence(&args.chr, args.seqname.as_deref())?;
    info!("sequence {} ({} bp)", record.name, record.len());

    let table = MotifTable::load(receptor_name(args), &args.table, args.sort_table)?;

    let result = scan_sequence(&table, &record, args.threads)?;
    info!("{} windows scanned", result.len());

    let summary = write_output(args.output.as_deref(), &result, &options)?;
    info!(
        "{} putative sites above {} ({} on +, {} on -)",
        summary.total(),
        options.threshold,
        summary.sense_hits,
        summary.antisense_hits
    );

    let elapsed = start_time.elapsed();
    info!(
        "Total execution time: {:.4} minutes",
        elapsed.as_secs_f64() / 60.0
    );

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse_from(expand_single_dash_flags(std::env::args_os()));

    let level = if args.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
