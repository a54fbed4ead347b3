use crate::error::{MotifError, Result};
use crate::scan::ScanResult;
use crate::types::Strand;
use polars::prelude::{Column, DataFrame, ParquetWriter};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Header row of the text report
pub const HEADER: &str = "seqname\tstart\tend\tscore\tstrand";

const DEFAULT_THRESHOLD: f64 = 0.5;

/// Reporting parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportOptions {
    /// Windows whose probability is strictly greater than this are reported
    pub threshold: f64,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl ReportOptions {
    /// # Errors
    /// * `MotifError::InvalidParameter` if `threshold` is outside `[0, 1]`
    pub fn new(threshold: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(MotifError::invalid_parameter(
                "threshold",
                threshold,
                "must be between 0 and 1",
            ));
        }
        Ok(ReportOptions { threshold })
    }
}

/// A putative binding site on one strand
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit<'a> {
    pub seq_name: &'a str,
    /// 1-based, inclusive
    pub start: usize,
    /// 1-based, inclusive
    pub end: usize,
    pub score: f64,
    pub strand: Strand,
}

/// Row counts of a written report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub sense_hits: usize,
    pub antisense_hits: usize,
}

impl ReportSummary {
    pub fn total(&self) -> usize {
        self.sense_hits + self.antisense_hits
    }
}

/// Windows passing the threshold in positional order. At each position the
/// sense hit, if any, precedes the antisense hit.
pub fn hits<'a>(result: &'a ScanResult, options: &ReportOptions) -> impl Iterator<Item = Hit<'a>> {
    let threshold = options.threshold;
    let seq_name: &'a str = &result.seq_name;
    (0..result.len()).flat_map(move |i| {
        let (start, end) = result.interval(i);
        let hit = |score: f64, strand: Strand| {
            (score > threshold).then_some(Hit {
                seq_name,
                start,
                end,
                score,
                strand,
            })
        };
        hit(result.sense_probability[i], Strand::Sense)
            .into_iter()
            .chain(hit(result.antisense_probability[i], Strand::Antisense))
    })
}

pub fn collect_hits<'a>(result: &'a ScanResult, options: &ReportOptions) -> Vec<Hit<'a>> {
    hits(result, options).collect()
}

/// Writes the tab-separated report: the header, then one row per hit with the
/// score to two decimals.
pub fn write_report<W: Write>(
    writer: &mut W,
    result: &ScanResult,
    options: &ReportOptions,
) -> io::Result<ReportSummary> {
    let mut summary = ReportSummary::default();
    writeln!(writer, "{}", HEADER)?;
    for hit in hits(result, options) {
        writeln!(
            writer,
            "{}\t{}\t{}\t{:.2}\t{}",
            hit.seq_name, hit.start, hit.end, hit.score, hit.strand
        )?;
        match hit.strand {
            Strand::Sense => summary.sense_hits += 1,
            Strand::Antisense => summary.antisense_hits += 1,
        }
    }
    writer.flush()?;
    Ok(summary)
}

/// Hits as a DataFrame with columns `seqname`, `start`, `end`, `score`, `strand`
pub fn hits_frame(hits: &[Hit]) -> Result<DataFrame> {
    let seq_names: Vec<&str> = hits.iter().map(|h| h.seq_name).collect();
    let starts: Vec<u64> = hits.iter().map(|h| h.start as u64).collect();
    let ends: Vec<u64> = hits.iter().map(|h| h.end as u64).collect();
    let scores: Vec<f64> = hits.iter().map(|h| h.score).collect();
    let strands: Vec<String> = hits.iter().map(|h| h.strand.to_string()).collect();

    DataFrame::new(vec![
        Column::new("seqname".into(), seq_names),
        Column::new("start".into(), starts),
        Column::new("end".into(), ends),
        Column::new("score".into(), scores),
        Column::new("strand".into(), strands),
    ])
    .map_err(|e| MotifError::DataError(e.to_string()))
}

/// Writes the hits of `result` to a Parquet file
pub fn write_parquet(
    filename: impl AsRef<Path>,
    result: &ScanResult,
    options: &ReportOptions,
) -> Result<ReportSummary> {
    let path = filename.as_ref();
    let hits = collect_hits(result, options);
    let summary = ReportSummary {
        sense_hits: hits.iter().filter(|h| h.strand == Strand::Sense).count(),
        antisense_hits: hits.iter().filter(|h| h.strand == Strand::Antisense).count(),
    };

    let mut df = hits_frame(&hits)?;
    let file = File::create(path).map_err(|e| MotifError::io(e, path))?;
    ParquetWriter::new(file)
        .finish(&mut df)
        .map_err(|e| MotifError::DataError(e.to_string()))?;

    Ok(summary)
}
