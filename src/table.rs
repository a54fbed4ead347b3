use crate::error::{MotifError, Result};
use crate::fasta::reverse_complement;
use crate::types::*;
use log::{debug, info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Number of distinct motifs of `length` over {A, C, G, T}, as the rank divisor
fn motif_space(length: usize) -> f64 {
    4f64.powi(length as i32)
}

/// Rank-derived probability: `1 - rank / 4^L`, with rank 1 for the strongest binder.
///
/// Ranks up to `4^L - 1` land in (0, 1). The boundary rank `4^L` gives exactly 0,
/// and a table with more than `4^L` rows (only possible with duplicate motifs)
/// gives negative values for the ranks past it.
fn rank_probability(rank: usize, length: usize) -> f64 {
    1.0 - (rank as f64 / motif_space(length))
}

/// Sense and antisense score lookups for one receptor.
///
/// Built once from a rank-ordered list of motif energies and never mutated
/// afterwards. Every motif gets its energy and probability under its own key in
/// the sense map and under its reverse complement in the antisense map, so a
/// window of the forward strand can be scored for both strands by two lookups.
#[derive(Debug, Clone)]
pub struct MotifTable {
    receptor: String,
    motif_length: usize,
    sense: ScoreMap,
    antisense: ScoreMap,
}

impl MotifTable {
    /// Builds the lookups from records already in descending energy order.
    ///
    /// # Arguments
    /// * `receptor` - Label of the receptor the energies belong to
    /// * `records` - `(motif, energy)` pairs, strongest first; position `i` has rank `i + 1`
    ///
    /// # Errors
    /// * `MotifError::InvalidParameter` if `records` is empty
    /// * `MotifError::MotifLength` if a motif differs in length from the first one;
    ///   `line` is then the 1-based position in `records`
    pub fn from_records(receptor: impl Into<String>, records: &[TableRecord]) -> Result<Self> {
        let first = records
            .first()
            .ok_or_else(|| MotifError::invalid_parameter("records", 0, "no motifs given"))?;
        let motif_length = first.motif.len();
        if motif_length == 0 {
            return Err(MotifError::invalid_parameter(
                "motif_length",
                0,
                "motifs must not be empty",
            ));
        }

        let mut sense = ScoreMap::with_capacity(records.len());
        let mut antisense = ScoreMap::with_capacity(records.len());
        let mut duplicates = 0usize;
        let mut overwritten = 0usize;

        for (idx, record) in records.iter().enumerate() {
            if record.motif.len() != motif_length {
                return Err(MotifError::MotifLength {
                    line: idx + 1,
                    expected: motif_length,
                    found: record.motif.len(),
                });
            }

            let score = MotifScore {
                energy: record.energy,
                probability: rank_probability(idx + 1, motif_length),
            };
            if sense.insert(record.motif.clone(), score).is_some() {
                duplicates += 1;
            }
            if antisense
                .insert(reverse_complement(&record.motif), score)
                .is_some()
            {
                overwritten += 1;
            }
        }

        if duplicates > 0 {
            warn!("{} duplicate motif(s) in table; later entries replace earlier ones", duplicates);
        }
        debug!("{} antisense key(s) overwritten by later motifs", overwritten);

        Ok(MotifTable {
            receptor: receptor.into(),
            motif_length,
            sense,
            antisense,
        })
    }

    /// Reads an energy table file and builds the lookups from it.
    ///
    /// See [`read_energy_table`] for the file format and `sort` semantics.
    pub fn load(receptor: impl Into<String>, filename: impl AsRef<Path>, sort: bool) -> Result<Self> {
        let receptor = receptor.into();
        let records = read_energy_table(&filename, sort)?;
        let table = Self::from_records(receptor, &records)?;
        info!(
            "loaded {} motifs of length {} for receptor {}",
            records.len(),
            table.motif_length,
            table.receptor
        );
        Ok(table)
    }

    pub fn receptor(&self) -> &str {
        &self.receptor
    }

    pub fn motif_length(&self) -> usize {
        self.motif_length
    }

    /// Number of distinct sense motifs
    pub fn len(&self) -> usize {
        self.sense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sense.is_empty()
    }

    /// Sense-strand score of `motif`; zero energy and probability when unseen
    pub fn sense(&self, motif: &[u8]) -> MotifScore {
        self.sense.get(motif).copied().unwrap_or_default()
    }

    /// Score carried by the motif whose reverse complement is `motif`; zero when unseen
    pub fn antisense(&self, motif: &[u8]) -> MotifScore {
        self.antisense.get(motif).copied().unwrap_or_default()
    }

    pub fn sense_energy(&self, motif: &[u8]) -> f32 {
        self.sense(motif).energy
    }

    pub fn sense_probability(&self, motif: &[u8]) -> f64 {
        self.sense(motif).probability
    }

    pub fn antisense_energy(&self, motif: &[u8]) -> f32 {
        self.antisense(motif).energy
    }

    pub fn antisense_probability(&self, motif: &[u8]) -> f64 {
        self.antisense(motif).probability
    }
}

/// Parses one `motif <whitespace> energy` line
fn parse_record(line_num: usize, line: &str) -> Result<TableRecord> {
    let mut fields = line.split_whitespace();
    let (motif, energy) = match (fields.next(), fields.next(), fields.next()) {
        (Some(motif), Some(energy), None) => (motif, energy),
        _ => {
            return Err(MotifError::parse(
                line_num,
                line,
                "expected a motif and an energy separated by whitespace",
            ))
        }
    };

    let motif = motif.to_ascii_uppercase().into_bytes();
    if let Some(bad) = motif.iter().find(|b| !matches!(b, b'A' | b'C' | b'G' | b'T')) {
        return Err(MotifError::parse(
            line_num,
            line,
            format!("motif contains non-ACGT symbol '{}'", *bad as char),
        ));
    }

    let energy: f32 = energy
        .parse()
        .map_err(|e| MotifError::parse(line_num, line, format!("invalid energy: {}", e)))?;
    if !energy.is_finite() {
        return Err(MotifError::parse(line_num, line, "energy is not finite"));
    }

    Ok(TableRecord { motif, energy })
}

/// Reads a motif energy table.
///
/// One record per line, a motif and its energy separated by whitespace. Blank
/// lines and lines starting with '#' are skipped. Motifs are uppercased.
///
/// # Arguments
/// * `filename` - Path to the table
/// * `sort` - When true, records are stably sorted by descending energy. When
///   false, the file must already be in non-increasing energy order.
///
/// # Errors
/// * `MotifError::Io` - If the file cannot be opened or read
/// * `MotifError::Parse` - If a line is not a motif followed by a finite number
/// * `MotifError::MotifLength` - If a motif differs in length from the first one
/// * `MotifError::Unsorted` - If `sort` is false and an energy exceeds the one before it
/// * `MotifError::EmptyTable` - If no records are found
pub fn read_energy_table(filename: impl AsRef<Path>, sort: bool) -> Result<Vec<TableRecord>> {
    let path = filename.as_ref();
    let file = File::open(path).map_err(|e| MotifError::io(e, path))?;
    let reader = BufReader::new(file);

    let mut records: Vec<TableRecord> = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| MotifError::io(e, path))?;
        let line_num = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let record = parse_record(line_num, trimmed)?;

        if let Some(first) = records.first() {
            if record.motif.len() != first.motif.len() {
                return Err(MotifError::MotifLength {
                    line: line_num,
                    expected: first.motif.len(),
                    found: record.motif.len(),
                });
            }
        }
        if let Some(previous) = records.last() {
            if !sort && record.energy > previous.energy {
                return Err(MotifError::Unsorted {
                    line: line_num,
                    previous: previous.energy,
                    current: record.energy,
                });
            }
        }

        records.push(record);
    }

    if records.is_empty() {
        return Err(MotifError::EmptyTable(path.to_path_buf()));
    }

    if sort {
        records.sort_by(|a, b| b.energy.total_cmp(&a.energy));
    }

    Ok(records)
}
