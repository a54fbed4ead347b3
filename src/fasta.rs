use crate::error::{MotifError, Result};
use log::debug;
use phf::phf_map;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Watson-Crick pairing for uppercase nucleotides
static COMPLEMENT: phf::Map<u8, u8> = phf_map! {
    b'A' => b'T',
    b'T' => b'A',
    b'C' => b'G',
    b'G' => b'C',
};

/// A named sequence read from a FASTA file
#[derive(Debug, Clone, PartialEq)]
pub struct FastaRecord {
    pub name: String,
    pub sequence: Vec<u8>,
}

impl FastaRecord {
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// Reads every sequence of a FASTA file.
///
/// # Arguments
/// * `filename` - Path to the FASTA file to read
///
/// # Returns
/// * `Result<Vec<FastaRecord>>` - Records in file order, where:
///   - `name` is the first whitespace-delimited token after '>'
///   - `sequence` is the concatenated sequence lines in uppercase
///
/// # Errors
/// * Returns `MotifError::Io` for file reading issues
/// * Returns `MotifError::InvalidFileFormat` if no sequences are found or
///   sequence data appears before the first header
pub fn read_fasta(filename: impl AsRef<Path>) -> Result<Vec<FastaRecord>> {
    let path = filename.as_ref();
    let file = File::open(path).map_err(|e| MotifError::io(e, path))?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    let mut current: Option<FastaRecord> = None;

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| MotifError::io(e, path))?;
        let line = line.trim();

        if let Some(header) = line.strip_prefix('>') {
            if let Some(record) = current.take() {
                records.push(record);
            }
            let name = header.split_whitespace().next().unwrap_or_default();
            current = Some(FastaRecord {
                name: name.to_string(),
                sequence: Vec::new(),
            });
        } else if !line.is_empty() {
            let record = current.as_mut().ok_or_else(|| {
                MotifError::InvalidFileFormat(format!(
                    "sequence data before first header at {}:{}",
                    path.display(),
                    line_num + 1
                ))
            })?;
            record
                .sequence
                .extend(line.bytes().map(|b| b.to_ascii_uppercase()));
        }
    }

    if let Some(record) = current {
        records.push(record);
    }

    if records.is_empty() {
        return Err(MotifError::InvalidFileFormat(format!(
            "No sequences found in {}",
            path.display()
        )));
    }

    debug!("read {} FASTA record(s) from {}", records.len(), path.display());
    Ok(records)
}

/// Reads one sequence from a FASTA file: the record called `name` when given,
/// otherwise the first record.
///
/// # Errors
/// * Everything `read_fasta` returns
/// * Returns `MotifError::SequenceNotFound` if no record carries `name`
pub fn read_sequence(filename: impl AsRef<Path>, name: Option<&str>) -> Result<FastaRecord> {
    let records = read_fasta(filename)?;
    match name {
        Some(name) => records
            .into_iter()
            .find(|r| r.name == name)
            .ok_or_else(|| MotifError::SequenceNotFound(name.to_string())),
        None => records
            .into_iter()
            .next()
            .ok_or_else(|| MotifError::InvalidFileFormat("No sequences found".into())),
    }
}

/// Complement of a single base. Anything other than A, C, G or T is returned
/// unchanged.
#[inline]
pub fn complement(base: u8) -> u8 {
    COMPLEMENT.get(&base).copied().unwrap_or(base)
}

/// Generates the reverse complement of a DNA sequence.
///
/// Matching is case-sensitive: only uppercase A ↔ T and C ↔ G are paired, every
/// other byte (N, IUPAC codes, lowercase) passes through in reversed position.
pub fn reverse_complement(sequence: &[u8]) -> Vec<u8> {
    sequence.iter().rev().map(|&b| complement(b)).collect()
}
