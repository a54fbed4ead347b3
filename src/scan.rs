use crate::table::MotifTable;
use crate::types::MotifScore;
use log::debug;
use ndarray::Array1;
use rayon::prelude::*;

/// Per-window energies and probabilities of one sequence on both strands.
///
/// Index `i` of every track scores the window covering `[i, i + motif_length)`
/// of the sequence, so each track holds `N - L + 1` values, or none when the
/// sequence is shorter than a motif.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    pub seq_name: String,
    pub receptor: String,
    pub motif_length: usize,
    pub sense_energy: Array1<f32>,
    pub sense_probability: Array1<f64>,
    pub antisense_energy: Array1<f32>,
    pub antisense_probability: Array1<f64>,
}

impl ScanResult {
    fn from_scores(
        table: &MotifTable,
        seq_name: &str,
        scores: impl ExactSizeIterator<Item = (MotifScore, MotifScore)>,
    ) -> Self {
        let n = scores.len();
        let mut sense_energy = Vec::with_capacity(n);
        let mut sense_probability = Vec::with_capacity(n);
        let mut antisense_energy = Vec::with_capacity(n);
        let mut antisense_probability = Vec::with_capacity(n);

        for (sense, antisense) in scores {
            sense_energy.push(sense.energy);
            sense_probability.push(sense.probability);
            antisense_energy.push(antisense.energy);
            antisense_probability.push(antisense.probability);
        }

        ScanResult {
            seq_name: seq_name.to_string(),
            receptor: table.receptor().to_string(),
            motif_length: table.motif_length(),
            sense_energy: Array1::from(sense_energy),
            sense_probability: Array1::from(sense_probability),
            antisense_energy: Array1::from(antisense_energy),
            antisense_probability: Array1::from(antisense_probability),
        }
    }

    /// Number of scored windows
    pub fn len(&self) -> usize {
        self.sense_probability.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sense_probability.is_empty()
    }

    /// 1-based inclusive `(start, end)` of window `i`
    pub fn interval(&self, i: usize) -> (usize, usize) {
        (i + 1, i + self.motif_length)
    }
}

impl MotifTable {
    /// Scores every window of `sequence` on both strands, one window at a time.
    ///
    /// Windows absent from the table, including any containing N or other
    /// ambiguity codes, score zero energy and zero probability.
    pub fn scan(&self, seq_name: &str, sequence: &[u8]) -> ScanResult {
        let scores = sequence
            .windows(self.motif_length())
            .map(|window| (self.sense(window), self.antisense(window)));
        let result = ScanResult::from_scores(self, seq_name, scores);
        debug!("scanned {} windows of {}", result.len(), seq_name);
        result
    }

    /// Same result as [`MotifTable::scan`], with windows scored on the current
    /// rayon pool. Output stays in positional order.
    pub fn scan_parallel(&self, seq_name: &str, sequence: &[u8]) -> ScanResult {
        let scores: Vec<(MotifScore, MotifScore)> = sequence
            .par_windows(self.motif_length())
            .map(|window| (self.sense(window), self.antisense(window)))
            .collect();
        let result = ScanResult::from_scores(self, seq_name, scores.into_iter());
        debug!(
            "scanned {} windows of {} on {} threads",
            result.len(),
            seq_name,
            rayon::current_num_threads()
        );
        result
    }
}
