use std::collections::HashMap;
use std::fmt;

/// Energy and rank-derived probability attached to one motif key
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotifScore {
    pub energy: f32,
    pub probability: f64,
}

/// Scores indexed by motif bytes. Lookups take `&[u8]` windows directly.
pub type ScoreMap = HashMap<Vec<u8>, MotifScore>;

/// One `(motif, energy)` line of an energy table
#[derive(Debug, Clone, PartialEq)]
pub struct TableRecord {
    pub motif: Vec<u8>,
    pub energy: f32,
}

/// Strand a window was scored on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Sense,
    Antisense,
}

impl Strand {
    pub fn symbol(self) -> char {
        match self {
            Strand::Sense => '+',
            Strand::Antisense => '-',
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
