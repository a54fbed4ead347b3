//! Transcription factor binding site scanning in Rust
//!
//! A chromosome is scanned against a rank-ordered table of motif energies for a
//! single receptor. Every window gets an energy and a rank-derived probability on
//! both strands, and windows above a probability cutoff are reported as putative
//! binding sites.

pub mod error;
pub mod fasta;
pub mod report;
pub mod scan;
pub mod table;
pub mod types;
