use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One line of decoded stdout from a search process.
pub type RawLine = String;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub word: String,
    pub kind: String,
    pub menu: String,
}

/// Per-call search inputs derived from the completion prefix and params.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub pattern: String,
    pub limit: usize,
    pub tag_files: Vec<PathBuf>,
}

#[derive(Debug, Serialize, Clone, Default)]
pub struct GatherReport {
    pub candidates: Vec<Candidate>,
    pub searched: Vec<PathBuf>,
    pub lines: usize,
}
