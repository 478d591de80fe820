use crate::model::{Candidate, RawLine};

/// Text after the last `separator`, or `content` unchanged when absent.
pub fn split(content: &str, separator: &str) -> String {
    match content.rsplit_once(separator) {
        Some((_, last)) if !last.is_empty() => last.to_string(),
        _ => content.to_string(),
    }
}

/// Parse one tag line. Needs at least four tab-separated fields:
/// name, menu text, (unused), kind.
pub fn parse_line(line: &str) -> Option<Candidate> {
    let parts: Vec<&str> = line.split('\t').collect();
    if parts.len() < 4 {
        return None;
    }
    Some(Candidate {
        word: split(parts[0], ":"),
        kind: split(parts[3], ":"),
        menu: parts[1].to_string(),
    })
}

/// Parse raw lines in order until `limit` candidates are produced.
pub fn parse_candidates(lines: &[RawLine], limit: usize) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for line in lines {
        if candidates.len() >= limit {
            break;
        }
        match parse_line(line) {
            Some(candidate) => candidates.push(candidate),
            None => tracing::trace!("skip malformed tag line: {line:?}"),
        }
    }
    candidates
}
