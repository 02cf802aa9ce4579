//! Parsing model replies into verdicts

use crate::core::constants::keyword;
use crate::models::check::CheckOutcome;

/// What the model said about the two expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Equivalent,
    NotEquivalent,
    Unknown,
}

impl From<Verdict> for CheckOutcome {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Equivalent => CheckOutcome::Equivalent,
            Verdict::NotEquivalent => CheckOutcome::NotEquivalent,
            Verdict::Unknown => CheckOutcome::Unknown,
        }
    }
}

/// Parse a model reply
///
/// Returns the verdict together with the trimmed reply. Negative phrases are
/// matched first since "等价" and "equivalent" occur inside them.
pub fn parse_equivalence_result(text: &str) -> (Verdict, String) {
    let raw = text.trim().to_string();
    let lowered = raw.to_lowercase();

    let verdict = if keyword::NEGATIVE.iter().any(|k| lowered.contains(*k)) {
        Verdict::NotEquivalent
    } else if keyword::POSITIVE.iter().any(|k| lowered.contains(*k)) {
        Verdict::Equivalent
    } else {
        Verdict::Unknown
    };

    (verdict, raw)
}
