//! Prompt construction for equivalence checks

use crate::core::constants::{keyword, role};
use crate::models::openai::OpenAIMessage;

/// Build the chat messages asking whether `expr1` and `expr2` are equivalent
///
/// Always a system message followed by one user message. Expressions are
/// embedded verbatim; no parsing or normalization happens here.
pub fn generate_prompt(expr1: &str, expr2: &str) -> Vec<OpenAIMessage> {
    let system = format!(
        "You are a mathematics expert. Decide whether two mathematical expressions are \
         mathematically equivalent, i.e. equal for every admissible value of their variables. \
         Reply with exactly one word and nothing else: \"{}\" if they are equivalent, \
         \"{}\" if they are not.",
        keyword::EQUIVALENT,
        keyword::NOT_EQUIVALENT
    );

    let user = format!(
        "Expression 1: {}\nExpression 2: {}\nAre these two expressions equivalent? \
         Answer \"{}\" or \"{}\".",
        expr1,
        expr2,
        keyword::EQUIVALENT,
        keyword::NOT_EQUIVALENT
    );

    vec![
        OpenAIMessage::text(role::SYSTEM, system),
        OpenAIMessage::text(role::USER, user),
    ]
}
