//! Pre-evaluation screen over the executable form.
//!
//! Option names are attacker-influenceable and flow verbatim into the
//! executable rendering, so before anything is evaluated every free
//! identifier in that rendering is checked against a fixed allow-list. The
//! evaluator itself never executes text; this screen preserves the
//! guarantee that a value which would have broken out of its quotes under
//! text execution is rejected by name, strictly before any operator runs.

use crate::error::QualityError;

/// The only identifiers an executable form may contain: the boolean cast,
/// the word-shaped operators, and the boolean literals.
const SAFE_NAMES: [&str; 5] = ["bool", "and", "or", "true", "false"];

/// Scan the executable form and fail with [`QualityError::UntrustedOperation`]
/// if any identifier outside the allow-list appears. Content inside double
/// quotes is skipped; an embedded quote toggles the string state, so text
/// that escapes its quoting surfaces its tail as identifiers here.
pub fn screen(executable: &str) -> Result<(), QualityError> {
    let mut names: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_string = false;
    for ch in executable.chars() {
        if in_string {
            if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => {
                flush(&mut current, &mut names);
                in_string = true;
            }
            c if c.is_alphanumeric() || c == '_' || c == '.' => current.push(c),
            _ => flush(&mut current, &mut names),
        }
    }
    flush(&mut current, &mut names);
    if names.is_empty() {
        Ok(())
    } else {
        Err(QualityError::UntrustedOperation { names })
    }
}

fn flush(current: &mut String, names: &mut Vec<String>) {
    if current.is_empty() {
        return;
    }
    let token = std::mem::take(current);
    if token.parse::<rust_decimal::Decimal>().is_ok() {
        return;
    }
    if SAFE_NAMES.contains(&token.as_str()) {
        return;
    }
    if !names.contains(&token) {
        names.push(token);
    }
}
