use std::sync::LazyLock;

use regex::Regex;

/// A run of decimal digits (any script) followed by a literal dot.
static NUMBERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.").unwrap());

/// Whether flattened paragraph text reads like a numbered question
/// ("1.", "165." prefixes). Loose on purpose: any digit-prefixed bold
/// paragraph qualifies.
pub fn is_numbered(text: &str) -> bool {
    NUMBERED.is_match(text)
}
