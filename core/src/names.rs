//! Lexical rules for names and string payloads.
//!
//! The rules are ASCII based:
//!
//! - graphic char: `0x21..=0x7E`
//! - reserved: `(` `)` `<` `>` `,` `"`
//! - parameter name: `<` (graphic - reserved)+ `>`
//! - predicate / schema name: (graphic - reserved)+
//! - nominal: (graphic - reserved | space)+, no leading or trailing space
//! - quote string: (graphic - `"` | space)*
//! - text string: anything but backspace

/// Characters that delimit the canonical text form and so may not appear
/// inside names or nominals.
const RESERVED: [char; 6] = ['(', ')', '<', '>', ',', '"'];

fn is_graphic(ch: char) -> bool {
    ('\u{21}'..='\u{7e}').contains(&ch)
}

fn is_name_char(ch: char) -> bool {
    is_graphic(ch) && !RESERVED.contains(&ch)
}

/// Returns `true` if `name` is a valid formal parameter name such as `<arg1>`.
///
/// ```
/// use annotdb_core::names::is_valid_param_name;
///
/// assert!(is_valid_param_name("<arg1>"));
/// assert!(!is_valid_param_name("<>"));
/// assert!(!is_valid_param_name("arg1"));
/// ```
#[must_use]
pub fn is_valid_param_name(name: &str) -> bool {
    match name.strip_prefix('<').and_then(|rest| rest.strip_suffix('>')) {
        Some(inner) => !inner.is_empty() && inner.chars().all(is_name_char),
        None => false,
    }
}

/// Returns `true` if `name` is a valid predicate or tuple-schema name.
#[must_use]
pub fn is_valid_schema_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_name_char)
}

/// Returns `true` if `s` is a valid nominal.
#[must_use]
pub fn is_valid_nominal(s: &str) -> bool {
    if s.is_empty() || s.starts_with(' ') || s.ends_with(' ') {
        return false;
    }
    s.chars().all(|ch| ch == ' ' || is_name_char(ch))
}

/// Returns `true` if `s` is a valid quote string (the quotes themselves are
/// not part of the payload).
#[must_use]
pub fn is_valid_quote_string(s: &str) -> bool {
    s.chars().all(|ch| ch == ' ' || (is_graphic(ch) && ch != '"'))
}

/// Returns `true` if `s` is a valid text string.
#[must_use]
pub fn is_valid_text_string(s: &str) -> bool {
    !s.contains('\u{8}')
}
