//! Character classification predicates for the grid document grammar.
//!
//! These are pure functions over a single codepoint (or, for `is_unit`, a
//! whole string) with no lexer state. Keeping them free functions instead
//! of methods on `Lexer` makes each one independently testable and lets
//! the reader (§4.5) reuse the same rules the lexer used to recognise the
//! lexeme in the first place.

pub fn is_alpha_lo(c: char) -> bool {
    c.is_ascii_lowercase()
}

pub fn is_alpha_hi(c: char) -> bool {
    c.is_ascii_uppercase()
}

pub fn is_alpha(c: char) -> bool {
    is_alpha_lo(c) || is_alpha_hi(c)
}

pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

pub fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

pub fn is_id_start(c: char) -> bool {
    is_alpha_lo(c)
}

pub fn is_id_part(c: char) -> bool {
    is_alpha(c) || is_digit(c) || c == '_'
}

pub fn is_keyword_start(c: char) -> bool {
    is_alpha_hi(c)
}

pub fn is_keyword_part(c: char) -> bool {
    is_alpha(c)
}

/// Shared by ref and symbol bodies: the source grammar gives them the
/// identical part-alphabet, distinguished only by their start sigil.
pub fn is_ref_part(c: char) -> bool {
    is_alpha(c) || is_digit(c) || matches!(c, '_' | ':' | '-' | '.' | '~')
}

pub fn is_ref_start(c: char) -> bool {
    c == '@'
}

pub fn is_ref_end(c: char) -> bool {
    c == ' '
}

pub fn is_symbol_start(c: char) -> bool {
    c == '^'
}

pub fn is_symbol_part(c: char) -> bool {
    is_ref_part(c)
}

pub fn is_str_start(c: char) -> bool {
    c == '"'
}

pub fn is_str_end(c: char) -> bool {
    c == '"'
}

pub fn is_uri_start(c: char) -> bool {
    c == '`'
}

pub fn is_uri_end(c: char) -> bool {
    c == '`'
}

pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{00A0}')
}

/// Newline is a token (`LINEFEED`), never whitespace.
pub fn is_unicode_char(c: char) -> bool {
    (c as u32) >= 0x20
}

pub fn is_str_escaped_char(c: char) -> bool {
    matches!(c, 'b' | 'f' | 'n' | 'r' | 't' | '\\' | '$' | '"')
}

pub fn is_uri_escaped_char(c: char) -> bool {
    matches!(
        c,
        ':' | '/' | '?' | '#' | '[' | ']' | '@' | '`' | '\\' | '&' | '=' | ';'
    )
}

pub fn is_unit_char(c: char) -> bool {
    is_alpha(c) || matches!(c, '%' | '_' | '/' | '$') || (c as u32) > 0x7F
}

pub fn is_unit(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_unit_char)
}

pub fn is_number_start(c: char) -> bool {
    is_digit(c) || c == '-'
}

pub fn is_nan(s: &str) -> bool {
    s == "NaN"
}

pub fn is_pos_inf(s: &str) -> bool {
    s == "INF"
}

pub fn is_neg_inf(s: &str) -> bool {
    s == "-INF"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_start_is_lowercase_only() {
        assert!(is_id_start('a'));
        assert!(!is_id_start('A'));
        assert!(!is_id_start('_'));
    }

    #[test]
    fn unit_chars_allow_high_codepoints() {
        assert!(is_unit_char('\u{00B0}'));
        assert!(is_unit("kWh"));
        assert!(is_unit("%"));
        assert!(!is_unit("kW h"));
        assert!(!is_unit(""));
    }

    #[test]
    fn ref_and_symbol_share_part_alphabet() {
        for c in ['a', 'Z', '3', '_', ':', '-', '.', '~'] {
            assert!(is_ref_part(c));
            assert!(is_symbol_part(c));
        }
        assert!(!is_ref_part(' '));
    }

    #[test]
    fn number_singletons() {
        assert!(is_nan("NaN"));
        assert!(is_pos_inf("INF"));
        assert!(is_neg_inf("-INF"));
        assert!(!is_pos_inf("-INF"));
    }
}
