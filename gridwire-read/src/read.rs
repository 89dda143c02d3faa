//! Lexical value readers (§4.5): turn a token's verbatim source text into
//! a typed value. The lexer only classifies a lexeme's *shape*; decoding
//! escapes, splitting a unit suffix off a number, and validating a
//! calendar date all happen here, re-walking the raw text the lexer
//! already scanned once.

use chrono::{FixedOffset, NaiveDate, TimeZone};
use gridwire_lex::grammar::{is_hex_digit, is_nan, is_neg_inf, is_pos_inf, is_unit_char};
use gridwire_util::{ReadError, Span};

use crate::value::{Coord, Date, DateTime, Num, Ref, Time};

pub fn read_bool(text: &str, span: Span) -> Result<bool, ReadError> {
    match text {
        "T" => Ok(true),
        "F" => Ok(false),
        _ => Err(ReadError::invalid(
            format!("invalid boolean, expected 'T' or 'F', got {text:?}"),
            span,
        )),
    }
}

/// Strips the sigil (`@` or `^`) the lexer folded into the lexeme.
pub fn read_ref(text: &str) -> Ref {
    Ref::new(text.trim_start_matches('@'))
}

pub fn read_symbol(text: &str) -> String {
    text.trim_start_matches('^').to_string()
}

pub fn read_uri(text: &str, span: Span) -> Result<String, ReadError> {
    read_delimited(text, '`', decode_uri_escape, span)
}

pub fn read_str(text: &str, span: Span) -> Result<String, ReadError> {
    read_delimited(text, '"', decode_str_escape, span)
}

/// URI escapes are unusual: only a `` \` `` is actually unescaped (to a
/// bare backtick); every other recognised escape is kept verbatim,
/// backslash included, since a URI's own text may need to carry it.
fn decode_uri_escape(escaped: char) -> Option<String> {
    match escaped {
        ':' | '/' | '?' | '#' | '[' | ']' | '@' | '\\' | '&' | '=' | ';' => {
            Some(format!("\\{escaped}"))
        }
        '`' => Some("`".to_string()),
        _ => None,
    }
}

fn decode_str_escape(escaped: char) -> Option<String> {
    match escaped {
        'b' => Some("\u{8}".to_string()),
        'f' => Some("\u{c}".to_string()),
        'n' => Some("\n".to_string()),
        'r' => Some("\r".to_string()),
        't' => Some("\t".to_string()),
        '\\' => Some("\\".to_string()),
        '$' => Some("$".to_string()),
        '"' => Some("\"".to_string()),
        _ => None,
    }
}

/// Shared body of §4.5's string/URI decode: strip the one-char
/// delimiters the lexer kept in the lexeme, then re-walk the body
/// collapsing `\X` escapes (via `decode_escape`) and `\uXXXX`.
fn read_delimited(
    text: &str,
    delim: char,
    decode_escape: fn(char) -> Option<String>,
    span: Span,
) -> Result<String, ReadError> {
    let mut chars = text.chars();
    if chars.next() != Some(delim) {
        return Err(ReadError::invalid(format!("missing {delim:?} at start"), span));
    }

    let mut out = String::with_capacity(text.len());
    loop {
        let Some(c) = chars.next() else {
            return Err(ReadError::invalid("missing closing delimiter", span));
        };
        if c == delim {
            break;
        }
        if c == '\\' {
            let Some(escape) = chars.next() else {
                return Err(ReadError::invalid("dangling escape at end of literal", span));
            };
            if escape == 'u' {
                let hex: String = (&mut chars).take(4).collect();
                if hex.len() != 4 || !hex.chars().all(is_hex_digit) {
                    return Err(ReadError::invalid("invalid \\u escape", span));
                }
                let code = u32::from_str_radix(&hex, 16)
                    .map_err(|_| ReadError::invalid("invalid \\u escape", span))?;
                let decoded = char::from_u32(code)
                    .ok_or_else(|| ReadError::invalid("\\u escape is not a valid codepoint", span))?;
                out.push(decoded);
            } else {
                let decoded = decode_escape(escape)
                    .ok_or_else(|| ReadError::invalid(format!("invalid escaped char {escape:?}"), span))?;
                out.push_str(&decoded);
            }
            continue;
        }
        out.push(c);
    }
    Ok(out)
}

/// Splits a numeric lexeme into its numeric prefix and trailing unit
/// suffix (everything from the first unit-only character onward), then
/// parses the prefix as an `f64`. The `NaN`/`INF`/`-INF` singletons are
/// recognised before any of that, since they carry no digits at all.
pub fn read_num(text: &str, span: Span) -> Result<Num, ReadError> {
    if is_nan(text) {
        return Ok(Num::nan());
    }
    if is_pos_inf(text) {
        return Ok(Num::pos_inf());
    }
    if is_neg_inf(text) {
        return Ok(Num::neg_inf());
    }

    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("-0x")) {
        let digits: String = hex.chars().filter(|&c| c != '_').collect();
        let value = i64::from_str_radix(&digits, 16)
            .map_err(|_| ReadError::invalid(format!("invalid hex number {text:?}"), span))?;
        let signed = if text.starts_with('-') { -value } else { value };
        return Ok(Num::plain(signed as f64));
    }

    let split_at = text
        .char_indices()
        .find(|&(i, c)| is_unit_char(c) && !is_exponent_marker(text, i, c))
        .map(|(i, _)| i);

    let (numeric, unit) = match split_at {
        Some(i) => (&text[..i], Some(text[i..].to_string())),
        None => (text, None),
    };
    let numeric: String = numeric.chars().filter(|&c| c != '_').collect();

    let value: f64 = numeric
        .parse()
        .map_err(|_| ReadError::invalid(format!("invalid number {text:?}"), span))?;

    Ok(Num::new(value, unit))
}

/// `is_unit_char` alone can't tell an `e`/`E` exponent marker from the
/// start of a unit named `e` or `E...`; an exponent marker is always
/// immediately followed by a sign or a digit.
fn is_exponent_marker(text: &str, index: usize, c: char) -> bool {
    if !matches!(c, 'e' | 'E') {
        return false;
    }
    text[index + c.len_utf8()..]
        .chars()
        .next()
        .is_some_and(|next| next.is_ascii_digit() || matches!(next, '+' | '-'))
}

pub fn read_date(text: &str, span: Span) -> Result<Date, ReadError> {
    let invalid = || ReadError::invalid(format!("invalid date {text:?}"), span);

    if text.len() < 10 || text.as_bytes()[4] != b'-' || text.as_bytes()[7] != b'-' {
        return Err(invalid());
    }
    let year: i32 = text[0..4].parse().map_err(|_| invalid())?;
    let month: u32 = text[5..7].parse().map_err(|_| invalid())?;
    let day: u32 = text[8..10].parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)?;

    Ok(Date { year, month, day })
}

pub fn read_time(text: &str, span: Span) -> Result<Time, ReadError> {
    let invalid = || ReadError::invalid(format!("invalid time {text:?}"), span);

    if text.len() < 8 || text.as_bytes()[2] != b':' || text.as_bytes()[5] != b':' {
        return Err(invalid());
    }
    let hour: u32 = text[0..2].parse().map_err(|_| invalid())?;
    let minute: u32 = text[3..5].parse().map_err(|_| invalid())?;
    let second: u32 = text[6..8].parse().map_err(|_| invalid())?;
    if hour > 23 || minute > 59 || second > 59 {
        return Err(invalid());
    }

    if text.len() == 8 {
        return Ok(Time { hour, minute, second, millisecond: 0 });
    }
    if text.as_bytes()[8] != b'.' {
        return Err(invalid());
    }

    // Pad or truncate the fractional part to exactly 3 digits, the way
    // the original reader zero-fills a 1- or 2-digit fraction and
    // rejects anything past 3 (§4.5).
    let fraction = &text[9..];
    if fraction.is_empty() || fraction.len() > 3 || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let millisecond: u32 = match fraction.len() {
        1 => fraction.parse::<u32>().map_err(|_| invalid())? * 100,
        2 => fraction.parse::<u32>().map_err(|_| invalid())? * 10,
        3 => fraction.parse().map_err(|_| invalid())?,
        _ => unreachable!(),
    };

    Ok(Time { hour, minute, second, millisecond })
}

/// `YYYY-MM-DDTHH:MM:SS[.fff](Z|+HH:MM|-HH:MM)[ IANA_Zone]`. The date and
/// time portions reuse [`read_date`]/[`read_time`]; only the offset and
/// optional trailing zone name are parsed here.
pub fn read_date_time(text: &str, span: Span) -> Result<DateTime, ReadError> {
    let invalid = || ReadError::invalid(format!("invalid date-time {text:?}"), span);

    let t_pos = text.find('T').ok_or_else(invalid)?;
    let date = read_date(&text[..t_pos], span)?;
    let rest = &text[t_pos + 1..];

    // HH:MM:SS is fixed-width; an offset can't start inside it, so only
    // look for one from index 8 onward (past any ".fff" fraction too).
    if rest.len() < 8 {
        return Err(invalid());
    }
    let offset_start = rest[8..]
        .find(|c| c == 'Z' || c == '+' || c == '-')
        .map(|i| i + 8)
        .ok_or_else(invalid)?;

    let time = read_time(&rest[..offset_start], span)?;
    let offset_and_zone = &rest[offset_start..];

    let (offset_text, zone) = match offset_and_zone.find(' ') {
        Some(i) => (&offset_and_zone[..i], Some(offset_and_zone[i + 1..].to_string())),
        None => (offset_and_zone, None),
    };

    let offset = if offset_text == "Z" {
        FixedOffset::east_opt(0).ok_or_else(invalid)?
    } else {
        parse_fixed_offset(offset_text).ok_or_else(invalid)?
    };

    let naive = chrono::NaiveDateTime::new(
        NaiveDate::from_ymd_opt(date.year, date.month, date.day).ok_or_else(invalid)?,
        chrono::NaiveTime::from_hms_milli_opt(time.hour, time.minute, time.second, time.millisecond)
            .ok_or_else(invalid)?,
    );
    let instant = offset.from_local_datetime(&naive).single().ok_or_else(invalid)?;

    Ok(DateTime { instant, zone })
}

fn parse_fixed_offset(text: &str) -> Option<FixedOffset> {
    let (sign, body) = if let Some(body) = text.strip_prefix('+') {
        (1, body)
    } else {
        (-1, text.strip_prefix('-')?)
    };
    let (h, m) = body.split_once(':')?;
    let h: i32 = h.parse().ok()?;
    let m: i32 = m.parse().ok()?;
    let seconds = sign * (h * 3600 + m * 60);
    FixedOffset::east_opt(seconds)
}

pub fn read_coord(lat: f64, lon: f64, span: Span) -> Result<Coord, ReadError> {
    Coord::new(lat, lon).map_err(|e| ReadError::invalid(e.to_string(), span))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridwire_util::Position;

    fn span() -> Span {
        Span::point(Position::START)
    }

    #[test]
    fn reads_plain_and_unit_numbers() {
        assert_eq!(read_num("123", span()).unwrap(), Num::plain(123.0));
        let n = read_num("10.5kWh", span()).unwrap();
        assert_eq!(n.value, 10.5);
        assert_eq!(n.unit.as_deref(), Some("kWh"));
    }

    #[test]
    fn reads_exponent_number_without_treating_e_as_unit() {
        let n = read_num("1.5e-3", span()).unwrap();
        assert_eq!(n.value, 0.0015);
        assert_eq!(n.unit, None);
    }

    #[test]
    fn reads_singletons() {
        assert!(read_num("NaN", span()).unwrap().value.is_nan());
        assert_eq!(read_num("INF", span()).unwrap().value, f64::INFINITY);
        assert_eq!(read_num("-INF", span()).unwrap().value, f64::NEG_INFINITY);
    }

    #[test]
    fn reads_str_escapes() {
        assert_eq!(read_str(r#""a\nb""#, span()).unwrap(), "a\nb");
        assert_eq!(read_str(r#""A""#, span()).unwrap(), "A");
    }

    #[test]
    fn reads_date_and_rejects_invalid_calendar_date() {
        assert_eq!(
            read_date("2010-03-11", span()).unwrap(),
            Date { year: 2010, month: 3, day: 11 }
        );
        assert!(read_date("2021-02-30", span()).is_err());
    }

    #[test]
    fn reads_time_with_fraction_padding() {
        let t = read_time("23:55:00.1", span()).unwrap();
        assert_eq!(t.millisecond, 100);
        let t = read_time("23:55:00.12", span()).unwrap();
        assert_eq!(t.millisecond, 120);
        let t = read_time("23:55:00.123", span()).unwrap();
        assert_eq!(t.millisecond, 123);
    }

    #[test]
    fn reads_date_time_with_offset_and_zone() {
        let dt = read_date_time("2010-03-11T23:55:00-05:00 New_York", span()).unwrap();
        assert_eq!(dt.zone.as_deref(), Some("New_York"));
        assert_eq!(dt.instant.offset().local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn ref_and_symbol_strip_their_sigil() {
        assert_eq!(read_ref("@a.b-c").id, "a.b-c");
        assert_eq!(read_symbol("^foo"), "foo");
    }

    use proptest::prelude::*;

    proptest! {
        /// Property 1 (§8): a `STR` literal with no characters that need
        /// escaping round-trips through encode (wrap in quotes) and
        /// `read_str` back to the original text.
        #[test]
        fn str_round_trips_for_text_needing_no_escapes(s in "[a-zA-Z0-9 ]{0,24}") {
            let literal = format!("\"{s}\"");
            prop_assert_eq!(read_str(&literal, span()).unwrap(), s);
        }

        /// Plain (unitless) integers round-trip through `read_num`.
        #[test]
        fn plain_integers_round_trip_through_read_num(n in -1_000_000i64..1_000_000) {
            let num = read_num(&n.to_string(), span()).unwrap();
            prop_assert_eq!(num.value, n as f64);
            prop_assert_eq!(num.unit, None);
        }

        /// Any calendar-valid `y-m-d` (day capped at 28 so it's valid in
        /// every month, including February) round-trips through
        /// `read_date`.
        #[test]
        fn valid_calendar_dates_round_trip_through_read_date(
            year in 1900i32..2100,
            month in 1u32..=12,
            day in 1u32..=28,
        ) {
            let text = format!("{year:04}-{month:02}-{day:02}");
            let date = read_date(&text, span()).unwrap();
            prop_assert_eq!(date, Date { year, month, day });
        }
    }
}
