//! Wire message codec
//!
//! The protocol is line-oriented text: one request line, one response
//! line, fields joined by a single reserved ASCII separator (`;`). There
//! is no escaping mechanism; field values must not contain the separator.
//! Free-text detail fields are sanitized with [`sanitize`] before
//! encoding. The codec itself is stateless.

/// Reserved field separator
pub const SEPARATOR: char = ';';

/// Join fields into one wire line
///
/// No escaping is applied; callers are responsible for keeping the
/// separator out of field values (see [`sanitize`]).
pub fn encode<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut line = String::new();
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            line.push(SEPARATOR);
        }
        line.push_str(field.as_ref());
    }
    line
}

/// Split one wire line into its fields
///
/// Empty trailing fields are preserved: a line ending in the separator
/// yields a trailing empty field, not a dropped one. An empty line
/// decodes to an empty sequence, which upstream treats as an empty
/// command rather than a malformed message.
pub fn decode(line: &str) -> Vec<String> {
    if line.is_empty() {
        return Vec::new();
    }
    line.split(SEPARATOR).map(str::to_string).collect()
}

/// Replace embedded separators in a free-text detail with commas
///
/// Applied to human-readable error details before they are placed in a
/// response field, so a detail can never split into extra fields on the
/// receiving side.
pub fn sanitize(detail: &str) -> String {
    detail.replace(SEPARATOR, ",")
}
