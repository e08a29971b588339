use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LIST_SEPARATOR: Regex = Regex::new(r"[\s,]+").unwrap();
}

pub(crate) fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Returns the parameter value only if it contains something other than whitespace.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !is_blank(v))
}

/// Splits a comma separated list, trimming each segment and dropping blanks.
pub(crate) fn split_and_trim(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Splits on any run of whitespace or commas, dropping blanks.
pub(crate) fn split_list(value: &str) -> Vec<String> {
    LIST_SEPARATOR
        .split(value)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Decodes %XX escapes and '+' in a query string component. Invalid escapes
/// are passed through verbatim rather than rejected, since referer headers
/// arrive from arbitrary clients.
pub(crate) fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                let decoded = std::str::from_utf8(&bytes[i + 1..i + 3])
                    .ok()
                    .and_then(|h| u8::from_str_radix(h, 16).ok());
                match decoded {
                    Some(b) => {
                        out.push(b);
                        i += 3;
                    }
                    None => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}
