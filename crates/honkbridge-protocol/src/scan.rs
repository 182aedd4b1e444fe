//! Frame scanning: the hand-rolled text utilities the protocol uses
//! instead of a full JSON parser.
//!
//! The relay may hand us a message in several pieces, and some payloads
//! (the name catalog) are large enough that we only ever want to pull a
//! few fields out of them. Everything here works on `&str` slices and
//! returns positions or borrowed sub-slices, so nothing is copied until a
//! caller decides to keep a value.
//!
//! All delimiters the scanner cares about are ASCII, so scanning bytes is
//! safe for UTF-8 input: multi-byte sequences never contain ASCII bytes,
//! and every index returned lands on a character boundary.

use std::borrow::Cow;

// ---------------------------------------------------------------------------
// Completeness
// ---------------------------------------------------------------------------

/// Returns `true` if `text` looks like one whole message.
///
/// Counts `[`/`]` and `{`/`}` depth independently, ignoring anything inside
/// quoted strings (a `"` preceded by a backslash does not end a string).
/// The text is complete when both depths are back at zero and its last
/// non-whitespace character is `]`.
///
/// This is conservative on purpose: a balanced fragment that is not valid
/// JSON still counts as complete, and downstream parsing has to cope.
///
/// ```
/// use honkbridge_protocol::scan::is_complete_message;
///
/// assert!(is_complete_message(r#"[{"a":"]"}]"#));
/// assert!(!is_complete_message(r#"[{"a":"#));
/// ```
pub fn is_complete_message(text: &str) -> bool {
    let mut in_string = false;
    let mut escaped = false;
    let mut brackets: i64 = 0;
    let mut braces: i64 = 0;

    for b in text.bytes() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' => brackets += 1,
            b']' => brackets -= 1,
            b'{' => braces += 1,
            b'}' => braces -= 1,
            _ => {}
        }
    }

    brackets == 0 && braces == 0 && text.trim_end().ends_with(']')
}

// ---------------------------------------------------------------------------
// Delimiter matching
// ---------------------------------------------------------------------------

/// Finds the `}` matching the `{` at `open`.
///
/// Returns `None` if `open` is not a `{` or the text ends first.
pub fn find_matching_brace(text: &str, open: usize) -> Option<usize> {
    find_matching(text, open, b'{', b'}')
}

/// Finds the `]` matching the `[` at `open`.
pub fn find_matching_bracket(text: &str, open: usize) -> Option<usize> {
    find_matching(text, open, b'[', b']')
}

fn find_matching(text: &str, open: usize, opener: u8, closer: u8) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.get(open) != Some(&opener) {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        if b == b'"' {
            in_string = true;
        } else if b == opener {
            depth += 1;
        } else if b == closer {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Index of the quote that closes the string opened at `quote`.
pub fn string_end(text: &str, quote: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.get(quote) != Some(&b'"') {
        return None;
    }
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate().skip(quote + 1) {
        if escaped {
            escaped = false;
        } else if b == b'\\' {
            escaped = true;
        } else if b == b'"' {
            return Some(i);
        }
    }
    None
}

/// First index at or after `from` that is not JSON whitespace.
pub fn skip_ws(text: &str, from: usize) -> usize {
    let bytes = text.as_bytes();
    let mut i = from;
    while i < bytes.len() && matches!(bytes[i], b' ' | b'\t' | b'\n' | b'\r') {
        i += 1;
    }
    i
}

/// Length of the numeric token at the start of `text`: an optional
/// leading `-` followed by digits. Zero if there are no digits.
pub fn numeric_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let sign = usize::from(bytes.first() == Some(&b'-'));
    let digits = bytes[sign..].iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 { 0 } else { sign + digits }
}

// ---------------------------------------------------------------------------
// Key/value extraction
// ---------------------------------------------------------------------------

/// Locates the first `"key":` at or after `from` and returns the index
/// where its value starts (whitespace around the colon is skipped).
///
/// Occurrences of `"key"` that are not followed by a colon (for example
/// when the key text appears as a value) are passed over.
pub fn find_key_from(text: &str, key: &str, from: usize) -> Option<usize> {
    let needle_len = key.len() + 2;
    let mut search = from;

    while search < text.len() {
        let rel = text[search..].find('"')?;
        let at = search + rel;
        let candidate_end = at + needle_len;
        let matches = text.get(at + 1..at + 1 + key.len()) == Some(key)
            && text.as_bytes().get(candidate_end - 1) == Some(&b'"');
        if matches {
            let colon = skip_ws(text, candidate_end);
            if text.as_bytes().get(colon) == Some(&b':') {
                return Some(skip_ws(text, colon + 1));
            }
        }
        search = at + 1;
    }
    None
}

/// Reads the scalar value starting at `start`.
///
/// A quoted value is returned without its quotes and **without**
/// unescaping; a numeric value is returned as its token. Anything else
/// (objects, arrays, literals) yields `None`.
pub fn value_at(text: &str, start: usize) -> Option<&str> {
    match text.as_bytes().get(start)? {
        b'"' => {
            let end = string_end(text, start)?;
            Some(&text[start + 1..end])
        }
        b'-' | b'0'..=b'9' => {
            let len = numeric_len(&text[start..]);
            (len > 0).then(|| &text[start..start + len])
        }
        _ => None,
    }
}

/// Extracts the first quoted or numeric value stored under `key`.
///
/// Only meant for values that never contain nested structure; for
/// anything else, locate the value with [`find_key_from`] and bound it
/// with the matching-delimiter helpers.
///
/// ```
/// use honkbridge_protocol::scan::extract_value;
///
/// let msg = r#"{"cmd":"Connected","slot": 3}"#;
/// assert_eq!(extract_value(msg, "cmd"), Some("Connected"));
/// assert_eq!(extract_value(msg, "slot"), Some("3"));
/// assert_eq!(extract_value(msg, "team"), None);
/// ```
pub fn extract_value<'a>(text: &'a str, key: &str) -> Option<&'a str> {
    value_at(text, find_key_from(text, key, 0)?)
}

/// [`extract_value`] followed by a numeric parse.
pub fn extract_number<T: std::str::FromStr>(text: &str, key: &str) -> Option<T> {
    extract_value(text, key)?.parse().ok()
}

/// Reads a boolean-ish value under `key`: `true`/`false`, or a number
/// where non-zero means `true`.
pub fn extract_bool(text: &str, key: &str) -> Option<bool> {
    let start = find_key_from(text, key, 0)?;
    let rest = &text[start..];
    if rest.starts_with("true") {
        Some(true)
    } else if rest.starts_with("false") {
        Some(false)
    } else {
        let len = numeric_len(rest);
        (len > 0).then(|| rest[..len].parse::<i64>().map(|n| n != 0).ok())?
    }
}

/// Returns where the value for `key` starts, considering only keys that
/// sit directly inside the outermost object of `obj`.
///
/// This is what makes `"type"` on a message distinguishable from the
/// `"type"` fields of its nested parts.
pub fn top_level_value_start(obj: &str, key: &str) -> Option<usize> {
    let bytes = obj.as_bytes();
    let mut depth = 0i32;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                let end = string_end(obj, i)?;
                if depth == 1 {
                    let after = skip_ws(obj, end + 1);
                    if bytes.get(after) == Some(&b':') && &obj[i + 1..end] == key {
                        return Some(skip_ws(obj, after + 1));
                    }
                }
                i = end + 1;
                continue;
            }
            b'{' | b'[' => depth += 1,
            b'}' | b']' => depth -= 1,
            _ => {}
        }
        i += 1;
    }
    None
}

/// Scalar value of a top-level key of `obj`; see [`top_level_value_start`].
pub fn top_level_value<'a>(obj: &'a str, key: &str) -> Option<&'a str> {
    value_at(obj, top_level_value_start(obj, key)?)
}

/// Every `cmd` value in `text`, in order of appearance.
pub fn command_tags(text: &str) -> Vec<&str> {
    let mut tags = Vec::new();
    let mut from = 0;
    while let Some(start) = find_key_from(text, "cmd", from) {
        if let Some(tag) = value_at(text, start) {
            tags.push(tag);
        }
        from = start;
    }
    tags
}

/// Decodes JSON escape sequences in a raw string body.
///
/// Borrows when there is nothing to decode. Malformed escapes are left as
/// they are rather than dropping the text.
pub fn unescape(raw: &str) -> Cow<'_, str> {
    if !raw.contains('\\') {
        return Cow::Borrowed(raw);
    }
    match serde_json::from_str::<String>(&format!("\"{raw}\"")) {
        Ok(decoded) => Cow::Owned(decoded),
        Err(_) => Cow::Borrowed(raw),
    }
}

// ---------------------------------------------------------------------------
// Structure walking
// ---------------------------------------------------------------------------

/// The `{...}` elements of the array whose `[` is at `open`, in order.
///
/// Non-object elements are skipped. Stops early at the first element
/// that is cut off.
pub fn objects_in_array(text: &str, open: usize) -> Vec<&str> {
    let mut out = Vec::new();
    let Some(close) = find_matching_bracket(text, open) else {
        return out;
    };

    let bytes = text.as_bytes();
    let mut i = open + 1;
    while i < close {
        match bytes[i] {
            b'{' => match find_matching_brace(text, i) {
                Some(end) if end < close => {
                    out.push(&text[i..=end]);
                    i = end + 1;
                }
                _ => break,
            },
            b'"' => match string_end(text, i) {
                Some(end) => i = end + 1,
                None => break,
            },
            b'[' => match find_matching_bracket(text, i) {
                Some(end) => i = end + 1,
                None => break,
            },
            _ => i += 1,
        }
    }
    out
}

/// Every string element of the array whose `[` is at `open`, unescaped.
pub fn strings_in_array(text: &str, open: usize) -> Vec<String> {
    let mut out = Vec::new();
    let Some(close) = find_matching_bracket(text, open) else {
        return out;
    };
    let mut i = open + 1;
    while i < close {
        if text.as_bytes()[i] == b'"' {
            let Some(end) = string_end(text, i) else { break };
            out.push(unescape(&text[i + 1..end]).into_owned());
            i = end + 1;
        } else {
            i += 1;
        }
    }
    out
}

/// Key/value pairs directly inside the object whose `{` is at `open`.
///
/// Keys are raw (not unescaped); values are the full text of each value,
/// nested structure included.
pub fn object_entries(text: &str, open: usize) -> Vec<(&str, &str)> {
    let mut out = Vec::new();
    let Some(close) = find_matching_brace(text, open) else {
        return out;
    };

    let bytes = text.as_bytes();
    let mut i = skip_ws(text, open + 1);
    while i < close {
        if bytes[i] != b'"' {
            i += 1;
            continue;
        }
        let Some(key_end) = string_end(text, i) else { break };
        let colon = skip_ws(text, key_end + 1);
        if bytes.get(colon) != Some(&b':') {
            break;
        }
        let start = skip_ws(text, colon + 1);
        let end = match bytes.get(start) {
            Some(b'{') => find_matching_brace(text, start),
            Some(b'[') => find_matching_bracket(text, start),
            Some(b'"') => string_end(text, start),
            Some(_) => {
                let len = text[start..close]
                    .find([',', '}'])
                    .unwrap_or(close - start);
                Some(start + len.saturating_sub(1))
            }
            None => None,
        };
        let Some(end) = end.filter(|e| *e < close) else { break };

        out.push((&text[i + 1..key_end], text[start..=end].trim_end()));
        i = skip_ws(text, end + 1);
        if bytes.get(i) == Some(&b',') {
            i = skip_ws(text, i + 1);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// String mask (backward walks)
// ---------------------------------------------------------------------------

/// Marks which bytes of a text belong to string tokens, quotes included.
///
/// Walking *backwards* through JSON cannot tell on its own whether a brace
/// sits inside a string. Building the mask once in a forward pass makes
/// backward walks as reliable as forward ones.
#[derive(Debug, Clone)]
pub struct StringMask {
    inside: Vec<bool>,
}

impl StringMask {
    pub fn new(text: &str) -> Self {
        let mut inside = vec![false; text.len()];
        let mut in_string = false;
        let mut escaped = false;

        for (i, b) in text.bytes().enumerate() {
            if in_string {
                inside[i] = true;
                if escaped {
                    escaped = false;
                } else if b == b'\\' {
                    escaped = true;
                } else if b == b'"' {
                    in_string = false;
                }
            } else if b == b'"' {
                inside[i] = true;
                in_string = true;
            }
        }
        Self { inside }
    }

    /// Whether byte `i` is part of a string token.
    pub fn is_string(&self, i: usize) -> bool {
        self.inside.get(i).copied().unwrap_or(false)
    }

    /// Whether a string token *begins* at `i` (as opposed to `i` being a
    /// quote character escaped inside some other string).
    pub fn starts_string(&self, i: usize) -> bool {
        self.is_string(i) && (i == 0 || !self.is_string(i - 1))
    }

    /// Walks back from `pos` to the `{` of the object that encloses it.
    pub fn enclosing_brace(&self, text: &str, pos: usize) -> Option<usize> {
        let bytes = text.as_bytes();
        let mut depth = 0usize;
        let mut i = pos;
        while i > 0 {
            i -= 1;
            if self.is_string(i) {
                continue;
            }
            match bytes[i] {
                b'}' => depth += 1,
                b'{' if depth == 0 => return Some(i),
                b'{' => depth -= 1,
                _ => {}
            }
        }
        None
    }

    /// Finds the quoted key that owns the value starting at `value_start`:
    /// back past whitespace to the `:`, back past whitespace to the closing
    /// quote, then to the opening quote. Returns the raw key body range.
    pub fn key_before(&self, text: &str, value_start: usize) -> Option<(usize, usize)> {
        let bytes = text.as_bytes();
        let colon = last_non_ws_before(bytes, value_start)?;
        if bytes[colon] != b':' {
            return None;
        }
        let close = last_non_ws_before(bytes, colon)?;
        if bytes[close] != b'"' || !self.is_string(close) {
            return None;
        }
        let mut open = close;
        while open > 0 && self.is_string(open - 1) {
            open -= 1;
        }
        (open < close).then_some((open + 1, close))
    }
}

fn last_non_ws_before(bytes: &[u8], pos: usize) -> Option<usize> {
    let mut i = pos;
    while i > 0 {
        i -= 1;
        if !matches!(bytes[i], b' ' | b'\t' | b'\n' | b'\r') {
            return Some(i);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    // =====================================================================
    // is_complete_message
    // =====================================================================

    #[test]
    fn test_complete_simple_array() {
        assert!(is_complete_message(r#"[{"cmd":"Sync"}]"#));
        assert!(is_complete_message("  [1, 2]  \n"));
    }

    #[test]
    fn test_delimiters_inside_strings_are_ignored() {
        assert!(is_complete_message(r#"[{"a":"]"}]"#));
        assert!(is_complete_message(r#"[{"a":"{[{["}]"#));
        assert!(!is_complete_message(r#"[{"a":"]}]"#));
    }

    #[test]
    fn test_escaped_quote_does_not_end_string() {
        assert!(is_complete_message(r#"[{"a":"say \"]\" loudly"}]"#));
        assert!(!is_complete_message(r#"[{"a":"\"}]"#));
    }

    #[test]
    fn test_incomplete_fragments() {
        assert!(!is_complete_message(r#"[{"cmd":"DataPackage","data":{"#));
        assert!(!is_complete_message(r#"[{"a":1}"#));
        assert!(!is_complete_message(""));
    }

    #[test]
    fn test_balanced_but_not_ending_in_bracket_is_incomplete() {
        assert!(!is_complete_message(r#"{"a":[1]}"#));
        assert!(!is_complete_message("[1] x"));
    }

    #[test]
    fn test_balanced_garbage_counts_as_complete() {
        // Conservative by design: syntax is checked downstream.
        assert!(is_complete_message("[{,,}]"));
    }

    // =====================================================================
    // Matching delimiters
    // =====================================================================

    #[test]
    fn test_find_matching_brace_nested() {
        let text = r#"{"a":{"b":{}},"c":1}"#;
        assert_eq!(find_matching_brace(text, 0), Some(text.len() - 1));
        assert_eq!(find_matching_brace(text, 5), Some(12));
    }

    #[test]
    fn test_find_matching_brace_ignores_braces_in_strings() {
        let text = r#"{"name":"Key {A}"}"#;
        assert_eq!(find_matching_brace(text, 0), Some(text.len() - 1));
    }

    #[test]
    fn test_find_matching_returns_none_when_cut_off() {
        assert_eq!(find_matching_brace(r#"{"a":{"b":1}"#, 0), None);
        assert_eq!(find_matching_bracket("[[1]", 0), None);
    }

    #[test]
    fn test_find_matching_requires_opener_at_index() {
        assert_eq!(find_matching_bracket("x[1]", 0), None);
        assert_eq!(find_matching_bracket("x[1]", 1), Some(3));
    }

    // =====================================================================
    // Extraction
    // =====================================================================

    #[test]
    fn test_extract_quoted_value_is_not_unescaped() {
        let text = r#"{"text":"a \"b\" c"}"#;
        assert_eq!(extract_value(text, "text"), Some(r#"a \"b\" c"#));
    }

    #[test]
    fn test_extract_numeric_value_with_sign_and_whitespace() {
        assert_eq!(extract_value(r#"{"index" :  -12,"x":1}"#, "index"), Some("-12"));
        assert_eq!(extract_number::<i64>(r#"{"index":7}"#, "index"), Some(7));
    }

    #[test]
    fn test_extract_skips_key_text_used_as_value() {
        let text = r#"{"name":"slot","slot":4}"#;
        assert_eq!(extract_value(text, "slot"), Some("4"));
    }

    #[test]
    fn test_extract_structured_value_is_none() {
        assert_eq!(extract_value(r#"{"data":{"a":1}}"#, "data"), None);
    }

    #[test]
    fn test_extract_bool_accepts_literals_and_numbers() {
        let text = r#"{"a":true,"b":false,"c":0,"d":1,"e":"yes"}"#;
        assert_eq!(extract_bool(text, "a"), Some(true));
        assert_eq!(extract_bool(text, "b"), Some(false));
        assert_eq!(extract_bool(text, "c"), Some(false));
        assert_eq!(extract_bool(text, "d"), Some(true));
        assert_eq!(extract_bool(text, "e"), None);
        assert_eq!(extract_bool(text, "f"), None);
    }

    #[test]
    fn test_top_level_value_ignores_nested_keys() {
        let text = r#"{"data":[{"type":"player_id","text":"1"}],"type":"ItemSend"}"#;
        assert_eq!(top_level_value(text, "type"), Some("ItemSend"));
        assert_eq!(extract_value(text, "type"), Some("player_id"));
    }

    #[test]
    fn test_command_tags_in_batch() {
        let text = r#"[{"cmd":"Connected","slot":1},{"cmd": "ReceivedItems"}]"#;
        assert_eq!(command_tags(text), vec!["Connected", "ReceivedItems"]);
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("plain"), "plain");
        assert_eq!(unescape(r#"Goose \"Honk\""#), r#"Goose "Honk""#);
        assert_eq!(unescape(r"café"), "café");
        assert_eq!(unescape(r"bad \x"), r"bad \x");
    }

    // =====================================================================
    // Structure walking
    // =====================================================================

    #[test]
    fn test_objects_in_array() {
        let text = r#"[{"a":1},"s{",{"b":{"c":2}}]"#;
        assert_eq!(objects_in_array(text, 0), vec![r#"{"a":1}"#, r#"{"b":{"c":2}}"#]);
    }

    #[test]
    fn test_strings_in_array() {
        let text = r#"["DeathLink", "Tag\"Q"]"#;
        assert_eq!(strings_in_array(text, 0), vec!["DeathLink", "Tag\"Q"]);
    }

    #[test]
    fn test_object_entries() {
        let text = r#"{"1": {"game":"A"}, "2":{"game":"B"},"n": 5 ,"s":"x"}"#;
        let entries = object_entries(text, 0);
        assert_eq!(
            entries,
            vec![
                ("1", r#"{"game":"A"}"#),
                ("2", r#"{"game":"B"}"#),
                ("n", "5"),
                ("s", r#""x""#),
            ]
        );
    }

    #[test]
    fn test_string_mask_backward_walks() {
        let text = r#"{"Game {A}": {"x": {"y": 1}, "marker": {}}}"#;
        let mask = StringMask::new(text);
        let marker = text.find(r#""marker""#).unwrap();
        assert!(mask.starts_string(marker));

        let open = mask.enclosing_brace(text, marker).unwrap();
        assert_eq!(&text[open..open + 2], r#"{""#);
        let (s, e) = mask.key_before(text, open).unwrap();
        assert_eq!(&text[s..e], "Game {A}");
    }
}
