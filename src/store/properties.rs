//! Flat key=value property-file codec
//!
//! Line-oriented UTF-8 text: `#` or `!` comment lines, keys terminated by an
//! unescaped `=`, `:` or whitespace, backslash escapes for separators, line
//! breaks and significant whitespace, `\uXXXX` input escapes, and
//! trailing-backslash line continuation. Parsing is lenient; serialization
//! writes keys in sorted order under a comment/timestamp header so that
//! identical maps produce identical bodies.

use std::collections::BTreeMap;

/// Parse `content`, overlaying every recovered pair onto `map` (parsed pairs
/// win on key conflicts).
pub fn parse_into(content: &str, map: &mut BTreeMap<String, String>) {
    for logical in logical_lines(content) {
        if let Some((key, value)) = split_pair(&logical) {
            map.insert(key, value);
        }
    }
}

/// Parse `content` into a fresh map.
pub fn parse(content: &str) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    parse_into(content, &mut map);
    map
}

/// Serialize `props` with `comment` (one `#` line per comment line) and a
/// timestamp header.
pub fn serialize(props: &BTreeMap<String, String>, comment: &str) -> String {
    let mut out = String::new();
    for line in comment.lines() {
        out.push_str("# ");
        out.push_str(line);
        out.push('\n');
    }
    out.push_str("# ");
    out.push_str(&chrono::Local::now().to_rfc2822());
    out.push('\n');
    for (key, value) in props {
        out.push_str(&escape(key, true));
        out.push('=');
        out.push_str(&escape(value, false));
        out.push('\n');
    }
    out
}

/// Join continuation lines and drop comments and blanks, yielding logical
/// key=value lines.
fn logical_lines(content: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending: Option<String> = None;

    for raw in content.lines() {
        let line = match pending.take() {
            Some(mut acc) => {
                // Continuation bodies lose their leading whitespace.
                acc.push_str(raw.trim_start());
                acc
            }
            None => {
                let trimmed = raw.trim_start();
                if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                    continue;
                }
                trimmed.to_string()
            }
        };

        if ends_with_odd_backslashes(&line) {
            let mut acc = line;
            acc.pop();
            pending = Some(acc);
        } else {
            lines.push(line);
        }
    }
    if let Some(acc) = pending {
        // Dangling continuation at end of file; take what is there.
        lines.push(acc);
    }
    lines
}

fn ends_with_odd_backslashes(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// Split one logical line into an unescaped key/value pair. A line without a
/// separator is a key with an empty value.
fn split_pair(line: &str) -> Option<(String, String)> {
    let chars: Vec<char> = line.chars().collect();
    let mut key_end = chars.len();
    let mut escaped = false;
    for (i, c) in chars.iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = i;
                break;
            }
            c if c.is_whitespace() => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let key = unescape(&chars[..key_end].iter().collect::<String>());
    if key.is_empty() {
        return None;
    }

    // Skip whitespace, one optional separator, then whitespace again.
    let mut rest = key_end;
    while rest < chars.len() && chars[rest].is_whitespace() {
        rest += 1;
    }
    if rest < chars.len() && (chars[rest] == '=' || chars[rest] == ':') {
        rest += 1;
        while rest < chars.len() && chars[rest].is_whitespace() {
            rest += 1;
        }
    }
    let value = unescape(&chars[rest..].iter().collect::<String>());
    Some((key, value))
}

/// Resolve backslash escapes. Malformed escapes degrade to literal text
/// rather than failing; the read side never surfaces an error.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if hex.len() == 4 => out.push(decoded),
                    _ => {
                        out.push('u');
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

/// Escape a key or value for serialization. Keys escape every space; values
/// only need leading spaces protected.
fn escape(s: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(s.len());
    let mut leading = true;
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            '=' => out.push_str("\\="),
            ':' => out.push_str("\\:"),
            '#' => out.push_str("\\#"),
            '!' => out.push_str("\\!"),
            ' ' if is_key || leading => out.push_str("\\ "),
            c => out.push(c),
        }
        if c != ' ' {
            leading = false;
        }
    }
    out
}
