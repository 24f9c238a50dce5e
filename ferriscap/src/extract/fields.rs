//! Field extraction helpers shared by all extractors.
//!
//! Vendor tables have variable column widths and labels come in several
//! spellings, so extractors go through these helpers instead of splitting
//! lines ad hoc.

use std::net::Ipv4Addr;

use regex::Regex;

/// Split a table row on runs of two or more spaces.
pub fn wide_columns(line: &str) -> Vec<&str> {
    let mut cols = Vec::new();
    let mut start: Option<usize> = None;
    let mut spaces = 0usize;
    let bytes = line.as_bytes();

    for (i, &b) in bytes.iter().enumerate() {
        if b == b' ' || b == b'\t' {
            spaces += if b == b'\t' { 2 } else { 1 };
            continue;
        }
        match start {
            None => start = Some(i),
            Some(s) if spaces >= 2 => {
                cols.push(line[s..i].trim_end());
                start = Some(i);
            }
            Some(_) => {}
        }
        spaces = 0;
    }
    if let Some(s) = start {
        cols.push(line[s..].trim_end());
    }
    cols
}

/// Split a table row into columns, requiring at least `min` of them.
///
/// Tries wide (2+ space) splitting first and falls back to single-space
/// tokens. Rows that still have fewer than `min` columns are skipped.
pub fn columns(line: &str, min: usize) -> Option<Vec<&str>> {
    let wide = wide_columns(line);
    if wide.len() >= min {
        return Some(wide);
    }
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() >= min { Some(tokens) } else { None }
}

/// Split a row on single whitespace, requiring at least `min` tokens.
pub fn tokens(line: &str, min: usize) -> Option<Vec<&str>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() >= min { Some(tokens) } else { None }
}

/// Check if a line is a table rule such as `-----` or `=====`.
pub fn is_separator(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| matches!(c, '-' | '=' | '*' | '_'))
}

/// Index of the first line containing every word (case-insensitive).
pub fn find_header(lines: &[&str], words: &[&str]) -> Option<usize> {
    lines.iter().position(|line| {
        let lower = line.to_lowercase();
        words.iter().all(|w| lower.contains(&w.to_lowercase()))
    })
}

/// Keep only characters that can be part of a number.
fn numeric_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '-' || *c == '.')
        .collect()
}

/// Coerce text to an integer; unparseable text gives `None`, never 0.
///
/// `"45%"` gives `45`, `"1,908,416 KB"` gives `1908416`, `"N/A"` gives `None`.
pub fn to_int(raw: &str) -> Option<i64> {
    let cleaned = numeric_text(raw);
    if let Ok(value) = cleaned.parse::<i64>() {
        return Some(value);
    }
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(|f| f.trunc() as i64)
}

/// Coerce text to a float; unparseable text gives `None`, never NaN.
pub fn to_float(raw: &str) -> Option<f64> {
    numeric_text(raw).parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Trimmed cell text, `None` when the cell is missing.
pub fn cell(cols: &[&str], idx: usize) -> Option<String> {
    cols.get(idx).map(|c| c.trim().to_string())
}

/// Cell text treating the vendor "no value" markers as absent.
pub fn cell_value(cols: &[&str], idx: usize) -> Option<String> {
    cell(cols, idx).filter(|c| !matches!(c.as_str(), "--" | "-" | "N/A"))
}

/// Build the regex for a labeled field.
fn label_regex(label: &str) -> Option<Regex> {
    let escaped = regex::escape(label).replace(' ', r"[ \t]+");
    let pattern = format!(
        r"(?im)(?:^[ \t]*|[ \t]{{2,}}|,[ \t]*){escaped}[ \t]*(?:\([^)\n]*\))?[. \t]*[:=][ \t]*(?P<v>[^\n]*?)(?:[ \t]{{2,}}[A-Za-z][^:\n]*:|,[ \t]*[A-Za-z][^:,\n]*:|[ \t]*$)"
    );
    Regex::new(&pattern).ok()
}

/// Find a `Label : value` field, trying synonyms in priority order.
///
/// The first non-empty match wins. If a label is present but every match
/// is empty, the result is `Some("")` so absent and empty stay distinct.
pub fn labeled(text: &str, labels: &[&str]) -> Option<String> {
    let mut empty_seen = false;
    for label in labels {
        let Some(re) = label_regex(label) else {
            continue;
        };
        for caps in re.captures_iter(text) {
            let value = caps["v"].trim();
            if value.is_empty() {
                empty_seen = true;
            } else {
                return Some(value.to_string());
            }
        }
    }
    empty_seen.then(String::new)
}

/// First capture group of the first matching pattern.
pub fn first_capture(text: &str, patterns: &[&Regex]) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|v| !v.is_empty())
    })
}

/// Convert a prefix length or dotted mask to dotted form.
pub fn dotted_mask(mask: &str) -> Option<String> {
    let mask = mask.trim();
    if mask.contains('.') {
        return mask.parse::<Ipv4Addr>().ok().map(|m| m.to_string());
    }
    let len: u32 = mask.parse().ok()?;
    if len > 32 {
        return None;
    }
    let bits: u32 = if len == 0 { 0 } else { u32::MAX << (32 - len) };
    Some(Ipv4Addr::from(bits).to_string())
}

/// Split `10.1.1.1/30` into the address and a dotted mask.
pub fn split_prefix(value: &str) -> (String, Option<String>) {
    match value.split_once('/') {
        Some((ip, len)) => (ip.trim().to_string(), dotted_mask(len)),
        None => (value.trim().to_string(), None),
    }
}

/// Check if text looks like a dotted IPv4 address.
pub fn is_ipv4(value: &str) -> bool {
    value.parse::<Ipv4Addr>().is_ok()
}

/// Data rows of a table whose header sits at `header`.
///
/// Skips blank lines, separator rules and repeated header rows; rows with
/// fewer than `min` whitespace tokens are dropped.
pub fn table_rows<'a>(lines: &[&'a str], header: usize, min: usize) -> Vec<Vec<&'a str>> {
    let first = lines
        .get(header)
        .and_then(|h| h.split_whitespace().next())
        .map(str::to_lowercase);

    lines
        .iter()
        .copied()
        .skip(header + 1)
        .filter(|line| !line.trim().is_empty() && !is_separator(line))
        .filter_map(|line| tokens(line, min))
        .filter(|toks| first.as_deref() != Some(toks[0].to_lowercase().as_str()))
        .collect()
}

/// Overwrite a field only when a new value was found.
pub fn assign<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

/// Check if a token looks like an interface name (`GE0/0/1`, `Vlanif10`).
pub fn looks_like_interface(value: &str) -> bool {
    value.starts_with(|c: char| c.is_ascii_alphabetic())
        && value.contains(|c: char| c.is_ascii_digit())
}

/// Check if a token is a Huawei dotted MAC such as `00e0-fc12-3456`.
pub fn is_mac(value: &str) -> bool {
    let groups: Vec<&str> = value.split('-').collect();
    groups.len() == 3
        && groups
            .iter()
            .all(|g| g.len() == 4 && g.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Compile a built-in pattern.
///
/// Only used for literal patterns covered by tests.
pub(crate) fn builtin_regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in extractor pattern must compile")
}

/// Column positions of a single-word-per-column table header.
///
/// Lookups match a header word exactly or by prefix, so `temp` finds
/// `Temp(C)`. Filler tokens such as `#` are dropped so positions line up
/// with the data rows.
#[derive(Debug, Clone)]
pub struct Header {
    names: Vec<String>,
}

impl Header {
    /// Parse a header line.
    pub fn parse(line: &str) -> Self {
        let names = line
            .split_whitespace()
            .filter(|t| *t != "#")
            .map(str::to_lowercase)
            .collect();
        Self { names }
    }

    /// Position of the first column matching any synonym, in synonym order.
    pub fn index(&self, synonyms: &[&str]) -> Option<usize> {
        synonyms.iter().find_map(|syn| {
            let syn = syn.to_lowercase();
            self.names
                .iter()
                .position(|n| *n == syn)
                .or_else(|| self.names.iter().position(|n| n.starts_with(&syn)))
        })
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the header has no columns.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Cell at an optional column position.
pub fn cell_at(cols: &[&str], idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| cell_value(cols, i))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_columns() {
        let line = "GigabitEthernet0/0/1        up    up           0%     0%";
        assert_eq!(
            wide_columns(line),
            vec!["GigabitEthernet0/0/1", "up", "up", "0%", "0%"]
        );

        // Single spaces stay inside a column
        assert_eq!(wide_columns("VLAN 0001   enable"), vec!["VLAN 0001", "enable"]);
    }

    #[test]
    fn test_columns_fallback_to_tokens() {
        let cols = columns("1 enable default enable disable", 4).unwrap();
        assert_eq!(cols.len(), 5);
        assert!(columns("too short", 3).is_none());
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(to_int("45%"), Some(45));
        assert_eq!(to_int("N/A"), None);
        assert_eq!(to_int("--"), None);
        assert_eq!(to_int("1,908,416 KB"), Some(1908416));
        assert_eq!(to_int("12.7"), Some(12));
        assert_eq!(to_float("-3.52dBm"), Some(-3.52));
        assert_eq!(to_float("N/A"), None);
        assert_eq!(to_float("0.01%"), Some(0.01));
    }

    #[test]
    fn test_labeled_synonyms() {
        let text = "Board Type : CR5D00E4XF80\nBarCode=030PVD10B4000123\n";
        assert_eq!(
            labeled(text, &["BoardType", "Board Type"]).as_deref(),
            Some("CR5D00E4XF80")
        );
        assert_eq!(
            labeled(text, &["Bar Code", "BarCode"]).as_deref(),
            Some("030PVD10B4000123")
        );
        assert_eq!(labeled(text, &["Vendor"]), None);
    }

    #[test]
    fn test_labeled_multiple_per_line() {
        let text = "Duplex: FULL, Negotiation: ENABLE\nPort BW: 1G, Transceiver max BW: 1G";
        assert_eq!(labeled(text, &["Duplex"]).as_deref(), Some("FULL"));
        assert_eq!(labeled(text, &["Negotiation"]).as_deref(), Some("ENABLE"));
        assert_eq!(labeled(text, &["Port BW"]).as_deref(), Some("1G"));

        let text = "Operate status: up        Number Of Up Port In Trunk: 2";
        assert_eq!(labeled(text, &["Operate status"]).as_deref(), Some("up"));
        assert_eq!(labeled(text, &["Number Of Up Port In Trunk"]).as_deref(), Some("2"));
    }

    #[test]
    fn test_labeled_units_and_empty() {
        let text = "Wavelength(nm)             :1310\nDescription:\n";
        assert_eq!(labeled(text, &["Wavelength"]).as_deref(), Some("1310"));
        assert_eq!(labeled(text, &["Description"]).as_deref(), Some(""));
    }

    #[test]
    fn test_masks() {
        assert_eq!(dotted_mask("30").as_deref(), Some("255.255.255.252"));
        assert_eq!(dotted_mask("0").as_deref(), Some("0.0.0.0"));
        assert_eq!(dotted_mask("255.255.255.0").as_deref(), Some("255.255.255.0"));
        assert_eq!(dotted_mask("33"), None);

        let (ip, mask) = split_prefix("10.1.1.1/24");
        assert_eq!(ip, "10.1.1.1");
        assert_eq!(mask.as_deref(), Some("255.255.255.0"));
    }

    #[test]
    fn test_separator() {
        assert!(is_separator("------------------------------"));
        assert!(!is_separator("--  up"));
        assert!(!is_separator(""));
    }

    #[test]
    fn test_header_positions() {
        let header = Header::parse("Slot #    Type     Online    Register     Status   Role");
        assert_eq!(header.len(), 6);
        assert_eq!(header.index(&["slot"]), Some(0));
        assert_eq!(header.index(&["present", "online"]), Some(2));

        let header = Header::parse("SlotID  PCB  Status  Temp(C)");
        assert_eq!(header.index(&["current", "temp"]), Some(3));
        assert_eq!(header.index(&["fan"]), None);
    }

    #[test]
    fn test_token_shapes() {
        assert!(looks_like_interface("GigabitEthernet0/0/1"));
        assert!(looks_like_interface("Eth-Trunk1"));
        assert!(!looks_like_interface("--"));
        assert!(!looks_like_interface("Total"));
        assert!(is_mac("00e0-fc12-3456"));
        assert!(!is_mac("00e0-fc12"));
    }
}
