//! Pattern building utilities for abbreviated vendor commands.

use regex::Regex;

use crate::dialect::CommandKeyword;

/// Build a regex fragment accepting any prefix of `word` at least `min_len` long.
///
/// `abbreviation("display", 3)` yields `dis(?:p(?:l(?:a(?:y)?)?)?)?`.
pub fn abbreviation(word: &str, min_len: usize) -> String {
    let chars: Vec<char> = word.chars().collect();
    let min_len = min_len.clamp(1, chars.len().max(1));

    let mut out: String = chars[..min_len.min(chars.len())]
        .iter()
        .map(|c| regex::escape(&c.to_string()))
        .collect();

    let optional = &chars[min_len.min(chars.len())..];
    let mut tail = String::new();
    for c in optional.iter().rev() {
        tail = format!("(?:{}{})?", regex::escape(&c.to_string()), tail);
    }
    out.push_str(&tail);
    out
}

/// Regex fragment for one word of a command template.
///
/// `int[erface]` is an abbreviation with mandatory prefix `int`,
/// `a|b` is an alternation, anything else is literal.
fn word_fragment(word: &str) -> String {
    if word.contains('|') {
        let alts: Vec<String> = word.split('|').map(word_fragment).collect();
        return format!("(?:{})", alts.join("|"));
    }

    match (word.find('['), word.strip_suffix(']')) {
        (Some(open), Some(stripped)) => {
            let prefix = &word[..open];
            let rest = &stripped[open + 1..];
            let full = format!("{prefix}{rest}");
            abbreviation(&full, prefix.chars().count())
        }
        _ => regex::escape(word),
    }
}

/// Compile a command template into a label-matching regex.
///
/// Words are separated by whitespace. `dis[play]` accepts `dis` through
/// `display`, `*` skips any number of intermediate words. The pattern is
/// anchored at the start of the label and matches whole words only.
///
/// ```
/// use ferriscap::capture::patterns::command_pattern;
///
/// let re = command_pattern("dis[play] int[erface] br[ief]").unwrap();
/// assert!(re.is_match("display interface brief"));
/// assert!(re.is_match("dis int br"));
/// assert!(!re.is_match("display interface GigabitEthernet0/0/1"));
/// ```
pub fn command_pattern(template: &str) -> Result<Regex, regex::Error> {
    let mut pattern = String::from("(?i)^");
    let mut first = true;
    let mut gap = false;

    for word in template.split_whitespace() {
        if word == "*" {
            gap = true;
            continue;
        }
        if gap {
            if first {
                pattern.push_str(r"(?:\S+\s+)*?");
            } else {
                pattern.push_str(r"(?:\s+\S+)*?\s+");
            }
        } else if !first {
            pattern.push_str(r"\s+");
        }
        pattern.push_str(&word_fragment(word));
        first = false;
        gap = false;
    }
    pattern.push_str(r"(?:\s|$)");

    Regex::new(&pattern)
}

/// Regex alternation matching any keyword abbreviation, longest words first.
pub fn keyword_alternation(keywords: &[CommandKeyword]) -> String {
    let mut sorted: Vec<&CommandKeyword> = keywords.iter().collect();
    sorted.sort_by(|a, b| b.word.len().cmp(&a.word.len()));

    let alts: Vec<String> = sorted
        .iter()
        .map(|kw| abbreviation(&kw.word, kw.min_len))
        .collect();
    format!("(?:{})", alts.join("|"))
}
