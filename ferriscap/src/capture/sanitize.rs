//! Terminal noise removal for raw captures.
//!
//! Session logs saved from terminal emulators contain ANSI colour codes,
//! cursor movement emitted by the pager, backspaces and mixed line endings.
//! A `vte` parser replays the byte stream and keeps only printable text.

use vte::{Parser, Perform};

/// Collects printable text from a vte parser.
#[derive(Debug, Default)]
struct TextCollector {
    out: String,
}

impl Perform for TextCollector {
    fn print(&mut self, c: char) {
        if c != '\u{feff}' {
            self.out.push(c);
        }
    }

    fn execute(&mut self, byte: u8) {
        match byte {
            b'\n' => self.out.push('\n'),
            b'\t' => self.out.push('\t'),
            // Backspace erases the previous character on the current line
            b'\x08' => {
                if self.out.chars().last().is_some_and(|c| c != '\n') {
                    self.out.pop();
                }
            }
            _ => {}
        }
    }
}

/// Strip escape sequences and control characters, normalize line endings.
pub fn strip_terminal_noise(raw: &str) -> String {
    let mut collector = TextCollector {
        out: String::with_capacity(raw.len()),
    };
    let mut parser = Parser::new();
    parser.advance(&mut collector, raw.as_bytes());
    collector.out
}

/// Remove pager markers, dropping lines that held nothing else.
pub fn strip_pager_markers(text: &str, markers: &[String]) -> String {
    if markers.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        let mut cleaned = line.to_string();
        let mut had_marker = false;
        for marker in markers {
            if cleaned.contains(marker.as_str()) {
                cleaned = cleaned.replace(marker.as_str(), "");
                had_marker = true;
            }
        }
        if had_marker && cleaned.trim().is_empty() {
            continue;
        }
        if had_marker {
            cleaned = cleaned.trim_start().to_string();
        }
        out.push_str(cleaned.trim_end());
        out.push('\n');
    }
    out
}

/// Full sanitizing pass applied to every capture before segmenting.
pub fn sanitize(raw: &str, pager_markers: &[String]) -> String {
    strip_pager_markers(&strip_terminal_noise(raw), pager_markers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ansi_stripping() {
        assert_eq!(strip_terminal_noise("\x1b[32mGreen text\x1b[0m"), "Green text");
    }

    #[test]
    fn test_crlf_normalized() {
        assert_eq!(strip_terminal_noise("a\r\nb\r\n"), "a\nb\n");
    }

    #[test]
    fn test_backspace() {
        assert_eq!(strip_terminal_noise("dis vr\x08\x08ver"), "dis ver");
    }

    #[test]
    fn test_bom_removed() {
        assert_eq!(strip_terminal_noise("\u{feff}<PE1>"), "<PE1>");
    }

    #[test]
    fn test_pager_markers() {
        let markers = vec!["---- More ----".to_string()];
        let text = "line one\n  ---- More ----\x1b[42D                                          \x1b[42Dline two\n";
        let cleaned = sanitize(text, &markers);
        assert_eq!(cleaned, "line one\nline two\n");
    }

    #[test]
    fn test_unicode_preserved() {
        assert_eq!(strip_terminal_noise("Température 45°C"), "Température 45°C");
    }
}
