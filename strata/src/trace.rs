//! Access-pattern trace parsing.
//!
//! One access per line: `R <addr>` to read, `W <addr>` to write, address
//! decimal or `0x`-prefixed hex. Blank lines and `#` comments are skipped.

use regex::Regex;
use thiserror::Error;

/// One `(address, write?)` pair from a trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceEntry {
    pub addr:       u32,
    pub is_write:   bool,
}

/// A line that does not parse as an access.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("line {line_no}: unrecognised access `{text}`")]
pub struct TraceError {
    pub line_no:    usize,
    pub text:       String,
}

/// Parse a whole trace file.
pub fn parse(input: &str) -> Result<Vec<TraceEntry>, TraceError> {
    let access_regex = Regex::new(r"^([RrWw])\s+(0[xX][0-9a-fA-F]+|[0-9]+)$").unwrap();

    let mut entries = Vec::new();
    for (n, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let bad_line = || TraceError { line_no: n + 1, text: line.to_string() };
        let Some(captures) = access_regex.captures(line) else {
            return Err(bad_line());
        };
        let is_write = captures[1].eq_ignore_ascii_case("w");
        let addr = parse_addr(&captures[2]).ok_or_else(bad_line)?;
        entries.push(TraceEntry { addr, is_write });
    }
    Ok(entries)
}

fn parse_addr(s: &str) -> Option<u32> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).ok()
    } else {
        s.parse().ok()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reads_and_writes() {
        let entries = parse("R 100\nW 200\nr 300\nw 400\n").unwrap();
        assert_eq!(entries, vec![
            TraceEntry { addr: 100, is_write: false },
            TraceEntry { addr: 200, is_write: true },
            TraceEntry { addr: 300, is_write: false },
            TraceEntry { addr: 400, is_write: true },
        ]);
    }

    #[test]
    fn hex_addresses() {
        let entries = parse("R 0x64\nW 0XC8").unwrap();
        assert_eq!(entries[0].addr, 100);
        assert_eq!(entries[1].addr, 200);
    }

    #[test]
    fn comments_and_blanks_skipped() {
        let entries = parse("# warmup\n\nR 100\n   \n# done\n").unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn bad_line_reported_with_number() {
        let err = parse("R 100\nread 200\n").unwrap_err();
        assert_eq!(err.line_no, 2);
        assert_eq!(err.text, "read 200");
    }

    #[test]
    fn address_overflow_rejected() {
        let err = parse("R 0x100000000").unwrap_err();
        assert_eq!(err.line_no, 1);
    }
}
