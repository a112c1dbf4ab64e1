//! Line-oriented I/O for the CLI
//!
//! - Input: one event per stdin line, blank lines skipped
//! - Output: one JSON object per stdout line
//! - UTF-8 only

use std::io::{self, BufRead, Write};

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read non-empty lines from `reader`, trimmed.
pub fn read_lines(reader: impl BufRead) -> impl Iterator<Item = CliResult<String>> {
    reader.lines().filter_map(|line| match line {
        Ok(line) if line.trim().is_empty() => None,
        Ok(line) => Some(Ok(line.trim().to_string())),
        Err(e) => Some(Err(CliError::from(e))),
    })
}

/// Write one JSON value as a line to `writer`.
pub fn write_json_to(writer: &mut impl Write, value: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Write one JSON value as a line to stdout.
pub fn write_json(value: &Value) -> CliResult<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_json_to(&mut lock, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Cursor;

    #[test]
    fn test_read_lines_skips_blanks() {
        let input = Cursor::new("turn_on\n\n  start_turning:42  \n");
        let lines: Vec<String> = read_lines(input).map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["turn_on", "start_turning:42"]);
    }

    #[test]
    fn test_write_json_is_one_line() {
        let mut out = Vec::new();
        write_json_to(&mut out, &json!({"state": "idle{}"})).unwrap();
        write_json_to(&mut out, &json!({"state": "off{}"})).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "{\"state\":\"idle{}\"}\n{\"state\":\"off{}\"}\n");
    }
}
