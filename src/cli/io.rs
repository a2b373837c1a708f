//! JSON I/O for the `query` command
//!
//! - Input: a single JSON object on one stdin line
//! - Output: a single JSON object on one stdout line

use std::io::{self, BufRead, Write};

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};

/// Read one JSON request line
pub fn read_request<R: BufRead>(reader: &mut R) -> CliResult<Value> {
    let mut line = String::new();
    reader.read_line(&mut line)?;

    if line.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }

    Ok(serde_json::from_str(&line)?)
}

/// `{"status":"ok","data":…}`
pub fn success_envelope(data: Value) -> Value {
    json!({
        "status": "ok",
        "data": data
    })
}

/// `{"status":"error","code":…,"message":…}`
pub fn error_envelope(code: &str, message: &str) -> Value {
    json!({
        "status": "error",
        "code": code,
        "message": message
    })
}

/// Write one response line and flush
pub fn write_line<W: Write>(writer: &mut W, response: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, response)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_line(&mut io::stdout().lock(), &success_envelope(data))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_line(&mut io::stdout().lock(), &error_envelope(code, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_single_line() {
        let mut input = Cursor::new(b"{\"path\": \"a.csv\"}\n{\"ignored\": true}\n".to_vec());
        let value = read_request(&mut input).unwrap();
        assert_eq!(value["path"], "a.csv");
    }

    #[test]
    fn test_empty_input_is_error() {
        let mut input = Cursor::new(b"\n".to_vec());
        assert!(read_request(&mut input).is_err());
    }

    #[test]
    fn test_write_line_is_one_json_object() {
        let mut out = Vec::new();
        write_line(&mut out, &error_envelope("PathNotFound", "File not found: a.csv")).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with('\n'));

        let parsed: Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(parsed["status"], "error");
        assert_eq!(parsed["code"], "PathNotFound");
    }
}
