//! Inbound request parsing.
//!
//! Each accepted connection is parsed by a small state machine: read the
//! header block line by line until a blank line, split the first line into
//! exactly three tokens, then (for `POST` only) read exactly the advertised
//! `Content-Length` bytes as the body. Every malformation is a typed
//! [`ParseError`] so the handler can answer with a diagnostic instead of
//! tearing the connection down.
use std::io::{self, BufRead, Read};

use thiserror::Error;

const CONTENT_LENGTH_PREFIX: &str = "Content-Length: ";

/// Upper bound on an advertised body size; anything larger is rejected
/// before a buffer is sized from it.
const MAX_BODY_BYTES: usize = 1 << 20;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed request line '{line}': expected 3 tokens, found {found}")]
    MalformedRequestLine { line: String, found: usize },

    #[error("invalid Content-Length value '{value}'")]
    BadContentLength { value: String },

    #[error("Content-Length {length} exceeds the {limit} byte limit")]
    BodyTooLarge { length: usize, limit: usize },

    #[error("connection closed before a complete request")]
    UnexpectedEof,

    #[error("failed to read request: {0}")]
    Io(#[from] io::Error),
}

/// One parsed inbound request; owned by its connection handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub target: String,
    pub http_version: String,
    /// Raw body text, present only for `POST`.
    pub json: Option<String>,
}

impl Request {
    /// Drive the parse state machine over `reader` until one request is
    /// consumed. Exactly `Content-Length` body bytes are read for `POST`;
    /// every other method leaves the stream untouched past the blank line.
    pub fn read_from<R: BufRead>(reader: &mut R) -> Result<Self, ParseError> {
        let lines = read_head(reader)?;

        let first = lines.first().ok_or(ParseError::UnexpectedEof)?;
        let tokens = first.split(' ').collect::<Vec<&str>>();
        if tokens.len() != 3 {
            return Err(ParseError::MalformedRequestLine {
                line: first.clone(),
                found: tokens.len(),
            });
        }
        let (method, target, http_version) = (tokens[0], tokens[1], tokens[2]);

        let json = if method == "POST" {
            let length = content_length(&lines)?;
            Some(read_body(reader, length)?)
        } else {
            None
        };

        Ok(Request {
            method: method.to_string(),
            target: target.to_string(),
            http_version: http_version.to_string(),
            json,
        })
    }
}

/// Accumulate header-block lines up to (not including) the blank separator.
/// EOF after at least one line terminates the head the same way a blank line
/// does; an empty stream is an error.
fn read_head<R: BufRead>(reader: &mut R) -> Result<Vec<String>, ParseError> {
    let mut lines = Vec::new();

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            if lines.is_empty() {
                return Err(ParseError::UnexpectedEof);
            }
            break;
        }

        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            if lines.is_empty() {
                return Err(ParseError::UnexpectedEof);
            }
            break;
        }
        lines.push(line.to_string());
    }

    Ok(lines)
}

/// Scan the header block for `Content-Length: `; absence means 0.
fn content_length(lines: &[String]) -> Result<usize, ParseError> {
    for line in lines {
        if let Some(value) = line.strip_prefix(CONTENT_LENGTH_PREFIX) {
            let length: usize =
                value.parse().map_err(|_| ParseError::BadContentLength {
                    value: value.to_string(),
                })?;
            if length > MAX_BODY_BYTES {
                return Err(ParseError::BodyTooLarge {
                    length,
                    limit: MAX_BODY_BYTES,
                });
            }
            return Ok(length);
        }
    }
    Ok(0)
}

fn read_body<R: Read>(reader: &mut R, length: usize) -> Result<String, ParseError> {
    let mut body = vec![0u8; length];
    reader.read_exact(&mut body).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => ParseError::UnexpectedEof,
        _ => ParseError::Io(e),
    })?;
    Ok(String::from_utf8_lossy(&body).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(input: &[u8]) -> Result<Request, ParseError> {
        Request::read_from(&mut Cursor::new(input))
    }

    #[test]
    fn request_line_tokens_verbatim() {
        let req = parse(b"GET /status HTTP/1.1\r\n\r\n").unwrap();

        assert_eq!(req.method, "GET");
        assert_eq!(req.target, "/status");
        assert_eq!(req.http_version, "HTTP/1.1");
        assert_eq!(req.json, None);
    }

    #[test]
    fn two_tokens_is_a_parse_error() {
        let err = parse(b"GET /status\r\n\r\n").unwrap_err();

        assert!(matches!(
            err,
            ParseError::MalformedRequestLine { found: 2, .. }
        ));
    }

    #[test]
    fn four_tokens_is_a_parse_error() {
        let err = parse(b"GET /status HTTP/1.1 extra\r\n\r\n").unwrap_err();

        assert!(matches!(
            err,
            ParseError::MalformedRequestLine { found: 4, .. }
        ));
    }

    #[test]
    fn doubled_space_is_a_parse_error() {
        // Splitting on single spaces yields an empty fourth token.
        let err = parse(b"GET  /status HTTP/1.1\r\n\r\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedRequestLine { .. }));
    }

    #[test]
    fn post_reads_exactly_content_length() {
        let mut cursor = Cursor::new(
            b"POST /cmd HTTP/1.1\r\nContent-Length: 5\r\n\r\nhelloTRAILING".to_vec(),
        );
        let req = Request::read_from(&mut cursor).unwrap();

        assert_eq!(req.json.as_deref(), Some("hello"));

        // Byte N+1 stays in the stream.
        let mut rest = String::new();
        cursor.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, "TRAILING");
    }

    #[test]
    fn non_post_consumes_no_body_bytes() {
        let mut cursor =
            Cursor::new(b"GET /status HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello".to_vec());
        let req = Request::read_from(&mut cursor).unwrap();

        assert_eq!(req.json, None);

        let mut rest = String::new();
        cursor.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, "hello");
    }

    #[test]
    fn missing_content_length_defaults_to_empty_body() {
        let req = parse(b"POST /cmd HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(req.json.as_deref(), Some(""));
    }

    #[test]
    fn non_numeric_content_length_is_a_parse_error() {
        let err = parse(b"POST /cmd HTTP/1.1\r\nContent-Length: five\r\n\r\n").unwrap_err();

        assert!(matches!(err, ParseError::BadContentLength { value } if value == "five"));
    }

    #[test]
    fn huge_content_length_is_rejected_before_allocation() {
        let err = parse(
            b"POST /cmd HTTP/1.1\r\nContent-Length: 18446744073709551615\r\n\r\n",
        )
        .unwrap_err();

        assert!(matches!(err, ParseError::BodyTooLarge { .. }));
    }

    #[test]
    fn content_length_just_over_the_limit_is_rejected() {
        let header = format!(
            "POST /cmd HTTP/1.1\r\nContent-Length: {}\r\n\r\n",
            MAX_BODY_BYTES + 1
        );
        let err = parse(header.as_bytes()).unwrap_err();

        assert!(matches!(
            err,
            ParseError::BodyTooLarge { length, limit }
                if length == MAX_BODY_BYTES + 1 && limit == MAX_BODY_BYTES
        ));
    }

    #[test]
    fn content_length_at_the_limit_is_accepted() {
        let mut input =
            format!("POST /cmd HTTP/1.1\r\nContent-Length: {MAX_BODY_BYTES}\r\n\r\n").into_bytes();
        input.extend(vec![b'x'; MAX_BODY_BYTES]);

        let req = parse(&input).unwrap();
        assert_eq!(req.json.map(|b| b.len()), Some(MAX_BODY_BYTES));
    }

    #[test]
    fn short_body_is_an_eof_error() {
        let err = parse(b"POST /cmd HTTP/1.1\r\nContent-Length: 10\r\n\r\nhi").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof));
    }

    #[test]
    fn empty_stream_is_an_eof_error() {
        assert!(matches!(parse(b""), Err(ParseError::UnexpectedEof)));
    }

    #[test]
    fn bare_lf_lines_are_accepted() {
        let req = parse(b"GET /status HTTP/1.1\n\n").unwrap();
        assert_eq!(req.method, "GET");
    }

    #[test]
    fn eof_terminates_head_like_a_blank_line() {
        let req = parse(b"GET /status HTTP/1.1\r\n").unwrap();
        assert_eq!(req.target, "/status");
    }
}
