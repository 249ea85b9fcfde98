//! Reply value and reply-code classification (RFC 959 §4.2).
//!
//! A reply is either a single line `NNN text`, or a multi-line block
//! opened by `NNN-text` and closed by a later line `NNN text` carrying the
//! same code. Continuation lines in between are kept verbatim unless they
//! themselves carry the `NNN-` prefix, which is stripped.

use crate::ftp::error::{FtpError, FtpResult};

/// Expected-code check applied to a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    /// The reply must carry exactly this code.
    Code(u16),
    /// Any code is accepted and handed back for inspection.
    AcceptAny,
}

impl Expect {
    pub fn matches(self, code: u16) -> bool {
        match self {
            Expect::Code(expected) => expected == code,
            Expect::AcceptAny => true,
        }
    }
}

impl From<u16> for Expect {
    fn from(code: u16) -> Self {
        Expect::Code(code)
    }
}

/// One complete server reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub code: u16,
    /// Message lines with the code prefixes removed.
    pub lines: Vec<String>,
}

impl Reply {
    /// Full message text, lines joined with `\n`.
    pub fn message(&self) -> String {
        self.lines.join("\n")
    }

    /// Apply an expected-code check, turning a mismatch into a protocol error.
    pub fn check(self, expect: Expect) -> FtpResult<Reply> {
        if expect.matches(self.code) {
            Ok(self)
        } else {
            Err(FtpError::unexpected_reply(self.code, self.message()))
        }
    }
}

/// A reply whose lines are still arriving.
#[derive(Debug)]
pub struct PendingReply {
    code: u16,
    lines: Vec<String>,
    complete: bool,
}

impl PendingReply {
    /// Start a reply from its first line.
    pub fn begin(first: &str) -> FtpResult<Self> {
        let (code, _, text) = parse_code_line(first)?;
        Ok(Self {
            code,
            lines: vec![text.to_string()],
            complete: !is_multiline_start(first),
        })
    }

    /// Feed the next line of a multi-line reply.
    pub fn push(&mut self, line: &str) {
        self.complete = is_terminator(line, self.code);
        self.lines.push(strip_code(line, self.code).to_string());
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn finish(self) -> Reply {
        Reply {
            code: self.code,
            lines: self.lines,
        }
    }
}

/// Whether `line` opens a multi-line reply (`NNN-`).
fn is_multiline_start(line: &str) -> bool {
    matches!(parse_code_line(line), Ok((_, true, _)))
}

/// Whether `line` closes a multi-line reply opened with `code`.
fn is_terminator(line: &str, code: u16) -> bool {
    matches!(parse_code_line(line), Ok((c, false, _)) if c == code)
}

/// Text of a continuation line, without its prefix when it carries `code`.
fn strip_code(line: &str, code: u16) -> &str {
    match parse_code_line(line) {
        Ok((c, _, text)) if c == code => text,
        _ => line,
    }
}

/// Split `NNN<sep>text` into (code, continued, text).
fn parse_code_line(line: &str) -> FtpResult<(u16, bool, &str)> {
    let bytes = line.as_bytes();
    if bytes.len() < 3 || !bytes[..3].iter().all(u8::is_ascii_digit) {
        return Err(FtpError::format(format!("Invalid reply line: '{}'", line)));
    }
    let code = line[..3]
        .parse::<u16>()
        .map_err(|_| FtpError::format(format!("Invalid reply code in: '{}'", line)))?;
    match bytes.get(3) {
        None => Ok((code, false, "")),
        Some(b' ') => Ok((code, false, &line[4..])),
        Some(b'-') => Ok((code, true, &line[4..])),
        Some(_) => Err(FtpError::format(format!("Invalid reply line: '{}'", line))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assemble(lines: &[&str]) -> Reply {
        let mut pending = PendingReply::begin(lines[0]).unwrap();
        for line in &lines[1..] {
            assert!(!pending.is_complete());
            pending.push(line);
        }
        assert!(pending.is_complete());
        pending.finish()
    }

    #[test]
    fn single_line_reply() {
        let r = assemble(&["220 Service ready"]);
        assert_eq!(r.code, 220);
        assert_eq!(r.message(), "Service ready");
    }

    #[test]
    fn multi_line_reply_keeps_continuations() {
        let r = assemble(&["211-Features:", " EPSV", " UTF8", "211 End"]);
        assert_eq!(r.code, 211);
        assert_eq!(r.lines, vec!["Features:", " EPSV", " UTF8", "End"]);
    }

    #[test]
    fn inner_line_with_other_code_is_text() {
        let r = assemble(&["250-Listing", "226 not the end", "250 End"]);
        assert_eq!(r.lines.len(), 3);
        assert_eq!(r.lines[1], "226 not the end");
    }

    #[test]
    fn inner_dash_line_with_same_code_is_stripped() {
        let r = assemble(&["230-Welcome", "230-second", "230 done"]);
        assert_eq!(r.lines, vec!["Welcome", "second", "done"]);
    }

    #[test]
    fn classifier_helpers() {
        assert!(is_multiline_start("211-Features"));
        assert!(!is_multiline_start("211 Features"));
        assert!(is_terminator("211 End", 211));
        assert!(!is_terminator("211-More", 211));
        assert!(!is_terminator("212 End", 211));
    }

    #[test]
    fn expect_codes() {
        assert!(Expect::Code(226).matches(226));
        assert!(!Expect::Code(226).matches(250));
        assert!(Expect::AcceptAny.matches(550));
    }

    #[test]
    fn check_mismatch_carries_code_and_message() {
        let r = assemble(&["550 No such file"]);
        let err = r.check(Expect::Code(250)).unwrap_err();
        assert_eq!(err.code, Some(550));
        assert_eq!(err.message, "No such file");
    }

    #[test]
    fn garbage_line_is_rejected() {
        assert!(PendingReply::begin("hello").is_err());
        assert!(PendingReply::begin("22").is_err());
        assert!(PendingReply::begin("220xready").is_err());
    }
}
