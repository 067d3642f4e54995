//! Diagnostic reporting.
//!
//! Every malformed construct is reported through a [`DiagnosticSink`] and
//! parsing continues with a best-effort partial result. Sinks must not
//! block or panic.

use crate::tokenizer::Tokenizer;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum Severity {
    Note,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(text)
    }
}

pub trait DiagnosticSink {
    fn report(&mut self, file: &str, line: u32, severity: Severity, message: &str);
}

/// Default sink: writes `severity: file:line: message` to stderr.
pub struct ConsoleSink;

impl DiagnosticSink for ConsoleSink {
    fn report(&mut self, file: &str, line: u32, severity: Severity, message: &str) {
        eprintln!("{}: {}:{}: {}", severity, file, line, message);
    }
}

/// Reports a warning at the tokenizer's current location.
pub fn warn(sink: &mut dyn DiagnosticSink, tok: &Tokenizer, message: &str) {
    sink.report(tok.filename(), tok.line_no(), Severity::Warning, message);
}

/// Sink that records reports, for assertions in tests.
#[cfg(test)]
#[derive(Default)]
pub struct CollectSink {
    pub reports: Vec<(String, u32, Severity, String)>,
}

#[cfg(test)]
impl DiagnosticSink for CollectSink {
    fn report(&mut self, file: &str, line: u32, severity: Severity, message: &str) {
        self.reports
            .push((file.to_string(), line, severity, message.to_string()));
    }
}

#[cfg(test)]
impl CollectSink {
    pub fn messages(&self) -> Vec<&str> {
        self.reports.iter().map(|r| r.3.as_str()).collect()
    }
}
