//! The simulation message hub.
//!
//! An append-only sink for user-facing diagnostics. Components and systems
//! push into it through their contexts; the embedding application drains it
//! after each driver call. Fatal messages accompany a failed operation,
//! warnings do not stop anything by themselves.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        };
        f.write_str(s)
    }
}

/// One diagnostic message; `source` names the component or system that
/// produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub severity: Severity,
    pub source: String,
    pub text: String,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.source, self.text)
    }
}

/// Append-only message sink, drained by the caller.
#[derive(Debug, Default)]
pub struct MessageHub {
    messages: Vec<Message>,
}

impl MessageHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, severity: Severity, source: impl Into<String>, text: impl Into<String>) {
        self.messages.push(Message {
            severity,
            source: source.into(),
            text: text.into(),
        });
    }

    pub fn info(&mut self, source: impl Into<String>, text: impl Into<String>) {
        self.push(Severity::Info, source, text);
    }

    pub fn warning(&mut self, source: impl Into<String>, text: impl Into<String>) {
        self.push(Severity::Warning, source, text);
    }

    pub fn error(&mut self, source: impl Into<String>, text: impl Into<String>) {
        self.push(Severity::Error, source, text);
    }

    pub fn fatal(&mut self, source: impl Into<String>, text: impl Into<String>) {
        self.push(Severity::Fatal, source, text);
    }

    /// Take all accumulated messages, leaving the hub empty.
    pub fn drain(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.messages)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_the_hub() {
        let mut hub = MessageHub::new();
        hub.info("sys", "starting");
        hub.warning("valve", "cavitation");
        assert_eq!(hub.messages().len(), 2);

        let taken = hub.drain();
        assert_eq!(taken.len(), 2);
        assert_eq!(taken[0].severity, Severity::Info);
        assert_eq!(taken[1].source, "valve");
        assert!(hub.is_empty());
    }

    #[test]
    fn display_format() {
        let mut hub = MessageHub::new();
        hub.fatal("sys", "boom");
        assert_eq!(hub.messages()[0].to_string(), "[fatal] sys: boom");
    }
}
