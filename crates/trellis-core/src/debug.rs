use crate::error::ErrorCode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// Whether the sink retains messages for later inspection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DebugBehavior {
    #[default]
    Verbose,
    Silent,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DebugMessage {
    pub severity: Severity,
    pub code: ErrorCode,
    pub message: String,
}

/// Diagnostics sink for soft warnings and recorded errors. Everything is
/// forwarded to the `log` crate; retention depends on [`DebugBehavior`].
#[derive(Debug, Default)]
pub struct DebugLogger {
    behavior: DebugBehavior,
    messages: Vec<DebugMessage>,
}

impl DebugLogger {
    pub fn new(behavior: DebugBehavior) -> Self {
        DebugLogger { behavior, messages: Vec::new() }
    }

    pub fn report(&mut self, severity: Severity, code: ErrorCode, message: impl Into<String>) {
        let message = message.into();
        match severity {
            Severity::Error => log::error!("[{code:?}] {message}"),
            Severity::Warning => log::warn!("[{code:?}] {message}"),
        }
        if self.behavior == DebugBehavior::Verbose {
            self.messages.push(DebugMessage { severity, code, message });
        }
    }

    pub fn messages(&self, severity: Severity) -> Vec<&DebugMessage> {
        self.messages.iter().filter(|m| m.severity == severity).collect()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
