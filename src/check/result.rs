/// Outcome of one executed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail,
    Pending,
    NotApplicable,
    /// Human judgment required; recorded without calling `run`.
    Manual,
    /// The check itself raised; contained by the scheduler.
    Error,
}

impl Outcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Pending => "pending",
            Self::NotApplicable => "not_applicable",
            Self::Manual => "manual",
            Self::Error => "error",
        }
    }

    /// Glyph used by the plain-text renderer. Bracket forms paste cleanly
    /// into bug trackers.
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Pass => "[x]",
            Self::Fail => "[!]",
            Self::Pending => "[?]",
            Self::NotApplicable => "[-]",
            Self::Manual => "[ ]",
            Self::Error => "[E]",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named blob of supporting output attached to a result (rpmlint dumps,
/// file listings and the like). Rendered verbatim after the sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub title: String,
    pub content: String,
}

/// What one check produced. Exactly one per non-deprecated applicable
/// check; a non-applicable check contributes nothing to the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub check_name: String,
    pub outcome: Outcome,
    pub message: Option<String>,
    pub attachments: Vec<Attachment>,
}

impl CheckResult {
    #[must_use]
    pub fn new(check_name: &str, outcome: Outcome) -> Self {
        Self {
            check_name: check_name.to_string(),
            outcome,
            message: None,
            attachments: Vec::new(),
        }
    }

    #[must_use]
    pub fn pass(check_name: &str) -> Self {
        Self::new(check_name, Outcome::Pass)
    }

    #[must_use]
    pub fn fail(check_name: &str, message: &str) -> Self {
        Self::new(check_name, Outcome::Fail).with_message(message)
    }

    #[must_use]
    pub fn pending(check_name: &str, message: &str) -> Self {
        Self::new(check_name, Outcome::Pending).with_message(message)
    }

    #[must_use]
    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    #[must_use]
    pub fn with_attachment(mut self, title: &str, content: &str) -> Self {
        self.attachments.push(Attachment {
            title: title.to_string(),
            content: content.to_string(),
        });
        self
    }

    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self.outcome, Outcome::Fail | Outcome::Error)
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
