/// Authenticated caller for a request, inserted by the auth middleware.
///
/// Tokens are only required to be valid; the subject is carried for logging.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrincipalContext {
    subject: Option<String>,
}

impl PrincipalContext {
    pub fn new(subject: Option<String>) -> Self {
        Self { subject }
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Subject for log fields; `"anonymous"` when the token had none.
    pub fn log_subject(&self) -> &str {
        self.subject().unwrap_or("anonymous")
    }
}
