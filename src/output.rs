/// What happened after a picker session handled one action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The session goes on
    Continue,
    /// A line was produced and the session goes on (multi-output)
    Emit(String),
    /// A line was produced and the session is over
    Accept(String),
    /// The session is over without output
    Abort,
}

impl Outcome {
    /// Whether the session is over
    pub fn is_final(&self) -> bool {
        matches!(self, Outcome::Accept(_) | Outcome::Abort)
    }

    /// The produced line, if any
    pub fn output(&self) -> Option<&str> {
        match self {
            Outcome::Emit(line) | Outcome::Accept(line) => Some(line),
            Outcome::Continue | Outcome::Abort => None,
        }
    }
}
