pub const MISSING_INPUT_MESSAGE: &str = "Please enter both email and password.";
pub const IN_PROGRESS_MESSAGE: &str = "Logging in...";
pub const SIGNED_OUT_PROMPT: &str = "Please log in.";
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Login successful.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatusKind {
    Neutral,
    Success,
    Error,
}

impl StatusKind {
    pub fn color(self) -> &'static str {
        match self {
            StatusKind::Neutral => "black",
            StatusKind::Success => "green",
            StatusKind::Error => "red",
        }
    }
}

/// The single user-visible status line of the sign-in page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BridgeStatus {
    pub kind: StatusKind,
    pub message: String,
}

impl BridgeStatus {
    pub fn neutral(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Neutral,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            message: message.into(),
        }
    }

    pub fn render(&self) -> RenderedStatus {
        RenderedStatus {
            text: self.message.clone(),
            color: self.kind.color(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedStatus {
    pub text: String,
    pub color: &'static str,
}

/// Sink for the status line, typically a DOM element.
pub trait StatusDisplay: Send + Sync {
    fn show(&self, status: &RenderedStatus);
}
