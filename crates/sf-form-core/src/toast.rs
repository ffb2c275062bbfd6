//! Toast model and the reporting seam.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Info,
    Warning,
    Danger,
}

impl ToastKind {
    pub fn icon(self) -> &'static str {
        match self {
            ToastKind::Success => "✅",
            ToastKind::Info => "ℹ️",
            ToastKind::Warning => "⚠️",
            ToastKind::Danger => "❌",
        }
    }

    /// Background, foreground and border colours.
    pub fn palette(self) -> (&'static str, &'static str, &'static str) {
        match self {
            ToastKind::Success => ("#d1e7dd", "#0f5132", "#badbcc"),
            ToastKind::Info => ("#cff4fc", "#055160", "#b6effb"),
            ToastKind::Warning => ("#fff3cd", "#856404", "#ffeeba"),
            ToastKind::Danger => ("#f8d7da", "#842029", "#f5c2c7"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    /// `None` uses the configured default lifetime.
    pub timeout_ms: Option<u32>,
}

impl Toast {
    pub fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
            timeout_ms: None,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Warning, message)
    }

    /// Error toast; `details` are appended after a dash.
    pub fn error(message: &str, details: Option<&str>) -> Self {
        let message = match details.filter(|d| !d.is_empty()) {
            Some(details) => format!("{message} - {details}"),
            None => message.to_owned(),
        };
        Self::new(ToastKind::Danger, message)
    }

    pub fn with_timeout(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

/// Anything that can put a toast in front of the user.
pub trait Notifier {
    fn notify(&self, toast: Toast);

    fn error(&self, message: &str, details: Option<&str>) {
        self.notify(Toast::error(message, details));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_details_are_appended() {
        let t = Toast::error("Submission failed. Please try again later.", Some("timeout"));
        assert_eq!(t.message, "Submission failed. Please try again later. - timeout");
        assert_eq!(t.kind, ToastKind::Danger);
        assert_eq!(Toast::error("Oops", Some("")).message, "Oops");
    }
}
