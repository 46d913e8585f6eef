use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ReportResult<T> = Result<T, ReportError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportErrorCategory {
    Success,
    InputValidationError,
    IoSystemError,
    RenderError,
    InternalError,
}

impl ReportErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::InputValidationError => 2,
            Self::IoSystemError => 3,
            Self::RenderError => 4,
            Self::InternalError => 5,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::InputValidationError => "InputValidationError",
            Self::IoSystemError => "IoSystemError",
            Self::RenderError => "RenderError",
            Self::InternalError => "InternalError",
        }
    }

    pub const fn is_fatal(self) -> bool {
        !matches!(self, Self::Success)
    }
}

/// Categorized failure with a stable `AREA.DETAIL` code, suitable both for
/// diagnostics and for process exit-code mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportError {
    category: ReportErrorCategory,
    code: &'static str,
    message: String,
}

impl ReportError {
    pub fn new(
        category: ReportErrorCategory,
        code: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            code,
            message: message.into(),
        }
    }

    pub fn input_validation(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(ReportErrorCategory::InputValidationError, code, message)
    }

    pub fn io_system(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(ReportErrorCategory::IoSystemError, code, message)
    }

    pub fn render(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(ReportErrorCategory::RenderError, code, message)
    }

    pub fn internal(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(ReportErrorCategory::InternalError, code, message)
    }

    pub const fn category(&self) -> ReportErrorCategory {
        self.category
    }

    pub const fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        let severity = if self.category.is_fatal() {
            "ERROR"
        } else {
            "INFO"
        };
        format!("{}: [{}] {}", severity, self.code, self.message)
    }
}

impl Display for ReportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.category.label(),
            self.code,
            self.message
        )
    }
}

impl Error for ReportError {}

#[cfg(test)]
mod tests {
    use super::{ReportError, ReportErrorCategory};

    #[test]
    fn category_exit_mapping_is_stable() {
        let cases = [
            (ReportErrorCategory::Success, 0, "Success"),
            (ReportErrorCategory::InputValidationError, 2, "InputValidationError"),
            (ReportErrorCategory::IoSystemError, 3, "IoSystemError"),
            (ReportErrorCategory::RenderError, 4, "RenderError"),
            (ReportErrorCategory::InternalError, 5, "InternalError"),
        ];

        for (category, exit_code, label) in cases {
            assert_eq!(category.exit_code(), exit_code);
            assert_eq!(category.label(), label);
        }
    }

    #[test]
    fn fatal_error_renders_diagnostic_line() {
        let error = ReportError::input_validation(
            "INPUT.SNAPSHOT_PARSE",
            "snapshot is not valid JSON at line 3",
        );

        assert_eq!(error.exit_code(), 2);
        assert_eq!(
            error.diagnostic_line(),
            "ERROR: [INPUT.SNAPSHOT_PARSE] snapshot is not valid JSON at line 3"
        );
    }
}
