use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty name, no attendance source, etc.).
    ConfigValidation(String),
    /// Sign-in sheet could not be read.
    SheetParse { sheet: String, message: String },
    /// Sheet title does not carry a meeting code.
    MissingMeetingCode { title: String },
    /// Date parse error.
    DateParse { value: String },
    /// Attendance or roster JSON could not be decoded.
    Json(String),
    /// Roster store failure (merge, persistence).
    Store(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::SheetParse { sheet, message } => {
                write!(f, "sheet '{sheet}': {message}")
            }
            Self::MissingMeetingCode { title } => {
                write!(f, "sheet title '{title}' has no meeting code")
            }
            Self::DateParse { value } => write!(f, "cannot parse date '{value}'"),
            Self::Json(msg) => write!(f, "JSON error: {msg}"),
            Self::Store(msg) => write!(f, "roster store error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}

impl From<serde_json::Error> for ReconError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}
