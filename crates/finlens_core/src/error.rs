use std::fmt;

/// Errors raised while decoding a financial document
#[derive(Debug, Clone)]
pub enum DocumentError {
    /// The payload is not valid JSON or does not match the document schema
    Decode(String),
    /// The top-level value is not a JSON object
    NotAnObject,
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::Decode(msg) => write!(f, "failed to decode document: {msg}"),
            DocumentError::NotAnObject => write!(f, "document root must be a JSON object"),
        }
    }
}

impl std::error::Error for DocumentError {}

impl From<serde_json::Error> for DocumentError {
    fn from(err: serde_json::Error) -> Self {
        DocumentError::Decode(err.to_string())
    }
}

/// Errors raised by the statistical or model-based detection step
#[derive(Debug, Clone)]
pub enum DetectionError {
    InvalidPolicy {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
    /// The outlier model returned a label vector of the wrong length
    ModelOutputMismatch { expected: usize, actual: usize },
    /// The outlier model could not be fitted
    Model(String),
}

impl fmt::Display for DetectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionError::InvalidPolicy {
                field,
                value,
                reason,
            } => write!(f, "invalid detection policy {field}={value}: {reason}"),
            DetectionError::ModelOutputMismatch { expected, actual } => write!(
                f,
                "outlier model returned {actual} labels for {expected} values"
            ),
            DetectionError::Model(msg) => write!(f, "outlier model failed: {msg}"),
        }
    }
}

impl std::error::Error for DetectionError {}

/// A projection or summary parameter outside its valid range
#[derive(Debug, Clone)]
pub struct ParameterError {
    pub parameter: &'static str,
    pub value: f64,
    pub reason: &'static str,
}

impl ParameterError {
    pub fn new(parameter: &'static str, value: f64, reason: &'static str) -> Self {
        Self {
            parameter,
            value,
            reason,
        }
    }
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}: {}", self.parameter, self.value, self.reason)
    }
}

impl std::error::Error for ParameterError {}

/// Every failure the analytics core can surface to its caller
#[derive(Debug, Clone)]
pub enum AnalyticsError {
    DocumentInvalid(DocumentError),
    DetectionFailed(DetectionError),
    /// A ratio whose denominator (monthly income) is zero
    DivisionByZero { ratio: &'static str },
    SimulationParameterInvalid(ParameterError),
}

impl fmt::Display for AnalyticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyticsError::DocumentInvalid(e) => write!(f, "invalid document: {e}"),
            AnalyticsError::DetectionFailed(e) => write!(f, "anomaly detection failed: {e}"),
            AnalyticsError::DivisionByZero { ratio } => {
                write!(f, "cannot compute {ratio}: monthly income is zero")
            }
            AnalyticsError::SimulationParameterInvalid(e) => {
                write!(f, "invalid simulation parameter {e}")
            }
        }
    }
}

impl std::error::Error for AnalyticsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalyticsError::DocumentInvalid(e) => Some(e),
            AnalyticsError::DetectionFailed(e) => Some(e),
            AnalyticsError::SimulationParameterInvalid(e) => Some(e),
            AnalyticsError::DivisionByZero { .. } => None,
        }
    }
}

impl From<DocumentError> for AnalyticsError {
    fn from(err: DocumentError) -> Self {
        AnalyticsError::DocumentInvalid(err)
    }
}

impl From<DetectionError> for AnalyticsError {
    fn from(err: DetectionError) -> Self {
        AnalyticsError::DetectionFailed(err)
    }
}

impl From<ParameterError> for AnalyticsError {
    fn from(err: ParameterError) -> Self {
        AnalyticsError::SimulationParameterInvalid(err)
    }
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
