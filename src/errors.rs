use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoanError {
    #[error("invalid loan terms: {field} {reason}")]
    InvalidLoanTerms {
        field: String,
        reason: String,
    },

    #[error("malformed loan record: {field}: {message}")]
    MalformedRecord {
        field: String,
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LoanError {
    pub(crate) fn invalid_terms(field: impl Into<String>, reason: impl Into<String>) -> Self {
        LoanError::InvalidLoanTerms {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(field: impl Into<String>, message: impl Into<String>) -> Self {
        LoanError::MalformedRecord {
            field: field.into(),
            message: message.into(),
        }
    }

    /// the field an input error points at, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            LoanError::InvalidLoanTerms { field, .. } | LoanError::MalformedRecord { field, .. } => {
                Some(field.as_str())
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, LoanError>;
