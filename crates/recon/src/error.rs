use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty mapping, duplicate field, etc.).
    ConfigValidation(String),
    /// A source record lacks a field named by the field mapping.
    MissingField {
        index: usize,
        record_id: Option<String>,
        field: String,
    },
    /// A source identifier is not a usable scalar (null, array, object).
    InvalidIdentifier { index: usize, field: String },
    /// Two source records share an identifier under the `reject` policy.
    DuplicateIdentifier { id: String },
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingField { index, record_id, field } => match record_id {
                Some(id) => write!(f, "source record #{index} ('{id}'): missing field '{field}'"),
                None => write!(f, "source record #{index}: missing field '{field}'"),
            },
            Self::InvalidIdentifier { index, field } => {
                write!(f, "source record #{index}: identifier '{field}' is not a scalar value")
            }
            Self::DuplicateIdentifier { id } => {
                write!(f, "duplicate source identifier '{id}'")
            }
        }
    }
}

impl std::error::Error for ReconError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_names_record() {
        let err = ReconError::MissingField {
            index: 3,
            record_id: Some("A1".into()),
            field: "street".into(),
        };
        assert_eq!(err.to_string(), "source record #3 ('A1'): missing field 'street'");

        let err = ReconError::MissingField { index: 0, record_id: None, field: "sys_id".into() };
        assert_eq!(err.to_string(), "source record #0: missing field 'sys_id'");
    }
}
