/// Non-fatal conditions raised while normalizing a single record.
///
/// Warnings never invalidate a record; the offending value is passed through
/// unchanged and the pipeline logs the warning before validation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizeWarning {
    /// Unrecognized field name or enum value in the field-mapping stage.
    Mapping { field: String, detail: String },
    /// A type conversion failed; the original value was kept.
    Coercion { field: String, detail: String },
}

impl NormalizeWarning {
    pub(crate) fn mapping(field: &str, detail: impl Into<String>) -> Self {
        Self::Mapping {
            field: field.to_string(),
            detail: detail.into(),
        }
    }

    pub(crate) fn coercion(field: &str, detail: impl Into<String>) -> Self {
        Self::Coercion {
            field: field.to_string(),
            detail: detail.into(),
        }
    }
}

impl std::fmt::Display for NormalizeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mapping { field, detail } => write!(f, "mapping warning on {field}: {detail}"),
            Self::Coercion { field, detail } => write!(f, "coercion warning on {field}: {detail}"),
        }
    }
}
