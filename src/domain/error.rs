//! Domain error types.

/// Top-level error type for fluxo.
#[derive(Debug, thiserror::Error)]
pub enum FluxoError {
    #[error("store error: {reason}")]
    Store { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid period {input:?}: expected YYYY-MM")]
    PeriodParse { input: String },

    #[error("invalid report mode {input:?}: expected projected, settled or all")]
    ModeParse { input: String },

    #[error("invalid entry: {reason}")]
    EntryInvalid { reason: String },

    #[error("import decode error: {reason}")]
    ImportDecode { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&FluxoError> for std::process::ExitCode {
    fn from(err: &FluxoError) -> Self {
        let code: u8 = match err {
            FluxoError::Io(_) => 1,
            FluxoError::ConfigParse { .. }
            | FluxoError::ConfigMissing { .. }
            | FluxoError::ConfigInvalid { .. } => 2,
            FluxoError::Store { .. } => 3,
            FluxoError::PeriodParse { .. }
            | FluxoError::ModeParse { .. }
            | FluxoError::EntryInvalid { .. } => 4,
            FluxoError::ImportDecode { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
