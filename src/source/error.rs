use thiserror::Error;

/// Errors raised while interpreting a source URL template.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("invalid url template '{template}': {source}")]
    InvalidTemplate {
        template: String,
        #[source]
        source: url::ParseError,
    },

    #[error("url template '{template}' has no host")]
    MissingHost { template: String },

    #[error("unsupported url scheme '{scheme}' (expected http or https)")]
    UnsupportedScheme { scheme: String },
}
