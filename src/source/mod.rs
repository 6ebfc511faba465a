//! Source descriptors and URL template rendering.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::SourceError;

use serde::{Deserialize, Serialize};
use url::Url;
use url::form_urlencoded::byte_serialize;

use crate::constants::KEYWORD_PLACEHOLDER;

/// An external search endpoint supplied by the caller.
///
/// `url_template` contains a `{keyword}` placeholder that is substituted before any request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub id: String,
    pub url_template: String,
    pub name: String,
}

impl SourceDescriptor {
    pub fn new(
        id: impl Into<String>,
        url_template: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            url_template: url_template.into(),
            name: name.into(),
        }
    }

    /// Substitutes `keyword` (form-encoded) into every placeholder of the template.
    pub fn render(&self, keyword: &str) -> String {
        let encoded: String = byte_serialize(keyword.as_bytes()).collect();
        self.url_template.replace(KEYWORD_PLACEHOLDER, &encoded)
    }

    /// Returns `scheme://host[:port]` of the template.
    pub fn origin(&self) -> Result<String, SourceError> {
        let parsed = self.parsed_template()?;
        let host = parsed
            .host_str()
            .ok_or_else(|| SourceError::MissingHost {
                template: self.url_template.clone(),
            })?;
        Ok(match parsed.port() {
            Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
            None => format!("{}://{}", parsed.scheme(), host),
        })
    }

    /// Joins an absolute path onto the template origin.
    pub fn origin_path(&self, path: &str) -> Result<String, SourceError> {
        let origin = self.origin()?;
        if path.starts_with('/') {
            Ok(format!("{origin}{path}"))
        } else {
            Ok(format!("{origin}/{path}"))
        }
    }

    fn parsed_template(&self) -> Result<Url, SourceError> {
        // The placeholder itself is not a valid URL fragment in every position.
        let probe_form = self.render("probe");
        let parsed = Url::parse(&probe_form).map_err(|e| SourceError::InvalidTemplate {
            template: self.url_template.clone(),
            source: e,
        })?;
        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            other => Err(SourceError::UnsupportedScheme {
                scheme: other.to_string(),
            }),
        }
    }
}
