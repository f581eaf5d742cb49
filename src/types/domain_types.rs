//! Domain-specific newtypes for type safety and validation.

use super::ValidationError;
use std::fmt;
use url::Url;

/// Base URL of a Confluence site (e.g. `https://example.atlassian.net/wiki`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(Url);

impl BaseUrl {
    /// Create a new base URL with validation
    pub fn parse(url: &str) -> Result<Self, ValidationError> {
        let trimmed = url.trim().trim_end_matches('/');
        match Url::parse(trimmed) {
            Ok(parsed_url) => {
                if parsed_url.scheme() != "http" && parsed_url.scheme() != "https" {
                    return Err(ValidationError::InvalidUrl {
                        url: url.to_string(),
                        reason: "Only HTTP and HTTPS URLs are supported".to_string(),
                    });
                }
                if parsed_url.cannot_be_a_base() {
                    return Err(ValidationError::InvalidUrl {
                        url: url.to_string(),
                        reason: "URL cannot be used as a base".to_string(),
                    });
                }
                Ok(Self(parsed_url))
            }
            Err(e) => Err(ValidationError::InvalidUrl {
                url: url.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Get the URL as a string, without a trailing slash
    pub fn as_str(&self) -> &str {
        self.0.as_str().trim_end_matches('/')
    }

    /// Builds an absolute URL for a REST endpoint path such as `rest/api/content`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.as_str(), path.trim_start_matches('/'))
    }

    /// Resolves a site-relative link (e.g. an attachment `_links.download`).
    ///
    /// Confluence returns download links relative to the context path, so
    /// `/download/attachments/1/a.png` on `https://host/wiki` resolves to
    /// `https://host/wiki/download/attachments/1/a.png`. Absolute links are
    /// returned unchanged.
    pub fn resolve_link(&self, link: &str) -> Result<Url, ValidationError> {
        if let Ok(absolute) = Url::parse(link) {
            return Ok(absolute);
        }

        let base_path = self.0.path().trim_end_matches('/');
        let joined = if !base_path.is_empty() && link.starts_with(base_path) {
            link.to_string()
        } else {
            format!("{}/{}", base_path, link.trim_start_matches('/'))
        };

        self.0
            .join(&joined)
            .map_err(|e| ValidationError::InvalidUrl {
                url: link.to_string(),
                reason: e.to_string(),
            })
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Key of the space to export (e.g. `ENG`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaceKey(String);

impl SpaceKey {
    pub fn new(key: impl Into<String>) -> Result<Self, ValidationError> {
        let key = key.into().trim().to_string();

        if key.is_empty() {
            return Err(ValidationError::EmptyField("space"));
        }

        if !key
            .chars()
            .all(|c| c.is_alphanumeric() || c == '~' || c == '_' || c == '-')
        {
            return Err(ValidationError::InvalidSpaceKey {
                key,
                reason: "space keys only contain letters, digits, '~', '_' and '-'".to_string(),
            });
        }

        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Account email plus API token used for basic authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    token: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, token: impl Into<String>) -> Result<Self, ValidationError> {
        let email = email.into();
        let token = token.into();

        if email.trim().is_empty() {
            return Err(ValidationError::EmptyField("email"));
        }
        if token.trim().is_empty() {
            return Err(ValidationError::EmptyField("token"));
        }

        Ok(Self {
            email: email.trim().to_string(),
            token: token.trim().to_string(),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

// The token never appears in logs or debug output.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (token redacted)", self.email)
    }
}
