//! Errors that cross the page-navigation boundary.

use thiserror::Error;

/// A page context could not be brought to a ready state.
///
/// Fatal for the listing page; for a product detail page it only means that
/// product is left unenriched.
#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("could not open a page context: {reason}")]
    PageContext { reason: String },

    #[error("navigation to {url} failed: {reason}")]
    Navigate { url: String, reason: String },

    #[error("{url} never became ready (selector '{selector}'): {reason}")]
    NotReady { url: String, selector: String, reason: String },

    #[error("{url} served a block page: {reason}")]
    Blocked { url: String, reason: &'static str },

    #[error("could not read the document of {url}: {reason}")]
    Snapshot { url: String, reason: String },
}

impl NavigationError {
    /// Returns the URL involved, if a navigation was attempted.
    pub fn url(&self) -> Option<&str> {
        match self {
            NavigationError::PageContext { .. } => None,
            NavigationError::Navigate { url, .. }
            | NavigationError::NotReady { url, .. }
            | NavigationError::Blocked { url, .. }
            | NavigationError::Snapshot { url, .. } => Some(url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = NavigationError::Navigate {
            url: "https://www.amazon.com.br/bestsellers".to_string(),
            reason: "Request failed with status: 404".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("bestsellers"));
        assert!(msg.contains("404"));

        let err = NavigationError::NotReady {
            url: "https://www.amazon.com.br/dp/B01".to_string(),
            selector: "#dp".to_string(),
            reason: "selector not found".to_string(),
        };
        assert!(err.to_string().contains("'#dp'"));
    }

    #[test]
    fn test_url_accessor() {
        let err = NavigationError::PageContext { reason: "browser closed".to_string() };
        assert!(err.url().is_none());

        let err = NavigationError::Blocked { url: "https://x.test".to_string(), reason: "CAPTCHA" };
        assert_eq!(err.url(), Some("https://x.test"));
    }

    #[test]
    fn test_converts_into_anyhow() {
        let err: anyhow::Error =
            NavigationError::Snapshot { url: "u".to_string(), reason: "r".to_string() }.into();
        assert!(err.downcast_ref::<NavigationError>().is_some());
    }
}
