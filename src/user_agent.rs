//! Shared User-Agent string for lending service traffic.
//!
//! The lending service serves its reader to browsers, so requests present a
//! browser User-Agent with the tool name and version appended.

/// Browser User-Agent base.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Default User-Agent for every request made by a loan session.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("{BROWSER_USER_AGENT} book-ripper/{version}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_is_browser_like_and_versioned() {
        let ua = default_user_agent();
        assert!(ua.starts_with("Mozilla/5.0"), "got: {ua}");
        assert!(
            ua.ends_with(&format!("book-ripper/{}", env!("CARGO_PKG_VERSION"))),
            "got: {ua}"
        );
    }
}
