//! Resolves who to log in as and which book to borrow.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use book_ripper::session::Credentials;

use super::config::FileConfig;
use super::prompt::LinePrompter;

/// CLI flag, then config file, then an interactive prompt.
pub(crate) fn resolve_credentials<R: BufRead, W: Write>(
    username: Option<&str>,
    password: Option<&str>,
    config: &FileConfig,
    prompter: &mut LinePrompter<R, W>,
) -> Result<Credentials> {
    let identity = match username.or(config.email.as_deref()) {
        Some(identity) => identity.to_string(),
        None => prompter
            .ask_required("Email: ")
            .context("Failed to read email")?,
    };
    let secret = match password.or(config.password.as_deref()) {
        Some(secret) => secret.to_string(),
        None => prompter
            .ask_required("Password: ")
            .context("Failed to read password")?,
    };
    Ok(Credentials::new(identity, secret))
}

/// Positional argument, else ask.
pub(crate) fn resolve_book_id<R: BufRead, W: Write>(
    id: Option<&str>,
    prompter: &mut LinePrompter<R, W>,
) -> Result<String> {
    match id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => Ok(id.to_string()),
        None => prompter
            .ask_required("Book id: ")
            .context("Failed to read book id"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> LinePrompter<Cursor<Vec<u8>>, Vec<u8>> {
        LinePrompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn config(email: Option<&str>, password: Option<&str>) -> FileConfig {
        FileConfig {
            email: email.map(str::to_string),
            password: password.map(str::to_string),
            ..FileConfig::default()
        }
    }

    #[test]
    fn test_cli_credentials_win_over_config() {
        let mut p = prompter("");
        let creds = resolve_credentials(
            Some("cli@example.com"),
            Some("cli-pw"),
            &config(Some("cfg@example.com"), Some("cfg-pw")),
            &mut p,
        )
        .unwrap();
        assert_eq!(creds, Credentials::new("cli@example.com", "cli-pw"));
    }

    #[test]
    fn test_config_fills_missing_cli_values() {
        let mut p = prompter("");
        let creds = resolve_credentials(
            Some("cli@example.com"),
            None,
            &config(Some("cfg@example.com"), Some("cfg-pw")),
            &mut p,
        )
        .unwrap();
        assert_eq!(creds, Credentials::new("cli@example.com", "cfg-pw"));
    }

    #[test]
    fn test_prompts_for_whatever_is_left() {
        let mut p = prompter("typed@example.com\ntyped-pw\n");
        let creds = resolve_credentials(None, None, &FileConfig::default(), &mut p).unwrap();
        assert_eq!(creds, Credentials::new("typed@example.com", "typed-pw"));

        let shown = String::from_utf8(p.output).unwrap();
        assert!(shown.contains("Email: ") && shown.contains("Password: "));
    }

    #[test]
    fn test_missing_credentials_without_input_is_error() {
        let mut p = prompter("");
        let err = resolve_credentials(None, None, &FileConfig::default(), &mut p).unwrap_err();
        assert!(err.to_string().contains("email"), "got: {err}");
    }

    #[test]
    fn test_book_id_from_argument_or_prompt() {
        let mut p = prompter("");
        assert_eq!(resolve_book_id(Some(" someBook00 "), &mut p).unwrap(), "someBook00");

        let mut p = prompter("\nprompted00\n");
        assert_eq!(resolve_book_id(None, &mut p).unwrap(), "prompted00");
    }
}
