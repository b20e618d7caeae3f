//! Interactive credential prompting.

use std::io::{self, BufRead, Write};

/// Source of credentials the client asks for when none were configured.
///
/// The client only calls a method for a value it is missing.
pub trait CredentialPrompt: Send + Sync {
    /// Ask for the account username (email).
    fn username(&self) -> io::Result<String>;

    /// Ask for the account password.
    fn password(&self) -> io::Result<String>;
}

/// Prompts on the controlling terminal.
///
/// The username is read as a line from stdin, the password without echo.
#[derive(Debug, Clone, Default)]
pub struct TerminalPrompt;

impl CredentialPrompt for TerminalPrompt {
    fn username(&self) -> io::Result<String> {
        let mut stderr = io::stderr();
        write!(stderr, "Username: ")?;
        stderr.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    fn password(&self) -> io::Result<String> {
        rpassword::prompt_password("Password: ")
    }
}
