//! Navigation for a terminal host.
//!
//! There are no pages to move between in a terminal, so a redirect to the
//! login entry point becomes a hint to run `roadwatch login`.

use roadwatch_gateway::Navigator;

/// Prints navigation requests to stderr.
#[derive(Debug, Default)]
pub struct TerminalNavigator;

impl TerminalNavigator {
    /// Text shown when the gateway sends the user to `target`.
    pub fn redirect_notice(target: &str) -> String {
        format!("Session ended ({target}). Run `roadwatch login` to sign in again.")
    }
}

impl Navigator for TerminalNavigator {
    fn redirect(&self, target: &str) {
        eprintln!("{}", Self::redirect_notice(target));
    }

    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }
}
