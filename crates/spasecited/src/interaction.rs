//! Console prompts and the tree-styled output prefixes.
//!
//! All interactive paths honor `--accept-defaults`: confirmations resolve to
//! their default answer and credential prompts fall back to the
//! `DATACITE_USERNAME`/`DATACITE_PASSWORD` environment variables, erroring
//! when those are unset rather than blocking on stdin.

use dialoguer::{Confirm, Input, Password};

use super::*;

/// Prefix for information messages.
pub static INFO_PREFIX: &str = "ℹ ";
/// Prefix for in-progress messages.
pub static WORKING_PREFIX: &str = "» ";
/// Prefix for success messages.
pub static SUCCESS_PREFIX: &str = "✓ ";
/// Prefix for error messages.
pub static ERROR_PREFIX: &str = "✗ ";
/// Prefix for warning messages.
pub static WARNING_PREFIX: &str = "! ";
/// Prefix for user prompts.
pub static PROMPT_PREFIX: &str = "❯ ";
/// Branch line for tree-styled detail output.
pub static TREE_BRANCH: &str = "├─";
/// Leaf line closing a tree-styled block.
pub static TREE_LEAF: &str = "└─";

/// Asks a yes/no question, returning the default when prompts are skipped.
pub fn confirm(cli: &Cli, message: &str, default: bool) -> Result<bool> {
  if cli.accept_defaults {
    return Ok(default);
  }
  Ok(
    Confirm::new()
      .with_prompt(format!("{PROMPT_PREFIX}{message}"))
      .default(default)
      .interact()?,
  )
}

/// Resolves DataCite credentials: environment variables first, then an
/// interactive prompt with a hidden password.
///
/// # Errors
///
/// Returns [`SpasecitedError::MissingCredentials`] when prompts are skipped
/// and the environment does not provide both variables.
pub fn credentials(cli: &Cli) -> Result<Credentials> {
  let username = std::env::var("DATACITE_USERNAME").ok();
  let password = std::env::var("DATACITE_PASSWORD").ok();
  if let (Some(username), Some(password)) = (username.clone(), password) {
    return Ok(Credentials { username, password });
  }
  if cli.accept_defaults {
    return Err(SpasecitedError::MissingCredentials);
  }

  let username = match username {
    Some(username) => username,
    None => Input::new()
      .with_prompt(format!("{PROMPT_PREFIX}DataCite repository account"))
      .interact_text()?,
  };
  let password =
    Password::new().with_prompt(format!("{PROMPT_PREFIX}DataCite password")).interact()?;
  Ok(Credentials { username, password })
}
