//! User management commands.

use crate::cli::{UserAddArgs, UserCommands};
use crate::config::CliOverrides;
use crate::error::{Result, SpindleError};

/// Execute a user subcommand.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or the operation fails.
pub fn execute(command: &UserCommands, json: bool, cli: &CliOverrides) -> Result<()> {
    match command {
        UserCommands::Add(args) => add(args, json, cli),
        UserCommands::Show { username } => show(username, json, cli),
    }
}

fn add(args: &UserAddArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let (mut store, _actor) = super::open_workspace(cli)?;
    let principal = store.create_principal(
        &args.username,
        args.name.as_deref().unwrap_or(""),
        args.email.as_deref().unwrap_or(""),
    )?;

    if json {
        super::print_json(&principal)
    } else {
        println!("Registered user {}", principal.username);
        Ok(())
    }
}

fn show(username: &str, json: bool, cli: &CliOverrides) -> Result<()> {
    let (store, _actor) = super::open_workspace(cli)?;
    let principal =
        store
            .get_principal(username)?
            .ok_or_else(|| SpindleError::PrincipalNotFound {
                username: username.to_string(),
            })?;

    if json {
        super::print_json(&principal)
    } else {
        println!("{}", principal.username);
        if !principal.display_name.is_empty() {
            println!("  name:  {}", principal.display_name);
        }
        if !principal.email.is_empty() {
            println!("  email: {}", principal.email);
        }
        println!("  since: {}", principal.created_at.format("%Y-%m-%d"));
        Ok(())
    }
}
