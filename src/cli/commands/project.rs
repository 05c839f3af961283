//! Project and membership commands.

use crate::cli::{ProjectCommands, ProjectCreateArgs};
use crate::config::CliOverrides;
use crate::error::Result;

/// Execute a project subcommand.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or the operation fails.
pub fn execute(command: &ProjectCommands, json: bool, cli: &CliOverrides) -> Result<()> {
    match command {
        ProjectCommands::Create(args) => create(args, json, cli),
        ProjectCommands::Show { key } => show(key, json, cli),
        ProjectCommands::AddMember { key, username } => add_member(key, username, cli),
        ProjectCommands::Delete { key } => delete(key, cli),
    }
}

fn create(args: &ProjectCreateArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let (mut store, actor) = super::open_workspace(cli)?;
    let project = store.create_project(
        &args.name,
        &args.key.to_uppercase(),
        args.description.as_deref().unwrap_or(""),
        &actor,
    )?;

    if json {
        super::print_json(&project)
    } else {
        println!("Created project {} ({})", project.key, project.name);
        Ok(())
    }
}

fn show(key: &str, json: bool, cli: &CliOverrides) -> Result<()> {
    let (store, _actor) = super::open_workspace(cli)?;
    let project = super::require_project(&store, key)?;

    if json {
        super::print_json(&project)
    } else {
        println!("{} ({})", project.key, project.name);
        if !project.description.is_empty() {
            println!("  {}", project.description);
        }
        println!("  owner:   {}", project.owner);
        if !project.members.is_empty() {
            println!("  members: {}", project.members.join(", "));
        }
        Ok(())
    }
}

fn add_member(key: &str, username: &str, cli: &CliOverrides) -> Result<()> {
    let (mut store, actor) = super::open_workspace(cli)?;
    let project = super::require_project(&store, key)?;
    store.add_member(project.id, username, &actor)?;

    println!("Added {} to {}", username, project.key);
    Ok(())
}

fn delete(key: &str, cli: &CliOverrides) -> Result<()> {
    let (mut store, actor) = super::open_workspace(cli)?;
    let project = super::require_project(&store, key)?;
    store.delete_project(project.id, &actor)?;

    println!("Deleted project {}", project.key);
    Ok(())
}
