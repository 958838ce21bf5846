use std::io::Read;

use anyhow::{bail, Context};
use colored::Colorize;
use vogon_sdk::{Client, MetadataResponse, Object, WriteMode};
use vogon_server::{ApiServer, ServerConfig};
use vogon_types::name_and_version;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Apiserver(args) => cmd_apiserver(args).await,
        Command::Version => cmd_version().await,
        Command::Get(args) => cmd_get(args).await,
        Command::Apply(args) => cmd_apply(args).await,
        Command::Delete(args) => cmd_delete(args).await,
    }
}

async fn cmd_apiserver(args: ApiserverArgs) -> anyhow::Result<()> {
    let config = ServerConfig::load(&args.config)?;
    tracing::debug!(?config, "loaded configuration");
    ApiServer::new(config)?.serve().await?;
    Ok(())
}

async fn cmd_version() -> anyhow::Result<()> {
    println!("Client: {}", name_and_version());
    let client = connect().await?;
    println!("Server: {}", client.version().await?);
    Ok(())
}

async fn cmd_get(args: GetArgs) -> anyhow::Result<()> {
    let client = connect().await?;
    let object = client.get_object(&args.name).await?;
    println!("{}", serde_json::to_string_pretty(&object)?);
    Ok(())
}

async fn cmd_apply(args: ApplyArgs) -> anyhow::Result<()> {
    let (mode, strip_tokens) = apply_plan(&args);

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("error reading input")?;
    let mut object: Object = serde_json::from_str(&input).context("error reading input")?;

    let problems = object_problems(&object);
    if !problems.is_empty() {
        for problem in &problems {
            eprintln!("{}", problem.red());
        }
        bail!("object is not valid");
    }

    if strip_tokens {
        object.metadata.id.clear();
        object.metadata.revision.clear();
    }

    let client = connect().await?;
    let meta = client.write_object(&object, mode).await?;
    print_applied("Applied", object.name(), &meta);
    Ok(())
}

async fn cmd_delete(args: DeleteArgs) -> anyhow::Result<()> {
    let client = connect().await?;
    let meta = client
        .delete_object(
            &args.name,
            args.id.as_deref().unwrap_or_default(),
            args.revision.as_deref().unwrap_or_default(),
        )
        .await?;
    print_applied("Deleted", &args.name, &meta);
    Ok(())
}

async fn connect() -> anyhow::Result<Client> {
    Client::from_env().await.context("cannot connect to server")
}

fn print_applied(action: &str, name: &str, meta: &MetadataResponse) {
    println!("{} {} {}", "✓".green().bold(), action, name.bold());
    println!("  id: {}", meta.id.yellow());
    println!("  revision: {}", meta.revision.yellow());
}

/// Write mode for `apply`, and whether the input's id/revision are dropped.
fn apply_plan(args: &ApplyArgs) -> (WriteMode, bool) {
    if args.if_not_exists {
        return (WriteMode::Create, true);
    }
    let mode = if args.no_create {
        WriteMode::Replace
    } else {
        WriteMode::CreateOrReplace
    };
    (mode, args.force_overwrite)
}

fn object_problems(object: &Object) -> Vec<&'static str> {
    let mut problems = Vec::new();
    if object.kind.is_empty() {
        problems.push("Missing kind");
    }
    if object.metadata.name.is_empty() {
        problems.push("Missing name");
    }
    problems
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply_args(if_not_exists: bool, force_overwrite: bool, no_create: bool) -> ApplyArgs {
        ApplyArgs { if_not_exists, force_overwrite, no_create }
    }

    #[test]
    fn apply_modes() {
        assert_eq!(apply_plan(&apply_args(false, false, false)), (WriteMode::CreateOrReplace, false));
        assert_eq!(apply_plan(&apply_args(true, false, false)), (WriteMode::Create, true));
        assert_eq!(apply_plan(&apply_args(false, true, false)), (WriteMode::CreateOrReplace, true));
        assert_eq!(apply_plan(&apply_args(false, false, true)), (WriteMode::Replace, false));
        assert_eq!(apply_plan(&apply_args(false, true, true)), (WriteMode::Replace, true));
    }

    #[test]
    fn object_must_have_kind_and_name() {
        assert_eq!(object_problems(&Object::default()), vec!["Missing kind", "Missing name"]);
        let ok = Object::new("example.org/Example", "v1", "one");
        assert!(object_problems(&ok).is_empty());
    }
}
