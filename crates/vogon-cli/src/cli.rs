use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "vogon",
    about = "Vogon -- a resource store with optimistic concurrency",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Apiserver(ApiserverArgs),
    /// Print client and server versions
    Version,
    /// Get an object from the API
    Get(GetArgs),
    /// Create/replace/update an object from JSON on stdin
    Apply(ApplyArgs),
    /// Delete an object
    Delete(DeleteArgs),
}

#[derive(Args)]
pub struct ApiserverArgs {
    /// Path to the TOML configuration file
    pub config: PathBuf,
}

#[derive(Args)]
pub struct GetArgs {
    pub name: String,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// Only create; ignore the input's id and revision
    #[arg(long, conflicts_with_all = ["force_overwrite", "no_create"])]
    pub if_not_exists: bool,
    /// Replace whatever is stored; ignore the input's id and revision
    #[arg(long)]
    pub force_overwrite: bool,
    /// Only replace an existing object
    #[arg(long)]
    pub no_create: bool,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub name: String,
    /// Only delete if the stored object has this id
    #[arg(long)]
    pub id: Option<String>,
    /// Only delete if the stored object has this revision (requires --id)
    #[arg(long, requires = "id")]
    pub revision: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_apiserver() {
        let cli = Cli::try_parse_from(["vogon", "apiserver", "vogon.toml"]).unwrap();
        if let Command::Apiserver(args) = cli.command {
            assert_eq!(args.config, PathBuf::from("vogon.toml"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn apiserver_requires_config() {
        assert!(Cli::try_parse_from(["vogon", "apiserver"]).is_err());
    }

    #[test]
    fn parse_version() {
        let cli = Cli::try_parse_from(["vogon", "version"]).unwrap();
        assert!(matches!(cli.command, Command::Version));
    }

    #[test]
    fn parse_get() {
        let cli = Cli::try_parse_from(["vogon", "get", "team/one"]).unwrap();
        if let Command::Get(args) = cli.command {
            assert_eq!(args.name, "team/one");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_apply_flags() {
        let cli = Cli::try_parse_from(["vogon", "apply", "--force-overwrite", "--no-create"]).unwrap();
        if let Command::Apply(args) = cli.command {
            assert!(!args.if_not_exists);
            assert!(args.force_overwrite);
            assert!(args.no_create);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn apply_if_not_exists_is_exclusive() {
        assert!(Cli::try_parse_from(["vogon", "apply", "--if-not-exists"]).is_ok());
        assert!(Cli::try_parse_from(["vogon", "apply", "--if-not-exists", "--no-create"]).is_err());
        assert!(Cli::try_parse_from(["vogon", "apply", "--if-not-exists", "--force-overwrite"]).is_err());
    }

    #[test]
    fn parse_delete() {
        let cli = Cli::try_parse_from(["vogon", "delete", "one", "--id", "abc", "--revision", "def"]).unwrap();
        if let Command::Delete(args) = cli.command {
            assert_eq!(args.name, "one");
            assert_eq!(args.id.as_deref(), Some("abc"));
            assert_eq!(args.revision.as_deref(), Some("def"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn delete_revision_requires_id() {
        assert!(Cli::try_parse_from(["vogon", "delete", "one", "--revision", "def"]).is_err());
    }

    #[test]
    fn unknown_command_fails() {
        assert!(Cli::try_parse_from(["vogon", "frobnicate"]).is_err());
    }
}
