use std::path::PathBuf;

use clap::Parser;

use crate::Commands;

/// Main CLI application arguments and command structure
#[derive(Parser)]
#[clap(
    name = "anotherpad",
    version,
    about = "Notes and folders kept in a local key-value store"
)]
pub struct Cli {
    /// Path to the configuration file
    #[clap(short = 'c', long, value_parser)]
    pub config: Option<PathBuf>,

    /// Directory holding the stored notes, folders and filters
    #[clap(long, value_parser)]
    pub data_dir: Option<PathBuf>,

    /// Verbose output mode
    #[clap(short, long)]
    pub verbose: bool,

    /// Subcommands for the anotherpad application
    #[clap(subcommand)]
    pub command: Commands,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;
    use crate::{FolderCommands, SortBy};

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_list_overrides() {
        let cli = Cli::try_parse_from([
            "anotherpad",
            "--data-dir",
            "/tmp/pad",
            "list",
            "--search",
            "meeting",
            "--sort-by",
            "created-at",
            "--pinned",
        ])
        .unwrap();

        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/pad")));
        match cli.command {
            Commands::List {
                search,
                sort_by,
                pinned,
                ..
            } => {
                assert_eq!(search.as_deref(), Some("meeting"));
                assert_eq!(sort_by, Some(SortBy::CreatedAt));
                assert!(pinned);
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn parses_folder_subcommands() {
        let cli =
            Cli::try_parse_from(["anotherpad", "folder", "create", "Work", "-c", "#fff"]).unwrap();
        match cli.command {
            Commands::Folder(FolderCommands::Create { name, color }) => {
                assert_eq!(name, "Work");
                assert_eq!(color.as_deref(), Some("#fff"));
            }
            _ => panic!("expected folder create"),
        }
    }

    #[test]
    fn folder_and_all_folders_conflict() {
        let result = Cli::try_parse_from(["anotherpad", "list", "--folder", "f1", "--all-folders"]);
        assert!(result.is_err());
    }
}
