use azdo_harvest::downloader::DEFAULT_CONCURRENCY;
use azdo_harvest::search::DEFAULT_MAX_RESULTS;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Azure DevOps Harvester: search repositories and files in an Azure DevOps
/// organization and download the matching files.
#[derive(Debug, Parser)]
#[command(author, version, about, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search repository names and file contents.
    Search(SearchArgs),
    /// Search file contents and download every match.
    Download(DownloadArgs),
}

/// Where to search and how to authenticate.
#[derive(Debug, Args)]
pub struct Connection {
    /// Azure DevOps organization name.
    #[arg(short, long, env = "AZDO_ORG")]
    pub organization: String,

    /// Project to search; organization-wide when omitted.
    #[arg(short, long, env = "AZDO_PROJECT")]
    pub project: Option<String>,

    /// Personal Access Token.
    #[arg(long = "pat", visible_alias = "token", env = "AZDO_PAT", hide_env_values = true)]
    pub pat: String,

    /// Number of retries for transient HTTP failures.
    #[arg(long, default_value_t = 0)]
    pub retries: u32,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// The term to search for in repositories and files.
    pub term: String,

    #[command(flatten)]
    pub connection: Connection,

    /// Search only in file contents.
    #[arg(long, conflicts_with = "repo_only")]
    pub file_only: bool,

    /// Search only repository names.
    #[arg(long)]
    pub repo_only: bool,

    /// Maximum number of results per result kind.
    #[arg(short, long, default_value_t = DEFAULT_MAX_RESULTS)]
    pub limit: usize,

    /// Also write the results to this file as JSON.
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// The term to search for in file contents.
    #[arg(required_unless_present = "from")]
    pub term: Option<String>,

    #[command(flatten)]
    pub connection: Connection,

    /// Download the files of a previous `search --json` run instead of searching.
    #[arg(long, value_name = "FILE", conflicts_with = "term")]
    pub from: Option<PathBuf>,

    /// Maximum number of files to download.
    #[arg(short, long, default_value_t = DEFAULT_MAX_RESULTS)]
    pub limit: usize,

    /// Directory to write the files to.
    #[arg(long = "output", default_value = "downloads", value_name = "DIR")]
    pub output: PathBuf,

    /// Maximum number of concurrent downloads.
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Rewrite files that already exist with identical content.
    #[arg(long)]
    pub overwrite: bool,

    /// Hide the progress bars.
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from([
            "azdo-harvest",
            "search",
            "TODO",
            "-o",
            "myorg",
            "--token",
            "pat",
            "--file-only",
            "-l",
            "10",
        ])
        .unwrap();

        let Command::Search(args) = cli.command else {
            panic!("expected the search command");
        };
        assert_eq!(args.term, "TODO");
        assert_eq!(args.connection.organization, "myorg");
        assert_eq!(args.connection.pat, "pat");
        assert!(args.file_only);
        assert!(!args.repo_only);
        assert_eq!(args.limit, 10);
    }

    #[test]
    fn test_parse_download_defaults() {
        let cli = Cli::try_parse_from([
            "azdo-harvest",
            "download",
            "file:Dockerfile",
            "-o",
            "myorg",
            "-p",
            "proj",
            "--pat",
            "pat",
        ])
        .unwrap();

        let Command::Download(args) = cli.command else {
            panic!("expected the download command");
        };
        assert_eq!(args.term.as_deref(), Some("file:Dockerfile"));
        assert_eq!(args.connection.project.as_deref(), Some("proj"));
        assert_eq!(args.output, PathBuf::from("downloads"));
        assert_eq!(args.concurrency, DEFAULT_CONCURRENCY);
        assert!(!args.overwrite);
    }

    #[test]
    fn test_search_flags_conflict() {
        let result = Cli::try_parse_from([
            "azdo-harvest",
            "search",
            "x",
            "-o",
            "org",
            "--pat",
            "pat",
            "--file-only",
            "--repo-only",
        ]);
        assert!(result.is_err());
    }
}
