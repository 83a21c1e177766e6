//! quill CLI - minimal content-addressed version control

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use quill::ops::{add, commit, diff_commits, log, ls_tree, status};
use quill::{read_object, resolve_rev, AddOutcome, Error, Hash, IoResultExt, Repo, UserConfig};

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "minimal content-addressed version control")]
#[command(version)]
struct Cli {
    /// where to start looking for the repository
    #[arg(short, long, default_value = ".", global = true)]
    repo: PathBuf,

    /// log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// initialize a new repository
    Init {
        /// author name
        #[arg(long, env = "QUILL_AUTHOR_NAME")]
        name: String,

        /// author email
        #[arg(long, env = "QUILL_AUTHOR_EMAIL")]
        email: String,

        /// working tree root to create the repository in
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// stage files or directories
    Add {
        /// paths to stage, relative to the current directory
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// record staged changes
    Commit {
        /// commit message
        #[arg(short, long)]
        message: String,
    },

    /// show commit history from HEAD
    Log {
        /// maximum number of commits to show
        #[arg(short = 'n', long)]
        max_count: Option<usize>,
    },

    /// show changes a commit introduced
    Diff {
        /// commit (HEAD or full hash)
        commit: String,

        /// commit to compare against (defaults to its parent)
        parent: Option<String>,
    },

    /// show HEAD and the staging area
    Status,

    /// list files recorded in a commit
    LsTree {
        /// commit (HEAD or full hash)
        #[arg(default_value = "HEAD")]
        rev: String,
    },

    /// write raw object content to stdout
    CatFile {
        /// object hash
        hash: String,
    },

    /// resolve a revision to a commit hash
    RevParse {
        /// revision (HEAD or full hash)
        rev: String,

        /// output short hash (first 8 chars)
        #[arg(long)]
        short: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("QUILL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> quill::Result<()> {
    match cli.command {
        Commands::Init { name, email, path } => {
            let user = UserConfig::new(name, email)?;
            let repo = Repo::init(&path, &user)?;
            println!("Initialized empty Quill repository in {}", repo.root().display());
        }

        Commands::Add { paths } => {
            let repo = Repo::discover(&cli.repo)?;

            // arguments are relative to where the user is, not the repository root
            let cwd = std::env::current_dir()
                .and_then(|d| d.canonicalize())
                .with_read_path(".")?;
            let paths: Vec<PathBuf> = paths.iter().map(|p| cwd.join(p)).collect();

            let outcomes = add(&repo, &paths)?;
            for outcome in &outcomes {
                println!("{}", outcome);
            }
            if outcomes.iter().any(|o| matches!(o, AddOutcome::Staged(_))) {
                println!("Files have been added to the staging area.");
            }
        }

        Commands::Commit { message } => {
            let repo = Repo::discover(&cli.repo)?;
            match commit(&repo, &message) {
                Ok(hash) => println!("Created commit {}: {}", hash.short(), message),
                Err(Error::NothingStaged) => println!("nothing to commit, no files staged"),
                Err(e) => return Err(e),
            }
        }

        Commands::Log { max_count } => {
            let repo = Repo::discover(&cli.repo)?;
            let entries = log(&repo, max_count)?;

            if entries.is_empty() {
                println!("No commits yet.");
            }
            for entry in entries {
                print!("{}", entry);
            }
        }

        Commands::Diff { commit, parent } => {
            let repo = Repo::discover(&cli.repo)?;
            let child = resolve_rev(&repo, &commit)?;
            let parent = parent.map(|p| resolve_rev(&repo, &p)).transpose()?;

            for change in diff_commits(&repo, &child, parent.as_ref())? {
                println!("{}", change);
            }
        }

        Commands::Status => {
            let repo = Repo::discover(&cli.repo)?;
            print!("{}", status(&repo)?);
        }

        Commands::LsTree { rev } => {
            let repo = Repo::discover(&cli.repo)?;
            for entry in ls_tree(&repo, &rev)? {
                println!("{}", entry);
            }
        }

        Commands::CatFile { hash } => {
            let repo = Repo::discover(&cli.repo)?;
            let hash = Hash::from_hex(&hash)?;
            let content = read_object(&repo, &hash)?;

            io::stdout()
                .write_all(&content)
                .with_write_path("<stdout>")?;
        }

        Commands::RevParse { rev, short } => {
            let repo = Repo::discover(&cli.repo)?;
            let hash = resolve_rev(&repo, &rev)?;

            if short {
                println!("{}", hash.short());
            } else {
                println!("{}", hash);
            }
        }
    }

    Ok(())
}
