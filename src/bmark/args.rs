use clap::{Parser, Subcommand};
use std::path::PathBuf;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    " ",
    env!("GIT_COMMIT_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "bmark")]
#[command(about = "Plain-text, pass-style bookmarks", long_about = None)]
#[command(version, long_version = LONG_VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the bookmark store (default: $BOOKMARKS_DIR or ~/.bookmarks.d)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new store
    Init {
        /// Initialize a git repo in the store
        #[arg(long)]
        git: bool,
    },

    /// Add a bookmark
    Add {
        url: String,

        /// Title
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Comma-separated tags
        #[arg(short, long)]
        tags: Option<String>,

        /// Notes / description
        #[arg(short, long)]
        description: Option<String>,

        /// Folder path like dev/rust
        #[arg(short, long)]
        path: Option<String>,

        /// Explicit slug (relative path ok)
        #[arg(long)]
        slug: Option<String>,

        /// Open $EDITOR with a prefilled template
        #[arg(long)]
        edit: bool,

        /// Overwrite if exists
        #[arg(short, long)]
        force: bool,
    },

    /// Show an entry
    Show {
        /// Stable ID or path/slug
        id: String,
    },

    /// Open an entry's URL in the browser
    Open {
        /// Stable ID or path/slug
        id: String,
    },

    /// List entries
    #[command(alias = "ls")]
    List {
        /// Filter by tag (folder segments count when folder_tags is on)
        #[arg(short, long)]
        tag: Option<String>,

        /// Filter by URL host ('www.' ignored)
        #[arg(long)]
        host: Option<String>,

        /// ISO date/time or YYYY-MM-DD (lower bound)
        #[arg(long)]
        since: Option<String>,

        /// Emit JSON array
        #[arg(long)]
        json: bool,

        /// Emit JSON Lines (NDJSON)
        #[arg(long)]
        jsonl: bool,
    },

    /// Full-text search over title/url/tags/body
    Search {
        query: String,

        /// Emit JSON array
        #[arg(long)]
        json: bool,

        /// Emit JSON Lines (NDJSON)
        #[arg(long)]
        jsonl: bool,
    },

    /// Edit an entry with $EDITOR / $VISUAL
    Edit {
        /// Stable ID or path/slug
        id: String,
    },

    /// Remove an entry
    Rm {
        /// Stable ID or path/slug
        id: String,
    },

    /// Rename/move an entry
    Mv {
        src: String,
        dst: String,

        #[arg(short, long)]
        force: bool,
    },

    /// List all discovered tags
    Tags,

    /// Mutate tags without opening an editor
    Tag {
        #[command(subcommand)]
        action: TagAction,
    },

    /// Export bookmarks
    Export {
        #[command(subcommand)]
        format: ExportCmd,
    },

    /// Import bookmarks
    Import {
        #[command(subcommand)]
        format: ImportCmd,
    },

    /// Find duplicate URLs and plan (or apply) merges
    Dedupe {
        /// Actually merge; without this only the plan is printed
        #[arg(long)]
        apply: bool,
    },

    /// git add/commit/push the store
    Sync {
        /// Commit message
        #[arg(short, long)]
        message: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TagAction {
    /// Add tags to an entry
    Add {
        id: String,
        #[arg(required = true, num_args = 1..)]
        tags: Vec<String>,
    },

    /// Remove tags from an entry
    Rm {
        id: String,
        #[arg(required = true, num_args = 1..)]
        tags: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ExportCmd {
    /// Netscape bookmarks HTML on stdout
    Netscape {
        /// Filter by URL host
        #[arg(long)]
        host: Option<String>,

        /// ISO date/time or YYYY-MM-DD lower bound
        #[arg(long)]
        since: Option<String>,
    },

    /// JSON array on stdout
    Json,
}

#[derive(Subcommand, Debug)]
pub enum ImportCmd {
    /// Import from Netscape bookmarks HTML
    Netscape {
        file: PathBuf,

        /// Overwrite entries whose URL already exists
        #[arg(short, long)]
        force: bool,
    },
}
