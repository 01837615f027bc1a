//! Command-line surface for `postboard-cli`.

#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "postboard-cli", version, about = "Postboard backend CLI", long_about = None)]
pub struct Cli {
    /// Posts backend base URL, e.g. <http://127.0.0.1:3000>
    #[arg(long, env = "POSTBOARD_BACKEND_URL")]
    pub backend: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Post management (list/create/update/delete)
    Posts(PostsArgs),
}

#[derive(Parser, Debug)]
pub struct PostsArgs {
    #[command(subcommand)]
    pub action: PostsCmd,
}

#[derive(Subcommand, Debug)]
pub enum PostsCmd {
    /// List posts, optionally filtered by a title substring
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Create a post
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, conflicts_with = "body_file")]
        body: Option<String>,
        #[arg(long)]
        body_file: Option<PathBuf>,
    },
    /// Replace the title and body of an existing post
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        title: String,
        #[arg(long, conflicts_with = "body_file")]
        body: Option<String>,
        #[arg(long)]
        body_file: Option<PathBuf>,
    },
    /// Delete a post
    Delete {
        #[arg(long)]
        id: i64,
    },
}
