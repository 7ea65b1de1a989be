use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::PostListController;
use shared::domain::{PostEdit, PostId};
use tracing_subscriber::EnvFilter;

mod config;
mod view;

use config::load_settings;
use view::{render_table, run_action, Action, StderrNotifier};

#[derive(Parser, Debug)]
#[command(about = "Manage posts of a remote REST collection")]
struct Args {
    /// Collection endpoint, e.g. http://127.0.0.1:3000/posts
    #[arg(long)]
    endpoint: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the collection.
    List,
    /// Create a post and prepend it to the list.
    Add {
        #[arg(long, default_value = view::PLACEHOLDER_TITLE)]
        title: String,
        #[arg(long, default_value = view::PLACEHOLDER_BODY)]
        body: String,
    },
    /// Replace a loaded post.
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long, default_value = view::UPDATED_TITLE)]
        title: String,
        #[arg(long)]
        body: Option<String>,
    },
    /// Remove a post; the list is restored if the remote refuses.
    Delete {
        #[arg(long)]
        id: i64,
    },
}

impl From<Command> for Action {
    fn from(command: Command) -> Self {
        match command {
            Command::List => Action::List,
            Command::Add { title, body } => Action::Add { title, body },
            Command::Update { id, title, body } => Action::Update {
                id: PostId(id),
                edit: PostEdit {
                    title: Some(title),
                    body,
                },
            },
            Command::Delete { id } => Action::Delete { id: PostId(id) },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = load_settings();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let endpoint = args.endpoint.unwrap_or(settings.api_endpoint);
    let controller = PostListController::connect(&endpoint, Arc::new(StderrNotifier))
        .context("failed to configure posts client")?;

    controller
        .load()
        .await
        .with_context(|| format!("failed to load posts from {endpoint}"))?;

    let action = args.command.map(Action::from).unwrap_or(Action::List);
    let outcome = run_action(&controller, action).await;

    print!("{}", render_table(&controller.posts().await));
    outcome
}
