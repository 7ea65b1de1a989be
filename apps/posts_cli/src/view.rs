//! Terminal presentation: the post table, user notices and the three
//! list actions.

use anyhow::{anyhow, Result};
use client_core::{Notice, Notifier, PostListController};
use shared::domain::{Post, PostEdit, PostId};

pub const PLACEHOLDER_TITLE: &str = "a";
pub const PLACEHOLDER_BODY: &str = "b";
pub const UPDATED_TITLE: &str = "UPDATED";

/// Shows notices on stderr.
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, notice: Notice) {
        eprintln!("alert: {}", notice.message());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    List,
    Add { title: String, body: String },
    Update { id: PostId, edit: PostEdit },
    Delete { id: PostId },
}

pub async fn run_action(controller: &PostListController, action: Action) -> Result<()> {
    match action {
        Action::List => {}
        Action::Add { title, body } => {
            let created = controller.add(title, body).await?;
            println!("added post {}", created.id);
        }
        Action::Update { id, edit } => {
            let current = controller
                .find(id)
                .await
                .ok_or_else(|| anyhow!("post {id} is not in the loaded list"))?;
            controller.update(current.edited(&edit)).await?;
            println!("updated post {id}");
        }
        Action::Delete { id } => {
            // A post that is not listed still goes through delete; the local
            // filter is then a no-op.
            let target = controller.find(id).await.unwrap_or(Post {
                id,
                title: String::new(),
                body: String::new(),
            });
            controller.delete(&target).await?;
            println!("deleted post {id}");
        }
    }
    Ok(())
}

pub fn render_table(posts: &[Post]) -> String {
    let id_width = posts
        .iter()
        .map(|p| p.id.to_string().len())
        .max()
        .unwrap_or(0)
        .max("Id".len());

    let mut out = format!("{:<id_width$} | Title\n", "Id");
    out.push_str(&format!("{}-+-{}\n", "-".repeat(id_width), "-".repeat(5)));
    for post in posts {
        out.push_str(&format!("{:<id_width$} | {}\n", post.id.to_string(), post.title));
    }
    out
}
