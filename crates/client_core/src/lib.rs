use std::sync::Arc;

use shared::domain::{NewPost, Post, PostId};
use tokio::sync::{broadcast, RwLock};
use tracing::{info, warn};

pub mod error;
pub mod interceptor;
pub mod remote;

pub use error::{ErrorClass, RemoteError};
pub use interceptor::{ErrorInterceptor, Notice, Notifier};
pub use remote::{HttpPostsRemote, PostsRemote, DEFAULT_COLLECTION_ENDPOINT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    PostsChanged(Vec<Post>),
}

/// Owns the local, ordered post collection and keeps it in step with the
/// remote one.
///
/// Add and update wait for the remote to confirm before touching local state.
/// Delete is optimistic: the post disappears first and comes back if the
/// remote call fails.
pub struct PostListController {
    remote: Arc<dyn PostsRemote>,
    notifier: Arc<dyn Notifier>,
    posts: RwLock<Vec<Post>>,
    events: broadcast::Sender<ControllerEvent>,
}

impl PostListController {
    pub fn new(remote: Arc<dyn PostsRemote>, notifier: Arc<dyn Notifier>) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            remote,
            notifier,
            posts: RwLock::new(Vec::new()),
            events,
        })
    }

    /// Builds the HTTP remote with the interceptor installed and a controller
    /// on top of it, sharing one notifier.
    pub fn connect(endpoint: &str, notifier: Arc<dyn Notifier>) -> Result<Arc<Self>, RemoteError> {
        let interceptor = ErrorInterceptor::new(Arc::clone(&notifier));
        let remote = HttpPostsRemote::new(endpoint, interceptor)?;
        Ok(Self::new(Arc::new(remote), notifier))
    }

    pub async fn posts(&self) -> Vec<Post> {
        self.posts.read().await.clone()
    }

    pub async fn find(&self, id: PostId) -> Option<Post> {
        self.posts.read().await.iter().find(|p| p.id == id).cloned()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub async fn load(&self) -> Result<Vec<Post>, RemoteError> {
        let fetched = dedupe_by_id(self.remote.list().await?);
        info!(count = fetched.len(), "loaded posts");
        self.replace_all(fetched.clone()).await;
        Ok(fetched)
    }

    pub async fn add(
        &self,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Post, RemoteError> {
        let new_post = NewPost::new(title, body);
        let created = self.remote.create(&new_post).await?;
        info!(post_id = %created.id, "created post");

        let snapshot = {
            let mut posts = self.posts.write().await;
            posts.retain(|p| p.id != created.id);
            posts.insert(0, created.clone());
            posts.clone()
        };
        self.publish(snapshot);
        Ok(created)
    }

    /// Sends `updated` as a full replace of the post with the same id. On
    /// success the local entry becomes a copy of what was sent.
    pub async fn update(&self, updated: Post) -> Result<Post, RemoteError> {
        self.remote.replace(&updated).await?;
        info!(post_id = %updated.id, "updated post");

        let snapshot = {
            let mut posts = self.posts.write().await;
            match posts.iter_mut().find(|p| p.id == updated.id) {
                Some(slot) => *slot = updated.clone(),
                None => {
                    warn!(post_id = %updated.id, "updated post is no longer listed locally");
                    return Ok(updated);
                }
            }
            posts.clone()
        };
        self.publish(snapshot);
        Ok(updated)
    }

    pub async fn delete(&self, post: &Post) -> Result<(), RemoteError> {
        let (original, filtered) = {
            let mut posts = self.posts.write().await;
            let original = posts.clone();
            posts.retain(|p| p.id != post.id);
            (original, posts.clone())
        };
        self.publish(filtered);

        match self.remote.delete(post.id).await {
            Ok(()) => {
                info!(post_id = %post.id, "deleted post");
                Ok(())
            }
            Err(err) => {
                if err.is_already_deleted() {
                    self.notifier.notify(Notice::AlreadyDeleted);
                }
                warn!(post_id = %post.id, error = %err, "delete failed; restoring posts");
                self.replace_all(original).await;
                Err(err)
            }
        }
    }

    async fn replace_all(&self, next: Vec<Post>) {
        {
            let mut posts = self.posts.write().await;
            *posts = next.clone();
        }
        self.publish(next);
    }

    fn publish(&self, snapshot: Vec<Post>) {
        let _ = self.events.send(ControllerEvent::PostsChanged(snapshot));
    }
}

/// Keeps the first occurrence of each id.
fn dedupe_by_id(posts: Vec<Post>) -> Vec<Post> {
    let mut seen = std::collections::HashSet::new();
    posts.into_iter().filter(|p| seen.insert(p.id)).collect()
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
