use std::sync::Arc;

use shared::{
    domain::{NewPost, Post, PostId},
    error::{ApiError, ErrorCode},
};
use tokio::sync::RwLock;

/// In-memory collection, kept in insertion order.
#[derive(Clone, Default)]
pub struct PostStore {
    inner: Arc<RwLock<StoreState>>,
}

#[derive(Default)]
struct StoreState {
    posts: Vec<Post>,
    last_id: i64,
}

impl PostStore {
    pub fn seeded(count: usize) -> Self {
        let posts: Vec<Post> = (1..=count as i64)
            .map(|n| Post {
                id: PostId(n),
                title: format!("post {n}"),
                body: format!("placeholder body {n}"),
            })
            .collect();
        Self {
            inner: Arc::new(RwLock::new(StoreState {
                last_id: posts.len() as i64,
                posts,
            })),
        }
    }

    pub async fn list(&self) -> Vec<Post> {
        self.inner.read().await.posts.clone()
    }

    pub async fn create(&self, new_post: NewPost) -> Post {
        let mut state = self.inner.write().await;
        state.last_id += 1;
        let post = Post {
            id: PostId(state.last_id),
            title: new_post.title,
            body: new_post.body,
        };
        state.posts.push(post.clone());
        post
    }

    /// The id in the path wins over any id in the body.
    pub async fn replace(&self, id: PostId, title: String, body: String) -> Result<Post, ApiError> {
        let mut state = self.inner.write().await;
        let slot = state
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ApiError::new(ErrorCode::NotFound, format!("post {id} not found")))?;
        *slot = Post { id, title, body };
        Ok(slot.clone())
    }

    pub async fn delete(&self, id: PostId) -> Result<(), ApiError> {
        let mut state = self.inner.write().await;
        let before = state.posts.len();
        state.posts.retain(|p| p.id != id);
        if state.posts.len() == before {
            return Err(ApiError::new(
                ErrorCode::Validation,
                format!("post {id} has already been deleted"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
