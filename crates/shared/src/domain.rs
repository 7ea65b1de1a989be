use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(PostId);

/// A record of the remote collection. Fields the remote adds beyond these
/// (for example `userId`) are dropped on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub body: String,
}

impl Post {
    /// Returns a new value with the edit applied; `self` is left untouched.
    pub fn edited(&self, edit: &PostEdit) -> Post {
        Post {
            id: self.id,
            title: edit.title.clone().unwrap_or_else(|| self.title.clone()),
            body: edit.body.clone().unwrap_or_else(|| self.body.clone()),
        }
    }
}

/// Create payload. The remote assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub body: String,
}

impl NewPost {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostEdit {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl PostEdit {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            body: None,
        }
    }
}
