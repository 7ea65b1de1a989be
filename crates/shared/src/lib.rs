//! Wire types shared by the posts client and the development collection server.

pub mod domain;
pub mod error;
