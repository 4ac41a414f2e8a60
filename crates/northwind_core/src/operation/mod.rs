//! Typed CRUD operations.
//!
//! Every operation resolves the entity's group from the registry on each
//! call, so a group re-registered between calls takes effect immediately.
//! Expected outcomes (nothing matched, a uniqueness clash) come back as a
//! failed [`crate::OperationResult`]; everything else is a
//! [`crate::CoreError`].

mod create;
mod delete;
mod read;
mod update;

pub use create::create;
pub use delete::{delete_by_id, delete_matching, delete_where};
pub use read::{find_all, read};
pub use update::{update, Update};
