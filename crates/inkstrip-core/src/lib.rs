//! Domain types shared by the storage and web layers of inkstrip.

pub mod date;
pub mod error;
pub mod id;
mod macros;
pub mod nav;
pub mod password;
pub mod post;
pub mod site;
pub mod user_agent;

pub use date::PostDate;
pub use id::{PostId, UserId};
pub use nav::PostNav;
pub use post::{Post, PostRecord};
pub use user_agent::ViewerKind;
