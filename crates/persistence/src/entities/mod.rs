//! Database entity definitions.

pub mod group;
pub mod invite_token;
pub mod user;

pub use group::{GroupEntity, GroupRowEntity};
pub use invite_token::InviteTokenEntity;
pub use user::UserEntity;
