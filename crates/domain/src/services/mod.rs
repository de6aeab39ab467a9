//! Domain services.
//!
//! The registration workflow and the seams it depends on: keyed stores,
//! password hashing and user event delivery.

pub mod events;
pub mod hashing;
pub mod memory;
pub mod registration;
pub mod stores;

pub use events::{
    MockUserEventNotifier, NotifyResult, TracingUserEventNotifier, UserCreatedEvent,
    UserEventNotifier,
};
pub use hashing::{Argon2PasswordHasher, PasswordHasher};
pub use memory::{InMemoryGroupStore, InMemoryInviteTokenStore, InMemoryUserStore};
pub use registration::{RegistrationError, RegistrationService};
pub use stores::{GroupStore, InviteTokenStore, StoreError, UniqueField, UserStore};
