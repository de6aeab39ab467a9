//! Domain models for the registration service.

pub mod group;
pub mod invite_token;
pub mod registration;
pub mod user;

pub use group::{Group, GroupPreferences, NewGroup};
pub use invite_token::{InviteToken, NewInviteToken, TokenConsumption};
pub use registration::{InvalidRegistration, Registration, RegistrationRequest, RegistrationTarget};
pub use user::{NewUser, User, UserPermissions};
