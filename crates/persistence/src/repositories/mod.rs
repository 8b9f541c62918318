//! Repository implementations over the remote store.
//!
//! Every query is wrapped in a `QueryTimer` and every error is classified
//! into the structured `RemoteError` taxonomy before leaving this module.

pub mod admin;
pub mod guest;
pub mod invitation;
pub mod profile;
pub mod template;

pub use admin::{AdminUserRepository, PurchaseRequestRepository, SubscriptionRepository};
pub use guest::GuestRepository;
pub use invitation::InvitationRepository;
pub use profile::ProfileRepository;
pub use template::TemplateRepository;
