//! Database entity definitions.
//!
//! Entities are direct mappings to remote store rows.

pub mod admin;
pub mod guest;
pub mod invitation;
pub mod profile;
pub mod template;

pub use admin::{PurchaseRequestEntity, SubscriptionEntity};
pub use guest::GuestEntity;
pub use invitation::InvitationEntity;
pub use profile::ProfileEntity;
pub use template::TemplateEntity;
