//! Domain models for Taklifnoma.

pub mod admin;
pub mod guest;
pub mod invitation;
pub mod profile;
pub mod template;

pub use guest::Guest;
pub use invitation::Invitation;
pub use profile::Profile;
pub use template::CustomTemplate;
