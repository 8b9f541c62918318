pub mod admin;
pub mod billing;
pub mod drafts;
pub mod guests;
pub mod health;
pub mod invitations;
pub mod profiles;
pub mod public;
pub mod templates;

use serde::Serialize;

use persistence::reconcile::Advisory;

/// Collection payload shared by reconciled listings: the data plus the
/// degraded/advisory context of the load.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CollectionResponse<T> {
    pub data: Vec<T>,
    pub degraded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<Advisory>,
}

/// Single-entity payload shared by reconciled saves.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SaveResponse<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<Advisory>,
}
