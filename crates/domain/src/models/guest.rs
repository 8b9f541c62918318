//! Guest and RSVP domain models.
//!
//! Both record kinds are insert-only: a guest row is created by the
//! invitation owner (guest list) or a public visitor (RSVP submission) and
//! never updated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A guest on an invitation's list, or a public RSVP submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Guest {
    pub id: Uuid,
    pub invitation_id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub attending: bool,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Owner-side request to add a guest to the list.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateGuestRequest {
    #[validate(length(min = 1, max = 150, message = "name must be 1-150 characters"))]
    pub name: String,

    #[validate(length(max = 30, message = "phone must be at most 30 characters"))]
    pub phone: Option<String>,

    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,

    #[serde(default = "default_attending")]
    pub attending: bool,
}

/// Public RSVP submission from the invitation page.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct RsvpRequest {
    #[validate(length(min = 1, max = 150, message = "name must be 1-150 characters"))]
    pub name: String,

    #[validate(length(max = 30, message = "phone must be at most 30 characters"))]
    pub phone: Option<String>,

    pub attending: bool,

    #[validate(length(max = 1000, message = "message must be at most 1000 characters"))]
    pub message: Option<String>,
}

fn default_attending() -> bool {
    true
}

/// Guest list with attendance totals for the owner dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct GuestListResponse {
    pub data: Vec<Guest>,
    pub attending_count: usize,
    pub declined_count: usize,
}

impl GuestListResponse {
    pub fn from_guests(data: Vec<Guest>) -> Self {
        let attending_count = data.iter().filter(|g| g.attending).count();
        let declined_count = data.len() - attending_count;
        Self {
            data,
            attending_count,
            declined_count,
        }
    }
}
