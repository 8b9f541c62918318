//! Profile domain models.
//!
//! A profile mirrors the external auth provider's user identity one-to-one
//! and is created lazily on the first authenticated request that misses it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// The application-side mirror of an authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Profile {
    /// Same id as the auth provider's user identity.
    pub id: Uuid,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to update the caller's own profile.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "display_name must be 1-100 characters"))]
    pub display_name: Option<String>,

    #[validate(length(max = 30, message = "phone must be at most 30 characters"))]
    pub phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_profile_request_validation() {
        let valid = UpdateProfileRequest {
            display_name: Some("Asal".to_string()),
            phone: Some("+998901234567".to_string()),
        };
        assert!(valid.validate().is_ok());

        let empty_name = UpdateProfileRequest {
            display_name: Some(String::new()),
            phone: None,
        };
        assert!(empty_name.validate().is_err());
    }

    #[test]
    fn test_profile_serde_roundtrip() {
        let profile = Profile {
            id: Uuid::new_v4(),
            email: Some("asal@example.com".to_string()),
            display_name: None,
            phone: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&profile).unwrap();
        let back: Profile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, profile.id);
        assert_eq!(back.email, profile.email);
    }
}
