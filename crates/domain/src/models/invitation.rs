//! Invitation domain models.
//!
//! The slug is the invitation's business key: it is globally unique, immutable
//! once published, and the only input to the shareable URL. Merging between
//! the remote store and the local fallback store deduplicates by slug, never
//! by internal id, because a locally saved copy carries a different internal
//! id than its eventual remote counterpart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::validation::{validate_event_date, validate_slug};

/// A wedding invitation as authored by its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Invitation {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub bride_name: String,
    pub groom_name: String,
    pub event_date: DateTime<Utc>,
    pub venue_name: Option<String>,
    pub venue_address: Option<String>,
    pub message: Option<String>,
    pub template_id: Option<Uuid>,
    pub slug: String,
    pub is_active: bool,
    pub view_count: i64,
    /// Free-form per-invitation settings (RSVP toggle, countdown, music...).
    pub settings: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create an invitation from the builder form.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateInvitationRequest {
    #[validate(length(min = 1, max = 100, message = "bride_name must be 1-100 characters"))]
    pub bride_name: String,

    #[validate(length(min = 1, max = 100, message = "groom_name must be 1-100 characters"))]
    pub groom_name: String,

    #[validate(custom(function = "validate_event_date"))]
    pub event_date: DateTime<Utc>,

    #[validate(length(max = 200, message = "venue_name must be at most 200 characters"))]
    pub venue_name: Option<String>,

    #[validate(length(max = 500, message = "venue_address must be at most 500 characters"))]
    pub venue_address: Option<String>,

    #[validate(length(max = 2000, message = "message must be at most 2000 characters"))]
    pub message: Option<String>,

    pub template_id: Option<Uuid>,

    /// Custom slug; when absent one is derived from the couple names.
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,

    #[serde(default)]
    pub settings: Option<serde_json::Value>,
}

/// Request to update an invitation. The slug is immutable and absent here.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateInvitationRequest {
    #[validate(length(min = 1, max = 100, message = "bride_name must be 1-100 characters"))]
    pub bride_name: Option<String>,

    #[validate(length(min = 1, max = 100, message = "groom_name must be 1-100 characters"))]
    pub groom_name: Option<String>,

    pub event_date: Option<DateTime<Utc>>,

    #[validate(length(max = 200, message = "venue_name must be at most 200 characters"))]
    pub venue_name: Option<String>,

    #[validate(length(max = 500, message = "venue_address must be at most 500 characters"))]
    pub venue_address: Option<String>,

    #[validate(length(max = 2000, message = "message must be at most 2000 characters"))]
    pub message: Option<String>,

    pub template_id: Option<Uuid>,

    pub is_active: Option<bool>,

    pub settings: Option<serde_json::Value>,
}

/// Invitation plus storage context, returned to the builder UI.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InvitationResponse {
    #[serde(flatten)]
    pub invitation: Invitation,
    /// The shareable URL; identical whether the record is remote or local.
    pub invitation_url: String,
    /// True when the record is durable only in the local fallback store.
    pub local_only: bool,
}

/// What an unauthenticated visitor sees at the public URL.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PublicInvitationView {
    pub slug: String,
    pub bride_name: String,
    pub groom_name: String,
    pub event_date: DateTime<Utc>,
    pub venue_name: Option<String>,
    pub venue_address: Option<String>,
    pub message: Option<String>,
    pub template_id: Option<Uuid>,
    pub settings: serde_json::Value,
}

impl Invitation {
    /// Builds a new invitation from the builder form. The id assigned here is
    /// local; if the record first lands in the fallback store, the remote
    /// store will assign its own id later and the slug reconciles the two.
    pub fn from_request(owner_id: Uuid, slug: String, request: CreateInvitationRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            bride_name: request.bride_name,
            groom_name: request.groom_name,
            event_date: request.event_date,
            venue_name: request.venue_name,
            venue_address: request.venue_address,
            message: request.message,
            template_id: request.template_id,
            slug,
            is_active: true,
            view_count: 0,
            settings: request.settings.unwrap_or_else(|| serde_json::json!({})),
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies an update in place, bumping `updated_at`.
    pub fn apply_update(&mut self, request: UpdateInvitationRequest) {
        if let Some(v) = request.bride_name {
            self.bride_name = v;
        }
        if let Some(v) = request.groom_name {
            self.groom_name = v;
        }
        if let Some(v) = request.event_date {
            self.event_date = v;
        }
        if let Some(v) = request.venue_name {
            self.venue_name = Some(v);
        }
        if let Some(v) = request.venue_address {
            self.venue_address = Some(v);
        }
        if let Some(v) = request.message {
            self.message = Some(v);
        }
        if let Some(v) = request.template_id {
            self.template_id = Some(v);
        }
        if let Some(v) = request.is_active {
            self.is_active = v;
        }
        if let Some(v) = request.settings {
            self.settings = v;
        }
        self.updated_at = Utc::now();
    }

    pub fn public_view(&self) -> PublicInvitationView {
        PublicInvitationView {
            slug: self.slug.clone(),
            bride_name: self.bride_name.clone(),
            groom_name: self.groom_name.clone(),
            event_date: self.event_date,
            venue_name: self.venue_name.clone(),
            venue_address: self.venue_address.clone(),
            message: self.message.clone(),
            template_id: self.template_id,
            settings: self.settings.clone(),
        }
    }
}

/// Derives the shareable URL for a slug. Depends on nothing but the slug, so
/// it is identical for remote and locally-fallback-stored records.
pub fn invitation_url(base_url: &str, slug: &str) -> String {
    format!("{}/i/{}", base_url.trim_end_matches('/'), slug)
}

/// Normalizes couple names into a slug base: lowercase ASCII alphanumerics
/// separated by single hyphens ("Asal" + "Jahon" -> "asal-jahon").
pub fn slugify_names(bride_name: &str, groom_name: &str) -> String {
    let mut slug = String::new();
    let mut last_was_hyphen = true;

    for c in format!("{} {}", bride_name, groom_name).chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    let slug = slug.trim_matches('-').to_string();
    if slug.is_empty() {
        "taklifnoma".to_string()
    } else {
        slug.chars().take(shared::validation::MAX_SLUG_LENGTH - 5).collect()
    }
}

/// Generates a slug candidate with a random 4-character suffix. The suffix
/// alphabet avoids confusable characters (0/o, 1/l).
pub fn generate_slug_candidate(bride_name: &str, groom_name: &str) -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let chars: &[u8] = b"abcdefghjkmnpqrstuvwxyz23456789";

    let suffix: String = (0..4)
        .map(|_| {
            let idx = rng.gen_range(0..chars.len());
            chars[idx] as char
        })
        .collect();

    format!("{}-{}", slugify_names(bride_name, groom_name), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn create_request() -> CreateInvitationRequest {
        CreateInvitationRequest {
            bride_name: "Asal".to_string(),
            groom_name: "Jahon".to_string(),
            event_date: Utc::now() + Duration::days(60),
            venue_name: Some("Navruz to'yxonasi".to_string()),
            venue_address: Some("Toshkent, Chilonzor 9".to_string()),
            message: Some("Sizni to'yimizga taklif qilamiz!".to_string()),
            template_id: None,
            slug: None,
            settings: None,
        }
    }

    #[test]
    fn test_slugify_names() {
        assert_eq!(slugify_names("Asal", "Jahon"), "asal-jahon");
        assert_eq!(slugify_names("  Nigora ", "O'tkir"), "nigora-o-tkir");
        assert_eq!(slugify_names("!!!", "???"), "taklifnoma");
    }

    #[test]
    fn test_slugify_names_is_valid_slug() {
        let slug = slugify_names("Dil-Noza", "Bek zod");
        assert!(shared::validation::validate_slug(&slug).is_ok());
    }

    #[test]
    fn test_generate_slug_candidate_format() {
        let slug = generate_slug_candidate("Asal", "Jahon");
        assert!(slug.starts_with("asal-jahon-"));
        assert_eq!(slug.len(), "asal-jahon-".len() + 4);
        assert!(shared::validation::validate_slug(&slug).is_ok());
    }

    #[test]
    fn test_generate_slug_candidate_uniqueness() {
        let slugs: std::collections::HashSet<String> = (0..100)
            .map(|_| generate_slug_candidate("Asal", "Jahon"))
            .collect();
        assert!(slugs.len() >= 99);
    }

    #[test]
    fn test_invitation_url_is_storage_independent() {
        assert_eq!(
            invitation_url("https://taklifnoma.uz", "asal-jahon"),
            "https://taklifnoma.uz/i/asal-jahon"
        );
        assert_eq!(
            invitation_url("https://taklifnoma.uz/", "asal-jahon"),
            "https://taklifnoma.uz/i/asal-jahon"
        );
    }

    #[test]
    fn test_from_request_defaults() {
        let invitation = Invitation::from_request(
            Uuid::new_v4(),
            "asal-jahon-x7kq".to_string(),
            create_request(),
        );

        assert!(invitation.is_active);
        assert_eq!(invitation.view_count, 0);
        assert_eq!(invitation.settings, serde_json::json!({}));
        assert_eq!(invitation.created_at, invitation.updated_at);
    }

    #[test]
    fn test_apply_update_preserves_slug() {
        let mut invitation = Invitation::from_request(
            Uuid::new_v4(),
            "asal-jahon-x7kq".to_string(),
            create_request(),
        );

        invitation.apply_update(UpdateInvitationRequest {
            bride_name: None,
            groom_name: None,
            event_date: None,
            venue_name: Some("Guliston saroyi".to_string()),
            venue_address: None,
            message: None,
            template_id: None,
            is_active: Some(false),
            settings: None,
        });

        assert_eq!(invitation.slug, "asal-jahon-x7kq");
        assert_eq!(invitation.venue_name.as_deref(), Some("Guliston saroyi"));
        assert!(!invitation.is_active);
        assert!(invitation.updated_at >= invitation.created_at);
    }

    #[test]
    fn test_create_request_validation() {
        let valid = create_request();
        assert!(valid.validate().is_ok());

        let mut bad_slug = create_request();
        bad_slug.slug = Some("Asal Jahon".to_string());
        assert!(bad_slug.validate().is_err());

        let mut past_date = create_request();
        past_date.event_date = Utc::now() - Duration::days(30);
        assert!(past_date.validate().is_err());

        let mut empty_name = create_request();
        empty_name.bride_name = String::new();
        assert!(empty_name.validate().is_err());
    }

    #[test]
    fn test_public_view_hides_owner() {
        let invitation = Invitation::from_request(
            Uuid::new_v4(),
            "asal-jahon-x7kq".to_string(),
            create_request(),
        );
        let view = invitation.public_view();
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("owner_id").is_none());
        assert!(json.get("view_count").is_none());
        assert_eq!(json["slug"], "asal-jahon-x7kq");
    }
}
