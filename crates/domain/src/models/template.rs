//! Custom template domain models.
//!
//! A template's visual configuration is a tagged variant per category over a
//! shared base shape. The variant is validated at the reconciliation boundary
//! before persistence, so no free-form config blob ever reaches storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use shared::validation::validate_hex_color;

/// A user-authored visual template, referenced by invitations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CustomTemplate {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub config: TemplateConfig,
    pub is_public: bool,
    pub is_featured: bool,
    pub usage_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Shared visual base every template category carries.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct TemplateBase {
    #[validate(custom(function = "validate_hex_color"))]
    pub primary_color: String,

    #[validate(custom(function = "validate_hex_color"))]
    pub secondary_color: String,

    #[validate(length(min = 1, max = 100, message = "heading_font must be 1-100 characters"))]
    pub heading_font: String,

    #[validate(length(min = 1, max = 100, message = "body_font must be 1-100 characters"))]
    pub body_font: String,

    /// Optional style block appended to the rendered page.
    #[validate(length(max = 10_000, message = "custom_css must be at most 10000 characters"))]
    pub custom_css: Option<String>,
}

/// Visual configuration, one variant per template category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum TemplateConfig {
    /// Ornamental borders and a serif layout.
    Classic {
        #[serde(flatten)]
        base: TemplateBase,
        ornament: Ornament,
    },
    /// Botanical artwork behind the text block.
    Floral {
        #[serde(flatten)]
        base: TemplateBase,
        flower_motif: FlowerMotif,
        /// 0-100, how strongly the artwork shows through.
        motif_opacity: u8,
    },
    /// Flat colors and a sans-serif grid.
    Modern {
        #[serde(flatten)]
        base: TemplateBase,
        accent_color: String,
    },
    /// A couple photo as the hero background.
    Photo {
        #[serde(flatten)]
        base: TemplateBase,
        photo_url: String,
        overlay_opacity: u8,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ornament {
    Filigree,
    Laurel,
    Geometric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowerMotif {
    Rose,
    Peony,
    Cotton,
    Pomegranate,
}

impl TemplateConfig {
    pub fn base(&self) -> &TemplateBase {
        match self {
            TemplateConfig::Classic { base, .. }
            | TemplateConfig::Floral { base, .. }
            | TemplateConfig::Modern { base, .. }
            | TemplateConfig::Photo { base, .. } => base,
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            TemplateConfig::Classic { .. } => "classic",
            TemplateConfig::Floral { .. } => "floral",
            TemplateConfig::Modern { .. } => "modern",
            TemplateConfig::Photo { .. } => "photo",
        }
    }

    /// Validates the shared base plus the variant-specific fields. Called at
    /// the reconciliation boundary before any persistence.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        self.base().validate()?;

        let mut errors = ValidationErrors::new();
        match self {
            TemplateConfig::Classic { .. } => {}
            TemplateConfig::Floral { motif_opacity, .. } => {
                if *motif_opacity > 100 {
                    errors.add("motif_opacity", range_error("motif_opacity"));
                }
            }
            TemplateConfig::Modern { accent_color, .. } => {
                if let Err(e) = validate_hex_color(accent_color) {
                    errors.add("accent_color", e);
                }
            }
            TemplateConfig::Photo {
                photo_url,
                overlay_opacity,
                ..
            } => {
                if !photo_url.starts_with("https://") {
                    let mut err = ValidationError::new("photo_url");
                    err.message = Some("photo_url must be an https URL".into());
                    errors.add("photo_url", err);
                }
                if *overlay_opacity > 100 {
                    errors.add("overlay_opacity", range_error("overlay_opacity"));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn range_error(field: &'static str) -> ValidationError {
    let mut err = ValidationError::new(field);
    err.message = Some(format!("{} must be between 0 and 100", field).into());
    err
}

/// Request to create or save a template from the template builder.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SaveTemplateRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: Option<String>,

    pub config: TemplateConfig,

    #[serde(default)]
    pub is_public: bool,
}

/// Template plus storage context, returned to the template builder.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TemplateResponse {
    #[serde(flatten)]
    pub template: CustomTemplate,
    pub local_only: bool,
}

impl CustomTemplate {
    pub fn from_request(owner_id: Uuid, request: SaveTemplateRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: request.name,
            description: request.description,
            config: request.config,
            is_public: request.is_public,
            is_featured: false,
            usage_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Re-saves the template from the builder, keeping its identity,
    /// featured flag and usage counter.
    pub fn apply_save(&mut self, request: SaveTemplateRequest) {
        self.name = request.name;
        self.description = request.description;
        self.config = request.config;
        self.is_public = request.is_public;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> TemplateBase {
        TemplateBase {
            primary_color: "#d4af37".to_string(),
            secondary_color: "#ffffff".to_string(),
            heading_font: "Playfair Display".to_string(),
            body_font: "Lato".to_string(),
            custom_css: None,
        }
    }

    #[test]
    fn test_validate_classic_ok() {
        let config = TemplateConfig::Classic {
            base: base(),
            ornament: Ornament::Filigree,
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_base_color() {
        let mut b = base();
        b.primary_color = "gold".to_string();
        let config = TemplateConfig::Classic {
            base: b,
            ornament: Ornament::Laurel,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_floral_opacity_range() {
        let config = TemplateConfig::Floral {
            base: base(),
            flower_motif: FlowerMotif::Pomegranate,
            motif_opacity: 130,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_modern_accent_color() {
        let config = TemplateConfig::Modern {
            base: base(),
            accent_color: "not-a-color".to_string(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_photo_requires_https() {
        let config = TemplateConfig::Photo {
            base: base(),
            photo_url: "http://insecure.example/pic.jpg".to_string(),
            overlay_opacity: 40,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serde_tag_roundtrip() {
        let config = TemplateConfig::Floral {
            base: base(),
            flower_motif: FlowerMotif::Cotton,
            motif_opacity: 35,
        };

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["category"], "floral");
        assert_eq!(json["flower_motif"], "cotton");
        // Base is flattened alongside the variant fields
        assert_eq!(json["primary_color"], "#d4af37");

        let back: TemplateConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back.category(), "floral");
    }

    #[test]
    fn test_untagged_blob_is_rejected() {
        // A config without the category tag must not deserialize
        let blob = serde_json::json!({
            "primary_color": "#d4af37",
            "secondary_color": "#fff",
            "heading_font": "Lato",
            "body_font": "Lato"
        });
        assert!(serde_json::from_value::<TemplateConfig>(blob).is_err());
    }

    #[test]
    fn test_from_request_defaults() {
        let template = CustomTemplate::from_request(
            Uuid::new_v4(),
            SaveTemplateRequest {
                name: "Oltin guldor".to_string(),
                description: None,
                config: TemplateConfig::Classic {
                    base: base(),
                    ornament: Ornament::Geometric,
                },
                is_public: false,
            },
        );

        assert!(!template.is_featured);
        assert_eq!(template.usage_count, 0);
    }
}
