use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::AppError;
use crate::features::profiles::models::Profile;
use crate::shared::validation::PHONE_REGEX;

/// Editable profile fields as the settings form posts them
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileDto {
    #[validate(length(max = 120, message = "Full name cannot exceed 120 characters"))]
    pub full_name: Option<String>,

    #[validate(length(max = 120, message = "Company name cannot exceed 120 characters"))]
    pub company_name: Option<String>,

    #[validate(regex(path = *PHONE_REGEX, message = "Enter a valid phone number"))]
    pub phone: Option<String>,

    #[validate(url(message = "Enter a valid website URL"))]
    pub website: Option<String>,

    #[validate(length(max = 500, message = "Bio cannot exceed 500 characters"))]
    pub bio: Option<String>,

    #[validate(url(message = "Enter a valid image URL"))]
    pub avatar_url: Option<String>,
}

fn normalize_field(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim().to_string();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    })
}

impl UpdateProfileDto {
    /// Trim every field, drop blanks, then run the schema. Blank fields
    /// clear the stored value rather than failing format checks.
    pub fn normalize_and_validate(self) -> Result<Self, AppError> {
        let normalized = Self {
            full_name: normalize_field(self.full_name),
            company_name: normalize_field(self.company_name),
            phone: normalize_field(self.phone),
            website: normalize_field(self.website),
            bio: normalize_field(self.bio),
            avatar_url: normalize_field(self.avatar_url),
        };

        if let Err(errors) = normalized.validate() {
            let messages: Vec<String> = errors
                .field_errors()
                .into_values()
                .flatten()
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .collect();
            return Err(AppError::Validation(messages.join(". ")));
        }

        Ok(normalized)
    }
}

/// Response DTO for seller profile
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponseDto {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub company_name: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Profile> for ProfileResponseDto {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            full_name: p.full_name,
            company_name: p.company_name,
            phone: p.phone,
            website: p.website,
            bio: p.bio,
            avatar_url: p.avatar_url,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_form() -> UpdateProfileDto {
        UpdateProfileDto {
            full_name: None,
            company_name: None,
            phone: None,
            website: None,
            bio: None,
            avatar_url: None,
        }
    }

    #[test]
    fn test_blank_fields_clear_instead_of_failing() {
        let form = UpdateProfileDto {
            phone: Some("   ".to_string()),
            website: Some("".to_string()),
            ..blank_form()
        };
        let normalized = form.normalize_and_validate().unwrap();
        assert_eq!(normalized.phone, None);
        assert_eq!(normalized.website, None);
    }

    #[test]
    fn test_valid_phone_accepted_after_trim() {
        let form = UpdateProfileDto {
            phone: Some(" +86 21 1234 5678 ".to_string()),
            ..blank_form()
        };
        let normalized = form.normalize_and_validate().unwrap();
        assert_eq!(normalized.phone.as_deref(), Some("+86 21 1234 5678"));
    }

    #[test]
    fn test_invalid_phone_rejected() {
        let form = UpdateProfileDto {
            phone: Some("call me maybe".to_string()),
            ..blank_form()
        };
        let err = form.normalize_and_validate().unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("phone number")));
    }

    #[test]
    fn test_invalid_avatar_url_rejected() {
        let form = UpdateProfileDto {
            avatar_url: Some("not-a-url".to_string()),
            ..blank_form()
        };
        let err = form.normalize_and_validate().unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("image URL")));
    }

    #[test]
    fn test_overlong_bio_rejected() {
        let form = UpdateProfileDto {
            bio: Some("x".repeat(501)),
            ..blank_form()
        };
        assert!(form.normalize_and_validate().is_err());
    }
}
