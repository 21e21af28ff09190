//! User account shapes: registration, login, profile updates, password
//! flows and read-outs.

use chrono::{DateTime, Utc};
use ideaverse_core::domain::User;
use ideaverse_core::validation::{validate_not_blank, validate_password};
use ideaverse_core::{Metadata, Patch, ValidationError, Violations};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidateEmail};

use super::common::entity_search_params;
use crate::registry::{CreateSchema, Schema, UpdateSchema, decode_flattened, derived_schema};

/// Profile fields shared by creation and read-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UserBase {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub username: String,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub profile_picture: Option<String>,
    pub bio: Option<String>,
}

impl From<&User> for UserBase {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            phone_number: user.phone_number.clone(),
            profile_picture: user.profile_picture.clone(),
            bio: user.bio.clone(),
        }
    }
}

/// Registration with email and password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UserCreate {
    #[serde(flatten)]
    pub base: UserBase,
    #[validate(custom(function = "validate_password"))]
    pub password: String,
}

impl Schema for UserCreate {
    const NAME: &'static str = "user.create";

    fn decode(raw: &Value) -> Result<Self, ValidationError> {
        decode_flattened::<UserBase, Self>(raw)
    }

    fn check(&self) -> Result<(), ValidationError> {
        let mut violations = Violations::new();
        violations.merge(self.base.validate());
        violations.merge(self.validate());
        violations.finish()
    }
}

impl CreateSchema for UserCreate {}

/// Registration through a social login; the provider may not hand over a
/// password, so none is required or strength-checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialUserCreate {
    #[serde(flatten)]
    pub base: UserBase,
    pub password: Option<String>,
    pub social_provider: Option<String>,
}

impl Schema for SocialUserCreate {
    const NAME: &'static str = "user.social_create";

    fn decode(raw: &Value) -> Result<Self, ValidationError> {
        decode_flattened::<UserBase, Self>(raw)
    }

    fn check(&self) -> Result<(), ValidationError> {
        self.base.validate().map_err(Into::into)
    }
}

impl CreateSchema for SocialUserCreate {}

/// Partial profile update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub username: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub full_name: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub email: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub phone_number: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub bio: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub profile_picture: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub preferences: Patch<Metadata>,
}

impl Schema for UserUpdate {
    const NAME: &'static str = "user.update";

    fn check(&self) -> Result<(), ValidationError> {
        let mut violations = Violations::new();
        self.username.reject_null("username", &mut violations);
        self.email.reject_null("email", &mut violations);
        self.preferences.reject_null("preferences", &mut violations);

        if let Some(username) = self.username.value() {
            violations.rule("username", validate_not_blank(username));
        }
        if let Some(email) = self.email.value() {
            if !email.validate_email() {
                violations.push("email", "Invalid email address");
            }
        }
        violations.finish()
    }
}

impl UpdateSchema for UserUpdate {
    fn is_empty(&self) -> bool {
        self.username.is_unset()
            && self.full_name.is_unset()
            && self.email.is_unset()
            && self.phone_number.is_unset()
            && self.bio.is_unset()
            && self.profile_picture.is_unset()
            && self.preferences.is_unset()
    }
}

impl UserUpdate {
    /// Apply the supplied fields to a stored user.
    pub fn apply(self, user: &mut User) {
        self.username.apply_required(&mut user.username);
        self.email.apply_required(&mut user.email);
        self.preferences.apply_required(&mut user.preferences);
        self.full_name.apply_to(&mut user.full_name);
        self.phone_number.apply_to(&mut user.phone_number);
        self.bio.apply_to(&mut user.bio);
        self.profile_picture.apply_to(&mut user.profile_picture);
        user.touch();
    }
}

/// Change password while logged in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UserPasswordUpdate {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub current_password: String,
    #[validate(custom(function = "validate_password"))]
    pub new_password: String,
}

/// Replace the preferences map wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UserPreferencesUpdate {
    pub preferences: Metadata,
}

impl UpdateSchema for UserPasswordUpdate {
    fn is_empty(&self) -> bool {
        false
    }
}

impl UpdateSchema for UserPreferencesUpdate {
    fn is_empty(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UserLogin {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PasswordResetRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

/// Complete a password reset with the emailed token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PasswordReset {
    #[validate(custom(function = "validate_not_blank"))]
    pub token: String,
    #[validate(custom(function = "validate_password"))]
    pub new_password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct EmailVerification {
    #[validate(custom(function = "validate_not_blank"))]
    pub token: String,
}

derived_schema! {
    UserPasswordUpdate => "user.password_update",
    UserPreferencesUpdate => "user.preferences_update",
    UserLogin => "user.login",
    PasswordResetRequest => "user.password_reset_request",
    PasswordReset => "user.password_reset",
    EmailVerification => "user.email_verification",
    UserSearchParams => "user.search",
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    #[serde(flatten)]
    pub base: UserBase,
    pub id: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub credits: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            base: UserBase::from(&user),
            id: user.id,
            is_active: user.is_active,
            is_verified: user.is_verified,
            credits: user.credits,
            created_at: user.created_at,
            updated_at: user.updated_at,
            last_login: user.last_login,
        }
    }
}

/// Activity counters joined into [`UserWithStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    #[serde(default)]
    pub idea_count: u64,
    #[serde(default)]
    pub paper_count: u64,
    #[serde(default)]
    pub code_snippet_count: u64,
    #[serde(default)]
    pub project_count: u64,
    #[serde(default)]
    pub total_credits: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserWithStats {
    #[serde(flatten)]
    pub user: UserResponse,
    #[serde(flatten)]
    pub stats: UserStats,
}

impl UserWithStats {
    pub fn new(user: User, stats: UserStats) -> Self {
        Self {
            user: user.into(),
            stats,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Minimal identity of an authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub email: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl From<&User> for UserIdentity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: Some(user.email.clone()),
            is_active: user.is_active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSignupResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub full_name: Option<String>,
}

impl From<&User> for UserSignupResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            username: user.username.clone(),
            full_name: user.full_name.clone(),
        }
    }
}

entity_search_params! {
    /// Parameters for searching users.
    UserSearchParams {
        query: Option<String>,
        is_active: Option<bool>,
        is_verified: Option<bool>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{SearchSchema, validate_create, validate_search_params, validate_update};
    use assert_matches::assert_matches;
    use ideaverse_core::MetadataValue;
    use serde_json::json;

    fn signup(password: &str) -> serde_json::Value {
        json!({
            "email": "ada@example.com",
            "username": "ada",
            "password": password,
        })
    }

    #[test]
    fn create_keeps_required_and_defaults_optional() {
        let user: UserCreate = validate_create(signup("Passw0rd")).unwrap();
        assert_eq!(user.base.email, "ada@example.com");
        assert_eq!(user.base.username, "ada");
        assert_eq!(user.base.full_name, None);
        assert_eq!(user.base.bio, None);
        assert_eq!(user.password, "Passw0rd");
    }

    #[test]
    fn weak_passwords_name_the_first_broken_rule() {
        let err = validate_create::<UserCreate>(signup("password")).unwrap_err();
        assert_eq!(
            err.reason_for("password"),
            Some("Password must contain at least one uppercase letter")
        );

        let err = validate_create::<UserCreate>(signup("PASS123")).unwrap_err();
        assert_eq!(
            err.reason_for("password"),
            Some("Password must be at least 8 characters long")
        );
    }

    #[test]
    fn create_reports_every_bad_field() {
        let err = validate_create::<UserCreate>(json!({
            "email": "not-an-email",
            "username": " ",
            "password": "short",
        }))
        .unwrap_err();
        let fields: Vec<_> = err.fields().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["email", "password", "username"]);
    }

    #[test]
    fn missing_password_is_attributed() {
        let err = validate_create::<UserCreate>(json!({
            "email": "ada@example.com",
            "username": "ada",
        }))
        .unwrap_err();
        assert_eq!(err.fields()[0].field, "password");
    }

    #[test]
    fn social_signup_skips_password_rules() {
        let user: SocialUserCreate = validate_create(json!({
            "email": "ada@example.com",
            "username": "ada",
            "social_provider": "google",
        }))
        .unwrap();
        assert_eq!(user.password, None);
        assert_eq!(user.social_provider.as_deref(), Some("google"));
    }

    #[test]
    fn every_password_flow_shares_the_rule() {
        let err = crate::registry::parse::<PasswordReset>(json!({
            "token": "abc",
            "new_password": "alllowercase1",
        }))
        .unwrap_err();
        assert_eq!(
            err.reason_for("new_password"),
            Some("Password must contain at least one uppercase letter")
        );

        assert!(
            validate_update::<UserPasswordUpdate>(json!({
                "current_password": "Old-pass1",
                "new_password": "NewPassw0rd",
            }))
            .is_ok()
        );
    }

    #[test]
    fn update_distinguishes_unset_from_null() {
        let update: UserUpdate = validate_update(json!({"bio": null, "full_name": "Ada L."})).unwrap();
        assert_eq!(update.bio, Patch::Null);
        assert_eq!(update.full_name, Patch::Value("Ada L.".to_string()));
        assert_eq!(update.username, Patch::Unset);
        assert!(!update.is_empty());

        let empty: UserUpdate = validate_update(json!({})).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn update_rejects_null_on_required_fields() {
        let err = validate_update::<UserUpdate>(json!({"username": null, "email": "bad"}))
            .unwrap_err();
        assert_eq!(err.reason_for("username"), Some("may be omitted but not set to null"));
        assert_eq!(err.reason_for("email"), Some("Invalid email address"));
    }

    #[test]
    fn update_apply_leaves_unset_fields_alone() {
        let mut user = User::new("ada@example.com".into(), "ada".into(), None);
        user.bio = Some("old bio".into());
        user.phone_number = Some("555".into());

        let update: UserUpdate = validate_update(json!({
            "bio": null,
            "username": "ada_l",
            "preferences": {"theme": "dark"},
        }))
        .unwrap();
        update.apply(&mut user);

        assert_eq!(user.bio, None);
        assert_eq!(user.username, "ada_l");
        assert_eq!(user.phone_number.as_deref(), Some("555"));
        assert_eq!(user.preferences["theme"], MetadataValue::from("dark"));
    }

    #[test]
    fn preferences_reject_nested_values() {
        let err = validate_update::<UserPreferencesUpdate>(json!({
            "preferences": {"layout": {"columns": 2}},
        }))
        .unwrap_err();
        assert_eq!(err.len(), 1);
    }

    #[test]
    fn response_round_trips() {
        let mut user = User::new("ada@example.com".into(), "ada".into(), Some("hash".into()));
        user.bio = Some("Mathematician".into());
        let response = UserResponse::from(user);

        let wire = serde_json::to_value(&response).unwrap();
        assert_eq!(wire["email"], json!("ada@example.com"));
        assert_eq!(wire["last_login"], serde_json::Value::Null);
        assert!(wire.get("password_hash").is_none());

        let back: UserResponse = serde_json::from_value(wire).unwrap();
        assert_eq!(back, response);
    }

    #[test]
    fn with_stats_defaults_counters() {
        let user = User::new("ada@example.com".into(), "ada".into(), None);
        let with_stats = UserWithStats::new(user, UserStats::default());
        let wire = serde_json::to_value(&with_stats).unwrap();
        assert_eq!(wire["idea_count"], json!(0));
        assert_eq!(wire["username"], json!("ada"));
    }

    #[test]
    fn search_defaults() {
        let params: UserSearchParams = validate_search_params(json!({"is_active": true})).unwrap();
        assert_eq!(params.sort_by, "created_at");
        assert_eq!(params.limit, 10);
        assert_eq!(params.skip, 0);
        assert_matches!(params.window(), crate::dto::common::PageWindow { limit: 10, skip: 0 });
    }
}
