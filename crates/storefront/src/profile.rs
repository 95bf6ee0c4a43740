//! Shopper profiles.
//!
//! Each auth user has one row in `profiles`, keyed by the auth user ID and
//! created right after sign-up.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use liftfit_core::UserId;

use crate::backend::BackendError;
use crate::services::auth::Session;

/// A row in `profiles`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// Greeting shown at the top of the profile screen.
    #[must_use]
    pub fn greeting(&self) -> String {
        format!("Hi, {}!", self.username)
    }
}

/// Values for a new profile row.
#[derive(Debug, Clone, Serialize)]
pub struct NewProfile {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

/// Read and create profile rows.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// The signed-in user's profile. A missing row is `Ok(None)`.
    async fn profile(&self, session: &Session) -> Result<Option<Profile>, BackendError>;

    /// Insert a profile row.
    ///
    /// Sign-up may not yield a session (email confirmation pending), so the
    /// session is optional here.
    async fn create_profile(
        &self,
        session: Option<&Session>,
        profile: &NewProfile,
    ) -> Result<Profile, BackendError>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_row_with_nulls() {
        let profile: Profile = serde_json::from_value(serde_json::json!({
            "id": "6f1c2b1e-8a4d-4c1b-9a57-0d2f1f6b8e11",
            "username": "iron_mike",
            "email": "m@gym.io",
            "avatar_url": null,
            "created_at": "2026-01-02T03:04:05+00:00"
        }))
        .unwrap();
        assert_eq!(profile.avatar_url, None);
        assert_eq!(profile.greeting(), "Hi, iron_mike!");
    }

    #[test]
    fn test_new_profile_serializes_row_columns() {
        let row = NewProfile {
            id: "6f1c2b1e-8a4d-4c1b-9a57-0d2f1f6b8e11".parse().unwrap(),
            username: "iron_mike".to_string(),
            email: "m@gym.io".to_string(),
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["id"], "6f1c2b1e-8a4d-4c1b-9a57-0d2f1f6b8e11");
        assert_eq!(value["username"], "iron_mike");
        assert_eq!(value["email"], "m@gym.io");
    }
}
