//! Profile rows.

use async_trait::async_trait;
use tracing::instrument;

use crate::profile::{NewProfile, Profile, ProfileStore};
use crate::services::auth::Session;

use super::{BackendClient, BackendError, Filter, Select};

const TABLE: &str = "profiles";

#[async_trait]
impl ProfileStore for BackendClient {
    #[instrument(skip_all, fields(user_id = %session.user_id()))]
    async fn profile(&self, session: &Session) -> Result<Option<Profile>, BackendError> {
        let query = Select::from(TABLE).filter(Filter::eq("id", session.user_id()));
        self.select_one(&query, Some(session)).await
    }

    #[instrument(skip_all, fields(user_id = %profile.id))]
    async fn create_profile(
        &self,
        session: Option<&Session>,
        profile: &NewProfile,
    ) -> Result<Profile, BackendError> {
        self.insert(TABLE, profile, session).await
    }
}
