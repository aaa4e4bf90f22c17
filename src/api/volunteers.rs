//! Volunteer endpoints

use super::{
    client::ApiClient,
    errors::{ApiError, ApiResult},
    grid::GridQuery,
    reference::VolunteerType,
    types::{ListPayload, NewVolunteer, Paginated, Volunteer, VolunteerPage, VolunteerStats},
};
use serde_json::json;
use tracing::warn;

pub struct VolunteersApi<'a> {
    client: &'a ApiClient,
}

impl<'a> VolunteersApi<'a> {
    pub(super) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// One page of volunteers for the given table state
    pub async fn get_many(&self, query: &GridQuery) -> ApiResult<VolunteerPage> {
        let params = query.to_params().to_query();
        let page: Paginated<Volunteer> = self.client.get_query("/volunteers/", &params).await?;
        Ok(VolunteerPage {
            items: page.results,
            item_count: page.count,
        })
    }

    pub async fn get_one(&self, id: u64) -> ApiResult<Volunteer> {
        self.client.get(&format!("/volunteers/{}/", id)).await
    }

    pub async fn create_one(&self, volunteer: &NewVolunteer) -> ApiResult<Volunteer> {
        self.client.post("/volunteers/", volunteer).await
    }

    /// Activate or deactivate a volunteer. `is_active` is the only field
    /// that can be changed after registration.
    pub async fn update_active(&self, id: u64, is_active: bool) -> ApiResult<Volunteer> {
        self.client
            .patch(&format!("/volunteers/{}/", id), &json!({ "is_active": is_active }))
            .await
    }

    pub async fn stats(&self) -> ApiResult<VolunteerStats> {
        self.client.get("/volunteers/stats/").await
    }

    /// Search by volunteer number or name. Failures yield an empty list.
    pub async fn search(&self, query: &str) -> Vec<Volunteer> {
        let params = [("search", query.to_string())];
        match self.client.get_query::<ListPayload<Volunteer>>("/volunteers/", &params).await {
            Ok(payload) => payload.into_items(),
            Err(err) => {
                warn!(error = %err, "Volunteer search failed");
                Vec::new()
            }
        }
    }

    /// Active volunteers of one type. Callers without admin rights get an empty list.
    pub async fn by_type(&self, kind: VolunteerType) -> ApiResult<Vec<Volunteer>> {
        let params = [
            ("gonullu_tipi", kind.to_string()),
            ("is_active", "true".to_string()),
        ];
        self.active_list(&params).await
    }

    /// All active volunteers. Callers without admin rights get an empty list.
    pub async fn active(&self) -> ApiResult<Vec<Volunteer>> {
        self.active_list(&[("is_active", "true".to_string())]).await
    }

    async fn active_list(&self, params: &[(&str, String)]) -> ApiResult<Vec<Volunteer>> {
        match self.client.get_query::<ListPayload<Volunteer>>("/volunteers/", params).await {
            Ok(payload) => Ok(payload.into_items()),
            Err(ApiError::Forbidden) => {
                warn!("Admin access required for the volunteers API");
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }
}
