//! Group (space) operations

use serde::de::IgnoredAny;
use serde_json::{json, Map, Value};
use tokio_util::sync::CancellationToken;

use crate::http::{HttpClient, RequestResult, NO_BODY};
use crate::types::{Group, MessageResponse};

#[derive(Clone)]
pub struct GroupService {
    client: HttpClient,
}

impl GroupService {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Groups visible to the current user
    pub async fn list(&self, cancel: Option<&CancellationToken>) -> RequestResult<Vec<Group>> {
        self.client.get("/api/groups", cancel).await
    }

    pub async fn get(&self, id: &str, cancel: Option<&CancellationToken>) -> RequestResult<Group> {
        self.client.get(&format!("/api/groups/{}", id), cancel).await
    }

    /// Create a group; a blank description is left out of the payload
    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        cancel: Option<&CancellationToken>,
    ) -> RequestResult<Group> {
        self.client
            .post("/groups", Some(&create_payload(name, description)), cancel)
            .await
    }

    pub async fn add_player(
        &self,
        group_id: &str,
        player_id: &str,
        cancel: Option<&CancellationToken>,
    ) -> RequestResult<()> {
        let path = format!("/api/groups/{}/players", group_id);
        let _: IgnoredAny = self
            .client
            .post(&path, Some(&json!({ "playerId": player_id })), cancel)
            .await?;
        Ok(())
    }

    pub async fn add_players(
        &self,
        group_id: &str,
        player_ids: &[String],
        cancel: Option<&CancellationToken>,
    ) -> RequestResult<Group> {
        let path = format!("/groups/{}/players", group_id);
        self.client
            .post(&path, Some(&json!({ "playerIds": player_ids })), cancel)
            .await
    }

    /// Current user joins the group
    pub async fn join(&self, group_id: &str, cancel: Option<&CancellationToken>) -> RequestResult<()> {
        let path = format!("/groups/{}/join", group_id);
        let _: IgnoredAny = self.client.post(&path, NO_BODY, cancel).await?;
        Ok(())
    }

    pub async fn delete(
        &self,
        id: &str,
        cancel: Option<&CancellationToken>,
    ) -> RequestResult<Option<MessageResponse>> {
        self.client.delete(&format!("/groups/{}", id), cancel).await
    }
}

fn create_payload(name: &str, description: Option<&str>) -> Value {
    let mut payload = Map::new();
    payload.insert("name".to_string(), Value::from(name));
    if let Some(description) = description.filter(|d| !d.trim().is_empty()) {
        payload.insert("description".to_string(), Value::from(description));
    }
    Value::Object(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_payload_keeps_description() {
        assert_eq!(
            create_payload("Grupo A", Some("Desc")),
            json!({"name": "Grupo A", "description": "Desc"})
        );
    }

    #[test]
    fn test_create_payload_omits_blank_description() {
        assert_eq!(create_payload("SoloNombre", Some("   ")), json!({"name": "SoloNombre"}));
        assert_eq!(create_payload("SoloNombre", None), json!({"name": "SoloNombre"}));
    }
}
