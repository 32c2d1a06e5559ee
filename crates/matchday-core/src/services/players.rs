//! Player roster operations

use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::http::{HttpClient, RequestResult};
use crate::services::{query_value, route_chain};
use crate::types::{Abilities, MessageResponse, NewPlayer, Player};

#[derive(Clone)]
pub struct PlayerService {
    client: HttpClient,
}

impl PlayerService {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Players owned by the current user
    pub async fn list(&self, cancel: Option<&CancellationToken>) -> RequestResult<Vec<Player>> {
        self.client.get("/players", cancel).await
    }

    /// Every player visible to the current user
    pub async fn list_all(&self, cancel: Option<&CancellationToken>) -> RequestResult<Vec<Player>> {
        self.client.get("/api/players/all", cancel).await
    }

    /// Players of a space, each carrying its space membership
    pub async fn list_in_space(
        &self,
        space_id: &str,
        cancel: Option<&CancellationToken>,
    ) -> RequestResult<Vec<Player>> {
        let path = format!("/api/players?spaceId={}", query_value(space_id));
        self.client.get(&path, cancel).await
    }

    pub async fn get(&self, id: &str, cancel: Option<&CancellationToken>) -> RequestResult<Player> {
        let routes = [format!("/api/players/{}", id), format!("/players/{}", id)];
        route_chain(&self.client, "players.get", &routes, move |route| self.client.get(route, cancel))
            .run()
            .await
    }

    pub async fn create(&self, player: &NewPlayer, cancel: Option<&CancellationToken>) -> RequestResult<Player> {
        self.client.post("/players", Some(player), cancel).await
    }

    /// Replace a player's ability scores
    pub async fn update_skills(
        &self,
        id: &str,
        abilities: &Abilities,
        cancel: Option<&CancellationToken>,
    ) -> RequestResult<Player> {
        let routes = [
            format!("/api/players/{}/abilities", id),
            format!("/players/{}/abilities", id),
        ];
        let payload = json!({ "abilities": abilities });
        let payload = &payload;
        route_chain(&self.client, "players.update_skills", &routes, move |route| {
            self.client.patch(route, Some(payload), cancel)
        })
        .run()
        .await
    }

    pub async fn delete(
        &self,
        id: &str,
        cancel: Option<&CancellationToken>,
    ) -> RequestResult<Option<MessageResponse>> {
        self.client.delete(&format!("/players/{}", id), cancel).await
    }
}
