//! Match scheduling, team generation and rating operations

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::IgnoredAny;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::http::{HttpClient, RequestResult, NO_BODY};
use crate::types::{
    ApplyRatingsResponse, GenerateTeamsResponse, Match, MatchesGroupResponse, MessageResponse, NewMatch,
    PlayerFeedback,
};

#[derive(Clone)]
pub struct MatchService {
    client: HttpClient,
}

impl MatchService {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Matches of a group plus the caller's permissions on it
    pub async fn list_by_group(
        &self,
        group_id: &str,
        cancel: Option<&CancellationToken>,
    ) -> RequestResult<MatchesGroupResponse> {
        self.client.get(&format!("/matches/group/{}", group_id), cancel).await
    }

    pub async fn create(
        &self,
        group_id: &str,
        participants: Vec<String>,
        scheduled_at: Option<DateTime<Utc>>,
        cancel: Option<&CancellationToken>,
    ) -> RequestResult<Match> {
        let payload = NewMatch {
            group_id: group_id.to_string(),
            participants,
            scheduled_at: scheduled_at.map(|at| at.to_rfc3339_opts(SecondsFormat::Millis, true)),
        };
        self.client.post("/matches", Some(&payload), cancel).await
    }

    pub async fn delete(
        &self,
        id: &str,
        cancel: Option<&CancellationToken>,
    ) -> RequestResult<Option<MessageResponse>> {
        self.client.delete(&format!("/matches/{}", id), cancel).await
    }

    pub async fn add_participant(
        &self,
        id: &str,
        player_id: &str,
        cancel: Option<&CancellationToken>,
    ) -> RequestResult<()> {
        let path = format!("/matches/{}/participants", id);
        let _: IgnoredAny = self
            .client
            .post(&path, Some(&json!({ "playerId": player_id })), cancel)
            .await?;
        Ok(())
    }

    /// Split participants into teams
    ///
    /// Without a seed the current time in milliseconds is used, so repeated
    /// calls produce different splits.
    pub async fn generate_teams(
        &self,
        id: &str,
        ai: bool,
        seed: Option<i64>,
        cancel: Option<&CancellationToken>,
    ) -> RequestResult<GenerateTeamsResponse> {
        let path = generate_teams_path(id, ai, seed.unwrap_or_else(|| Utc::now().timestamp_millis()));
        self.client.post(&path, NO_BODY, cancel).await
    }

    pub async fn send_feedback(
        &self,
        id: &str,
        feedback: &PlayerFeedback,
        cancel: Option<&CancellationToken>,
    ) -> RequestResult<()> {
        let path = format!("/matches/{}/feedback", id);
        let _: IgnoredAny = self.client.post(&path, Some(feedback), cancel).await?;
        Ok(())
    }

    /// Record the final score
    pub async fn finalize(
        &self,
        id: &str,
        score_a: u32,
        score_b: u32,
        cancel: Option<&CancellationToken>,
    ) -> RequestResult<Match> {
        let path = format!("/matches/{}/finalize", id);
        self.client
            .post(&path, Some(&json!({ "scoreA": score_a, "scoreB": score_b })), cancel)
            .await
    }

    pub async fn apply_ratings(
        &self,
        id: &str,
        cancel: Option<&CancellationToken>,
    ) -> RequestResult<ApplyRatingsResponse> {
        let path = format!("/matches/{}/apply-ratings", id);
        self.client.post(&path, NO_BODY, cancel).await
    }
}

fn generate_teams_path(id: &str, ai: bool, seed: i64) -> String {
    format!("/matches/{}/generate-teams?ai={}&seed={}", id, if ai { 1 } else { 0 }, seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_teams_path() {
        assert_eq!(
            generate_teams_path("m1", true, 42),
            "/matches/m1/generate-teams?ai=1&seed=42"
        );
        assert_eq!(
            generate_teams_path("m1", false, 7),
            "/matches/m1/generate-teams?ai=0&seed=7"
        );
    }
}
