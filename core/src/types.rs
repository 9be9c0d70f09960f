//! Domain DTOs and GraphQL response envelopes.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! the integration tests catch any drift between the two crates. `null` for
//! `description` or `teamPermissions` decodes as empty.

use serde::{Deserialize, Deserializer, Serialize};

/// A team as returned by the admin API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub team_id: String,
    pub team_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub team_permissions: Vec<String>,
}

impl Team {
    pub fn new(team_id: &str, team_name: &str, description: &str) -> Self {
        Self {
            team_id: team_id.to_string(),
            team_name: team_name.to_string(),
            description: description.to_string(),
            team_permissions: Vec::new(),
        }
    }
}

/// Top-level GraphQL response: `data` plus optional `errors`.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

/// `data` of `getTeamsList`.
#[derive(Debug, Deserialize)]
pub struct TeamsData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub teams: Vec<Team>,
}

/// `data` of `createTeam` / `updateTeam`.
#[derive(Debug, Deserialize)]
pub struct TeamData {
    pub team: Team,
}

/// `data` of `deleteTeam`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTeamData {
    #[serde(default)]
    pub delete_team: bool,
}

/// `data` of `authLogin`. Only the status is kept; the session itself
/// arrives as a cookie.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthLoginData {
    pub auth_info: Option<AuthInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthInfo {
    pub auth_status: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_uses_wire_field_names() {
        let team = Team {
            team_id: "t1".to_string(),
            team_name: "Team One".to_string(),
            description: "desc".to_string(),
            team_permissions: vec!["admin".to_string()],
        };
        let json = serde_json::to_value(&team).unwrap();
        assert_eq!(json["teamId"], "t1");
        assert_eq!(json["teamName"], "Team One");
        assert_eq!(json["description"], "desc");
        assert_eq!(json["teamPermissions"][0], "admin");
    }

    #[test]
    fn team_tolerates_null_optional_fields() {
        let team: Team = serde_json::from_str(
            r#"{"teamId":"t1","teamName":"One","description":null,"teamPermissions":null}"#,
        )
        .unwrap();
        assert_eq!(team, Team::new("t1", "One", ""));
    }

    #[test]
    fn team_rejects_missing_id() {
        let result: Result<Team, _> = serde_json::from_str(r#"{"teamName":"One"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn response_without_errors_field() {
        let response: GraphQlResponse<TeamsData> =
            serde_json::from_str(r#"{"data":{"teams":[]}}"#).unwrap();
        assert!(response.errors.is_empty());
        assert!(response.data.unwrap().teams.is_empty());
    }
}
