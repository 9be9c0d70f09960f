//! GraphQL request envelopes for every supported operation.
//!
//! # Design
//! Query text is compiled in as `const` strings and never built from caller
//! input; callers only influence the typed `variables`. `getTeamsList` serves
//! both list-all and get-one, the only difference being the `teamId` filter.

use serde::Serialize;

use crate::session::Credentials;

pub const OPERATION_AUTH_LOGIN: &str = "authLogin";
pub const OPERATION_CREATE_TEAM: &str = "createTeam";
pub const OPERATION_DELETE_TEAM: &str = "deleteTeam";
pub const OPERATION_GET_TEAMS_LIST: &str = "getTeamsList";
pub const OPERATION_UPDATE_TEAM: &str = "updateTeam";

pub const QUERY_AUTH_LOGIN: &str = "
    query authLogin($provider: ID!, $configuration: ID, $credentials: Object, $linkUser: Boolean, $customIncludeOriginDetails: Boolean!, $forceSessionsLogout: Boolean) {
  authInfo: authLogin(
    provider: $provider
    configuration: $configuration
    credentials: $credentials
    linkUser: $linkUser
    forceSessionsLogout: $forceSessionsLogout
  ) {
    redirectLink
    authId
    authStatus
    userTokens {
      ...AuthToken
    }
  }
}
    
    fragment AuthToken on UserAuthToken {
  authProvider
  authConfiguration
  loginTime
  message
  origin {
    ...ObjectOriginInfo
  }
}
    
    fragment ObjectOriginInfo on ObjectOrigin {
  type
  subType
  displayName
  icon
  details @include(if: $customIncludeOriginDetails) {
    id
    required
    displayName
    description
    category
    dataType
    defaultValue
    validValues
    value
    length
    features
    order
  }
}
    ";

pub const QUERY_CREATE_TEAM: &str = "
    query createTeam($teamId: ID!, $teamName: String, $description: String, $includeMetaParameters: Boolean!) {
  team: createTeam(
    teamId: $teamId
    teamName: $teamName
    description: $description
  ) {
    ...AdminTeamInfo
  }
}
    
    fragment AdminTeamInfo on AdminTeamInfo {
  teamId
  teamName
  description
  teamPermissions
  metaParameters @include(if: $includeMetaParameters)
}
    ";

pub const QUERY_DELETE_TEAM: &str = "
    query deleteTeam($teamId: ID!, $force: Boolean) {
  deleteTeam(teamId: $teamId, force: $force)
}
    ";

pub const QUERY_GET_TEAMS_LIST: &str = "
    query getTeamsList($teamId: ID, $includeMetaParameters: Boolean!) {
  teams: listTeams(teamId: $teamId) {
    ...AdminTeamInfo
  }
}
    
    fragment AdminTeamInfo on AdminTeamInfo {
  teamId
  teamName
  description
  teamPermissions
  metaParameters @include(if: $includeMetaParameters)
}
    ";

pub const QUERY_UPDATE_TEAM: &str = "
    query updateTeam($teamId: ID!, $teamName: String, $description: String, $includeMetaParameters: Boolean!) {
  team: updateTeam(
    teamId: $teamId
    teamName: $teamName
    description: $description
  ) {
    ...AdminTeamInfo
  }
}
    
    fragment AdminTeamInfo on AdminTeamInfo {
  teamId
  teamName
  description
  teamPermissions
  metaParameters @include(if: $includeMetaParameters)
}
    ";

/// The full request body: `{query, operationName, variables}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<V> {
    pub query: &'static str,
    pub operation_name: &'static str,
    pub variables: V,
}

impl<V: Serialize> Envelope<V> {
    fn new(operation_name: &'static str, query: &'static str, variables: V) -> Self {
        Self {
            query,
            operation_name,
            variables,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginCredentials<'a> {
    pub user: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginVariables<'a> {
    pub provider: &'static str,
    pub credentials: LoginCredentials<'a>,
    pub link_user: bool,
    pub custom_include_origin_details: bool,
    pub force_sessions_logout: bool,
}

/// Variables for `getTeamsList`. `team_id` is omitted for list-all.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTeamsVariables<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<&'a str>,
    pub include_meta_parameters: bool,
    pub custom_include_base: bool,
}

/// Variables shared by `createTeam` and `updateTeam`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMutationVariables<'a> {
    pub team_id: &'a str,
    pub team_name: &'a str,
    pub description: &'a str,
    pub include_meta_parameters: bool,
    pub custom_include_base: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTeamVariables<'a> {
    pub team_id: &'a str,
    pub force: bool,
}

pub fn auth_login(credentials: &Credentials) -> Envelope<LoginVariables<'_>> {
    Envelope::new(
        OPERATION_AUTH_LOGIN,
        QUERY_AUTH_LOGIN,
        LoginVariables {
            provider: "local",
            credentials: LoginCredentials {
                user: credentials.username(),
                password: credentials.password_hash(),
            },
            link_user: false,
            custom_include_origin_details: true,
            force_sessions_logout: false,
        },
    )
}

pub fn get_all_teams() -> Envelope<ListTeamsVariables<'static>> {
    Envelope::new(
        OPERATION_GET_TEAMS_LIST,
        QUERY_GET_TEAMS_LIST,
        ListTeamsVariables {
            team_id: None,
            include_meta_parameters: false,
            custom_include_base: true,
        },
    )
}

pub fn get_team(team_id: &str) -> Envelope<ListTeamsVariables<'_>> {
    Envelope::new(
        OPERATION_GET_TEAMS_LIST,
        QUERY_GET_TEAMS_LIST,
        ListTeamsVariables {
            team_id: Some(team_id),
            include_meta_parameters: false,
            custom_include_base: true,
        },
    )
}

pub fn create_team<'a>(
    team_id: &'a str,
    team_name: &'a str,
    description: &'a str,
) -> Envelope<TeamMutationVariables<'a>> {
    Envelope::new(
        OPERATION_CREATE_TEAM,
        QUERY_CREATE_TEAM,
        team_mutation(team_id, team_name, description),
    )
}

pub fn update_team<'a>(
    team_id: &'a str,
    team_name: &'a str,
    description: &'a str,
) -> Envelope<TeamMutationVariables<'a>> {
    Envelope::new(
        OPERATION_UPDATE_TEAM,
        QUERY_UPDATE_TEAM,
        team_mutation(team_id, team_name, description),
    )
}

/// Delete is always forced; the server contract offers no softer variant
/// that this client uses.
pub fn delete_team(team_id: &str) -> Envelope<DeleteTeamVariables<'_>> {
    Envelope::new(
        OPERATION_DELETE_TEAM,
        QUERY_DELETE_TEAM,
        DeleteTeamVariables {
            team_id,
            force: true,
        },
    )
}

fn team_mutation<'a>(
    team_id: &'a str,
    team_name: &'a str,
    description: &'a str,
) -> TeamMutationVariables<'a> {
    TeamMutationVariables {
        team_id,
        team_name,
        description,
        include_meta_parameters: false,
        custom_include_base: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn login_envelope_carries_hashed_password() {
        let creds = Credentials::new("alice", "secret");
        let body = serde_json::to_value(auth_login(&creds)).unwrap();
        assert_eq!(body["operationName"], "authLogin");
        assert_eq!(body["query"], QUERY_AUTH_LOGIN);
        assert_eq!(
            body["variables"],
            json!({
                "provider": "local",
                "credentials": {"user": "alice", "password": "5EBE2294ECD0E0F08EAB7690D2A6EE69"},
                "linkUser": false,
                "customIncludeOriginDetails": true,
                "forceSessionsLogout": false,
            })
        );
    }

    #[test]
    fn list_and_get_share_one_query() {
        let all = serde_json::to_value(get_all_teams()).unwrap();
        let one = serde_json::to_value(get_team("t1")).unwrap();
        assert_eq!(all["operationName"], "getTeamsList");
        assert_eq!(one["operationName"], "getTeamsList");
        assert_eq!(all["query"], one["query"]);
        assert!(all["variables"].get("teamId").is_none());
        assert_eq!(one["variables"]["teamId"], "t1");
    }

    #[test]
    fn user_input_never_reaches_query_text() {
        let hostile = "x\") { __schema { types { name } } }";
        let body = serde_json::to_value(create_team(hostile, hostile, hostile)).unwrap();
        assert_eq!(body["query"], QUERY_CREATE_TEAM);
        assert_eq!(body["variables"]["teamId"], hostile);
    }

    #[test]
    fn update_uses_update_operation() {
        let body = serde_json::to_value(update_team("t1", "Team", "d")).unwrap();
        assert_eq!(body["operationName"], "updateTeam");
        assert_eq!(
            body["variables"],
            json!({
                "teamId": "t1",
                "teamName": "Team",
                "description": "d",
                "includeMetaParameters": false,
                "customIncludeBase": true,
            })
        );
    }

    #[test]
    fn query_text_keeps_indented_separator_lines() {
        for query in [QUERY_CREATE_TEAM, QUERY_GET_TEAMS_LIST, QUERY_UPDATE_TEAM] {
            assert!(query.starts_with("\n    query "));
            assert!(query.contains("}\n    \n    fragment AdminTeamInfo on AdminTeamInfo {"));
            assert!(query.ends_with("}\n    "));
        }
        assert!(QUERY_AUTH_LOGIN.contains("}\n    \n    fragment AuthToken on UserAuthToken {"));
        assert!(QUERY_AUTH_LOGIN
            .contains("}\n    \n    fragment ObjectOriginInfo on ObjectOrigin {"));
        assert!(QUERY_DELETE_TEAM.ends_with("}\n    "));
    }

    #[test]
    fn delete_is_always_forced() {
        let body = serde_json::to_value(delete_team("t1")).unwrap();
        assert_eq!(body["operationName"], "deleteTeam");
        assert_eq!(body["variables"], json!({"teamId": "t1", "force": true}));
    }
}
