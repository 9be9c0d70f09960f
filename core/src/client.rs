//! Session-authenticated client for the CloudBeaver team admin API.
//!
//! # Design
//! Every operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that decodes the response body.
//! The facade methods (`login`, `get_all_teams`, ...) glue the two
//! halves together through [`transport::exchange`] and keep the session
//! token current. They take `&mut self`: one client is one session, with a
//! single writer.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::operations::{self, Envelope};
use crate::session::{Credentials, Session};
use crate::transport::{self, Transport, UreqTransport};
use crate::types::{
    AuthLoginData, DeleteTeamData, GraphQlResponse, Team, TeamData, TeamsData,
};

/// Client for one CloudBeaver endpoint and one session.
#[derive(Debug)]
pub struct TeamClient<T: Transport = UreqTransport> {
    url: String,
    transport: T,
    credentials: Option<Credentials>,
    session: Session,
}

impl TeamClient<UreqTransport> {
    /// Build a client over HTTP. With both `username` and `password` present
    /// this logs in before returning and fails if the login fails; otherwise
    /// it returns an unauthenticated client without touching the network.
    pub fn new(
        url: Option<&str>,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, ApiError> {
        Self::from_config(&ClientConfig::new(url, username, password))
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::with_transport(UreqTransport::new(config.timeout), config)
    }
}

impl<T: Transport> TeamClient<T> {
    /// Build a client over an arbitrary transport. Same login rules as
    /// [`TeamClient::new`].
    pub fn with_transport(transport: T, config: &ClientConfig) -> Result<Self, ApiError> {
        let credentials = match (config.username.as_deref(), config.password.as_deref()) {
            (Some(user), Some(password)) => Some(Credentials::new(user, password)),
            _ => None,
        };
        let mut client = Self {
            url: config.url.clone(),
            transport,
            credentials,
            session: Session::default(),
        };
        if config.has_credentials() {
            client.login()?;
        }
        Ok(client)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Adopt a session token obtained elsewhere.
    pub fn set_session(&mut self, token: &str) {
        self.session = Session::new(token);
    }

    // -----------------------------------------------------------------------
    // Facade
    // -----------------------------------------------------------------------

    /// Log in with the stored credentials and keep the issued session.
    ///
    /// The login request never carries a session cookie. Returns the session
    /// token now held by the client.
    pub fn login(&mut self) -> Result<String, ApiError> {
        let request = self.build_login()?;
        info!(url = %self.url, "logging in to admin API");

        let exchange = transport::exchange(&self.transport, request, &Session::default(), None)?;
        if !self.session.renew(&exchange.session_token) && !self.session.is_authenticated() {
            warn!("login response carried no session cookie");
        }
        self.parse_login(&exchange.body)?;
        Ok(self.session.token().to_string())
    }

    /// All teams in server order.
    pub fn get_all_teams(&mut self, session_override: Option<&str>) -> Result<Vec<Team>, ApiError> {
        let request = self.build_get_all_teams()?;
        let body = self.send(operations::OPERATION_GET_TEAMS_LIST, request, session_override)?;
        self.parse_get_all_teams(&body)
    }

    /// The team with `team_id`. Zero or several matches is a
    /// `Cardinality` error.
    pub fn get_team(&mut self, team_id: &str, session_override: Option<&str>) -> Result<Team, ApiError> {
        let request = self.build_get_team(team_id)?;
        let body = self.send(operations::OPERATION_GET_TEAMS_LIST, request, session_override)?;
        self.parse_get_team(&body)
    }

    pub fn create_team(
        &mut self,
        team_id: &str,
        team_name: &str,
        description: &str,
        session_override: Option<&str>,
    ) -> Result<Team, ApiError> {
        let request = self.build_create_team(team_id, team_name, description)?;
        let body = self.send(operations::OPERATION_CREATE_TEAM, request, session_override)?;
        self.parse_create_team(&body)
    }

    pub fn update_team(
        &mut self,
        team_id: &str,
        team_name: &str,
        description: &str,
        session_override: Option<&str>,
    ) -> Result<Team, ApiError> {
        let request = self.build_update_team(team_id, team_name, description)?;
        let body = self.send(operations::OPERATION_UPDATE_TEAM, request, session_override)?;
        self.parse_update_team(&body)
    }

    pub fn delete_team(&mut self, team_id: &str, session_override: Option<&str>) -> Result<(), ApiError> {
        let request = self.build_delete_team(team_id)?;
        let body = self.send(operations::OPERATION_DELETE_TEAM, request, session_override)?;
        self.parse_delete_team(&body)
    }

    /// Run one exchange. A rotated cookie is persisted only for calls that
    /// used the stored session; an override pins a different session.
    fn send(
        &mut self,
        operation: &'static str,
        request: HttpRequest,
        session_override: Option<&str>,
    ) -> Result<String, ApiError> {
        debug!(operation, pinned = session_override.is_some(), "sending operation");
        let exchange =
            transport::exchange(&self.transport, request, &self.session, session_override)?;
        if session_override.is_none() && self.session.renew(&exchange.session_token) {
            debug!(operation, "session cookie rotated");
        }
        Ok(exchange.body)
    }

    // -----------------------------------------------------------------------
    // Request builders
    // -----------------------------------------------------------------------

    pub fn build_login(&self) -> Result<HttpRequest, ApiError> {
        let credentials = self
            .credentials
            .as_ref()
            .filter(|c| c.is_complete())
            .ok_or_else(|| ApiError::Config("define username and password".to_string()))?;
        self.build(&operations::auth_login(credentials))
    }

    pub fn build_get_all_teams(&self) -> Result<HttpRequest, ApiError> {
        self.build(&operations::get_all_teams())
    }

    pub fn build_get_team(&self, team_id: &str) -> Result<HttpRequest, ApiError> {
        self.build(&operations::get_team(team_id))
    }

    pub fn build_create_team(
        &self,
        team_id: &str,
        team_name: &str,
        description: &str,
    ) -> Result<HttpRequest, ApiError> {
        self.build(&operations::create_team(team_id, team_name, description))
    }

    pub fn build_update_team(
        &self,
        team_id: &str,
        team_name: &str,
        description: &str,
    ) -> Result<HttpRequest, ApiError> {
        self.build(&operations::update_team(team_id, team_name, description))
    }

    pub fn build_delete_team(&self, team_id: &str) -> Result<HttpRequest, ApiError> {
        self.build(&operations::delete_team(team_id))
    }

    fn build<V: Serialize>(&self, envelope: &Envelope<V>) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(envelope)
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest::json(&self.url, body))
    }

    // -----------------------------------------------------------------------
    // Response decoders
    // -----------------------------------------------------------------------

    pub fn parse_login(&self, body: &str) -> Result<(), ApiError> {
        let data: AuthLoginData = decode(body)?;
        if let Some(status) = data.auth_info.and_then(|info| info.auth_status) {
            debug!(auth_status = %status, "login accepted");
        }
        Ok(())
    }

    pub fn parse_get_all_teams(&self, body: &str) -> Result<Vec<Team>, ApiError> {
        let data: TeamsData = decode(body)?;
        Ok(data.teams)
    }

    pub fn parse_get_team(&self, body: &str) -> Result<Team, ApiError> {
        let mut teams = self.parse_get_all_teams(body)?;
        if teams.len() != 1 {
            return Err(ApiError::Cardinality {
                expected: 1,
                actual: teams.len(),
            });
        }
        Ok(teams.remove(0))
    }

    pub fn parse_create_team(&self, body: &str) -> Result<Team, ApiError> {
        let data: TeamData = decode(body)?;
        Ok(data.team)
    }

    pub fn parse_update_team(&self, body: &str) -> Result<Team, ApiError> {
        let data: TeamData = decode(body)?;
        Ok(data.team)
    }

    /// The server's boolean flag is not reported; success is the absence of
    /// an error.
    pub fn parse_delete_team(&self, body: &str) -> Result<(), ApiError> {
        let data: DeleteTeamData = decode(body)?;
        debug!(deleted = data.delete_team, "delete acknowledged");
        Ok(())
    }
}

/// Decode a GraphQL response body. Server-reported errors take precedence
/// over whatever partial `data` came with them.
fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let response: GraphQlResponse<serde_json::Value> =
        serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))?;
    if !response.errors.is_empty() {
        return Err(ApiError::GraphQl(
            response.errors.into_iter().map(|e| e.message).collect(),
        ));
    }
    let data = response
        .data
        .ok_or_else(|| ApiError::DeserializationError("response has no data".to_string()))?;
    serde_json::from_value(data).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
