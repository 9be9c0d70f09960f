use std::{
    collections::{BTreeMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use md5::{Digest, Md5};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "cb-session-id";
pub const GQL_PATH: &str = "/api/gql";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub team_id: String,
    pub team_name: String,
    pub description: String,
    pub team_permissions: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GqlRequest {
    pub operation_name: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub variables: Value,
}

#[derive(Deserialize)]
struct LoginVariables {
    credentials: LoginCredentials,
}

#[derive(Deserialize)]
struct LoginCredentials {
    user: String,
    password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TeamFilter {
    team_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TeamInput {
    team_id: String,
    team_name: Option<String>,
    description: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteInput {
    team_id: String,
}

/// Server state: one admin account, live sessions, and teams ordered by id.
#[derive(Debug)]
pub struct Store {
    user: String,
    password_hash: String,
    pub sessions: HashSet<String>,
    pub teams: BTreeMap<String, Team>,
    /// Issue a fresh session cookie on every authenticated response.
    pub rotate_sessions: bool,
}

impl Store {
    pub fn new(user: &str, password: &str) -> Self {
        Self {
            user: user.to_string(),
            password_hash: hex::encode_upper(Md5::digest(password.as_bytes())),
            sessions: HashSet::new(),
            teams: BTreeMap::new(),
            rotate_sessions: false,
        }
    }

    fn open_session(&mut self) -> String {
        let id = Uuid::new_v4().simple().to_string();
        self.sessions.insert(id.clone());
        id
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app(user: &str, password: &str) -> Router {
    app_with_state(Arc::new(RwLock::new(Store::new(user, password))))
}

pub fn app_with_state(db: Db) -> Router {
    Router::new()
        .route(GQL_PATH, post(graphql))
        .with_state(db)
}

pub async fn run(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}

async fn graphql(State(db): State<Db>, headers: HeaderMap, Json(req): Json<GqlRequest>) -> Response {
    debug!(operation = %req.operation_name, "graphql request");

    if req.operation_name == "authLogin" {
        return login(&db, req.variables).await;
    }

    let mut store = db.write().await;
    let Some(session) = session_from(&headers).filter(|s| store.sessions.contains(s)) else {
        return (StatusCode::FORBIDDEN, "session required").into_response();
    };

    let result = match req.operation_name.as_str() {
        "getTeamsList" => parse(req.variables).and_then(|v| list_teams(&store, v)),
        "createTeam" => parse(req.variables).and_then(|v| create_team(&mut store, v)),
        "updateTeam" => parse(req.variables).and_then(|v| update_team(&mut store, v)),
        "deleteTeam" => parse(req.variables).and_then(|v| delete_team(&mut store, v)),
        other => {
            return (StatusCode::BAD_REQUEST, format!("unknown operation: {other}")).into_response()
        }
    };

    let body = match result {
        Ok(data) => json!({ "data": data }),
        Err(message) => json!({ "data": null, "errors": [{ "message": message }] }),
    };

    if store.rotate_sessions {
        store.sessions.remove(&session);
        let fresh = store.open_session();
        return ([(header::SET_COOKIE, session_cookie(&fresh))], Json(body)).into_response();
    }
    Json(body).into_response()
}

async fn login(db: &Db, variables: Value) -> Response {
    let input: LoginVariables = match parse(variables) {
        Ok(input) => input,
        Err(message) => return graphql_error(message),
    };

    let mut store = db.write().await;
    if input.credentials.user != store.user || input.credentials.password != store.password_hash {
        info!(user = %input.credentials.user, "login rejected");
        return graphql_error("Invalid user credentials".to_string());
    }

    let session = store.open_session();
    info!(user = %input.credentials.user, "login accepted");
    let body = json!({ "data": { "authInfo": { "authStatus": "SUCCESS", "userTokens": [] } } });
    ([(header::SET_COOKIE, session_cookie(&session))], Json(body)).into_response()
}

fn list_teams(store: &Store, filter: TeamFilter) -> Result<Value, String> {
    let teams: Vec<&Team> = match filter.team_id.as_deref() {
        Some(id) => store.teams.get(id).into_iter().collect(),
        None => store.teams.values().collect(),
    };
    Ok(json!({ "teams": teams }))
}

fn create_team(store: &mut Store, input: TeamInput) -> Result<Value, String> {
    if input.team_id.is_empty() {
        return Err("Empty team ID".to_string());
    }
    if store.teams.contains_key(&input.team_id) {
        return Err(format!("Team '{}' already exists", input.team_id));
    }
    let team = Team {
        team_id: input.team_id.clone(),
        team_name: input.team_name.unwrap_or_else(|| input.team_id.clone()),
        description: input.description.unwrap_or_default(),
        team_permissions: Vec::new(),
    };
    store.teams.insert(team.team_id.clone(), team.clone());
    Ok(json!({ "team": team }))
}

fn update_team(store: &mut Store, input: TeamInput) -> Result<Value, String> {
    let team = store
        .teams
        .get_mut(&input.team_id)
        .ok_or_else(|| format!("Team '{}' not found", input.team_id))?;
    if let Some(name) = input.team_name {
        team.team_name = name;
    }
    if let Some(description) = input.description {
        team.description = description;
    }
    Ok(json!({ "team": team }))
}

fn delete_team(store: &mut Store, input: DeleteInput) -> Result<Value, String> {
    store
        .teams
        .remove(&input.team_id)
        .map(|_| json!({ "deleteTeam": true }))
        .ok_or_else(|| format!("Team '{}' not found", input.team_id))
}

fn parse<T: DeserializeOwned>(variables: Value) -> Result<T, String> {
    serde_json::from_value(variables).map_err(|e| format!("invalid variables: {e}"))
}

fn graphql_error(message: String) -> Response {
    Json(json!({ "data": null, "errors": [{ "message": message }] })).into_response()
}

fn session_cookie(id: &str) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly")
}

fn session_from(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}
