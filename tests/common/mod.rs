//! Shared integration test harness.
//!
//! An in-memory unit of work stands in for Postgres so the full router,
//! middleware and services can be driven through `oneshot` requests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use credential_vault::api::{create_router, AppState};
use credential_vault::domain::{
    Credential, Division, MembershipChange, MembershipOutcome, NewCredential, NewUser, OrgUnit,
    User, UserRole,
};
use credential_vault::errors::{AppError, AppResult};
use credential_vault::infra::{CredentialRepository, OrgRepository, UnitOfWork, UserRepository};
use credential_vault::services::TokenService;

pub const JWT_SECRET: &[u8] = b"integration-test-secret-at-least-32-bytes";

// =============================================================================
// In-memory store
// =============================================================================

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<Uuid, User>>,
    ous: Mutex<Vec<OrgUnit>>,
    divisions: Mutex<Vec<Division>>,
    credentials: Mutex<Vec<Credential>>,
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let mut users: Vec<User> = self.users.lock().unwrap().values().cloned().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.username == new_user.username) {
            return Err(AppError::conflict("Username"));
        }

        let mut user = User::new(Uuid::new_v4(), new_user.username, new_user.password_hash);
        user.role = new_user.role;
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_role(&self, id: Uuid, role: UserRole) -> AppResult<MembershipOutcome> {
        let mut users = self.users.lock().unwrap();
        let user = users.get_mut(&id).ok_or_else(|| AppError::not_found("User"))?;
        let changed = user.update_role(role);
        Ok(MembershipOutcome {
            user: user.clone(),
            changed,
        })
    }

    async fn apply_membership(
        &self,
        id: Uuid,
        change: MembershipChange,
    ) -> AppResult<MembershipOutcome> {
        // The lock spans the whole read-modify-write
        let mut users = self.users.lock().unwrap();
        let user = users.get_mut(&id).ok_or_else(|| AppError::not_found("User"))?;
        let delta = user.apply_membership(&change);
        Ok(MembershipOutcome {
            user: user.clone(),
            changed: !delta.is_empty(),
        })
    }
}

#[async_trait]
impl OrgRepository for MemoryStore {
    async fn find_ou(&self, id: Uuid) -> AppResult<Option<OrgUnit>> {
        Ok(self.ous.lock().unwrap().iter().find(|o| o.id == id).cloned())
    }

    async fn find_ou_by_name(&self, name: &str) -> AppResult<Option<OrgUnit>> {
        Ok(self
            .ous
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.name == name)
            .cloned())
    }

    async fn list_ous(&self) -> AppResult<Vec<OrgUnit>> {
        Ok(self.ous.lock().unwrap().clone())
    }

    async fn create_ou(&self, name: String) -> AppResult<OrgUnit> {
        let mut ous = self.ous.lock().unwrap();
        if ous.iter().any(|o| o.name == name) {
            return Err(AppError::conflict("OU"));
        }
        let ou = OrgUnit::new(Uuid::new_v4(), name);
        ous.push(ou.clone());
        Ok(ou)
    }

    async fn find_division(&self, id: Uuid) -> AppResult<Option<Division>> {
        Ok(self
            .divisions
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == id)
            .cloned())
    }

    async fn find_division_by_name(&self, name: &str) -> AppResult<Option<Division>> {
        Ok(self
            .divisions
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.name == name)
            .cloned())
    }

    async fn list_divisions(&self) -> AppResult<Vec<Division>> {
        Ok(self.divisions.lock().unwrap().clone())
    }

    async fn divisions_in_ou(&self, ou_id: Uuid) -> AppResult<Vec<Division>> {
        Ok(self
            .divisions
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.is_in(&ou_id))
            .cloned()
            .collect())
    }

    async fn find_divisions(&self, ids: Vec<Uuid>) -> AppResult<Vec<Division>> {
        Ok(self
            .divisions
            .lock()
            .unwrap()
            .iter()
            .filter(|d| ids.contains(&d.id))
            .cloned()
            .collect())
    }

    async fn create_division(&self, name: String, ou_id: Option<Uuid>) -> AppResult<Division> {
        let mut divisions = self.divisions.lock().unwrap();
        if divisions.iter().any(|d| d.name == name) {
            return Err(AppError::conflict("Division"));
        }
        let division = Division::new(Uuid::new_v4(), name, ou_id);
        divisions.push(division.clone());
        Ok(division)
    }

    async fn set_division_ou(&self, division_id: Uuid, ou_id: Option<Uuid>) -> AppResult<Division> {
        let mut divisions = self.divisions.lock().unwrap();
        let division = divisions
            .iter_mut()
            .find(|d| d.id == division_id)
            .ok_or_else(|| AppError::not_found("Division"))?;
        division.ou_id = ou_id;
        Ok(division.clone())
    }
}

#[async_trait]
impl CredentialRepository for MemoryStore {
    async fn list_by_division(&self, division_id: Uuid) -> AppResult<Vec<Credential>> {
        Ok(self
            .credentials
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.belongs_to(&division_id))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Credential>> {
        Ok(self
            .credentials
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn create(&self, new: NewCredential) -> AppResult<Credential> {
        let credential = Credential::new(
            Uuid::new_v4(),
            new.division_id,
            new.name,
            new.username,
            new.secret,
        );
        self.credentials.lock().unwrap().push(credential.clone());
        Ok(credential)
    }

    async fn update(&self, credential: Credential) -> AppResult<Credential> {
        let mut credentials = self.credentials.lock().unwrap();
        let slot = credentials
            .iter_mut()
            .find(|c| c.id == credential.id)
            .ok_or_else(|| AppError::not_found("Credential"))?;
        *slot = credential.clone();
        Ok(credential)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut credentials = self.credentials.lock().unwrap();
        let before = credentials.len();
        credentials.retain(|c| c.id != id);
        if credentials.len() == before {
            return Err(AppError::not_found("Credential"));
        }
        Ok(())
    }
}

pub struct MemoryUnitOfWork {
    pub store: Arc<MemoryStore>,
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.store.clone()
    }

    fn org(&self) -> Arc<dyn OrgRepository> {
        self.store.clone()
    }

    fn credentials(&self) -> Arc<dyn CredentialRepository> {
        self.store.clone()
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

// =============================================================================
// Test application
// =============================================================================

pub struct TestApp {
    pub router: Router,
    pub uow: Arc<MemoryUnitOfWork>,
    pub tokens: TokenService,
}

impl TestApp {
    pub fn new() -> Self {
        let uow = Arc::new(MemoryUnitOfWork {
            store: Arc::new(MemoryStore::default()),
        });
        let tokens = TokenService::new(JWT_SECRET).unwrap();
        let router = create_router(AppState::from_unit_of_work(uow.clone(), tokens.clone()));

        Self {
            router,
            uow,
            tokens,
        }
    }

    /// Insert a user directly, skipping password hashing.
    pub async fn user(&self, username: &str, role: UserRole) -> User {
        self.uow
            .users()
            .create(NewUser {
                username: username.to_string(),
                password_hash: "not-a-real-hash".to_string(),
                role,
            })
            .await
            .unwrap()
    }

    pub async fn ou(&self, name: &str) -> OrgUnit {
        self.uow.org().create_ou(name.to_string()).await.unwrap()
    }

    pub async fn division(&self, name: &str, ou_id: Option<Uuid>) -> Division {
        self.uow
            .org()
            .create_division(name.to_string(), ou_id)
            .await
            .unwrap()
    }

    pub async fn grant(&self, user_id: Uuid, divisions: &[Uuid]) {
        self.uow
            .users()
            .apply_membership(user_id, MembershipChange::Grant(divisions.to_vec()))
            .await
            .unwrap();
    }

    pub async fn reload(&self, user_id: Uuid) -> User {
        self.uow.users().find_by_id(user_id).await.unwrap().unwrap()
    }

    pub fn token(&self, user: &User) -> String {
        self.tokens.issue(user.id, Some(user.role)).unwrap()
    }

    pub fn token_issued_at(&self, user: &User, issued_at: DateTime<Utc>) -> String {
        self.tokens
            .issue_at(user.id, Some(user.role), issued_at)
            .unwrap()
    }

    /// Send one request through the router and decode the JSON body.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, Some(token), None).await
    }
}

/// Error code carried in an error body.
pub fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}
