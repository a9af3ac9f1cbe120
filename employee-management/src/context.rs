//! Request-scoped context handed explicitly to handlers

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::domain::{EmployeeRole, SYSTEM_ACTOR};
use crate::ids::RequestId;
use crate::middleware::{Claims, REQUEST_ID_HEADER};

/// Who is performing the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    /// Unauthenticated requests and internal jobs
    System,
    /// Holder of a validated bearer token
    Employee {
        email: String,
        role: Option<EmployeeRole>,
    },
}

impl Actor {
    /// Name recorded in audit fields
    pub fn name(&self) -> &str {
        match self {
            Actor::System => SYSTEM_ACTOR,
            Actor::Employee { email, .. } => email,
        }
    }

    /// Whether this actor may create or edit an employee holding `target`
    ///
    /// The system actor is unrestricted; a token without a recognised role
    /// may not assign any role.
    pub fn can_assign(&self, target: EmployeeRole) -> bool {
        match self {
            Actor::System => true,
            Actor::Employee { role, .. } => role.is_some_and(|r| r.can_assign(target)),
        }
    }

    pub fn role(&self) -> Option<EmployeeRole> {
        match self {
            Actor::System => None,
            Actor::Employee { role, .. } => *role,
        }
    }
}

impl From<&Claims> for Actor {
    fn from(claims: &Claims) -> Self {
        Actor::Employee {
            email: claims.email.clone(),
            role: claims.employee_role(),
        }
    }
}

/// Per-request context: request id and acting identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: String,
    pub actor: Actor,
}

impl RequestContext {
    /// Context for work not triggered by a request, such as seeding
    pub fn system() -> Self {
        Self {
            request_id: RequestId::new().to_string(),
            actor: Actor::System,
        }
    }

    pub fn with_actor(mut self, actor: Actor) -> Self {
        self.actor = actor;
        self
    }

    /// Audit name of the actor
    pub fn actor_name(&self) -> &str {
        self.actor.name()
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let request_id = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
            .unwrap_or_else(|| RequestId::new().to_string());

        let actor = parts
            .extensions
            .get::<Claims>()
            .map(Actor::from)
            .unwrap_or(Actor::System);

        Ok(Self { request_id, actor })
    }
}
