use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    RequestPartsExt,
    body::Body,
    extract::{MatchedPath, Path, State},
    http::{HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value as JsonValue;

use bazaar_auth::{
    AuthenticationError, Identity, IdentityResolver, Method, PolicyEvaluator, Rejection,
    RouteContext, Rule, enforce, requests_administrator,
};

use crate::app::errors::rejection_response;
use crate::context::CallerContext;

/// Shared, read-only state of the access-control layer.
#[derive(Clone)]
pub struct AccessState {
    pub resolver: Arc<IdentityResolver>,
    pub policy: Arc<PolicyEvaluator>,
    pub body_limit: usize,
}

/// Gate every matched route through identity resolution, policy evaluation
/// and enforcement, in that order.
///
/// The body is buffered only for rules that read it, and for anything but
/// signup only after the caller passed the identity gate.
///
/// Must be installed with `Router::route_layer` so the matched route template
/// is available.
pub async fn access_control(
    State(state): State<AccessState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Some(template) = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
    else {
        tracing::warn!(path = %req.uri().path(), "access control installed without a matched route");
        return rejection_response(Rejection::Forbidden);
    };

    let Ok(method) = req.method().as_str().parse::<Method>() else {
        return rejection_response(Rejection::Forbidden);
    };

    let (mut parts, body) = req.into_parts();

    // Routes without parameters fail extraction; treat that as "no params".
    let route_params = parts
        .extract::<Path<HashMap<String, String>>>()
        .await
        .map(|Path(p)| p)
        .unwrap_or_default();

    let resource_kind = state.policy.classify(&template);
    let rule = state.policy.rule_for(resource_kind, method);
    let mut body = body;
    let mut request_body = JsonValue::Null;

    // Signup has no identity gate: its body decides whether a caller matters.
    if rule == Some(Rule::PrivilegedSignup) {
        (request_body, body) = match buffer_json(body, state.body_limit).await {
            Ok(buffered) => buffered,
            Err(response) => return response,
        };
    }

    // Ordinary self-registration ignores any credential, valid or not.
    let anonymous_signup =
        rule == Some(Rule::PrivilegedSignup) && !requests_administrator(&request_body);

    let caller = if anonymous_signup {
        None
    } else {
        match resolve_caller(&state, &parts.headers).await {
            Ok(caller) => caller,
            Err(response) => return response,
        }
    };

    if caller.is_none() && rule.is_some_and(|r| r.requires_identity()) {
        return rejection_response(Rejection::Unauthorized);
    }

    // Only authenticated callers get their body buffered by the gate.
    if rule.is_some_and(|r| r.inspects_body() && r != Rule::PrivilegedSignup) {
        (request_body, body) = match buffer_json(body, state.body_limit).await {
            Ok(buffered) => buffered,
            Err(response) => return response,
        };
    }

    let ctx = RouteContext {
        method,
        resource_kind,
        route_params,
        request_body,
        caller,
    };
    let decision = state.policy.evaluate(&ctx).await;

    match enforce(&decision, ctx.caller) {
        Ok(identity) => {
            let mut req = Request::from_parts(parts, body);
            req.extensions_mut()
                .insert(CallerContext::new(identity, resource_kind));
            next.run(req).await
        }
        Err(rejection) => rejection_response(rejection),
    }
}

/// Resolve the bearer credential, if any. Store failures are a generic 403.
async fn resolve_caller(
    state: &AccessState,
    headers: &HeaderMap,
) -> Result<Option<Identity>, Response> {
    let token = match extract_bearer(headers) {
        Ok(Some(token)) => token,
        Ok(None) => return Ok(None),
        Err(rejection) => return Err(rejection_response(rejection)),
    };

    match state.resolver.resolve_from_token(token).await {
        Ok(identity) => Ok(Some(identity)),
        Err(AuthenticationError::Store(e)) => {
            tracing::error!(error = %e, "identity lookup failed");
            Err(rejection_response(Rejection::Forbidden))
        }
        Err(e) => {
            tracing::info!(error = %e, "authentication failed");
            Err(rejection_response(Rejection::Unauthorized))
        }
    }
}

/// Buffer up to `limit` bytes, returning the parsed JSON (`Null` if not JSON)
/// and a replayable body for the downstream handler.
async fn buffer_json(body: Body, limit: usize) -> Result<(JsonValue, Body), Response> {
    let bytes = match axum::body::to_bytes(body, limit).await {
        Ok(b) => b,
        Err(e) => {
            tracing::info!(error = %e, "request body rejected");
            return Err(StatusCode::PAYLOAD_TOO_LARGE.into_response());
        }
    };
    let json = serde_json::from_slice::<JsonValue>(&bytes).unwrap_or(JsonValue::Null);
    Ok((json, Body::from(bytes)))
}

/// `Ok(None)` when no credential was sent; a malformed header is a 401.
fn extract_bearer(headers: &HeaderMap) -> Result<Option<&str>, Rejection> {
    let Some(header) = headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };

    let header = header.to_str().map_err(|_| Rejection::Unauthorized)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(Rejection::Unauthorized)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(Rejection::Unauthorized);
    }

    Ok(Some(token))
}

/// Structured request log line (method, path, status, latency).
pub async fn trace_requests(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    tracing::info!(
        %method,
        %path,
        status = response.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "request handled"
    );
    response
}
