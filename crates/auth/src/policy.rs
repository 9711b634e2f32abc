//! Request-time policy evaluation.
//!
//! `evaluate` looks up the rule for `(resource kind, method)` in the rule table
//! and runs its predicate. Anything without an explicit rule is denied, and a
//! collaborator failure is a denial, never an allow.
//!
//! - No panics
//! - No retries (transient failures are retried at the request level)
//! - No caching across requests

use core::str::FromStr;
use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use bazaar_core::{AddressId, OrderId, OrderItemId, UserId};

use crate::{
    Decision, DenialKind, Identity, Method, RelationshipChecker, RelationshipOracle, ResourceKind,
    Role, RouteTable, Rule, RuleTable,
};

/// Everything the evaluator needs to know about one request.
#[derive(Debug, Clone)]
pub struct RouteContext {
    pub method: Method,
    pub resource_kind: ResourceKind,
    pub route_params: HashMap<String, String>,
    /// Parsed JSON body, `Null` when absent or not JSON.
    pub request_body: JsonValue,
    pub caller: Option<Identity>,
}

pub struct PolicyEvaluator {
    routes: RouteTable,
    rules: RuleTable,
    relationships: RelationshipChecker,
}

impl PolicyEvaluator {
    pub fn new(routes: RouteTable, rules: RuleTable, relationships: RelationshipChecker) -> Self {
        Self {
            routes,
            rules,
            relationships,
        }
    }

    /// Evaluator over the shipped route and rule tables.
    pub fn standard(oracle: Arc<dyn RelationshipOracle>) -> Self {
        Self::new(
            RouteTable::standard(),
            RuleTable::standard(),
            RelationshipChecker::new(oracle),
        )
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn classify(&self, route_template: &str) -> ResourceKind {
        self.routes.classify(route_template)
    }

    pub fn rule_for(&self, kind: ResourceKind, method: Method) -> Option<Rule> {
        if kind == ResourceKind::Unclassified {
            return None;
        }
        self.rules.get(kind, method)
    }

    /// Classify `route_template` and evaluate the request against it.
    pub async fn evaluate_route(
        &self,
        route_template: &str,
        method: Method,
        route_params: HashMap<String, String>,
        request_body: JsonValue,
        caller: Option<Identity>,
    ) -> Decision {
        let ctx = RouteContext {
            method,
            resource_kind: self.classify(route_template),
            route_params,
            request_body,
            caller,
        };
        self.evaluate(&ctx).await
    }

    pub async fn evaluate(&self, ctx: &RouteContext) -> Decision {
        let decision = self.decide(ctx).await;

        let caller = ctx.caller.as_ref().map(|c| c.id);
        match decision.denial {
            None => tracing::debug!(
                kind = %ctx.resource_kind,
                method = %ctx.method,
                caller = ?caller,
                reason = %decision.reason,
                "access allowed"
            ),
            Some(DenialKind::CollaboratorFailure) => tracing::error!(
                kind = %ctx.resource_kind,
                method = %ctx.method,
                caller = ?caller,
                reason = %decision.reason,
                "access denied: collaborator failure"
            ),
            Some(denial) => tracing::info!(
                kind = %ctx.resource_kind,
                method = %ctx.method,
                caller = ?caller,
                ?denial,
                reason = %decision.reason,
                "access denied"
            ),
        }

        decision
    }

    async fn decide(&self, ctx: &RouteContext) -> Decision {
        if ctx.resource_kind == ResourceKind::Unclassified {
            return Decision::deny(DenialKind::Unclassified, "route is not in the route table");
        }

        let Some(rule) = self.rules.get(ctx.resource_kind, ctx.method) else {
            return Decision::deny(
                DenialKind::NoRule,
                format!("no rule for {} on {}", ctx.method, ctx.resource_kind),
            );
        };

        match (rule, ctx.caller.as_ref()) {
            // The only rule that may run anonymously.
            (Rule::PrivilegedSignup, caller) => privileged_signup(caller, &ctx.request_body),
            (_, None) => Decision::deny(DenialKind::Unauthenticated, "no caller identity"),
            (Rule::AdminOnly, Some(caller)) => admin_only(caller),
            (Rule::SelfOrAdmin, Some(caller)) => self_or_admin(caller, &ctx.route_params),
            (Rule::SelfAndRole(role), Some(caller)) => {
                self_and_role(caller, &ctx.route_params, role)
            }
            (Rule::OwnedAddress, Some(caller)) => owned_address(caller, &ctx.route_params),
            (Rule::OrderRelationship, Some(caller)) => {
                self.order_relationship(caller, &ctx.route_params).await
            }
            (Rule::OrderItemRelationship, Some(caller)) => {
                self.order_item_relationship(caller, &ctx.route_params).await
            }
            (Rule::Authenticated, Some(_)) => Decision::allow("authenticated caller"),
            (Rule::UserUpdate, Some(caller)) => {
                user_update(caller, &ctx.route_params, &ctx.request_body)
            }
        }
    }

    async fn order_relationship(
        &self,
        caller: &Identity,
        params: &HashMap<String, String>,
    ) -> Decision {
        let Some(order_id) = param::<OrderId>(params, "orderId") else {
            return missing_param("orderId");
        };

        match self.relationships.order(caller, order_id).await {
            Ok(true) => Decision::allow("caller is linked to the order"),
            Ok(false) => Decision::deny(
                DenialKind::InsufficientPrivilege,
                "caller is not linked to the order",
            ),
            Err(e) => collaborator_failure(e),
        }
    }

    async fn order_item_relationship(
        &self,
        caller: &Identity,
        params: &HashMap<String, String>,
    ) -> Decision {
        let (Some(order_id), Some(item_id)) = (
            param::<OrderId>(params, "orderId"),
            param::<OrderItemId>(params, "itemId"),
        ) else {
            return missing_param("orderId/itemId");
        };

        // The order link gates the item query so unrelated items are never looked up.
        match self.relationships.order(caller, order_id).await {
            Ok(true) => {}
            Ok(false) => {
                return Decision::deny(
                    DenialKind::InsufficientPrivilege,
                    "caller is not linked to the order",
                );
            }
            Err(e) => return collaborator_failure(e),
        }

        match self.relationships.order_item(caller, order_id, item_id).await {
            Ok(true) => Decision::allow("caller is linked to the order item"),
            Ok(false) => Decision::deny(
                DenialKind::InsufficientPrivilege,
                "caller is not linked to the order item",
            ),
            Err(e) => collaborator_failure(e),
        }
    }
}

fn param<T: FromStr>(params: &HashMap<String, String>, name: &str) -> Option<T> {
    params.get(name).and_then(|v| v.parse().ok())
}

fn missing_param(name: &str) -> Decision {
    Decision::deny(
        DenialKind::InsufficientPrivilege,
        format!("route parameter '{name}' is missing or malformed"),
    )
}

fn collaborator_failure(err: crate::CollaboratorError) -> Decision {
    Decision::deny(DenialKind::CollaboratorFailure, err.to_string())
}

fn is_owner(caller: &Identity, params: &HashMap<String, String>) -> bool {
    param::<UserId>(params, "userId") == Some(caller.id)
}

fn admin_only(caller: &Identity) -> Decision {
    if caller.is_administrator() {
        Decision::allow("caller is an administrator")
    } else {
        Decision::deny(DenialKind::InsufficientPrivilege, "administrator role required")
    }
}

fn self_or_admin(caller: &Identity, params: &HashMap<String, String>) -> Decision {
    if is_owner(caller, params) {
        Decision::allow("caller owns the resource")
    } else if caller.is_administrator() {
        Decision::allow("caller is an administrator")
    } else {
        Decision::deny(
            DenialKind::InsufficientPrivilege,
            "caller is neither the owner nor an administrator",
        )
    }
}

fn self_and_role(caller: &Identity, params: &HashMap<String, String>, role: Role) -> Decision {
    if caller.role != role {
        return Decision::deny(
            DenialKind::InsufficientPrivilege,
            format!("{role} role required"),
        );
    }
    if !is_owner(caller, params) {
        return Decision::deny(DenialKind::InsufficientPrivilege, "caller does not own the resource");
    }
    Decision::allow(format!("caller owns the resource as {role}"))
}

fn owned_address(caller: &Identity, params: &HashMap<String, String>) -> Decision {
    if caller.is_administrator() {
        return Decision::allow("caller is an administrator");
    }
    let Some(address_id) = param::<AddressId>(params, "addressId") else {
        return missing_param("addressId");
    };
    if is_owner(caller, params) && caller.owns_address(address_id) {
        Decision::allow("address belongs to the caller")
    } else {
        Decision::deny(
            DenialKind::InsufficientPrivilege,
            "address does not belong to the caller",
        )
    }
}

/// Does an account-creation body ask for an administrator account?
pub fn requests_administrator(body: &JsonValue) -> bool {
    body.get("type").and_then(JsonValue::as_str) == Some(Role::Administrator.as_str())
}

fn privileged_signup(caller: Option<&Identity>, body: &JsonValue) -> Decision {
    if !requests_administrator(body) {
        return Decision::allow("self-registration");
    }
    match caller {
        Some(c) if c.is_administrator() => Decision::allow("administrator creating an administrator"),
        Some(_) => Decision::deny(
            DenialKind::InsufficientPrivilege,
            "only administrators may create administrators",
        ),
        None => Decision::deny(
            DenialKind::Unauthenticated,
            "creating an administrator requires an authenticated administrator",
        ),
    }
}

fn user_update(caller: &Identity, params: &HashMap<String, String>, body: &JsonValue) -> Decision {
    if body.get("type").is_some() {
        return match admin_only(caller) {
            d if d.is_allowed() => d,
            _ => Decision::deny(
                DenialKind::InsufficientPrivilege,
                "role changes require an administrator",
            ),
        };
    }
    self_or_admin(caller, params)
}
