// Route table: the declarative list of endpoints and its compilation into a router

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::fmt;

use axum::{
    handler::Handler,
    http::Method,
    response::{IntoResponse, Response},
    routing::{on, MethodFilter, MethodRouter},
    Router,
};
use thiserror::Error;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use super::errors::ApiError;
use super::handlers::{auth, children, employees, groups, organizations, parents, users};
use super::state::AppState;
use crate::config::ApiSettings;

/// Problems found while compiling the route table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteTableError {
    #[error("route {method} {path} registered twice (second time for {handler})")]
    Duplicate {
        method: Method,
        path: String,
        handler: &'static str,
    },

    #[error("route {path} ({handler}) names placeholder :{found} where {registered} already uses :{expected}")]
    PlaceholderMismatch {
        path: String,
        handler: &'static str,
        registered: String,
        expected: String,
        found: String,
    },

    #[error("route {path} ({handler}) uses unsupported method {method}")]
    UnsupportedMethod {
        method: Method,
        path: String,
        handler: &'static str,
    },
}

/// A single (path pattern, method, handler) binding
///
/// Path placeholders use the router's `:name` syntax and bind exactly one
/// segment.
pub struct RouteEntry {
    pub method: Method,
    pub path: &'static str,
    pub handler_name: &'static str,
    handler: MethodRouter<AppState>,
}

impl RouteEntry {
    pub fn new<H, T>(method: Method, path: &'static str, handler_name: &'static str, handler: H) -> Result<Self, RouteTableError>
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        let filter = MethodFilter::try_from(method.clone()).map_err(|_| RouteTableError::UnsupportedMethod {
            method: method.clone(),
            path: path.to_string(),
            handler: handler_name,
        })?;

        Ok(Self {
            method,
            path,
            handler_name,
            handler: on(filter, handler),
        })
    }

    /// Path with placeholder names erased
    ///
    /// `/groups/:id` and `/groups/:group_id` match exactly the same requests,
    /// so they count as the same pattern.
    pub fn pattern(&self) -> String {
        normalize_pattern(self.path)
    }
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("handler_name", &self.handler_name)
            .finish()
    }
}

fn normalize_pattern(path: &str) -> String {
    path.split('/')
        .map(|segment| if segment.starts_with(':') { ":" } else { segment })
        .collect::<Vec<_>>()
        .join("/")
}

/// Every endpoint the API serves, in documentation order
pub fn route_table() -> Result<Vec<RouteEntry>, RouteTableError> {
    Ok(vec![
        RouteEntry::new(Method::GET, "/health", "health_check", auth::health_check)?,
        // Groups
        RouteEntry::new(Method::POST, "/groups", "add_group_to_organization", groups::add_group_to_organization)?,
        RouteEntry::new(
            Method::GET,
            "/organizations/:organization_id/groups",
            "get_groups_by_organization",
            groups::get_groups_by_organization,
        )?,
        RouteEntry::new(Method::GET, "/groups/:group_id", "get_group", groups::get_group)?,
        RouteEntry::new(Method::POST, "/groups/link_children", "add_children_to_group", groups::add_children_to_group)?,
        // Organizations
        RouteEntry::new(Method::POST, "/organizations", "create_organization", organizations::create_organization)?,
        RouteEntry::new(Method::GET, "/organizations", "get_organizations", organizations::get_organizations)?,
        RouteEntry::new(
            Method::GET,
            "/organizations/:organization_id",
            "get_organization",
            organizations::get_organization,
        )?,
        // Auth
        RouteEntry::new(Method::GET, "/login", "login", auth::login)?,
        // Parents
        RouteEntry::new(Method::POST, "/parents", "create_parent", parents::create_parent)?,
        RouteEntry::new(Method::GET, "/parents/:tg_id", "get_parent_by_tg_id", parents::get_parent_by_tg_id)?,
        RouteEntry::new(
            Method::GET,
            "/parents/child/:child_id",
            "get_parents_by_child_id",
            parents::get_parents_by_child_id,
        )?,
        // Employees
        RouteEntry::new(Method::POST, "/employee", "create_employee", employees::create_employee)?,
        RouteEntry::new(Method::GET, "/employee/:tg_id", "get_employee_by_tg_id", employees::get_employee_by_tg_id)?,
        // Children
        RouteEntry::new(Method::POST, "/child", "create_child", children::create_child)?,
        RouteEntry::new(Method::GET, "/child/:group_id", "get_children_by_group_id", children::get_children_by_group_id)?,
        // Users
        RouteEntry::new(Method::POST, "/user/:phone", "try_merge_user_by_phone", users::try_merge_user_by_phone)?,
    ])
}

/// Compiles route entries into a router
///
/// Entries sharing a path are merged into one method router. Requests for
/// an undeclared method on a known path, or for an unknown path, get a
/// JSON 404 and never reach a handler.
pub fn compile(entries: Vec<RouteEntry>) -> Result<Router<AppState>, RouteTableError> {
    let mut seen = HashSet::new();
    let mut placeholders: HashMap<String, (&'static str, &'static str)> = HashMap::new();
    let mut paths: Vec<(&'static str, Vec<MethodRouter<AppState>>)> = Vec::new();

    for entry in entries {
        if !seen.insert((entry.method.clone(), entry.pattern())) {
            return Err(RouteTableError::Duplicate {
                method: entry.method,
                path: entry.path.to_string(),
                handler: entry.handler_name,
            });
        }
        check_placeholders(&mut placeholders, &entry)?;

        tracing::debug!(method = %entry.method, path = entry.path, handler = entry.handler_name, "route registered");

        match paths.iter_mut().find(|(path, _)| *path == entry.path) {
            Some((_, methods)) => methods.push(entry.handler),
            None => paths.push((entry.path, vec![entry.handler])),
        }
    }

    let router = paths
        .into_iter()
        .filter_map(|(path, methods)| {
            methods
                .into_iter()
                .reduce(MethodRouter::merge)
                .map(|methods| (path, methods))
        })
        .fold(Router::new(), |router, (path, methods)| {
            router.route(path, methods.fallback(not_found))
        })
        .fallback(not_found);

    Ok(router)
}

/// Routes sharing a prefix must name its placeholders the same way
///
/// The router keys placeholders by position, so `/groups/:group_id` and
/// `/groups/:id/children` cannot both be registered.
fn check_placeholders(
    placeholders: &mut HashMap<String, (&'static str, &'static str)>,
    entry: &RouteEntry,
) -> Result<(), RouteTableError> {
    let segments: Vec<&'static str> = entry.path.split('/').collect();

    for (position, segment) in segments.iter().enumerate() {
        let Some(name) = segment.strip_prefix(':') else {
            continue;
        };
        let prefix = normalize_pattern(&segments[..=position].join("/"));

        match placeholders.get(&prefix) {
            Some((expected, registered)) if *expected != name => {
                return Err(RouteTableError::PlaceholderMismatch {
                    path: entry.path.to_string(),
                    handler: entry.handler_name,
                    registered: registered.to_string(),
                    expected: expected.to_string(),
                    found: name.to_string(),
                });
            }
            Some(_) => {}
            None => {
                placeholders.insert(prefix, (name, entry.path));
            }
        }
    }

    Ok(())
}

async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}

/// Builds the application: route table, middleware and shared state
///
/// Middleware runs outermost first: tracing, CORS, panic catching, then
/// routing.
pub fn build_app(state: AppState, settings: &ApiSettings) -> Result<Router, RouteTableError> {
    let router = compile(route_table()?)?.layer(CatchPanicLayer::custom(handle_panic));

    Ok(settings
        .cors
        .apply(router)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    ApiError::internal_server_error(format!("handler panicked: {}", detail)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn noop() -> &'static str {
        "ok"
    }

    #[test]
    fn table_has_every_endpoint_once() {
        let table = route_table().unwrap();
        assert_eq!(table.len(), 17);

        let names: HashSet<_> = table.iter().map(|e| e.handler_name).collect();
        assert_eq!(names.len(), 17);
        assert!(names.contains("try_merge_user_by_phone"));
        assert!(names.contains("get_children_by_group_id"));
    }

    #[test]
    fn table_compiles() {
        assert!(compile(route_table().unwrap()).is_ok());
    }

    #[test]
    fn placeholder_names_ignored_in_pattern() {
        assert_eq!(normalize_pattern("/groups/:group_id"), "/groups/:");
        assert_eq!(normalize_pattern("/groups/:id"), "/groups/:");
        assert_eq!(normalize_pattern("/groups/link_children"), "/groups/link_children");
    }

    #[test]
    fn duplicate_registration_rejected() {
        let entries = vec![
            RouteEntry::new(Method::GET, "/groups/:group_id", "first", noop).unwrap(),
            RouteEntry::new(Method::GET, "/groups/:id", "second", noop).unwrap(),
        ];

        assert_eq!(
            compile(entries).unwrap_err(),
            RouteTableError::Duplicate {
                method: Method::GET,
                path: "/groups/:id".to_string(),
                handler: "second",
            }
        );
    }

    #[test]
    fn placeholder_names_must_agree_across_methods() {
        let entries = vec![
            RouteEntry::new(Method::GET, "/groups/:group_id", "get", noop).unwrap(),
            RouteEntry::new(Method::POST, "/groups/:id", "update", noop).unwrap(),
        ];

        assert_eq!(
            compile(entries).unwrap_err(),
            RouteTableError::PlaceholderMismatch {
                path: "/groups/:id".to_string(),
                handler: "update",
                registered: "/groups/:group_id".to_string(),
                expected: "group_id".to_string(),
                found: "id".to_string(),
            }
        );
    }

    #[test]
    fn placeholder_names_must_agree_across_nested_paths() {
        let entries = vec![
            RouteEntry::new(Method::GET, "/organizations/:organization_id", "get", noop).unwrap(),
            RouteEntry::new(Method::GET, "/organizations/:id/groups", "groups", noop).unwrap(),
        ];

        assert!(matches!(
            compile(entries).unwrap_err(),
            RouteTableError::PlaceholderMismatch { handler: "groups", .. }
        ));
    }

    #[test]
    fn static_segment_beside_placeholder_allowed() {
        let entries = vec![
            RouteEntry::new(Method::GET, "/groups/:group_id", "get", noop).unwrap(),
            RouteEntry::new(Method::POST, "/groups/link_children", "link", noop).unwrap(),
            RouteEntry::new(Method::GET, "/groups/:group_id/children", "children", noop).unwrap(),
        ];

        assert!(compile(entries).is_ok());
    }

    #[test]
    fn same_path_different_methods_allowed() {
        let entries = vec![
            RouteEntry::new(Method::GET, "/organizations", "list", noop).unwrap(),
            RouteEntry::new(Method::POST, "/organizations", "create", noop).unwrap(),
        ];

        assert!(compile(entries).is_ok());
    }

    #[test]
    fn unsupported_method_rejected() {
        let method = Method::from_bytes(b"BREW").unwrap();
        let err = RouteEntry::new(method, "/coffee", "brew", noop).unwrap_err();

        assert!(matches!(err, RouteTableError::UnsupportedMethod { handler: "brew", .. }));
    }
}
