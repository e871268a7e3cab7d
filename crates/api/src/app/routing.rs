//! Route tables: ordered, per-resource `(method, path) → guards → handler` bindings.
//!
//! A table is declared once at startup, checked by [`RouteTable::validate`] and
//! turned into an axum [`Router`]. Nothing mutates it afterwards.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axum::Router;
use axum::handler::Handler;
use axum::response::Response;
use axum::routing::{MethodFilter, MethodRouter, on};
use thiserror::Error;

use crate::app::errors::{self, ApiError};
use crate::middleware::{Guard, GuardChain, run_guards};

/// The fixed set of verbs a route may bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    fn filter(self) -> MethodFilter {
        match self {
            HttpMethod::Get => MethodFilter::GET,
            HttpMethod::Post => MethodFilter::POST,
            HttpMethod::Put => MethodFilter::PUT,
            HttpMethod::Patch => MethodFilter::PATCH,
            HttpMethod::Delete => MethodFilter::DELETE,
        }
    }
}

impl core::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("route table prefix '{0}' must be a single non-empty static segment")]
    InvalidPrefix(String),

    #[error("two route tables share the prefix '{0}'")]
    DuplicatePrefix(String),

    #[error("invalid path '{path}' in table '{table}': {reason}")]
    InvalidPath {
        table: String,
        path: String,
        reason: &'static str,
    },

    #[error("duplicate route {method} {path} in table '{table}'")]
    Duplicate {
        table: String,
        method: HttpMethod,
        path: String,
    },

    #[error("paths '{first}' and '{second}' in table '{table}' differ only in parameter names")]
    ParamNameConflict {
        table: String,
        first: String,
        second: String,
    },
}

/// One binding in a [`RouteTable`].
pub struct RouteDescriptor {
    method: HttpMethod,
    path: &'static str,
    guards: Vec<Arc<dyn Guard>>,
    endpoint: MethodRouter,
}

impl RouteDescriptor {
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn guard_names(&self) -> Vec<&'static str> {
        self.guards.iter().map(|g| g.name()).collect()
    }
}

impl core::fmt::Debug for RouteDescriptor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RouteDescriptor")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("guards", &self.guard_names())
            .finish_non_exhaustive()
    }
}

/// Ordered route bindings sharing one URL prefix (`route_url`, without slashes).
#[derive(Debug)]
pub struct RouteTable {
    route_url: &'static str,
    routes: Vec<RouteDescriptor>,
}

impl RouteTable {
    pub fn new(route_url: &'static str) -> Self {
        Self {
            route_url,
            routes: Vec::new(),
        }
    }

    /// Bind an unguarded route.
    pub fn route<H, T>(self, method: HttpMethod, path: &'static str, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.guarded(method, path, Vec::<Arc<dyn Guard>>::new(), handler)
    }

    /// Bind a route behind `guards`, which run in the given order.
    pub fn guarded<H, T>(
        mut self,
        method: HttpMethod,
        path: &'static str,
        guards: impl IntoIterator<Item = Arc<dyn Guard>>,
        handler: H,
    ) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.routes.push(RouteDescriptor {
            method,
            path,
            guards: guards.into_iter().collect(),
            endpoint: on(method.filter(), handler),
        });
        self
    }

    pub fn route_url(&self) -> &'static str {
        self.route_url
    }

    /// Mount point in the composed router (`/<route_url>`).
    pub fn mount_path(&self) -> String {
        format!("/{}", self.route_url)
    }

    pub fn descriptors(&self) -> &[RouteDescriptor] {
        &self.routes
    }

    /// Reject configuration defects before anything is registered.
    pub fn validate(&self) -> Result<(), RouteTableError> {
        let prefix = self.route_url;
        if prefix.is_empty() || prefix.contains('/') || prefix.starts_with(':') {
            return Err(RouteTableError::InvalidPrefix(prefix.to_string()));
        }

        let mut seen: HashSet<(HttpMethod, &str)> = HashSet::new();
        let mut shapes: HashMap<String, &str> = HashMap::new();

        for route in &self.routes {
            let shape = path_shape(route.path).map_err(|reason| RouteTableError::InvalidPath {
                table: prefix.to_string(),
                path: route.path.to_string(),
                reason,
            })?;

            if !seen.insert((route.method, route.path)) {
                return Err(RouteTableError::Duplicate {
                    table: prefix.to_string(),
                    method: route.method,
                    path: route.path.to_string(),
                });
            }

            match shapes.get(&shape) {
                Some(first) if *first != route.path => {
                    return Err(RouteTableError::ParamNameConflict {
                        table: prefix.to_string(),
                        first: first.to_string(),
                        second: route.path.to_string(),
                    });
                }
                Some(_) => {}
                None => {
                    shapes.insert(shape, route.path);
                }
            }
        }
        Ok(())
    }

    /// Validate, then register every descriptor in declaration order.
    pub fn into_router(self) -> Result<Router, RouteTableError> {
        self.validate()?;

        // One method router per path, so guards stay per-method and the path
        // gets a single fallback for methods nothing binds.
        let mut paths: Vec<(&'static str, MethodRouter)> = Vec::new();
        for route in self.routes {
            let mut endpoint = route.endpoint;
            if !route.guards.is_empty() {
                endpoint = endpoint.route_layer(axum::middleware::from_fn_with_state(
                    GuardChain::new(route.guards),
                    run_guards,
                ));
            }
            match paths.iter_mut().find(|(path, _)| *path == route.path) {
                Some((_, existing)) => {
                    *existing = std::mem::replace(existing, MethodRouter::new()).merge(endpoint);
                }
                None => paths.push((route.path, endpoint)),
            }
        }

        let router = paths.into_iter().fold(Router::new(), |router, (path, endpoint)| {
            router.route(path, endpoint.fallback(method_not_bound))
        });
        Ok(router)
    }
}

/// Known path, unbound method. Answered like an unknown route.
pub async fn method_not_bound() -> Response {
    errors::forward(ApiError::not_found("no route matches this method and path"))
}

/// Nest every table under its prefix.
pub fn compose(app: Router, tables: Vec<RouteTable>) -> Result<Router, RouteTableError> {
    let mut prefixes = HashSet::new();
    let mut app = app;
    for table in tables {
        if !prefixes.insert(table.route_url) {
            return Err(RouteTableError::DuplicatePrefix(table.route_url.to_string()));
        }
        let mount = table.mount_path();
        tracing::debug!(
            prefix = %mount,
            routes = table.routes.len(),
            "mounting route table"
        );
        app = app.nest(&mount, table.into_router()?);
    }
    Ok(app)
}

/// Path with parameter names erased (`/products/:userId` → `/products/:`).
fn path_shape(path: &str) -> Result<String, &'static str> {
    if path == "/" {
        return Ok(path.to_string());
    }
    let rest = path.strip_prefix('/').ok_or("must start with '/'")?;

    let mut shape = String::new();
    let mut names = HashSet::new();
    for segment in rest.split('/') {
        if segment.is_empty() {
            return Err("empty segment or trailing '/'");
        }
        shape.push('/');
        match segment.strip_prefix(':') {
            Some(name) => {
                if name.is_empty() {
                    return Err("parameter without a name");
                }
                if !names.insert(name) {
                    return Err("repeated parameter name");
                }
                shape.push(':');
            }
            None => {
                if segment.contains(':') || segment.contains('*') {
                    return Err("':' and '*' are only allowed at the start of a segment as ':name'");
                }
                shape.push_str(segment);
            }
        }
    }
    Ok(shape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    async fn noop() -> StatusCode {
        StatusCode::NO_CONTENT
    }

    #[test]
    fn shape_erases_parameter_names() {
        assert_eq!(path_shape("/").unwrap(), "/");
        assert_eq!(path_shape("/products/:userId").unwrap(), "/products/:");
        assert_eq!(path_shape("/:id").unwrap(), "/:");
    }

    #[test]
    fn shape_rejects_malformed_paths() {
        assert!(path_shape("products").is_err());
        assert!(path_shape("/a//b").is_err());
        assert!(path_shape("/a/").is_err());
        assert!(path_shape("/:").is_err());
        assert!(path_shape("/:id/x/:id").is_err());
        assert!(path_shape("/a:b").is_err());
        assert!(path_shape("/*rest").is_err());
    }

    #[test]
    fn same_path_different_methods_is_fine() {
        let table = RouteTable::new("products")
            .route(HttpMethod::Get, "/", noop)
            .route(HttpMethod::Post, "/", noop)
            .route(HttpMethod::Put, "/:id", noop)
            .route(HttpMethod::Delete, "/:id", noop);
        assert_eq!(table.validate(), Ok(()));
    }

    #[test]
    fn duplicate_method_and_path_is_rejected() {
        let table = RouteTable::new("products")
            .route(HttpMethod::Get, "/", noop)
            .route(HttpMethod::Get, "/", noop);
        assert_eq!(
            table.validate(),
            Err(RouteTableError::Duplicate {
                table: "products".into(),
                method: HttpMethod::Get,
                path: "/".into(),
            })
        );
    }

    #[test]
    fn differing_parameter_names_at_same_position_are_rejected() {
        let table = RouteTable::new("products")
            .route(HttpMethod::Put, "/:id", noop)
            .route(HttpMethod::Delete, "/:productId", noop);
        assert!(matches!(
            table.validate(),
            Err(RouteTableError::ParamNameConflict { .. })
        ));
    }

    #[test]
    fn static_and_parameter_siblings_are_allowed() {
        let table = RouteTable::new("user")
            .route(HttpMethod::Get, "/", noop)
            .route(HttpMethod::Get, "/products", noop)
            .route(HttpMethod::Get, "/:id", noop)
            .route(HttpMethod::Get, "/products/:userId", noop);
        assert_eq!(table.validate(), Ok(()));
    }

    #[test]
    fn prefix_must_be_one_static_segment() {
        for bad in ["", "a/b", ":id", "/user"] {
            let table = RouteTable::new(bad).route(HttpMethod::Get, "/", noop);
            assert!(
                matches!(table.validate(), Err(RouteTableError::InvalidPrefix(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn descriptors_keep_declaration_order() {
        let table = RouteTable::new("products")
            .route(HttpMethod::Delete, "/:id", noop)
            .route(HttpMethod::Get, "/", noop);
        let order: Vec<_> = table
            .descriptors()
            .iter()
            .map(|d| (d.method(), d.path()))
            .collect();
        assert_eq!(order, [(HttpMethod::Delete, "/:id"), (HttpMethod::Get, "/")]);
    }

    #[test]
    fn compose_rejects_shared_prefix() {
        let tables = vec![
            RouteTable::new("user").route(HttpMethod::Get, "/", noop),
            RouteTable::new("user").route(HttpMethod::Post, "/", noop),
        ];
        assert!(matches!(
            compose(Router::new(), tables),
            Err(RouteTableError::DuplicatePrefix(p)) if p == "user"
        ));
    }

    #[test]
    fn invalid_table_fails_before_registration() {
        let table = RouteTable::new("products")
            .route(HttpMethod::Get, "/", noop)
            .route(HttpMethod::Get, "/", noop);
        assert!(table.into_router().is_err());
    }
}
