//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled routes
//! - Look up matching route for request
//! - Return matched route or explicit miss
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan (acceptable for the handful of gateway endpoints)
//! - Explicit miss kinds rather than silent default

use crate::config::RouteConfig;
use crate::http::request::InboundRequest;
use crate::routing::matcher::{Matcher, MethodMatcher, PathMatcher};
use crate::routing::route::{Route, RouteError};

/// Why no route matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMiss {
    /// No route serves this path.
    NotFound,
    /// The path exists but not for this method.
    MethodNotAllowed,
}

#[derive(Debug)]
struct CompiledRoute {
    path: PathMatcher,
    method: MethodMatcher,
    route: Route,
}

/// Immutable set of gateway routes.
#[derive(Debug)]
pub struct Router {
    routes: Vec<CompiledRoute>,
}

impl Router {
    /// Compile routes from configuration.
    pub fn from_config(configs: &[RouteConfig]) -> Result<Self, RouteError> {
        let routes = configs
            .iter()
            .map(|config| {
                let route = Route::from_config(config)?;
                Ok(CompiledRoute {
                    path: PathMatcher::new(route.path.clone()),
                    method: MethodMatcher::new(route.method.clone()),
                    route,
                })
            })
            .collect::<Result<Vec<_>, RouteError>>()?;

        Ok(Self { routes })
    }

    /// Find the route serving this request.
    pub fn match_request(&self, req: &InboundRequest) -> Result<&Route, RouteMiss> {
        let mut path_known = false;
        for compiled in &self.routes {
            if !compiled.path.matches(req) {
                continue;
            }
            if compiled.method.matches(req) {
                return Ok(&compiled.route);
            }
            path_known = true;
        }

        if path_known {
            Err(RouteMiss::MethodNotAllowed)
        } else {
            Err(RouteMiss::NotFound)
        }
    }

    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter().map(|c| &c.route)
    }
}
