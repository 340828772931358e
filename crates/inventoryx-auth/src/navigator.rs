//! Navigation seam for forced-logout and guard redirects
//!
//! The store routes the user to the login entry point when the session is
//! torn down, and the guard resolves role failures to the authenticated
//! landing page. Both express the routing decision through this trait so the
//! embedding application owns the actual navigation; tests inject a
//! recording implementation.

/// Client routing targets this library can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The login entry point.
    Login,
    /// The default authenticated landing page.
    Home,
}

/// Sink for navigation requests.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that drops every request. For embedders that handle routing
/// from guard decisions alone.
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, _route: Route) {}
}
