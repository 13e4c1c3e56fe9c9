//! Route table and navigation guards.
//!
//! Pages are identified by [`RouteName`]. Before a navigation, [`Router`]
//! makes sure the session has been validated and then applies the guard
//! rules of the target route:
//!
//! 1. Guest-only pages (login, register) send signed-in users to the admin
//!    panel if they are admins, otherwise home.
//! 2. Pages that require a session send anonymous users home with
//!    `?auth=login&redirect=<full path>` so the login dialog can resume.
//! 3. Admin pages send non-admins home.

use std::collections::BTreeMap;

use tracing::{debug, instrument};
use url::form_urlencoded;

use crate::stores::{AuthState, AuthStore};

/// Named pages of the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteName {
    Home,
    ProductDetail,
    Cart,
    Checkout,
    Login,
    Register,
    Admin,
}

impl RouteName {
    /// Route name as used in links.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::ProductDetail => "product-detail",
            Self::Cart => "cart",
            Self::Checkout => "checkout",
            Self::Login => "login",
            Self::Register => "register",
            Self::Admin => "admin",
        }
    }

    /// Definition of this route.
    #[must_use]
    pub const fn route(self) -> &'static Route {
        match self {
            Self::Home => &HOME,
            Self::ProductDetail => &PRODUCT_DETAIL,
            Self::Cart => &CART,
            Self::Checkout => &CHECKOUT,
            Self::Login => &LOGIN,
            Self::Register => &REGISTER,
            Self::Admin => &ADMIN,
        }
    }
}

impl std::fmt::Display for RouteName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access rules attached to a route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteMeta {
    /// Only reachable without a session.
    pub guest_only: bool,
    /// Requires a session.
    pub requires_auth: bool,
    /// Requires an admin session.
    pub requires_admin: bool,
}

/// One entry of the route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    /// Route name.
    pub name: RouteName,
    /// Path pattern; `:param` segments capture one path segment.
    pub pattern: &'static str,
    /// Page title.
    pub title: &'static str,
    /// Message key of the localized page title.
    pub title_key: &'static str,
    /// Access rules.
    pub meta: RouteMeta,
}

const PUBLIC: RouteMeta = RouteMeta {
    guest_only: false,
    requires_auth: false,
    requires_admin: false,
};

const HOME: Route = Route {
    name: RouteName::Home,
    pattern: "/",
    title: "Shop - Home",
    title_key: "routes.home",
    meta: PUBLIC,
};

const PRODUCT_DETAIL: Route = Route {
    name: RouteName::ProductDetail,
    pattern: "/product/:id",
    title: "Product Details",
    title_key: "routes.product_detail",
    meta: PUBLIC,
};

const CART: Route = Route {
    name: RouteName::Cart,
    pattern: "/cart",
    title: "Shopping Cart",
    title_key: "routes.cart",
    meta: PUBLIC,
};

const CHECKOUT: Route = Route {
    name: RouteName::Checkout,
    pattern: "/checkout",
    title: "Checkout",
    title_key: "routes.checkout",
    meta: PUBLIC,
};

const LOGIN: Route = Route {
    name: RouteName::Login,
    pattern: "/login",
    title: "Login",
    title_key: "routes.login",
    meta: RouteMeta {
        guest_only: true,
        ..PUBLIC
    },
};

const REGISTER: Route = Route {
    name: RouteName::Register,
    pattern: "/register",
    title: "Register",
    title_key: "routes.register",
    meta: RouteMeta {
        guest_only: true,
        ..PUBLIC
    },
};

const ADMIN: Route = Route {
    name: RouteName::Admin,
    pattern: "/admin",
    title: "Admin Panel",
    title_key: "routes.admin",
    meta: RouteMeta {
        guest_only: false,
        requires_auth: true,
        requires_admin: true,
    },
};

/// The storefront route table, in match order.
pub static ROUTES: [Route; 7] = [HOME, PRODUCT_DETAIL, CART, CHECKOUT, LOGIN, REGISTER, ADMIN];

/// A path matched against the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    /// Matched route.
    pub route: &'static Route,
    /// Captured `:param` segments.
    pub params: BTreeMap<String, String>,
    /// Path including query string, as navigated to.
    pub full_path: String,
}

impl ResolvedRoute {
    /// A captured path parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Match `path` (optionally with a query string or fragment) against the
/// route table. Unknown paths resolve to `None`.
///
/// ```rust
/// # use bazaar_storefront::router::{resolve, RouteName};
/// let resolved = resolve("/product/42?ref=home").unwrap();
/// assert_eq!(resolved.route.name, RouteName::ProductDetail);
/// assert_eq!(resolved.param("id"), Some("42"));
/// assert!(resolve("/nowhere").is_none());
/// ```
#[must_use]
pub fn resolve(path: &str) -> Option<ResolvedRoute> {
    let full_path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };

    let path_only = full_path
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let segments: Vec<&str> = path_only.split('/').filter(|s| !s.is_empty()).collect();

    ROUTES.iter().find_map(|route| {
        let pattern: Vec<&str> = route.pattern.split('/').filter(|s| !s.is_empty()).collect();
        if pattern.len() != segments.len() {
            return None;
        }

        let mut params = BTreeMap::new();
        for (expected, actual) in pattern.iter().zip(&segments) {
            if let Some(name) = expected.strip_prefix(':') {
                params.insert(name.to_string(), (*actual).to_string());
            } else if expected != actual {
                return None;
            }
        }

        Some(ResolvedRoute {
            route,
            params,
            full_path: full_path.clone(),
        })
    })
}

/// Redirect target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Target route.
    pub name: RouteName,
    /// Query parameters, in order.
    pub query: Vec<(String, String)>,
}

impl Location {
    /// Location of a route without query parameters.
    #[must_use]
    pub const fn named(name: RouteName) -> Self {
        Self {
            name,
            query: Vec::new(),
        }
    }

    /// Render as a path with an encoded query string.
    ///
    /// ```rust
    /// # use bazaar_storefront::router::{Location, RouteName};
    /// let location = Location {
    ///     name: RouteName::Home,
    ///     query: vec![("redirect".into(), "/admin?tab=users".into())],
    /// };
    /// assert_eq!(location.to_path(), "/?redirect=%2Fadmin%3Ftab%3Dusers");
    /// ```
    #[must_use]
    pub fn to_path(&self) -> String {
        let path = self.name.route().pattern;
        if self.query.is_empty() {
            return path.to_string();
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.query)
            .finish();
        format!("{path}?{query}")
    }
}

/// Outcome of the navigation guards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Proceed to the requested page.
    Allow,
    /// Go somewhere else instead.
    Redirect(Location),
}

/// Apply the guard rules of `to` for a session.
#[must_use]
pub fn guard(to: &ResolvedRoute, session: &AuthState) -> Navigation {
    let meta = to.route.meta;
    let authenticated = session.is_authenticated();
    let admin = session.is_admin();

    if meta.guest_only && authenticated {
        let target = if admin {
            RouteName::Admin
        } else {
            RouteName::Home
        };
        return Navigation::Redirect(Location::named(target));
    }

    if meta.requires_auth && !authenticated {
        return Navigation::Redirect(Location {
            name: RouteName::Home,
            query: vec![
                ("auth".to_string(), "login".to_string()),
                ("redirect".to_string(), to.full_path.clone()),
            ],
        });
    }

    if meta.requires_admin && !admin {
        return Navigation::Redirect(Location::named(RouteName::Home));
    }

    Navigation::Allow
}

/// Runs the navigation guards against the live session.
#[derive(Debug, Clone)]
pub struct Router {
    auth: AuthStore,
}

impl Router {
    /// Create a router over the session store.
    #[must_use]
    pub const fn new(auth: AuthStore) -> Self {
        Self { auth }
    }

    /// Validate the session if needed, then apply the guards of `to`.
    #[instrument(skip(self, to), fields(path = %to.full_path, route = %to.route.name))]
    pub async fn before_each(&self, to: &ResolvedRoute) -> Navigation {
        self.auth.init_auth(false).await;
        let navigation = guard(to, &self.auth.state());
        debug!(?navigation, "Navigation guard evaluated");
        navigation
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use serde_json::json;

    use super::*;
    use crate::api::User;

    fn session(role: Option<&str>) -> AuthState {
        let user = role.map(|role| {
            serde_json::from_value::<User>(json!({
                "id": 1,
                "email": "a@example.com",
                "full_name": "A",
                "provider": "local",
                "role": role
            }))
            .unwrap()
        });
        AuthState {
            token: user.as_ref().map(|_| SecretString::from("tok")),
            user,
            initialized: true,
            ..AuthState::default()
        }
    }

    fn go(path: &str, session: &AuthState) -> Navigation {
        guard(&resolve(path).unwrap(), session)
    }

    #[test]
    fn test_resolve_routes() {
        assert_eq!(resolve("/").unwrap().route.name, RouteName::Home);
        assert_eq!(resolve("").unwrap().route.name, RouteName::Home);
        assert_eq!(resolve("/cart/").unwrap().route.name, RouteName::Cart);
        assert_eq!(resolve("admin").unwrap().route.name, RouteName::Admin);
        assert!(resolve("/product").is_none());
        assert!(resolve("/product/1/reviews").is_none());
    }

    #[test]
    fn test_resolve_keeps_full_path() {
        let resolved = resolve("/checkout?step=2#top").unwrap();
        assert_eq!(resolved.route.name, RouteName::Checkout);
        assert_eq!(resolved.full_path, "/checkout?step=2#top");
    }

    #[test]
    fn test_guest_only_redirects_signed_in_users() {
        assert_eq!(
            go("/login", &session(Some("user"))),
            Navigation::Redirect(Location::named(RouteName::Home))
        );
        assert_eq!(
            go("/register", &session(Some("admin"))),
            Navigation::Redirect(Location::named(RouteName::Admin))
        );
        assert_eq!(go("/login", &session(None)), Navigation::Allow);
    }

    #[test]
    fn test_requires_auth_redirects_with_resume_path() {
        let Navigation::Redirect(location) = go("/admin?tab=users", &session(None)) else {
            panic!("expected redirect");
        };
        assert_eq!(location.name, RouteName::Home);
        assert_eq!(
            location.query,
            vec![
                ("auth".to_string(), "login".to_string()),
                ("redirect".to_string(), "/admin?tab=users".to_string()),
            ]
        );
        assert_eq!(
            location.to_path(),
            "/?auth=login&redirect=%2Fadmin%3Ftab%3Dusers"
        );
    }

    #[test]
    fn test_requires_admin_redirects_customers() {
        assert_eq!(
            go("/admin", &session(Some("user"))),
            Navigation::Redirect(Location::named(RouteName::Home))
        );
        assert_eq!(go("/admin", &session(Some("admin"))), Navigation::Allow);
    }

    #[test]
    fn test_public_routes_allow_everyone() {
        for path in ["/", "/product/3", "/cart", "/checkout"] {
            assert_eq!(go(path, &session(None)), Navigation::Allow, "{path}");
        }
    }

    #[test]
    fn test_every_route_name_has_a_definition() {
        for route in &ROUTES {
            assert_eq!(route.name.route(), route);
        }
    }
}
