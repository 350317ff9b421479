use axum::{
    extract::{Request, State},
    http::{header, HeaderName, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    Router,
};
use tower_http::cors::{AllowCredentials, AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// Headers that only an allowed origin may see
const CORS_RESPONSE_HEADERS: [HeaderName; 6] = [
    header::ACCESS_CONTROL_ALLOW_ORIGIN,
    header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
    header::ACCESS_CONTROL_ALLOW_METHODS,
    header::ACCESS_CONTROL_ALLOW_HEADERS,
    header::ACCESS_CONTROL_EXPOSE_HEADERS,
    header::ACCESS_CONTROL_MAX_AGE,
];

/// Either every value is allowed, or only the listed ones
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowList<T> {
    Any,
    Only(Vec<T>),
}

impl<T: PartialEq> AllowList<T> {
    pub fn allows(&self, value: &T) -> bool {
        match self {
            AllowList::Any => true,
            AllowList::Only(items) => items.contains(value),
        }
    }
}

/// Cross-origin policy applied to every response
///
/// # Fields
/// * `origins` - Origins that receive CORS headers
/// * `methods` - Methods advertised on preflight
/// * `headers` - Request headers advertised on preflight
/// * `allow_credentials` - Whether `Access-Control-Allow-Credentials` is sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsPolicy {
    pub origins: AllowList<HeaderValue>,
    pub methods: AllowList<Method>,
    pub headers: AllowList<HeaderName>,
    pub allow_credentials: bool,
}

impl CorsPolicy {
    /// Whether a request from `origin` gets CORS headers
    pub fn allows_origin(&self, origin: &HeaderValue) -> bool {
        self.origins.allows(origin)
    }

    /// Builds the middleware layer for this policy
    ///
    /// Browsers reject a literal `*` when credentials are allowed, so with
    /// credentials a wildcard mirrors the request instead.
    pub fn layer(&self) -> CorsLayer {
        let mirror = self.allow_credentials;

        let origin = match &self.origins {
            AllowList::Any if mirror => AllowOrigin::mirror_request(),
            AllowList::Any => AllowOrigin::any(),
            AllowList::Only(origins) => AllowOrigin::list(origins.iter().cloned()),
        };
        let methods = match &self.methods {
            AllowList::Any if mirror => AllowMethods::mirror_request(),
            AllowList::Any => AllowMethods::any(),
            AllowList::Only(methods) => AllowMethods::list(methods.iter().cloned()),
        };
        let headers = match &self.headers {
            AllowList::Any if mirror => AllowHeaders::mirror_request(),
            AllowList::Any => AllowHeaders::any(),
            AllowList::Only(headers) => AllowHeaders::list(headers.iter().cloned()),
        };

        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(self.credentials())
    }

    fn credentials(&self) -> AllowCredentials {
        if !self.allow_credentials {
            return AllowCredentials::from(false);
        }

        let origins = self.origins.clone();
        AllowCredentials::predicate(move |origin, _| origins.allows(origin))
    }

    /// Wraps `router` with this policy
    ///
    /// The CORS layer answers preflights and decorates responses. An outer
    /// middleware then strips every CORS header from responses to origins
    /// outside the allow-list, since the layer still advertises methods and
    /// headers on their preflights.
    pub fn apply<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router
            .layer(self.layer())
            .layer(middleware::from_fn_with_state(self.clone(), hide_from_unlisted_origin))
    }
}

async fn hide_from_unlisted_origin(State(policy): State<CorsPolicy>, request: Request, next: Next) -> Response {
    let unlisted = request
        .headers()
        .get(header::ORIGIN)
        .is_some_and(|origin| !policy.allows_origin(origin));

    let mut response = next.run(request).await;
    if unlisted {
        let headers = response.headers_mut();
        for name in CORS_RESPONSE_HEADERS {
            headers.remove(name);
        }
    }
    response
}
