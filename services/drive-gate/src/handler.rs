//! Request router / session state machine
//!
//! Every inbound request lands here and is classified against the session
//! cookie (or, on the callback path, the callback query parameters) into one
//! of the `RequestState` arms; the handler then performs the I/O that arm
//! implies. The three external capabilities (provider, store, id issuer) and
//! the clock are injected as trait objects so tests can script them.
//!
//! Per-branch behavior is a linear sequence of awaited calls; the only
//! concurrency is the logout path, which detaches revoke+remove from the
//! response (see `spawn_logout_cleanup`).

use std::sync::Arc;
use std::sync::atomic::Ordering;

use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum_extra::extract::cookie::Cookie;
use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};

use google_auth::DriveProvider;
use session::{IdIssuer, SessionStore};

use crate::clock::Clock;
use crate::error::AppError;
use crate::metrics::{self, ServiceMetrics};
use crate::render;
use crate::state::{
    AUTH_COOKIE, CallbackKind, RequestState, classify_callback, cookie_candidate, query_param,
};

/// Value the session cookie is overwritten with on logout.
const EXPIRED_COOKIE_VALUE: &str = "deleted";

/// Shared application state accessible from all handlers
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn DriveProvider>,
    pub store: Arc<dyn SessionStore>,
    pub ids: Arc<dyn IdIssuer>,
    pub clock: Arc<dyn Clock>,
    /// Derive request origins as http:// instead of https://
    pub local: bool,
    /// Host used when a request carries no Host header
    pub fallback_host: String,
    pub metrics: ServiceMetrics,
}

/// Build the axum router: the callback route plus a fallback that gates
/// everything else behind the session check.
pub fn build_router(state: AppState, max_connections: usize) -> Router {
    Router::new()
        .route("/auth", get(auth_callback))
        .fallback(gated)
        .layer(tower::limit::ConcurrencyLimitLayer::new(max_connections))
        .with_state(state)
}

fn new_request_id() -> String {
    format!("req_{}", uuid::Uuid::new_v4().as_simple())
}

/// The origin browsers reached us at, reconstructed from the Host header.
/// Feeds the OAuth redirect_uri, which must be stable across the login
/// round trip.
fn request_origin(app: &AppState, headers: &HeaderMap) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(&app.fallback_host);
    let scheme = if app.local { "http" } else { "https" };
    format!("{scheme}://{host}")
}

/// Plain 302 with an optional Set-Cookie.
fn found(location: &str, cookie: Option<Cookie<'static>>) -> Response {
    let mut builder = Response::builder()
        .status(StatusCode::FOUND)
        .header(header::LOCATION, location);
    if let Some(cookie) = cookie {
        builder = builder.header(header::SET_COOKIE, cookie.to_string());
    }
    builder.body(Body::empty()).unwrap_or_else(|e| {
        error!(error = %e, "failed to build redirect response");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    })
}

fn session_cookie(value: &str, expires_at: i64) -> Cookie<'static> {
    let expires =
        OffsetDateTime::from_unix_timestamp(expires_at).unwrap_or(OffsetDateTime::UNIX_EPOCH);
    Cookie::build((AUTH_COOKIE, value.to_owned()))
        .secure(true)
        .http_only(true)
        .expires(expires)
        .build()
}

fn expired_cookie() -> Cookie<'static> {
    session_cookie(EXPIRED_COOKIE_VALUE, 0)
}

/// Redirect an unauthenticated request to the provider login page. The
/// original query string travels in `state` so the post-login redirect can
/// restore it; no cookie is set here.
fn login_redirect(app: &AppState, headers: &HeaderMap, uri: &Uri, state: RequestState) -> Response {
    metrics::record_request(state.label());
    info!(state = ?state, "redirecting to login");

    let redirect_uri = format!("{}/auth", request_origin(app, headers));
    let packed_state = match uri.query() {
        Some(query) if !query.is_empty() => urlencoding::encode(&format!("?{query}")).into_owned(),
        _ => String::new(),
    };
    let login_url = app.provider.authorization_url(&redirect_uri, &packed_state);
    found(&login_url, None)
}

/// OAuth callback: classify, exchange the code, mint a session, and send the
/// browser back where it started.
#[instrument(skip_all, fields(request_id = %new_request_id()))]
async fn auth_callback(
    State(app): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response, AppError> {
    app.metrics.requests_total.fetch_add(1, Ordering::Relaxed);

    let query = uri.query().unwrap_or("");
    let error = query_param(query, "error");
    let code = query_param(query, "code");

    match classify_callback(error.as_deref(), code.as_deref()) {
        CallbackKind::ProviderError(provider_error) => {
            metrics::record_request(RequestState::CallbackError.label());
            warn!(error = %provider_error, "provider reported an error on callback");
            Ok((
                StatusCode::BAD_REQUEST,
                format!("Google OAuth error: [{provider_error}]"),
            )
                .into_response())
        }
        CallbackKind::MissingCode => {
            metrics::record_request(RequestState::CallbackMissingCode.label());
            Ok((StatusCode::BAD_REQUEST, "Bad auth callback (no 'code')").into_response())
        }
        CallbackKind::Exchange { code } => {
            // Decode the redirect target before any side effect: a request
            // that cannot complete must not reach the provider or the store.
            let packed_state = query_param(query, "state").unwrap_or_default();
            let Ok(decoded) = urlencoding::decode(&packed_state) else {
                metrics::record_request(RequestState::CallbackError.label());
                return Ok(
                    (StatusCode::BAD_REQUEST, "Bad auth callback (invalid 'state')")
                        .into_response(),
                );
            };
            let target = format!("/{decoded}");

            let redirect_uri = format!("{}/auth", request_origin(&app, &headers));
            let token = app
                .provider
                .exchange_code(&redirect_uri, code)
                .await
                .map_err(AppError::Provider)?;

            let auth = app.ids.generate();
            let expiration_ms = app.clock.now_ms() + token.expires_in * 1000;
            let expires_at = expiration_ms / 1000;
            app.store
                .save(&auth, &token.access_token, expires_at)
                .await?;

            metrics::record_request(RequestState::CallbackValid.label());
            info!(expires_at, "session established");
            Ok(found(&target, Some(session_cookie(&auth, expires_at as i64))))
        }
    }
}

/// Everything except the callback: resolve the session, then dispatch on
/// path. Unauthenticated requests are redirected to login regardless of
/// path — the session check runs before the 404.
#[instrument(skip_all, fields(request_id = %new_request_id(), path = %uri.path()))]
async fn gated(
    State(app): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response, AppError> {
    app.metrics.requests_total.fetch_add(1, Ordering::Relaxed);

    let cookie_header = headers.get(header::COOKIE).and_then(|v| v.to_str().ok());
    let Some(auth) = cookie_candidate(cookie_header) else {
        let state = if cookie_header.is_some() {
            RequestState::CookiePresentNoSession
        } else {
            RequestState::NoCookie
        };
        return Ok(login_redirect(&app, &headers, &uri, state));
    };

    let Some(token) = app.store.get(auth).await? else {
        return Ok(login_redirect(
            &app,
            &headers,
            &uri,
            RequestState::CookiePresentNoSession,
        ));
    };

    metrics::record_request(RequestState::CookiePresentValidSession.label());

    match uri.path() {
        "/" => {
            // An empty q is the form submitted blank; same as no filter.
            let title_query =
                query_param(uri.query().unwrap_or(""), "q").filter(|q| !q.is_empty());
            let files = app
                .provider
                .list_files(&token, title_query.as_deref())
                .await
                .map_err(AppError::Provider)?;
            Ok(render::files_page(&files).into_response())
        }
        "/logout" => {
            spawn_logout_cleanup(&app, auth.to_owned(), token);
            Ok((
                StatusCode::OK,
                [(header::SET_COOKIE, expired_cookie().to_string())],
                "Logged out",
            )
                .into_response())
        }
        path => {
            info!(path, "not found");
            Ok((StatusCode::NOT_FOUND, "Not found").into_response())
        }
    }
}

/// Revoke the provider token and drop the session entry without holding up
/// the logout response. The two operations run together in one detached
/// task; neither failure affects the other or the browser, and both are
/// visible only in logs and counters.
fn spawn_logout_cleanup(app: &AppState, auth: String, token: String) {
    let provider = app.provider.clone();
    let store = app.store.clone();
    let background_failures = app.metrics.background_failures.clone();
    tokio::spawn(async move {
        let (revoked, removed) = tokio::join!(provider.revoke_token(&token), store.remove(&auth));
        if let Err(e) = revoked {
            background_failures.fetch_add(1, Ordering::Relaxed);
            metrics::record_background_failure("revoke");
            warn!(error = %e, "background token revocation failed");
        }
        if let Err(e) = removed {
            background_failures.fetch_add(1, Ordering::Relaxed);
            metrics::record_background_failure("remove");
            warn!(error = %e, "background session removal failed");
        }
    });
}
