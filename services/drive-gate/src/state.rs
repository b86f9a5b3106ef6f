//! Request classification
//!
//! Pure functions over request facts (path, query, Cookie header) that decide
//! which arm of the auth flow a request takes. The handler executes the I/O
//! implied by the classification; nothing here touches the network.

/// Name of the session cookie.
pub const AUTH_COOKIE: &str = "auth";

/// The state a request resolves to once classified. Terminal for the
/// request; used for logging and per-state metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    /// No Cookie header at all
    NoCookie,
    /// Cookie header present but no usable session behind it (wrong name,
    /// empty value, or no store hit)
    CookiePresentNoSession,
    /// Session cookie resolved to a live token
    CookiePresentValidSession,
    /// Callback carrying a provider error
    CallbackError,
    /// Callback with neither error nor code
    CallbackMissingCode,
    /// Callback with a code to exchange
    CallbackValid,
}

impl RequestState {
    pub fn label(self) -> &'static str {
        match self {
            Self::NoCookie => "no_cookie",
            Self::CookiePresentNoSession => "cookie_no_session",
            Self::CookiePresentValidSession => "valid_session",
            Self::CallbackError => "callback_error",
            Self::CallbackMissingCode => "callback_missing_code",
            Self::CallbackValid => "callback_valid",
        }
    }
}

/// Extract the named cookie's value from a Cookie header.
///
/// First name match wins. An empty value counts as absent — a cookie that
/// cannot possibly resolve to a session is the same as no cookie.
pub fn find_cookie<'a>(name: &str, header: &'a str) -> Option<&'a str> {
    for part in header.split(';') {
        let mut kv = part.splitn(2, '=');
        if kv.next().map(str::trim) == Some(name) {
            return kv.next().filter(|value| !value.is_empty());
        }
    }
    None
}

/// The session-cookie value to look up, if the request carries one.
pub fn cookie_candidate(header: Option<&str>) -> Option<&str> {
    header.and_then(|h| find_cookie(AUTH_COOKIE, h))
}

/// How a callback request resolves, from its query parameters alone.
#[derive(Debug, PartialEq, Eq)]
pub enum CallbackKind<'a> {
    /// Provider reported an error; terminal 400.
    ProviderError(&'a str),
    /// Neither error nor code; terminal 400.
    MissingCode,
    /// A code to exchange for a token.
    Exchange { code: &'a str },
}

/// Classify a callback. `error` takes precedence over `code`.
pub fn classify_callback<'a>(
    error: Option<&'a str>,
    code: Option<&'a str>,
) -> CallbackKind<'a> {
    match (error, code) {
        (Some(error), _) => CallbackKind::ProviderError(error),
        (None, None) => CallbackKind::MissingCode,
        (None, Some(code)) => CallbackKind::Exchange { code },
    }
}

/// First occurrence of a query parameter, decoded once the way a browser's
/// URLSearchParams would (`+` as space, percent-sequences lossily).
pub fn query_param(query: &str, name: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}
