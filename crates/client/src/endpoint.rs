//! Derives the dashboard WebSocket URL from the page origin.

use url::Url;

/// Fixed path of the dashboard socket on the ingestion service.
pub const DASHBOARD_WS_PATH: &str = "/dashboard/ws/dashboard";

/// Map an HTTP(S) origin to its dashboard WebSocket endpoint.
///
/// `http` becomes `ws` and `https` becomes `wss`; host and port are
/// kept, the path is replaced, and any query or fragment is dropped.
/// `ws`/`wss` origins are accepted unchanged apart from the path.
pub fn dashboard_endpoint(origin: &str) -> Result<Url, EndpointError> {
    let mut url = Url::parse(origin).map_err(|e| EndpointError::Parse {
        origin: origin.to_string(),
        source: e,
    })?;

    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => return Err(EndpointError::UnsupportedScheme(other.to_string())),
    };
    if url.host_str().is_none() {
        return Err(EndpointError::MissingHost(origin.to_string()));
    }

    url.set_scheme(scheme)
        .map_err(|()| EndpointError::UnsupportedScheme(scheme.to_string()))?;
    url.set_path(DASHBOARD_WS_PATH);
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Errors from [`dashboard_endpoint`].
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    #[error("Invalid origin {origin}: {source}")]
    Parse {
        origin: String,
        source: url::ParseError,
    },

    #[error("Unsupported origin scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Origin has no host: {0}")]
    MissingHost(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn http_origin_maps_to_ws() {
        let url = dashboard_endpoint("http://localhost:8000").unwrap();
        assert_eq!(url.as_str(), "ws://localhost:8000/dashboard/ws/dashboard");
    }

    #[test]
    fn https_origin_maps_to_wss() {
        let url = dashboard_endpoint("https://ops.example.com/dashboard/?tab=1#top").unwrap();
        assert_eq!(url.as_str(), "wss://ops.example.com/dashboard/ws/dashboard");
    }

    #[test]
    fn ws_origin_is_accepted() {
        let url = dashboard_endpoint("ws://10.0.0.5:9000").unwrap();
        assert_eq!(url.as_str(), "ws://10.0.0.5:9000/dashboard/ws/dashboard");
    }

    #[test]
    fn other_schemes_rejected() {
        assert_matches!(
            dashboard_endpoint("ftp://example.com"),
            Err(EndpointError::UnsupportedScheme(s)) if s == "ftp"
        );
    }

    #[test]
    fn garbage_rejected() {
        assert_matches!(dashboard_endpoint("not a url"), Err(EndpointError::Parse { .. }));
    }
}
