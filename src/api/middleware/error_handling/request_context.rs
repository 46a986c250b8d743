use std::fmt;
use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, OriginalUri, Request};
use axum::http::{Method, Uri};

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Request fields the terminal handler logs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub ip: Option<IpAddr>,
    pub method: Method,
    pub original_url: Uri,
}

impl RequestContext {
    pub fn new(method: Method, original_url: Uri) -> Self {
        Self {
            ip: None,
            method,
            original_url,
        }
    }

    pub fn with_ip(mut self, ip: IpAddr) -> Self {
        self.ip = Some(ip);
        self
    }

    /// Capture from an incoming request.
    ///
    /// The URL is the one the client sent, before any nested router
    /// stripped a prefix. The peer address comes from `ConnectInfo`, else
    /// from the first `X-Forwarded-For` entry.
    pub fn from_request<B>(req: &Request<B>) -> Self {
        let original_url = req
            .extensions()
            .get::<OriginalUri>()
            .map(|uri| uri.0.clone())
            .unwrap_or_else(|| req.uri().clone());

        let ip = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip())
            .or_else(|| {
                req.headers()
                    .get(FORWARDED_FOR)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.split(',').next())
                    .and_then(|first| first.trim().parse().ok())
            });

        Self {
            ip,
            method: req.method().clone(),
            original_url,
        }
    }

    pub fn display_ip(&self) -> DisplayIp<'_> {
        DisplayIp(self.ip.as_ref())
    }
}

/// Renders the peer address, `-` when unknown
pub struct DisplayIp<'a>(Option<&'a IpAddr>);

impl fmt::Display for DisplayIp<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(ip) => write!(f, "{}", ip),
            None => f.write_str("-"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http;

    #[test]
    fn test_prefers_connect_info() {
        let mut req = http::Request::builder()
            .method(Method::POST)
            .uri("/v1/items?page=2")
            .header(FORWARDED_FOR, "10.0.0.9")
            .body(Body::empty())
            .unwrap();
        let peer: SocketAddr = "192.168.1.5:40000".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(peer));

        let ctx = RequestContext::from_request(&req);

        assert_eq!(ctx.method, Method::POST);
        assert_eq!(ctx.original_url, "/v1/items?page=2");
        assert_eq!(ctx.display_ip().to_string(), "192.168.1.5");
    }

    #[test]
    fn test_falls_back_to_forwarded_for() {
        let req = http::Request::builder()
            .uri("/items")
            .header(FORWARDED_FOR, "203.0.113.7, 10.0.0.1")
            .body(Body::empty())
            .unwrap();

        let ctx = RequestContext::from_request(&req);
        assert_eq!(ctx.display_ip().to_string(), "203.0.113.7");
    }

    #[test]
    fn test_uses_original_uri_when_nested() {
        let mut req = http::Request::builder()
            .uri("/items")
            .body(Body::empty())
            .unwrap();
        req.extensions_mut()
            .insert(OriginalUri("/api/items".parse().unwrap()));

        let ctx = RequestContext::from_request(&req);
        assert_eq!(ctx.original_url, "/api/items");
        assert_eq!(ctx.display_ip().to_string(), "-");
    }
}
