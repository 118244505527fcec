//! Request extractors.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};

/// Fallback identifier for clients with no usable proxy headers.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Best-effort client IP, used only as a rate-limit key.
///
/// Header priority: `cf-connecting-ip`, then `x-real-ip`, then the first
/// `x-forwarded-for` entry. All of these are spoofable; this is a heuristic
/// throttling key, never an identity guarantee.
#[derive(Debug, Clone)]
pub struct ClientIp(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(cf) = parts.headers.get("cf-connecting-ip") {
            if let Ok(ip) = cf.to_str() {
                return Ok(ClientIp(ip.trim().to_string()));
            }
        }

        if let Some(real_ip) = parts.headers.get("x-real-ip") {
            if let Ok(ip) = real_ip.to_str() {
                return Ok(ClientIp(ip.trim().to_string()));
            }
        }

        if let Some(xff) = parts.headers.get("x-forwarded-for") {
            if let Ok(xff_str) = xff.to_str() {
                if let Some(ip) = xff_str.split(',').next() {
                    let ip = ip.trim();
                    if !ip.is_empty() {
                        return Ok(ClientIp(ip.to_string()));
                    }
                }
            }
        }

        Ok(ClientIp(UNKNOWN_CLIENT.to_string()))
    }
}
