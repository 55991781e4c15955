use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{HeaderMap, request::Parts},
};
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use super::AppState;

/// Address recorded in the activity log for the current request.
///
/// The socket peer is used unless it is a configured trusted proxy, in which
/// case `X-Forwarded-For` (first hop) or `X-Real-IP` is honoured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub Option<String>);

impl FromRequestParts<Arc<AppState>> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());

        Ok(Self(resolve_client_ip(
            peer,
            &parts.headers,
            &state.config().server.trusted_proxy_ips,
        )))
    }
}

pub fn resolve_client_ip(
    peer: Option<IpAddr>,
    headers: &HeaderMap,
    trusted_proxies: &[String],
) -> Option<String> {
    let peer = peer.map(|ip| ip.to_canonical());

    let from_trusted_proxy = peer.is_some_and(|ip| {
        trusted_proxies
            .iter()
            .filter_map(|p| p.trim().parse::<IpAddr>().ok())
            .any(|p| p.to_canonical() == ip)
    });

    if from_trusted_proxy
        && let Some(forwarded) = forwarded_ip(headers)
    {
        return Some(forwarded.to_string());
    }

    peer.map(|ip| ip.to_string())
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let header_ip = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .and_then(|v| v.trim().parse::<IpAddr>().ok())
    };

    header_ip("x-forwarded-for").or_else(|| header_ip("x-real-ip"))
}
