//! Connection information extractor for HTTP requests.

use std::net::{IpAddr, SocketAddr};
use std::ops::Deref;
use std::time::SystemTime;

use axum::extract::FromRequestParts;
use axum::extract::connect_info::Connected;
use axum::serve::IncomingStream;
use tokio::net::TcpListener;

/// Wrapper around [`axum_client_ip::ClientIp`] with a manual [`aide::OperationInput`]
/// impl, since the upstream type doesn't implement it.
#[derive(Debug, Clone, Copy)]
pub struct ClientIp(pub IpAddr);

impl Deref for ClientIp {
    type Target = IpAddr;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = <axum_client_ip::ClientIp as FromRequestParts<S>>::Rejection;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum_client_ip::ClientIp(ip) = axum_client_ip::ClientIp::from_request_parts(parts, state).await?;
        Ok(Self(ip))
    }
}

impl aide::OperationInput for ClientIp {}

/// Per-connection metadata threaded through `into_make_service_with_connect_info`.
///
/// Behind a proxy or load balancer, `addr` is the proxy's address, not the
/// client's; `real_ip` is left for middleware that trusts `X-Forwarded-For`
/// to populate.
#[derive(Debug, Clone)]
#[must_use]
pub struct AppConnectInfo {
    pub addr: SocketAddr,
    pub connected_at: SystemTime,
    pub real_ip: Option<IpAddr>,
}

impl AppConnectInfo {
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr, connected_at: SystemTime::now(), real_ip: None }
    }

    pub fn with_real_ip(addr: SocketAddr, real_ip: IpAddr) -> Self {
        Self { addr, connected_at: SystemTime::now(), real_ip: Some(real_ip) }
    }

    #[inline]
    pub fn client_ip(&self) -> IpAddr {
        self.real_ip.unwrap_or_else(|| self.addr.ip())
    }

    #[inline]
    pub fn client_port(&self) -> u16 {
        self.addr.port()
    }

    #[inline]
    pub fn is_private_ip(&self) -> bool {
        match self.client_ip() {
            IpAddr::V4(ipv4) => ipv4.is_private() || ipv4.is_loopback() || ipv4.is_link_local() || ipv4.is_unspecified(),
            IpAddr::V6(ipv6) => ipv6.is_loopback() || ipv6.is_unspecified() || ipv6.segments()[0] & 0xfe00 == 0xfc00,
        }
    }

    #[inline]
    pub fn is_public_ip(&self) -> bool {
        !self.is_private_ip()
    }

    #[inline]
    pub fn is_localhost(&self) -> bool {
        self.client_ip().is_loopback()
    }

    pub fn connection_duration(&self) -> Option<std::time::Duration> {
        SystemTime::now().duration_since(self.connected_at).ok()
    }

    pub fn to_log_string(&self) -> String {
        match self.real_ip {
            Some(real_ip) if real_ip != self.addr.ip() => format!("{} (via {})", real_ip, self.addr.ip()),
            _ => self.addr.to_string(),
        }
    }
}

impl Connected<IncomingStream<'_, TcpListener>> for AppConnectInfo {
    fn connect_info(stream: IncomingStream<'_, TcpListener>) -> Self {
        Self::new(SocketAddr::connect_info(stream))
    }
}

// https://github.com/programatik29/axum-server/issues/12
impl Connected<SocketAddr> for AppConnectInfo {
    fn connect_info(addr: SocketAddr) -> Self {
        Self::new(addr)
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;

    #[test]
    fn private_ip_classification() {
        let info = AppConnectInfo::new(SocketAddr::from((Ipv4Addr::new(192, 168, 1, 1), 443)));
        assert!(info.is_private_ip());
        assert!(!info.is_public_ip());
    }

    #[test]
    fn public_ip_classification() {
        let info = AppConnectInfo::new(SocketAddr::from((Ipv4Addr::new(8, 8, 8, 8), 443)));
        assert!(info.is_public_ip());
    }

    #[test]
    fn real_ip_overrides_client_ip() {
        let real_ip = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 5));
        let info = AppConnectInfo::with_real_ip(SocketAddr::from((Ipv4Addr::new(10, 0, 0, 1), 443)), real_ip);
        assert_eq!(info.client_ip(), real_ip);
        assert!(info.to_log_string().contains("via"));
    }
}
