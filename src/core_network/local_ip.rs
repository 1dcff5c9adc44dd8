use crate::config::ServerConfig;
use crate::constants::FALLBACK_PASV_ADDRESS;
use log::{debug, warn};
use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};

// Route lookups only: connecting a UDP socket sends nothing.
const PROBE_ADDRESSES: [&str; 3] = ["8.8.8.8:80", "1.1.1.1:80", "208.67.222.222:80"];

/// Finds a non-loopback IPv4 address of this host.
///
/// The address of the default route is preferred. Hosts without one (LAN-only
/// machines) fall back to the first non-loopback IPv4 interface address.
pub fn discover_local_ipv4() -> Option<Ipv4Addr> {
    route_ipv4().or_else(interface_ipv4)
}

fn route_ipv4() -> Option<Ipv4Addr> {
    let socket = match UdpSocket::bind("0.0.0.0:0") {
        Ok(socket) => socket,
        Err(e) => {
            debug!("Failed to bind probe socket: {}", e);
            return None;
        }
    };

    for probe in PROBE_ADDRESSES {
        if socket.connect(probe).is_err() {
            continue;
        }
        if let Ok(SocketAddr::V4(local)) = socket.local_addr() {
            if usable(*local.ip()) {
                return Some(*local.ip());
            }
        }
    }

    None
}

fn interface_ipv4() -> Option<Ipv4Addr> {
    let interfaces = match if_addrs::get_if_addrs() {
        Ok(interfaces) => interfaces,
        Err(e) => {
            debug!("Failed to enumerate network interfaces: {}", e);
            return None;
        }
    };

    first_usable_ipv4(
        interfaces
            .iter()
            .filter(|iface| !iface.is_loopback())
            .map(|iface| iface.ip()),
    )
}

fn first_usable_ipv4(addresses: impl IntoIterator<Item = IpAddr>) -> Option<Ipv4Addr> {
    addresses.into_iter().find_map(|ip| match ip {
        IpAddr::V4(v4) if usable(v4) => Some(v4),
        _ => None,
    })
}

fn usable(ip: Ipv4Addr) -> bool {
    !ip.is_loopback() && !ip.is_unspecified()
}

/// The address advertised in 227 replies: configured, else discovered, else loopback.
pub fn resolve_pasv_address(config: &ServerConfig) -> Ipv4Addr {
    resolve_pasv_address_with(config, discover_local_ipv4)
}

fn resolve_pasv_address_with<F>(config: &ServerConfig, discover: F) -> Ipv4Addr
where
    F: FnOnce() -> Option<Ipv4Addr>,
{
    if let Some(ip) = config.pasv_ipv4() {
        return ip;
    }

    match discover() {
        Some(ip) => {
            debug!("Discovered local address {} for PASV replies", ip);
            ip
        }
        None => {
            warn!(
                "Failed to get local IP, using {} in PASV replies",
                FALLBACK_PASV_ADDRESS
            );
            FALLBACK_PASV_ADDRESS
        }
    }
}
