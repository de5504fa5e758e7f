//! Tunables and the `/etc/resolv.conf` loader.
//!
//! The loader tolerates malformed lines rather than failing the whole
//! load -- a resolver shouldn't be unusable because one line of
//! `/etc/resolv.conf` doesn't parse.

use std::fs;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::path::Path;
use std::time::Duration;

/// Upper bound on the ID window width and on endpoint list length.
pub const MAX_SERVERS: usize = 8;

#[derive(Debug, Clone, Copy)]
pub struct ResolverConfig {
    /// Upper bound on how many resolvers a single call may address.
    pub max_servers: usize,
    /// Additional attempts beyond the first.
    pub max_retries: u32,
    /// Total wall-clock budget per call.
    pub max_timeout: Duration,
    /// Per-attempt receive ceiling.
    pub retry_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_servers: MAX_SERVERS,
            max_retries: 1,
            max_timeout: Duration::from_millis(500),
            retry_timeout: Duration::from_millis(300),
        }
    }
}

/// Reads `path`, recognizing `nameserver <ipv4>` lines, stopping once
/// `max_servers` entries have been collected. An unreadable file yields an
/// empty list rather than an error -- the engine itself rejects an empty
/// server list before attempting any I/O.
pub fn load_resolv_conf<P: AsRef<Path>>(path: P, max_servers: usize) -> Vec<SocketAddrV4> {
    match fs::read_to_string(path.as_ref()) {
        Ok(contents) => parse_resolv_conf(&contents, max_servers),
        Err(e) => {
            log::warn!("could not read {}: {}", path.as_ref().display(), e);
            Vec::new()
        }
    }
}

/// Parses `resolv.conf`-style text. Lines that don't start with the
/// `nameserver` keyword are ignored; a `nameserver` line with a missing or
/// unparsable (e.g. IPv6) address is skipped with a logged warning rather
/// than aborting the whole load.
pub fn parse_resolv_conf(contents: &str, max_servers: usize) -> Vec<SocketAddrV4> {
    let mut servers = Vec::new();
    for line in contents.lines() {
        if servers.len() >= max_servers {
            break;
        }
        let mut parts = line.split_whitespace();
        if parts.next() != Some("nameserver") {
            continue;
        }
        match parts.next().and_then(|s| s.parse::<Ipv4Addr>().ok()) {
            Some(addr) => servers.push(SocketAddrV4::new(addr, 53)),
            None => log::warn!("skipping unparsable nameserver line: {:?}", line),
        }
    }
    servers
}
