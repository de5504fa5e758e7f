//! Parallel-fanout DNS A-record resolver.
//!
//! [`Engine::resolve`] queries several recursive resolvers over UDP in
//! parallel and returns the first valid answer, retrying within an overall
//! deadline. The engine is synchronous, blocking, and single-threaded in
//! its own I/O; parallelism comes only from fanning one datagram out to
//! several servers and multiplexing replies on one socket per attempt.

pub mod answer;
pub mod config;
pub mod counter;
pub mod dispatch;
pub mod encode;
pub mod error;
pub mod header;
pub mod recv;
pub mod validate;

pub use config::ResolverConfig;
pub use error::ResolveError;

use counter::Counter;
use std::net::{Ipv4Addr, SocketAddrV4, UdpSocket};
use std::time::Instant;

/// Result of a successful call: the resolved address, its TTL in seconds,
/// and the zero-based index of the server whose reply was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub addr: Ipv4Addr,
    pub ttl: u32,
    pub server_index: usize,
}

/// The parallel query engine. Owns the per-call sequence counter and the
/// tunables (`ResolverConfig`); construct one and reuse it across calls.
pub struct Engine {
    config: ResolverConfig,
    counter: Counter,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// An engine using the spec's default tunables (8 servers, 1 retry,
    /// 500ms total budget, 300ms per-attempt receive ceiling).
    pub fn new() -> Self {
        Self::with_config(ResolverConfig::default())
    }

    pub fn with_config(config: ResolverConfig) -> Self {
        Self {
            counter: Counter::new(config.max_servers as u16),
            config,
        }
    }

    /// Resolves `hostname` to an IPv4 address by querying `servers` in
    /// parallel. `servers` must be non-empty and no longer than
    /// `config.max_servers`.
    pub fn resolve(&self, servers: &[SocketAddrV4], hostname: &str) -> Result<Resolved, ResolveError> {
        if servers.is_empty() {
            return Err(ResolveError::NoServers);
        }
        if servers.len() > self.config.max_servers {
            return Err(ResolveError::TooManyServers(self.config.max_servers));
        }

        let mut template = [0u8; encode::MAX_DATAGRAM];
        let question_len = encode::encode_query(hostname, &mut template)?;

        let base_id = self.counter.next_base();
        let n = servers.len();

        let call_start = Instant::now();
        let overall_deadline = call_start + self.config.max_timeout;
        let mut retries_left = self.config.max_retries;
        let mut last_error: Option<ResolveError> = None;
        let mut last_server: Option<usize> = None;

        loop {
            let now = Instant::now();
            let remaining = overall_deadline.saturating_duration_since(now);
            if remaining.is_zero() {
                break;
            }
            // recomputed fresh every attempt, from the current wall clock --
            // a retry must not reuse a deadline expression computed for an
            // earlier attempt.
            let window = std::cmp::min(self.config.retry_timeout, remaining);

            let socket = UdpSocket::bind("0.0.0.0:0").map_err(ResolveError::Io)?;
            socket.set_write_timeout(Some(window)).map_err(ResolveError::Io)?;

            let mut datagram = template;
            if let Err(e) = dispatch::dispatch(&socket, servers, &mut datagram[..question_len], base_id) {
                // send-failed is terminal: surfaced immediately, no retry.
                log::error!("send failed while resolving {}: {}", hostname, e);
                return Err(e);
            }

            let attempt_deadline = Instant::now() + window;
            let result = recv::receive_attempt(&socket, base_id, n, question_len, attempt_deadline);
            drop(socket); // released before the next retry or return, on every path

            if let Some((answer, server_index)) = result.answer {
                return Ok(Resolved {
                    addr: answer.addr,
                    ttl: answer.ttl,
                    server_index,
                });
            }

            last_error = result.last_error.or(last_error);
            last_server = result.last_server.or(last_server);

            if last_error.as_ref().is_some_and(ResolveError::is_terminal) {
                // e.g. NXDOMAIN: retries cannot change an authoritative negative.
                let err = last_error.unwrap();
                log::error!("{} -> {}", hostname, err);
                return Err(err);
            }

            if retries_left == 0 {
                break;
            }
            retries_left -= 1;
            log::warn!(
                "retrying {}: {}, last server heard from: {:?}",
                hostname,
                last_error
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "no reply".to_string()),
                last_server,
            );
        }

        let err = last_error.unwrap_or(ResolveError::BudgetExhausted);
        log::error!("failed to resolve {}: {}", hostname, err);
        Err(err)
    }
}
