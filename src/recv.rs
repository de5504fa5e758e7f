//! Receive loop: waits on a UDP socket within a shrinking deadline,
//! accepting datagrams until one passes all checks or the attempt's budget
//! expires.

use crate::answer::{self, Answer};
use crate::error::ResolveError;
use crate::validate::{self, Verdict};
use std::io::ErrorKind;
use std::net::UdpSocket;
use std::time::Instant;

pub struct AttemptResult {
    pub answer: Option<(Answer, usize)>,
    pub last_error: Option<ResolveError>,
    pub last_server: Option<usize>,
}

/// Runs one attempt: accepts datagrams on `socket` until one passes the
/// validator and parser, all `n` expected servers have been heard from, or
/// `deadline` passes.
pub fn receive_attempt(
    socket: &UdpSocket,
    base_id: u16,
    n: usize,
    question_len: usize,
    deadline: Instant,
) -> AttemptResult {
    let mut buf = [0u8; 512];
    let mut heard_from = 0usize;
    let mut last_error = None;
    let mut last_server = None;

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        if socket.set_read_timeout(Some(remaining)).is_err() {
            break;
        }

        let len = match socket.recv_from(&mut buf) {
            Ok((len, _src)) => len,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => break,
            Err(e) => {
                last_error = Some(ResolveError::RecvFailed(e));
                break;
            }
        };

        if len < 12 {
            log::debug!("discarding malformed datagram ({} octets)", len);
            continue;
        }

        match validate::validate(&buf[..len], base_id, n) {
            Verdict::Accept { server_index } => match answer::parse_answer(&buf[..len], question_len) {
                Ok(ans) => {
                    return AttemptResult {
                        answer: Some((ans, server_index)),
                        last_error: None,
                        last_server: Some(server_index),
                    };
                }
                Err(e) => {
                    log::debug!("server {} sent unparsable answer: {}", server_index, e);
                    heard_from += 1;
                    last_server = Some(server_index);
                    last_error = Some(e);
                }
            },
            Verdict::Reject { server_index, err } => {
                if let Some(idx) = server_index {
                    heard_from += 1;
                    last_server = Some(idx);
                }
                let terminal = matches!(err, ResolveError::NxDomain);
                log::debug!("discarding reply: {}", err);
                last_error = Some(err);
                if terminal {
                    return AttemptResult {
                        answer: None,
                        last_error,
                        last_server,
                    };
                }
            }
        }

        if heard_from >= n {
            break;
        }
    }

    AttemptResult {
        answer: None,
        last_error,
        last_server,
    }
}
