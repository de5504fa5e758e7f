//! Response validator: decides whether a received datagram is a usable
//! reply to the current call.

use crate::error::ResolveError;
use crate::header::{self, Rcode};

/// Outcome of checking one datagram against the call's expected-ID window
/// and RFC 1035 response shape.
pub enum Verdict {
    /// Passed every check; safe to hand to the answer parser.
    Accept { server_index: usize },
    /// Rejected. `server_index` is set whenever the ID at least fell
    /// inside the window, even though a later check failed -- so the
    /// engine can still report which server was heard from last.
    Reject {
        server_index: Option<usize>,
        err: ResolveError,
    },
}

/// `base_id`/`n` describe the call's `[base_id, base_id + n)` ID window.
/// `buf` must be at least 12 octets; callers filter shorter datagrams
/// before reaching here.
pub fn validate(buf: &[u8], base_id: u16, n: usize) -> Verdict {
    debug_assert!(buf.len() >= header::HEADER_LEN);

    let offset = header::id(buf).wrapping_sub(base_id);
    if offset as usize >= n {
        // stray reply: out-of-window IDs never affect the result and
        // never count against N.
        return Verdict::Reject {
            server_index: None,
            err: ResolveError::IdMismatchOnly,
        };
    }
    let server_index = offset as usize;

    if !header::qr(buf) || header::opcode(buf) != 0 {
        return Verdict::Reject {
            server_index: Some(server_index),
            err: ResolveError::NotAResponse,
        };
    }

    match header::rcode(buf) {
        Rcode::NoError => {}
        Rcode::NxDomain => {
            return Verdict::Reject {
                server_index: Some(server_index),
                err: ResolveError::NxDomain,
            };
        }
        Rcode::FormErr => {
            return soft(server_index, 1);
        }
        Rcode::ServFail => {
            return soft(server_index, 2);
        }
        Rcode::NotImp => {
            return soft(server_index, 4);
        }
        Rcode::Refused => {
            return soft(server_index, 5);
        }
        Rcode::Reserved(code) => {
            return Verdict::Reject {
                server_index: Some(server_index),
                err: ResolveError::RcodeReserved(code),
            };
        }
    }

    if header::ancount(buf) < 1 {
        return Verdict::Reject {
            server_index: Some(server_index),
            err: ResolveError::EmptyAnswer,
        };
    }

    Verdict::Accept { server_index }
}

fn soft(server_index: usize, code: u8) -> Verdict {
    Verdict::Reject {
        server_index: Some(server_index),
        err: ResolveError::RcodeSoft(code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header as h;

    fn response(id: u16, rcode: u8, ancount: u16) -> [u8; 12] {
        let mut buf = [0u8; 12];
        h::set_id(&mut buf, id);
        buf[2] = 0x80; // QR=1, OPCODE=0
        buf[3] = rcode;
        buf[6..8].copy_from_slice(&ancount.to_be_bytes());
        buf
    }

    #[test]
    fn accepts_in_window_noerror_with_answer() {
        let buf = response(100, 0, 1);
        assert!(matches!(
            validate(&buf, 100, 2),
            Verdict::Accept { server_index: 0 }
        ));
    }

    #[test]
    fn rejects_out_of_window_id_as_stray() {
        let buf = response(999, 0, 1);
        match validate(&buf, 100, 2) {
            Verdict::Reject { server_index, err } => {
                assert_eq!(server_index, None);
                assert!(matches!(err, ResolveError::IdMismatchOnly));
            }
            _ => panic!("expected reject"),
        }
    }

    #[test]
    fn nxdomain_is_identified_with_server_index() {
        let buf = response(101, 3, 0);
        match validate(&buf, 100, 2) {
            Verdict::Reject { server_index, err } => {
                assert_eq!(server_index, Some(1));
                assert!(matches!(err, ResolveError::NxDomain));
            }
            _ => panic!("expected reject"),
        }
    }

    #[test]
    fn servfail_is_soft_and_retriable() {
        let buf = response(100, 2, 1);
        match validate(&buf, 100, 1) {
            Verdict::Reject { err, .. } => assert!(!err.is_terminal()),
            _ => panic!("expected reject"),
        }
    }

    #[test]
    fn empty_answer_section_is_rejected() {
        let buf = response(100, 0, 0);
        match validate(&buf, 100, 1) {
            Verdict::Reject { err, .. } => assert!(matches!(err, ResolveError::EmptyAnswer)),
            _ => panic!("expected reject"),
        }
    }
}
