//! Typed error taxonomy for the resolver engine. Each variant maps to a
//! small nonzero integer via [`ResolveError::code`] for callers that want a
//! process exit status rather than a `Display` string.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("hostname label exceeds 255 octets or question does not fit the datagram")]
    EncodeOverflow,

    #[error("no resolvers configured")]
    NoServers,

    #[error("more than {0} resolvers supplied")]
    TooManyServers(usize),

    #[error("sendto failed: {0}")]
    SendFailed(#[source] std::io::Error),

    #[error("recvfrom failed: {0}")]
    RecvFailed(#[source] std::io::Error),

    #[error("socket error: {0}")]
    Io(#[source] std::io::Error),

    #[error("receive window closed with only out-of-window or malformed datagrams")]
    IdMismatchOnly,

    #[error("reply was not a standard query response (QR or OPCODE mismatch)")]
    NotAResponse,

    #[error("server returned a soft error, rcode {0}")]
    RcodeSoft(u8),

    #[error("server returned a reserved rcode {0}")]
    RcodeReserved(u8),

    #[error("server returned an empty answer section")]
    EmptyAnswer,

    #[error("name does not exist (NXDOMAIN)")]
    NxDomain,

    #[error("answer record type mismatch, expected A")]
    ParseTypeMismatch,

    #[error("answer record class mismatch (expected IN) or datagram truncated")]
    ParseClassMismatch,

    #[error("answer RDLENGTH was not 4")]
    ParseRdLength,

    #[error("call budget exhausted without a valid answer")]
    BudgetExhausted,
}

impl ResolveError {
    /// Small nonzero integer code for callers (the CLI) that want a process
    /// exit status rather than a `Display` string.
    pub fn code(&self) -> i32 {
        match self {
            ResolveError::EncodeOverflow => 1,
            ResolveError::NoServers => 2,
            ResolveError::TooManyServers(_) => 3,
            ResolveError::SendFailed(_) => 4,
            ResolveError::RecvFailed(_) => 5,
            ResolveError::IdMismatchOnly => 6,
            ResolveError::NotAResponse => 7,
            ResolveError::RcodeSoft(_) => 8,
            ResolveError::RcodeReserved(_) => 9,
            ResolveError::EmptyAnswer => 10,
            ResolveError::NxDomain => 13,
            ResolveError::ParseTypeMismatch => 11,
            ResolveError::ParseClassMismatch => 12,
            ResolveError::ParseRdLength => 14,
            ResolveError::BudgetExhausted => 15,
            ResolveError::Io(_) => 16,
        }
    }

    /// Whether this error is terminal: NXDOMAIN and the pre-flight
    /// encode/config/socket errors can never be fixed by retrying.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ResolveError::EncodeOverflow
                | ResolveError::NoServers
                | ResolveError::TooManyServers(_)
                | ResolveError::SendFailed(_)
                | ResolveError::Io(_)
                | ResolveError::NxDomain
        )
    }
}
