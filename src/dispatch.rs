//! Dispatcher: assigns a unique transaction ID per server and sends the
//! encoded datagram to every server in order.

use crate::error::ResolveError;
use crate::header;
use std::net::{SocketAddrV4, UdpSocket};

/// Overwrites the ID field with `base_id + i` for each server `i` and
/// sends exactly `datagram.len()` octets to it. A short send is fatal and
/// surfaced immediately -- it is not retried.
pub fn dispatch(
    socket: &UdpSocket,
    servers: &[SocketAddrV4],
    datagram: &mut [u8],
    base_id: u16,
) -> Result<(), ResolveError> {
    for (i, server) in servers.iter().enumerate() {
        header::set_id(datagram, base_id.wrapping_add(i as u16));
        let sent = socket
            .send_to(datagram, server)
            .map_err(ResolveError::SendFailed)?;
        if sent != datagram.len() {
            return Err(ResolveError::SendFailed(std::io::Error::other(
                "short write to resolver socket",
            )));
        }
    }
    Ok(())
}
