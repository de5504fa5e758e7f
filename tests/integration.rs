//! End-to-end scenarios against the public `Engine` API, using real
//! loopback UDP sockets as stand-ins for recursive resolvers.

use parq::{Engine, ResolveError, ResolverConfig};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};
use std::thread;
use std::time::{Duration, Instant};

fn header_id(buf: &[u8]) -> u16 {
    u16::from_be_bytes([buf[0], buf[1]])
}

fn set_id(buf: &mut [u8], id: u16) {
    buf[0..2].copy_from_slice(&id.to_be_bytes());
}

fn noerror_reply(question: &[u8], ttl: u32, ip: [u8; 4]) -> Vec<u8> {
    let mut reply = question.to_vec();
    reply[2] = 0x80;
    reply[7] = 1;
    reply.push(0);
    reply.extend_from_slice(&1u16.to_be_bytes());
    reply.extend_from_slice(&1u16.to_be_bytes());
    reply.extend_from_slice(&ttl.to_be_bytes());
    reply.extend_from_slice(&4u16.to_be_bytes());
    reply.extend_from_slice(&ip);
    reply
}

fn bind_loopback() -> (UdpSocket, SocketAddrV4) {
    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    let addr = match socket.local_addr().unwrap() {
        SocketAddr::V4(a) => a,
        _ => unreachable!(),
    };
    (socket, addr)
}

#[test]
fn three_servers_one_replies_the_rest_stay_silent() {
    let (s1, a1) = bind_loopback();
    let (_s2, a2) = bind_loopback(); // silent
    let (_s3, a3) = bind_loopback(); // silent

    let handle = thread::spawn(move || {
        let mut buf = [0u8; 512];
        let (len, src) = s1.recv_from(&mut buf).unwrap();
        let reply = noerror_reply(&buf[..len], 120, [172, 217, 0, 1]);
        s1.send_to(&reply, src).unwrap();
    });

    let engine = Engine::new();
    let resolved = engine.resolve(&[a1, a2, a3], "example.com").unwrap();
    assert_eq!(resolved.addr, Ipv4Addr::new(172, 217, 0, 1));
    assert_eq!(resolved.server_index, 0);
    handle.join().unwrap();
}

#[test]
fn all_servers_silent_within_one_retry_window() {
    let (_s1, a1) = bind_loopback();
    let (_s2, a2) = bind_loopback();

    let config = ResolverConfig {
        max_retries: 0,
        max_timeout: Duration::from_millis(80),
        retry_timeout: Duration::from_millis(80),
        ..ResolverConfig::default()
    };
    let engine = Engine::with_config(config);
    let start = Instant::now();
    let err = engine.resolve(&[a1, a2], "dead.example").unwrap_err();
    assert!(matches!(err, ResolveError::BudgetExhausted));
    assert!(start.elapsed() >= Duration::from_millis(80));
}

#[test]
fn stray_datagram_from_unrelated_transaction_does_not_derail_the_call() {
    let (s1, a1) = bind_loopback();
    let stray_sender = UdpSocket::bind("127.0.0.1:0").unwrap();

    let handle = thread::spawn(move || {
        let mut buf = [0u8; 512];
        let (len, src) = s1.recv_from(&mut buf).unwrap();

        // a reply with a transaction ID far outside this call's window,
        // fired at the same destination, before the genuine reply.
        let mut bogus = buf[..len].to_vec();
        set_id(&mut bogus, header_id(&buf[..len]).wrapping_add(5000));
        bogus[2] = 0x80;
        stray_sender.send_to(&bogus, src).unwrap();

        let reply = noerror_reply(&buf[..len], 45, [8, 8, 8, 8]);
        s1.send_to(&reply, src).unwrap();
    });

    let engine = Engine::new();
    let resolved = engine.resolve(&[a1], "example.net").unwrap();
    assert_eq!(resolved.addr, Ipv4Addr::new(8, 8, 8, 8));
    handle.join().unwrap();
}

#[test]
fn empty_server_list_is_rejected_without_any_socket_io() {
    let engine = Engine::new();
    let err = engine.resolve(&[], "example.com").unwrap_err();
    assert!(matches!(err, ResolveError::NoServers));
}

#[test]
fn unresolvable_hostname_label_is_rejected_before_any_send() {
    let engine = Engine::new();
    let (_s1, a1) = bind_loopback();
    let too_long = "a".repeat(300);
    let err = engine.resolve(&[a1], &too_long).unwrap_err();
    assert!(matches!(err, ResolveError::EncodeOverflow));
}
