//! CLI entry point: resolves one hostname against a set of recursive
//! resolvers drawn from `--resolver` flags, `/etc/resolv.conf`, or both.

use clap::Parser;
use parq::{Engine, ResolverConfig};
use std::net::{Ipv4Addr, SocketAddrV4};
use std::process::ExitCode;

/// Parallel-fanout DNS A-record resolver.
#[derive(Parser, Debug)]
#[command(name = "parq", about = "Query several recursive resolvers in parallel and print the first answer")]
struct Cli {
    /// Hostname to resolve.
    hostname: String,

    /// Recursive resolver to query (repeatable). Falls back to
    /// /etc/resolv.conf's nameserver lines when none are given.
    #[arg(long = "resolver", value_name = "IPV4")]
    resolvers: Vec<Ipv4Addr>,

    /// Enable verbose (debug-level) logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = ResolverConfig::default();

    let mut servers: Vec<SocketAddrV4> = cli
        .resolvers
        .iter()
        .map(|ip| SocketAddrV4::new(*ip, 53))
        .collect();

    if servers.is_empty() {
        servers = parq::config::load_resolv_conf("/etc/resolv.conf", config.max_servers);
    }
    servers.truncate(config.max_servers);

    let engine = Engine::with_config(config);
    match engine.resolve(&servers, &cli.hostname) {
        Ok(resolved) => {
            println!("{} ({}s/{})", resolved.addr, resolved.ttl, resolved.server_index);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("parq: {}: {}", cli.hostname, e);
            ExitCode::from(e.code().clamp(1, 255) as u8)
        }
    }
}
