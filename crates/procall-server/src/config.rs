//! Server configuration. Plain, serde-free structs — construction happens
//! in code, not from a config file, so there's no parsing layer here
//! (compare `procall-client`'s `ChannelConfig`, same shape).

use std::time::Duration;

/// One listening endpoint.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub address: String,
    pub tls: Tls,
}

/// Transport security for a single endpoint.
#[derive(Debug, Clone, Default)]
pub enum Tls {
    #[default]
    Off,
    On {
        root_certificates: Vec<u8>,
        certificate: Vec<u8>,
        private_key: Vec<u8>,
        /// When set, the server requests and requires a verified client
        /// certificate (the transport's "request-and-require-and-verify"
        /// mode).
        require_client_certificate: bool,
    },
}

/// Keepalive parameters. Defaults match the reference deployment exactly
/// — they shape failure semantics under idle channels, so they are part
/// of the contract, not a tuning knob.
#[derive(Debug, Clone, Copy)]
pub struct KeepAlive {
    pub time: Duration,
    pub timeout: Duration,
    pub permit_without_calls: bool,
    pub min_recv_ping_interval: Duration,
    pub max_ping_strikes: u32,
}

impl Default for KeepAlive {
    fn default() -> Self {
        Self {
            time: Duration::from_secs(30),
            timeout: Duration::from_secs(60),
            permit_without_calls: true,
            min_recv_ping_interval: Duration::from_secs(5),
            max_ping_strikes: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub endpoints: Vec<Endpoint>,
    pub keep_alive: Option<KeepAlive>,
    /// How long a client's session (its negotiated property mapping) may
    /// sit unleased before `SessionStore`'s sweep may reclaim it.
    pub session_inactivity_threshold: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            endpoints: Vec::new(),
            keep_alive: Some(KeepAlive::default()),
            session_inactivity_threshold: Duration::from_secs(300),
        }
    }
}
