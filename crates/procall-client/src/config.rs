//! Channel configuration. Mirrors `procall-server`'s `config.rs` shape —
//! same endpoint/TLS split — since both sides of the wire negotiate the
//! same transport settings.

use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub enum Tls {
    #[default]
    Off,
    On {
        root_certificates: Vec<u8>,
        certificate: Vec<u8>,
        private_key: Vec<u8>,
    },
}

/// Client-side keepalive parameters. Defaults match the reference
/// deployment exactly — they shape failure semantics under idle
/// channels, so they are part of the contract, not a tuning knob.
/// Compare `procall-server`'s `KeepAlive`, same shape, different values.
#[derive(Debug, Clone, Copy)]
pub struct KeepAlive {
    pub time: Duration,
    pub timeout: Duration,
    pub permit_without_calls: bool,
}

impl Default for KeepAlive {
    fn default() -> Self {
        Self {
            time: Duration::from_secs(20),
            timeout: Duration::from_secs(10),
            permit_without_calls: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChannelConfig {
    pub endpoint: String,
    pub tls: Tls,
    pub keep_alive: Option<KeepAlive>,
    pub call_timeout: Duration,
}

impl ChannelConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            tls: Tls::Off,
            keep_alive: Some(KeepAlive::default()),
            call_timeout: Duration::from_secs(30),
        }
    }
}
