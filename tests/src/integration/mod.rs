//! End-to-end flows between a relay client and a provider.

pub mod flows;
pub mod handshake;
