//! Error taxonomy shared by every crate of the workspace.
//!
//! Only [`ScanError::NoInterfaces`] is fatal to a scan. Every other variant is
//! raised inside a single interface's task and contained there.

use std::io;

use thiserror::Error;

use crate::network::subnet::SubnetRejection;

pub type Result<T> = std::result::Result<T, ScanError>;

#[derive(Error, Debug)]
pub enum ScanError {
    /// The interface has no address/mask pair worth enumerating.
    #[error("interface {interface}: {reason}")]
    InvalidSubnet {
        interface: String,
        reason: SubnetRejection,
    },

    #[error("interface {interface}: no hardware address")]
    MissingHardwareAddress { interface: String },

    /// The capture session could not be opened.
    #[error("interface {interface}: capture unavailable: {source}")]
    TransportUnavailable {
        interface: String,
        #[source]
        source: io::Error,
    },

    /// A probe frame could not be written mid-sweep.
    #[error("interface {interface}: failed to write probe: {source}")]
    TransportWriteFailed {
        interface: String,
        #[source]
        source: io::Error,
    },

    #[error("malformed frame: {0}")]
    MalformedFrame(&'static str),

    #[error("no network interfaces available: {0}")]
    NoInterfaces(String),

    #[error("OUI database could not be loaded: {0}")]
    VendorDatabase(String),
}

impl ScanError {
    /// Name of the interface the error is scoped to, if any.
    pub fn interface(&self) -> Option<&str> {
        match self {
            ScanError::InvalidSubnet { interface, .. }
            | ScanError::MissingHardwareAddress { interface }
            | ScanError::TransportUnavailable { interface, .. }
            | ScanError::TransportWriteFailed { interface, .. } => Some(interface),
            _ => None,
        }
    }
}
