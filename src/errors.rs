//! Election Protocol Error Hierarchy
//!
//! Defines error types for the broadcast election engine, categorized by
//! protocol layer and operational concerns.

use config::ConfigError;
use tokio::task::JoinError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Infrastructure-level failures (bus, registry, serialization)
    #[error(transparent)]
    System(#[from] SystemError),

    /// Node configuration validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Election protocol violations and failures
    #[error(transparent)]
    Election(#[from] ElectionError),
}

#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    // Messaging bus layer
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    // Membership registry layer
    #[error("Registry operation failed")]
    Registry(#[from] RegistryError),

    // Serialization
    #[error("Serialization error")]
    Serialization(#[from] SerializationError),

    // Basic node operations
    #[error("Node failed to start: {0}")]
    NodeStartFailed(String),

    // Local filesystem (log files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The broadcast channel behind a subscription has been dropped; no
    /// further frames can arrive.
    #[error("Messaging bus channel closed")]
    ChannelClosed,

    /// A slow subscriber missed frames. Delivery is at-most-once, so this is
    /// survivable; the count is reported for observability.
    #[error("Subscriber lagged behind by {0} frames")]
    Lagged(u64),

    #[error("{0}")]
    SignalSendFailed(String),

    #[error("Background task failed: {0}")]
    TaskFailed(#[from] JoinError),
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The shared membership store cannot be reached. Not retried; fatal to
    /// the operation that issued it.
    #[error("Registry unavailable: {0}")]
    Unavailable(String),
}

// Serialization is classified separately (it crosses protocol and system
// layers: a malformed inbound payload is dropped, a malformed outbound
// payload is fatal to the publish).
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    #[error("Bincode serialization failed: {0}")]
    Bincode(#[from] bincode::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ElectionError {
    /// `start()` is not designed for repeated invocation within one process
    /// lifetime.
    #[error("Node {node_id} already started an election round")]
    AlreadyStarted { node_id: u32 },
}

// ============== Conversion Implementations ============== //
impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Error::System(SystemError::Transport(e))
    }
}

impl From<RegistryError> for Error {
    fn from(e: RegistryError) -> Self {
        Error::System(SystemError::Registry(e))
    }
}

impl From<SerializationError> for Error {
    fn from(e: SerializationError) -> Self {
        Error::System(SystemError::Serialization(e))
    }
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        SerializationError::Bincode(err).into()
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::System(SystemError::Io(err))
    }
}

impl From<JoinError> for Error {
    fn from(err: JoinError) -> Self {
        TransportError::TaskFailed(err).into()
    }
}
