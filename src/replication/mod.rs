//! Peer-to-peer state replication.
//!
//! Each peer holds a full replica and runs the same rules. Replicated
//! commands travel as sequence-numbered `Envelope`s over a `Transport`; the
//! receiving `Inbox` restores per-origin order before the session applies
//! them.

pub mod inbox;
pub mod session;
pub mod transport;
pub mod wire;

pub use inbox::{Admission, Inbox, HOLD_WINDOW};
pub use session::{MatchSession, ReceiveReport, Submitted};
pub use transport::{channel_name, MemoryBus, MemoryEndpoint, Transport};
pub use wire::Envelope;
