//! Studio Link - client for Livestream Studio switchers
//!
//! Keeps a TCP connection to the switcher's control port, mirrors the device
//! state from the packets it pushes, and encodes control commands back to it.
//!
//! ```ignore
//! let client = StudioClient::connect_to("192.168.1.20");
//! let mut events = client.subscribe_channel();
//! while let Some(event) = events.recv().await {
//!     if let StudioEvent::Update(_) = event {
//!         println!("program: {:?}", client.snapshot().program);
//!     }
//! }
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod mirror;
pub mod notifier;
pub mod protocol;
pub mod state;
pub mod transport;

pub use config::StudioConfig;
pub use error::{Result, StudioError};
pub use mirror::StudioMirror;
pub use notifier::{EventCallback, StudioEvent};
pub use protocol::{Command, Packet};
pub use state::DeviceState;
pub use transport::{ConnectionState, StudioClient};
