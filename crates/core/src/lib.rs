pub mod address;
pub mod error;
pub mod negotiator;
pub mod protocol;
pub mod session;
pub mod transport;

pub use address::StreamAddress;
pub use error::{ParseErrorKind, Result, RtspError};
pub use negotiator::{Negotiator, RedirectConfig, obtain_redirect};
pub use protocol::AbsoluteControl;
pub use transport::{Connection, Connector, TcpConnector, TransportConfig};
