pub mod config;
pub mod forward;
pub mod logging;
pub mod response;
pub mod retry;
pub mod upstream;

pub use forward::Forwarder;
