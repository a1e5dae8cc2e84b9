//! CLI command handlers. Each command is in its own file.

mod call;
mod serve;
mod upstream;

pub use call::run_call;
pub use serve::run_serve;
pub use upstream::run_stub_upstream;
