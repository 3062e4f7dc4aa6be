//! Execution layer: runs a request through an ordered chain of transports.
//!
//! Each transport is wrapped in an [`HttpExecutionCommand`] which owns the
//! request lifecycle. [`TransportChain`] offers the request to the commands in
//! order and returns the response of the first one that takes it.

mod chain;
pub use chain::TransportChain;

mod command;
pub use command::ChainStatus;
pub use command::ExecutionContext;
pub use command::HttpExecutionCommand;
