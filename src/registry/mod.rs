//! Registry module: backends, submission dispatch and member lookup

mod client;
mod dispatcher;
mod lookup;
mod memory;
mod traits;

#[cfg(test)]
pub mod testing;

pub use client::{RegistryClient, DEFAULT_ADDRESS};
pub use dispatcher::{DispatchMode, SubmissionDispatcher, GENERIC_FAILURE};
pub use lookup::{find_member, LookupOutcome, RenewalGate};
pub use memory::InMemoryRegistry;
pub use traits::RegistryClientTrait;

#[cfg(test)]
pub use lookup::{LOOKUP_FAILURE, LOOKUP_TIMEOUT};
#[cfg(test)]
pub use traits::MockRegistryClientTrait;
