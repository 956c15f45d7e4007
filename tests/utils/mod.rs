pub mod actions;
pub mod assertions;
pub mod builders;
pub mod mocks;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use assertions::{EnvelopeAssertion, SentAssertion};
#[allow(unused_imports)]
pub use builders::RoomBuilder;
#[allow(unused_imports)]
pub use mocks::{mock_socket, MockServer, MockSocket};
#[allow(unused_imports)]
pub use setup::{TestSetup, TestSetupBuilder};
