//! Peripheral bridge adapter interface and implementations.

pub mod mock;
pub mod sim;
pub mod traits;

pub use mock::{MockBridge, RecordedCall};
pub use sim::SimulatedBridge;
pub use traits::PeripheralBridge;
