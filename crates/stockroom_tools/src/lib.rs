//! Tool-invocation front-end for the inventory store.
//!
//! # Responsibility
//! - Describe the inventory tools (name, description, input schema).
//! - Translate tool calls with JSON arguments into `InventoryService` calls.
//! - Run a line-delimited JSON-RPC session over any reader/writer pair.
//!
//! # Invariants
//! - No business rule lives here; every decision is made by `stockroom_core`.
//! - Only protocol frames are written to the session writer.

pub mod catalog;
pub mod dispatch;
pub mod session;

pub use catalog::{tool_catalog, ToolDescriptor};
pub use dispatch::{ToolDispatcher, ToolError};
pub use session::{ToolSession, SERVER_NAME};
