//! Tools domain module.
//!
//! ## Architecture
//!
//! - `definitions/` - tool implementations, one file per toolset
//! - `toolset.rs` - toolsets and the group that selects which ones are exposed
//! - `registry.rs` - the default group wiring every toolset
//! - `handlers.rs` - typed-to-untyped handler adapter and result helpers
//! - `router.rs` - exposes the enabled tools on an rmcp `ToolRouter`
//! - `validate.rs` - parameter validators
//! - `error.rs` - toolset and validation error types
//!
//! ## Adding a New Tool
//!
//! 1. Add a unit struct with params and `execute()` to the toolset's file in
//!    `definitions/`
//! 2. Append its `server_tool()` to that file's `toolset()` constructor
//!
//! The router and server pick it up from the group.

pub mod definitions;
pub mod error;
pub mod handlers;
pub mod registry;
pub mod router;
pub mod toolset;
pub mod validate;

pub use error::{ToolsetError, ValidationError};
pub use handlers::{ToolHandler, ToolRequest, ToolSink, make_tool_handler};
pub use registry::default_toolset_group;
pub use router::build_tool_router;
pub use toolset::{ALL_TOOLSETS, DEFAULT_TOOLSETS, ServerTool, Toolset, ToolsetGroup};
