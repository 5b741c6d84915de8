//! Toolsets and the toolset group.
//!
//! A [`Toolset`] is a named bundle of tools split into read and write lists.
//! The [`ToolsetGroup`] holds every known toolset, tracks which ones the
//! operator enabled, and exposes the enabled tools to a [`ToolSink`] exactly
//! once at startup. Nothing here changes after that.

use std::collections::{HashMap, HashSet};

use rmcp::model::Tool;
use tracing::debug;

use super::error::ToolsetError;
use super::handlers::{ToolHandler, ToolSink};

/// Marker that enables every registered toolset.
pub const ALL_TOOLSETS: &str = "all";

/// Toolsets enabled when none are configured.
pub const DEFAULT_TOOLSETS: &[&str] = &[
    "alerts",
    "targets",
    "datasource",
    "mutes",
    "busi_groups",
    "notify_rules",
    "alert_subscribes",
    "event_pipelines",
    "users",
];

/// A tool declaration paired with its handler.
#[derive(Clone)]
pub struct ServerTool {
    pub tool: Tool,
    pub handler: ToolHandler,
}

impl ServerTool {
    pub fn new(tool: Tool, handler: ToolHandler) -> Self {
        Self { tool, handler }
    }

    pub fn name(&self) -> &str {
        &self.tool.name
    }
}

impl std::fmt::Debug for ServerTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerTool")
            .field("name", &self.tool.name)
            .finish_non_exhaustive()
    }
}

/// A named, described bundle of tools.
#[derive(Debug, Clone)]
pub struct Toolset {
    pub name: String,
    pub description: String,
    pub read_tools: Vec<ServerTool>,
    pub write_tools: Vec<ServerTool>,
}

impl Toolset {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            read_tools: Vec::new(),
            write_tools: Vec::new(),
        }
    }

    /// Append tools that never mutate remote state.
    pub fn add_read_tools(mut self, tools: impl IntoIterator<Item = ServerTool>) -> Self {
        self.read_tools.extend(tools);
        self
    }

    /// Append tools suppressed in read-only mode.
    pub fn add_write_tools(mut self, tools: impl IntoIterator<Item = ServerTool>) -> Self {
        self.write_tools.extend(tools);
        self
    }

    /// Names of all tools, read tools first.
    pub fn tool_names(&self) -> Vec<&str> {
        self.read_tools
            .iter()
            .chain(self.write_tools.iter())
            .map(ServerTool::name)
            .collect()
    }
}

/// Every known toolset plus the enabled subset.
#[derive(Debug, Default)]
pub struct ToolsetGroup {
    toolsets: HashMap<String, Toolset>,
    enabled: HashSet<String>,
    read_only: bool,
}

impl ToolsetGroup {
    pub fn new(read_only: bool) -> Self {
        Self {
            read_only,
            ..Default::default()
        }
    }

    pub fn read_only(&self) -> bool {
        self.read_only
    }

    /// Register a toolset. A repeated name replaces the earlier one.
    pub fn add_toolset(&mut self, toolset: Toolset) {
        debug!(
            toolset = %toolset.name,
            read = toolset.read_tools.len(),
            write = toolset.write_tools.len(),
            "Registering toolset"
        );
        self.toolsets.insert(toolset.name.clone(), toolset);
    }

    pub fn toolset(&self, name: &str) -> Option<&Toolset> {
        self.toolsets.get(name)
    }

    /// Enable toolsets by name.
    ///
    /// `"all"` anywhere in the list enables everything and the rest is
    /// ignored. Otherwise names are trimmed and empty entries skipped. The
    /// whole list is checked first: on an unknown name nothing is enabled.
    pub fn enable_toolsets<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), ToolsetError> {
        if names.iter().any(|n| n.as_ref().trim() == ALL_TOOLSETS) {
            self.enabled.extend(self.toolsets.keys().cloned());
            return Ok(());
        }

        let mut selected = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            if !self.toolsets.contains_key(name) {
                return Err(ToolsetError::unknown(name));
            }
            selected.push(name.to_string());
        }

        self.enabled.extend(selected);
        Ok(())
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled.contains(name)
    }

    /// Expose every enabled tool to `sink`.
    ///
    /// A toolset's read tools go first; its write tools follow unless the
    /// group is read-only. Returns the number of tools exposed.
    pub fn register_all<K: ToolSink + ?Sized>(&self, sink: &mut K) -> usize {
        let mut count = 0;
        for (name, toolset) in &self.toolsets {
            if !self.enabled.contains(name) {
                continue;
            }

            for st in &toolset.read_tools {
                sink.add_tool(st.tool.clone(), st.handler.clone());
                count += 1;
            }

            if !self.read_only {
                for st in &toolset.write_tools {
                    sink.add_tool(st.tool.clone(), st.handler.clone());
                    count += 1;
                }
            }
        }
        count
    }

    /// Fail if two registered tools share a name, in any toolset.
    pub fn check_unique_tools(&self) -> Result<(), ToolsetError> {
        let mut seen = HashSet::new();
        for toolset in self.toolsets.values() {
            for name in toolset.tool_names() {
                if !seen.insert(name) {
                    return Err(ToolsetError::DuplicateTool(name.to_string()));
                }
            }
        }
        Ok(())
    }

    /// Sorted names of every registered toolset.
    pub fn available_toolsets(&self) -> Vec<String> {
        let mut names: Vec<_> = self.toolsets.keys().cloned().collect();
        names.sort();
        names
    }

    /// Sorted names of the enabled toolsets.
    pub fn enabled_toolsets(&self) -> Vec<String> {
        let mut names: Vec<_> = self.enabled.iter().cloned().collect();
        names.sort();
        names
    }
}
