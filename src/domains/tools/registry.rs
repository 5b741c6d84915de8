//! Toolset registry - wires every Nightingale toolset into one group.

use crate::client::GetClientFn;

use super::definitions::{
    alert_subscribes, alerts, busi_groups, datasource, event_pipelines, mutes, notify_rules,
    targets, users,
};
use super::toolset::ToolsetGroup;

/// Build the group holding every toolset.
///
/// Nothing is enabled yet; the caller picks toolsets with
/// [`ToolsetGroup::enable_toolsets`]. `get_client` is handed to every tool to
/// find the API client of an invocation.
pub fn default_toolset_group(get_client: GetClientFn, read_only: bool) -> ToolsetGroup {
    let mut group = ToolsetGroup::new(read_only);

    group.add_toolset(alerts::toolset(&get_client));
    group.add_toolset(targets::toolset(&get_client));
    group.add_toolset(datasource::toolset(&get_client));
    group.add_toolset(mutes::toolset(&get_client));
    group.add_toolset(busi_groups::toolset(&get_client));
    group.add_toolset(notify_rules::toolset(&get_client));
    group.add_toolset(alert_subscribes::toolset(&get_client));
    group.add_toolset(event_pipelines::toolset(&get_client));
    group.add_toolset(users::toolset(&get_client));

    group
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::default_get_client;
    use crate::domains::tools::toolset::DEFAULT_TOOLSETS;
    use crate::domains::tools::toolset::tests::RecordingSink;
    use std::collections::HashSet;

    #[test]
    fn test_defaults_are_registered() {
        let group = default_toolset_group(default_get_client(), false);
        let mut expected: Vec<String> = DEFAULT_TOOLSETS.iter().map(|s| s.to_string()).collect();
        expected.sort();
        assert_eq!(group.available_toolsets(), expected);
        assert!(group.enabled_toolsets().is_empty());
        assert!(group.check_unique_tools().is_ok());
    }

    #[test]
    fn test_tool_counts() {
        let mut group = default_toolset_group(default_get_client(), false);
        group.enable_toolsets(DEFAULT_TOOLSETS).unwrap();

        let mut sink = RecordingSink::default();
        assert_eq!(group.register_all(&mut sink), 27);

        let unique: HashSet<_> = sink.names.iter().collect();
        assert_eq!(unique.len(), sink.names.len());
    }

    #[test]
    fn test_read_only_hides_mute_writes() {
        let mut group = default_toolset_group(default_get_client(), true);
        group.enable_toolsets(&["all"]).unwrap();

        let mut sink = RecordingSink::default();
        assert_eq!(group.register_all(&mut sink), 25);
        assert!(!sink.names.iter().any(|n| n == "create_mute" || n == "update_mute"));
    }

    #[test]
    fn test_every_tool_has_title_and_hint() {
        let group = default_toolset_group(default_get_client(), false);
        for name in group.available_toolsets() {
            let toolset = group.toolset(&name).unwrap();
            for st in toolset.read_tools.iter().chain(&toolset.write_tools) {
                assert!(st.tool.title.is_some(), "{} has no title", st.name());
                let annotations = st.tool.annotations.as_ref().unwrap();
                assert!(annotations.read_only_hint.is_some());
                assert_eq!(
                    st.tool.input_schema.get("type").and_then(|t| t.as_str()),
                    Some("object")
                );
            }
        }
    }
}
