//! Build the role → name → management address index of topology switches.

use fabric_tree::Node;

use crate::error::NormalizeError;
use crate::fabric_type::ROOT_KEY;
use crate::model::SwitchIndex;
use crate::pipeline::{Stage, StageContext};

pub const STAGE: &str = "switch_index";

pub struct SwitchIndexStage;

impl Stage for SwitchIndexStage {
    fn order(&self) -> u16 {
        70
    }

    fn id(&self) -> &'static str {
        STAGE
    }

    fn apply(&self, ctx: &mut StageContext<'_>) -> Result<(), NormalizeError> {
        let mut index = SwitchIndex::default();
        for (pos, switch) in ctx
            .tree
            .list_in(&[ROOT_KEY, "topology", "switches"])
            .enumerate()
        {
            let name = identity(switch, "name", pos)?;
            let role = identity(switch, "role", pos)?;
            let management = switch
                .text_in(&["management", "management_ipv4_address"])
                .or_else(|| switch.text_in(&["management", "management_ipv6_address"]))
                .filter(|addr| !addr.is_empty());
            index.insert(&role, &name, management);
        }
        ctx.switch_index = Some(index);
        Ok(())
    }
}

fn identity(switch: &Node, field: &str, pos: usize) -> Result<String, NormalizeError> {
    switch
        .text_in(&[field])
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| NormalizeError::MissingRequiredData {
            stage: STAGE,
            path: format!("{ROOT_KEY}.topology.switches[{pos}].{field}"),
            detail: format!("every topology switch needs a {field}"),
        })
}

#[cfg(test)]
mod tests {
    use super::SwitchIndexStage;
    use crate::error::NormalizeError;
    use crate::pipeline::Stage;
    use crate::stages::testing::context;

    #[test]
    fn index_groups_switches_by_role() {
        let mut ctx = context(
            "vxlan:\n  topology:\n    switches:\n      - name: leaf1\n        role: leaf\n        management:\n          management_ipv4_address: 10.1.1.1\n      - name: spine1\n        role: spine\n        management:\n          management_ipv6_address: 2001:db8::1\n      - name: leaf2\n        role: leaf\n",
        );
        SwitchIndexStage.apply(&mut ctx).expect("apply");
        let index = ctx.switch_index.expect("index");

        assert_eq!(index.names_with_role("leaf"), vec!["leaf1", "leaf2"]);
        assert_eq!(index.role_of("spine1"), Some("spine"));
        assert_eq!(index.management_address("leaf1"), Some("10.1.1.1"));
        assert_eq!(index.management_address("spine1"), Some("2001:db8::1"));
        assert_eq!(index.management_address("leaf2"), None);
    }

    #[test]
    fn missing_role_is_fatal_and_names_the_switch_position() {
        let mut ctx = context("vxlan:\n  topology:\n    switches:\n      - name: leaf1\n");
        let err = SwitchIndexStage.apply(&mut ctx).expect_err("no role");
        assert!(matches!(
            err,
            NormalizeError::MissingRequiredData { ref path, .. } if path == "vxlan.topology.switches[0].role"
        ));
    }

    #[test]
    fn missing_optional_data_is_fine() {
        let mut ctx = context("vxlan:\n  fabric:\n    name: dc1\n");
        SwitchIndexStage.apply(&mut ctx).expect("apply");
        assert!(ctx.switch_index.expect("index").is_empty());
    }
}
