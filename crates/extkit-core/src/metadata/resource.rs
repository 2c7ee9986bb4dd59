use std::fmt;

/// Subscription, resource group and VM name of the current machine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceIdentity {
    pub subscription_id: String,
    pub resource_group: String,
    pub vm_name: String,
}

impl ResourceIdentity {
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group: impl Into<String>,
        vm_name: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group: resource_group.into(),
            vm_name: vm_name.into(),
        }
    }

    /// Resource path of the VM, used as the `vmResourceId` query value.
    pub fn resource_id(&self) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Compute/virtualMachines/{}",
            self.subscription_id, self.resource_group, self.vm_name
        )
    }
}

impl fmt::Display for ResourceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resource_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_id_template() {
        let id = ResourceIdentity::new("subId", "resourceGroupName", "vmName");
        assert_eq!(
            id.resource_id(),
            "/subscriptions/subId/resourceGroups/resourceGroupName/providers/Microsoft.Compute/virtualMachines/vmName"
        );
        assert_eq!(id.to_string(), id.resource_id());
    }
}
