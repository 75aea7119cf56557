//! Resource implementations

pub mod entity;
pub mod resource_api_role;
pub mod resource_building;
pub mod resource_category;
pub mod resource_computer;
pub mod resource_computergroup;
pub mod resource_department;
pub mod resource_smartcomputergroup;

#[cfg(test)]
pub(crate) mod test_support;

pub use entity::{EntityResource, JamfEntity};
pub use resource_api_role::{ApiRoleEntity, ApiRoleResource};
pub use resource_building::{BuildingEntity, BuildingResource};
pub use resource_category::{CategoryEntity, CategoryResource};
pub use resource_computer::{ComputerEntity, ComputerResource};
pub use resource_computergroup::{ComputerGroupEntity, ComputerGroupResource};
pub use resource_department::{DepartmentEntity, DepartmentResource};
pub use resource_smartcomputergroup::{SmartComputerGroupEntity, SmartComputerGroupResource};

use tfplug::schema::{Attribute, AttributeBuilder, AttributeType};

/// Numeric Jamf Pro ID, assigned by the server
pub(crate) fn id_attribute(kind: &str) -> Attribute {
    AttributeBuilder::new("id", AttributeType::Int64)
        .description(&format!("The unique identifier of the {}", kind))
        .computed()
        .build()
}

pub(crate) fn name_attribute(kind: &str) -> Attribute {
    AttributeBuilder::new("name", AttributeType::String)
        .description(&format!("The name of the {}", kind))
        .required()
        .build()
}
