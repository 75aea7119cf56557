//! Classic API computer groups
//!
//! Static and smart groups share one endpoint. Static groups list their
//! member computers, smart groups carry the criteria that select members.

use serde::Deserialize;

use super::common::{parse_created_id, XmlBuilder};
use super::{ApiError, Client};

pub const COMPUTER_GROUPS_PATH: &str = "/JSSResource/computergroups";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ComputerGroup {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub is_smart: bool,
    #[serde(default)]
    pub criteria: Vec<GroupCriterion>,
    #[serde(default)]
    pub computers: Vec<GroupComputer>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GroupCriterion {
    pub name: String,
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub and_or: String,
    #[serde(default)]
    pub search_type: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub opening_paren: bool,
    #[serde(default)]
    pub closing_paren: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GroupComputer {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ComputerGroupEnvelope {
    computer_group: ComputerGroup,
}

/// Body of a create or update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputerGroupRequest {
    pub name: String,
    pub is_smart: bool,
    pub criteria: Vec<GroupCriterion>,
    /// Member computer IDs, only sent for static groups
    pub computers: Vec<i64>,
}

impl ComputerGroupRequest {
    pub fn to_xml(&self) -> String {
        let mut xml = XmlBuilder::new()
            .open("computer_group")
            .element("name", &self.name)
            .element("is_smart", self.is_smart);

        if self.is_smart {
            xml = xml
                .open("criteria")
                .element("size", self.criteria.len());
            for criterion in &self.criteria {
                xml = xml
                    .open("criterion")
                    .element("name", &criterion.name)
                    .element("priority", criterion.priority)
                    .element("and_or", &criterion.and_or)
                    .element("search_type", &criterion.search_type)
                    .element("value", &criterion.value)
                    .element("opening_paren", criterion.opening_paren)
                    .element("closing_paren", criterion.closing_paren)
                    .close("criterion");
            }
            xml = xml.close("criteria");
        } else {
            xml = xml.open("computers");
            for id in &self.computers {
                xml = xml.open("computer").element("id", id).close("computer");
            }
            xml = xml.close("computers");
        }

        xml.close("computer_group").build()
    }
}

pub struct ComputerGroupsApi<'a> {
    client: &'a Client,
}

impl<'a> ComputerGroupsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// GET /JSSResource/computergroups/id/{id}
    pub async fn get(&self, id: i64) -> Result<ComputerGroup, ApiError> {
        let envelope: ComputerGroupEnvelope = self
            .client
            .get(&format!("{}/id/{}", COMPUTER_GROUPS_PATH, id))
            .await?;
        Ok(envelope.computer_group)
    }

    /// POST /JSSResource/computergroups/id/0, returns the new ID
    pub async fn create(&self, request: &ComputerGroupRequest) -> Result<i64, ApiError> {
        let body = self
            .client
            .post_xml(&format!("{}/id/0", COMPUTER_GROUPS_PATH), &request.to_xml())
            .await?;
        parse_created_id(&body)
    }

    /// PUT /JSSResource/computergroups/id/{id}
    pub async fn update(&self, id: i64, request: &ComputerGroupRequest) -> Result<(), ApiError> {
        self.client
            .put_xml(
                &format!("{}/id/{}", COMPUTER_GROUPS_PATH, id),
                &request.to_xml(),
            )
            .await
            .map(|_| ())
    }

    /// DELETE /JSSResource/computergroups/id/{id}
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client
            .delete(&format!("{}/id/{}", COMPUTER_GROUPS_PATH, id))
            .await
    }
}
