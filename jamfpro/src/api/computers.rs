//! Classic API computer inventory records

use serde::Deserialize;

use super::common::{parse_created_id, XmlBuilder};
use super::{ApiError, Client};

pub const COMPUTERS_PATH: &str = "/JSSResource/computers";

/// General section of a computer record
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ComputerGeneral {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub udid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ComputerEnvelope {
    computer: ComputerRecord,
}

#[derive(Debug, Deserialize)]
struct ComputerRecord {
    general: ComputerGeneral,
}

/// Fields written on create and update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputerRequest {
    pub name: String,
    pub serial_number: Option<String>,
    pub udid: Option<String>,
}

impl ComputerRequest {
    pub fn to_xml(&self) -> String {
        XmlBuilder::new()
            .open("computer")
            .open("general")
            .element("name", &self.name)
            .optional_element("serial_number", self.serial_number.as_deref())
            .optional_element("udid", self.udid.as_deref())
            .close("general")
            .close("computer")
            .build()
    }
}

pub struct ComputersApi<'a> {
    client: &'a Client,
}

impl<'a> ComputersApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// GET /JSSResource/computers/id/{id}
    pub async fn get(&self, id: i64) -> Result<ComputerGeneral, ApiError> {
        let envelope: ComputerEnvelope = self
            .client
            .get(&format!("{}/id/{}", COMPUTERS_PATH, id))
            .await?;
        Ok(envelope.computer.general)
    }

    /// GET /JSSResource/computers/name/{name}
    pub async fn get_by_name(&self, name: &str) -> Result<ComputerGeneral, ApiError> {
        let envelope: ComputerEnvelope = self
            .client
            .get(&format!(
                "{}/name/{}",
                COMPUTERS_PATH,
                urlencoding::encode(name)
            ))
            .await?;
        Ok(envelope.computer.general)
    }

    /// POST /JSSResource/computers/id/0, returns the new ID
    pub async fn create(&self, request: &ComputerRequest) -> Result<i64, ApiError> {
        let body = self
            .client
            .post_xml(&format!("{}/id/0", COMPUTERS_PATH), &request.to_xml())
            .await?;
        parse_created_id(&body)
    }

    /// PUT /JSSResource/computers/id/{id}
    pub async fn update(&self, id: i64, request: &ComputerRequest) -> Result<(), ApiError> {
        self.client
            .put_xml(&format!("{}/id/{}", COMPUTERS_PATH, id), &request.to_xml())
            .await
            .map(|_| ())
    }

    /// DELETE /JSSResource/computers/id/{id}
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client
            .delete(&format!("{}/id/{}", COMPUTERS_PATH, id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::{create_test_client, mock_oauth_token};
    use mockito::Server;

    #[test]
    fn request_xml_skips_unset_fields() {
        let request = ComputerRequest {
            name: "Lab-01".to_string(),
            serial_number: Some("C02XK0AAJGH5".to_string()),
            udid: None,
        };

        assert_eq!(
            request.to_xml(),
            "<computer><general><name>Lab-01</name><serial_number>C02XK0AAJGH5</serial_number></general></computer>"
        );
    }

    #[tokio::test]
    async fn get_computer_by_name_encodes_path() {
        let mut server = Server::new_async().await;
        let _t = mock_oauth_token(&mut server).await;
        let m = server
            .mock("GET", "/JSSResource/computers/name/Lab%2001")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"computer":{"general":{"id":17,"name":"Lab 01","serial_number":"C02XK0AAJGH5","udid":"55900BDC-347C-58B1-D249-F32244B11D30","platform":"Mac"}}}"#,
            )
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let computer = client.computers().get_by_name("Lab 01").await.unwrap();

        assert_eq!(computer.id, 17);
        assert_eq!(computer.serial_number.as_deref(), Some("C02XK0AAJGH5"));
        m.assert_async().await;
    }

    #[tokio::test]
    async fn create_computer_parses_new_id() {
        let mut server = Server::new_async().await;
        let _t = mock_oauth_token(&mut server).await;
        let _m = server
            .mock("POST", "/JSSResource/computers/id/0")
            .with_status(201)
            .with_body(r#"<?xml version="1.0" encoding="UTF-8"?><computer><id>31</id></computer>"#)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let id = client
            .computers()
            .create(&ComputerRequest {
                name: "Lab-02".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(id, 31);
    }
}
