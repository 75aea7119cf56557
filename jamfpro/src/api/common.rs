//! Common types and utilities for the Jamf Pro API

use serde::Deserialize;

use super::error::ApiError;

/// Response of Jamf Pro API create calls
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedResource {
    pub id: String,
    #[serde(default)]
    pub href: Option<String>,
}

/// Paged list response of the Jamf Pro API
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults<T> {
    pub total_count: i64,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// Escapes text for use inside an XML element
pub fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Minimal builder for Classic API request bodies
#[derive(Debug, Default)]
pub struct XmlBuilder {
    buf: String,
}

impl XmlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(mut self, tag: &str) -> Self {
        self.buf.push('<');
        self.buf.push_str(tag);
        self.buf.push('>');
        self
    }

    pub fn close(mut self, tag: &str) -> Self {
        self.buf.push_str("</");
        self.buf.push_str(tag);
        self.buf.push('>');
        self
    }

    pub fn element(self, tag: &str, value: impl ToString) -> Self {
        let value = escape_xml(&value.to_string());
        let mut this = self.open(tag);
        this.buf.push_str(&value);
        this.close(tag)
    }

    pub fn optional_element<V: ToString>(self, tag: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.element(tag, value),
            None => self,
        }
    }

    pub fn build(self) -> String {
        self.buf
    }
}

/// Extracts the ID of a created or updated Classic API object
///
/// The Classic API answers writes with `<computer_group><id>12</id></computer_group>`
/// style XML, some instances answer with the JSON equivalent.
pub fn parse_created_id(body: &str) -> Result<i64, ApiError> {
    if let Some(start) = body.find("<id>") {
        let rest = &body[start + "<id>".len()..];
        let end = rest
            .find("</id>")
            .ok_or_else(|| ApiError::ParseError(format!("Unterminated <id> in response: {}", body)))?;
        return rest[..end].trim().parse::<i64>().map_err(|e| {
            ApiError::ParseError(format!("Invalid ID {:?} in response: {}", &rest[..end], e))
        });
    }

    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| ApiError::ParseError(format!("Unrecognised write response: {}", e)))?;
    find_id(&value).ok_or_else(|| ApiError::ParseError(format!("No ID in response: {}", body)))
}

fn find_id(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Object(map) => map
            .get("id")
            .and_then(|id| id.as_i64().or_else(|| id.as_str()?.parse().ok()))
            .or_else(|| map.values().find_map(find_id)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(escape_xml("R&D <lab> \"A\""), "R&amp;D &lt;lab&gt; &quot;A&quot;");
    }

    #[test]
    fn builds_nested_xml() {
        let xml = XmlBuilder::new()
            .open("computer_group")
            .element("name", "Lab & Co")
            .element("is_smart", false)
            .optional_element("site", None::<String>)
            .close("computer_group")
            .build();

        assert_eq!(
            xml,
            "<computer_group><name>Lab &amp; Co</name><is_smart>false</is_smart></computer_group>"
        );
    }

    #[test]
    fn parses_xml_and_json_write_responses() {
        assert_eq!(
            parse_created_id("<?xml version=\"1.0\"?><computer_group><id>42</id></computer_group>")
                .unwrap(),
            42
        );
        assert_eq!(parse_created_id(r#"{"computer":{"id":7}}"#).unwrap(), 7);
        assert!(matches!(
            parse_created_id("<computer><id>abc</id></computer>"),
            Err(ApiError::ParseError(_))
        ));
        assert!(parse_created_id("created").is_err());
    }
}
