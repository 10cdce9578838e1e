use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

pub type JsonMap = serde_json::Map<String, JsonValue>;

/// One unit of data flowing through the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub json: JsonMap,
}

impl Item {
    pub fn new(json: JsonMap) -> Self {
        Self { json }
    }
}

impl From<JsonMap> for Item {
    fn from(json: JsonMap) -> Self {
        Self { json }
    }
}

/// Index of the input item an output was produced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairedItem {
    pub item: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputItem {
    pub json: JsonValue,
    pub paired_item: PairedItem,
}

impl OutputItem {
    pub fn new(json: JsonValue, item_index: usize) -> Self {
        Self {
            json,
            paired_item: PairedItem { item: item_index },
        }
    }

    /// An item standing in for a failed input when errors are tolerated.
    pub fn error(message: impl Into<String>, item_index: usize) -> Self {
        Self::new(
            serde_json::json!({ "error": message.into() }),
            item_index,
        )
    }

    pub fn is_error(&self) -> bool {
        self.json
            .as_object()
            .is_some_and(|obj| obj.len() == 1 && obj.contains_key("error"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_output_item_serializes_pairing() {
        let out = OutputItem::new(json!({ "code": 0 }), 3);
        assert_eq!(
            serde_json::to_value(&out).unwrap(),
            json!({ "json": { "code": 0 }, "pairedItem": { "item": 3 } })
        );
    }

    #[test]
    fn test_items_from_input_array() {
        let raw: Vec<JsonMap> =
            serde_json::from_value(json!([{ "name": "Alice" }, {}])).unwrap();
        let items: Vec<Item> = raw.into_iter().map(Item::from).collect();
        assert_eq!(items[0].json["name"], json!("Alice"));
        assert_eq!(items[1], Item::default());
    }

    #[test]
    fn test_error_item() {
        let out = OutputItem::error("LarkBase API Error: nope", 1);
        assert!(out.is_error());
        assert_eq!(out.json, json!({ "error": "LarkBase API Error: nope" }));
        assert!(!OutputItem::new(json!({ "code": 0 }), 0).is_error());
    }
}
