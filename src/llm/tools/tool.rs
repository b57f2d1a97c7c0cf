use crate::error::{AgroError, Result};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::collections::HashMap;

/// Descriptor for tool function parameters
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToolDescriptor {
    pub r#type: String,
    pub function: FunctionDescriptor,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FunctionDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolDescriptor {
    pub fn function(name: &str, description: &str, parameters: Value) -> Self {
        Self {
            r#type: "function".to_string(),
            function: FunctionDescriptor {
                name: name.to_string(),
                description: description.to_string(),
                parameters,
            },
        }
    }
}

/// Trait for LLM tools
pub trait LlmTool: Send + Sync {
    /// Execute the tool with given arguments
    fn run(&self, args: &HashMap<String, Value>) -> Result<Value>;

    /// Get tool descriptor for LLM
    fn descriptor(&self) -> ToolDescriptor;

    /// Check if this tool matches the given name
    fn matches(&self, name: &str) -> bool {
        self.descriptor().function.name == name
    }
}

/// Deserialize a tool's argument map into a typed query.
pub fn parse_args<T: DeserializeOwned>(args: &HashMap<String, Value>) -> Result<T> {
    let object: serde_json::Map<String, Value> =
        args.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    serde_json::from_value(Value::Object(object))
        .map_err(|e| AgroError::Tool(format!("invalid arguments: {e}")))
}

/// JSON schema for an object with the given properties.
pub fn object_schema(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_tool_descriptor_serialization() {
        let descriptor = ToolDescriptor::function(
            "market_price",
            "Prix du marché",
            object_schema(json!({"crop": {"type": "string"}}), &["crop"]),
        );

        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["type"], "function");
        assert_eq!(json["function"]["name"], "market_price");
        assert_eq!(json["function"]["parameters"]["required"][0], "crop");
    }

    #[test]
    fn test_tool_descriptor_deserialization() {
        let json = r#"{
            "type": "function",
            "function": {
                "name": "calculator",
                "description": "Perform calculations",
                "parameters": {"type": "object", "properties": {}}
            }
        }"#;

        let descriptor: ToolDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(descriptor.r#type, "function");
        assert_eq!(descriptor.function.name, "calculator");
    }

    struct MockTool;

    impl LlmTool for MockTool {
        fn run(&self, _args: &HashMap<String, Value>) -> Result<Value> {
            Ok(json!("result"))
        }

        fn descriptor(&self) -> ToolDescriptor {
            ToolDescriptor::function("mock_tool", "A mock tool", json!({}))
        }
    }

    #[test]
    fn test_tool_matches() {
        let tool = MockTool;
        assert!(tool.matches("mock_tool"));
        assert!(!tool.matches("other_tool"));
    }

    #[derive(Debug, Deserialize)]
    struct Query {
        crop: String,
        area_ha: f64,
    }

    #[test]
    fn test_parse_args() {
        let args = HashMap::from([
            ("crop".to_string(), json!("cacao")),
            ("area_ha".to_string(), json!(2.5)),
        ]);
        let query: Query = parse_args(&args).unwrap();
        assert_eq!(query.crop, "cacao");
        assert_eq!(query.area_ha, 2.5);
    }

    #[test]
    fn test_parse_args_reports_missing_field() {
        let args = HashMap::from([("crop".to_string(), json!("cacao"))]);
        let err = parse_args::<Query>(&args).unwrap_err();
        assert!(matches!(err, AgroError::Tool(_)));
        assert!(err.to_string().contains("area_ha"));
    }
}
