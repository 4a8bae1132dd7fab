use serde::Serialize;
use crate::node::Node;
pub use serde_json::Value as JsonValue;


impl From<&JsonValue> for Node {
    fn from(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => Node::Null,
            JsonValue::Bool(b) => Node::Bool(*b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Node::Int(i),
                None => n.as_f64().map_or(Node::Null, Node::Float)
            },
            JsonValue::String(s) => Node::String(s.clone()),
            JsonValue::Array(seq) => Node::List(
                seq.iter()
                    .map(Node::from)
                    .collect::<_>()
            ),
            JsonValue::Object(obj) => Node::Map(
                obj.iter()
                    .map(|(k, v)| (k.clone(), Node::from(v)))
                    .collect::<_>()
            )
        }
    }
}

impl From<JsonValue> for Node {
    fn from(value: JsonValue) -> Self {
        Node::from(&value)
    }
}

/// Converts any serializable value to a [Node], through its JSON form.
pub fn to_node<T>(value: &T) -> Result<Node, serde_json::Error>
where T: Serialize + ?Sized {
    serde_json::to_value(value).map(Node::from)
}
