use crate::node::Node;
pub use serde_yaml::Value as YamlValue;


impl From<&YamlValue> for Node {
    fn from(value: &YamlValue) -> Self {
        match value {
            YamlValue::Null => Node::Null,
            YamlValue::Bool(b) => Node::Bool(*b),
            YamlValue::Number(n) => match n.as_i64() {
                Some(i) => Node::Int(i),
                None => n.as_f64().map_or(Node::Null, Node::Float)
            },
            YamlValue::String(s) => Node::String(s.clone()),
            YamlValue::Sequence(seq) => Node::List(
                seq.iter()
                    .map(Node::from)
                    .collect::<_>()
            ),
            YamlValue::Mapping(obj) => Node::Map(
                obj.iter()
                    .map(|(k, v)| (key_text(k), Node::from(v)))
                    .collect::<_>()
            ),
            YamlValue::Tagged(tagged) => Node::from(&tagged.value)
        }
    }
}

impl From<YamlValue> for Node {
    fn from(value: YamlValue) -> Self {
        Node::from(&value)
    }
}

// yaml allows non-string keys, e.g. `1: one` or `true: yes`
fn key_text(key: &YamlValue) -> String {
    match key {
        YamlValue::String(s) => s.clone(),
        YamlValue::Number(n) => n.to_string(),
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Null => "null".to_owned(),
        YamlValue::Tagged(tagged) => key_text(&tagged.value),
        YamlValue::Sequence(_) | YamlValue::Mapping(_) => String::new()
    }
}
