use std::fmt;
use std::sync::Arc;
use indexmap::IndexMap;


/// Ordered mapping of keys to nodes, iterated in insertion order.
pub type Map = IndexMap<String, Node>;

/// A data value a template is rendered against.
#[derive(Clone, Default)]
pub enum Node {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Node>),
    Map(Map),
    Lambda(Lambda),
}

impl Node {
    /// Builds a [Node::Map] from key/value pairs, keeping their order.
    /// A repeated key keeps its first position and its last value.
    pub fn map<K, V, I>(entries: I) -> Node
    where
        K: Into<String>,
        V: Into<Node>,
        I: IntoIterator<Item = (K, V)>,
    {
        Node::Map(
            entries.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect::<Map>()
        )
    }

    pub fn list<V, I>(items: I) -> Node
    where
        V: Into<Node>,
        I: IntoIterator<Item = V>,
    {
        Node::List(items.into_iter().map(Into::into).collect())
    }

    /// Looks a key up when the node is a map.
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Map(map) => map.get(key),
            _ => None
        }
    }

    /// Values a section does not render for: null, false, zero, the
    /// empty string and the empty list.
    pub fn is_falsy(&self) -> bool {
        match self {
            Node::Null => true,
            Node::Bool(b) => !b,
            Node::Int(i) => *i == 0,
            Node::String(s) => s.is_empty(),
            Node::List(items) => items.is_empty(),
            Node::Float(_) | Node::Map(_) | Node::Lambda(_) => false,
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Null => write!(f, "Null"),
            Node::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Node::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Node::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Node::String(s) => f.debug_tuple("String").field(s).finish(),
            Node::List(items) => f.debug_tuple("List").field(items).finish(),
            Node::Map(map) => f.debug_tuple("Map").field(map).finish(),
            Node::Lambda(lambda) => lambda.fmt(f),
        }
    }
}


type Callback0 = dyn Fn() -> Node + Send + Sync;
type Callback1 = dyn Fn(&str) -> Node + Send + Sync;

#[derive(Clone)]
enum Callback {
    Plain(Arc<Callback0>),
    Section(Arc<Callback1>),
}

/// A callback stored in the data tree.
///
/// A plain lambda takes no argument. A section lambda receives the raw,
/// unrendered text of the section it is used in. Whatever either returns
/// is rendered again as a template fragment.
#[derive(Clone)]
pub struct Lambda(Callback);

impl Lambda {
    pub fn new<F>(fun: F) -> Self
    where F: Fn() -> Node + Send + Sync + 'static {
        Lambda(Callback::Plain(Arc::new(fun)))
    }

    pub fn section<F>(fun: F) -> Self
    where F: Fn(&str) -> Node + Send + Sync + 'static {
        Lambda(Callback::Section(Arc::new(fun)))
    }

    /// Calls the lambda; plain lambdas ignore `text`.
    pub fn call(&self, text: &str) -> Node {
        match &self.0 {
            Callback::Plain(fun) => fun(),
            Callback::Section(fun) => fun(text),
        }
    }
}

impl fmt::Debug for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Callback::Plain(_) => write!(f, "Lambda {{...}}"),
            Callback::Section(_) => write!(f, "Lambda(text) {{...}}"),
        }
    }
}


impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Bool(b)
    }
}

impl From<i32> for Node {
    fn from(i: i32) -> Self {
        Node::Int(i.into())
    }
}

impl From<i64> for Node {
    fn from(i: i64) -> Self {
        Node::Int(i)
    }
}

impl From<f64> for Node {
    fn from(x: f64) -> Self {
        Node::Float(x)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::String(s.to_owned())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::String(s)
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::List(items)
    }
}

impl From<Map> for Node {
    fn from(map: Map) -> Self {
        Node::Map(map)
    }
}

impl From<Lambda> for Node {
    fn from(lambda: Lambda) -> Self {
        Node::Lambda(lambda)
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(value: Option<T>) -> Self {
        value.map_or(Node::Null, Into::into)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falsy_values() {
        for node in [
            Node::Null,
            Node::Bool(false),
            Node::Int(0),
            Node::from(""),
            Node::List(vec![])
        ] {
            assert!(node.is_falsy(), "{:?}", node);
        }
    }

    #[test]
    fn truthy_values() {
        for node in [
            Node::Bool(true),
            Node::Int(-1),
            Node::Float(0.0),
            Node::from(" "),
            Node::list([0]),
            Node::Map(Map::new()),
            Node::from(Lambda::new(|| Node::Null))
        ] {
            assert!(!node.is_falsy(), "{:?}", node);
        }
    }

    #[test]
    fn map_keeps_insertion_order() {
        let node = Node::map([("z", 1), ("a", 2), ("m", 3)]);
        let Node::Map(map) = node else {
            panic!("not a map")
        };
        let keys = map.keys().map(String::as_str).collect::<Vec<_>>();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn keys_are_not_identifiers() {
        let node = Node::map([("person?", "Jon")]);
        assert!(matches!(node.get("person?"), Some(Node::String(s)) if s == "Jon"));
        assert!(node.get("person").is_none());
    }

    #[test]
    fn plain_lambda_ignores_text() {
        let lambda = Lambda::new(|| Node::from("x"));
        assert!(matches!(lambda.call("ignored"), Node::String(s) if s == "x"));
    }

    #[test]
    fn section_lambda_receives_text() {
        let lambda = Lambda::section(|text| Node::from(format!("<{}>", text)));
        assert!(matches!(lambda.call("body"), Node::String(s) if s == "<body>"));
    }
}
