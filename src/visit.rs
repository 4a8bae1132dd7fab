use crate::context::Context;
use crate::escape::html_escape;
use crate::node::Node;
use crate::reader::Delimiters;


#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Escape {
    Html,
    Raw,
}

impl Escape {
    fn apply(self, text: &str) -> String {
        match self {
            Escape::Html => html_escape(text),
            Escape::Raw => text.to_owned()
        }
    }
}


/// Text of a node in a variable tag.
///
/// Lists, maps and null render as nothing. Floats use the shortest
/// representation that reads back to the same value, without exponent
/// and without a trailing `.0` (`1.5`, `2`, `0.001`).
///
/// A lambda is called without text. When what it returns contains
/// `{{`, it is rendered as a template against `context`, and its own
/// tags decide about escaping. Otherwise it is escaped like a string.
pub(crate) fn render_node(node: &Node, context: &Context, escape: Escape) -> String {
    match node {
        Node::Null | Node::List(_) | Node::Map(_) => String::new(),
        Node::Bool(b) => b.to_string(),
        Node::Int(i) => i.to_string(),
        Node::Float(x) => x.to_string(),
        Node::String(s) => escape.apply(s),
        Node::Lambda(lambda) => {
            let text = render_node(&lambda.call(""), context, Escape::Raw);
            if text.contains("{{") {
                context.render_fragment(&text, Delimiters::default())
            } else {
                escape.apply(&text)
            }
        }
    }
}
