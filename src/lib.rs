//! A tolerant Mustache template renderer.
//!
//! A template is read fresh on every call and rendered against a [Node]
//! tree, getting partials by name from a [PartialStore]. Variables,
//! sections, inverted sections, comments, partials, delimiter changes
//! and lambdas are supported.
//!
//! Rendering never fails: an unterminated tag is kept as text, an
//! unterminated section renders nothing from its open tag on, missing
//! variables and partials render as nothing.
//!
//! Data can be built directly, converted from [JsonValue] or
//! [YamlValue], or from anything serializable with [to_node].
//!
//!
//! # Samples
//!
//! ## Hello world
//!
//! ```
//! use stache::{render, Node};
//!
//! let data = Node::map([("you", "world")]);
//!
//! let result = render("hello, {{you}}!", &data);
//!
//! assert_eq!(result, "hello, world!")
//! ```
//!
//! ## Hello team
//!
//! ```
//! use stache::{render, Node, YamlValue};
//! let text = r#"
//!   {{#team}}
//!   hello, {{address}} {{name}}!
//!   {{/team}}
//! "#;
//! let data = r#"
//!   team:
//!     - name: john
//!       address: little
//!     - name: 42
//!       address: citizen
//! "#;
//!
//! let context = serde_yaml::from_str::<YamlValue>(data).unwrap();
//!
//! let result = render(text, &Node::from(&context));
//! assert_eq!(result, r#"
//!   hello, little john!
//!   hello, citizen 42!
//! "#);
//! ```
//!
//! ## Partials and lambdas
//!
//! ```
//! use std::collections::HashMap;
//! use stache::{render_with_partials, Lambda, Node};
//!
//! let partials = HashMap::from([("user", "<li>{{#bold}}{{name}}{{/bold}}</li>\n")]);
//! let data = Node::map([
//!     ("bold", Node::from(Lambda::section(|text| format!("<b>{}</b>", text).into()))),
//!     ("users", Node::list([
//!         Node::map([("name", "ann")]),
//!         Node::map([("name", "bob")]),
//!     ])),
//! ]);
//!
//! let result = render_with_partials("{{#users}}\n  {{>user}}\n{{/users}}\n", &data, &partials);
//! assert_eq!(result, "  <li><b>ann</b></li>\n  <li><b>bob</b></li>\n");
//! ```
mod context;
mod escape;
mod json;
mod node;
mod partials;
mod reader;
mod section;
mod visit;
mod yaml;

pub use self::escape::html_escape;
pub use self::json::{to_node, JsonValue};
pub use self::node::{Lambda, Map, Node};
pub use self::partials::PartialStore;
pub use self::yaml::YamlValue;

use self::context::Context;


/// Renders `template` against `data`, without partials.
pub fn render(template: &str, data: &Node) -> String {
    render_with_partials(template, data, &())
}

/// Renders `template` against `data`, expanding `{{>name}}` tags with the
/// templates of `partials`.
pub fn render_with_partials(template: &str, data: &Node, partials: &dyn PartialStore) -> String {
    let context = Context::new(data, partials);
    context.render_fragment(template, Default::default())
}
