use std::borrow::Cow;
use log::debug;
use crate::node::Node;
use crate::partials::PartialStore;
use crate::reader::{tokenize, tokenize_with, Delimiters};
use crate::section;


static NULL: Node = Node::Null;

/// Scopes a template is rendered against, innermost first.
///
/// Each frame borrows its parent, so pushing a scope never touches the
/// frames below it and the data tree is only ever read.
#[derive(Clone, Copy)]
pub(crate) struct Context<'a> {
    scope: &'a Node,
    parent: Option<&'a Context<'a>>,
    partials: &'a dyn PartialStore,
}

impl<'a> Context<'a> {
    pub(crate) fn new(root: &'a Node, partials: &'a dyn PartialStore) -> Self {
        Context {
            scope: root,
            parent: None,
            partials
        }
    }

    /// A context with `node` as its innermost scope.
    pub(crate) fn push<'b>(&'b self, node: &'b Node) -> Context<'b> {
        Context {
            scope: node,
            parent: Some(self),
            partials: self.partials
        }
    }

    /// Resolves `name`, `Null` when nothing matches.
    ///
    /// `.` is the innermost scope itself. Otherwise the first segment of
    /// a dotted name is searched from the innermost map scope outwards,
    /// and the next segments are looked up in what it resolved to.
    pub(crate) fn get_node(&self, name: &str) -> &'a Node {
        if name == "." {
            return self.scope;
        }
        let mut segments = name.split('.');
        let first = segments.next().unwrap_or_default();
        let Some(mut node) = self.lookup(first) else {
            return &NULL;
        };
        for segment in segments {
            match node.get(segment) {
                Some(child) => node = child,
                None => return &NULL
            }
        }
        node
    }

    fn lookup(&self, name: &str) -> Option<&'a Node> {
        let mut frame: &Context<'a> = self;
        loop {
            if let Some(node) = frame.scope.get(name) {
                return Some(node);
            }
            frame = frame.parent?;
        }
    }

    /// Renders the partial `name` against this context, every line of its
    /// text prefixed with `indent`. Unknown partials render as nothing.
    pub(crate) fn render_partial(&self, name: &str, indent: &str) -> String {
        match self.partials.get(name) {
            Some(text) => {
                let text = indent_lines(text, indent);
                let lexemes = tokenize(&text);
                section::render(&lexemes, self)
            },
            None => {
                debug!("missing partial {:?}", name);
                String::new()
            }
        }
    }

    /// Reads `text` as a template with the given initial delimiters and
    /// renders it against this context.
    pub(crate) fn render_fragment(&self, text: &str, delimiters: Delimiters) -> String {
        let lexemes = tokenize_with(text, delimiters);
        section::render(&lexemes, self)
    }
}


fn indent_lines<'t>(text: &'t str, indent: &str) -> Cow<'t, str> {
    if indent.is_empty() {
        Cow::Borrowed(text)
    } else {
        let mut result = String::with_capacity(text.len());
        for line in text.split_inclusive('\n') {
            result.push_str(indent);
            result.push_str(line);
        }
        Cow::Owned(result)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn render_name(context: &Context, name: &str) -> String {
        match context.get_node(name) {
            Node::String(s) => s.clone(),
            Node::Int(i) => i.to_string(),
            Node::Null => "null".to_owned(),
            other => format!("{:?}", other)
        }
    }

    #[test]
    fn implicit_iterator_is_innermost_scope() {
        let root = Node::map([("a", 1)]);
        let item = Node::from("item");
        let context = Context::new(&root, &());
        let inner = context.push(&item);
        assert_eq!(render_name(&inner, "."), "item");
    }

    #[test]
    fn lookup_falls_back_to_outer_scopes() {
        let root = Node::map([
            ("outer", Node::map([
                ("id", Node::from(1)),
                ("second", Node::map([("nothing", 2)]))
            ]))
        ]);
        let context = Context::new(&root, &());
        let outer = context.get_node("outer");
        let outer_context = context.push(outer);
        let second = outer_context.get_node("second");
        let second_context = outer_context.push(second);
        assert_eq!(render_name(&second_context, "id"), "1");
        assert_eq!(render_name(&second_context, "nothing"), "2");
        assert_eq!(render_name(&second_context, "missing"), "null");
    }

    #[test]
    fn innermost_key_wins_even_when_empty() {
        let root = Node::map([("description", "outer")]);
        let child = Node::map([("description", "")]);
        let context = Context::new(&root, &());
        let inner = context.push(&child);
        assert_eq!(render_name(&inner, "description"), "");
    }

    #[test]
    fn non_map_scopes_are_skipped() {
        let root = Node::map([("length", "hello")]);
        let value = Node::from("hello");
        let context = Context::new(&root, &());
        let inner = context.push(&value);
        assert_eq!(render_name(&inner, "length"), "hello");
    }

    #[test]
    fn dotted_names() {
        let root = Node::map([
            ("data", Node::map([
                ("author", Node::map([("name", "janl")]))
            ])),
            ("name", Node::from("root"))
        ]);
        let context = Context::new(&root, &());
        assert_eq!(render_name(&context, "data.author.name"), "janl");
        assert_eq!(render_name(&context, "data.author.missing"), "null");
        assert_eq!(render_name(&context, "data.name"), "null");
    }

    #[test]
    fn dotted_names_do_not_fall_back_after_first_segment() {
        let root = Node::map([
            ("a", Node::map([("b", Node::map([("x", 1)]))])),
            ("b", Node::map([("c", "ERROR")]))
        ]);
        let context = Context::new(&root, &());
        let a = context.get_node("a");
        let inner = context.push(a);
        assert_eq!(render_name(&inner, "b.c"), "null");
    }

    #[test]
    fn partial_is_rendered_in_current_scope() {
        let partials = HashMap::from([("p", "[{{name}}]")]);
        let root = Node::map([("name", "root")]);
        let item = Node::map([("name", "item")]);
        let context = Context::new(&root, &partials);
        let inner = context.push(&item);
        assert_eq!(inner.render_partial("p", ""), "[item]");
        assert_eq!(inner.render_partial("missing", ""), "");
    }

    #[test]
    fn partial_lines_are_indented() {
        let partials = HashMap::from([("p", "a\nb\n")]);
        let root = Node::Null;
        let context = Context::new(&root, &partials);
        assert_eq!(context.render_partial("p", "  "), "  a\n  b\n");
    }

    #[test]
    fn indent_lines_without_trailing_newline() {
        assert_eq!(indent_lines("a\nb", "> "), "> a\n> b");
        assert_eq!(indent_lines("", "> "), "");
        assert!(matches!(indent_lines("a", ""), Cow::Borrowed("a")));
    }
}
