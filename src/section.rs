use log::{debug, trace};
use crate::context::Context;
use crate::node::Node;
use crate::reader::{Delimiters, Lexeme, Token};
use crate::visit::{render_node, Escape};


#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum SectionKind {
    Normal,
    Inverted,
}

/// Where the render loop stands in the token stream.
///
/// Inside a section, tokens are only counted until the close tag that
/// balances the open one; the body in between is rendered in one go.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum State<'t> {
    OutsideSection,
    InSection {
        kind: SectionKind,
        name: &'t str,
        delimiters: Delimiters<'t>,
        body_start: usize,
        depth: usize,
    },
}

impl<'t> State<'t> {
    /// Consumes `lexemes[index]`, returning the next state and the text
    /// produced.
    pub(crate) fn step(
        self, lexemes: &[Lexeme<'t>], index: usize, context: &Context
    ) -> (State<'t>, String) {
        let token = lexemes[index].token;
        match self {
            State::OutsideSection => outside_section(token, index, context),
            State::InSection { kind, name, delimiters, body_start, depth } => {
                match token {
                    Token::SectionOpen(n, _) | Token::InvertedSectionOpen(n, _) if n == name => {
                        (State::InSection { kind, name, delimiters, body_start, depth: depth + 1 }, String::new())
                    },
                    Token::SectionClose(n) if n == name && depth > 0 => {
                        (State::InSection { kind, name, delimiters, body_start, depth: depth - 1 }, String::new())
                    },
                    Token::SectionClose(n) if n == name => {
                        let body = &lexemes[body_start..index];
                        let text = render_section(kind, name, delimiters, body, context);
                        (State::OutsideSection, text)
                    },
                    _ => (self, String::new())
                }
            }
        }
    }
}

fn outside_section<'t>(token: Token<'t>, index: usize, context: &Context) -> (State<'t>, String) {
    let text = match token {
        Token::Text(text) => text.to_owned(),
        Token::Variable(name) => render_node(context.get_node(name), context, Escape::Html),
        Token::UnescapedVariable(name) => render_node(context.get_node(name), context, Escape::Raw),
        Token::SectionOpen(name, delimiters) => {
            return (enter(SectionKind::Normal, name, delimiters, index), String::new());
        },
        Token::InvertedSectionOpen(name, delimiters) => {
            return (enter(SectionKind::Inverted, name, delimiters, index), String::new());
        },
        Token::Partial(name, indent) => context.render_partial(name, indent),
        Token::SectionClose(name) => {
            debug!("close tag without open section {:?}", name);
            String::new()
        },
        Token::Comment | Token::DelimiterChange(_) => String::new()
    };
    (State::OutsideSection, text)
}

fn enter<'t>(kind: SectionKind, name: &'t str, delimiters: Delimiters<'t>, index: usize) -> State<'t> {
    trace!("enter {:?} section {:?}", kind, name);
    State::InSection {
        kind,
        name,
        delimiters,
        body_start: index + 1,
        depth: 0
    }
}

fn render_section(
    kind: SectionKind, name: &str, delimiters: Delimiters, body: &[Lexeme], context: &Context
) -> String {
    let node = context.get_node(name);
    match kind {
        SectionKind::Inverted if node.is_falsy() => render(body, context),
        SectionKind::Inverted => String::new(),
        SectionKind::Normal if node.is_falsy() => String::new(),
        SectionKind::Normal => match node {
            Node::List(items) => items.iter()
                .map(|item| render(body, &context.push(item)))
                .collect(),
            Node::Lambda(lambda) => {
                let source = body.iter().map(|lexeme| lexeme.raw).collect::<String>();
                let result = lambda.call(&source);
                let text = render_node(&result, context, Escape::Raw);
                context.render_fragment(&text, delimiters)
            },
            _ => render(body, &context.push(node))
        }
    }
}


/// Renders a token stream, from outside any section.
///
/// A section still open at the end of the stream renders nothing.
pub(crate) fn render(lexemes: &[Lexeme], context: &Context) -> String {
    let mut state = State::OutsideSection;
    let mut output = String::new();
    for index in 0..lexemes.len() {
        let (next, text) = state.step(lexemes, index, context);
        output.push_str(&text);
        state = next;
    }
    if let State::InSection { name, .. } = state {
        debug!("unterminated section {:?}", name);
    }
    output
}
