use log::{debug, trace};


#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Delimiters<'a> {
    pub(crate) open: &'a str,
    pub(crate) close: &'a str,
}

impl<'a> Delimiters<'a> {
    pub(crate) fn new(open: &'a str, close: &'a str) -> Self {
        Delimiters { open, close }
    }
}

impl Default for Delimiters<'_> {
    fn default() -> Self {
        Delimiters::new("{{", "}}")
    }
}


#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Token<'a> {
    Text(&'a str),
    Variable(&'a str),
    UnescapedVariable(&'a str),
    /// Section open tags carry the delimiters in effect at the tag, used
    /// to read the text a section lambda returns.
    SectionOpen(&'a str, Delimiters<'a>),
    InvertedSectionOpen(&'a str, Delimiters<'a>),
    SectionClose(&'a str),
    /// Name and indentation of a standalone partial tag.
    Partial(&'a str, &'a str),
    Comment,
    DelimiterChange(Delimiters<'a>),
}

impl<'a> Token<'a> {
    fn is_standalone_candidate(&self) -> bool {
        matches!(
            self,
            Token::SectionOpen(..) | Token::InvertedSectionOpen(..) | Token::SectionClose(_)
                | Token::Partial(..) | Token::Comment | Token::DelimiterChange(_)
        )
    }

    fn tag(text: &'a str, delimiters: Delimiters<'a>) -> Token<'a> {
        match text.chars().next() {
            Some('#') => Token::SectionOpen(text.trim_sigil(), delimiters),
            Some('^') => Token::InvertedSectionOpen(text.trim_sigil(), delimiters),
            Some('/') => Token::SectionClose(text.trim_sigil()),
            Some('!') => Token::Comment,
            Some('>') => Token::Partial(text.trim_sigil(), ""),
            Some('&') => Token::UnescapedVariable(text.trim_sigil()),
            _ => Token::Variable(text)
        }
    }
}


/// A token with the exact source text it was read from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Lexeme<'a> {
    pub(crate) token: Token<'a>,
    pub(crate) raw: &'a str,
    pub(crate) start: usize,
}

impl<'a> Lexeme<'a> {
    fn text(raw: &'a str, start: usize) -> Self {
        Lexeme { token: Token::Text(raw), raw, start }
    }

    fn end(&self) -> usize {
        self.start + self.raw.len()
    }

    fn text_content(&self) -> Option<&'a str> {
        match self.token {
            Token::Text(text) => Some(text),
            _ => None
        }
    }
}


/// Scan cursor over a template: the position and the delimiters
/// currently in effect.
#[derive(Clone, Debug)]
pub(crate) struct Reader<'a> {
    input: &'a str,
    delimiters: Delimiters<'a>,
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn with_delimiters(input: &'a str, delimiters: Delimiters<'a>) -> Self {
        Reader { input, delimiters, pos: 0 }
    }

    pub(crate) fn pop_front(&mut self) -> Option<Lexeme<'a>> {
        if self.pos >= self.input.len() {
            None
        } else {
            let tail = &self.input[self.pos..];
            let lexeme = if tail.starts_with(self.delimiters.open) {
                self.read_tag(tail)
            } else {
                self.read_text(tail)
            };
            Some(lexeme)
        }
    }

    fn read_text(&mut self, tail: &'a str) -> Lexeme<'a> {
        let start = self.pos;
        let len = tail.find(self.delimiters.open).unwrap_or(tail.len());
        self.pos += len;
        Lexeme::text(&tail[..len], start)
    }

    fn read_tag(&mut self, tail: &'a str) -> Lexeme<'a> {
        let start = self.pos;
        let Some((span, len)) = tail.span_tag(self.delimiters) else {
            // unterminated tag, the rest of the input is plain text
            debug!("unterminated tag at {}", start);
            self.pos = self.input.len();
            return Lexeme::text(tail, start);
        };
        let raw = &tail[..len];
        self.pos += len;
        let token = match span {
            TagSpan::Plain(text) => Token::tag(text, self.delimiters),
            TagSpan::Triple(text) => Token::UnescapedVariable(text),
            TagSpan::Delimiters(text) => match parse_delimiters(text) {
                Some(delimiters) => {
                    self.delimiters = delimiters;
                    Token::DelimiterChange(delimiters)
                },
                None => {
                    debug!("malformed delimiters tag {:?}", raw);
                    Token::Text(raw)
                }
            },
            TagSpan::Malformed => {
                debug!("malformed tag {:?}", raw);
                Token::Text(raw)
            }
        };
        Lexeme { token, raw, start }
    }
}


/// Reads a whole template with the default delimiters.
pub(crate) fn tokenize(input: &str) -> Vec<Lexeme<'_>> {
    tokenize_with(input, Delimiters::default())
}

/// Reads a whole template, starting from the given delimiters.
pub(crate) fn tokenize_with<'a>(input: &'a str, delimiters: Delimiters<'a>) -> Vec<Lexeme<'a>> {
    let mut reader = Reader::with_delimiters(input, delimiters);
    let mut lexemes: Vec<Lexeme<'a>> = Vec::new();
    while let Some(lexeme) = reader.pop_front() {
        trace!("read {:?}", lexeme.token);
        let contiguous_text = lexeme.text_content().is_some() && matches!(
            lexemes.last(),
            Some(last) if last.text_content().is_some() && last.end() == lexeme.start
        );
        if contiguous_text {
            if let Some(last) = lexemes.last_mut() {
                let merged = &input[last.start..lexeme.end()];
                *last = Lexeme::text(merged, last.start);
            }
        } else {
            lexemes.push(lexeme);
        }
    }
    trim_standalone(lexemes)
}


/// Removes the indentation and the line ending around tags that stand
/// alone on their line. The indentation of a standalone partial is kept
/// on its token.
fn trim_standalone(mut lexemes: Vec<Lexeme<'_>>) -> Vec<Lexeme<'_>> {
    // kept range of each text, decided on the untrimmed texts
    let mut kept = lexemes.iter()
        .map(|lexeme| (0, lexeme.raw.len()))
        .collect::<Vec<_>>();
    let last = lexemes.len().saturating_sub(1);

    for i in 0..lexemes.len() {
        if !lexemes[i].token.is_standalone_candidate() {
            continue;
        }
        let before = if i == 0 {
            Some(None)
        } else {
            let previous = &lexemes[i - 1];
            previous.text_content()
                .and_then(|text| text.indent_start(previous.start == 0))
                .map(|line_start| Some((i - 1, line_start)))
        };
        let after = if i == last {
            Some(None)
        } else {
            lexemes[i + 1].text_content()
                .and_then(|text| text.line_end(i + 1 == last))
                .map(|line_end| Some((i + 1, line_end)))
        };
        if let (Some(before), Some(after)) = (before, after) {
            if let Some((index, line_start)) = before {
                kept[index].1 = line_start;
                if let Token::Partial(name, _) = lexemes[i].token {
                    let text = lexemes[index].raw;
                    lexemes[i].token = Token::Partial(name, &text[line_start..]);
                }
            }
            if let Some((index, line_end)) = after {
                kept[index].0 = line_end;
            }
        }
    }

    lexemes.into_iter()
        .zip(kept)
        .filter_map(|(lexeme, (from, to))| match lexeme.token {
            Token::Text(text) if from > 0 || to < text.len() => {
                if from < to {
                    Some(Lexeme::text(&text[from..to], lexeme.start + from))
                } else {
                    None
                }
            },
            _ => Some(lexeme)
        })
        .collect()
}


fn parse_delimiters(text: &str) -> Option<Delimiters<'_>> {
    let words = text.split_ascii_whitespace().collect::<Vec<_>>();
    match words[..] {
        [open, close] if !open.contains('=') && !close.contains('=') =>
            Some(Delimiters::new(open, close)),
        _ => None
    }
}


enum TagSpan<'a> {
    Plain(&'a str),
    Triple(&'a str),
    Delimiters(&'a str),
    Malformed,
}

trait ReaderStringOps {
    fn span_tag(&self, delimiters: Delimiters) -> Option<(TagSpan<'_>, usize)>;
    fn indent_start(&self, at_input_start: bool) -> Option<usize>;
    fn line_end(&self, at_input_end: bool) -> Option<usize>;
    fn trim_sigil(&self) -> &str;
    fn is_indent(&self) -> bool;
}

impl ReaderStringOps for str {
    // the tag at the beginning of the string and its length, None when
    // the close delimiter is missing
    fn span_tag(&self, delimiters: Delimiters) -> Option<(TagSpan<'_>, usize)> {
        let odl = delimiters.open.len();
        let cdl = delimiters.close.len();
        let inner = &self[odl..];
        let sigil_close = match inner.chars().next() {
            Some('{') => Some(("}", '{')),
            Some('=') => Some(("=", '=')),
            _ => None
        };
        if let Some((end_sigil, sigil)) = sigil_close {
            let closing = format!("{}{}", end_sigil, delimiters.close);
            if let Some(p) = inner[1..].find(&closing).map(|p| p + 1) {
                let text = inner[1..p].trim();
                let span = match sigil {
                    '{' => TagSpan::Triple(text),
                    _ => TagSpan::Delimiters(text)
                };
                return Some((span, odl + p + closing.len()));
            }
            return inner.find(delimiters.close)
                .map(|p| (TagSpan::Malformed, odl + p + cdl));
        }
        inner.find(delimiters.close)
            .map(|p| (TagSpan::Plain(inner[..p].trim()), odl + p + cdl))
    }

    // position where the indentation before a tag starts, when nothing
    // else precedes the tag on its line
    fn indent_start(&self, at_input_start: bool) -> Option<usize> {
        let line_start = match self.rfind('\n') {
            Some(p) => p + 1,
            None if at_input_start => 0,
            None => return None
        };
        self[line_start..].is_indent().then_some(line_start)
    }

    // position after the line ending that follows a tag, when nothing
    // else follows the tag on its line
    fn line_end(&self, at_input_end: bool) -> Option<usize> {
        match self.find('\n') {
            Some(p) => self[..p].trim_end_matches('\r').is_indent().then_some(p + 1),
            None if at_input_end => self.is_indent().then_some(self.len()),
            None => None
        }
    }

    fn trim_sigil(&self) -> &str {
        self[1..].trim_start()
    }

    fn is_indent(&self) -> bool {
        self.chars().all(|c| c == ' ' || c == '\t')
    }
}
