//! Query text generator.
//!
//! Rewrites a token stream into PostgreSQL `tsquery` text in one pass. There is no parse tree:
//! the generator only remembers what kind of thing it emitted last, which is enough to decide
//! where an implicit `&` belongs.
//!
//! | Tokens                | Output              |
//! |-----------------------|---------------------|
//! | `foo bar`             | `foo & bar`         |
//! | `foo OR bar`          | `foo \| bar`        |
//! | `bar -foo`            | `bar & !foo`        |
//! | `"foo bar"`           | `('foo' <-> 'bar')` |
//! | `foo <3> bar`         | `foo <3> bar`       |
//! | `(foo OR bar) baz`    | `(foo \| bar) & baz`|
//!
//! Operators that have nothing to bind to are dropped instead of producing text the database
//! would reject: a leading or trailing `OR`, a dangling `-`, an unmatched `)`, an empty `()`.
//! Unclosed groups are closed at the end.

use std::mem;

use crate::{canonical::CanonicalQuery, lexer::Token};

/// What the generator emitted most recently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Last {
    /// Nothing yet.
    Start,
    /// An opening parenthesis.
    Open,
    /// A complete operand: word, phrase or closed group.
    Operand,
}

/// A binary operator waiting for its right operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Connector {
    /// `&`
    And,
    /// `|`
    Or,
    /// `<n>`, written `<->` for a distance of 1
    Distance(u32),
}

impl Connector {
    /// Appends the operator, with surrounding spaces, to `out`.
    fn render(self, out: &mut String) {
        match self {
            Self::And => out.push_str(" & "),
            Self::Or => out.push_str(" | "),
            Self::Distance(1) => out.push_str(" <-> "),
            Self::Distance(n) => out.push_str(&format!(" <{n}> ")),
        }
    }
}

/// Generator state saved when a group opens, used to unwind an empty group.
#[derive(Debug, Clone, Copy)]
struct Frame {
    /// Output length before the group and its connector were written.
    rewind: usize,
    /// `last` before the group.
    last: Last,
    /// Pending connector before the group.
    pending: Option<Connector>,
    /// Pending negation before the group.
    negate: bool,
}

/// Single-pass `tsquery` writer.
struct Generator {
    /// Output text.
    out: String,
    /// Kind of the last emitted item.
    last: Last,
    /// Explicit operator seen since the last operand.
    pending: Option<Connector>,
    /// Whether the next operand is negated.
    negate: bool,
    /// Open groups, innermost last.
    groups: Vec<Frame>,
}

impl Generator {
    /// Creates an empty generator.
    fn new() -> Self {
        Self {
            out: String::new(),
            last: Last::Start,
            pending: None,
            negate: false,
            groups: Vec::new(),
        }
    }

    /// Consumes the tokens and returns the generated query.
    fn run(mut self, tokens: &[Token]) -> CanonicalQuery {
        for token in tokens {
            match token {
                Token::Word(word) if word.is_empty() => {}
                Token::QuotedPhrase(phrase) if phrase.trim().is_empty() => {}
                Token::Word(word) => {
                    self.begin_operand();
                    push_word(&mut self.out, word);
                    self.last = Last::Operand;
                }
                Token::QuotedPhrase(phrase) => {
                    self.begin_operand();
                    push_phrase(&mut self.out, phrase);
                    self.last = Last::Operand;
                }
                Token::And => self.connect(Connector::And),
                Token::Or => self.connect(Connector::Or),
                Token::Around(n) => self.connect(Connector::Distance(*n)),
                Token::Minus => self.negate = !self.negate,
                Token::Open => self.open(),
                Token::Close => self.close(),
            }
        }

        while !self.groups.is_empty() {
            self.close();
        }

        CanonicalQuery::new(self.out)
    }

    /// Writes whatever joins the previous operand to the next one, then any negation.
    fn begin_operand(&mut self) {
        let pending = self.pending.take();
        if self.last == Last::Operand {
            pending.unwrap_or(Connector::And).render(&mut self.out);
        }
        if mem::take(&mut self.negate) {
            self.out.push('!');
        }
    }

    /// Records an explicit operator. Operators without a left operand are dropped.
    fn connect(&mut self, connector: Connector) {
        if self.last == Last::Operand {
            self.pending = Some(connector);
        }
    }

    /// Opens a group.
    fn open(&mut self) {
        self.groups.push(Frame {
            rewind: self.out.len(),
            last: self.last,
            pending: self.pending,
            negate: self.negate,
        });
        self.begin_operand();
        self.out.push('(');
        self.last = Last::Open;
    }

    /// Closes the innermost group. Unmatched closes are ignored.
    fn close(&mut self) {
        let Some(frame) = self.groups.pop() else {
            return;
        };

        if self.last == Last::Open {
            self.out.truncate(frame.rewind);
            self.last = frame.last;
            self.pending = frame.pending;
            self.negate = frame.negate;
            return;
        }

        self.pending = None;
        self.negate = false;
        self.out.push(')');
        self.last = Last::Operand;
    }
}

/// Returns true if `word` can be written into a `tsquery` without quoting.
fn is_plain(word: &str) -> bool {
    word.chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Appends `word` as a single-quoted `tsquery` lexeme.
fn push_quoted(out: &mut String, word: &str) {
    out.push('\'');
    for c in word.chars() {
        match c {
            '\'' => out.push_str("''"),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('\'');
}

/// Returns true if `word` is already a complete single-quoted `tsquery` lexeme.
fn is_quoted_lexeme(word: &str) -> bool {
    let Some(inner) = word
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
    else {
        return false;
    };
    if inner.is_empty() {
        return false;
    }

    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                if chars.next() != Some('\'') {
                    return false;
                }
            }
            '\\' => {
                if chars.next().is_none() {
                    return false;
                }
            }
            _ => {}
        }
    }
    true
}

/// Appends a bare word, quoting it when it carries `tsquery` syntax.
///
/// Words that are already quoted lexemes are written as they are, which keeps compiled output
/// stable when it is compiled again.
fn push_word(out: &mut String, word: &str) {
    if is_plain(word) || is_quoted_lexeme(word) {
        out.push_str(word);
    } else {
        push_quoted(out, word);
    }
}

/// Appends a phrase as quoted lexemes joined by the adjacency operator.
fn push_phrase(out: &mut String, phrase: &str) {
    out.push('(');
    for (i, word) in phrase.split_whitespace().enumerate() {
        if i > 0 {
            out.push_str(" <-> ");
        }
        push_quoted(out, word);
    }
    out.push(')');
}

/// Generates canonical `tsquery` text from a token stream.
pub fn generate(tokens: &[Token]) -> CanonicalQuery {
    Generator::new().run(tokens)
}
