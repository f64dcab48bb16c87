//! Query lexer (tokenizer).
//!
//! Converts free-form, web-style search text into a stream of tokens for the generator. The
//! scan is a single left-to-right pass driven by an explicit state machine.
//!
//! | Input                          | Token                |
//! |--------------------------------|----------------------|
//! | `OR`, `or`, `\|`               | [`Token::Or`]        |
//! | `AND`, `and`, `&`              | [`Token::And`]       |
//! | leading `-` or `!`             | [`Token::Minus`]     |
//! | `AROUND(n)`, `around(n)`, `<n>`| [`Token::Around`]    |
//! | `<->`                          | [`Token::Around`] (1)|
//! | `(` / `)`                      | [`Token::Open`] / [`Token::Close`] |
//! | `"..."`                        | [`Token::QuotedPhrase`] |
//! | `'...'`                        | [`Token::Word`], quotes kept |
//! | anything else                  | [`Token::Word`]      |

use std::mem;

use crate::error::QueryError;

/// A token in the search query language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A bare word (search term).
    Word(String),

    /// A quoted phrase with internal whitespace collapsed to single spaces.
    QuotedPhrase(String),

    /// Explicit conjunction.
    And,

    /// Explicit disjunction.
    Or,

    /// Negation prefix, binding to the next term or group.
    Minus,

    /// Proximity operator with the maximum word distance.
    Around(u32),

    /// Left parenthesis.
    Open,

    /// Right parenthesis.
    Close,
}

/// The lexer's active state. Exactly one is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Between tokens.
    Scanning,
    /// Inside a double-quoted phrase.
    InQuote,
    /// Accumulating a bareword.
    InWord,
    /// Reading the distance of a `<n>` or `AROUND(n)` operator.
    InProximityParam,
    /// Inside a single-quoted lexeme. Only whitespace ends the word here.
    InLexeme,
}

/// Tokenizes a query string.
struct Lexer<'a> {
    /// The original input string.
    input: &'a str,
    /// Current state.
    state: State,
    /// Tokens emitted so far.
    tokens: Vec<Token>,
    /// Text accumulated for the current word, phrase or proximity distance.
    buffer: String,
    /// Byte position where the current word, phrase or proximity operator started.
    start: usize,
    /// Delimiter that closes the current proximity distance (`>` or `)`).
    closer: char,
    /// Set once whitespace follows the digits of a proximity distance.
    distance_done: bool,
    /// Set after a backslash inside a quoted lexeme.
    escaped: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    fn new(input: &'a str) -> Self {
        Self {
            input,
            state: State::Scanning,
            tokens: Vec::new(),
            buffer: String::new(),
            start: 0,
            closer: '>',
            distance_done: false,
            escaped: false,
        }
    }

    /// Creates an error at a specific position.
    fn error_at(&self, message: impl Into<String>, position: usize) -> QueryError {
        QueryError::malformed(message, position, self.input)
    }

    /// Tokenizes the entire input, returning all tokens or an error.
    fn tokenize(mut self) -> Result<Vec<Token>, QueryError> {
        for (position, ch) in self.input.char_indices() {
            match self.state {
                State::Scanning => self.scan(position, ch),
                State::InWord => self.read_word(position, ch),
                State::InQuote => self.read_phrase(ch),
                State::InProximityParam => self.read_distance(position, ch)?,
                State::InLexeme => self.read_lexeme(ch),
            }
        }

        match self.state {
            State::Scanning => {}
            State::InWord | State::InLexeme => self.flush_word(),
            // Unterminated quotes are closed at end of input.
            State::InQuote => self.flush_phrase(),
            State::InProximityParam => {
                return Err(self.error_at("unterminated proximity operator", self.start));
            }
        }

        Ok(self.tokens)
    }

    /// Handles a character while between tokens.
    fn scan(&mut self, position: usize, ch: char) {
        match ch {
            c if c.is_whitespace() => {}
            '"' => {
                self.buffer.clear();
                self.start = position;
                self.state = State::InQuote;
            }
            '(' => self.tokens.push(Token::Open),
            ')' => self.tokens.push(Token::Close),
            '|' => self.tokens.push(Token::Or),
            '&' => self.tokens.push(Token::And),
            '-' | '!' => self.tokens.push(Token::Minus),
            '<' => self.begin_distance(position, '>'),
            '\'' => {
                self.buffer.clear();
                self.buffer.push(ch);
                self.start = position;
                self.begin_lexeme();
            }
            _ => {
                self.buffer.clear();
                self.buffer.push(ch);
                self.start = position;
                self.state = State::InWord;
            }
        }
    }

    /// Handles a character while accumulating a bareword.
    fn read_word(&mut self, position: usize, ch: char) {
        // In a word that opened with a quote, another quote reopens the lexeme (`''` escapes).
        if ch == '\'' && self.buffer.starts_with('\'') {
            self.buffer.push(ch);
            self.begin_lexeme();
            return;
        }

        if !is_terminator(ch) {
            self.buffer.push(ch);
            return;
        }

        if ch == '(' && self.buffer.eq_ignore_ascii_case("AROUND") {
            self.begin_distance(self.start, ')');
            return;
        }

        self.flush_word();
        self.scan(position, ch);
    }

    /// Handles a character inside a quoted phrase.
    fn read_phrase(&mut self, ch: char) {
        if ch == '"' {
            self.flush_phrase();
        } else {
            self.buffer.push(ch);
        }
    }

    /// Handles a character inside a single-quoted lexeme.
    ///
    /// Operator characters are part of the lexeme. A backslash escapes the next character and
    /// a quote returns to the bareword, which a second quote re-enters.
    fn read_lexeme(&mut self, ch: char) {
        if mem::take(&mut self.escaped) {
            self.buffer.push(ch);
            return;
        }

        match ch {
            c if c.is_whitespace() => self.flush_word(),
            '\\' => {
                self.buffer.push(ch);
                self.escaped = true;
            }
            '\'' => {
                self.buffer.push(ch);
                self.state = State::InWord;
            }
            _ => self.buffer.push(ch),
        }
    }

    /// Handles a character inside a proximity distance.
    fn read_distance(&mut self, position: usize, ch: char) -> Result<(), QueryError> {
        if ch == self.closer {
            if self.buffer.is_empty() {
                return Err(self.error_at("missing proximity distance", position));
            }
            let distance = self.buffer.parse::<u32>().map_err(|_| {
                self.error_at(
                    format!("proximity distance out of range: {}", self.buffer),
                    self.start,
                )
            })?;
            self.tokens.push(Token::Around(distance));
            self.buffer.clear();
            self.state = State::Scanning;
            return Ok(());
        }

        if ch.is_whitespace() {
            self.distance_done = !self.buffer.is_empty();
            return Ok(());
        }

        // `<->` is the adjacency operator, distance 1.
        if ch == '-' && self.closer == '>' && self.buffer.is_empty() {
            self.buffer.push('1');
            self.distance_done = true;
            return Ok(());
        }

        if ch.is_ascii_digit() && !self.distance_done {
            self.buffer.push(ch);
            return Ok(());
        }

        Err(self.error_at(
            format!("invalid character in proximity distance: {ch:?}"),
            position,
        ))
    }

    /// Starts reading a proximity distance closed by `closer`.
    fn begin_distance(&mut self, start: usize, closer: char) {
        self.buffer.clear();
        self.start = start;
        self.closer = closer;
        self.distance_done = false;
        self.state = State::InProximityParam;
    }

    /// Enters a quoted lexeme; the opening quote is already in the buffer.
    fn begin_lexeme(&mut self) {
        self.escaped = false;
        self.state = State::InLexeme;
    }

    /// Emits the accumulated bareword, reclassifying keywords.
    fn flush_word(&mut self) {
        let word = mem::take(&mut self.buffer);
        let token = if word.eq_ignore_ascii_case("AND") {
            Token::And
        } else if word.eq_ignore_ascii_case("OR") {
            Token::Or
        } else {
            Token::Word(word)
        };
        self.tokens.push(token);
        self.state = State::Scanning;
    }

    /// Emits the accumulated phrase with whitespace collapsed. Empty phrases are dropped.
    fn flush_phrase(&mut self) {
        let phrase = self.buffer.split_whitespace().collect::<Vec<_>>().join(" ");
        self.buffer.clear();
        if !phrase.is_empty() {
            self.tokens.push(Token::QuotedPhrase(phrase));
        }
        self.state = State::Scanning;
    }
}

/// Returns true if `ch` ends a bareword.
fn is_terminator(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '"' | '(' | ')' | '|' | '&' | '<')
}

/// Tokenizes a search query string.
///
/// Unterminated quotes are closed at end of input. A word that opens with `'` is read as a
/// `tsquery` lexeme, so operator characters inside it do not end the word. A proximity operator whose distance is not
/// a non-negative integer fails with [`QueryError::MalformedQuery`].
pub fn tokenize(input: &str) -> Result<Vec<Token>, QueryError> {
    Lexer::new(input).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(s: &str) -> Token {
        Token::Word(s.into())
    }

    fn phrase(s: &str) -> Token {
        Token::QuotedPhrase(s.into())
    }

    #[test]
    fn empty_input() {
        assert_eq!(tokenize("").unwrap(), vec![]);
        assert_eq!(tokenize("   \t ").unwrap(), vec![]);
    }

    #[test]
    fn multiple_words() {
        assert_eq!(
            tokenize("  rust   async ").unwrap(),
            vec![word("rust"), word("async")]
        );
    }

    #[test]
    fn keywords_case_insensitive() {
        assert_eq!(
            tokenize("a OR b or c Or d").unwrap(),
            vec![
                word("a"),
                Token::Or,
                word("b"),
                Token::Or,
                word("c"),
                Token::Or,
                word("d")
            ]
        );
        assert_eq!(
            tokenize("a AND b and c").unwrap(),
            vec![word("a"), Token::And, word("b"), Token::And, word("c")]
        );
    }

    #[test]
    fn symbol_operators() {
        assert_eq!(
            tokenize("a|b&c").unwrap(),
            vec![word("a"), Token::Or, word("b"), Token::And, word("c")]
        );
    }

    #[test]
    fn keyword_prefix_is_a_word() {
        assert_eq!(
            tokenize("oregon android").unwrap(),
            vec![word("oregon"), word("android")]
        );
    }

    #[test]
    fn negation_prefixes() {
        assert_eq!(
            tokenize("-foo !bar").unwrap(),
            vec![Token::Minus, word("foo"), Token::Minus, word("bar")]
        );
    }

    #[test]
    fn hyphen_inside_word() {
        assert_eq!(tokenize("e-mail").unwrap(), vec![word("e-mail")]);
    }

    #[test]
    fn negated_group_and_phrase() {
        assert_eq!(
            tokenize("-(a b) -\"c d\"").unwrap(),
            vec![
                Token::Minus,
                Token::Open,
                word("a"),
                word("b"),
                Token::Close,
                Token::Minus,
                phrase("c d")
            ]
        );
    }

    #[test]
    fn quoted_phrase_collapses_whitespace() {
        assert_eq!(
            tokenize("\"  hello \t  world  \"").unwrap(),
            vec![phrase("hello world")]
        );
    }

    #[test]
    fn quote_terminates_word() {
        assert_eq!(
            tokenize("foo\"bar baz\"").unwrap(),
            vec![word("foo"), phrase("bar baz")]
        );
    }

    #[test]
    fn unterminated_quote_is_closed() {
        assert_eq!(
            tokenize("foo \"bar baz").unwrap(),
            vec![word("foo"), phrase("bar baz")]
        );
    }

    #[test]
    fn empty_phrase_dropped() {
        assert_eq!(tokenize("\"\" foo \"  \"").unwrap(), vec![word("foo")]);
    }

    #[test]
    fn around_keyword() {
        assert_eq!(
            tokenize("foo around(3) bar").unwrap(),
            vec![word("foo"), Token::Around(3), word("bar")]
        );
        assert_eq!(
            tokenize("foo AROUND( 12 ) bar").unwrap(),
            vec![word("foo"), Token::Around(12), word("bar")]
        );
    }

    #[test]
    fn around_without_paren_is_a_word() {
        assert_eq!(
            tokenize("look around").unwrap(),
            vec![word("look"), word("around")]
        );
    }

    #[test]
    fn around_with_space_before_paren() {
        assert_eq!(
            tokenize("around (3)").unwrap(),
            vec![word("around"), Token::Open, word("3"), Token::Close]
        );
    }

    #[test]
    fn angle_shorthand() {
        assert_eq!(
            tokenize("foo <3> bar").unwrap(),
            vec![word("foo"), Token::Around(3), word("bar")]
        );
        assert_eq!(
            tokenize("foo<0>bar").unwrap(),
            vec![word("foo"), Token::Around(0), word("bar")]
        );
    }

    #[test]
    fn non_numeric_distance_fails() {
        let err = tokenize("foo <bar>").unwrap_err();
        assert_eq!(err.position(), 5);
        assert!(err.message().contains("invalid character"));
        assert_eq!(err.query(), "foo <bar>");
    }

    #[test]
    fn non_numeric_around_fails() {
        let err = tokenize("foo AROUND(x) bar").unwrap_err();
        assert_eq!(err.position(), 11);
    }

    #[test]
    fn adjacency_operator() {
        assert_eq!(
            tokenize("('foo' <-> 'bar')").unwrap(),
            vec![
                Token::Open,
                word("'foo'"),
                Token::Around(1),
                word("'bar'"),
                Token::Close
            ]
        );
    }

    #[test]
    fn negative_distance_fails() {
        let err = tokenize("foo <-1> bar").unwrap_err();
        assert_eq!(err.position(), 6);
    }

    #[test]
    fn split_distance_fails() {
        let err = tokenize("foo <1 2> bar").unwrap_err();
        assert_eq!(err.position(), 7);
    }

    #[test]
    fn empty_distance_fails() {
        let err = tokenize("foo <> bar").unwrap_err();
        assert!(err.message().contains("missing"));
        assert_eq!(err.position(), 5);
    }

    #[test]
    fn overflowing_distance_fails() {
        let err = tokenize("a <99999999999> b").unwrap_err();
        assert!(err.message().contains("out of range"));
        assert_eq!(err.position(), 2);
    }

    #[test]
    fn unterminated_distance_fails() {
        let err = tokenize("foo <3").unwrap_err();
        assert!(err.message().contains("unterminated"));
        assert_eq!(err.position(), 4);
    }

    #[test]
    fn quoted_lexemes() {
        assert_eq!(
            tokenize("'a<b' c").unwrap(),
            vec![word("'a<b'"), word("c")]
        );
        assert_eq!(
            tokenize("('a(b' <-> 'x)y')").unwrap(),
            vec![
                Token::Open,
                word("'a(b'"),
                Token::Around(1),
                word("'x)y'"),
                Token::Close
            ]
        );
        assert_eq!(tokenize("'a|b&c'").unwrap(), vec![word("'a|b&c'")]);
    }

    #[test]
    fn quoted_lexeme_escapes() {
        assert_eq!(tokenize("'it''s'").unwrap(), vec![word("'it''s'")]);
        assert_eq!(
            tokenize("'a\\'b|c' d").unwrap(),
            vec![word("'a\\'b|c'"), word("d")]
        );
        assert_eq!(tokenize("'a\\\\b'").unwrap(), vec![word("'a\\\\b'")]);
    }

    #[test]
    fn quoted_lexeme_ends_at_quote() {
        assert_eq!(
            tokenize("'a'|b").unwrap(),
            vec![word("'a'"), Token::Or, word("b")]
        );
        assert_eq!(tokenize("'a')").unwrap(), vec![word("'a'"), Token::Close]);
    }

    #[test]
    fn unterminated_lexeme_ends_at_whitespace() {
        assert_eq!(
            tokenize("'tis the (season").unwrap(),
            vec![word("'tis"), word("the"), Token::Open, word("season")]
        );
        assert_eq!(tokenize("'a|b").unwrap(), vec![word("'a|b")]);
    }

    #[test]
    fn apostrophe_inside_word() {
        assert_eq!(
            tokenize("don't(x)").unwrap(),
            vec![word("don't"), Token::Open, word("x"), Token::Close]
        );
    }

    #[test]
    fn parentheses() {
        assert_eq!(
            tokenize("(foo OR bar) baz").unwrap(),
            vec![
                Token::Open,
                word("foo"),
                Token::Or,
                word("bar"),
                Token::Close,
                word("baz")
            ]
        );
    }

    #[test]
    fn multibyte_positions() {
        let err = tokenize("café <x>").unwrap_err();
        assert_eq!(err.position(), 7);
        assert_eq!(tokenize("naïve").unwrap(), vec![word("naïve")]);
    }
}
