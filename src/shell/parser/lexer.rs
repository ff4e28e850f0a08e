use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Token {
    Word(String),
    Pipe,
    RedirectIn,
    RedirectOut,
    Background,
}

/// Characters that always form a token of their own.
const OPERATORS: &str = "<>|&";

pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input: input.chars().peekable(),
        }
    }

    pub fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace();

        let token = match self.peek_char()? {
            '|' => Token::Pipe,
            '&' => Token::Background,
            '<' => Token::RedirectIn,
            '>' => Token::RedirectOut,
            _ => return Some(self.read_word()),
        };
        self.read_char();
        Some(token)
    }

    fn read_char(&mut self) -> Option<char> {
        self.input.next()
    }

    fn peek_char(&mut self) -> Option<char> {
        self.input.peek().copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if !c.is_whitespace() {
                break;
            }
            self.read_char();
        }
    }

    fn read_word(&mut self) -> Token {
        let mut word = String::new();

        while let Some(c) = self.peek_char() {
            if c.is_whitespace() || OPERATORS.contains(c) {
                break;
            }
            word.push(c);
            self.read_char();
        }

        Token::Word(word)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

/// Splits a raw line into its tokens, left to right.
pub fn tokenize(line: &str) -> Vec<Token> {
    Lexer::new(line).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(s: &str) -> Token {
        Token::Word(s.to_string())
    }

    #[test]
    fn test_simple_command() {
        let mut lexer = Lexer::new("ls -l");
        assert_eq!(lexer.next_token(), Some(word("ls")));
        assert_eq!(lexer.next_token(), Some(word("-l")));
        assert_eq!(lexer.next_token(), None);
    }

    #[test]
    fn test_pipe_spacing_is_irrelevant() {
        let expected = vec![word("a"), Token::Pipe, word("b")];
        assert_eq!(tokenize("a|b"), expected);
        assert_eq!(tokenize("a | b"), expected);
        assert_eq!(tokenize("  a\t|   b  "), expected);
    }

    #[test]
    fn test_redirections() {
        assert_eq!(
            tokenize("sort<in.txt>out.txt"),
            vec![
                word("sort"),
                Token::RedirectIn,
                word("in.txt"),
                Token::RedirectOut,
                word("out.txt"),
            ]
        );
    }

    #[test]
    fn test_background_operator() {
        assert_eq!(
            tokenize("sleep 5&"),
            vec![word("sleep"), word("5"), Token::Background]
        );
    }

    #[test]
    fn test_doubled_operators_are_separate_tokens() {
        assert_eq!(
            tokenize("a || b >> c"),
            vec![
                word("a"),
                Token::Pipe,
                Token::Pipe,
                word("b"),
                Token::RedirectOut,
                Token::RedirectOut,
                word("c"),
            ]
        );
    }

    #[test]
    fn test_quotes_and_escapes_are_plain_characters() {
        assert_eq!(
            tokenize(r#"echo "hello world" a\ b #x"#),
            vec![
                word("echo"),
                word("\"hello"),
                word("world\""),
                word("a\\"),
                word("b"),
                word("#x"),
            ]
        );
    }

    #[test]
    fn test_blank_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \t  ").is_empty());
    }
}
