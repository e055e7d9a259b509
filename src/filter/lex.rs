//! Tokenizer for filter strings.
//!
//! The token set is tiny: `<`, `>`, bare words, and double-quoted strings
//! with `\"` and `\\` escapes. Every token remembers the byte offset it
//! started at so parse errors can point at it.

use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq)]
pub enum TokenType<'a> {
    Open,
    Close,
    Word(&'a str),
    Quoted(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token<'a> {
    pub position: usize,
    pub token: TokenType<'a>,
}

/// Iterator over the tokens of `src`.
pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek_char(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn quoted(&mut self, start: usize) -> Result<Token<'a>> {
        // Skip the opening quote.
        self.pos += 1;
        let mut value = String::new();
        let src = self.src;
        let mut chars = src[self.pos..].char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '"' => {
                    self.pos += i + 1;
                    return Ok(Token {
                        position: start,
                        token: TokenType::Quoted(value),
                    });
                }
                '\\' => match chars.next() {
                    Some((_, escaped @ ('"' | '\\'))) => value.push(escaped),
                    Some((j, other)) => {
                        return Err(Error::filter_parse(
                            self.pos + j,
                            format!("unknown escape sequence \\{other}"),
                        ))
                    }
                    None => break,
                },
                _ => value.push(c),
            }
        }
        Err(Error::filter_parse(start, "unterminated quoted string"))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.pos += self.peek_char().map_or(0, char::len_utf8);
        }

        let start = self.pos;
        let token = match self.peek_char()? {
            '<' => {
                self.pos += 1;
                TokenType::Open
            }
            '>' => {
                self.pos += 1;
                TokenType::Close
            }
            '"' => return Some(self.quoted(start)),
            _ => {
                let src = self.src;
                let rest = &src[start..];
                let len = rest
                    .find(|c: char| c.is_whitespace() || matches!(c, '<' | '>' | '"'))
                    .unwrap_or(rest.len());
                self.pos += len;
                TokenType::Word(&rest[..len])
            }
        };
        Some(Ok(Token {
            position: start,
            token,
        }))
    }
}

/// Quote a value so the lexer reads it back as one `Quoted` token.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(src: &str) -> Vec<TokenType<'_>> {
        Lexer::new(src).map(|t| t.unwrap().token).collect()
    }

    #[test]
    fn test_lex_structure() {
        assert_eq!(
            tokens("<cmc le 3>"),
            vec![
                TokenType::Open,
                TokenType::Word("cmc"),
                TokenType::Word("le"),
                TokenType::Word("3"),
                TokenType::Close,
            ]
        );
    }

    #[test]
    fn test_lex_quoted_with_escapes() {
        assert_eq!(
            tokens(r#"<name contains "say \"hi\" \\ <now>">"#),
            vec![
                TokenType::Open,
                TokenType::Word("name"),
                TokenType::Word("contains"),
                TokenType::Quoted(r#"say "hi" \ <now>"#.to_string()),
                TokenType::Close,
            ]
        );
    }

    #[test]
    fn test_lex_positions() {
        let positions: Vec<_> = Lexer::new("  <and  <all>>")
            .map(|t| t.unwrap().position)
            .collect();
        assert_eq!(positions, vec![2, 3, 8, 9, 12, 13]);
    }

    #[test]
    fn test_lex_unterminated() {
        let result: Result<Vec<_>> = Lexer::new(r#"<name contains "oops>"#).collect();
        assert!(matches!(result, Err(Error::FilterParse { position: 15, .. })));
    }

    #[test]
    fn test_quote_round_trip() {
        let value = r#"a "b" \c"#;
        let quoted = quote(value);
        assert_eq!(tokens(&quoted), vec![TokenType::Quoted(value.to_string())]);
    }
}
