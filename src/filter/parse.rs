//! Filter string parsing and serialization.
//!
//! ```text
//! filter := '<' head args '>'
//! group  := '<' ('and' | 'or') filter* '>'
//! leaf   := '<' code op value+ '>'  |  '<all>'  |  '<none>'
//! ```
//!
//! `Display` writes the same grammar back, so `parse(f.to_string())`
//! reproduces `f` exactly.

use std::fmt::{self, Write as _};
use std::iter::Peekable;

use super::lex::{quote, Lexer, Token, TokenType};
use super::predicate::{
    ColorAttr, Comparison, Filter, GroupMode, NumberAttr, SetOp, TextAttr, TextOp, TypeAttr,
};
use crate::cards::{ColorSet, Rarity};
use crate::error::{Error, Result};

impl TextAttr {
    const fn code(self) -> &'static str {
        match self {
            TextAttr::Name => "name",
            TextAttr::RulesText => "text",
            TextAttr::Flavor => "flavor",
            TextAttr::Artist => "artist",
        }
    }
}

impl TextOp {
    const fn code(self) -> &'static str {
        match self {
            TextOp::Contains => "contains",
            TextOp::Excludes => "excludes",
            TextOp::Equals => "equals",
            TextOp::StartsWith => "starts",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        [TextOp::Contains, TextOp::Excludes, TextOp::Equals, TextOp::StartsWith]
            .into_iter()
            .find(|op| op.code() == code)
    }
}

impl NumberAttr {
    const fn code(self) -> &'static str {
        match self {
            NumberAttr::ManaValue => "cmc",
            NumberAttr::Power => "power",
            NumberAttr::Toughness => "toughness",
            NumberAttr::Loyalty => "loyalty",
        }
    }
}

impl Comparison {
    const fn code(self) -> &'static str {
        match self {
            Comparison::Eq => "eq",
            Comparison::Ne => "ne",
            Comparison::Lt => "lt",
            Comparison::Le => "le",
            Comparison::Gt => "gt",
            Comparison::Ge => "ge",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        [
            Comparison::Eq,
            Comparison::Ne,
            Comparison::Lt,
            Comparison::Le,
            Comparison::Gt,
            Comparison::Ge,
        ]
        .into_iter()
        .find(|op| op.code() == code)
    }
}

impl ColorAttr {
    const fn code(self) -> &'static str {
        match self {
            ColorAttr::Colors => "color",
            ColorAttr::Identity => "identity",
        }
    }
}

impl TypeAttr {
    const fn code(self) -> &'static str {
        match self {
            TypeAttr::CardType => "type",
            TypeAttr::Supertype => "supertype",
            TypeAttr::Subtype => "subtype",
        }
    }
}

impl SetOp {
    const fn code(self) -> &'static str {
        match self {
            SetOp::AnyOf => "any",
            SetOp::AllOf => "all",
            SetOp::NoneOf => "none",
            SetOp::Exactly => "exactly",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        [SetOp::AnyOf, SetOp::AllOf, SetOp::NoneOf, SetOp::Exactly]
            .into_iter()
            .find(|op| op.code() == code)
    }
}

/// What a leaf head parses into.
enum Head {
    All,
    None,
    Group(GroupMode),
    Text(TextAttr),
    Number(NumberAttr),
    Colors(ColorAttr),
    Types(TypeAttr),
    Rarity,
    Expansion,
}

impl Head {
    fn from_code(code: &str) -> Option<Self> {
        let head = match code {
            "all" => Head::All,
            "none" => Head::None,
            "and" => Head::Group(GroupMode::And),
            "or" => Head::Group(GroupMode::Or),
            "name" => Head::Text(TextAttr::Name),
            "text" => Head::Text(TextAttr::RulesText),
            "flavor" => Head::Text(TextAttr::Flavor),
            "artist" => Head::Text(TextAttr::Artist),
            "cmc" => Head::Number(NumberAttr::ManaValue),
            "power" => Head::Number(NumberAttr::Power),
            "toughness" => Head::Number(NumberAttr::Toughness),
            "loyalty" => Head::Number(NumberAttr::Loyalty),
            "color" => Head::Colors(ColorAttr::Colors),
            "identity" => Head::Colors(ColorAttr::Identity),
            "type" => Head::Types(TypeAttr::CardType),
            "supertype" => Head::Types(TypeAttr::Supertype),
            "subtype" => Head::Types(TypeAttr::Subtype),
            "rarity" => Head::Rarity,
            "set" => Head::Expansion,
            _ => return None,
        };
        Some(head)
    }
}

/// Deepest group nesting a filter string may have.
pub const MAX_DEPTH: usize = 128;

struct Parser<'a> {
    tokens: Peekable<Lexer<'a>>,
    len: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            tokens: Lexer::new(src).peekable(),
            len: src.len(),
            depth: 0,
        }
    }

    fn next(&mut self) -> Result<Token<'a>> {
        match self.tokens.next() {
            Some(token) => token,
            None => Err(Error::filter_parse(self.len, "unexpected end of filter")),
        }
    }

    fn peek_is_close(&mut self) -> Result<bool> {
        match self.tokens.peek() {
            Some(Ok(token)) => Ok(token.token == TokenType::Close),
            Some(Err(_)) => self.next().map(|_| false),
            None => Err(Error::filter_parse(self.len, "missing '>'")),
        }
    }

    fn expect_open(&mut self) -> Result<usize> {
        let token = self.next()?;
        match token.token {
            TokenType::Open => Ok(token.position),
            _ => Err(Error::filter_parse(token.position, "expected '<'")),
        }
    }

    fn expect_close(&mut self) -> Result<()> {
        let token = self.next()?;
        match token.token {
            TokenType::Close => Ok(()),
            _ => Err(Error::filter_parse(token.position, "expected '>'")),
        }
    }

    fn word(&mut self) -> Result<(usize, &'a str)> {
        let token = self.next()?;
        match token.token {
            TokenType::Word(word) => Ok((token.position, word)),
            _ => Err(Error::filter_parse(token.position, "expected a word")),
        }
    }

    /// A quoted string or a bare word.
    fn value(&mut self) -> Result<(usize, String)> {
        let token = self.next()?;
        match token.token {
            TokenType::Word(word) => Ok((token.position, word.to_string())),
            TokenType::Quoted(value) => Ok((token.position, value)),
            _ => Err(Error::filter_parse(token.position, "expected a value")),
        }
    }

    /// Values up to and including the closing `>`.
    fn values(&mut self) -> Result<Vec<(usize, String)>> {
        let mut values = Vec::new();
        while !self.peek_is_close()? {
            values.push(self.value()?);
        }
        self.expect_close()?;
        Ok(values)
    }

    fn filter(&mut self) -> Result<Filter> {
        self.expect_open()?;
        let (position, code) = self.word()?;
        let head = Head::from_code(code)
            .ok_or_else(|| Error::filter_parse(position, format!("unknown filter {code:?}")))?;

        let filter = match head {
            Head::All => {
                self.expect_close()?;
                Filter::MatchAll
            }
            Head::None => {
                self.expect_close()?;
                Filter::MatchNone
            }
            Head::Group(mode) => {
                if self.depth == MAX_DEPTH {
                    return Err(Error::filter_parse(position, "filter nested too deeply"));
                }
                self.depth += 1;
                let mut children = Vec::new();
                while !self.peek_is_close()? {
                    children.push(self.filter()?);
                }
                self.expect_close()?;
                self.depth -= 1;
                Filter::Group { mode, children }
            }
            Head::Text(attr) => {
                let (op_pos, op) = self.word()?;
                let op = TextOp::from_code(op)
                    .ok_or_else(|| Error::filter_parse(op_pos, format!("unknown text operator {op:?}")))?;
                let (_, value) = self.value()?;
                self.expect_close()?;
                Filter::Text { attr, op, value }
            }
            Head::Number(attr) => {
                let (op_pos, op) = self.word()?;
                let op = Comparison::from_code(op)
                    .ok_or_else(|| Error::filter_parse(op_pos, format!("unknown comparison {op:?}")))?;
                let (value_pos, value) = self.word()?;
                let value = value
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| Error::filter_parse(value_pos, format!("invalid number {value:?}")))?;
                self.expect_close()?;
                Filter::Number { attr, op, value }
            }
            Head::Colors(attr) => {
                let op = self.set_op()?;
                let (colors_pos, letters) = self.word()?;
                let colors = ColorSet::from_letters(letters).ok_or_else(|| {
                    Error::filter_parse(colors_pos, format!("invalid colors {letters:?}"))
                })?;
                self.expect_close()?;
                Filter::Colors { attr, op, colors }
            }
            Head::Types(attr) => {
                let op = self.set_op()?;
                let values = self.values()?.into_iter().map(|(_, v)| v).collect();
                Filter::Types { attr, op, values }
            }
            Head::Rarity => {
                self.membership_op()?;
                let rarities = self
                    .values()?
                    .into_iter()
                    .map(|(pos, v)| {
                        Rarity::parse(&v).ok_or_else(|| {
                            Error::filter_parse(pos, format!("unknown rarity {v:?}"))
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Filter::Rarity(rarities)
            }
            Head::Expansion => {
                self.membership_op()?;
                let codes = self.values()?.into_iter().map(|(_, v)| v).collect();
                Filter::Expansion(codes)
            }
        };
        Ok(filter)
    }

    fn set_op(&mut self) -> Result<SetOp> {
        let (pos, op) = self.word()?;
        SetOp::from_code(op)
            .ok_or_else(|| Error::filter_parse(pos, format!("unknown set operator {op:?}")))
    }

    /// Rarity and expansion leaves only support `any`.
    fn membership_op(&mut self) -> Result<()> {
        let (pos, op) = self.word()?;
        if op == SetOp::AnyOf.code() {
            Ok(())
        } else {
            Err(Error::filter_parse(pos, format!("expected \"any\", found {op:?}")))
        }
    }
}

impl Filter {
    /// Parse a filter string.
    pub fn parse(src: &str) -> Result<Self> {
        let mut parser = Parser::new(src);
        let filter = parser.filter()?;
        match parser.tokens.next() {
            None => Ok(filter),
            Some(Ok(token)) => Err(Error::filter_parse(token.position, "trailing input after filter")),
            Some(Err(e)) => Err(e),
        }
    }
}

impl std::str::FromStr for Filter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::MatchAll => f.write_str("<all>"),
            Filter::MatchNone => f.write_str("<none>"),
            Filter::Text { attr, op, value } => {
                write!(f, "<{} {} {}>", attr.code(), op.code(), quote(value))
            }
            Filter::Number { attr, op, value } => {
                write!(f, "<{} {} {}>", attr.code(), op.code(), value)
            }
            Filter::Colors { attr, op, colors } => {
                write!(f, "<{} {} {}>", attr.code(), op.code(), colors.letters())
            }
            Filter::Types { attr, op, values } => {
                write!(f, "<{} {}", attr.code(), op.code())?;
                for value in values {
                    write!(f, " {}", quote(value))?;
                }
                f.write_char('>')
            }
            Filter::Rarity(rarities) => {
                f.write_str("<rarity any")?;
                for rarity in rarities {
                    write!(f, " {}", rarity.code())?;
                }
                f.write_char('>')
            }
            Filter::Expansion(codes) => {
                f.write_str("<set any")?;
                for code in codes {
                    write!(f, " {}", quote(code))?;
                }
                f.write_char('>')
            }
            Filter::Group { mode, children } => {
                f.write_str(match mode {
                    GroupMode::And => "<and",
                    GroupMode::Or => "<or",
                })?;
                for child in children {
                    write!(f, " {child}")?;
                }
                f.write_char('>')
            }
        }
    }
}

impl TryFrom<String> for Filter {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Filter> for String {
    fn from(filter: Filter) -> Self {
        filter.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Color;

    fn round_trip(filter: &Filter) {
        let text = filter.to_string();
        let parsed = Filter::parse(&text).unwrap_or_else(|e| panic!("{text}: {e}"));
        assert_eq!(&parsed, filter, "round trip of {text}");
    }

    #[test]
    fn test_parse_leaves() {
        assert_eq!(Filter::parse("<all>").unwrap(), Filter::MatchAll);
        assert_eq!(Filter::parse(" <none> ").unwrap(), Filter::MatchNone);
        assert_eq!(
            Filter::parse(r#"<name contains "Bolt">"#).unwrap(),
            Filter::name_contains("Bolt")
        );
        assert_eq!(
            Filter::parse("<name equals Opt>").unwrap(),
            Filter::text(TextAttr::Name, TextOp::Equals, "Opt")
        );
        assert_eq!(
            Filter::parse("<power ge 2.5>").unwrap(),
            Filter::number(NumberAttr::Power, Comparison::Ge, 2.5)
        );
        assert_eq!(
            Filter::parse("<identity exactly gw>").unwrap(),
            Filter::colors(
                ColorAttr::Identity,
                SetOp::Exactly,
                ColorSet::of([Color::White, Color::Green])
            )
        );
        assert_eq!(
            Filter::parse(r#"<subtype all "Elf" Druid>"#).unwrap(),
            Filter::types(TypeAttr::Subtype, SetOp::AllOf, ["Elf", "Druid"])
        );
        assert_eq!(
            Filter::parse("<rarity any rare mythic>").unwrap(),
            Filter::Rarity(vec![Rarity::Rare, Rarity::Mythic])
        );
    }

    #[test]
    fn test_parse_nested_groups() {
        let filter = Filter::parse(
            r#"<or <and <type any "Creature"> <cmc le 2>> <type any "Land"> <or>>"#,
        )
        .unwrap();
        let expected = Filter::any([
            Filter::all([
                Filter::has_type("Creature"),
                Filter::number(NumberAttr::ManaValue, Comparison::Le, 2.0),
            ]),
            Filter::has_type("Land"),
            Filter::Group {
                mode: GroupMode::Or,
                children: Vec::new(),
            },
        ]);
        assert_eq!(filter, expected);
    }

    #[test]
    fn test_round_trips() {
        let filters = [
            Filter::MatchAll,
            Filter::text(TextAttr::RulesText, TextOp::Excludes, r#"draw "a" card \ <now>"#),
            Filter::text(TextAttr::Flavor, TextOp::StartsWith, ""),
            Filter::number(NumberAttr::Loyalty, Comparison::Ne, 0.5),
            Filter::colors(ColorAttr::Colors, SetOp::NoneOf, ColorSet::COLORLESS),
            Filter::types(TypeAttr::Supertype, SetOp::Exactly, ["Legendary", "Snow"]),
            Filter::types(TypeAttr::CardType, SetOp::AnyOf, Vec::<String>::new()),
            Filter::Rarity(vec![Rarity::BasicLand, Rarity::Special]),
            Filter::Expansion(vec!["M19".into(), "10E".into()]),
            Filter::has_type("Creature")
                .and(Filter::MatchNone.or(Filter::name_contains("Æther")))
                .and(Filter::Rarity(Vec::new())),
        ];
        for filter in &filters {
            round_trip(filter);
        }
    }

    #[test]
    fn test_parse_errors() {
        let cases = [
            ("", 0),
            ("all", 0),
            ("<bogus>", 1),
            ("<name sounds \"x\">", 6),
            ("<cmc le three>", 8),
            ("<cmc le inf>", 8),
            ("<color any WX>", 11),
            ("<rarity all rare>", 8),
            ("<rarity any legendary>", 12),
            ("<and <all>", 10),
            ("<all> <none>", 6),
            ("<all extra>", 5),
        ];
        for (src, position) in cases {
            match Filter::parse(src) {
                Err(Error::FilterParse { position: p, .. }) => {
                    assert_eq!(p, position, "error position for {src:?}")
                }
                other => panic!("expected parse error for {src:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_serde_as_string() {
        let filter = Filter::has_type("Land");
        let json = serde_json::to_string(&filter).unwrap();
        assert_eq!(json, r#""<type any \"Land\">""#);
        let back: Filter = serde_json::from_str(&json).unwrap();
        assert_eq!(back, filter);

        assert!(serde_json::from_str::<Filter>(r#""<oops""#).is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| format!("{}<all>{}", "<and ".repeat(depth), ">".repeat(depth));

        let deepest = Filter::parse(&nested(MAX_DEPTH)).unwrap();
        round_trip(&deepest);

        match Filter::parse(&nested(MAX_DEPTH + 1)) {
            Err(Error::FilterParse { position, message }) => {
                assert_eq!(position, MAX_DEPTH * 5 + 1);
                assert_eq!(message, "filter nested too deeply");
            }
            other => panic!("expected nesting error, got {other:?}"),
        }

        let huge = format!("{}{}", "<and ".repeat(200_000), ">".repeat(200_000));
        assert!(Filter::parse(&huge).is_err());
    }
}
