//! Recursive-descent expression parser

use super::ast::{BinaryOp, CompareOp, Expr, ForHeader, UnaryOp};
use super::lexer::{tokenize, Token};
use super::SyntaxError;
use crate::value::Value;

type ParseResult<T> = Result<T, SyntaxError>;

/// Token cursor
pub struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    pub fn peek(&self) -> &Token {
        self.tokens.get(self.pos + 1).unwrap_or(&Token::Eof)
    }

    pub fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    pub fn check(&self, token: &Token) -> bool {
        self.current() == token
    }

    pub fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, token: &Token) -> ParseResult<()> {
        if self.consume(token) {
            Ok(())
        } else {
            Err(SyntaxError::new(format!(
                "expected {:?}, found {:?}",
                token,
                self.current()
            )))
        }
    }

    pub fn is_eof(&self) -> bool {
        self.check(&Token::Eof)
    }
}

/// Parse a complete expression
pub fn parse_expression(input: &str) -> ParseResult<Expr> {
    let tokens = tokenize(input)?;
    let mut parser = Parser::new(&tokens);
    let expr = parse_or(&mut parser)?;
    if !parser.is_eof() {
        return Err(SyntaxError::new(format!(
            "unexpected token after expression: {:?}",
            parser.current()
        )));
    }
    Ok(expr)
}

/// Parse `a[, b...] in <expr>`
pub fn parse_for_header(input: &str) -> ParseResult<ForHeader> {
    let tokens = tokenize(input)?;
    let mut parser = Parser::new(&tokens);

    let parenthesised = parser.consume(&Token::LParen);
    let mut targets = vec![parse_target(&mut parser)?];
    while parser.consume(&Token::Comma) {
        if parenthesised && parser.check(&Token::RParen) {
            break;
        }
        targets.push(parse_target(&mut parser)?);
    }
    if parenthesised {
        parser.expect(&Token::RParen)?;
    }

    parser.expect(&Token::In)?;
    let iterable = parse_or(&mut parser)?;
    if !parser.is_eof() {
        return Err(SyntaxError::new(format!(
            "unexpected token after for source: {:?}",
            parser.current()
        )));
    }

    Ok(ForHeader { targets, iterable })
}

fn parse_target(parser: &mut Parser) -> ParseResult<String> {
    match parser.advance() {
        Token::Identifier(name) => Ok(name),
        other => Err(SyntaxError::new(format!(
            "expected loop variable name, found {:?}",
            other
        ))),
    }
}

fn parse_or(parser: &mut Parser) -> ParseResult<Expr> {
    let mut left = parse_and(parser)?;
    while parser.consume(&Token::Or) {
        let right = parse_and(parser)?;
        left = Expr::Or(Box::new(left), Box::new(right));
    }
    Ok(left)
}

fn parse_and(parser: &mut Parser) -> ParseResult<Expr> {
    let mut left = parse_not(parser)?;
    while parser.consume(&Token::And) {
        let right = parse_not(parser)?;
        left = Expr::And(Box::new(left), Box::new(right));
    }
    Ok(left)
}

fn parse_not(parser: &mut Parser) -> ParseResult<Expr> {
    if parser.consume(&Token::Not) {
        let operand = parse_not(parser)?;
        return Ok(Expr::Unary {
            op: UnaryOp::Not,
            operand: Box::new(operand),
        });
    }
    parse_comparison(parser)
}

fn compare_op(parser: &mut Parser) -> Option<CompareOp> {
    let op = match parser.current().clone() {
        Token::Eq => CompareOp::Eq,
        Token::NotEq => CompareOp::NotEq,
        Token::Lt => CompareOp::Lt,
        Token::LtEq => CompareOp::LtEq,
        Token::Gt => CompareOp::Gt,
        Token::GtEq => CompareOp::GtEq,
        Token::In => CompareOp::In,
        Token::Not if parser.peek() == &Token::In => {
            parser.advance();
            CompareOp::NotIn
        }
        Token::Is => {
            if parser.peek() == &Token::Not {
                parser.advance();
                CompareOp::IsNot
            } else {
                CompareOp::Is
            }
        }
        _ => return None,
    };
    parser.advance();
    Some(op)
}

fn parse_comparison(parser: &mut Parser) -> ParseResult<Expr> {
    let first = parse_additive(parser)?;
    let mut rest = Vec::new();
    while let Some(op) = compare_op(parser) {
        rest.push((op, parse_additive(parser)?));
    }
    if rest.is_empty() {
        Ok(first)
    } else {
        Ok(Expr::Compare {
            first: Box::new(first),
            rest,
        })
    }
}

fn parse_additive(parser: &mut Parser) -> ParseResult<Expr> {
    let mut left = parse_multiplicative(parser)?;
    loop {
        let op = match parser.current() {
            Token::Plus => BinaryOp::Add,
            Token::Minus => BinaryOp::Sub,
            _ => break,
        };
        parser.advance();
        let right = parse_multiplicative(parser)?;
        left = Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        };
    }
    Ok(left)
}

fn parse_multiplicative(parser: &mut Parser) -> ParseResult<Expr> {
    let mut left = parse_unary(parser)?;
    loop {
        let op = match parser.current() {
            Token::Star => BinaryOp::Mul,
            Token::Slash => BinaryOp::Div,
            Token::DoubleSlash => BinaryOp::FloorDiv,
            Token::Percent => BinaryOp::Mod,
            _ => break,
        };
        parser.advance();
        let right = parse_unary(parser)?;
        left = Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        };
    }
    Ok(left)
}

fn parse_unary(parser: &mut Parser) -> ParseResult<Expr> {
    if parser.consume(&Token::Minus) {
        let operand = parse_unary(parser)?;
        return Ok(Expr::Unary {
            op: UnaryOp::Neg,
            operand: Box::new(operand),
        });
    }
    parse_postfix(parser)
}

fn parse_postfix(parser: &mut Parser) -> ParseResult<Expr> {
    let mut expr = parse_primary(parser)?;
    loop {
        if parser.consume(&Token::Dot) {
            let method = parse_target(parser)?;
            parser.expect(&Token::LParen)?;
            let args = parse_arguments(parser, &Token::RParen)?;
            expr = Expr::Method {
                receiver: Box::new(expr),
                method,
                args,
            };
        } else if parser.consume(&Token::LBracket) {
            let index = parse_or(parser)?;
            parser.expect(&Token::RBracket)?;
            expr = Expr::Subscript {
                target: Box::new(expr),
                index: Box::new(index),
            };
        } else if parser.check(&Token::LParen) {
            let function = match expr {
                Expr::Name(name) => name,
                _ => return Err(SyntaxError::new("only named functions can be called")),
            };
            parser.advance();
            let args = parse_arguments(parser, &Token::RParen)?;
            expr = Expr::Call { function, args };
        } else {
            break;
        }
    }
    Ok(expr)
}

/// Comma separated expressions up to and including `close`
fn parse_arguments(parser: &mut Parser, close: &Token) -> ParseResult<Vec<Expr>> {
    let mut args = Vec::new();
    while !parser.check(close) {
        args.push(parse_or(parser)?);
        if !parser.consume(&Token::Comma) {
            break;
        }
    }
    parser.expect(close)?;
    Ok(args)
}

fn parse_primary(parser: &mut Parser) -> ParseResult<Expr> {
    match parser.advance() {
        Token::IntegerLiteral(i) => Ok(Expr::Literal(Value::Int(i))),
        Token::FloatLiteral(f) => Ok(Expr::Literal(Value::Float(f))),
        Token::StringLiteral(s) => Ok(Expr::Literal(Value::Str(s))),
        Token::True => Ok(Expr::Literal(Value::Bool(true))),
        Token::False => Ok(Expr::Literal(Value::Bool(false))),
        Token::None => Ok(Expr::Literal(Value::Null)),
        Token::Identifier(name) => Ok(Expr::Name(name)),
        Token::LBracket => Ok(Expr::List(parse_arguments(parser, &Token::RBracket)?)),
        Token::LParen => {
            if parser.consume(&Token::RParen) {
                return Ok(Expr::List(Vec::new()));
            }
            let first = parse_or(parser)?;
            if parser.consume(&Token::RParen) {
                return Ok(first);
            }
            // Tuple: `(a, b)` or `(a,)`
            parser.expect(&Token::Comma)?;
            let mut items = vec![first];
            items.extend(parse_arguments(parser, &Token::RParen)?);
            Ok(Expr::List(items))
        }
        other => Err(SyntaxError::new(format!("unexpected token {:?}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_binds_modulo_tighter_than_comparison() {
        let expr = parse_expression("a % 2 == 1").unwrap();
        match expr {
            Expr::Compare { first, rest } => {
                assert!(matches!(*first, Expr::Binary { op: BinaryOp::Mod, .. }));
                assert_eq!(rest.len(), 1);
                assert_eq!(rest[0].0, CompareOp::Eq);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn not_in_and_is_not_are_single_operators() {
        let expr = parse_expression("v not in ('a', 'b') and p is not None").unwrap();
        let Expr::And(left, right) = expr else {
            panic!("expected and");
        };
        assert!(matches!(*left, Expr::Compare { ref rest, .. } if rest[0].0 == CompareOp::NotIn));
        assert!(matches!(*right, Expr::Compare { ref rest, .. } if rest[0].0 == CompareOp::IsNot));
    }

    #[test]
    fn tuples_and_grouping() {
        assert_eq!(
            parse_expression("(1)").unwrap(),
            Expr::Literal(Value::Int(1))
        );
        assert_eq!(
            parse_expression("(1,)").unwrap(),
            Expr::List(vec![Expr::Literal(Value::Int(1))])
        );
    }

    #[test]
    fn for_header_with_method_source() {
        let header = parse_for_header("k, v in dct.items()").unwrap();
        assert_eq!(header.targets, vec!["k".to_string(), "v".to_string()]);
        assert!(matches!(header.iterable, Expr::Method { ref method, .. } if method == "items"));

        let header = parse_for_header("(i, x) in enumerate(xs)").unwrap();
        assert_eq!(header.targets.len(), 2);
    }

    #[test]
    fn malformed_input_is_rejected() {
        assert!(parse_expression("a ==").is_err());
        assert!(parse_expression("a b").is_err());
        assert!(parse_for_header("1 in xs").is_err());
        assert!(parse_for_header("a xs").is_err());
    }
}
