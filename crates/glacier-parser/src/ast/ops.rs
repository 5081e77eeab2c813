//! Binary operators and their binding powers for the Pratt parser.

use crate::lexer::TokenKind;
use std::fmt;

/// Binary operators, lowest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `=`
    Assign,

    /// `==`
    Equal,
    /// `!=`
    NotEqual,

    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,

    /// `+`
    Add,
    /// `-`
    Sub,

    /// `*`
    Mul,
    /// `/`
    Div,
}

impl BinaryOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::Equal => BinaryOp::Assign,
            TokenKind::EqualEqual => BinaryOp::Equal,
            TokenKind::BangEqual => BinaryOp::NotEqual,
            TokenKind::Less => BinaryOp::Less,
            TokenKind::LessEqual => BinaryOp::LessEqual,
            TokenKind::Greater => BinaryOp::Greater,
            TokenKind::GreaterEqual => BinaryOp::GreaterEqual,
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            _ => return None,
        })
    }

    /// Left and right binding power.
    ///
    /// Assignment binds tighter on the left than on the right, which makes it
    /// right-associative. Every other level is left-associative.
    pub fn binding_power(self) -> (u8, u8) {
        match self {
            BinaryOp::Assign => (2, 1),
            BinaryOp::Equal | BinaryOp::NotEqual => (3, 4),
            BinaryOp::Less | BinaryOp::LessEqual | BinaryOp::Greater | BinaryOp::GreaterEqual => {
                (5, 6)
            }
            BinaryOp::Add | BinaryOp::Sub => (7, 8),
            BinaryOp::Mul | BinaryOp::Div => (9, 10),
        }
    }

    /// Binding power of `.member`, `.method()` and `[index]`.
    pub const POSTFIX_BP: u8 = 11;

    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Assign => "=",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_order() {
        let levels = [
            BinaryOp::Assign,
            BinaryOp::Equal,
            BinaryOp::Less,
            BinaryOp::Add,
            BinaryOp::Mul,
        ];
        for pair in levels.windows(2) {
            assert!(pair[0].binding_power().0 < pair[1].binding_power().0);
        }
        assert!(BinaryOp::Mul.binding_power().1 < BinaryOp::POSTFIX_BP);
    }

    #[test]
    fn associativity() {
        let (l, r) = BinaryOp::Assign.binding_power();
        assert!(l > r, "assignment is right-associative");
        let (l, r) = BinaryOp::Sub.binding_power();
        assert!(l < r, "subtraction is left-associative");
    }

    #[test]
    fn from_token_covers_operators() {
        assert_eq!(BinaryOp::from_token(TokenKind::BangEqual), Some(BinaryOp::NotEqual));
        assert_eq!(BinaryOp::from_token(TokenKind::Arrow), None);
        assert_eq!(BinaryOp::from_token(TokenKind::Dot), None);
    }
}
