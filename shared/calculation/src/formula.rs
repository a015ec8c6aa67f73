//! Arithmetic formula parsing and evaluation.
//!
//! User-entered emission factor formulas (`SU * 39`, `(A * 0.5) / HHV`) and
//! unit-of-measure conversion formulas (`btu*1000000/[h]`) share one grammar:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := '-' unary | '+' unary | power
//! power   := primary ('^' unary)?
//! primary := number | ident | ident '(' args ')' | '(' expr ')'
//! ```
//!
//! Identifiers are letters, digits and underscores, or any bracketed symbol
//! such as `[lb]`. `pi` and `e` are constants; every other identifier is a
//! variable.

use std::collections::BTreeSet;
use std::collections::HashMap;
use std::fmt;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error("Formula is empty")]
    Empty,

    #[error("Syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },

    #[error("Unknown function '{0}'")]
    UnknownFunction(String),

    #[error("Function '{function}' expects {expected} argument(s), found {found}")]
    Arity {
        function: String,
        expected: &'static str,
        found: usize,
    },

    #[error("Missing value for variable(s): {}", .0.join(", "))]
    MissingVariables(Vec<String>),

    #[error("Formula '{formula}' does not evaluate to a finite number")]
    NonFinite { formula: String },
}

impl FormulaError {
    fn syntax(position: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sqrt,
    Ln,
    Log,
    Log10,
    Exp,
    Abs,
    Min,
    Max,
    Pow,
    Round,
    Floor,
    Ceil,
}

impl Function {
    fn from_name(name: &str) -> Option<Self> {
        let function = match name {
            "sqrt" => Self::Sqrt,
            "ln" => Self::Ln,
            "log" => Self::Log,
            "log10" => Self::Log10,
            "exp" => Self::Exp,
            "abs" => Self::Abs,
            "min" => Self::Min,
            "max" => Self::Max,
            "pow" => Self::Pow,
            "round" => Self::Round,
            "floor" => Self::Floor,
            "ceil" => Self::Ceil,
            _ => return None,
        };
        Some(function)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sqrt => "sqrt",
            Self::Ln => "ln",
            Self::Log => "log",
            Self::Log10 => "log10",
            Self::Exp => "exp",
            Self::Abs => "abs",
            Self::Min => "min",
            Self::Max => "max",
            Self::Pow => "pow",
            Self::Round => "round",
            Self::Floor => "floor",
            Self::Ceil => "ceil",
        }
    }

    /// `log(x)` is the natural log, `log(base, x)` takes an explicit base.
    fn check_arity(&self, found: usize) -> Result<(), FormulaError> {
        let (ok, expected) = match self {
            Self::Min | Self::Max => (found >= 1, "at least 1"),
            Self::Pow => (found == 2, "2"),
            Self::Log => (found == 1 || found == 2, "1 or 2"),
            _ => (found == 1, "1"),
        };
        if ok {
            Ok(())
        } else {
            Err(FormulaError::Arity {
                function: self.name().to_string(),
                expected,
                found,
            })
        }
    }

    fn apply(&self, args: &[f64]) -> f64 {
        match (self, args) {
            (Self::Sqrt, [x]) => x.sqrt(),
            (Self::Ln, [x]) | (Self::Log, [x]) => x.ln(),
            (Self::Log, [base, x]) => x.ln() / base.ln(),
            (Self::Log10, [x]) => x.log10(),
            (Self::Exp, [x]) => x.exp(),
            (Self::Abs, [x]) => x.abs(),
            (Self::Min, values) => values.iter().copied().fold(f64::INFINITY, f64::min),
            (Self::Max, values) => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            (Self::Pow, [base, exponent]) => base.powf(*exponent),
            (Self::Round, [x]) => x.round(),
            (Self::Floor, [x]) => x.floor(),
            (Self::Ceil, [x]) => x.ceil(),
            _ => f64::NAN,
        }
    }
}

/// Parsed formula tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Variable(String),
    Negate(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        function: Function,
        args: Vec<Expr>,
    },
}

impl Expr {
    fn collect_variables<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            Expr::Number(_) => {}
            Expr::Variable(name) => {
                out.insert(name.as_str());
            }
            Expr::Negate(inner) => inner.collect_variables(out),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_variables(out);
                rhs.collect_variables(out);
            }
            Expr::Call { args, .. } => {
                for arg in args {
                    arg.collect_variables(out);
                }
            }
        }
    }

    fn eval(&self, values: &HashMap<&str, f64>) -> f64 {
        match self {
            Expr::Number(n) => *n,
            Expr::Variable(name) => values.get(name.as_str()).copied().unwrap_or(f64::NAN),
            Expr::Negate(inner) => -inner.eval(values),
            Expr::Binary { op, lhs, rhs } => {
                let (l, r) = (lhs.eval(values), rhs.eval(values));
                match op {
                    BinaryOp::Add => l + r,
                    BinaryOp::Sub => l - r,
                    BinaryOp::Mul => l * r,
                    BinaryOp::Div => l / r,
                    BinaryOp::Pow => l.powf(r),
                }
            }
            Expr::Call { function, args } => {
                let args: Vec<f64> = args.iter().map(|arg| arg.eval(values)).collect();
                function.apply(&args)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Ident(name) => write!(f, "{}", name),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Caret => write!(f, "^"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
        }
    }
}

/// Longest formula accepted, in tokens. Bounds the depth of operator chains.
const MAX_TOKENS: usize = 2048;

/// Deepest nesting of parentheses, signs and exponents accepted.
const MAX_NESTING: usize = 256;

fn tokenize(input: &str) -> Result<Vec<(usize, Token)>, FormulaError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if tokens.len() >= MAX_TOKENS {
            return Err(FormulaError::syntax(i, "formula too long"));
        }
        let c = chars[i];
        let start = i;

        let token = match c {
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '^' => Token::Caret,
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            '[' => {
                let end = chars[i..]
                    .iter()
                    .position(|&ch| ch == ']')
                    .map(|offset| i + offset)
                    .ok_or_else(|| FormulaError::syntax(start, "unterminated '['"))?;
                let symbol: String = chars[i..=end].iter().collect();
                i = end + 1;
                tokens.push((start, Token::Ident(symbol)));
                continue;
            }
            c if c.is_ascii_digit() || c == '.' => {
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                // Exponent only when followed by a digit, so `2e` stays a syntax error
                if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        i = j;
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let literal: String = chars[start..i].iter().collect();
                let value = literal.parse::<f64>().map_err(|_| {
                    FormulaError::syntax(start, format!("invalid number '{}'", literal))
                })?;
                tokens.push((start, Token::Number(value)));
                continue;
            }
            c if c.is_alphabetic() || c == '_' => {
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push((start, Token::Ident(chars[start..i].iter().collect())));
                continue;
            }
            other => {
                return Err(FormulaError::syntax(
                    start,
                    format!("unexpected character '{}'", other),
                ))
            }
        };

        tokens.push((start, token));
        i += 1;
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    end: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, token)| token)
    }

    fn position(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(position, _)| *position)
            .unwrap_or(self.end)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(_, token)| token.clone());
        self.pos += 1;
        token
    }

    fn expect(&mut self, expected: Token) -> Result<(), FormulaError> {
        let position = self.position();
        match self.advance() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(FormulaError::syntax(
                position,
                format!("expected '{}', found '{}'", expected, token),
            )),
            None => Err(FormulaError::syntax(
                position,
                format!("expected '{}', found end of formula", expected),
            )),
        }
    }

    fn expr(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn term(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    // Right associative and tighter than negation: 2^3^2 == 2^9, -2^2 == -4
    fn power(&mut self) -> Result<Expr, FormulaError> {
        let base = self.primary()?;
        if self.peek() == Some(&Token::Caret) {
            self.advance();
            let exponent = self.unary()?;
            return Ok(Expr::Binary {
                op: BinaryOp::Pow,
                lhs: Box::new(base),
                rhs: Box::new(exponent),
            });
        }
        Ok(base)
    }

    fn unary(&mut self) -> Result<Expr, FormulaError> {
        if self.depth >= MAX_NESTING {
            return Err(FormulaError::syntax(self.position(), "formula nested too deeply"));
        }
        self.depth += 1;
        let expr = self.signed();
        self.depth -= 1;
        expr
    }

    fn signed(&mut self) -> Result<Expr, FormulaError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.advance();
                Ok(Expr::Negate(Box::new(self.unary()?)))
            }
            Some(Token::Plus) => {
                self.advance();
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn primary(&mut self) -> Result<Expr, FormulaError> {
        let position = self.position();
        match self.advance() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Some(Token::Ident(name)) => {
                if self.peek() == Some(&Token::LParen) {
                    self.advance();
                    return self.call(name);
                }
                Ok(match name.as_str() {
                    "pi" => Expr::Number(std::f64::consts::PI),
                    "e" => Expr::Number(std::f64::consts::E),
                    _ => Expr::Variable(name),
                })
            }
            Some(token) => Err(FormulaError::syntax(
                position,
                format!("unexpected '{}'", token),
            )),
            None => Err(FormulaError::syntax(position, "unexpected end of formula")),
        }
    }

    fn call(&mut self, name: String) -> Result<Expr, FormulaError> {
        let function = Function::from_name(&name).ok_or(FormulaError::UnknownFunction(name))?;

        let mut args = Vec::new();
        if self.peek() != Some(&Token::RParen) {
            args.push(self.expr()?);
            while self.peek() == Some(&Token::Comma) {
                self.advance();
                args.push(self.expr()?);
            }
        }
        self.expect(Token::RParen)?;

        function.check_arity(args.len())?;
        Ok(Expr::Call { function, args })
    }
}

/// A parsed formula with its source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    source: String,
    expr: Expr,
}

impl Formula {
    pub fn parse(source: &str) -> Result<Self, FormulaError> {
        let tokens = tokenize(source)?;
        if tokens.is_empty() {
            return Err(FormulaError::Empty);
        }

        let mut parser = Parser {
            tokens,
            pos: 0,
            end: source.chars().count(),
            depth: 0,
        };
        let expr = parser.expr()?;

        if let Some(token) = parser.peek() {
            return Err(FormulaError::syntax(
                parser.position(),
                format!("unexpected '{}'", token),
            ));
        }

        Ok(Self {
            source: source.to_string(),
            expr,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Distinct variable names in sorted order.
    pub fn variables(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.expr.collect_variables(&mut out);
        out
    }

    /// Variables with no binding, sorted and de-duplicated.
    pub fn missing_variables(&self, bindings: &[(String, Decimal)]) -> Vec<String> {
        self.variables()
            .into_iter()
            .filter(|name| !bindings.iter().any(|(code, _)| code.as_str() == *name))
            .map(str::to_string)
            .collect()
    }

    pub fn evaluate(&self, bindings: &[(String, Decimal)]) -> Result<Decimal, FormulaError> {
        let missing = self.missing_variables(bindings);
        if !missing.is_empty() {
            return Err(FormulaError::MissingVariables(missing));
        }

        let values: HashMap<&str, f64> = bindings
            .iter()
            .map(|(code, value)| (code.as_str(), value.to_f64().unwrap_or(f64::NAN)))
            .collect();

        let result = self.expr.eval(&values);
        if !result.is_finite() {
            return Err(FormulaError::NonFinite {
                formula: self.source.clone(),
            });
        }

        Decimal::from_f64(result).ok_or_else(|| FormulaError::NonFinite {
            formula: self.source.clone(),
        })
    }
}

/// Evaluates emission factor formulas against formula-variable bindings.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormulaEvaluator;

impl FormulaEvaluator {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(
        &self,
        formula: &str,
        bindings: &[(String, Decimal)],
    ) -> Result<Decimal, FormulaError> {
        let parsed = Formula::parse(formula)?;
        let result = parsed.evaluate(bindings)?;
        tracing::debug!(formula = %formula, result = %result, "Evaluated formula");
        Ok(result)
    }

    /// Parses and checks variable presence without evaluating.
    pub fn missing_variables(
        &self,
        formula: &str,
        bindings: &[(String, Decimal)],
    ) -> Result<Vec<String>, FormulaError> {
        Ok(Formula::parse(formula)?.missing_variables(bindings))
    }
}

/// Known variable codes that occur in `formula`. Unparseable formulas yield none.
pub fn extract_variable_codes(formula: &str, known_codes: &[String]) -> Vec<String> {
    let Ok(parsed) = Formula::parse(formula) else {
        return Vec::new();
    };
    let variables = parsed.variables();
    known_codes
        .iter()
        .filter(|code| variables.contains(code.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bind(pairs: &[(&str, i64, u32)]) -> Vec<(String, Decimal)> {
        pairs
            .iter()
            .map(|(code, m, s)| (code.to_string(), Decimal::new(*m, *s)))
            .collect()
    }

    #[test]
    fn test_precedence_and_associativity() {
        let evaluator = FormulaEvaluator::new();
        assert_eq!(evaluator.evaluate("1 + 2 * 3", &[]).unwrap(), Decimal::from(7));
        assert_eq!(evaluator.evaluate("(1 + 2) * 3", &[]).unwrap(), Decimal::from(9));
        assert_eq!(evaluator.evaluate("2 ^ 3 ^ 2", &[]).unwrap(), Decimal::from(512));
        assert_eq!(evaluator.evaluate("-2 ^ 2", &[]).unwrap(), Decimal::from(-4));
        assert_eq!(evaluator.evaluate("10 - 4 - 3", &[]).unwrap(), Decimal::from(3));
        assert_eq!(evaluator.evaluate("2 * -3", &[]).unwrap(), Decimal::from(-6));
    }

    #[test]
    fn test_nesting_limit() {
        let evaluator = FormulaEvaluator::new();
        let nested = |depth: usize| format!("{}1{}", "(".repeat(depth), ")".repeat(depth));

        assert_eq!(evaluator.evaluate(&nested(100), &[]).unwrap(), Decimal::ONE);
        assert!(matches!(
            evaluator.evaluate(&nested(200_000), &[]),
            Err(FormulaError::Syntax { ref message, .. }) if message == "formula too long"
        ));
        assert!(matches!(
            evaluator.evaluate(&nested(300), &[]),
            Err(FormulaError::Syntax { ref message, .. }) if message == "formula nested too deeply"
        ));
        assert!(matches!(
            evaluator.evaluate(&format!("{}1", "-".repeat(1000)), &[]),
            Err(FormulaError::Syntax { ref message, .. }) if message == "formula nested too deeply"
        ));
    }

    #[test]
    fn test_long_operator_chain_rejected() {
        let evaluator = FormulaEvaluator::new();
        let chain = vec!["1"; 2000].join("+");
        assert!(matches!(
            evaluator.evaluate(&chain, &[]),
            Err(FormulaError::Syntax { ref message, .. }) if message == "formula too long"
        ));
        assert_eq!(evaluator.evaluate(&vec!["1"; 500].join("+"), &[]).unwrap(), Decimal::from(500));
    }

    #[test]
    fn test_variables_and_functions() {
        let evaluator = FormulaEvaluator::new();
        let bindings = bind(&[("SU", 5, 1), ("A", 4, 0)]);
        assert_eq!(evaluator.evaluate("SU * 38", &bindings).unwrap(), Decimal::from(19));
        assert_eq!(evaluator.evaluate("sqrt(A) + max(1, SU, 3)", &bindings).unwrap(), Decimal::from(5));
        assert_eq!(evaluator.evaluate("pow(A, 2) / 8", &bindings).unwrap(), Decimal::from(2));
        assert_eq!(evaluator.evaluate("log10(1000)", &[]).unwrap(), Decimal::from(3));
        assert_eq!(evaluator.evaluate("log(e, 1)", &[]).unwrap(), Decimal::ZERO);
        assert_eq!(evaluator.evaluate("floor(2.7) + ceil(0.2)", &[]).unwrap(), Decimal::from(3));
        assert_eq!(evaluator.evaluate("1.5e2", &[]).unwrap(), Decimal::from(150));
    }

    #[test]
    fn test_missing_variables_sorted_and_unique() {
        let evaluator = FormulaEvaluator::new();
        let bindings = bind(&[("A", 1, 0)]);
        let err = evaluator.evaluate("SU * HHV + SU / A", &bindings).unwrap_err();
        assert_eq!(
            err,
            FormulaError::MissingVariables(vec!["HHV".to_string(), "SU".to_string()])
        );
        assert_eq!(err.to_string(), "Missing value for variable(s): HHV, SU");
    }

    #[test]
    fn test_non_finite_results() {
        let evaluator = FormulaEvaluator::new();
        assert!(matches!(
            evaluator.evaluate("1 / 0", &[]),
            Err(FormulaError::NonFinite { .. })
        ));
        assert!(matches!(
            evaluator.evaluate("sqrt(-1)", &[]),
            Err(FormulaError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(Formula::parse("   "), Err(FormulaError::Empty));
        assert!(matches!(Formula::parse("1 +"), Err(FormulaError::Syntax { .. })));
        assert!(matches!(Formula::parse("(1 + 2"), Err(FormulaError::Syntax { .. })));
        assert!(matches!(Formula::parse("1 2"), Err(FormulaError::Syntax { .. })));
        assert!(matches!(Formula::parse("A # B"), Err(FormulaError::Syntax { position: 2, .. })));
        assert_eq!(
            Formula::parse("foo(1)"),
            Err(FormulaError::UnknownFunction("foo".to_string()))
        );
        assert!(matches!(Formula::parse("sqrt(1, 2)"), Err(FormulaError::Arity { found: 2, .. })));
    }

    #[test]
    fn test_bracketed_unit_symbols() {
        let formula = Formula::parse("btu*1000000/[h]").unwrap();
        let variables: Vec<&str> = formula.variables().into_iter().collect();
        assert_eq!(variables, vec!["[h]", "btu"]);
    }

    #[test]
    fn test_constants_are_not_variables() {
        let formula = Formula::parse("pi * e * r").unwrap();
        assert_eq!(formula.variables().into_iter().collect::<Vec<_>>(), vec!["r"]);
    }

    #[test]
    fn test_extract_variable_codes() {
        let known: Vec<String> = ["A", "SU", "HHV", "CE"].iter().map(|s| s.to_string()).collect();
        assert_eq!(
            extract_variable_codes("(SU * 0.5) / HHV", &known),
            vec!["SU".to_string(), "HHV".to_string()]
        );
        assert!(extract_variable_codes("SU *", &known).is_empty());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        prop_compose! {
            fn small_value()(m in -100_000i64..100_000, s in 0u32..4) -> Decimal {
                Decimal::new(m, s)
            }
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(100))]

            #[test]
            fn evaluation_is_deterministic(a in small_value(), b in small_value()) {
                let bindings = vec![("A".to_string(), a), ("B".to_string(), b)];
                let evaluator = FormulaEvaluator::new();
                let first = evaluator.evaluate("A * 2 + B - abs(A)", &bindings);
                let second = evaluator.evaluate("A * 2 + B - abs(A)", &bindings);
                prop_assert_eq!(first, second);
            }

            #[test]
            fn addition_is_commutative(a in small_value(), b in small_value()) {
                let bindings = vec![("A".to_string(), a), ("B".to_string(), b)];
                let evaluator = FormulaEvaluator::new();
                prop_assert_eq!(
                    evaluator.evaluate("A + B", &bindings).unwrap(),
                    evaluator.evaluate("B + A", &bindings).unwrap()
                );
            }
        }
    }
}
