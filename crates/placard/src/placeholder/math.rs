use super::{substitute_args, ResolveEnv};
use crate::resolver::ResolverError;
use crate::ILLEGAL_NUMBER_FORMAT;

/// Output modifier selected by `args[0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathModifier {
    /// Thousands separators: `1,234.5`.
    Commas,
    /// Always show `precision` decimals: `3.50`.
    Fixed,
    /// Compact suffix: `1.5K`, `2M`.
    Formatted,
    /// Exactly `n` decimals, written `<n>dp`.
    Decimals(usize),
}

impl MathModifier {
    pub fn from_arg(arg: &str) -> Option<MathModifier> {
        let lower = arg.trim().to_ascii_lowercase();
        match lower.as_str() {
            "commas" => Some(MathModifier::Commas),
            "fixed" => Some(MathModifier::Fixed),
            "formatted" => Some(MathModifier::Formatted),
            _ => lower
                .strip_suffix("dp")
                .and_then(|n| n.parse().ok())
                .map(MathModifier::Decimals),
        }
    }
}

/// An arithmetic expression over `{n}` arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathPlaceholder {
    expression: String,
    precision: usize,
}

impl MathPlaceholder {
    pub const DEFAULT_PRECISION: usize = 2;
    /// Most decimals any modifier or setting may produce.
    pub const MAX_DECIMALS: usize = 16;

    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            precision: Self::DEFAULT_PRECISION,
        }
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision.min(Self::MAX_DECIMALS);
        self
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub(crate) fn resolve(
        &self,
        env: &dyn ResolveEnv,
        args: &[String],
    ) -> Result<String, ResolverError> {
        let modifier = args.first().and_then(|a| MathModifier::from_arg(a));
        let offset = usize::from(modifier.is_some());
        let expression = env.expand_external(&substitute_args(&self.expression, args, offset))?;

        Ok(match evaluate(&expression) {
            Some(value) => self.format(value, modifier),
            None => ILLEGAL_NUMBER_FORMAT.to_string(),
        })
    }

    fn format(&self, value: f64, modifier: Option<MathModifier>) -> String {
        let value = if value == 0.0 { 0.0 } else { value };
        match modifier {
            None => trimmed(value, self.precision),
            Some(MathModifier::Fixed) => format!("{:.*}", self.precision, value),
            Some(MathModifier::Decimals(n)) if n > Self::MAX_DECIMALS => {
                ILLEGAL_NUMBER_FORMAT.to_string()
            }
            Some(MathModifier::Decimals(n)) => format!("{:.*}", n, value),
            Some(MathModifier::Commas) => group_thousands(&trimmed(value, self.precision)),
            Some(MathModifier::Formatted) => {
                const SUFFIXES: [(f64, &str); 4] =
                    [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];
                SUFFIXES
                    .iter()
                    .find(|(scale, _)| value.abs() >= *scale)
                    .map(|(scale, suffix)| trimmed(value / scale, self.precision) + suffix)
                    .unwrap_or_else(|| trimmed(value, self.precision))
            }
        }
    }
}

/// Rounds to `precision` decimals and drops trailing zeros.
fn trimmed(value: f64, precision: usize) -> String {
    let fixed = format!("{:.*}", precision, value);
    let out = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        fixed
    };
    if out == "-0" {
        "0".to_string()
    } else {
        out
    }
}

fn group_thousands(number: &str) -> String {
    let (sign, rest) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int, frac) = match rest.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (rest, None),
    };

    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// Evaluates `+ - * / % ^` with parentheses and unary signs.
///
/// Returns `None` for syntax errors and non-finite results.
///
/// # Example
///
/// ```rust
/// use placard::placeholder::evaluate;
///
/// assert_eq!(evaluate("2 + 3 * (4 - 1)"), Some(11.0));
/// assert_eq!(evaluate("2 ^ 3 ^ 2"), Some(512.0));
/// assert_eq!(evaluate("1 / 0"), None);
/// ```
pub fn evaluate(expression: &str) -> Option<f64> {
    let mut parser = Parser {
        chars: expression.chars().filter(|c| !c.is_whitespace()).collect(),
        pos: 0,
    };
    let value = parser.expr()?;
    (parser.pos == parser.chars.len() && value.is_finite()).then_some(value)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expr(&mut self) -> Option<f64> {
        let mut value = self.term()?;
        loop {
            if self.eat('+') {
                value += self.term()?;
            } else if self.eat('-') {
                value -= self.term()?;
            } else {
                return Some(value);
            }
        }
    }

    fn term(&mut self) -> Option<f64> {
        let mut value = self.unary()?;
        loop {
            if self.eat('*') {
                value *= self.unary()?;
            } else if self.eat('/') {
                value /= self.unary()?;
            } else if self.eat('%') {
                value %= self.unary()?;
            } else {
                return Some(value);
            }
        }
    }

    fn unary(&mut self) -> Option<f64> {
        if self.eat('-') {
            return self.unary().map(|v| -v);
        }
        if self.eat('+') {
            return self.unary();
        }
        self.power()
    }

    // Right associative; binds tighter than unary minus on its left.
    fn power(&mut self) -> Option<f64> {
        let base = self.primary()?;
        if self.eat('^') {
            let exponent = self.unary()?;
            return Some(base.powf(exponent));
        }
        Some(base)
    }

    fn primary(&mut self) -> Option<f64> {
        if self.eat('(') {
            let value = self.expr()?;
            return self.eat(')').then_some(value);
        }
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.') {
            self.pos += 1;
        }
        if start == self.pos {
            return None;
        }
        self.chars[start..self.pos]
            .iter()
            .collect::<String>()
            .parse()
            .ok()
    }
}
