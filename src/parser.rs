//! Readers for the brace notation `{{a, -b}, {c}}` and for DIMACS CNF

use crate::Formula;
use thiserror::Error;

/// Glyphs accepted in place of `-` for negation
const NEGATION_GLYPHS: &[char] = &['¬', '~'];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Empty input")]
    Empty,
    #[error("Unbalanced braces at offset {offset}")]
    UnbalancedBraces { offset: usize },
    #[error("Clause {clause} has no literals")]
    EmptyClause { clause: usize },
    #[error("Empty literal in clause {clause}")]
    EmptyLiteral { clause: usize },
    #[error("Unexpected character {found:?} at offset {offset}")]
    UnexpectedCharacter { found: char, offset: usize },
    #[error("Invalid DIMACS at line {line}: {message}")]
    Dimacs { line: usize, message: String },
}

/// Parse a formula in brace notation
///
/// Whitespace is ignored anywhere, and `¬` or `~` can be used for `-`.
///
/// ```rust
/// use flipsat::{parse, FormatError};
///
/// let formula = parse("{{a, -b}, {¬c}}").unwrap();
/// assert_eq!(formula.to_string(), "{{a,-b},{-c}}");
///
/// // No clauses at all
/// assert_eq!(parse("{}").unwrap().num_clauses(), 0);
///
/// assert_eq!(parse("{{a},{}}"), Err(FormatError::EmptyClause { clause: 1 }));
/// assert_eq!(parse("{{a,}}"), Err(FormatError::EmptyLiteral { clause: 0 }));
/// assert!(matches!(parse("{{a}"), Err(FormatError::UnbalancedBraces { .. })));
/// ```
pub fn parse(input: &str) -> Result<Formula, FormatError> {
    let chars: Vec<char> = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if NEGATION_GLYPHS.contains(&c) { '-' } else { c })
        .collect();
    if chars.is_empty() {
        return Err(FormatError::Empty);
    }
    Parser {
        chars,
        pos: 0,
        clause: 0,
    }
    .formula()
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    /// Index of the clause being read
    clause: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn unbalanced(&self) -> FormatError {
        FormatError::UnbalancedBraces { offset: self.pos }
    }

    fn unexpected(&self, found: char) -> FormatError {
        FormatError::UnexpectedCharacter {
            found,
            offset: self.pos,
        }
    }

    fn formula(mut self) -> Result<Formula, FormatError> {
        match self.peek() {
            Some('{') => self.pos += 1,
            Some('}') => return Err(self.unbalanced()),
            Some(c) => return Err(self.unexpected(c)),
            None => return Err(FormatError::Empty),
        }

        let mut formula = Formula::new();
        if self.peek() == Some('}') {
            self.pos += 1;
        } else {
            loop {
                let literals = self.clause()?;
                formula.add_clause(literals.iter().map(|(name, negated)| (name.as_str(), *negated)));
                self.clause += 1;
                match self.peek() {
                    Some(',') => self.pos += 1,
                    Some('}') => {
                        self.pos += 1;
                        break;
                    }
                    Some(c) => return Err(self.unexpected(c)),
                    None => return Err(self.unbalanced()),
                }
            }
        }

        match self.peek() {
            None => Ok(formula),
            Some('{') | Some('}') => Err(self.unbalanced()),
            Some(c) => Err(self.unexpected(c)),
        }
    }

    fn clause(&mut self) -> Result<Vec<(String, bool)>, FormatError> {
        match self.peek() {
            Some('{') => self.pos += 1,
            Some(',') | Some('}') => return Err(FormatError::EmptyClause { clause: self.clause }),
            Some(c) => return Err(self.unexpected(c)),
            None => return Err(self.unbalanced()),
        }
        if self.peek() == Some('}') {
            return Err(FormatError::EmptyClause {
                clause: self.clause,
            });
        }

        let mut literals = Vec::new();
        loop {
            literals.push(self.literal()?);
            match self.bump() {
                Some(',') => continue,
                Some('}') => return Ok(literals),
                Some('{') => {
                    self.pos -= 1;
                    return Err(self.unbalanced());
                }
                None => return Err(self.unbalanced()),
                Some(c) => {
                    self.pos -= 1;
                    return Err(self.unexpected(c));
                }
            }
        }
    }

    fn literal(&mut self) -> Result<(String, bool), FormatError> {
        let negated = self.peek() == Some('-');
        if negated {
            self.pos += 1;
        }
        let mut name = String::new();
        while let Some(c) = self.peek().filter(|&c| is_name_char(c)) {
            name.push(c);
            self.pos += 1;
        }
        if name.is_empty() {
            return match self.peek() {
                Some(',') | Some('}') | None => Err(FormatError::EmptyLiteral {
                    clause: self.clause,
                }),
                Some('{') => Err(self.unbalanced()),
                Some(c) => Err(self.unexpected(c)),
            };
        }
        Ok((name, negated))
    }
}

/// Parse a DIMACS CNF, naming the variable `k` as `xk`
///
/// The `p cnf` header is optional. An empty clause `0` is kept as a
/// falsified clause.
///
/// ```rust
/// use flipsat::parse_dimacs;
///
/// let formula = parse_dimacs("c example\np cnf 3 2\n1 -2 0\n3 0\n").unwrap();
/// assert_eq!(formula.to_string(), "{{x1,-x2},{x3}}");
/// ```
pub fn parse_dimacs(input: &str) -> Result<Formula, FormatError> {
    let mut formula = Formula::new();
    let mut clause: Vec<(String, bool)> = Vec::new();
    let mut flush = |clause: &mut Vec<(String, bool)>| {
        formula.add_clause(clause.iter().map(|(name, negated)| (name.as_str(), *negated)));
        clause.clear();
    };

    for (i, line) in input.lines().enumerate() {
        let line = line.trim();
        let dimacs_error = |message: String| FormatError::Dimacs {
            line: i + 1,
            message,
        };
        if line.is_empty() || line.starts_with('c') || line.starts_with('%') {
            continue;
        }
        if line.starts_with('p') {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() != 4 || parts[1] != "cnf" {
                return Err(dimacs_error(format!("Invalid header: {line}")));
            }
            for count in &parts[2..] {
                count
                    .parse::<usize>()
                    .map_err(|e| dimacs_error(format!("Invalid count {count:?}: {e}")))?;
            }
            continue;
        }
        for token in line.split_whitespace() {
            let lit: i64 = token
                .parse()
                .map_err(|e| dimacs_error(format!("Invalid literal {token:?}: {e}")))?;
            if lit == 0 {
                flush(&mut clause);
            } else {
                clause.push((format!("x{}", lit.unsigned_abs()), lit < 0));
            }
        }
    }
    if !clause.is_empty() {
        flush(&mut clause);
    }
    Ok(formula)
}
