//! Parses and intersects `range`/`length` restriction chains over signed,
//! unsigned, and decimal domains (spec §4.5).

use yangl_support::{Diag, ValidationCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Bound(pub i128);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Interval {
  pub min: Bound,
  pub max: Bound,
}

impl Interval {
  #[must_use]
  pub fn contains(&self, other: &Self) -> bool {
    self.min <= other.min && other.max <= self.max
  }
}

/// A parsed, disjoint, ascending set of intervals — the output of one
/// `range`/`length` statement resolved against its parent's domain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeSet {
  pub intervals: Vec<Interval>,
}

impl RangeSet {
  #[must_use]
  pub fn full(min: i128, max: i128) -> Self {
    Self {
      intervals: vec![Interval {
        min: Bound(min),
        max: Bound(max),
      }],
    }
  }

  #[must_use]
  pub fn contains_value(&self, v: i128) -> bool {
    self
      .intervals
      .iter()
      .any(|iv| iv.min.0 <= v && v <= iv.max.0)
  }
}

enum Token<'a> {
  Min,
  Max,
  Number(i128),
  Pipe,
  DotDot,
  Eof,
  Bad(&'a str),
}

struct Tokenizer<'a> {
  rest: &'a str,
}

impl<'a> Tokenizer<'a> {
  fn new(s: &'a str) -> Self {
    Self { rest: s }
  }

  fn skip_ws(&mut self) {
    self.rest = self.rest.trim_start();
  }

  fn next(&mut self) -> Token<'a> {
    self.skip_ws();
    if self.rest.is_empty() {
      return Token::Eof;
    }
    if let Some(stripped) = self.rest.strip_prefix("..") {
      self.rest = stripped;
      return Token::DotDot;
    }
    if let Some(stripped) = self.rest.strip_prefix('|') {
      self.rest = stripped;
      return Token::Pipe;
    }
    if let Some(stripped) = self.rest.strip_prefix("min") {
      self.rest = stripped;
      return Token::Min;
    }
    if let Some(stripped) = self.rest.strip_prefix("max") {
      self.rest = stripped;
      return Token::Max;
    }

    let end = self
      .rest
      .find(|c: char| c.is_whitespace() || c == '|')
      .unwrap_or(self.rest.len());
    let (tok, rest) = self.rest.split_at(end);
    self.rest = rest;
    match tok.parse::<i128>() {
      Ok(n) => Token::Number(n),
      Err(_) => Token::Bad(tok),
    }
  }
}

fn parse_bound(tok: Token<'_>, parent_min: i128, parent_max: i128) -> Result<i128, Diag> {
  match tok {
    Token::Min => Ok(parent_min),
    Token::Max => Ok(parent_max),
    Token::Number(n) => Ok(n),
    Token::Bad(text) => Err(Diag::validation(
      ValidationCode::InChar,
      format!("invalid range/length bound \"{text}\""),
    )),
    Token::DotDot | Token::Pipe | Token::Eof => Err(Diag::validation(
      ValidationCode::InChar,
      "expected a bound but found a separator",
    )),
  }
}

/// Parses `"1..20 | 50..max"` against the effective `[parent_min,
/// parent_max]` domain (the domain of the immediately containing
/// restriction, not the base type's own domain, per spec §4.5), and checks
/// that each resulting interval is a subset of some parent interval
/// (`parent`, when present) and that intervals are strictly ascending and
/// disjoint.
///
/// # Errors
/// Returns [`Diag::Validation`] on unparseable tokens, misordered
/// segments, or a segment that escapes the parent's range.
pub fn parse_range(text: &str, parent_min: i128, parent_max: i128, parent: Option<&RangeSet>) -> Result<RangeSet, Diag> {
  let mut tokenizer = Tokenizer::new(text);
  let mut intervals = Vec::new();

  loop {
    let first = tokenizer.next();
    let lo = parse_bound(first, parent_min, parent_max)?;

    let hi = match tokenizer.next() {
      Token::DotDot => {
        let bound_tok = tokenizer.next();
        parse_bound(bound_tok, parent_min, parent_max)?
      }
      Token::Pipe => {
        intervals.push(Interval {
          min: Bound(lo),
          max: Bound(lo),
        });
        continue;
      }
      Token::Eof => {
        intervals.push(Interval {
          min: Bound(lo),
          max: Bound(lo),
        });
        break;
      }
      _ => {
        return Err(Diag::validation(
          ValidationCode::InChar,
          "expected '..', '|', or end of range expression",
        ));
      }
    };

    if hi < lo {
      return Err(Diag::validation(
        ValidationCode::InChar,
        format!("range segment {lo}..{hi} is out of order"),
      ));
    }
    intervals.push(Interval {
      min: Bound(lo),
      max: Bound(hi),
    });

    match tokenizer.next() {
      Token::Pipe => {}
      Token::Eof => break,
      _ => {
        return Err(Diag::validation(
          ValidationCode::InChar,
          "expected '|' or end of range expression",
        ));
      }
    }
  }

  for pair in intervals.windows(2) {
    if pair[0].max >= pair[1].min {
      return Err(Diag::validation(
        ValidationCode::InChar,
        "range segments must be strictly ascending and disjoint",
      ));
    }
  }

  if let Some(parent) = parent {
    for child in &intervals {
      if !parent.intervals.iter().any(|p| p.contains(child)) {
        return Err(Diag::validation(
          ValidationCode::InChar,
          format!("range segment {}..{} is not a subset of the parent range", child.min.0, child.max.0),
        ));
      }
    }
  }

  Ok(RangeSet { intervals })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_simple_range() {
    let r = parse_range("1..100", i128::MIN, i128::MAX, None).unwrap();
    assert_eq!(r.intervals, vec![Interval { min: Bound(1), max: Bound(100) }]);
  }

  #[test]
  fn parses_multi_segment_with_min_max() {
    let r = parse_range("min..50 | 80..max", 1, 100, None).unwrap();
    assert_eq!(
      r.intervals,
      vec![
        Interval { min: Bound(1), max: Bound(50) },
        Interval { min: Bound(80), max: Bound(100) },
      ]
    );
  }

  #[test]
  fn child_restriction_must_be_subset_of_parent() {
    let parent = parse_range("1..100", i128::MIN, i128::MAX, None).unwrap();
    let child = parse_range("10..50 | 80..90", 1, 100, Some(&parent)).unwrap();
    assert_eq!(child.intervals.len(), 2);

    let err = parse_range("10..200", 1, 100, Some(&parent));
    assert!(err.is_err());
  }

  #[test]
  fn rejects_out_of_order_segment() {
    assert!(parse_range("50..10", i128::MIN, i128::MAX, None).is_err());
  }

  #[test]
  fn rejects_non_ascending_segments() {
    assert!(parse_range("50..60 | 10..20", i128::MIN, i128::MAX, None).is_err());
  }

  #[test]
  fn rejects_unparseable_token() {
    assert!(parse_range("one..ten", i128::MIN, i128::MAX, None).is_err());
  }
}
