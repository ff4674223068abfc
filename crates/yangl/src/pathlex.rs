//! Pure string scanners for YANG identifiers and the path-like micro
//! grammars (schema-nodeid, leafref path-arg, instance-identifier,
//! predicates). None of these allocate or mutate; each either consumes a
//! prefix of the input and reports how many bytes it ate, or reports the
//! byte offset where the grammar broke.

use std::fmt;

/// The byte offset at which a scan failed. Carries the same information the
/// original C contract encoded as a negative byte count, but as a type
/// rather than a sign bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadOffset(pub usize);

impl fmt::Display for BadOffset {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "syntax error at byte {}", self.0)
  }
}

pub type LexResult<T> = Result<T, BadOffset>;

fn is_ident_start(b: u8) -> bool {
  b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_cont(b: u8) -> bool {
  b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.')
}

/// `(ALPHA|'_') (ALPHA|DIGIT|'_'|'-'|'.')*`, rejecting any identifier whose
/// first three bytes spell `"xml"` under any casing (all eight casings of
/// the three letters are rejected, per spec's resolved Open Question).
///
/// Returns the number of bytes consumed on success.
pub fn parse_identifier(s: &[u8]) -> LexResult<usize> {
  let Some(&first) = s.first() else {
    return Err(BadOffset(0));
  };
  if !is_ident_start(first) {
    return Err(BadOffset(0));
  }

  let mut len = 1;
  while len < s.len() && is_ident_cont(s[len]) {
    len += 1;
  }

  if len >= 3 && s[0..3].eq_ignore_ascii_case(b"xml") {
    return Err(BadOffset(0));
  }

  Ok(len)
}

/// `(prefix ':')? identifier`. Returns `(mod_name, name)` byte spans
/// relative to `s`; `mod_name` is empty when no prefix was present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeIdentifier {
  pub mod_name: (usize, usize),
  pub name: (usize, usize),
  pub consumed: usize,
}

pub fn parse_node_identifier(s: &[u8]) -> LexResult<NodeIdentifier> {
  let first_len = parse_identifier(s)?;

  if first_len < s.len() && s[first_len] == b':' {
    let rest = &s[first_len + 1..];
    let name_len = parse_identifier(rest).map_err(|e| BadOffset(first_len + 1 + e.0))?;
    return Ok(NodeIdentifier {
      mod_name: (0, first_len),
      name: (first_len + 1, first_len + 1 + name_len),
      consumed: first_len + 1 + name_len,
    });
  }

  Ok(NodeIdentifier {
    mod_name: (0, 0),
    name: (0, first_len),
    consumed: first_len,
  })
}

/// Tri-state relativity tracker for a schema-nodeid scanned one segment at
/// a time: `Unset` before the first call, then pinned to `Relative` or
/// `Absolute` for the remainder of the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Relativity {
  #[default]
  Unset,
  Relative,
  Absolute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaNodeidSegment {
  pub node: NodeIdentifier,
  pub is_relative: bool,
  pub has_predicate: bool,
  pub consumed: usize,
}

/// Scans one `/segment` or `segment` (possibly prefixed by `./`) of a
/// schema-nodeid, updating `relativity` in place. `has_predicate` reports
/// whether a `[...]` predicate immediately follows the identifier (schema
/// nodeids themselves never carry predicates; this is surfaced so a caller
/// parsing a JSON-flavored instance path can reject or consume it).
pub fn parse_schema_nodeid(s: &[u8], relativity: &mut Relativity) -> LexResult<SchemaNodeidSegment> {
  let mut pos = 0;

  if s.first() == Some(&b'/') {
    if *relativity == Relativity::Relative {
      return Err(BadOffset(0));
    }
    *relativity = Relativity::Absolute;
    pos += 1;
  } else {
    if s.starts_with(b"./") {
      pos += 2;
    }
    if *relativity == Relativity::Unset {
      *relativity = Relativity::Relative;
    } else if *relativity == Relativity::Absolute {
      return Err(BadOffset(0));
    }
  }

  let node = parse_node_identifier(&s[pos..]).map_err(|e| BadOffset(pos + e.0))?;
  let consumed = pos + node.consumed;

  // Schema-nodeid predicates are not permitted here; the caller decides
  // whether a following `[` is a syntax error or the start of a separate
  // JSON-data predicate grammar.
  let has_predicate = s.get(consumed) == Some(&b'[');

  Ok(SchemaNodeidSegment {
    node,
    is_relative: *relativity == Relativity::Relative,
    has_predicate,
    consumed,
  })
}

/// Whitespace accepted inside predicates: space, tab, LF, CR.
fn is_pred_space(b: u8) -> bool {
  matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

fn skip_ws(s: &[u8], mut pos: usize) -> usize {
  while pos < s.len() && is_pred_space(s[pos]) {
    pos += 1;
  }
  pos
}

/// `path-key-expr := current-function-invocation '/' rel-path-keyexpr`
/// `rel-path-keyexpr := ('..' '/'){1,}(node-identifier '/'){0,}node-identifier`
///
/// Returns the number of leading `../` steps and the trailing dotted
/// node-identifier path as byte spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathKeyExpr {
  pub parent_times: usize,
  pub consumed: usize,
}

pub fn parse_path_key_expr(s: &[u8]) -> LexResult<PathKeyExpr> {
  if !s.starts_with(b"current()") {
    return Err(BadOffset(0));
  }
  let mut pos = "current()".len();
  if s.get(pos) != Some(&b'/') {
    return Err(BadOffset(pos));
  }
  pos += 1;

  let mut parent_times = 0;
  while s[pos..].starts_with(b"../") {
    parent_times += 1;
    pos += 3;
  }
  if parent_times == 0 {
    return Err(BadOffset(pos));
  }

  loop {
    let node = parse_node_identifier(&s[pos..]).map_err(|e| BadOffset(pos + e.0))?;
    pos += node.consumed;
    if s.get(pos) == Some(&b'/') {
      pos += 1;
      continue;
    }
    break;
  }

  Ok(PathKeyExpr {
    parent_times,
    consumed: pos,
  })
}

/// `path-predicate := '[' *WSP path-equality-expr *WSP ']'`
/// `path-equality-expr := node-identifier *WSP '=' *WSP path-key-expr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPredicate {
  pub key: NodeIdentifier,
  pub value: PathKeyExpr,
  pub consumed: usize,
}

pub fn parse_path_predicate(s: &[u8]) -> LexResult<PathPredicate> {
  if s.first() != Some(&b'[') {
    return Err(BadOffset(0));
  }
  let mut pos = skip_ws(s, 1);

  let key = parse_node_identifier(&s[pos..]).map_err(|e| BadOffset(pos + e.0))?;
  pos += key.consumed;
  pos = skip_ws(s, pos);

  if s.get(pos) != Some(&b'=') {
    return Err(BadOffset(pos));
  }
  pos = skip_ws(s, pos + 1);

  let value = parse_path_key_expr(&s[pos..]).map_err(|e| BadOffset(pos + e.0))?;
  pos += value.consumed;
  pos = skip_ws(s, pos);

  if s.get(pos) != Some(&b']') {
    return Err(BadOffset(pos));
  }
  pos += 1;

  Ok(PathPredicate {
    key,
    value,
    consumed: pos,
  })
}

/// `path-arg := absolute-path | relative-path`
/// `absolute-path := 1*('/' (node-identifier *path-predicate))`
/// `relative-path := 1*('../') descendant-path`
///
/// `parent_times == -1` (`None` here) denotes an absolute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathArg {
  pub parent_times: Option<usize>,
  pub segments: Vec<(NodeIdentifier, Vec<PathPredicate>)>,
  pub consumed: usize,
}

pub fn parse_path_arg(s: &[u8]) -> LexResult<PathArg> {
  let mut pos = 0;
  let parent_times = if s.first() == Some(&b'/') {
    None
  } else {
    let mut times = 0;
    while s[pos..].starts_with(b"../") {
      times += 1;
      pos += 3;
    }
    if times == 0 {
      return Err(BadOffset(pos));
    }
    Some(times)
  };

  let mut segments = Vec::new();
  loop {
    if parent_times.is_none() {
      if s.get(pos) != Some(&b'/') {
        break;
      }
      pos += 1;
    } else if segments.is_empty() {
      // first relative segment already consumed via the ../ prefix above
    } else if s.get(pos) == Some(&b'/') {
      pos += 1;
    } else {
      break;
    }

    let node = parse_node_identifier(&s[pos..]).map_err(|e| BadOffset(pos + e.0))?;
    pos += node.consumed;

    let mut predicates = Vec::new();
    while s.get(pos) == Some(&b'[') {
      let pred = parse_path_predicate(&s[pos..]).map_err(|e| BadOffset(pos + e.0))?;
      pos += pred.consumed;
      predicates.push(pred);
    }

    segments.push((node, predicates));

    if s.get(pos) != Some(&b'/') {
      break;
    }
  }

  if segments.is_empty() {
    return Err(BadOffset(pos));
  }

  Ok(PathArg {
    parent_times,
    segments,
    consumed: pos,
  })
}

/// `instance-identifier := 1*('/' (node-identifier *predicate))`, but the
/// `prefix:` in each `node-identifier` denotes a *module name*, not a YANG
/// prefix (the JSON-flavored convention this engine uses throughout).
pub fn parse_instance_identifier(s: &[u8]) -> LexResult<PathArg> {
  if s.first() != Some(&b'/') {
    return Err(BadOffset(0));
  }
  parse_path_arg(s)
}

/// One quoted value in a `[key='value']` or `[.='value']` predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonPredicate {
  Key { name: NodeIdentifier, value: (usize, usize) },
  SelfValue { value: (usize, usize) },
  Position(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedJsonPredicate {
  pub predicate: JsonPredicate,
  pub consumed: usize,
}

fn parse_quoted(s: &[u8], pos: usize) -> LexResult<((usize, usize), usize)> {
  let quote = *s.get(pos).ok_or(BadOffset(pos))?;
  if quote != b'\'' && quote != b'"' {
    return Err(BadOffset(pos));
  }
  let start = pos + 1;
  let mut end = start;
  while end < s.len() && s[end] != quote {
    end += 1;
  }
  if end >= s.len() {
    return Err(BadOffset(pos));
  }
  Ok(((start, end), end + 1))
}

/// `[name='value']`, `[.='value']` (leaf-list self predicate), or `[3]`
/// (position predicate, valid only in data-tree instance-identifiers; the
/// numeral uses no leading zero beyond the single digit `0`).
pub fn parse_schema_json_predicate(s: &[u8]) -> LexResult<ParsedJsonPredicate> {
  if s.first() != Some(&b'[') {
    return Err(BadOffset(0));
  }
  let mut pos = skip_ws(s, 1);

  if s.get(pos) == Some(&b'.') {
    pos += 1;
    pos = skip_ws(s, pos);
    if s.get(pos) != Some(&b'=') {
      return Err(BadOffset(pos));
    }
    pos = skip_ws(s, pos + 1);
    let (value, next) = parse_quoted(s, pos)?;
    pos = skip_ws(s, next);
    if s.get(pos) != Some(&b']') {
      return Err(BadOffset(pos));
    }
    return Ok(ParsedJsonPredicate {
      predicate: JsonPredicate::SelfValue { value },
      consumed: pos + 1,
    });
  }

  if s.get(pos).is_some_and(u8::is_ascii_digit) {
    let digit_start = pos;
    if s[pos] == b'0' {
      pos += 1;
    } else {
      while pos < s.len() && s[pos].is_ascii_digit() {
        pos += 1;
      }
    }
    let n: u64 = std::str::from_utf8(&s[digit_start..pos])
      .ok()
      .and_then(|t| t.parse().ok())
      .ok_or(BadOffset(digit_start))?;
    let next = skip_ws(s, pos);
    if s.get(next) != Some(&b']') {
      return Err(BadOffset(next));
    }
    return Ok(ParsedJsonPredicate {
      predicate: JsonPredicate::Position(n),
      consumed: next + 1,
    });
  }

  let name = parse_node_identifier(&s[pos..]).map_err(|e| BadOffset(pos + e.0))?;
  pos += name.consumed;
  pos = skip_ws(s, pos);
  if s.get(pos) != Some(&b'=') {
    return Err(BadOffset(pos));
  }
  pos = skip_ws(s, pos + 1);
  let (value, next) = parse_quoted(s, pos)?;
  pos = skip_ws(s, next);
  if s.get(pos) != Some(&b']') {
    return Err(BadOffset(pos));
  }

  Ok(ParsedJsonPredicate {
    predicate: JsonPredicate::Key { name, value },
    consumed: pos + 1,
  })
}

/// Convenience wrapper matching the generic `predicate` grammar used by
/// instance-identifiers (delegates to [`parse_schema_json_predicate`]; kept
/// as a distinct entry point because the two grammars diverge once
/// leaf-list/position predicates are layered on top of plain key predicates).
pub fn parse_predicate(s: &[u8]) -> LexResult<ParsedJsonPredicate> {
  parse_schema_json_predicate(s)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn identifier_accepts_grammar_and_is_maximal() {
    assert_eq!(parse_identifier(b"foo-bar.1_2 rest"), Ok(11));
    assert_eq!(parse_identifier(b"_leading"), Ok(8));
    assert_eq!(parse_identifier(b"1abc"), Err(BadOffset(0)));
    assert_eq!(parse_identifier(b""), Err(BadOffset(0)));
  }

  #[test]
  fn identifier_rejects_all_eight_xml_casings() {
    for variant in ["xml", "xMl", "xML", "Xml", "XMl", "XmL", "XML", "xml"] {
      let input = format!("{variant}foo");
      assert_eq!(
        parse_identifier(input.as_bytes()),
        Err(BadOffset(0)),
        "expected {variant} to be rejected"
      );
    }
  }

  #[test]
  fn identifier_allows_xml_as_infix() {
    assert_eq!(parse_identifier(b"aXmlfoo"), Ok(7));
  }

  #[test]
  fn node_identifier_splits_prefix() {
    let parsed = parse_node_identifier(b"if:interfaces").unwrap();
    assert_eq!(&b"if:interfaces"[parsed.mod_name.0..parsed.mod_name.1], b"if");
    assert_eq!(&b"if:interfaces"[parsed.name.0..parsed.name.1], b"interfaces");
  }

  #[test]
  fn node_identifier_without_prefix_has_empty_mod_name() {
    let parsed = parse_node_identifier(b"interfaces").unwrap();
    assert_eq!(parsed.mod_name, (0, 0));
  }

  #[test]
  fn schema_nodeid_tracks_relativity_across_calls() {
    let mut rel = Relativity::Unset;
    let first = parse_schema_nodeid(b"/if:interfaces", &mut rel).unwrap();
    assert!(!first.is_relative);
    assert_eq!(rel, Relativity::Absolute);

    let mut rel2 = Relativity::Unset;
    let seg = parse_schema_nodeid(b"interface", &mut rel2).unwrap();
    assert!(seg.is_relative);
    assert_eq!(rel2, Relativity::Relative);
  }

  #[test]
  fn schema_nodeid_rejects_mixed_relativity() {
    let mut rel = Relativity::Absolute;
    assert!(parse_schema_nodeid(b"interface", &mut rel).is_err());
  }

  #[test]
  fn path_arg_absolute_has_no_parent_times() {
    let parsed = parse_path_arg(b"/if:interfaces/if:interface").unwrap();
    assert_eq!(parsed.parent_times, None);
    assert_eq!(parsed.segments.len(), 2);
  }

  #[test]
  fn path_arg_relative_counts_parent_steps() {
    let parsed = parse_path_arg(b"../../if:name").unwrap();
    assert_eq!(parsed.parent_times, Some(2));
    assert_eq!(parsed.segments.len(), 1);
  }

  #[test]
  fn path_predicate_parses_key_expr() {
    let pred = parse_path_predicate(b"[name=current()/../../name]").unwrap();
    assert_eq!(pred.value.parent_times, 2);
  }

  #[test]
  fn json_predicate_key_and_self_and_position() {
    let key = parse_schema_json_predicate(b"[name='eth0']").unwrap();
    assert!(matches!(key.predicate, JsonPredicate::Key { .. }));

    let self_pred = parse_schema_json_predicate(b"[.='up']").unwrap();
    assert!(matches!(self_pred.predicate, JsonPredicate::SelfValue { .. }));

    let pos = parse_schema_json_predicate(b"[3]").unwrap();
    assert_eq!(pos.predicate, JsonPredicate::Position(3));

    let zero = parse_schema_json_predicate(b"[0]").unwrap();
    assert_eq!(zero.predicate, JsonPredicate::Position(0));
  }

  #[test]
  fn quote_mismatch_is_rejected() {
    assert!(parse_schema_json_predicate(br#"[name='eth0"]"#).is_err());
  }

  #[test]
  fn empty_identifier_is_an_error() {
    assert!(parse_node_identifier(b"").is_err());
    assert!(parse_node_identifier(b":name").is_err());
  }
}
