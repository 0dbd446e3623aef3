//! Compound simple selectors.
//!
//! Supports `tag`, `#id`, `.class`, `[attr]` and `[attr=value]` combined
//! without whitespace (e.g. `canvas#game.main[tabindex]`). Combinators and
//! pseudo-classes are rejected; the snapshot is a flat element list.

use crate::snapshot::model::Element;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

impl Selector {
    /// Parses a compound selector. Returns `None` for empty input or any
    /// syntax outside the supported subset.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let mut sel = Selector::default();
        let mut rest = input;

        let tag_len = ident_len(rest);
        if tag_len > 0 {
            sel.tag = Some(rest[..tag_len].to_ascii_lowercase());
            rest = &rest[tag_len..];
        }

        while let Some(c) = rest.chars().next() {
            match c {
                '#' | '.' => {
                    let len = ident_len(&rest[1..]);
                    if len == 0 {
                        return None;
                    }
                    let name = rest[1..1 + len].to_string();
                    if c == '#' {
                        sel.id = Some(name);
                    } else {
                        sel.classes.push(name);
                    }
                    rest = &rest[1 + len..];
                }
                '[' => {
                    let close = rest.find(']')?;
                    let body = &rest[1..close];
                    let (name, value) = match body.split_once('=') {
                        Some((n, v)) => (n.trim(), Some(unquote(v.trim()).to_string())),
                        None => (body.trim(), None),
                    };
                    if name.is_empty() || ident_len(name) != name.len() {
                        return None;
                    }
                    sel.attributes.push((name.to_ascii_lowercase(), value));
                    rest = &rest[close + 1..];
                }
                _ => return None,
            }
        }

        Some(sel)
    }

    pub fn matches(&self, element: &Element) -> bool {
        let tag_ok = match &self.tag {
            Some(tag) => element.tag.eq_ignore_ascii_case(tag),
            None => true,
        };
        let id_ok = match &self.id {
            Some(id) => element.id.as_deref() == Some(id.as_str()),
            None => true,
        };

        tag_ok
            && id_ok
            && self.classes.iter().all(|c| element.has_class(c))
            && self.attributes.iter().all(|attr| attr_ok(element, attr))
    }
}

/// `[name]` needs the attribute present; `[name=value]` needs an exact value.
fn attr_ok(element: &Element, (name, value): &(String, Option<String>)) -> bool {
    match (element.attribute(name), value) {
        (Some(_), None) => true,
        (Some(actual), Some(expected)) => actual == expected,
        (None, _) => false,
    }
}

fn ident_len(s: &str) -> usize {
    s.char_indices()
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        .map_or(s.len(), |(i, _)| i)
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| s.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(s)
}
