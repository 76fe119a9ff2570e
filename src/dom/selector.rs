//! Minimal CSS selector engine for target discovery.
//!
//! Supports comma-separated groups of descendant-combined compound
//! selectors: `tag`, `*`, `.class`, `#id`, `[attr]`, `[attr=v]`,
//! `[attr^=v]`, `[attr$=v]`, `[attr*=v]`. That covers every query the
//! page runtime makes (`section[id]`, `a[href^="#"]`, `.nav-links .nav-link`).

use super::{Document, NodeId};

/// Malformed or unsupported selector.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorError {
    pub selector: String,
    pub message: String,
}

impl std::fmt::Display for SelectorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid selector `{}`: {}", self.selector, self.message)
    }
}

impl std::error::Error for SelectorError {}

#[derive(Debug, Clone, PartialEq)]
enum AttrOp {
    Exists,
    Equals(String),
    Prefix(String),
    Suffix(String),
    Contains(String),
}

#[derive(Debug, Clone, PartialEq)]
struct AttrMatcher {
    name: String,
    op: AttrOp,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatcher>,
}

/// Parsed selector list.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    /// Each group is a descendant chain, outermost compound first.
    groups: Vec<Vec<Compound>>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let err = |message: &str| SelectorError {
            selector: input.to_string(),
            message: message.to_string(),
        };

        let mut groups = Vec::new();
        for group in split_outside_brackets(input, |c| c == ',') {
            let group = group.trim();
            if group.is_empty() {
                return Err(err("empty selector group"));
            }
            let mut chain = Vec::new();
            for part in split_outside_brackets(group, char::is_whitespace) {
                if part.is_empty() {
                    continue;
                }
                if matches!(part, ">" | "+" | "~") || part.starts_with(['>', '+', '~']) {
                    return Err(err("only the descendant combinator is supported"));
                }
                chain.push(parse_compound(part).map_err(|m| err(&m))?);
            }
            groups.push(chain);
        }
        if groups.is_empty() {
            return Err(err("empty selector"));
        }
        Ok(Self { groups })
    }

    /// Whether element `id` matches any group.
    pub fn matches(&self, doc: &Document, id: NodeId) -> bool {
        self.groups.iter().any(|chain| matches_chain(doc, id, chain))
    }
}

fn matches_chain(doc: &Document, id: NodeId, chain: &[Compound]) -> bool {
    let (last, rest) = match chain.split_last() {
        Some(split) => split,
        None => return false,
    };
    if !matches_compound(doc, id, last) {
        return false;
    }
    // Descendant-only chains can be matched greedily against the nearest ancestor.
    let mut cur = doc.node(id).and_then(|n| n.parent);
    for compound in rest.iter().rev() {
        loop {
            match cur {
                Some(c) if matches_compound(doc, c, compound) => {
                    cur = doc.node(c).and_then(|n| n.parent);
                    break;
                }
                Some(c) => cur = doc.node(c).and_then(|n| n.parent),
                None => return false,
            }
        }
    }
    true
}

fn matches_compound(doc: &Document, id: NodeId, c: &Compound) -> bool {
    let node = match doc.node(id) {
        Some(n) if n.is_element() => n,
        _ => return false,
    };
    if let Some(tag) = &c.tag {
        if !node.tag.eq_ignore_ascii_case(tag) {
            return false;
        }
    }
    if let Some(want) = &c.id {
        if node.id() != Some(want.as_str()) {
            return false;
        }
    }
    if !c.classes.iter().all(|cls| node.has_class(cls)) {
        return false;
    }
    c.attrs.iter().all(|a| {
        let value = match a.name.as_str() {
            "class" if !node.class_list.is_empty() => Some(node.class_list.join(" ")),
            _ => node.attr(&a.name).map(str::to_string),
        };
        match (&a.op, value) {
            (_, None) => false,
            (AttrOp::Exists, Some(_)) => true,
            (AttrOp::Equals(v), Some(have)) => have == *v,
            (AttrOp::Prefix(v), Some(have)) => !v.is_empty() && have.starts_with(v.as_str()),
            (AttrOp::Suffix(v), Some(have)) => !v.is_empty() && have.ends_with(v.as_str()),
            (AttrOp::Contains(v), Some(have)) => !v.is_empty() && have.contains(v.as_str()),
        }
    })
}

/// Split on `is_sep` except inside `[...]` or quotes.
fn split_outside_brackets(input: &str, is_sep: impl Fn(char) -> bool) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, ch) in input.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(ch),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, c) if depth == 0 && is_sep(c) => {
                parts.push(&input[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn parse_compound(part: &str) -> Result<Compound, String> {
    let chars: Vec<char> = part.chars().collect();
    let mut i = 0;
    let mut c = Compound::default();

    let read_ident = |i: &mut usize| -> String {
        let start = *i;
        while *i < chars.len() && is_ident_char(chars[*i]) {
            *i += 1;
        }
        chars[start..*i].iter().collect()
    };

    if chars.first() == Some(&'*') {
        i = 1;
    } else if chars.first().map(|c| is_ident_char(*c)).unwrap_or(false) {
        c.tag = Some(read_ident(&mut i).to_lowercase());
    }

    while i < chars.len() {
        match chars[i] {
            '.' => {
                i += 1;
                let ident = read_ident(&mut i);
                if ident.is_empty() {
                    return Err("expected class name after `.`".into());
                }
                c.classes.push(ident);
            }
            '#' => {
                i += 1;
                let ident = read_ident(&mut i);
                if ident.is_empty() {
                    return Err("expected id after `#`".into());
                }
                c.id = Some(ident);
            }
            '[' => {
                let close = chars[i..]
                    .iter()
                    .position(|ch| *ch == ']')
                    .ok_or_else(|| "unterminated `[`".to_string())?;
                let inner: String = chars[i + 1..i + close].iter().collect();
                c.attrs.push(parse_attr(&inner)?);
                i += close + 1;
            }
            other => return Err(format!("unexpected `{}`", other)),
        }
    }
    Ok(c)
}

fn parse_attr(inner: &str) -> Result<AttrMatcher, String> {
    let inner = inner.trim();
    let ops: [(&str, fn(String) -> AttrOp); 4] = [
        ("^=", AttrOp::Prefix),
        ("$=", AttrOp::Suffix),
        ("*=", AttrOp::Contains),
        ("=", AttrOp::Equals),
    ];
    for (token, make) in ops {
        if let Some(pos) = inner.find(token) {
            let name = inner[..pos].trim();
            if name.is_empty() || !name.chars().all(is_ident_char) {
                return Err(format!("bad attribute name in `[{}]`", inner));
            }
            let raw = inner[pos + token.len()..].trim();
            let value = raw
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| raw.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(raw);
            return Ok(AttrMatcher {
                name: name.to_lowercase(),
                op: make(value.to_string()),
            });
        }
    }
    if inner.is_empty() || !inner.chars().all(is_ident_char) {
        return Err(format!("bad attribute selector `[{}]`", inner));
    }
    Ok(AttrMatcher {
        name: inner.to_lowercase(),
        op: AttrOp::Exists,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parser::parse_html;

    const PAGE: &str = r##"
        <html><body>
            <nav class="nav">
                <ul class="nav-links">
                    <li><a class="nav-link" href="#about">About</a></li>
                    <li><a class="nav-link" href="https://elsewhere.test/">Out</a></li>
                </ul>
            </nav>
            <section id="about"><div class="about-card">x</div></section>
            <section><div class="book-card hobby-card">y</div></section>
            <a class="nav-link" href="#stray">Stray</a>
        </body></html>
    "##;

    #[test]
    fn attribute_and_class_queries() {
        let doc = parse_html(PAGE, "file:///page.html");
        assert_eq!(doc.query_all("section[id]").unwrap().len(), 1);
        assert_eq!(doc.query_all("a[href^=\"#\"]").unwrap().len(), 2);
        assert_eq!(doc.query_all(".nav-link").unwrap().len(), 3);
        assert_eq!(doc.query_all(".book-card.hobby-card").unwrap().len(), 1);
        assert_eq!(doc.query_all("a[href$='/']").unwrap().len(), 1);
    }

    #[test]
    fn descendant_combinator_scopes_matches() {
        let doc = parse_html(PAGE, "file:///page.html");
        let inside = doc.query_all(".nav-links .nav-link").unwrap();
        assert_eq!(inside.len(), 2);
        assert_eq!(doc.query_all("nav a").unwrap().len(), 2);
    }

    #[test]
    fn group_list_is_document_ordered_and_unique() {
        let doc = parse_html(PAGE, "file:///page.html");
        let found = doc.query_all(".about-card, .book-card, .hobby-card").unwrap();
        assert_eq!(found.len(), 2);
        assert!(found[0] < found[1]);
    }

    #[test]
    fn rejects_malformed() {
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse("a,").is_err());
        assert!(Selector::parse("ul > li").is_err());
        assert!(Selector::parse("[href").is_err());
        assert!(Selector::parse(".").is_err());
        assert!(Selector::parse("#").is_err());
    }
}
