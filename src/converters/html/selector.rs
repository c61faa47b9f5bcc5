//! A minimal CSS selector engine for section splitting.
//!
//! Supports compound selectors built from a type (`h2`, `*`), classes (`.slide`), an id
//! (`#intro`) and attribute tests (`[data-slide]`, `[data-kind="title"]`), combined into
//! groups with commas. Combinators (descendant, `>`, `+`, `~`) are rejected.

use markup5ever_rcdom::Handle;

use super::dom::{attr, tag_name};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

impl Compound {
    fn matches(&self, node: &Handle) -> bool {
        let Some(tag) = tag_name(node) else {
            return false;
        };
        if let Some(expected) = &self.tag {
            if expected != tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if attr(node, "id").as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.is_empty() {
            let class_attr = attr(node, "class").unwrap_or_default();
            let classes: Vec<&str> = class_attr.split_whitespace().collect();
            if !self.classes.iter().all(|c| classes.contains(&c.as_str())) {
                return false;
            }
        }
        self.attributes.iter().all(|(name, expected)| match (attr(node, name), expected) {
            (Some(_), None) => true,
            (Some(value), Some(expected)) => &value == expected,
            (None, _) => false,
        })
    }
}

/// A parsed selector group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Compound>,
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn read_ident(chars: &[char], pos: &mut usize) -> String {
    let start = *pos;
    while *pos < chars.len() && is_ident_char(chars[*pos]) {
        *pos += 1;
    }
    chars[start..*pos].iter().collect()
}

fn parse_attribute(chars: &[char], pos: &mut usize) -> Result<(String, Option<String>), String> {
    // Called with `pos` just past `[`.
    let name = read_ident(chars, pos).to_ascii_lowercase();
    if name.is_empty() {
        return Err("attribute selector without a name".to_string());
    }
    match chars.get(*pos) {
        Some(']') => {
            *pos += 1;
            Ok((name, None))
        }
        Some('=') => {
            *pos += 1;
            let value = match chars.get(*pos) {
                Some(&quote) if quote == '"' || quote == '\'' => {
                    *pos += 1;
                    let start = *pos;
                    while *pos < chars.len() && chars[*pos] != quote {
                        *pos += 1;
                    }
                    if *pos >= chars.len() {
                        return Err("unterminated quoted attribute value".to_string());
                    }
                    let value: String = chars[start..*pos].iter().collect();
                    *pos += 1;
                    value
                }
                _ => read_ident(chars, pos),
            };
            if chars.get(*pos) != Some(&']') {
                return Err(format!("expected `]` after attribute `{}`", name));
            }
            *pos += 1;
            Ok((name, Some(value)))
        }
        Some(c) => Err(format!("unsupported attribute operator `{}`", c)),
        None => Err("unterminated attribute selector".to_string()),
    }
}

fn parse_compound(input: &str) -> Result<Compound, String> {
    let chars: Vec<char> = input.chars().collect();
    let mut compound = Compound::default();
    let mut pos = 0;

    if chars.first() == Some(&'*') {
        pos = 1;
    } else {
        let tag = read_ident(&chars, &mut pos);
        if !tag.is_empty() {
            compound.tag = Some(tag.to_ascii_lowercase());
        }
    }

    while pos < chars.len() {
        let c = chars[pos];
        pos += 1;
        match c {
            '.' => {
                let class = read_ident(&chars, &mut pos);
                if class.is_empty() {
                    return Err("empty class name".to_string());
                }
                compound.classes.push(class);
            }
            '#' => {
                let id = read_ident(&chars, &mut pos);
                if id.is_empty() {
                    return Err("empty id".to_string());
                }
                compound.id = Some(id);
            }
            '[' => compound.attributes.push(parse_attribute(&chars, &mut pos)?),
            c if c.is_whitespace() || c == '>' || c == '+' || c == '~' => {
                return Err("combinators are not supported".to_string());
            }
            c => return Err(format!("unexpected character `{}`", c)),
        }
    }
    Ok(compound)
}

impl Selector {
    /// Parses a selector group such as `h2, section.slide, [data-slide]`.
    pub fn parse(input: &str) -> Result<Self, String> {
        let alternatives = input
            .split(',')
            .map(|part| {
                let part = part.trim();
                if part.is_empty() {
                    Err("empty selector".to_string())
                } else {
                    parse_compound(part)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Selector { alternatives })
    }

    /// A selector matching a single tag.
    pub fn tag(tag: &str) -> Self {
        Selector {
            alternatives: vec![Compound {
                tag: Some(tag.to_ascii_lowercase()),
                ..Default::default()
            }],
        }
    }

    pub fn matches(&self, node: &Handle) -> bool {
        self.alternatives.iter().any(|c| c.matches(node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converters::html::dom::{descendants, find_body, parse_markup, tag_name};

    fn matching_tags(selector: &str, html: &str) -> Vec<String> {
        let selector = Selector::parse(selector).unwrap();
        let dom = parse_markup(html);
        let body = find_body(&dom).unwrap();
        descendants(&body)
            .iter()
            .filter(|n| selector.matches(n))
            .filter_map(|n| tag_name(n).map(str::to_string))
            .collect()
    }

    #[test]
    fn test_compound_selectors() {
        let html = r#"<section class="slide main"></section><section></section>
            <div id="intro"></div><p data-kind="title"></p><p data-kind="body"></p>"#;
        assert_eq!(matching_tags("section.slide", html), vec!["section"]);
        assert_eq!(matching_tags(".main.slide", html), vec!["section"]);
        assert_eq!(matching_tags("#intro", html), vec!["div"]);
        assert_eq!(matching_tags("[data-kind='title']", html), vec!["p"]);
        assert_eq!(matching_tags("p[data-kind]", html), vec!["p", "p"]);
        assert_eq!(matching_tags("div, section.slide", html), vec!["section", "div"]);
    }

    #[test]
    fn test_rejects_unsupported_syntax() {
        assert!(Selector::parse("div > p").is_err());
        assert!(Selector::parse("div p").is_err());
        assert!(Selector::parse("h1 + p").is_err());
        assert!(Selector::parse("h1,").is_err());
        assert!(Selector::parse("a[href^=http]").is_err());
        assert!(Selector::parse("p:first-child").is_err());
    }
}
