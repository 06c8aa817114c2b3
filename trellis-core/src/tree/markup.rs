use super::document::NodeData;
use super::{Document, NodeRef, TreeAdapter};
use crate::error::{Error, Result};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

// -----------------------------------------------------------------------------
//   - Parser -
// -----------------------------------------------------------------------------
pub(super) fn parse_into(doc: &mut Document, parent: &NodeRef, src: &str) -> Result<()> {
    let mut parser = Parser {
        src,
        pos: 0,
        open: vec![(*parent, String::new())],
    };
    parser.parse(doc)
}

struct Parser<'src> {
    src: &'src str,
    pos: usize,
    open: Vec<(NodeRef, String)>,
}

impl<'src> Parser<'src> {
    fn rest(&self) -> &'src str {
        &self.src[self.pos..]
    }

    fn error<T>(&self, message: impl Into<String>) -> Result<T> {
        Err(Error::Markup {
            offset: self.pos,
            message: message.into(),
        })
    }

    fn current(&self) -> NodeRef {
        self.open[self.open.len() - 1].0
    }

    fn parse(&mut self, doc: &mut Document) -> Result<()> {
        while !self.rest().is_empty() {
            let rest = self.rest();

            if let Some(comment) = rest.strip_prefix("<!--") {
                let Some(end) = comment.find("-->") else {
                    return self.error("unterminated comment");
                };
                let node = doc.create_comment(&comment[..end]);
                doc.append_child(&self.current(), &node);
                self.pos += 4 + end + 3;
            } else if rest.starts_with("<!") {
                // Doctype and other declarations are skipped
                let Some(end) = rest.find('>') else {
                    return self.error("unterminated declaration");
                };
                self.pos += end + 1;
            } else if let Some(closing) = rest.strip_prefix("</") {
                let Some(end) = closing.find('>') else {
                    return self.error("unterminated closing tag");
                };
                let tag = closing[..end].trim().to_ascii_lowercase();
                if self.open.len() == 1 || self.open[self.open.len() - 1].1 != tag {
                    return self.error(format!("unexpected closing tag `{tag}`"));
                }
                self.open.pop();
                self.pos += 2 + end + 1;
            } else if starts_tag(rest) {
                self.start_tag(doc)?;
            } else {
                self.text(doc);
            }
        }

        match self.open.len() {
            1 => Ok(()),
            _ => {
                let tag = self.open[self.open.len() - 1].1.clone();
                self.error(format!("unclosed tag `{tag}`"))
            }
        }
    }

    fn text(&mut self, doc: &mut Document) {
        let rest = self.rest();
        // A `<` that does not start a tag is plain text
        let end = rest
            .char_indices()
            .skip(1)
            .find(|(i, c)| *c == '<' && is_markup(&rest[*i..]))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());

        let node = doc.create_text(&rest[..end]);
        doc.append_child(&self.current(), &node);
        self.pos += end;
    }

    fn start_tag(&mut self, doc: &mut Document) -> Result<()> {
        self.pos += 1;
        let tag = self.name().to_ascii_lowercase();
        let element = doc.create_element(&tag);

        loop {
            self.skip_whitespace();
            let rest = self.rest();

            if rest.starts_with("/>") {
                self.pos += 2;
                doc.append_child(&self.current(), &element);
                return Ok(());
            }

            if rest.starts_with('>') {
                self.pos += 1;
                doc.append_child(&self.current(), &element);
                if !is_void(&tag) {
                    self.open.push((element, tag));
                }
                return Ok(());
            }

            if rest.is_empty() {
                return self.error(format!("unterminated tag `{tag}`"));
            }

            let name = self.name().to_ascii_lowercase();
            if name.is_empty() {
                return self.error(format!("invalid attribute in `{tag}`"));
            }

            self.skip_whitespace();
            let value = match self.rest().strip_prefix('=') {
                Some(_) => {
                    self.pos += 1;
                    self.skip_whitespace();
                    self.attribute_value()?
                }
                None => String::new(),
            };

            doc.set_attribute(&element, &name, &value);
        }
    }

    fn name(&mut self) -> &'src str {
        let rest = self.rest();
        let len = rest
            .find(|c: char| c.is_whitespace() || matches!(c, '=' | '>' | '/' | '"' | '\''))
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn attribute_value(&mut self) -> Result<String> {
        let rest = self.rest();
        match rest.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let Some(len) = rest[1..].find(quote) else {
                    return self.error("unterminated attribute value");
                };
                self.pos += len + 2;
                Ok(rest[1..=len].to_string())
            }
            _ => {
                let len = rest
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(rest.len());
                self.pos += len;
                Ok(rest[..len].to_string())
            }
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }
}

fn starts_tag(src: &str) -> bool {
    let mut chars = src.chars();
    chars.next() == Some('<') && chars.next().map_or(false, |c| c.is_ascii_alphabetic())
}

fn is_markup(src: &str) -> bool {
    starts_tag(src) || src.starts_with("</") || src.starts_with("<!")
}

// -----------------------------------------------------------------------------
//   - Serializer -
// -----------------------------------------------------------------------------
pub(super) fn write_node(doc: &Document, node: &NodeRef, output: &mut String) {
    match doc.data(node) {
        Some(NodeData::Text(text)) => output.push_str(text),
        Some(NodeData::Comment(text)) => {
            output.push_str("<!--");
            output.push_str(text);
            output.push_str("-->");
        }
        Some(NodeData::Element(el)) => {
            output.push('<');
            output.push_str(&el.tag);
            for (name, value) in &el.attributes {
                output.push(' ');
                output.push_str(name);
                output.push_str("=\"");
                output.push_str(value);
                output.push('"');
            }
            output.push('>');

            if is_void(&el.tag) && el.children.is_empty() {
                return;
            }

            for child in doc.children(node) {
                write_node(doc, &child, output);
            }
            output.push_str("</");
            output.push_str(&el.tag);
            output.push('>');
        }
        None => {}
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn round_trip(src: &str) -> String {
        let doc = Document::parse(src).unwrap();
        doc.inner_markup(&doc.root())
    }

    #[test]
    fn parse_nested_elements() {
        let src = r#"<div id="wrapper"><p class="a b">Hi <b>there</b></p></div>"#;
        assert_eq!(round_trip(src), src);
    }

    #[test]
    fn attribute_forms() {
        assert_eq!(
            round_trip(r#"<input type=checkbox checked disabled='no'/>"#),
            r#"<input type="checkbox" checked="" disabled="no">"#
        );
    }

    #[test]
    fn doctype_is_skipped_and_comments_kept() {
        assert_eq!(
            round_trip("<!DOCTYPE html><p><!-- note -->x</p>"),
            "<p><!-- note -->x</p>"
        );
    }

    #[test]
    fn whitespace_text_is_kept() {
        let doc = Document::parse("<ul>\n  <li>a</li>\n</ul>").unwrap();
        let ul = doc.resolve("ul").unwrap();
        assert_eq!(doc.children(&ul).len(), 3);
    }

    #[test]
    fn stray_angle_bracket_is_text() {
        assert_eq!(round_trip("<p>a < b</p>"), "<p>a < b</p>");
    }

    #[test]
    fn mismatched_tags_fail() {
        assert!(matches!(
            Document::parse("<div><p></div>"),
            Err(Error::Markup { .. })
        ));
        assert!(matches!(Document::parse("<div>"), Err(Error::Markup { .. })));
    }
}
