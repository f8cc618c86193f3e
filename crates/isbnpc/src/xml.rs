//! A minimal element tree over quick-xml events.
//!
//! Text content is always kept as a `String`; nothing in this module tries to interpret it as a
//! number, so values such as ISBNs or years keep any leading zeros.

use quick_xml::{events::Event, Reader};

use crate::{Error, ErrorKind};

#[derive(Debug, Default)]
pub(crate) struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn new(name: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(name).into_owned(),
            ..Self::default()
        }
    }

    /// Qualified name as written in the document, including any prefix (e.g. `dc:creator`).
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// Text inside this element and all of its descendants in document order, trimmed.
    ///
    /// Markup inside a field (`<title>Foo<i>x</i> Bar</title>`) never drops part of its text.
    pub(crate) fn text(&self) -> &str {
        self.text.trim()
    }

    pub(crate) fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub(crate) fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Follows `path` one child at a time, taking the first child with each name.
    ///
    /// The error names the first node that could not be found together with the path to it.
    pub(crate) fn descend(&self, path: &[&str]) -> Result<&Element, Error> {
        let mut current = self;
        for (depth, name) in path.iter().enumerate() {
            current = current.child(name).ok_or_else(|| {
                let mut walked = vec![self.name()];
                walked.extend_from_slice(&path[..depth]);
                Error::new(
                    ErrorKind::MalformedResponse,
                    format!("no <{name}> under {}", walked.join(" > ")),
                )
            })?;
        }
        Ok(current)
    }
}

/// Parses `xml` into a tree and returns its root element.
pub(crate) fn parse(xml: &str) -> Result<Element, Error> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| malformed(&reader, e))?;

        match event {
            Event::Start(start) => stack.push(Element::new(start.name().as_ref())),
            Event::Empty(start) => {
                let element = Element::new(start.name().as_ref());
                if let Some(root) = attach(&mut stack, element) {
                    return Ok(root);
                }
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| {
                    Error::new(ErrorKind::MalformedResponse, "closing tag without an element")
                })?;
                if let Some(root) = attach(&mut stack, element) {
                    return Ok(root);
                }
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| malformed(&reader, e))?;
                push_text(&mut stack, &text);
            }
            Event::CData(data) => {
                let data = data.into_inner();
                push_text(&mut stack, &String::from_utf8_lossy(&data));
            }
            Event::Eof => {
                return Err(Error::new(
                    ErrorKind::MalformedResponse,
                    stack.last().map_or_else(
                        || "document has no root element".to_owned(),
                        |open| format!("document ended inside <{}>", open.name),
                    ),
                ))
            }
            _ => (),
        }
    }
}

/// Adds `element` to its parent, or hands it back when it is the root.
fn attach(stack: &mut [Element], element: Element) -> Option<Element> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            None
        }
        None => Some(element),
    }
}

fn push_text(stack: &mut [Element], text: &str) {
    // every open element owns the text of its descendants; text outside the root is dropped
    for open in stack.iter_mut() {
        open.text.push_str(text);
    }
}

fn malformed(reader: &Reader<&[u8]>, err: quick_xml::Error) -> Error {
    Error::wrap_with(
        ErrorKind::MalformedResponse,
        format!("invalid XML near byte {}", reader.buffer_position()),
        err,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_nested_tree_with_prefixed_names() {
        let root = parse(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
                <dcterms:title>Title</dcterms:title>
                <dc:creator>First</dc:creator>
                <dc:creator>Second</dc:creator>
                <empty/>
            </rdf:RDF>"#,
        )
        .unwrap();

        assert_eq!("rdf:RDF", root.name());
        assert_eq!("Title", root.child("dcterms:title").unwrap().text());
        let creators: Vec<_> = root.children_named("dc:creator").map(Element::text).collect();
        assert_eq!(vec!["First", "Second"], creators);
        assert_eq!("", root.child("empty").unwrap().text());
    }

    #[test]
    fn numeric_text_is_kept_verbatim() {
        let root = parse("<a><year>0042</year><hex>0x1F</hex></a>").unwrap();
        assert_eq!("0042", root.child("year").unwrap().text());
        assert_eq!("0x1F", root.child("hex").unwrap().text());
    }

    #[test]
    fn entities_and_cdata_are_decoded() {
        let root = parse("<a><b>Tom &amp; Jerry</b><c><![CDATA[<raw> & text]]></c></a>").unwrap();
        assert_eq!("Tom & Jerry", root.child("b").unwrap().text());
        assert_eq!("<raw> & text", root.child("c").unwrap().text());
    }

    #[test]
    fn descend_reports_first_missing_node() {
        let root = parse("<a><b><c>value</c></b></a>").unwrap();
        assert_eq!("value", root.descend(&["b", "c"]).unwrap().text());

        let err = root.descend(&["b", "x", "y"]).unwrap_err();
        assert_eq!(ErrorKind::MalformedResponse, err.kind());
        assert!(err.to_string().contains("no <x> under a > b"), "{err}");
    }

    #[test]
    fn markup_inside_text_keeps_every_part() {
        let root = parse(
            "<a><dcterms:title>Foo<i>x</i> Bar</dcterms:title><dc:creator> <b>Only</b> </dc:creator></a>",
        )
        .unwrap();

        let title = root.child("dcterms:title").unwrap();
        assert_eq!("Foox Bar", title.text());
        assert_eq!("x", title.child("i").unwrap().text());
        assert_eq!("Only", root.child("dc:creator").unwrap().text());
    }

    #[test]
    fn unterminated_document_is_malformed() {
        let err = parse("<a><b>text</b>").unwrap_err();
        assert_eq!(ErrorKind::MalformedResponse, err.kind());
        assert!(err.to_string().contains("ended inside <a>"), "{err}");
    }

    #[test]
    fn empty_document_is_malformed() {
        let err = parse("").unwrap_err();
        assert!(err.to_string().contains("no root element"), "{err}");
    }

    #[test]
    fn mismatched_tags_are_malformed() {
        let err = parse("<a><b></c></a>").unwrap_err();
        assert_eq!(ErrorKind::MalformedResponse, err.kind());
    }
}
