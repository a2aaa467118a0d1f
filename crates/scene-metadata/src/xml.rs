//! Minimal element tree over quick-xml events.
//!
//! Metadata documents are small (a few kilobytes), so they are read fully
//! into a tree and queried by slash-separated paths of local names.
//! Namespace prefixes are dropped.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use stac_common::{StacError, StacResult};

/// An XML element with its attributes, text content and children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Parse a document and return its root element.
    pub fn parse(xml: &str) -> StacResult<XmlElement> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => stack.push(Self::from_start(&e)?),
                Ok(Event::Empty(e)) => {
                    let element = Self::from_start(&e)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::Text(t)) => {
                    if let Some(top) = stack.last_mut() {
                        let text = t.unescape().map_err(|e| malformed(&reader, e))?;
                        top.text.push_str(&text);
                    }
                }
                Ok(Event::CData(c)) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                    }
                }
                Ok(Event::End(_)) => {
                    let element = stack.pop().ok_or_else(|| {
                        StacError::MalformedMetadata("unbalanced closing tag".to_string())
                    })?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(malformed(&reader, e)),
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(StacError::MalformedMetadata(format!(
                "unclosed element <{}>",
                open.name
            )));
        }

        root.ok_or_else(|| StacError::MalformedMetadata("empty document".to_string()))
    }

    fn from_start(start: &BytesStart<'_>) -> StacResult<XmlElement> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| {
                StacError::MalformedMetadata(format!("bad attribute on <{}>: {}", name, e))
            })?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| StacError::MalformedMetadata(format!("bad attribute value: {}", e)))?
                .into_owned();
            attributes.push((key, value));
        }

        Ok(XmlElement {
            name,
            attributes,
            text: String::new(),
            children: Vec::new(),
        })
    }

    /// First direct child with the given local name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children with the given local name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Follow a slash-separated path of child names, taking the first match at each step.
    pub fn find(&self, path: &str) -> Option<&XmlElement> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |node, segment| node.child(segment))
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Trimmed text content.
    pub fn text(&self) -> &str {
        self.text.trim()
    }
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> StacResult<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        Ok(())
    } else if root.is_none() {
        *root = Some(element);
        Ok(())
    } else {
        Err(StacError::MalformedMetadata(
            "document has more than one root element".to_string(),
        ))
    }
}

fn malformed(reader: &Reader<&[u8]>, err: impl std::fmt::Display) -> StacError {
    StacError::MalformedMetadata(format!(
        "XML parsing error at position {}: {}",
        reader.buffer_position(),
        err
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_namespaced_tree() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<x:prdf xmlns:x="http://www.gisplan.com.br/xmlsat">
    <x:satellite>
        <x:name>CBERS</x:name>
        <x:number>4</x:number>
    </x:satellite>
    <x:image>
        <x:availableBands>
            <x:band gain="1.25">5</x:band>
            <x:band>6</x:band>
        </x:availableBands>
        <x:empty/>
    </x:image>
</x:prdf>"#;

        let root = XmlElement::parse(xml).unwrap();
        assert_eq!(root.name, "prdf");
        assert_eq!(root.find("satellite/name").unwrap().text(), "CBERS");
        assert!(root.find("image/empty").is_some());
        assert!(root.find("image/missing").is_none());

        let bands: Vec<_> = root
            .find("image/availableBands")
            .unwrap()
            .children_named("band")
            .collect();
        assert_eq!(bands.len(), 2);
        assert_eq!(bands[0].attribute("gain"), Some("1.25"));
        assert_eq!(bands[1].attribute("gain"), None);
        assert_eq!(bands[1].text(), "6");
    }

    #[test]
    fn test_entities_unescaped() {
        let root = XmlElement::parse("<a><b>x &amp; y</b></a>").unwrap();
        assert_eq!(root.find("b").unwrap().text(), "x & y");
    }

    #[test]
    fn test_malformed_documents() {
        assert!(matches!(
            XmlElement::parse("<a><b></a>"),
            Err(StacError::MalformedMetadata(_))
        ));
        assert!(matches!(
            XmlElement::parse("<a>"),
            Err(StacError::MalformedMetadata(_))
        ));
        assert!(matches!(
            XmlElement::parse(""),
            Err(StacError::MalformedMetadata(_))
        ));
    }
}
