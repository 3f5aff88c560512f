use crate::error::Result;
use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

const INDENT_CHAR: u8 = b'\t';
const INDENT_SIZE: usize = 1;

/// Owned XML element. Attributes keep insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    tag: &'static str,
    attributes: Vec<(&'static str, String)>,
    children: Vec<Element>,
    text: Option<String>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn set_attr(&mut self, key: &'static str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Append a child and return it for further nesting.
    pub fn sub_element(&mut self, child: Element) -> &mut Element {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    pub fn tag(&self) -> &str {
        self.tag
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find_map(|(k, v)| (*k == key).then_some(v.as_str()))
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    fn write<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new(self.tag);
        for (key, value) in &self.attributes {
            start.push_attribute((*key, value.as_str()));
        }

        if self.children.is_empty() && self.text.is_none() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        if let Some(text) = &self.text {
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        for child in &self.children {
            child.write(writer)?;
        }
        writer.write_event(Event::End(BytesEnd::new(self.tag)))?;
        Ok(())
    }
}

/// Serialize the tree as an indented UTF-8 document with an XML declaration.
pub fn to_pretty_xml(root: &Element) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), INDENT_CHAR, INDENT_SIZE);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    root.write(&mut writer)?;
    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_prints_with_declaration() -> Result<(), Box<dyn std::error::Error>> {
        let mut root = Element::new("bpmn:definitions").with_attr("id", "d1");
        let process = root.sub_element(Element::new("bpmn:process").with_attr("id", "p1"));
        process.push(Element::new("bpmn:incoming").with_text("idf1"));
        process.push(Element::new("bpmn:task").with_attr("name", "a < b"));

        let xml = String::from_utf8(to_pretty_xml(&root)?)?;
        let expected = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
            <bpmn:definitions id=\"d1\">\n\
            \t<bpmn:process id=\"p1\">\n\
            \t\t<bpmn:incoming>idf1</bpmn:incoming>\n\
            \t\t<bpmn:task name=\"a &lt; b\"/>\n\
            \t</bpmn:process>\n\
            </bpmn:definitions>\n";
        assert_eq!(xml, expected);
        Ok(())
    }

    #[test]
    fn set_attr_replaces_in_place() {
        let mut element = Element::new("x").with_attr("a", "1").with_attr("b", "2");
        element.set_attr("a", "3");
        assert_eq!(element.attr("a"), Some("3"));
        assert_eq!(element.attributes[0].0, "a");
    }

    #[test]
    fn parse_back() -> Result<(), Box<dyn std::error::Error>> {
        let mut root = Element::new("root");
        root.sub_element(Element::new("child").with_attr("k", "v"))
            .push(Element::new("leaf").with_text("t"));
        let elements = parsed::parse(&to_pretty_xml(&root)?)?;
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[1].attr("k"), Some("v"));
        assert_eq!(elements[2].parent.as_deref(), Some("child"));
        assert_eq!(elements[2].text.as_deref(), Some("t"));
        Ok(())
    }
}
