//! Support for Android `strings.xml` resource files.
//!
//! Only `<string>` elements become units. Everything else in the document
//! (comments, arrays, plurals, other attributes, markup nested inside a
//! `<string>`) is kept as serialized XML and written back untouched.

use std::{
    collections::HashMap,
    io::{BufRead, Write},
    path::Path,
};

use quick_xml::{
    Reader, Writer,
    escape::partial_escape,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    error::{Error, EscapeError},
    escape::Decoded,
    language::infer_language_from_path,
    traits::Parser,
    unit::AndroidResourceUnit,
};

/// A piece of a parsed document, in order.
#[derive(Debug, Clone)]
enum Node {
    /// XML passed through verbatim.
    Markup(String),
    /// Position of `units[i]`.
    Unit(usize),
}

/// An Android resource file: its string units in document order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AndroidResourceFile {
    /// Language inferred from the `values-…` directory, if any.
    pub language: Option<String>,
    units: Vec<AndroidResourceUnit>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    #[serde(skip)]
    nodes: Vec<Node>,
    /// Node holding `</resources>`; new units go right before it.
    #[serde(skip)]
    closing: Option<usize>,
}

impl AndroidResourceFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn units(&self) -> &[AndroidResourceUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Appends a unit. A later unit with the same id shadows the earlier one
    /// in lookups.
    pub fn add_unit(&mut self, unit: AndroidResourceUnit) {
        let i = self.units.len();
        if let Some(id) = unit.id() {
            self.index.insert(id.to_string(), i);
        }
        self.units.push(unit);

        if let Some(pos) = self.closing {
            self.nodes.splice(
                pos..pos,
                [
                    Node::Markup("    ".to_string()),
                    Node::Unit(i),
                    Node::Markup("\n".to_string()),
                ],
            );
            self.closing = Some(pos + 3);
        }
    }

    /// Rebuilds the id index from the unit list.
    pub fn make_index(&mut self) {
        self.index = self
            .units
            .iter()
            .enumerate()
            .filter_map(|(i, unit)| unit.id().map(|id| (id.to_string(), i)))
            .collect();
    }

    pub fn find_id(&self, id: &str) -> Option<&AndroidResourceUnit> {
        self.index.get(id).map(|&i| &self.units[i])
    }

    pub fn find_id_mut(&mut self, id: &str) -> Option<&mut AndroidResourceUnit> {
        self.index.get(id).map(|&i| &mut self.units[i])
    }

    /// Decodes every unit.
    ///
    /// A unit with a bad escape does not stop the others from decoding; it is
    /// up to the caller whether one failure should fail the whole file.
    pub fn targets(
        &self,
    ) -> impl Iterator<Item = (&AndroidResourceUnit, Result<Decoded, EscapeError>)> {
        self.units.iter().map(|unit| {
            let decoded = unit.decoded();
            if let Err(e) = &decoded {
                warn!("{}", e);
            }
            (unit, decoded)
        })
    }

    /// Escapes `value` and stores it in the unit named `id`.
    pub fn set_target(&mut self, id: &str, value: Option<&str>) -> Result<(), Error> {
        let unit = self
            .find_id_mut(id)
            .ok_or_else(|| Error::UnknownUnit(id.to_string()))?;
        unit.set_target(value);
        Ok(())
    }

    /// Loads a base resource (the default-language strings).
    ///
    /// Every base value becomes the source of the unit with the same id. Ids
    /// this file lacks are added as new units with an empty target. Returns
    /// the number of added units.
    pub fn set_base_resource(&mut self, base: &AndroidResourceFile) -> Result<usize, Error> {
        let mut added = 0;
        for base_unit in base.units() {
            let Some(id) = base_unit.id() else {
                warn!("skipping base unit without a name");
                continue;
            };
            let source = base_unit.target()?;
            match self.find_id_mut(id) {
                Some(unit) => unit.source = source,
                None => {
                    let mut unit = AndroidResourceUnit::new(source.as_deref());
                    unit.set_id(id);
                    unit.set_target(Some(""));
                    self.add_unit(unit);
                    added += 1;
                }
            }
        }
        self.make_index();
        debug!(
            base_units = base.len(),
            added, "merged base resource into translation"
        );
        Ok(added)
    }

    /// Registers a unit read from the document at the current position.
    fn push_parsed(&mut self, unit: AndroidResourceUnit) {
        let i = self.units.len();
        if let Some(id) = unit.id() {
            self.index.insert(id.to_string(), i);
        }
        self.units.push(unit);
        self.nodes.push(Node::Unit(i));
    }

    /// Moves whatever passthrough XML has been collected into a node.
    fn flush_markup(&mut self, markup: &mut Writer<Vec<u8>>) -> Result<(), Error> {
        let raw = std::mem::take(markup.get_mut());
        if !raw.is_empty() {
            self.nodes.push(Node::Markup(into_string(raw)?));
        }
        Ok(())
    }

    /// Writes a fresh document holding only the units.
    fn write_generated<W: Write>(&self, xml_writer: &mut Writer<W>) -> Result<(), Error> {
        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        xml_writer.write_event(Event::Start(BytesStart::new("resources")))?;

        for unit in &self.units {
            xml_writer.write_event(Event::Text(BytesText::new("\n    ")))?;
            write_unit(xml_writer, unit)?;
        }

        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        xml_writer.write_event(Event::End(BytesEnd::new("resources")))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        Ok(())
    }
}

impl Parser for AndroidResourceFile {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut file = AndroidResourceFile::new();
        let mut markup = Writer::new(Vec::new());

        loop {
            let event = xml_reader.read_event_into(&mut buf)?;
            match event {
                Event::Start(ref e) if e.name().as_ref() == b"string" => {
                    let mut unit = parse_attributes(e)?;
                    let (text, nested) = read_content(&mut xml_reader)?;
                    unit.text = text;
                    unit.markup = nested;
                    file.flush_markup(&mut markup)?;
                    file.push_parsed(unit);
                }
                Event::Empty(ref e) if e.name().as_ref() == b"string" => {
                    let unit = parse_attributes(e)?;
                    file.flush_markup(&mut markup)?;
                    file.push_parsed(unit);
                }
                Event::End(ref e) if e.name().as_ref() == b"resources" => {
                    file.flush_markup(&mut markup)?;
                    file.closing = Some(file.nodes.len());
                    markup.write_event(event.borrow())?;
                }
                Event::Eof => break,
                other => markup.write_event(other)?,
            }
            buf.clear();
        }
        file.flush_markup(&mut markup)?;

        debug!(units = file.len(), "parsed android resource file");
        Ok(file)
    }

    /// Write to any writer (file, memory, etc.).
    ///
    /// A parsed document is written back node by node; a file built in
    /// memory (or one without a `</resources>` end tag) is generated anew.
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new(&mut writer);
        if self.closing.is_none() {
            return self.write_generated(&mut xml_writer);
        }

        for node in &self.nodes {
            match node {
                Node::Markup(raw) => xml_writer.get_mut().write_all(raw.as_bytes())?,
                Node::Unit(i) => write_unit(&mut xml_writer, &self.units[*i])?,
            }
        }
        Ok(())
    }

    fn located_at(&mut self, path: &Path) {
        self.language = infer_language_from_path(path);
    }
}

fn into_string(raw: Vec<u8>) -> Result<String, Error> {
    String::from_utf8(raw).map_err(|e| Error::DataMismatch(e.to_string()))
}

fn parse_attributes(e: &BytesStart) -> Result<AndroidResourceUnit, Error> {
    let mut unit = AndroidResourceUnit::default();

    for attr in e.attributes().with_checks(false) {
        let attr = attr.map_err(|e| Error::DataMismatch(e.to_string()))?;
        match attr.key.as_ref() {
            b"name" => unit.name = Some(attr.unescape_value()?.to_string()),
            b"translatable" => {
                let v = attr.unescape_value()?;
                unit.translatable = Some(v == "true");
            }
            key => {
                let key = String::from_utf8_lossy(key).into_owned();
                unit.attributes
                    .push((key, attr.unescape_value()?.into_owned()));
            }
        }
    }

    if unit.name.is_none() {
        return Err(Error::InvalidResource(
            "string tag missing 'name'".to_string(),
        ));
    }
    Ok(unit)
}

/// Reads a `<string>` element up to its end tag.
///
/// The value is the text before the first child node. From that child on,
/// everything is serialized into the second result so it can be written back.
fn read_content<R: BufRead>(
    xml_reader: &mut Reader<R>,
) -> Result<(Option<String>, Option<String>), Error> {
    let mut buf = Vec::new();
    let mut text: Option<String> = None;
    let mut markup: Option<Writer<Vec<u8>>> = None;
    let mut depth = 0usize;

    loop {
        let event = xml_reader.read_event_into(&mut buf)?;
        match event {
            Event::Eof => return Err(Error::InvalidResource("Unexpected EOF".to_string())),
            Event::End(_) if depth == 0 => break,
            Event::Text(ref e) if markup.is_none() => {
                let v = e.unescape()?;
                text.get_or_insert_with(String::new).push_str(&v);
            }
            Event::CData(ref e) if markup.is_none() => {
                let v = std::str::from_utf8(e)
                    .map_err(|err| Error::DataMismatch(err.to_string()))?;
                text.get_or_insert_with(String::new).push_str(v);
            }
            _ => {
                match event {
                    Event::Start(_) => depth += 1,
                    Event::End(_) => depth -= 1,
                    _ => {}
                }
                let writer = markup.get_or_insert_with(|| {
                    debug!("keeping markup nested in <string> out of its value");
                    Writer::new(Vec::new())
                });
                writer.write_event(event)?;
            }
        }
        buf.clear();
    }

    let markup = markup.map(|w| into_string(w.into_inner())).transpose()?;
    Ok((text, markup))
}

fn write_unit<W: Write>(
    xml_writer: &mut Writer<W>,
    unit: &AndroidResourceUnit,
) -> Result<(), Error> {
    let mut elem = BytesStart::new("string");
    if let Some(name) = unit.id() {
        elem.push_attribute(("name", name));
    }
    if let Some(trans) = unit.translatable {
        elem.push_attribute(("translatable", if trans { "true" } else { "false" }));
    }
    for (key, value) in &unit.attributes {
        elem.push_attribute((key.as_str(), value.as_str()));
    }

    if unit.text.is_none() && unit.markup.is_none() {
        xml_writer.write_event(Event::Empty(elem))?;
        return Ok(());
    }

    xml_writer.write_event(Event::Start(elem))?;
    if let Some(text) = unit.raw_text() {
        xml_writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?;
    }
    if let Some(markup) = &unit.markup {
        xml_writer.get_mut().write_all(markup.as_bytes())?;
    }
    xml_writer.write_event(Event::End(BytesEnd::new("string")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(file: &AndroidResourceFile) -> String {
        let mut out = Vec::new();
        file.to_writer(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_keeps_escapes_and_whitespace() {
        let xml = r#"<resources>
    <string name="quoted">"  padded  "</string>
    <string name="escaped">It\'s\n</string>
</resources>"#;
        let file = AndroidResourceFile::from_str(xml).unwrap();
        assert_eq!(file.len(), 2);
        assert_eq!(file.units()[0].raw_text(), Some("\"  padded  \""));
        assert_eq!(file.units()[1].raw_text(), Some("It\\'s\\n"));
        assert_eq!(
            file.find_id("escaped").unwrap().target().unwrap().as_deref(),
            Some("It's\n")
        );
    }

    #[test]
    fn test_empty_elements_have_no_text() {
        let xml = r#"<resources><string name="a"/><string name="b"></string></resources>"#;
        let file = AndroidResourceFile::from_str(xml).unwrap();
        assert_eq!(file.find_id("a").unwrap().raw_text(), None);
        assert_eq!(file.find_id("b").unwrap().raw_text(), None);
        assert_eq!(file.find_id("b").unwrap().target(), Ok(None));
    }

    #[test]
    fn test_xml_entities_are_resolved_before_decoding() {
        let xml = r#"<resources><string name="cmp">a &lt; b &amp; c</string></resources>"#;
        let file = AndroidResourceFile::from_str(xml).unwrap();
        let unit = file.find_id("cmp").unwrap();
        assert_eq!(unit.raw_text(), Some("a < b & c"));
        assert_eq!(unit.target().unwrap().as_deref(), Some("a &lt; b & c"));
    }

    #[test]
    fn test_cdata_is_taken_verbatim() {
        let xml = r#"<resources><string name="c"><![CDATA[<b>bold</b>]]></string></resources>"#;
        let file = AndroidResourceFile::from_str(xml).unwrap();
        assert_eq!(file.find_id("c").unwrap().raw_text(), Some("<b>bold</b>"));
    }

    #[test]
    fn test_value_stops_at_first_child_element() {
        let xml = r#"<resources><string name="m">Hello <b>World</b>!</string></resources>"#;
        let file = AndroidResourceFile::from_str(xml).unwrap();
        let unit = file.find_id("m").unwrap();
        assert_eq!(unit.raw_text(), Some("Hello "));
        assert_eq!(unit.markup.as_deref(), Some("<b>World</b>!"));
        assert!(written(&file).contains(r#"<string name="m">Hello <b>World</b>!</string>"#));
    }

    #[test]
    fn test_missing_name_attribute() {
        let xml = r#"<resources><string>No name attr</string></resources>"#;
        let err = AndroidResourceFile::from_str(xml).unwrap_err();
        assert!(err.to_string().contains("missing 'name'"));
    }

    #[test]
    fn test_unexpected_eof_inside_string() {
        let xml = r#"<resources><string name="x">dangling"#;
        assert!(AndroidResourceFile::from_str(xml).is_err());
    }

    #[test]
    fn test_set_target_unknown_unit() {
        let mut file = AndroidResourceFile::new();
        let err = file.set_target("nope", Some("x")).unwrap_err();
        assert!(matches!(err, Error::UnknownUnit(id) if id == "nope"));
    }

    #[test]
    fn test_add_unit_updates_index() {
        let mut file = AndroidResourceFile::new();
        let mut unit = AndroidResourceUnit::new(None);
        unit.set_id("title");
        unit.set_target(Some("Title"));
        file.add_unit(unit);
        assert_eq!(
            file.find_id("title").unwrap().target().unwrap().as_deref(),
            Some("Title")
        );
        assert!(file.find_id("other").is_none());
    }

    #[test]
    fn test_add_unit_to_parsed_file_goes_before_closing_tag() {
        let xml = "<resources>\n    <!-- keep -->\n    <string name=\"a\">A</string>\n</resources>\n";
        let mut file = AndroidResourceFile::from_str(xml).unwrap();
        let mut unit = AndroidResourceUnit::new(None);
        unit.set_id("b");
        unit.set_target(Some("B"));
        file.add_unit(unit);

        assert_eq!(
            written(&file),
            "<resources>\n    <!-- keep -->\n    <string name=\"a\">A</string>\n    <string name=\"b\">B</string>\n</resources>\n"
        );
    }

    #[test]
    fn test_writer_escapes_markup_characters_only() {
        let mut file = AndroidResourceFile::new();
        let mut unit = AndroidResourceUnit::new(None);
        unit.set_id("q");
        unit.set_target(Some("Tom & \"Jerry\" <3"));
        file.add_unit(unit);

        assert!(written(&file).contains(r#"<string name="q">Tom &amp; \"Jerry\" &lt;3</string>"#));
    }
}
