use serde::Serialize;
use xml::name::OwnedName;
use xml::reader::{ParserConfig, XmlEvent};

use crate::feeds::result::ParseError;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RawItem {
    pub title: String,
    pub link: String,
    pub description: String,
    pub pub_date: String,
}

/// One fetched RSS channel, before dates are normalized.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RawFeed {
    pub title: String,
    pub link: String,
    pub description: String,
    pub items: Vec<RawItem>,
}

impl RawItem {
    fn set(&mut self, field: &str, text: &str) {
        match field {
            "title" => self.title = unescape(text),
            "link" => self.link = String::from(text.trim()),
            "description" => self.description = unescape(text),
            "pubDate" => self.pub_date = String::from(text.trim()),
            _ => {}
        }
    }
}

impl RawFeed {
    fn set(&mut self, field: &str, text: &str) {
        match field {
            "title" => self.title = unescape(text),
            "link" => self.link = String::from(text.trim()),
            "description" => self.description = unescape(text),
            _ => {}
        }
    }
}

/// Producers regularly double-encode entities, so text that the XML reader
/// already decoded goes through an HTML decode as well.
fn unescape(text: &str) -> String {
    html_escape::decode_html_entities(text.trim()).into_owned()
}

/// Namespaced elements keep their prefix so `atom:link` never passes for `link`.
fn tag_name(name: &OwnedName) -> String {
    match &name.prefix {
        Some(prefix) => format!("{}:{}", prefix, name.local_name),
        None => name.local_name.clone(),
    }
}

/// Decode an RSS document into its channel and items.
///
/// # Errors
///
/// Will return Err for malformed XML or a document without a channel
pub fn parse(bytes: &[u8]) -> Result<RawFeed, ParseError> {
    let reader = ParserConfig::new()
        .trim_whitespace(false)
        .cdata_to_characters(true)
        .create_reader(bytes);

    let mut path: Vec<String> = Vec::new();
    let mut feed: Option<RawFeed> = None;
    let mut item: Option<RawItem> = None;
    let mut text = String::new();

    for event in reader {
        match event? {
            XmlEvent::StartElement { name, .. } => {
                let tag = tag_name(&name);
                let parent = path.last().map(String::as_str);
                match (parent, tag.as_str()) {
                    (_, "channel") if feed.is_none() => feed = Some(RawFeed::default()),
                    (Some("channel"), "item") => item = Some(RawItem::default()),
                    _ => {}
                }
                if matches!(parent, Some("channel") | Some("item")) {
                    text.clear();
                }
                path.push(tag);
            }
            XmlEvent::Characters(chunk) | XmlEvent::Whitespace(chunk) => text.push_str(&chunk),
            XmlEvent::CData(chunk) => text.push_str(&chunk),
            XmlEvent::EndElement { .. } => {
                let tag = path.pop().unwrap_or_default();
                let parent = path.last().map(String::as_str);
                match (parent, tag.as_str()) {
                    (Some("item"), field) => {
                        if let Some(item) = item.as_mut() {
                            item.set(field, &text);
                        }
                    }
                    (Some("channel"), "item") => {
                        if let (Some(feed), Some(item)) = (feed.as_mut(), item.take()) {
                            feed.items.push(item);
                        }
                    }
                    (Some("channel"), field) => {
                        if let Some(feed) = feed.as_mut() {
                            feed.set(field, &text);
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }

    feed.ok_or(ParseError::MissingChannel)
}
