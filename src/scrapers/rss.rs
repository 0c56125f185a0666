//! Feed-based link discovery for RSS 2.0 and Atom feeds.
//!
//! RSS items carry the URL as `<item><link>text</link></item>`; Atom
//! entries use `<entry><link href="..."/></entry>`. Links outside an
//! item/entry (the channel's own link) are ignored.

use super::{LinkDiscovery, finalize_links, max_links};
use crate::config::Params;
use crate::error::StrategyError;
use crate::models::Page;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, warn};
use url::Url;

#[derive(Debug)]
pub struct RssLinkDiscovery {
    max_links: usize,
}

impl RssLinkDiscovery {
    pub fn from_params(params: &Params) -> Result<Box<dyn LinkDiscovery>, StrategyError> {
        Ok(Box::new(Self {
            max_links: max_links(params, "rss")?,
        }))
    }
}

fn href_attr(element: &BytesStart<'_>) -> Option<String> {
    let attr = element.try_get_attribute("href").ok().flatten()?;
    Some(String::from_utf8_lossy(&attr.value).replace("&amp;", "&"))
}

fn entity(name: &str) -> &'static str {
    match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        _ => "",
    }
}

/// Raw link values of every item/entry in a feed, in document order.
pub fn feed_links(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut links = Vec::new();
    let mut in_item = false;
    let mut in_link = false;
    let mut current = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"item" | b"entry" => in_item = true,
                b"link" if in_item => match href_attr(&e) {
                    Some(href) => links.push(href),
                    None => {
                        in_link = true;
                        current.clear();
                    }
                },
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                if in_item && e.local_name().as_ref() == b"link" {
                    if let Some(href) = href_attr(&e) {
                        links.push(href);
                    }
                }
            }
            Ok(Event::Text(t)) if in_link => current.push_str(&String::from_utf8_lossy(&t)),
            Ok(Event::CData(t)) if in_link => current.push_str(&String::from_utf8_lossy(&t)),
            Ok(Event::GeneralRef(r)) if in_link => {
                current.push_str(entity(&String::from_utf8_lossy(&r)));
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"link" if in_link => {
                    in_link = false;
                    if !current.trim().is_empty() {
                        links.push(current.trim().to_string());
                    }
                }
                b"item" | b"entry" => in_item = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                warn!(position = reader.buffer_position(), error = %e, "Malformed feed; keeping links read so far");
                break;
            }
            _ => {}
        }
    }
    links
}

impl LinkDiscovery for RssLinkDiscovery {
    fn discover_links(&self, page: &Page) -> Vec<String> {
        let base = Url::parse(&page.identifier).ok();
        let links = finalize_links(base.as_ref(), feed_links(&page.body), None, self.max_links);
        debug!(feed = %page.identifier, count = links.len(), "Discovered feed links");
        links
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rss_items() {
        let xml = r#"<?xml version="1.0"?>
        <rss version="2.0"><channel>
          <title>Actualités</title>
          <link>https://www.example.fr/</link>
          <item><title>Un</title><link>https://www.example.fr/article/1?a=1&amp;b=2</link></item>
          <item><title>Deux</title><link><![CDATA[https://www.example.fr/article/2]]></link></item>
          <item><title>Un encore</title><link>https://www.example.fr/article/1?a=1&amp;b=2</link></item>
        </channel></rss>"#;

        let links = RssLinkDiscovery::from_params(&Params::new())
            .unwrap()
            .discover_links(&Page::new("https://www.example.fr/rss.xml", xml));

        assert_eq!(
            links,
            vec![
                "https://www.example.fr/article/1?a=1&b=2",
                "https://www.example.fr/article/2",
            ]
        );
    }

    #[test]
    fn test_atom_entries() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom">
          <link href="https://blog.example.fr/"/>
          <entry><title>A</title><link href="/billets/a"/></entry>
          <entry><title>B</title><link rel="alternate" href="https://blog.example.fr/billets/b"></link></entry>
        </feed>"#;

        let links = RssLinkDiscovery::from_params(&Params::new())
            .unwrap()
            .discover_links(&Page::new("https://blog.example.fr/atom.xml", xml));

        assert_eq!(
            links,
            vec![
                "https://blog.example.fr/billets/a",
                "https://blog.example.fr/billets/b",
            ]
        );
    }

    #[test]
    fn test_malformed_feed_keeps_earlier_links() {
        let xml = "<rss><channel><item><link>https://x.example/1</link></item><item><link>oops</item>";
        let links = feed_links(xml);
        assert_eq!(links.first().map(String::as_str), Some("https://x.example/1"));
    }
}
