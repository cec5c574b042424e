//! Sitemap XML serialization.
//!
//! Output is indented by four spaces, has no blank text nodes, and is
//! byte-for-byte stable for a given entry sequence.

use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::{
    entry::SitemapEntry,
    sitemap::{Result, SitemapError},
};

pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const SCHEMA_LOCATION: &str = "http://www.sitemaps.org/schemas/sitemap/0.9 http://www.sitemaps.org/schemas/sitemap/0.9/sitemap.xsd";

/// `lastmod` rendering: seconds precision with a `+hh:mm` offset.
pub const LASTMOD_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

const INDENT: usize = 4;

/// Render `entries` as a complete sitemap document.
pub fn to_xml(entries: &[SitemapEntry]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT);

    emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut urlset = BytesStart::new("urlset");
    urlset.push_attribute(("xmlns", SITEMAP_NS));
    urlset.push_attribute(("xmlns:xsi", XSI_NS));
    urlset.push_attribute(("xsi:schemaLocation", SCHEMA_LOCATION));
    emit(&mut writer, Event::Start(urlset))?;

    for entry in entries {
        write_url(&mut writer, entry)?;
    }

    emit(&mut writer, Event::End(BytesEnd::new("urlset")))?;
    finish(writer)
}

fn finish(writer: Writer<Vec<u8>>) -> Result<String> {
    let mut xml =
        String::from_utf8(writer.into_inner()).map_err(|e| SitemapError::Xml(e.to_string()))?;
    xml.push('\n');
    Ok(xml)
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| SitemapError::Xml(e.to_string()))
}

fn write_url(writer: &mut Writer<Vec<u8>>, entry: &SitemapEntry) -> Result<()> {
    emit(writer, Event::Start(BytesStart::new("url")))?;

    write_text(writer, "loc", &entry.loc)?;
    if let Some(lastmod) = &entry.lastmod {
        write_text(writer, "lastmod", &lastmod.format(LASTMOD_FORMAT).to_string())?;
    }
    if let Some(changefreq) = &entry.changefreq {
        write_text(writer, "changefreq", changefreq.as_str())?;
    }
    if let Some(priority) = &entry.priority {
        write_text(writer, "priority", &priority.to_string())?;
    }

    emit(writer, Event::End(BytesEnd::new("url")))
}

fn write_text(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    emit(writer, Event::Start(BytesStart::new(name)))?;
    emit(writer, Event::Text(BytesText::new(text)))?;
    emit(writer, Event::End(BytesEnd::new(name)))
}
