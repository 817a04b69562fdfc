//! RDF/XML rendering of language resources.
//!
//! The property block for a language is rendered by [`language_properties`]
//! as a pure function over an immutable [`LanguageContext`] and a
//! [`SourceCatalog`] collaborator. [`language_document`] wraps the block in
//! the document envelope (namespace declarations and subject element).

use anyhow::Result;

use crate::model::{LanguageContext, SourceRef};

/// Vocabulary IRIs used in language descriptions.
pub mod vocab {
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    pub const SKOS: &str = "http://www.w3.org/2004/02/skos/core#";
    pub const DCTERMS: &str = "http://purl.org/dc/terms/";
    pub const GEO: &str = "http://www.w3.org/2003/01/geo/wgs84_pos#";
    pub const LEXVO: &str = "http://lexvo.org/ontology#";
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

    /// Class asserted for every language.
    pub const LINGUISTIC_SYSTEM: &str = "http://purl.org/dc/terms/LinguisticSystem";
    /// Datatype of the ISO 639-3 code literal.
    pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
}

/// Identifier category whose entries are rendered as alternate labels.
const NAME_IDENTIFIER: &str = "name";

/// Read-only collaborator giving the renderer access to the sources
/// referencing a language, without tying it to a live database handle.
pub trait SourceCatalog {
    /// Sources linked to the given language key through the language/source
    /// association. Row order is whatever the backing store returns.
    fn sources_referencing(&self, language_pk: i64) -> Result<Vec<SourceRef>>;

    /// Resolved resource URL for a source.
    fn resolve_url(&self, source: &SourceRef) -> String;
}

/// Escape text for use in XML content or attribute values.
pub fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Resource URL for a language under the given base URL.
pub fn language_url(base_url: &str, id: &str) -> String {
    format!("{}/languages/{}", base_url.trim_end_matches('/'), id)
}

/// Resource URL for a source under the given base URL.
pub fn source_url(base_url: &str, id: &str) -> String {
    format!("{}/sources/{}", base_url.trim_end_matches('/'), id)
}

/// Render the property block for one language.
///
/// Elements are emitted in a fixed order: geo coordinates, the type
/// assertion, alternate labels, referencing sources, the ISO 639-3 code.
/// Every step except the type assertion emits nothing when its data is
/// absent; a catalog failure propagates to the caller.
pub fn language_properties(
    ctx: &LanguageContext,
    catalog: &dyn SourceCatalog,
) -> Result<String> {
    let mut elements: Vec<String> = Vec::new();
    elements.extend(geo_coordinates(ctx));
    elements.push(type_assertion());
    elements.extend(alternate_labels(ctx));
    elements.extend(referenced_by(ctx, catalog)?);
    elements.extend(iso_code_literal(ctx));
    Ok(elements.join("\n"))
}

/// Longitude and latitude, both or neither, longitude first. Zero is a
/// valid coordinate and must not be treated as absent.
fn geo_coordinates(ctx: &LanguageContext) -> Vec<String> {
    match (ctx.longitude, ctx.latitude) {
        (Some(long), Some(lat)) => vec![
            format!("<geo:long>{}</geo:long>", long),
            format!("<geo:lat>{}</geo:lat>", lat),
        ],
        _ => Vec::new(),
    }
}

fn type_assertion() -> String {
    format!(r#"<rdf:type rdf:resource="{}"/>"#, vocab::LINGUISTIC_SYSTEM)
}

/// One `skos:altLabel` per "name" identifier whose value differs from the
/// language's own name, in input order, without deduplication. The
/// `xml:lang` attribute is attached only when the tag is non-empty and at
/// most three characters long.
fn alternate_labels(ctx: &LanguageContext) -> Vec<String> {
    ctx.identifiers
        .iter()
        .filter(|i| i.kind == NAME_IDENTIFIER && i.name != ctx.name)
        .map(|i| {
            let lang_attr = match i.lang.as_deref() {
                Some(lang) if !lang.is_empty() && lang.len() <= 3 => {
                    format!(r#" xml:lang="{}""#, xml_escape(lang))
                }
                _ => String::new(),
            };
            format!(
                "<skos:altLabel{}>{}</skos:altLabel>",
                lang_attr,
                xml_escape(&i.name)
            )
        })
        .collect()
}

/// One `dcterms:isReferencedBy` per source row joined to the language, in
/// the order the catalog returns them.
fn referenced_by(ctx: &LanguageContext, catalog: &dyn SourceCatalog) -> Result<Vec<String>> {
    let sources = catalog.sources_referencing(ctx.pk)?;
    Ok(sources
        .iter()
        .map(|source| {
            format!(
                r#"<dcterms:isReferencedBy rdf:resource="{}"/>"#,
                xml_escape(&catalog.resolve_url(source))
            )
        })
        .collect())
}

/// ISO 639-3 code as a string-typed literal, when present and non-empty.
fn iso_code_literal(ctx: &LanguageContext) -> Option<String> {
    ctx.iso_code
        .as_deref()
        .filter(|code| !code.is_empty())
        .map(|code| {
            format!(
                r#"<lexvo:iso639P3PCode rdf:datatype="{}">{}</lexvo:iso639P3PCode>"#,
                vocab::XSD_STRING,
                xml_escape(code)
            )
        })
}

/// Assemble the full RDF/XML document for one language: XML declaration,
/// `rdf:RDF` envelope with namespace declarations, one `rdf:Description`
/// carrying the language's label and its property block.
pub fn language_document(
    ctx: &LanguageContext,
    catalog: &dyn SourceCatalog,
    base_url: &str,
) -> Result<String> {
    let properties = language_properties(ctx, catalog)?;

    let mut doc = String::with_capacity(1024);
    doc.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    doc.push_str("<rdf:RDF\n");
    doc.push_str(&format!("    xmlns:rdf=\"{}\"\n", vocab::RDF));
    doc.push_str(&format!("    xmlns:rdfs=\"{}\"\n", vocab::RDFS));
    doc.push_str(&format!("    xmlns:skos=\"{}\"\n", vocab::SKOS));
    doc.push_str(&format!("    xmlns:dcterms=\"{}\"\n", vocab::DCTERMS));
    doc.push_str(&format!("    xmlns:geo=\"{}\"\n", vocab::GEO));
    doc.push_str(&format!("    xmlns:lexvo=\"{}\"\n", vocab::LEXVO));
    doc.push_str(&format!("    xmlns:xsd=\"{}\">\n", vocab::XSD));
    doc.push_str(&format!(
        "  <rdf:Description rdf:about=\"{}\">\n",
        xml_escape(&language_url(base_url, &ctx.id))
    ));
    doc.push_str(&format!(
        "    <rdfs:label>{}</rdfs:label>\n",
        xml_escape(&ctx.name)
    ));
    for line in properties.lines() {
        doc.push_str("    ");
        doc.push_str(line);
        doc.push('\n');
    }
    doc.push_str("  </rdf:Description>\n");
    doc.push_str("</rdf:RDF>\n");
    Ok(doc)
}
