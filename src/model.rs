use serde::{Deserialize, Serialize};

/// An external identifier attached to a language, e.g. an alternate name
/// or a code in another cataloguing system ("iso639-3", "glottolog").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    /// Category tag, e.g. "name".
    #[serde(rename = "type")]
    pub kind: String,
    /// The identifier's string value.
    pub name: String,
    /// Language tag of the value, if any.
    #[serde(default)]
    pub lang: Option<String>,
}

/// Read-only snapshot of one language row plus its identifiers, as consumed
/// by the RDF renderer. `pk` is the database key used for the source join;
/// `id` is the stable URL part.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageContext {
    #[serde(skip)]
    pub pk: i64,
    pub id: String,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub iso_code: Option<String>,
    pub identifiers: Vec<Identifier>,
}

/// A bibliographic source row, reduced to what resource views and the
/// renderer's URL resolution need.
#[derive(Debug, Clone, Serialize)]
pub struct SourceRef {
    #[serde(skip)]
    pub pk: i64,
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// One row of the language index view.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageSummary {
    pub id: String,
    pub name: String,
}

/// A language entry in an import dataset file.
#[derive(Debug, Clone, Deserialize)]
pub struct LanguageRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub iso_code: Option<String>,
    #[serde(default)]
    pub identifiers: Vec<Identifier>,
    #[serde(default)]
    pub sources: Vec<SourceRecord>,
}

/// A source entry in an import dataset file.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}
