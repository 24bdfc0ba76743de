//! eggNOG-mapper annotation rows and category token extraction.

use serde::{Deserialize, Serialize};

/// Column names of an eggNOG-mapper v2 `.emapper.annotations` table, in order.
pub const EMAPPER_COLUMNS: [&str; 21] = [
    "query",
    "seed_ortholog",
    "evalue",
    "score",
    "eggNOG_OGs",
    "max_annot_lvl",
    "COG_category",
    "Description",
    "Preferred_name",
    "GOs",
    "EC",
    "KEGG_ko",
    "KEGG_Pathway",
    "KEGG_Module",
    "KEGG_Reaction",
    "KEGG_rclass",
    "BRITE",
    "KEGG_TC",
    "CAZy",
    "BiGG_Reaction",
    "PFAMs",
];

/// Number of fields every data row must carry.
pub const EMAPPER_FIELDS: usize = EMAPPER_COLUMNS.len();

/// Separator between the ortholog group and its taxonomic scope.
pub const OG_DELIMITER: char = '@';

/// One annotated gene. Fields are kept as text; the table uses `-` for
/// missing values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub query: String,
    pub seed_ortholog: String,
    pub evalue: String,
    pub score: String,
    #[serde(rename = "eggNOG_OGs")]
    pub eggnog_ogs: String,
    pub max_annot_lvl: String,
    #[serde(rename = "COG_category")]
    pub cog_category: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Preferred_name")]
    pub preferred_name: String,
    #[serde(rename = "GOs")]
    pub gos: String,
    #[serde(rename = "EC")]
    pub ec: String,
    #[serde(rename = "KEGG_ko")]
    pub kegg_ko: String,
    #[serde(rename = "KEGG_Pathway")]
    pub kegg_pathway: String,
    #[serde(rename = "KEGG_Module")]
    pub kegg_module: String,
    #[serde(rename = "KEGG_Reaction")]
    pub kegg_reaction: String,
    #[serde(rename = "KEGG_rclass")]
    pub kegg_rclass: String,
    #[serde(rename = "BRITE")]
    pub brite: String,
    #[serde(rename = "KEGG_TC")]
    pub kegg_tc: String,
    #[serde(rename = "CAZy")]
    pub cazy: String,
    #[serde(rename = "BiGG_Reaction")]
    pub bigg_reaction: String,
    #[serde(rename = "PFAMs")]
    pub pfams: String,
}

impl AnnotationRecord {
    /// The ortholog-group token this gene is counted under.
    pub fn category_token(&self) -> &str {
        category_token(&self.eggnog_ogs)
    }
}

/// Keep the segment of an `eggNOG_OGs` value before the first `@`.
///
/// `"COG0001@bactNOG"` becomes `"COG0001"`; a value without `@` is returned
/// whole, and an empty value stays empty.
pub fn category_token(field: &str) -> &str {
    match field.split_once(OG_DELIMITER) {
        Some((head, _)) => head,
        None => field,
    }
}
