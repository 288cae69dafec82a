//! Namespace prefixes and the predicates/types the harvester asserts.
//!
//! Key tables and type tags may be written in prefixed form
//! (`vivo:hasSubjectArea`); everything that leaves this crate carries the
//! expanded URI.

/// Known namespace prefixes, in the order they are declared in output documents.
pub const PREFIXES: [(&str, &str); 10] = [
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("skos", "http://www.w3.org/2004/02/skos/core#"),
    ("foaf", "http://xmlns.com/foaf/0.1/"),
    ("vivo", "http://vivoweb.org/ontology/core#"),
    ("ufVivo", "http://vivo.ufl.edu/ontology/vivo-ufl/"),
    ("ero", "http://purl.obolibrary.org/obo/"),
    ("bibo", "http://purl.org/ontology/bibo/"),
];

// ── Predicates ───────────────────────────────────────────────────

pub const RDF_TYPE: &str = "rdf:type";
pub const RDFS_LABEL: &str = "rdfs:label";
pub const DATE_HARVESTED: &str = "ufVivo:dateHarvested";
pub const HARVESTED_BY: &str = "ufVivo:harvestedBy";
pub const IRB_NUMBER: &str = "ufVivo:irbnumber";
pub const UFID: &str = "ufVivo:ufid";
pub const DESCRIPTION: &str = "vivo:description";
pub const HAS_SUBJECT_AREA: &str = "vivo:hasSubjectArea";
pub const IN_AUTHORSHIP: &str = "vivo:informationResourceInAuthorship";
pub const AUTHOR_IN_AUTHORSHIP: &str = "vivo:authorInAuthorship";
pub const LINKED_AUTHOR: &str = "vivo:linkedAuthor";
pub const LINKED_RESOURCE: &str = "vivo:linkedInformationResource";
pub const AUTHOR_RANK: &str = "vivo:authorRank";
pub const CORRESPONDING_AUTHOR: &str = "vivo:isCorrespondingAuthor";
pub const FIRST_NAME: &str = "foaf:firstName";
pub const MIDDLE_NAME: &str = "vivo:middleName";
pub const LAST_NAME: &str = "foaf:lastName";

// ── Types ────────────────────────────────────────────────────────

pub const THING: &str = "owl:Thing";
pub const CONCEPT: &str = "skos:Concept";
pub const AUTHORSHIP: &str = "vivo:Authorship";
pub const HUMAN_STUDY: &str = "ero:ERO_0000015";

/// Expand a prefixed name into a full URI.
///
/// Values that are already URIs, or whose prefix is unknown, are returned
/// unchanged.
pub fn expand(tagged: &str) -> String {
    if let Some((prefix, local)) = tagged.split_once(':') {
        if !local.starts_with("//") {
            if let Some((_, ns)) = PREFIXES.iter().find(|(p, _)| *p == prefix) {
                return format!("{ns}{local}");
            }
        }
    }
    tagged.to_string()
}

/// Split a full URI into a known `(prefix, local_name)` pair, if possible.
pub fn compact(uri: &str) -> Option<(&'static str, &str)> {
    PREFIXES.iter().find_map(|(prefix, ns)| {
        uri.strip_prefix(ns)
            .filter(|local| !local.is_empty() && is_local_name(local))
            .map(|local| (*prefix, local))
    })
}

/// Split a URI at its last `#` or `/` into namespace and local name.
pub fn split_namespace(uri: &str) -> Option<(&str, &str)> {
    let idx = uri.rfind(['#', '/'])?;
    let (ns, local) = uri.split_at(idx + 1);
    (is_local_name(local) && !local.is_empty()).then_some((ns, local))
}

fn is_local_name(local: &str) -> bool {
    let mut chars = local.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
