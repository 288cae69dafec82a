//! Authorship ordering.
//!
//! Authorships link a publication or study to an author with an ordinal
//! rank. Ranked authorships are ordered by rank; authorships without a
//! usable rank are left out of the ordering but their authors still count
//! as known authors of the entity.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::HarvestError;
use crate::keytable::{KeyTable, UpdateStrategy};
use crate::vocab;

/// Name parts of an author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorName {
    pub first: Option<String>,
    pub middle: Option<String>,
    pub last: Option<String>,
}

impl fmt::Display for AuthorName {
    /// "Last, First Middle", skipping missing parts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let given: Vec<&str> = [&self.first, &self.middle]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .collect();
        match (&self.last, given.is_empty()) {
            (Some(last), true) => f.write_str(last),
            (Some(last), false) => write!(f, "{last}, {}", given.join(" ")),
            (None, _) => f.write_str(&given.join(" ")),
        }
    }
}

/// One dereferenced authorship relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorshipRecord {
    pub authorship_uri: String,
    pub author_uri: String,
    pub rank: Option<u32>,
    pub name: AuthorName,
}

/// Two or more authorships of one entity declaring the same rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankCollision {
    pub rank: u32,
    /// Colliding authorship URIs, in input order.
    pub authorship_uris: Vec<String>,
}

impl RankCollision {
    pub fn to_error(&self, entity: &str) -> HarvestError {
        HarvestError::AmbiguousRank {
            entity: entity.to_string(),
            rank: self.rank,
            authorships: self.authorship_uris.clone(),
        }
    }
}

/// Authors of one entity: ranked order, all known authors, and any rank
/// collisions that need manual review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAuthors {
    pub ranked: Vec<AuthorshipRecord>,
    pub known_authors: BTreeSet<String>,
    pub collisions: Vec<RankCollision>,
}

impl ResolvedAuthors {
    /// Author URIs in rank order.
    pub fn author_uris(&self) -> Vec<&str> {
        self.ranked.iter().map(|a| a.author_uri.as_str()).collect()
    }

    pub fn is_known(&self, author_uri: &str) -> bool {
        self.known_authors.contains(author_uri)
    }

    /// The rank to give an author appended after all ranked authors.
    ///
    /// `None` when the highest stored rank is already `u32::MAX`.
    pub fn next_rank(&self) -> Option<u32> {
        match self.ranked.iter().filter_map(|a| a.rank).max() {
            Some(r) => r.checked_add(1),
            None => Some(1),
        }
    }
}

/// Order authorships by ascending rank.
///
/// The sort is stable, so colliding ranks keep their input order; every
/// collision is reported in [`ResolvedAuthors::collisions`].
pub fn order_authorships(records: Vec<AuthorshipRecord>) -> ResolvedAuthors {
    let known_authors = records.iter().map(|r| r.author_uri.clone()).collect();

    let mut ranked: Vec<AuthorshipRecord> =
        records.into_iter().filter(|r| r.rank.is_some()).collect();
    ranked.sort_by_key(|r| r.rank);

    let mut by_rank: BTreeMap<u32, Vec<String>> = BTreeMap::new();
    for r in &ranked {
        if let Some(rank) = r.rank {
            by_rank.entry(rank).or_default().push(r.authorship_uri.clone());
        }
    }
    let collisions = by_rank
        .into_iter()
        .filter(|(_, uris)| uris.len() > 1)
        .map(|(rank, authorship_uris)| RankCollision {
            rank,
            authorship_uris,
        })
        .collect();

    ResolvedAuthors {
        ranked,
        known_authors,
        collisions,
    }
}

/// Parse a declared rank; only positive integers are usable.
pub fn parse_rank(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|r| *r > 0)
}

/// Key table reading an authorship entity.
pub fn authorship_table() -> KeyTable {
    KeyTable::new()
        .with("author_uri", vocab::LINKED_AUTHOR, UpdateStrategy::SingleReference)
        .with("author_rank", vocab::AUTHOR_RANK, UpdateStrategy::SingleLiteral)
        .with("resource_uri", vocab::LINKED_RESOURCE, UpdateStrategy::SingleReference)
}

/// Key table reading an author's name parts.
pub fn author_name_table() -> KeyTable {
    KeyTable::new()
        .with("first", vocab::FIRST_NAME, UpdateStrategy::SingleLiteral)
        .with("middle", vocab::MIDDLE_NAME, UpdateStrategy::SingleLiteral)
        .with("last", vocab::LAST_NAME, UpdateStrategy::SingleLiteral)
}
