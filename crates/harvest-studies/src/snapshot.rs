//! Graph snapshots: current study state and its resolved authorships.

use harvest_core::authorship::{
    author_name_table, authorship_table, order_authorships, parse_rank, AuthorName,
    AuthorshipRecord, ResolvedAuthors,
};
use harvest_core::snapshot::fold_triples;
use harvest_core::{EntityRecord, KeyTable};
use harvest_graph::{GraphError, GraphStore};

/// Fetch an entity and fold it through `table`.
pub async fn fetch_entity<S: GraphStore>(
    store: &S,
    uri: &str,
    table: &KeyTable,
) -> Result<EntityRecord, GraphError> {
    let triples = store.fetch_triples(uri).await?;
    tracing::debug!(uri, triples = triples.len(), "Fetched entity snapshot");
    Ok(fold_triples(uri, &triples, table))
}

/// Dereference authorships into ranked author records.
///
/// Authorships without a linked author are dropped. Authorships whose rank
/// is missing or unusable still contribute their author to the known set.
pub async fn resolve_authorships<S: GraphStore>(
    store: &S,
    authorship_uris: &[&str],
) -> Result<ResolvedAuthors, GraphError> {
    let authorship_table = authorship_table();
    let name_table = author_name_table();
    let mut records = Vec::with_capacity(authorship_uris.len());

    for &uri in authorship_uris {
        let authorship = fetch_entity(store, uri, &authorship_table).await?;
        let Some(author_uri) = authorship.single("author_uri") else {
            tracing::debug!(authorship = uri, "Authorship has no linked author");
            continue;
        };

        let raw_rank = authorship.single("author_rank");
        let rank = raw_rank.and_then(parse_rank);
        if let (Some(raw), None) = (raw_rank, rank) {
            tracing::warn!(authorship = uri, rank = raw, "Unusable author rank");
        }

        let author = fetch_entity(store, author_uri, &name_table).await?;
        records.push(AuthorshipRecord {
            authorship_uri: uri.to_string(),
            author_uri: author_uri.to_string(),
            rank,
            name: AuthorName {
                first: author.single("first").map(String::from),
                middle: author.single("middle").map(String::from),
                last: author.single("last").map(String::from),
            },
        });
    }

    Ok(order_authorships(records))
}
