//! The harvest run: prepare → resolve identity → link → reconcile, for
//! every input study in order.
//!
//! Record-level problems (missing IRB number, duplicate records) become
//! per-record outcomes and the run continues. Soft conditions (rank
//! collisions, unresolved investigators) are flagged on a succeeded outcome.
//! Graph and configuration errors abort the run.

use std::collections::HashSet;

use harvest_core::authorship::ResolvedAuthors;
use harvest_core::concept::ConceptCache;
use harvest_core::factory::{EntityFactory, NamespaceMinter, Provenance, ProvenanceStamp};
use harvest_core::{
    reconcile, vocab, EntityRecord, HarvestError, KeyTable, Statement, TripleDelta,
};
use harvest_graph::GraphStore;
use harvest_ledger::RecordOutcome;

use crate::config::StudiesConfig;
use crate::error::Result;
use crate::snapshot::{fetch_entity, resolve_authorships};
use crate::source::RawStudy;
use crate::study::{self, PreparedStudy, AUTHORSHIP_URIS, CONCEPT_URIS};

/// Everything a run produced.
#[derive(Debug, Default)]
pub struct HarvestReport {
    /// Run-wide delta: each study's statements in input order.
    pub delta: TripleDelta,
    pub outcomes: Vec<RecordOutcome>,
    pub concepts_created: usize,
}

/// The result of processing one study.
struct StudyChange {
    uri: String,
    created: bool,
    delta: TripleDelta,
    flags: Vec<String>,
    concepts_created: usize,
}

/// Runs studies through reconciliation against a graph store.
pub struct Harvester<'a, S> {
    store: &'a S,
    config: &'a StudiesConfig,
    table: KeyTable,
    cache: ConceptCache,
    factory: EntityFactory<NamespaceMinter>,
    /// Stamp re-asserted on every study when provenance is refreshed.
    run_stamp: Option<ProvenanceStamp>,
    /// Stamping for newly created studies, concepts and authorships.
    provenance: Provenance,
}

impl<'a, S: GraphStore> Harvester<'a, S> {
    pub fn new(store: &'a S, config: &'a StudiesConfig) -> Self {
        let provenance = if config.stamp_new_entities {
            Provenance::Stamp
        } else {
            Provenance::Skip
        };
        let run_stamp = config
            .refresh_provenance
            .then(|| ProvenanceStamp::now(&config.harvested_by));

        Self {
            store,
            config,
            table: study::study_key_table(config.refresh_provenance),
            cache: ConceptCache::new(&config.concept_placeholders).with_provenance(provenance),
            factory: EntityFactory::new(
                NamespaceMinter::new(config.namespace.as_str()),
                config.harvested_by.as_str(),
            ),
            run_stamp,
            provenance,
        }
    }

    /// Bulk-load every labelled concept from the graph into the cache.
    /// Call once, before [`Harvester::harvest`].
    pub async fn load_concepts(&mut self) -> Result<usize> {
        let concepts = self
            .store
            .labelled_instances(&vocab::expand(vocab::CONCEPT))
            .await?;
        let loaded = self.cache.load(concepts);
        tracing::info!(loaded, "Concept cache loaded");
        Ok(loaded)
    }

    /// Process every study in order.
    pub async fn harvest(&mut self, studies: &[RawStudy]) -> Result<HarvestReport> {
        let mut report = HarvestReport::default();
        let mut seen: HashSet<String> = HashSet::new();

        for (i, raw) in studies.iter().enumerate() {
            let position = i + 1;
            let prepared = match study::prepare_study(
                raw,
                position,
                &self.config.keyword_fields,
                self.run_stamp.as_ref(),
            ) {
                Ok(prepared) => prepared,
                Err(e) => {
                    tracing::error!(position, error = %e, "Study failed");
                    report
                        .outcomes
                        .push(RecordOutcome::failed(&format!("#{position}"), &e.to_string()));
                    continue;
                }
            };

            let key = prepared.irb_number.clone();
            if !seen.insert(key.clone()) {
                tracing::warn!(irb_number = %key, position, "Duplicate IRB number, skipping");
                report
                    .outcomes
                    .push(RecordOutcome::skipped(&key, "duplicate IRB number in input"));
                continue;
            }

            match self.process(prepared).await {
                Ok(change) => {
                    report.outcomes.push(
                        RecordOutcome::succeeded(
                            &key,
                            &change.uri,
                            change.created,
                            change.delta.additions.len(),
                            change.delta.retractions.len(),
                        )
                        .with_flags(change.flags),
                    );
                    report.concepts_created += change.concepts_created;
                    report.delta.extend(change.delta);
                }
                Err(e) if e.is_record_level() => {
                    tracing::error!(irb_number = %key, error = %e, "Study failed");
                    report
                        .outcomes
                        .push(RecordOutcome::failed(&key, &e.to_string()));
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            records = studies.len(),
            additions = report.delta.additions.len(),
            retractions = report.delta.retractions.len(),
            concepts_created = report.concepts_created,
            "Harvest complete"
        );
        Ok(report)
    }

    async fn process(&mut self, prepared: PreparedStudy) -> Result<StudyChange> {
        let PreparedStudy {
            irb_number,
            mut target,
            explicit_uri,
            ufid,
            keywords,
        } = prepared;
        let mut delta = TripleDelta::new();
        let mut flags = Vec::new();

        // Keywords → concept URIs.
        let mut concepts_created = 0;
        let mut concept_uris: Vec<String> = Vec::new();
        for keyword in &keywords {
            if self.cache.normalize(keyword).is_none() {
                tracing::debug!(irb_number = %irb_number, keyword = %keyword, "Placeholder keyword skipped");
                continue;
            }
            let lookup = self.cache.lookup_or_create(keyword, &mut self.factory)?;
            if lookup.created {
                concepts_created += 1;
                delta.add_all(lookup.additions);
            }
            if !concept_uris.contains(&lookup.uri) {
                concept_uris.push(lookup.uri);
            }
        }
        target.set_many(CONCEPT_URIS, concept_uris);

        // Existing study, or a new identity.
        let irb_predicate = vocab::expand(vocab::IRB_NUMBER);
        let mut existing = self
            .store
            .find_uri_by_property(&irb_predicate, &irb_number)
            .await?;
        if let Some(explicit) = explicit_uri.as_deref() {
            if let Some(found) = existing.as_deref() {
                if found != explicit {
                    tracing::warn!(
                        irb_number = %irb_number,
                        uri = found,
                        explicit,
                        "IRB number already on another study, explicit URI ignored"
                    );
                    flags.push(format!(
                        "explicit uri {explicit} ignored: IRB number {irb_number} is on {found}"
                    ));
                }
            } else if !self.store.fetch_triples(explicit).await?.is_empty() {
                existing = Some(explicit.to_string());
            }
        }
        let (uri, current, authors, created) = match existing {
            Some(uri) => {
                tracing::info!(irb_number = %irb_number, uri = %uri, "Updating study");
                let current = fetch_entity(self.store, &uri, &self.table).await?;
                let authors =
                    resolve_authorships(self.store, &current.values(AUTHORSHIP_URIS)).await?;
                (uri, current, authors, false)
            }
            None => {
                // A refreshed stamp arrives through the key table instead.
                let provenance = if self.run_stamp.is_some() {
                    Provenance::Skip
                } else {
                    self.provenance
                };
                let entity =
                    self.factory
                        .create(study::STUDY_TYPE, explicit_uri.as_deref(), provenance);
                tracing::info!(irb_number = %irb_number, uri = %entity.uri, "Adding study");
                delta.add_all(entity.additions);
                let current = EntityRecord::new(entity.uri.as_str());
                (entity.uri, current, ResolvedAuthors::default(), true)
            }
        };

        for collision in &authors.collisions {
            let err = collision.to_error(&uri);
            tracing::warn!(irb_number = %irb_number, error = %err, "Authorship rank collision");
            flags.push(err.to_string());
        }

        // Authorships: keep every existing one, add the investigator's.
        let mut authorship_uris: Vec<String> = current
            .values(AUTHORSHIP_URIS)
            .into_iter()
            .map(String::from)
            .collect();
        if let (true, Some(ufid)) = (self.config.link_investigators, ufid.as_deref()) {
            match self.link_investigator(&uri, ufid, &authors).await {
                Ok(Some((authorship_uri, additions))) => {
                    delta.add_all(additions);
                    authorship_uris.push(authorship_uri);
                }
                Ok(None) => {}
                Err(e) if e.is_record_level() => {
                    tracing::warn!(irb_number = %irb_number, error = %e, "Investigator not linked");
                    flags.push(e.to_string());
                }
                Err(e) => return Err(e),
            }
        }
        target.set_many(AUTHORSHIP_URIS, authorship_uris);

        delta.extend(reconcile(&current, &target, &self.table)?);

        tracing::debug!(
            irb_number = %irb_number,
            uri = %uri,
            additions = delta.additions.len(),
            retractions = delta.retractions.len(),
            "Study reconciled"
        );

        Ok(StudyChange {
            uri,
            created,
            delta,
            flags,
            concepts_created,
        })
    }

    /// Mint an authorship linking the investigator to the study, unless the
    /// investigator already is one of its authors.
    async fn link_investigator(
        &mut self,
        study_uri: &str,
        ufid: &str,
        authors: &ResolvedAuthors,
    ) -> Result<Option<(String, Vec<Statement>)>> {
        let ufid_predicate = vocab::expand(vocab::UFID);
        let Some(author_uri) = self.store.find_uri_by_property(&ufid_predicate, ufid).await?
        else {
            return Err(HarvestError::UnresolvedReference {
                kind: "investigator".to_string(),
                key: ufid.to_string(),
            }
            .into());
        };

        if authors.is_known(&author_uri) {
            tracing::debug!(study = study_uri, author = %author_uri, "Investigator already an author");
            return Ok(None);
        }

        let Some(rank) = authors.next_rank() else {
            return Err(HarvestError::RankExhausted {
                entity: study_uri.to_string(),
                rank: u32::MAX,
            }
            .into());
        };
        let entity = self.factory.create(vocab::AUTHORSHIP, None, self.provenance);
        let mut additions = entity.additions;
        additions.extend([
            Statement::resource(&entity.uri, &vocab::expand(vocab::LINKED_AUTHOR), &author_uri),
            Statement::resource(&entity.uri, &vocab::expand(vocab::LINKED_RESOURCE), study_uri),
            Statement::literal(&entity.uri, &vocab::expand(vocab::AUTHOR_RANK), &rank.to_string()),
            Statement::literal(&entity.uri, &vocab::expand(vocab::CORRESPONDING_AUTHOR), "false"),
            Statement::resource(
                &author_uri,
                &vocab::expand(vocab::AUTHOR_IN_AUTHORSHIP),
                &entity.uri,
            ),
        ]);

        tracing::info!(
            study = study_uri,
            author = %author_uri,
            authorship = %entity.uri,
            rank,
            "Linked investigator"
        );
        Ok(Some((entity.uri, additions)))
    }
}
