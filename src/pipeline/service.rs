//! Extraction orchestrator.
//!
//! One run per video reference walks the stage sequence:
//! metadata fetch → pattern candidates → semantic extraction → name search.
//! Each stage's entry depends on the previous stage's outcome, so a run is
//! strictly sequential; the first validated candidate wins.
//!
//! Nothing escapes [`ExtractionService::extract`] as an error: metadata
//! failures map to `VideoNotFound`, every other failure is logged at its
//! stage and treated as "this stage found nothing".

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::domain::{
    Confidence, ExtractionOutcome, FoundLevel, GdLevel, SemanticExtraction, Stage, VideoMetadata,
};
use super::patterns::extract_candidates;
use super::traits::{LevelAuthority, MetadataApi, SemanticApi};
use super::variations::variations_for;

/// Tunables for one service instance, taken from config at startup.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Lookup attempts per candidate before treating it as a miss
    pub retry_attempts: u32,
    /// First retry delay; doubles per attempt
    pub retry_base_delay: Duration,
    /// Video references handled per inbound event; extras are dropped
    pub max_videos_per_event: usize,
    /// Optional cap on pattern-stage lookups. `None` preserves the
    /// unbounded behavior; noisy descriptions can otherwise fan out into
    /// many authority calls.
    pub max_candidate_lookups: Option<usize>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            retry_attempts: 3,
            retry_base_delay: Duration::from_millis(500),
            max_videos_per_event: 3,
            max_candidate_lookups: None,
        }
    }
}

/// The extraction pipeline over its three external collaborators.
pub struct ExtractionService {
    metadata: Arc<dyn MetadataApi>,
    semantic: Arc<dyn SemanticApi>,
    authority: Arc<dyn LevelAuthority>,
    settings: PipelineSettings,
}

impl ExtractionService {
    pub fn new(
        metadata: Arc<dyn MetadataApi>,
        semantic: Arc<dyn SemanticApi>,
        authority: Arc<dyn LevelAuthority>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            metadata,
            semantic,
            authority,
            settings,
        }
    }

    /// Run the full pipeline for one video reference.
    ///
    /// Always returns a well-formed outcome; never an error.
    pub async fn extract(&self, video_id: &str) -> ExtractionOutcome {
        let metadata = match self.metadata.fetch_metadata(video_id).await {
            Ok(Some(metadata)) => metadata,
            Ok(None) => {
                info!(video_id, "video not found");
                return ExtractionOutcome::VideoNotFound;
            }
            Err(err) => {
                warn!(video_id, error = %err, "metadata fetch failed");
                return ExtractionOutcome::VideoNotFound;
            }
        };
        debug!(video_id, title = %metadata.title, "metadata fetched");

        // Identifiers submitted to the authority this run, across all
        // stages. A later stage never re-tries an ID this run has already
        // proven valid or invalid.
        let mut tried_ids: HashSet<String> = HashSet::new();

        if let Some(found) = self.pattern_stage(&metadata, &mut tried_ids).await {
            return ExtractionOutcome::Found(Box::new(found));
        }

        let semantic = self.semantic_stage(&metadata).await;

        if let Some(extraction) = &semantic
            && let Some(found) = self
                .semantic_id_lookup(&metadata, extraction, &mut tried_ids)
                .await
        {
            return ExtractionOutcome::Found(Box::new(found));
        }

        if let Some(extraction) = &semantic
            && let Some(found) = self
                .name_search_stage(&metadata, extraction, &tried_ids)
                .await
        {
            return ExtractionOutcome::Found(Box::new(found));
        }

        info!(video_id, "all stages exhausted, no level found");
        ExtractionOutcome::LevelNotFound { metadata }
    }

    /// Run the pipeline for every reference in one inbound event,
    /// concurrently, capped at `max_videos_per_event`. Results come back in
    /// input order; references beyond the cap are dropped.
    pub async fn extract_all(&self, video_ids: &[String]) -> Vec<ExtractionOutcome> {
        let cap = self.settings.max_videos_per_event;
        if video_ids.len() > cap {
            debug!(
                dropped = video_ids.len() - cap,
                cap, "too many references in one event, dropping extras"
            );
        }
        let runs = video_ids.iter().take(cap).map(|id| self.extract(id));
        futures::future::join_all(runs).await
    }

    /// Stage 2: validate pattern-extracted candidates in priority order.
    async fn pattern_stage(
        &self,
        metadata: &VideoMetadata,
        tried_ids: &mut HashSet<String>,
    ) -> Option<FoundLevel> {
        let candidates = extract_candidates(&metadata.search_text());
        debug!(count = candidates.len(), "pattern stage candidates");

        let cap = self.settings.max_candidate_lookups.unwrap_or(usize::MAX);
        for candidate in candidates.into_iter().take(cap) {
            tried_ids.insert(candidate.clone());
            if let Some(level) = self.lookup_with_retry(&candidate).await {
                info!(level_id = %level.level_id, "pattern stage validated a candidate");
                return Some(FoundLevel {
                    level,
                    stage: Stage::Pattern,
                    metadata: metadata.clone(),
                    confidence: None,
                    rationale: None,
                    searched_names: vec![],
                });
            }
        }
        None
    }

    /// Stage 3, first half: ask the model. Failures are absorbed here; the
    /// run degrades to whatever the remaining stages can do.
    async fn semantic_stage(&self, metadata: &VideoMetadata) -> Option<SemanticExtraction> {
        match self.semantic.extract(metadata).await {
            Ok(extraction) => {
                debug!(
                    level_id = ?extraction.level_id,
                    names = ?extraction.level_names,
                    confidence = ?extraction.confidence,
                    "semantic extraction"
                );
                Some(extraction)
            }
            Err(err) => {
                warn!(error = %err, "semantic extraction failed, continuing without it");
                None
            }
        }
    }

    /// Stage 3, second half: validate the model's ID if it is trustworthy
    /// and new this run.
    async fn semantic_id_lookup(
        &self,
        metadata: &VideoMetadata,
        extraction: &SemanticExtraction,
        tried_ids: &mut HashSet<String>,
    ) -> Option<FoundLevel> {
        if extraction.confidence == Confidence::Low {
            return None;
        }
        let level_id = extraction.level_id.as_deref()?;
        if !tried_ids.insert(level_id.to_string()) {
            debug!(level_id, "semantic ID already tried in pattern stage");
            return None;
        }
        let level = self.lookup_with_retry(level_id).await?;
        info!(level_id = %level.level_id, "semantic stage validated the model's ID");
        Some(FoundLevel {
            level,
            stage: Stage::Semantic,
            metadata: metadata.clone(),
            confidence: Some(extraction.confidence),
            rationale: Some(extraction.rationale.clone()),
            searched_names: vec![],
        })
    }

    /// Stage 4: search by the model's level names, then by their variations.
    async fn name_search_stage(
        &self,
        metadata: &VideoMetadata,
        extraction: &SemanticExtraction,
        tried_ids: &HashSet<String>,
    ) -> Option<FoundLevel> {
        if extraction.confidence == Confidence::Low || extraction.level_names.is_empty() {
            return None;
        }

        let mut searched: Vec<String> = Vec::new();

        for name in &extraction.level_names {
            searched.push(name.clone());
            if let Some(level) = self.try_search(name, tried_ids).await {
                return Some(self.name_search_hit(level, metadata, extraction, searched));
            }
        }

        for name in &extraction.level_names {
            for variation in variations_for(name) {
                if searched.contains(&variation) {
                    continue;
                }
                searched.push(variation.clone());
                if let Some(level) = self.try_search(&variation, tried_ids).await {
                    return Some(self.name_search_hit(level, metadata, extraction, searched));
                }
            }
        }

        None
    }

    fn name_search_hit(
        &self,
        level: GdLevel,
        metadata: &VideoMetadata,
        extraction: &SemanticExtraction,
        searched_names: Vec<String>,
    ) -> FoundLevel {
        info!(level_id = %level.level_id, name = %level.name, "name search found a level");
        FoundLevel {
            level,
            stage: Stage::NameSearch,
            metadata: metadata.clone(),
            confidence: Some(extraction.confidence),
            rationale: Some(extraction.rationale.clone()),
            searched_names,
        }
    }

    /// One search query, with errors absorbed and hits screened against the
    /// tried-ID set. A hit whose ID a direct lookup already proved absent is
    /// skipped; direct lookup is stronger evidence than search ranking.
    async fn try_search(&self, name: &str, tried_ids: &HashSet<String>) -> Option<GdLevel> {
        match self.authority.search_levels(name).await {
            Ok(Some(level)) => {
                if tried_ids.contains(&level.level_id) {
                    debug!(name, level_id = %level.level_id, "search hit already ruled out");
                    None
                } else {
                    Some(level)
                }
            }
            Ok(None) => None,
            Err(err) => {
                warn!(name, error = %err, "search failed, skipping name");
                None
            }
        }
    }

    /// Look up a level with exponential backoff on transport errors.
    ///
    /// A clean miss is never retried. Exhausting every attempt returns
    /// `None` so callers treat it like a miss.
    pub async fn lookup_with_retry(&self, level_id: &str) -> Option<GdLevel> {
        let mut delay = self.settings.retry_base_delay;
        for attempt in 1..=self.settings.retry_attempts {
            match self.authority.lookup_level(level_id).await {
                Ok(hit) => return hit,
                Err(err) => {
                    warn!(
                        level_id,
                        attempt,
                        max = self.settings.retry_attempts,
                        error = %err,
                        "lookup failed"
                    );
                    if attempt < self.settings.retry_attempts {
                        tokio::time::sleep(delay).await;
                        delay *= 2;
                    }
                }
            }
        }
        None
    }
}
