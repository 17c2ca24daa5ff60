//! Sequential tile submission.
//!
//! One session, one query at a time, in descriptor order. The first failure
//! ends the run: tiles stored before it stay stored, tiles after it are
//! never attempted.

use crate::config::SplitterConfig;
use crate::error::{Result, SplitterError};
use scidb_client::QueryExecutor;
use serde::Serialize;
use std::time::Instant;
use tile_plan::{
    compute_plan, find_duplicate_origins, find_duplicate_slices, render_query, Duplicate,
    PlanError, TileDescriptor, TilePlan,
};
use tracing::{debug, error, info, warn};

/// Outcome of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Descriptors available
    pub total: usize,
    /// Queries submitted and accepted
    pub submitted: usize,
    /// Stored array names, in submission order
    pub stored: Vec<String>,
    /// Descriptors left out by `max_tiles`
    pub skipped: usize,
    pub duplicate_slices: usize,
    pub duplicate_origins: usize,
    pub backend: String,
    pub dry_run: bool,
    pub elapsed_ms: u64,
}

/// Repeated keys found in a descriptor list.
#[derive(Debug, Clone, Default)]
pub struct DuplicateReport {
    pub slices: Vec<Duplicate<i64>>,
    pub origins: Vec<Duplicate<(i64, i64)>>,
}

impl DuplicateReport {
    pub fn is_clean(&self) -> bool {
        self.slices.is_empty() && self.origins.is_empty()
    }
}

/// A rendered tile, ready for submission or printing.
#[derive(Debug, Clone)]
pub struct PlannedTile {
    pub position: usize,
    pub plan: TilePlan,
    pub query: String,
}

/// Drives the split.
pub struct TileSplitter {
    config: SplitterConfig,
}

impl TileSplitter {
    pub fn new(config: SplitterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    /// Descriptors this run will process, honoring `max_tiles`.
    pub fn selected<'a>(&self, descriptors: &'a [TileDescriptor]) -> &'a [TileDescriptor] {
        match self.config.max_tiles {
            Some(max) if max < descriptors.len() => &descriptors[..max],
            _ => descriptors,
        }
    }

    /// Find repeated slice indices and footprints, logging each one.
    ///
    /// With `strict_duplicates` a repeated slice index is an error.
    pub fn check_duplicates(&self, descriptors: &[TileDescriptor]) -> Result<DuplicateReport> {
        let report = DuplicateReport {
            slices: find_duplicate_slices(descriptors),
            origins: find_duplicate_origins(descriptors),
        };

        for dup in &report.slices {
            warn!(
                slice_index = dup.key,
                positions = ?dup.positions,
                "Slice index repeats; later tiles overwrite the same stored array"
            );
        }
        if !report.origins.is_empty() {
            warn!(
                count = report.origins.len(),
                first = ?report.origins[0].key,
                "Tile footprints repeat under different slice indices"
            );
        }

        if self.config.strict_duplicates {
            if let Some(dup) = report.slices.first() {
                return Err(PlanError::DuplicateSlice {
                    slice_index: dup.key,
                    positions: dup.positions.clone(),
                }
                .into());
            }
        }

        Ok(report)
    }

    fn plan_tile(&self, descriptor: &TileDescriptor) -> Result<TilePlan> {
        Ok(compute_plan(descriptor, self.config.tile_edge)?
            .with_target_prefix(&self.config.target_prefix))
    }

    /// Plan and render every selected tile without submitting anything.
    pub fn plan_all(&self, descriptors: &[TileDescriptor]) -> Result<Vec<PlannedTile>> {
        self.selected(descriptors)
            .iter()
            .enumerate()
            .map(|(position, descriptor)| -> Result<PlannedTile> {
                let plan = self.plan_tile(descriptor)?;
                let query = render_query(&plan, &self.config.source);
                Ok(PlannedTile {
                    position,
                    plan,
                    query,
                })
            })
            .collect()
    }

    /// Submit one query per selected descriptor through `executor`.
    ///
    /// The session is opened once and closed once, whether or not a tile
    /// fails.
    pub async fn run(
        &self,
        descriptors: &[TileDescriptor],
        executor: &mut dyn QueryExecutor,
    ) -> Result<RunSummary> {
        let start = Instant::now();
        let report = self.check_duplicates(descriptors)?;
        let selected = self.selected(descriptors);

        // Contract violations surface before anything reaches the database
        for descriptor in selected {
            self.plan_tile(descriptor)?;
        }

        info!(
            backend = executor.name(),
            total = descriptors.len(),
            selected = selected.len(),
            edge = self.config.tile_edge.get(),
            "Starting tile split"
        );

        executor.connect().await.map_err(SplitterError::Session)?;

        let outcome = self.submit_all(selected, executor).await;
        let closed = executor.disconnect().await;

        let stored = match (outcome, closed) {
            (Ok(stored), Ok(())) => stored,
            (Ok(_), Err(e)) => return Err(SplitterError::Disconnect(e)),
            (Err(e), Ok(())) => return Err(e),
            (Err(e), Err(close_err)) => {
                warn!(error = %close_err, "Failed to close session after tile failure");
                return Err(e);
            }
        };

        let summary = RunSummary {
            total: descriptors.len(),
            submitted: stored.len(),
            skipped: descriptors.len() - selected.len(),
            stored,
            duplicate_slices: report.slices.len(),
            duplicate_origins: report.origins.len(),
            backend: executor.name().to_string(),
            dry_run: executor.name() == "dry-run",
            elapsed_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            submitted = summary.submitted,
            skipped = summary.skipped,
            elapsed_ms = summary.elapsed_ms,
            "Tile split completed"
        );
        Ok(summary)
    }

    async fn submit_all(
        &self,
        selected: &[TileDescriptor],
        executor: &mut dyn QueryExecutor,
    ) -> Result<Vec<String>> {
        let mut stored = Vec::with_capacity(selected.len());

        for (position, descriptor) in selected.iter().enumerate() {
            let plan = self.plan_tile(descriptor)?;
            let query = render_query(&plan, &self.config.source);

            info!(
                position,
                slice_index = plan.slice_index,
                array = %plan.target_array_name,
                "Submitting tile"
            );
            debug!(query = %query, "Tile query");

            match executor.execute_query(&query, self.config.dialect).await {
                Ok(outcome) => {
                    debug!(
                        array = %plan.target_array_name,
                        elapsed_ms = outcome.elapsed.as_millis() as u64,
                        "Tile stored"
                    );
                    stored.push(plan.target_array_name);
                }
                Err(e) => {
                    error!(
                        position,
                        slice_index = plan.slice_index,
                        array = %plan.target_array_name,
                        error = %e,
                        "Tile failed; remaining tiles not attempted"
                    );
                    return Err(SplitterError::TileFailed {
                        position,
                        slice_index: plan.slice_index,
                        target: plan.target_array_name,
                        stored: stored.len(),
                        source: e,
                    });
                }
            }
        }

        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter(max_tiles: Option<usize>) -> TileSplitter {
        TileSplitter::new(SplitterConfig {
            max_tiles,
            ..SplitterConfig::default()
        })
    }

    fn descriptors(n: i64) -> Vec<TileDescriptor> {
        (0..n).map(|i| TileDescriptor::new(i, i, i)).collect()
    }

    #[test]
    fn test_selected_honors_bound() {
        let tiles = descriptors(30);
        assert_eq!(splitter(Some(20)).selected(&tiles).len(), 20);
        assert_eq!(splitter(Some(50)).selected(&tiles).len(), 30);
        assert_eq!(splitter(None).selected(&tiles).len(), 30);
    }

    #[test]
    fn test_plan_all_uses_prefix() {
        let splitter = TileSplitter::new(SplitterConfig {
            target_prefix: "staging".to_string(),
            ..SplitterConfig::default()
        });
        let planned = splitter.plan_all(&descriptors(2)).unwrap();
        assert_eq!(planned.len(), 2);
        assert_eq!(planned[1].plan.target_array_name, "staging_1");
        assert!(planned[1].query.ends_with(",staging_1)"));
    }

    #[test]
    fn test_strict_duplicates() {
        let tiles = vec![TileDescriptor::new(0, 0, 1), TileDescriptor::new(5, 5, 1)];

        let lenient = splitter(None);
        let report = lenient.check_duplicates(&tiles).unwrap();
        assert_eq!(report.slices.len(), 1);
        assert!(!report.is_clean());

        let strict = TileSplitter::new(SplitterConfig {
            strict_duplicates: true,
            ..SplitterConfig::default()
        });
        let err = strict.check_duplicates(&tiles).unwrap_err();
        assert!(matches!(
            err,
            SplitterError::Plan(PlanError::DuplicateSlice { slice_index: 1, .. })
        ));
    }
}
