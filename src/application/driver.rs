//! Randomized insert/remove workload that checks the tree after every phase.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, AvlTree};
use crate::config::DriverSettings;

/// What one cycle did to the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub cycle: usize,
    /// Keys newly created; keys surviving a previous cycle are declined.
    pub inserted: usize,
    pub removed: usize,
    pub after_removal: usize,
    pub removed_upper: usize,
    pub remaining: usize,
    pub height: usize,
}

/// Runs the workload described by [`DriverSettings`].
///
/// Each cycle inserts a seeded permutation of `0..max_count`, removes the keys at
/// permutation positions `min_count..max_count`, then drops every key above
/// `upper_bound`. Consistency and count are verified after each phase.
#[derive(Debug)]
pub struct Driver {
    settings: DriverSettings,
    keys: Vec<i64>,
}

impl Driver {
    pub fn new(settings: DriverSettings) -> ApplicationResult<Self> {
        settings.validate()?;
        let keys = permutation(settings.max_count, settings.seed);
        Ok(Self { settings, keys })
    }

    pub fn settings(&self) -> &DriverSettings {
        &self.settings
    }

    /// The permutation used by every cycle.
    pub fn keys(&self) -> &[i64] {
        &self.keys
    }

    #[instrument(level = "debug", skip(self))]
    pub fn run(&self) -> ApplicationResult<Vec<CycleReport>> {
        let mut tree = AvlTree::new();
        (0..self.settings.cycles)
            .map(|cycle| self.run_cycle(&mut tree, cycle))
            .collect()
    }

    #[instrument(level = "debug", skip(self, tree))]
    pub fn run_cycle(&self, tree: &mut AvlTree<i64>, cycle: usize) -> ApplicationResult<CycleReport> {
        let before = tree.len();

        let inserted = self.keys.iter().filter(|&&key| tree.insert(key)).count();
        verify(tree, "insertion", cycle, before + inserted)?;
        debug!(inserted, height = tree.height(), "insertion phase done");

        let removed = self.keys[self.settings.min_count..]
            .iter()
            .filter(|key| tree.remove(*key))
            .count();
        let after_removal = tree.len();
        verify(tree, "removal", cycle, before + inserted - removed)?;
        debug!(removed, after_removal, "removal phase done");

        let removed_upper = tree.remove_upper(&self.settings.upper_bound);
        verify(tree, "upper removal", cycle, after_removal - removed_upper)?;

        let report = CycleReport {
            cycle,
            inserted,
            removed,
            after_removal,
            removed_upper,
            remaining: tree.len(),
            height: tree.height(),
        };
        info!(?report, "cycle complete");
        Ok(report)
    }
}

fn verify(
    tree: &AvlTree<i64>,
    phase: &'static str,
    cycle: usize,
    expected: usize,
) -> ApplicationResult<()> {
    if !tree.is_consistent() {
        return Err(ApplicationError::Inconsistent { phase, cycle });
    }
    let found = tree.count();
    if found != expected {
        return Err(ApplicationError::CountMismatch {
            phase,
            cycle,
            expected,
            found,
        });
    }
    Ok(())
}

/// `0..count` shuffled by a ChaCha stream seeded with `seed`.
pub fn permutation(count: usize, seed: u64) -> Vec<i64> {
    let mut keys: Vec<i64> = (0..count as i64).collect();
    keys.shuffle(&mut ChaCha20Rng::seed_from_u64(seed));
    keys
}
