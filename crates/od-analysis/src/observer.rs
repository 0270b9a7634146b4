//! Analysis observer trait for progress reporting.

use log::trace;

use od_core::CategoryId;

use crate::route::{ScenarioPhase, ScenarioResult};

/// Callbacks invoked by [`Analysis::run`][crate::Analysis::run] as each
/// scenario moves through its phases.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
pub trait AnalysisObserver {
    /// Called before anything is computed for `scenario`.
    fn on_scenario_start(&mut self, _scenario: &str) {}

    /// Called on every phase transition.  `category` is `None` for the
    /// scenario-wide phases and for uncategorised tables.
    fn on_phase(&mut self, _scenario: &str, _category: Option<CategoryId>, _phase: ScenarioPhase) {}

    /// Called once the scenario is done, with one result per category.
    fn on_scenario_end(&mut self, _scenario: &str, _results: &[ScenarioResult]) {}
}

/// An [`AnalysisObserver`] that does nothing.
pub struct NoopObserver;

impl AnalysisObserver for NoopObserver {}

/// Log a phase transition at `trace` level and forward it to `observer`.
pub(crate) fn enter_phase<O: AnalysisObserver>(
    observer: &mut O,
    scenario: &str,
    category: Option<CategoryId>,
    phase: ScenarioPhase,
) {
    trace!("{scenario}: {phase:?}{}", category.map(|c| format!(" ({})", c.short_name())).unwrap_or_default());
    observer.on_phase(scenario, category, phase);
}
