use crate::{
    api::{ClusterState, Point},
    convergence,
    memory::*,
    settings::{EmptyClusterPolicy, IterationMode, Settings},
    variants::lloyd::{self, UpdateReport},
};
use tracing::{debug, info, warn};

/// Whether the controller is waiting for the pacing threshold, or in the middle of a convergence run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Converging,
}

/// What a single tick of the controller did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tick<T> {
    /// Pacing threshold not reached yet, nothing was computed.
    Idle,
    /// One assign/update step ran and the centroids are still moving.
    /// **displacement** is the largest squared centroid movement of this step.
    Stepped { iteration: usize, displacement: T },
    /// The centroids settled after **iterations** steps. Pacing starts over.
    Converged { iterations: usize },
    /// The run was cut off after **iterations** steps without settling. Pacing starts over.
    IterationLimit { iterations: usize },
    /// The update step could not allocate its buffers. Centroids are unchanged, and the run
    /// is retried once the pacing threshold is reached again.
    UpdateSkipped { iteration: usize },
}
impl<T> Tick<T> {
    /// Whether this tick finished a convergence run (successfully or not).
    pub fn ends_run(&self) -> bool {
        matches!(self, Tick::Converged { .. } | Tick::IterationLimit { .. } | Tick::UpdateSkipped { .. })
    }
}

/// Paces and drives the assign/update/converge cycle.
///
/// Elapsed frame time is accumulated through [`IterationController::accumulate`]. Once it reaches the
/// pacing threshold, the controller switches to [`Phase::Converging`] and every call to
/// [`IterationController::step`] runs one assign/update step, checked against a snapshot of the
/// centroids taken right before it. When the run ends the accumulator is reset and the controller
/// goes back to [`Phase::Idle`].
#[derive(Debug)]
pub struct IterationController<T: Primitive> {
    phase: Phase,
    elapsed: T,
    iteration: usize,
    previous: Vec<Point<T>>,

    pacing_threshold: T,
    epsilon: T,
    max_iter: usize,
    mode: IterationMode,
    policy: EmptyClusterPolicy,
}
impl<T: Primitive> IterationController<T> {
    pub fn new(settings: &Settings<T>) -> Self {
        Self {
            phase: Phase::Idle,
            elapsed: T::zero(),
            iteration: 0,
            previous: Vec::with_capacity(settings.num_clusters),
            pacing_threshold: settings.pacing_threshold,
            epsilon: settings.convergence_epsilon,
            max_iter: settings.max_iter,
            mode: settings.iteration_mode,
            policy: settings.empty_cluster_policy,
        }
    }

    pub fn phase(&self) -> Phase { self.phase }
    pub fn elapsed(&self) -> T { self.elapsed }
    pub fn mode(&self) -> IterationMode { self.mode }
    /// Steps done in the current (or, when idle, the last) convergence run.
    pub fn iteration(&self) -> usize { self.iteration }

    /// Add **dt** to the pacing accumulator.
    /// ## Returns
    /// Whether a convergence run is in progress (possibly just triggered by this call).
    pub fn accumulate(&mut self, dt: T) -> bool {
        self.elapsed += dt;
        if self.phase == Phase::Idle && self.elapsed >= self.pacing_threshold {
            debug!(elapsed = %self.elapsed, "pacing threshold reached, starting convergence run");
            self.phase = Phase::Converging;
            self.iteration = 0;
        }
        self.phase == Phase::Converging
    }

    /// Run a single assign/update step on **state** and check it for convergence.
    /// Returns [`Tick::Idle`] without touching **state** unless a run is in progress.
    pub fn step(&mut self, state: &mut ClusterState<T>) -> Tick<T> {
        if self.phase != Phase::Converging {
            return Tick::Idle;
        }

        // Snapshot capacity is reserved up front, for a fixed-size centroid set this never reallocates.
        self.previous.clear();
        self.previous.extend_from_slice(&state.centroids);

        let changed = lloyd::assign(&state.centroids, &mut state.samples);
        let report = lloyd::update(&mut state.centroids, &state.samples, self.policy);
        self.conclude(state, changed, &report)
    }

    /// Judge the outcome of the step that just ran against the snapshot in `previous`.
    fn conclude(&mut self, state: &ClusterState<T>, changed: usize, report: &UpdateReport) -> Tick<T> {
        self.iteration += 1;

        if report.skipped {
            warn!(iteration = self.iteration, "update step skipped, retrying on the next pacing cycle");
            return self.finish(Tick::UpdateSkipped { iteration: self.iteration });
        }

        let displacement = convergence::max_displacement(&self.previous, &state.centroids);
        debug!(iteration = self.iteration, changed, displacement = %displacement, "k-means step");

        if convergence::converged(&self.previous, &state.centroids, self.epsilon) {
            info!(iterations = self.iteration, "centroids converged");
            return self.finish(Tick::Converged { iterations: self.iteration });
        }
        if self.iteration >= self.max_iter {
            warn!(iterations = self.iteration, displacement = %displacement, "no convergence within iteration limit");
            return self.finish(Tick::IterationLimit { iterations: self.iteration });
        }
        Tick::Stepped { iteration: self.iteration, displacement }
    }

    fn finish(&mut self, tick: Tick<T>) -> Tick<T> {
        self.phase = Phase::Idle;
        self.elapsed = T::zero();
        tick
    }
}
