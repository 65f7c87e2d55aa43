use crate::{
    controller::{IterationController, Phase, Tick},
    error::Result,
    generator, inits,
    memory::*,
    settings::{IterationMode, Settings},
};
use rand::{prelude::*, rngs::StdRng};
use std::cell::RefCell;
use tracing::{debug, info};

/// A position in the 2D region. Used as the centroid type.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}
impl<T> Point<T> {
    pub const fn new(x: T, y: T) -> Self { Self { x, y } }
}

/// A data point together with the index of the centroid it is currently assigned to.
/// `cluster` is `None` until the first assignment step ran.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Sample<T> {
    pub x: T,
    pub y: T,
    pub cluster: Option<usize>,
}
impl<T> Sample<T> {
    pub const fn new(x: T, y: T) -> Self { Self { x, y, cluster: None } }
}


pub type IterationDoneCallbackFn<'a, T> = &'a dyn Fn(&ClusterState<T>, usize, T);
pub type ConvergedCallbackFn<'a, T> = &'a dyn Fn(&ClusterState<T>, usize);

/// Runtime configuration of a [`Session`]: the [`Settings`], the random number generator, and a couple
/// of callbacks that can be set to get status information from a running convergence.
///
/// For a more detailed information about all possible options, have a look at [`SessionConfigBuilder`].
pub struct SessionConfig<'a, T: Primitive> {
    pub(crate) settings: Settings<T>,
    /// Callback that is called after each assign/update step that did not settle the centroids
    /// ## Arguments
    /// - **state**: Current [`ClusterState`] after the step
    /// - **iteration**: Number of the step within the current convergence run
    /// - **displacement**: Largest squared centroid movement of this step
    pub(crate) iteration_done: IterationDoneCallbackFn<'a, T>,
    /// Callback that is called when a convergence run settled
    /// ## Arguments
    /// - **state**: Converged [`ClusterState`]
    /// - **iterations**: Amount of steps the run took
    pub(crate) converged: ConvergedCallbackFn<'a, T>,
    /// Random number generator to use
    pub(crate) rnd: Box<RefCell<dyn RngCore>>,
}
impl<'a, T: Primitive> Default for SessionConfig<'a, T> {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            iteration_done: &|_,_,_| {},
            converged: &|_,_| {},
            rnd: Box::new(RefCell::new(rand::thread_rng())),
        }
    }
}
impl<'a, T: Primitive> SessionConfig<'a, T> {
    /// Use the [`SessionConfigBuilder`] to build a [`SessionConfig`] instance.
    pub fn build() -> SessionConfigBuilder<'a, T> {
        SessionConfigBuilder { config: SessionConfig::default(), rnd_set: false }
    }
    pub fn settings(&self) -> &Settings<T> { &self.settings }
}
impl<'a, T: Primitive> std::fmt::Debug for SessionConfig<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig").field("settings", &self.settings).finish_non_exhaustive()
    }
}

pub struct SessionConfigBuilder<'a, T: Primitive> {
    config: SessionConfig<'a, T>,
    rnd_set: bool,
}
impl<'a, T: Primitive> SessionConfigBuilder<'a, T> {
    /// Set the [`Settings`] of the session.
    /// If **settings** carries a seed and no explicit generator is given, a seeded [`StdRng`] is used.
    pub fn settings(mut self, settings: Settings<T>) -> Self {
        self.config.settings = settings; self
    }
    /// Set the callback that should be called after each step of a running convergence.
    pub fn iteration_done(mut self, iteration_done: IterationDoneCallbackFn<'a, T>) -> Self {
        self.config.iteration_done = iteration_done; self
    }
    /// Set the callback that should be called once a convergence run settled.
    pub fn converged(mut self, converged: ConvergedCallbackFn<'a, T>) -> Self {
        self.config.converged = converged; self
    }
    /// Set the random number generator that should be used for sample generation and centroid placement.
    /// Use a seeded generator for deterministically repeatable results.
    pub fn random_generator<R: RngCore + 'static>(mut self, rnd: R) -> Self {
        self.config.rnd = Box::new(RefCell::new(rnd));
        self.rnd_set = true; self
    }
    /// Return the internally built configuration structure.
    pub fn build(mut self) -> SessionConfig<'a, T> {
        if let (false, Some(seed)) = (self.rnd_set, self.config.settings.seed) {
            self.config.rnd = Box::new(RefCell::new(StdRng::seed_from_u64(seed)));
        }
        self.config
    }
}


/// The samples and centroids of a session.
///
/// Sample labels are only ever written by the assignment step, and the amount of centroids never
/// changes after initialization; this is why both collections are only handed out read-only.
#[derive(Clone, Debug, Default)]
pub struct ClusterState<T> {
    pub(crate) samples: Vec<Sample<T>>,
    pub(crate) centroids: Vec<Point<T>>,
}
impl<T> ClusterState<T> {
    pub fn samples(&self) -> &[Sample<T>] { &self.samples }
    /// Centroids, in the order used as cluster index by [`Sample::cluster`].
    pub fn centroids(&self) -> &[Point<T>] { &self.centroids }
}


/// Entrypoint of this crate's API-Surface.
///
/// A session owns the samples and centroids for its whole lifetime. The centroids are placed once on
/// creation; samples are added through [`Session::generate_samples`]. Afterwards, the frame loop feeds
/// elapsed time through [`Session::tick`], which advances the k-means iteration whenever the pacing
/// threshold is reached, and reads the state back through [`Session::state`] for drawing.
///
/// ## Example
/// ```rust
/// use kmeans_viz::*;
///
/// let settings = Settings::<f32> { seed: Some(42), ..Default::default() };
/// let mut session = Session::new(SessionConfig::build().settings(settings).build()).unwrap();
/// session.seed_reference_clusters().unwrap();
///
/// let mut frames = 0;
/// while !matches!(session.tick(1.0 / 60.0), Tick::Converged { .. }) {
///     frames += 1;
///     assert!(frames < 10_000);
/// }
/// assert!(session.samples().iter().all(|s| s.cluster.is_some()));
/// ```
#[derive(Debug)]
pub struct Session<'a, T: Primitive> {
    config: SessionConfig<'a, T>,
    state: ClusterState<T>,
    controller: IterationController<T>,
}
impl<'a, T: Primitive> Session<'a, T> {
    /// Validate the configuration, and place `num_clusters` centroids across the region.
    ///
    /// ## Errors
    /// - [`Error::InvalidConfig`](crate::Error::InvalidConfig) if the settings are not usable
    /// - [`Error::Allocation`](crate::Error::Allocation) if the centroids collection could not be allocated
    pub fn new(config: SessionConfig<'a, T>) -> Result<Self> {
        config.settings.validate()?;
        let s = &config.settings;
        let centroids = inits::banded::calculate(s.window_width, s.window_height, s.num_clusters,
            &mut *config.rnd.borrow_mut())?;
        info!(k = s.num_clusters, width = %s.window_width, height = %s.window_height, "session initialized");

        let controller = IterationController::new(s);
        Ok(Self {
            config,
            state: ClusterState { samples: Vec::new(), centroids },
            controller,
        })
    }

    /// Append **count** unassigned samples, scattered around **center** by at most **radius** per axis.
    ///
    /// ## Errors
    /// - [`Error::InvalidConfig`](crate::Error::InvalidConfig) for a non-finite center, or a negative, non-finite or overflowing radius
    /// - [`Error::Allocation`](crate::Error::Allocation) if the samples collection could not grow; the session should be dropped
    pub fn generate_samples(&mut self, center: Point<T>, count: usize, radius: T) -> Result<()> {
        generator::generate_samples(&mut self.state.samples, center, count, radius, &mut *self.config.rnd.borrow_mut())?;
        debug!(count, total = self.state.samples.len(), "samples generated");
        Ok(())
    }

    /// Generate the four sample blobs of the reference scene, using the configured
    /// `samples_per_cluster` and `cluster_radius`.
    pub fn seed_reference_clusters(&mut self) -> Result<()> {
        let s = &self.config.settings;
        let (count, radius) = (s.samples_per_cluster, s.cluster_radius);
        for center in generator::reference_centers(s.window_width, s.window_height) {
            self.generate_samples(center, count, radius)?;
        }
        Ok(())
    }

    /// Feed **dt** of elapsed time into the pacing accumulator and advance the iteration if due.
    ///
    /// In [`IterationMode::StepPerTick`] at most one assign/update step runs per call. In
    /// [`IterationMode::RunToConvergence`] a triggered run is carried out completely within this call.
    pub fn tick(&mut self, dt: T) -> Tick<T> {
        if !self.controller.accumulate(dt) {
            return Tick::Idle;
        }
        loop {
            let tick = self.controller.step(&mut self.state);
            match tick {
                Tick::Stepped { iteration, displacement } => {
                    (self.config.iteration_done)(&self.state, iteration, displacement);
                    if self.controller.mode() == IterationMode::StepPerTick {
                        return tick;
                    }
                }
                Tick::Converged { iterations } => {
                    (self.config.converged)(&self.state, iterations);
                    return tick;
                }
                _ => return tick,
            }
        }
    }

    pub fn state(&self) -> &ClusterState<T> { &self.state }
    pub fn samples(&self) -> &[Sample<T>] { &self.state.samples }
    pub fn centroids(&self) -> &[Point<T>] { &self.state.centroids }
    pub fn settings(&self) -> &Settings<T> { &self.config.settings }
    pub fn phase(&self) -> Phase { self.controller.phase() }
    /// Currently accumulated time towards the next convergence run.
    pub fn elapsed(&self) -> T { self.controller.elapsed() }
    pub fn iterations(&self) -> usize { self.controller.iteration() }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::Error, helpers::testing::*, settings::EmptyClusterPolicy};
    use std::cell::Cell;

    fn seeded<'a, T: Primitive>(settings: Settings<T>) -> Session<'a, T> {
        Session::new(SessionConfig::build().settings(settings).random_generator(rng()).build()).unwrap()
    }

    #[test]
    fn invalid_settings_create_no_session() {
        let settings = Settings::<f64> { num_clusters: 0, ..Default::default() };
        let res = Session::new(SessionConfig::build().settings(settings).build());
        assert!(matches!(res, Err(Error::InvalidConfig { field: "num_clusters", .. })));
    }

    #[test]
    fn rejects_negative_radius() {
        let mut session = seeded(Settings::<f32>::default());
        let res = session.generate_samples(pt(1.0, 1.0), 3, -1.0);
        assert!(matches!(res, Err(Error::InvalidConfig { field: "radius", .. })));
        assert!(session.samples().is_empty());
    }

    #[test]
    fn overflowing_radius_fails_instead_of_panicking() {
        let mut session = seeded(Settings::<f32>::default());
        let res = session.generate_samples(pt(0.0, 0.0), 3, f32::MAX);
        assert!(matches!(res, Err(Error::InvalidConfig { field: "radius", .. })));
        assert!(session.samples().is_empty());

        let settings = Settings::<f64> { cluster_radius: 1e308, ..Default::default() };
        let res = Session::new(SessionConfig::build().settings(settings).random_generator(rng()).build());
        assert!(matches!(res, Err(Error::InvalidConfig { field: "cluster_radius", .. })));
    }

    #[test]
    fn reference_scene() {
        let mut session = seeded(Settings::<f64>::default());
        assert_eq!(session.centroids().len(), 3);
        session.seed_reference_clusters().unwrap();
        assert_eq!(session.samples().len(), 100);
        assert!(session.samples().iter().all(|s| s.cluster.is_none()));
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn same_seed_same_scene() {
        let settings = Settings::<f32> { seed: Some(99), ..Default::default() };
        let mut a = Session::new(SessionConfig::build().settings(settings.clone()).build()).unwrap();
        let mut b = Session::new(SessionConfig::build().settings(settings).build()).unwrap();
        a.seed_reference_clusters().unwrap();
        b.seed_reference_clusters().unwrap();
        assert_eq!(a.samples(), b.samples());
        assert_eq!(a.centroids(), b.centroids());
    }

    #[test]
    fn step_per_tick_reports_every_iteration() {
        let steps = Cell::new(0usize);
        let converged_after = Cell::new(None);
        let on_step = |_: &ClusterState<f64>, nr: usize, _: f64| { steps.set(nr); };
        let on_converged = |_: &ClusterState<f64>, nr: usize| { converged_after.set(Some(nr)); };
        let conf = SessionConfig::build()
            .settings(Settings { pacing_threshold: 0.5, ..Default::default() })
            .random_generator(rng())
            .iteration_done(&on_step)
            .converged(&on_converged)
            .build();
        let mut session = Session::new(conf).unwrap();
        session.seed_reference_clusters().unwrap();

        assert_eq!(session.tick(0.25), Tick::Idle);
        let mut ticks = vec![session.tick(0.25)];
        while !ticks.last().unwrap().ends_run() {
            assert_eq!(session.phase(), Phase::Converging);
            ticks.push(session.tick(0.25));
            assert!(ticks.len() < 1000);
        }
        let iterations = match ticks.last().unwrap() {
            Tick::Converged { iterations } => *iterations,
            other => panic!("unexpected end of run: {:?}", other),
        };
        assert_eq!(ticks.len(), iterations);
        assert_eq!(steps.get(), iterations - 1);
        assert_eq!(converged_after.get(), Some(iterations));
        assert_eq!(session.elapsed(), 0.0);
        assert!(session.samples().iter().all(|s| matches!(s.cluster, Some(c) if c < 3)));
    }

    #[test]
    fn run_to_convergence_blocks_within_one_tick() {
        let mut session = seeded(Settings::<f32> { iteration_mode: IterationMode::RunToConvergence, ..Default::default() });
        session.seed_reference_clusters().unwrap();
        assert_eq!(session.tick(0.5), Tick::Idle);
        match session.tick(0.5) {
            Tick::Converged { iterations } => assert!(iterations >= 1),
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn empty_cluster_does_not_stall_default_session() {
        let settings = Settings::<f64> { num_clusters: 2, empty_cluster_policy: EmptyClusterPolicy::KeepPosition, ..Default::default() };
        let mut session = seeded(settings);
        // one tight blob in a corner, the centroid of the upper band ends up without members
        session.generate_samples(pt(5.0, 5.0), 10, 1.0).unwrap();
        let before = session.centroids().to_vec();
        assert!(matches!(session.tick(1.0), Tick::Stepped { .. } | Tick::Converged { .. }));
        for (ci, c) in session.centroids().iter().enumerate() {
            assert!(c.x.is_finite() && c.y.is_finite());
            if session.samples().iter().all(|s| s.cluster != Some(ci)) {
                assert_eq!(*c, before[ci]);
            }
        }
    }
}
