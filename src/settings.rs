use crate::{error::{Error, Result}, memory::Primitive};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What the centroid updater does with a centroid that ended up without any assigned sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyClusterPolicy {
    /// Leave the centroid where it was before the update.
    KeepPosition,
    /// Divide by the zero member count, turning the centroid into `NaN`.
    Propagate,
}
impl Default for EmptyClusterPolicy {
    fn default() -> Self { EmptyClusterPolicy::KeepPosition }
}

/// How much work the iteration controller does per tick, once the pacing threshold was reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IterationMode {
    /// One assign/update step per tick, so every intermediate state gets drawn.
    StepPerTick,
    /// All steps back-to-back within a single tick, until the centroids settled.
    RunToConvergence,
}
impl Default for IterationMode {
    fn default() -> Self { IterationMode::StepPerTick }
}

/// Startup configuration of a clustering session.
///
/// ## Fields
/// - **window_width** / **window_height**: Size of the region samples and centroids live in
/// - **num_clusters**: Amount of centroids (k)
/// - **samples_per_cluster**: Amount of samples per generated blob
/// - **cluster_radius**: Maximum per-axis offset of a generated sample from its blob center
/// - **convergence_epsilon**: Squared displacement a centroid may still move while counting as settled
/// - **pacing_threshold**: Accumulated frame time that triggers a convergence run
/// - **max_iter**: Upper bound on assign/update steps per convergence run
/// - **seed**: Seed for the random generator. `None` uses the thread-local generator
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings<T: Primitive> {
    pub window_width: T,
    pub window_height: T,
    pub num_clusters: usize,
    pub samples_per_cluster: usize,
    pub cluster_radius: T,
    pub convergence_epsilon: T,
    pub pacing_threshold: T,
    pub max_iter: usize,
    pub empty_cluster_policy: EmptyClusterPolicy,
    pub iteration_mode: IterationMode,
    pub seed: Option<u64>,
}
impl<T: Primitive> Default for Settings<T> {
    fn default() -> Self {
        Self {
            window_width: T::from(800.0).unwrap_or_else(T::zero),
            window_height: T::from(600.0).unwrap_or_else(T::zero),
            num_clusters: 3,
            samples_per_cluster: 25,
            cluster_radius: T::from(50.0).unwrap_or_else(T::zero),
            convergence_epsilon: T::from(1e-4).unwrap_or_else(T::zero),
            pacing_threshold: T::one(),
            max_iter: 1000,
            empty_cluster_policy: EmptyClusterPolicy::default(),
            iteration_mode: IterationMode::default(),
            seed: None,
        }
    }
}
impl<T: Primitive> Settings<T> where T: for<'de> Deserialize<'de> {
    pub fn from_toml_str(src: &str) -> Result<Self> {
        let settings: Self = toml::from_str(src)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path)
            .map_err(|source| Error::SettingsIo { path: path.display().to_string(), source })?;
        Self::from_toml_str(&src)
    }
}
impl<T: Primitive> Settings<T> {
    /// Check all values for sanity. Every session is validated through this before any state exists.
    pub fn validate(&self) -> Result<()> {
        let positive = |field, v: T| {
            if v.is_finite() && v > T::zero() { Ok(()) }
            else { Err(Error::invalid(field, format!("must be a positive finite number, got {}", v))) }
        };
        positive("window_width", self.window_width)?;
        positive("window_height", self.window_height)?;
        positive("convergence_epsilon", self.convergence_epsilon)?;
        if self.num_clusters == 0 {
            return Err(Error::invalid("num_clusters", "must be at least 1"));
        }
        if self.max_iter == 0 {
            return Err(Error::invalid("max_iter", "must be at least 1"));
        }
        if !self.cluster_radius.is_finite() || self.cluster_radius < T::zero() {
            return Err(Error::invalid("cluster_radius", format!("must be a non-negative finite number, got {}", self.cluster_radius)));
        }
        // generated blobs reach at most region size + radius
        let r = self.cluster_radius;
        if [r + r, self.window_width + r, self.window_height + r].iter().any(|v| !v.is_finite()) {
            return Err(Error::invalid("cluster_radius", format!("{} overflows the sample range of the region", r)));
        }
        if !self.pacing_threshold.is_finite() || self.pacing_threshold < T::zero() {
            return Err(Error::invalid("pacing_threshold", format!("must be a non-negative finite number, got {}", self.pacing_threshold)));
        }
        Ok(())
    }
}
