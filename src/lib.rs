//! # kmeans-viz - API documentation
//!
//! kmeans-viz is a small rust library driving an interactive visualization of k-means clustering
//! on 2D points.
//!
//! ## Design target
//! The crate holds everything but the pixels: it generates loosely clustered sample data, places
//! the initial centroids, and runs the assign/update loop until the centroids settle. Drawing, frame
//! timing and input are left to a [`Renderer`], which only reads the current state and reports how
//! much time passed between frames. That elapsed time paces the algorithm, so each convergence run
//! (and, by default, each single step of it) is visible on screen.
//!
//! ## Algorithm
//! - **Assignment step** ([`assign`]): every sample is labelled with its nearest centroid (euclidean).
//!   Ties go to the centroid with the lowest index.
//! - **Update step** ([`update`]): every centroid moves to the mean of its samples. What happens to a
//!   centroid without samples is configured through [`EmptyClusterPolicy`]; it is always reported.
//! - **Convergence** ([`converged`]): the centroids settled once none of them moved by more than
//!   `convergence_epsilon` (squared distance) during a step.
//!
//! ## Supported primitive types
//! - [`f32`]
//! - [`f64`]
//!
//! ## Example
//! ```rust
//! use kmeans_viz::*;
//!
//! fn main() {
//!     let settings = Settings::<f64> { num_clusters: 3, seed: Some(7), ..Default::default() };
//!     let conf = SessionConfig::build()
//!         .settings(settings)
//!         .iteration_done(&|_, nr, displacement| println!("Iteration {} - moved {:.4}", nr, displacement))
//!         .converged(&|state, nr| println!("Converged after {} iterations: {:?}", nr, state.centroids()))
//!         .build();
//!
//!     let mut session = Session::new(conf).unwrap();
//!     session.seed_reference_clusters().unwrap();
//!
//!     // The frame loop of a renderer: feed the frame time, then draw `session.state()`.
//!     for _ in 0..600 {
//!         session.tick(1.0 / 60.0);
//!     }
//!     println!("Cluster-Assignments: {:?}", session.samples().iter().map(|s| s.cluster).collect::<Vec<_>>());
//! }
//! ```
//!
//! ## Short API-Overview / Description
//! Entry-point of the library is the [`Session`] struct. It is created from a [`SessionConfig`] (built
//! through [`SessionConfigBuilder`]), which carries the [`Settings`], the random number generator and
//! optional status callbacks. The session owns the samples and centroids; [`Session::tick`] advances
//! the [`IterationController`] and [`Session::state`] exposes a read-only [`ClusterState`] for drawing.
//!
//! The individual algorithm steps are exposed as free functions, operating on plain slices.

#[macro_use] mod helpers;
mod memory;
mod api;
mod controller;
mod convergence;
mod error;
mod generator;
mod inits;
mod render;
mod settings;
mod variants;

pub use api::{ClusterState, ConvergedCallbackFn, IterationDoneCallbackFn, Point, Sample, Session, SessionConfig, SessionConfigBuilder};
pub use controller::{IterationController, Phase, Tick};
pub use convergence::{converged, max_displacement, DEFAULT_EPSILON};
pub use error::{Error, Result};
pub use generator::{generate_samples, reference_centers};
pub use inits::banded::calculate as init_banded;
pub use memory::Primitive;
pub use render::{run, Color, Palette, Renderer};
pub use settings::{EmptyClusterPolicy, IterationMode, Settings};
pub use variants::lloyd::{assign, update, UpdateReport};


#[cfg(test)]
mod tests {
    use rand::prelude::*;
    use super::*;

    fn blobs<T: Primitive>(rnd: &mut StdRng) -> Vec<Sample<T>> {
        let mut samples = Vec::new();
        let radius = T::from(40.0).unwrap();
        for &(x, y) in &[(150.0, 150.0), (650.0, 150.0), (400.0, 500.0)] {
            generate_samples(&mut samples, Point::new(T::from(x).unwrap(), T::from(y).unwrap()), 50, radius, rnd).unwrap();
        }
        samples
    }

    #[test] fn well_separated_data_converges_f32() { well_separated_data_converges::<f32>(); }
    #[test] fn well_separated_data_converges_f64() { well_separated_data_converges::<f64>(); }

    fn well_separated_data_converges<T: Primitive>() {
        let eps = T::from(DEFAULT_EPSILON).unwrap();
        for seed in 0..20 {
            let mut rnd = StdRng::seed_from_u64(seed);
            let mut samples = blobs::<T>(&mut rnd);
            let mut centroids = init_banded(T::from(800).unwrap(), T::from(600).unwrap(), 3, &mut rnd).unwrap();

            assert!(samples.iter().all(|s| s.cluster.is_none()));
            let mut iterations = 0;
            loop {
                let previous = centroids.clone();
                assign(&centroids, &mut samples);
                let report = update(&mut centroids, &samples, EmptyClusterPolicy::KeepPosition);
                assert!(!report.skipped);
                iterations += 1;
                if converged(&previous, &centroids, eps) { break; }
                assert!(iterations < 100, "seed {} did not converge", seed);
            }
            assert!(samples.iter().all(|s| matches!(s.cluster, Some(c) if c < 3)));

            // the converged centroids are a fixed point of assign + update
            let stable = centroids.clone();
            assign(&centroids, &mut samples);
            update(&mut centroids, &samples, EmptyClusterPolicy::KeepPosition);
            assert!(converged(&stable, &centroids, eps));
        }
    }

    #[test]
    fn repeated_runs_are_deterministic() {
        let run = || {
            let mut rnd = StdRng::seed_from_u64(1337);
            let mut samples = blobs::<f64>(&mut rnd);
            let mut centroids = init_banded(800.0, 600.0, 3, &mut rnd).unwrap();
            for _ in 0..10 {
                assign(&centroids, &mut samples);
                update(&mut centroids, &samples, EmptyClusterPolicy::KeepPosition);
            }
            (samples, centroids)
        };
        assert_eq!(run(), run());
    }
}
