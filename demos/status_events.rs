use kmeans_viz::*;

fn main() {
    let settings = Settings::<f32> {
        iteration_mode: IterationMode::RunToConvergence,
        empty_cluster_policy: EmptyClusterPolicy::Propagate,
        max_iter: 50,
        ..Default::default()
    };

	let conf = SessionConfig::build()
		.settings(settings)
		.iteration_done(&|_, nr, displacement|
			println!("Iteration {} - largest squared centroid movement: {:.4}", nr, displacement))
		.converged(&|s, nr| println!("Converged after {} iterations at {:?}", nr, s.centroids()))
		.build();

    let mut session = Session::new(conf).unwrap();
    session.seed_reference_clusters().unwrap();

    // A single pacing period triggers one full, blocking run
    println!("Result: {:?}", session.tick(1.0));
}
