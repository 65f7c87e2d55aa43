use kmeans_viz::*;

fn main() {
    let settings = Settings::<f64> { num_clusters: 4, seed: Some(1337), ..Default::default() };
    let mut session = Session::new(SessionConfig::build().settings(settings).build()).unwrap();
    session.seed_reference_clusters().unwrap();

    // Simulate 5 seconds at 60 frames per second
    for frame in 0..300 {
        match session.tick(1.0 / 60.0) {
            Tick::Converged { iterations } => println!("Frame {}: converged after {} iterations", frame, iterations),
            Tick::IterationLimit { iterations } => println!("Frame {}: gave up after {} iterations", frame, iterations),
            _ => {}
        }
    }

    println!("Centroids: {:?}", session.centroids());
    println!("Cluster-Assignments: {:?}", session.samples().iter().map(|s| s.cluster).collect::<Vec<_>>());
}
