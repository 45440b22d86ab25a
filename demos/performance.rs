use rand::prelude::*;
use std::time::Instant;
use voronoi::{Point, Voronoi};

fn main() {
    let count = 10000;
    let mut rng = rand::thread_rng();
    let sites: Vec<Point> = (0..count).map(|_i| Point::new(rng.gen(), rng.gen())).collect();

    let now = Instant::now();
    let diagram = Voronoi::build(&sites).expect("finite input");
    println!(
        "Finding voronoi diagram of {} points took {}ms ({} edges, {} false circle events)",
        count,
        now.elapsed().as_millis(),
        diagram.edges.len(),
        diagram.stats.circle_events_cancelled
    );
}
