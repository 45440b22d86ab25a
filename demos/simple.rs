use voronoi::{Point, Voronoi};

fn main() {
    let sites = vec![
        Point::new(50.0, 50.0),
        Point::new(70.0, 60.0),
        Point::new(55.0, 70.0),
        Point::new(40.0, 65.0),
    ];

    let diagram = Voronoi::build(&sites).expect("finite input");
    for edge in diagram.edges.iter() {
        println!(
            "{} | {}: ({:.3}, {:.3}) -> ({:.3}, {:.3})",
            edge.site1.id, edge.site2.id, edge.start.x, edge.start.y, edge.end.x, edge.end.y
        );
    }
    println!("{:?}", diagram.stats);
}
