use floodfill_core::{FailureStage, Node};
use floodfill_engine::{Floodfiller, floodfill};
use floodfill_grid::{FAULT, FILL, Grid, GridError, TileId};
use std::time::Duration;

async fn fill(initial: &str, parallelism: usize) -> Grid {
    let grid = Grid::parse(initial).unwrap();
    if let Err(err) = floodfill(grid.starts(), parallelism).await {
        panic!("fill of\n{initial}\nfailed: {err}");
    }
    grid
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_floodfill_table() {
    let cases = [
        ("@", "x"),
        ("@@", "xx"),
        (".#\n#@", ".#\n#x"),
        ("...\n.@.\n...", "xxx\nxxx\nxxx"),
        (".#.\n.#@\n.#.", ".#x\n.#x\n.#x"),
        (".#.\n@#@\n.#.", "x#x\nx#x\nx#x"),
        (
            "#####\n#...#\n#.#.#\n#.@.#\n#####",
            "#####\n#xxx#\n#x#x#\n#xxx#\n#####",
        ),
    ];

    for (initial, expected) in cases {
        let grid = fill(initial, 4).await;
        assert_eq!(grid.render(), expected, "initial:\n{initial}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_every_open_tile_visited_once() {
    let initial = "\
.........#..........
.@.......#..........
.........#....@.....
#####.####..........
.........#..........
.........###########
....................";
    let grid = Grid::parse(initial).unwrap();
    let open = grid.width() * grid.height() - grid.count('#');

    let summary = floodfill(grid.starts(), 8).await.unwrap();

    assert_eq!(summary.visited as usize, open);
    assert_eq!(grid.visit_count() as usize, open);
    assert_eq!(grid.count(FILL), open);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_sequential_fill_matches_parallel() {
    let initial = "\
#########
#@..#...#
#.#.#.#.#
#.#...#.#
#########";
    let sequential = fill(initial, 1).await;
    let parallel = fill(initial, 16).await;

    assert_eq!(sequential.render(), parallel.render());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_faulty_tile_reported_and_isolated() {
    let grid = Grid::parse("@.!.\n....").unwrap();

    let err = floodfill(grid.starts(), 4).await.unwrap_err();

    assert_eq!(err.len(), 1);
    let failure = err.failure_for(&TileId::new(2, 0)).unwrap();
    assert_eq!(failure.stage, FailureStage::Visit);
    assert!(matches!(
        failure.cause.node_error(),
        Some(GridError::Faulty { .. })
    ));

    // The tile beyond the fault is still reached through the lower row.
    assert_eq!(grid.render(), "xx!x\nxxxx");
    assert_eq!(grid.count(FAULT), 1);
}

#[tokio::test]
async fn test_tile_visited_twice_errors() {
    let grid = Grid::parse("@").unwrap();
    let tile = grid.tile(0, 0).unwrap();

    tile.visit().await.unwrap();
    let err = tile.visit().await.unwrap_err();

    assert!(matches!(err, GridError::AlreadyVisited { .. }));
    assert_eq!(err.to_string(), "Tile (0,0) visited before");
}

#[tokio::test]
async fn test_neighbors_skip_walls_and_edges() {
    let grid = Grid::parse("#.#\n.@.\n###").unwrap();
    let tile = grid.tile(1, 1).unwrap();

    let mut neighbors: Vec<_> = tile.neighbors().await.unwrap().iter().map(|t| t.id()).collect();
    neighbors.sort();

    assert_eq!(
        neighbors,
        vec![TileId::new(0, 1), TileId::new(1, 0), TileId::new(2, 1)]
    );

    let corner = grid.tile(0, 0).unwrap();
    let corner_neighbors = corner.neighbors().await.unwrap();
    assert_eq!(corner_neighbors.len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_latency_with_progress() {
    let grid = Grid::parse("@...\n....").unwrap();
    grid.set_latency(Duration::from_millis(2));

    let engine = Floodfiller::with_parallelism(4);
    let mut progress_rx = engine.subscribe();
    let summary = engine.run(grid.starts()).await.unwrap();

    assert_eq!(summary.visited, 8);
    assert!(summary.elapsed >= Duration::from_millis(2));

    let mut last = None;
    while let Ok(progress) = progress_rx.try_recv() {
        last = Some(progress);
    }
    assert_eq!(last.unwrap().visited, 8);
}

#[test]
fn test_load_from_file() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path().join("maze.txt");
    std::fs::write(&path, "#@#\n#.#\n").unwrap();

    let grid = Grid::load(&path).unwrap();
    assert_eq!(grid.height(), 2);
    assert_eq!(grid.starts().len(), 1);

    let missing = Grid::load(temp.path().join("missing.txt")).unwrap_err();
    assert!(matches!(missing, GridError::Io { .. }));
}
