use pathgrid_navigation::{GridCoordinate, Pathfinder, PathfinderConfig, WorldPosition};
use std::collections::HashSet;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Obstacle layout, one string per row (z), '#' = blocked
    let rows = [
        "..........",
        ".##....##.",
        "....#.....",
        "..####.#..",
        ".....#.#..",
        ".###.#.##.",
        "...#......",
        ".#.#.###..",
        ".#......#.",
        "...###....",
    ];
    let (width, height) = (rows[0].len() as i32, rows.len() as i32);

    // Cells are one world unit apart, so world x/z are the grid indices.
    let oracle = |p: &WorldPosition| {
        rows.get(p.z.round() as usize)
            .and_then(|row| row.as_bytes().get(p.x.round() as usize))
            .is_some_and(|&cell| cell == b'#')
    };
    let pathfinder = Pathfinder::new(PathfinderConfig::new(width, height, 1.0), &oracle)?;

    let start = GridCoordinate::new(0, 0);
    let goal = GridCoordinate::new(9, 9);

    println!("Grid:");
    print_grid(&pathfinder, start, goal, &HashSet::new())?;
    println!("\nStart: {}, Goal: {}", start, goal);

    let result = pathfinder.find_path(start, goal)?;
    println!("{}", result);

    if let Some(path) = result.path() {
        let path_set: HashSet<GridCoordinate> = path.iter().copied().collect();
        println!("\nGrid with path:");
        print_grid(&pathfinder, start, goal, &path_set)?;
    } else {
        println!("\nNo path found.");
    }

    Ok(())
}

fn print_grid(
    pathfinder: &Pathfinder,
    start: GridCoordinate,
    goal: GridCoordinate,
    path: &HashSet<GridCoordinate>,
) -> Result<(), Box<dyn std::error::Error>> {
    for z in 0..pathfinder.grid().height() {
        for x in 0..pathfinder.grid().width() {
            let cell = GridCoordinate::new(x, z);
            if cell == start {
                print!("S ");
            } else if cell == goal {
                print!("G ");
            } else if path.contains(&cell) {
                print!("* ");
            } else if !pathfinder.is_walkable(cell)? {
                print!("X ");
            } else {
                print!(". ");
            }
        }
        println!();
    }
    Ok(())
}
