//! Laser Reflect native entry point
//!
//! Fires a sample puzzle and prints the board with the beam drawn in.
//! Set `LASER_REFLECT_SETTINGS` to a JSON file to override trace settings.

use glam::IVec2;

use laser_reflect::Settings;
use laser_reflect::sim::{
    Direction, Emitter, FireResult, Grid, GridConfig, MirrorInventory, MirrorKind, Session,
};

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Laser Reflect (native) starting...");

    let settings = match std::env::var("LASER_REFLECT_SETTINGS") {
        Ok(path) => Settings::load(path),
        Err(_) => Settings::default(),
    };

    if let Err(e) = run(settings) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on wasm; the host page drives the core directly
}

#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
fn run(settings: Settings) -> laser_reflect::Result<()> {
    let grid = Grid::from_config(&GridConfig {
        size: 8,
        blockers: vec![IVec2::new(3, 3), IVec2::new(4, 4)],
        targets: vec![IVec2::new(7, 6)],
        emitters: vec![Emitter::new(IVec2::new(0, 1), Direction::Right)],
        ..Default::default()
    })?;
    let mut session = Session::new(grid, MirrorInventory::new(3, 1), settings);

    let first = session.place_mirror(MirrorKind::BackSlash, IVec2::new(5, 1))?;
    // Down column 5 misses the target; slide the mirror to the last column
    session.move_mirror(first, IVec2::new(7, 1))?;
    let stray = session.place_mirror(MirrorKind::ForwardSlash, IVec2::new(2, 6))?;
    session.remove_mirror(stray)?;

    let result = session.fire()?.clone();
    println!("{}", draw(session.grid(), &result));

    let (hit, total) = session.hit_counter();
    println!("Targets: {}/{}", hit, total);
    for event in session.update(session.settings().fire_duration_secs) {
        println!("{:?}", event);
    }
    Ok(())
}

/// Text board: `L` laser, `T`/`*` target missed/hit, `#` blocker, mirrors as
/// `/` and `\`, beam cells as `-` or `|`
#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
fn draw(grid: &Grid, result: &FireResult) -> String {
    let size = grid.size() as usize;
    let mut rows = vec![vec!['.'; size]; size];
    let mut put = |cell: IVec2, c: char| {
        if grid.in_bounds(cell) {
            rows[cell.y as usize][cell.x as usize] = c;
        }
    };

    for trace in &result.traces {
        for sample in &trace.path {
            let c = match sample.direction {
                Direction::Left | Direction::Right => '-',
                Direction::Up | Direction::Down => '|',
            };
            put(sample.cell, c);
        }
    }
    for cell in grid.blockers() {
        put(cell, '#');
    }
    for mirror in grid.mirrors() {
        put(mirror.cell, mirror.kind.glyph());
    }
    for (i, &cell) in grid.targets().iter().enumerate() {
        put(cell, if result.hit_targets.contains(&i) { '*' } else { 'T' });
    }
    for emitter in grid.emitters() {
        put(emitter.origin, 'L');
    }

    rows.into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
