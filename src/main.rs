use arboard::Clipboard;
use macroquad::prelude::*;
use sightcone::config::Config;
use sightcone::error::LevelError;
use sightcone::level::{grid_to_text, parse_text_level, Level};
use sightcone::{Agent, Grid, Point, Segment, SightMap, Tile, VisibilityFan};
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LEVEL: &str = "\
###################
#.......#.........#
#.......#.........#
#...s...#...###...#
#.................#
#.......#.........#
#####.###...#.....#
    #.#.....#.....#
    #.#######.....#
    #.............#
    ###############
";

/// Map-space to screen-space offset, passed to every draw call
#[derive(Debug, Clone, Copy)]
struct ViewTransform {
    offset_x: f32,
    offset_y: f32,
}

impl ViewTransform {
    /// Keep `focus` in the middle of the screen
    fn centered_on(focus: Point) -> Self {
        ViewTransform {
            offset_x: screen_width() / 2.0 - focus.x,
            offset_y: screen_height() / 2.0 - focus.y,
        }
    }

    fn to_screen(&self, p: Point) -> Vec2 {
        vec2(p.x + self.offset_x, p.y + self.offset_y)
    }

    fn to_map(&self, x: f32, y: f32) -> Point {
        Point::new(x - self.offset_x, y - self.offset_y)
    }
}

/// Load the configured level, falling back to the built-in one
fn load_level(config: &Config) -> Level {
    let cell_size = config.grid.cell_size;
    if config.level.path.is_empty() {
        return builtin_level(cell_size);
    }

    match read_level(Path::new(&config.level.path), cell_size) {
        Ok(level) => level,
        Err(e) => {
            warn!("Failed to load level {}: {}; using built-in level", config.level.path, e);
            builtin_level(cell_size)
        }
    }
}

fn read_level(path: &Path, cell_size: f32) -> Result<Level, LevelError> {
    if path.extension().and_then(|s| s.to_str()) == Some("json") {
        return Level::load_from_file(path);
    }
    let name = path
        .file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");
    parse_text_level(name, &fs::read_to_string(path)?, cell_size)
}

fn builtin_level(cell_size: f32) -> Level {
    match parse_text_level("builtin", DEFAULT_LEVEL, cell_size) {
        Ok(level) => level,
        Err(e) => {
            error!("Built-in level is invalid: {}", e);
            Level::from_grid("empty", &Grid::walled_room(8, 8), Point::new(cell_size * 4.5, cell_size * 4.5))
        }
    }
}

/// Viewer state
struct ViewState {
    config: Config,
    map: SightMap,
    agent: Agent,
    crosshair: Point,
    fan: VisibilityFan,
    show_edges: bool,
    show_rays: bool,
}

impl ViewState {
    fn new(config: Config) -> Self {
        let level = load_level(&config);
        let grid = match level.to_grid() {
            Ok(grid) => grid,
            Err(e) => {
                warn!("Level {} is invalid: {}", level.name, e);
                Grid::walled_room(8, 8)
            }
        };
        let map = SightMap::new(grid, config.grid.cell_size);
        let agent = Agent::new(level.player_position(), config.level.agent_speed);
        let crosshair = agent.position;

        let mut state = ViewState {
            show_edges: config.visual.show_edges,
            show_rays: config.visual.show_rays,
            config,
            map,
            agent,
            crosshair,
            fan: VisibilityFan {
                origin: crosshair,
                triangles: Vec::new(),
                rays: Vec::new(),
            },
        };
        state.update_visibility();
        state
    }

    fn update(&mut self, delta: f32) {
        let mut dx: f32 = 0.0;
        let mut dy: f32 = 0.0;
        if is_key_down(KeyCode::W) {
            dy -= 1.0;
        }
        if is_key_down(KeyCode::S) {
            dy += 1.0;
        }
        if is_key_down(KeyCode::A) {
            dx -= 1.0;
        }
        if is_key_down(KeyCode::D) {
            dx += 1.0;
        }
        if dx != 0.0 || dy != 0.0 {
            let len = (dx * dx + dy * dy).sqrt();
            let step = self.agent.speed * delta / len;
            self.try_move(dx * step, dy * step);
        }

        let transform = ViewTransform::centered_on(self.agent.position);
        let (mouse_x, mouse_y) = mouse_position();
        self.crosshair = transform.to_map(mouse_x, mouse_y);
        self.agent.aim_at(self.crosshair);

        if is_mouse_button_pressed(MouseButton::Left) {
            self.toggle_wall(self.crosshair);
        }

        self.update_visibility();
    }

    /// Move unless the new position lands in a blocking cell
    fn try_move(&mut self, dx: f32, dy: f32) {
        let cell_size = self.map.cell_size();
        let mut moved = self.agent.clone();
        moved.move_by(dx, dy);
        let (col, row) = moved.cell(cell_size);
        if self.map.grid().is_open(col, row) {
            self.agent = moved;
        }
    }

    fn toggle_wall(&mut self, at: Point) {
        let cell_size = self.map.cell_size();
        let col = (at.x / cell_size).floor() as i32;
        let row = (at.y / cell_size).floor() as i32;
        if self.agent.cell(cell_size) == (col, row) {
            return;
        }
        let tile = match self.map.grid().get_cell(col, row) {
            Tile::Floor => Tile::Wall,
            Tile::Wall => Tile::Floor,
            Tile::Void => return,
        };
        self.map.set_tile(col, row, tile);
    }

    fn update_visibility(&mut self) {
        match self.agent.cone(self.config.cone.half_angle) {
            Ok(cone) => self.fan = self.map.visibility(&cone, self.config.cone.ray_length),
            Err(e) => warn!("Skipping visibility: {}", e),
        }
    }

    fn copy_to_clipboard(&self) {
        let level_text = grid_to_text(self.map.grid(), Some(self.agent.cell(self.map.cell_size())));
        match Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(&level_text) {
                    warn!("Failed to copy to clipboard: {}", e);
                } else {
                    info!("Level layout copied to clipboard");
                    // Keep clipboard alive for a moment so clipboard managers can capture it
                    std::thread::sleep(std::time::Duration::from_millis(100));
                }
            }
            Err(e) => warn!("Failed to access clipboard: {}", e),
        }
    }

    fn draw(&self) {
        let visual = &self.config.visual;
        clear_background(Color::from_rgba(visual.background_r, visual.background_g, visual.background_b, 255));

        let transform = ViewTransform::centered_on(self.agent.position);
        draw_tiles(self.map.grid(), self.map.cell_size(), &transform);
        draw_fan(&self.fan, &transform);

        if self.show_rays {
            draw_rays(&self.fan, &transform);
        }
        if self.show_edges {
            for segment in &self.map.edges().segments {
                draw_dashed(segment, &transform, Color::new(1.0, 1.0, 0.0, 0.5));
            }
        }

        let agent = transform.to_screen(self.agent.position);
        draw_circle(agent.x, agent.y, 6.0, BLUE);

        // Crosshair turns green when it is inside the lit area
        let crosshair = transform.to_screen(self.crosshair);
        let crosshair_color = if self.fan.contains_point(self.crosshair) { GREEN } else { WHITE };
        draw_line(crosshair.x - 4.0, crosshair.y, crosshair.x + 4.0, crosshair.y, 1.0, crosshair_color);
        draw_line(crosshair.x, crosshair.y - 4.0, crosshair.x, crosshair.y + 4.0, 1.0, crosshair_color);

        let info = format!(
            "Edges: {}  Rays: {}  Facing: {:.1}",
            self.map.edges().len(),
            self.fan.rays.len(),
            self.agent.facing
        );
        draw_text(&info, 10.0, 20.0, 20.0, WHITE);
        draw_text(
            "WASD: move  Left click: toggle wall  E: edges  R: rays  C: copy level  Esc: quit",
            10.0,
            40.0,
            18.0,
            GRAY,
        );
    }
}

fn draw_tiles(grid: &Grid, cell_size: f32, transform: &ViewTransform) {
    for y in 0..grid.rows {
        for x in 0..grid.cols {
            let color = match grid.get_cell(x, y) {
                Tile::Wall => Color::from_rgba(90, 70, 60, 255),
                Tile::Floor => Color::from_rgba(40, 40, 45, 255),
                Tile::Void => continue,
            };
            let p = transform.to_screen(Point::new(x as f32 * cell_size, y as f32 * cell_size));
            draw_rectangle(p.x, p.y, cell_size, cell_size, color);
        }
    }
}

fn draw_fan(fan: &VisibilityFan, transform: &ViewTransform) {
    let fill = Color::new(0.2, 0.4, 1.0, 0.3);
    for triangle in &fan.triangles {
        draw_triangle(
            transform.to_screen(triangle.origin),
            transform.to_screen(triangle.previous),
            transform.to_screen(triangle.current),
            fill,
        );
    }
}

fn draw_rays(fan: &VisibilityFan, transform: &ViewTransform) {
    let origin = transform.to_screen(fan.origin);
    for ray in &fan.rays {
        let end = transform.to_screen(ray.point);
        draw_line(origin.x, origin.y, end.x, end.y, 1.0, BLUE);
        if ray.blocked {
            draw_line(end.x - 6.0, end.y - 6.0, end.x + 6.0, end.y + 6.0, 1.0, GREEN);
            draw_line(end.x - 6.0, end.y + 6.0, end.x + 6.0, end.y - 6.0, 1.0, GREEN);
        }
    }
}

/// 4 on, 2 off
fn draw_dashed(segment: &Segment, transform: &ViewTransform, color: Color) {
    let start = transform.to_screen(segment.p1);
    let end = transform.to_screen(segment.p2);
    let length = start.distance(end);
    if length == 0.0 {
        return;
    }
    let dir = (end - start) / length;
    let mut t = 0.0;
    while t < length {
        let a = start + dir * t;
        let b = start + dir * (t + 4.0).min(length);
        draw_line(a.x, a.y, b.x, b.y, 1.0, color);
        t += 6.0;
    }
}

#[macroquad::main("Sightcone")]
async fn main() {
    let config = Config::load();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut state = ViewState::new(config.validated());

    loop {
        // Absorb lag spikes
        let delta = get_frame_time().min(0.5);

        if is_key_pressed(KeyCode::E) {
            state.show_edges = !state.show_edges;
        }
        if is_key_pressed(KeyCode::R) {
            state.show_rays = !state.show_rays;
        }
        if is_key_pressed(KeyCode::C) {
            state.copy_to_clipboard();
        }
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        state.update(delta);
        state.draw();

        next_frame().await
    }
}
