//! The 3×3×3 lattice and its turn/explode state machine.

use cgmath::{Deg, Matrix3, Matrix4, Vector3};
use log::debug;
use rand::Rng;

use super::cell::Cell;
use super::face::Face;

/// Number of cells along each edge of the lattice.
pub const LATTICE_EDGE: usize = 3;
/// Index of the cell at the centre of the lattice.
pub const CENTRE_CELL: usize = 13;

/// What the cube is doing this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeState {
    Idle,
    TurningFace,
    TurningWhole,
    Exploding,
}

/// Tunables shared by every cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubeSettings {
    /// Turn speed in degrees per second; explode speed is `speed / 45`.
    pub speed: f32,
    /// Percentage of idle draws that start an explode cycle.
    pub explode_chance: u32,
    /// Draws below this (and not exploding) turn a face; the rest turn the cube.
    pub turn_face_chance: u32,
    /// An explode cycle ends at `max_explode_factor * cell_size`.
    pub max_explode_factor: f32,
}

impl Default for CubeSettings {
    fn default() -> Self {
        Self {
            speed: 200.0,
            explode_chance: 10,
            turn_face_chance: 60,
            max_explode_factor: 2.0,
        }
    }
}

pub struct Cube {
    cell_size: f32,
    cells: Vec<Cell>,
    state: CubeState,
    pub auto_transform: bool,
    turn_direction: f32,
    explode_direction: f32,
    pub settings: CubeSettings,
}

impl Cube {
    /// Builds the lattice around `origin`, cells ordered x, then y, then z.
    pub fn new(origin: Vector3<f32>, cell_size: f32) -> Self {
        let half = (LATTICE_EDGE / 2) as i32;
        let mut cells = Vec::with_capacity(LATTICE_EDGE.pow(3));

        for x in -half..=half {
            for y in -half..=half {
                for z in -half..=half {
                    let offset = Vector3::new(x as f32, y as f32, z as f32) * cell_size;
                    let spawn = Matrix4::from_translation(origin + offset);
                    cells.push(Cell::new(spawn, cell_size));
                }
            }
        }
        cells[CENTRE_CELL].uniforms.is_centre = true;

        Self {
            cell_size,
            cells,
            state: CubeState::Idle,
            auto_transform: false,
            turn_direction: -1.0,
            explode_direction: 1.0,
            settings: CubeSettings::default(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn state(&self) -> CubeState {
        self.state
    }

    pub fn is_exploding(&self) -> bool {
        self.state == CubeState::Exploding
    }

    pub fn is_turning(&self) -> bool {
        matches!(self.state, CubeState::TurningFace | CubeState::TurningWhole)
    }

    /// +1 for clockwise, -1 for counter-clockwise.
    pub fn turn_direction(&self) -> f32 {
        self.turn_direction
    }

    /// +1 while the next cycle moves outwards, -1 while it implodes.
    pub fn explode_direction(&self) -> f32 {
        self.explode_direction
    }

    /// Advances the cube by `delta` seconds.
    pub fn update<R: Rng + ?Sized>(&mut self, delta: f32, rng: &mut R) {
        for cell in &mut self.cells {
            cell.uniforms.time += delta;
        }

        if self.auto_transform {
            self.auto_transform(rng);
        }

        match self.state {
            CubeState::Exploding => self.explode(delta),
            CubeState::TurningFace | CubeState::TurningWhole => self.turn(delta),
            CubeState::Idle => {}
        }
    }

    /// Starts a random transformation if the cube is idle.
    pub fn auto_transform<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.state != CubeState::Idle {
            return;
        }

        let draw = rng.random_range(0..100u32);
        if draw < self.settings.explode_chance {
            self.start_explode();
        } else if draw < self.settings.turn_face_chance {
            self.turn_face(rng);
        } else {
            self.turn_cube(rng);
        }
    }

    /// Turns a random face in a random direction.
    pub fn turn_face<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let face = Face::random(rng);
        let direction = random_direction(rng);
        self.turn_face_with(face, direction);
    }

    /// Marks every cell in `face`'s layer as turning about that face.
    pub fn turn_face_with(&mut self, face: Face, direction: f32) {
        self.state = CubeState::TurningFace;
        self.turn_direction = direction.signum();

        let mut marked = 0;
        for cell in &mut self.cells {
            if face.contains(cell.position(), cell.size()) {
                cell.begin_turn(face);
                marked += 1;
            }
        }
        debug!(
            "turning face {} ({} cells, direction {})",
            face.label(),
            marked,
            self.turn_direction
        );
    }

    /// Turns the whole cube about a random face axis.
    pub fn turn_cube<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let face = Face::random(rng);
        let direction = random_direction(rng);
        self.turn_cube_with(face, direction);
    }

    /// Marks every cell as turning about `face`'s normal.
    ///
    /// Each cell rotates about the world origin, not a shared pivot of the
    /// lattice.
    pub fn turn_cube_with(&mut self, face: Face, direction: f32) {
        self.state = CubeState::TurningWhole;
        self.turn_direction = direction.signum();

        for cell in &mut self.cells {
            cell.begin_turn(face);
        }
        debug!(
            "turning cube about {} (direction {})",
            face.label(),
            self.turn_direction
        );
    }

    /// Starts an explode (or implode) cycle.
    pub fn start_explode(&mut self) {
        self.state = CubeState::Exploding;
        debug!(
            "{} cycle started",
            if self.explode_direction > 0.0 { "explode" } else { "implode" }
        );
    }

    /// GUI trigger: turns a random face when idle.
    pub fn request_turn_face<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.state != CubeState::Idle {
            return false;
        }
        self.turn_face(rng);
        true
    }

    /// GUI trigger: turns the whole cube when idle.
    pub fn request_turn_cube<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.state != CubeState::Idle {
            return false;
        }
        self.turn_cube(rng);
        true
    }

    /// GUI trigger: starts an explode cycle when idle.
    pub fn request_explode(&mut self) -> bool {
        if self.state != CubeState::Idle {
            return false;
        }
        self.start_explode();
        true
    }

    fn turn(&mut self, delta: f32) {
        let step = delta * self.settings.speed;
        let angle = Deg(step * self.turn_direction);

        for cell in self.cells.iter_mut().filter(|cell| cell.is_animating()) {
            let Some(face) = cell.face() else {
                continue;
            };

            let accumulated = cell.accumulate_turn(step);
            cell.rotate_about_origin(Matrix3::from_axis_angle(face.normal(), angle));

            if accumulated.abs() >= 90.0 {
                cell.reset_rotation();
                cell.reset_position();
            }
        }

        if !self.cells.iter().any(Cell::is_animating) {
            self.state = CubeState::Idle;
        }
    }

    fn explode(&mut self, delta: f32) {
        let step = delta * (self.settings.speed / 45.0);
        let limit = self.settings.max_explode_factor * self.cell_size;

        let mut finished = false;
        for cell in &mut self.cells {
            let offset = cell.explode_direction() * (step * self.explode_direction);
            cell.translate(offset);
            if cell.accumulate_explode(step).abs() >= limit {
                finished = true;
            }
        }

        if finished {
            self.finish_explode();
        }
    }

    fn finish_explode(&mut self) {
        self.state = CubeState::Idle;
        self.explode_direction = -self.explode_direction;

        for cell in &mut self.cells {
            cell.reset_explode_distance();
        }
        debug!("explode cycle finished, next direction {}", self.explode_direction);
    }
}

fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    if rng.random_bool(0.5) {
        1.0
    } else {
        -1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    // Exactly representable, so accumulated angles carry no rounding error.
    const FRAME: f32 = 1.0 / 64.0;
    const EPS: f32 = 1e-4;

    fn cube() -> Cube {
        Cube::new(Vector3::new(0.0, 0.0, 0.0), 2.0)
    }

    fn run_until_idle(cube: &mut Cube, rng: &mut StdRng) -> usize {
        let mut frames = 0;
        while cube.state() != CubeState::Idle {
            cube.update(FRAME, rng);
            frames += 1;
            assert!(frames < 10_000, "cube never returned to idle");
        }
        frames
    }

    #[test]
    fn test_only_centre_cell_is_flagged() {
        let cube = cube();
        assert_eq!(cube.cells().len(), 27);
        for (i, cell) in cube.cells().iter().enumerate() {
            assert_eq!(cell.uniforms.is_centre, i == CENTRE_CELL, "cell {i}");
        }
        assert_eq!(cube.cells()[CENTRE_CELL].position(), Vector3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_turn_face_right_marks_right_layer() {
        let mut cube = cube();
        cube.turn_face_with(Face::R, 1.0);

        assert_eq!(cube.state(), CubeState::TurningFace);
        let mut marked = 0;
        for cell in cube.cells() {
            let on_layer = cell.position().x.round() >= cube.cell_size();
            assert_eq!(cell.is_animating(), on_layer);
            if on_layer {
                assert_eq!(cell.face(), Some(Face::R));
                marked += 1;
            }
        }
        assert_eq!(marked, 9);
    }

    #[test]
    fn test_turn_cube_marks_every_cell() {
        let mut cube = cube();
        cube.turn_cube_with(Face::U, -1.0);
        assert_eq!(cube.state(), CubeState::TurningWhole);
        assert!(cube.cells().iter().all(|c| c.face() == Some(Face::U)));
    }

    #[test]
    fn test_face_turn_completes_and_snaps() {
        let mut cube = cube();
        let mut rng = StdRng::seed_from_u64(1);
        cube.turn_face_with(Face::D, 1.0);

        let frames = run_until_idle(&mut cube, &mut rng);
        // 3.125 degrees per frame passes 90 on the 29th frame.
        assert_eq!(frames, 29);

        for cell in cube.cells() {
            assert!(!cell.is_animating());
            assert_eq!(cell.turn_angle(), 0.0);
            for angle in cell.euler() {
                let turns = angle / std::f32::consts::FRAC_PI_2;
                assert!((turns - turns.round()).abs() < EPS);
            }
            let p = cell.position();
            for c in [p.x, p.y, p.z] {
                assert!((c - c.round()).abs() < EPS);
            }
        }
    }

    #[test]
    fn test_face_turn_permutes_layer_positions() {
        let mut cube = cube();
        let mut rng = StdRng::seed_from_u64(2);
        let mut before: Vec<_> = cube
            .cells()
            .iter()
            .map(|c| c.position())
            .filter(|p| p.y <= -2.0)
            .map(|p| [p.x as i32, p.y as i32, p.z as i32])
            .collect();

        cube.turn_face_with(Face::D, -1.0);
        run_until_idle(&mut cube, &mut rng);

        let mut after: Vec<_> = cube
            .cells()
            .iter()
            .map(|c| c.position())
            .filter(|p| p.y <= -2.0)
            .map(|p| [p.x as i32, p.y as i32, p.z as i32])
            .collect();
        before.sort();
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    fn test_explode_cycles_alternate_direction() {
        let mut cube = cube();
        let mut rng = StdRng::seed_from_u64(3);
        let corner_start = cube.cells()[0].position();

        assert_eq!(cube.explode_direction(), 1.0);
        cube.start_explode();
        run_until_idle(&mut cube, &mut rng);
        assert_eq!(cube.explode_direction(), -1.0);
        for cell in cube.cells() {
            assert_eq!(cell.explode_distance(), cube.cell_size());
        }
        assert!(cube.cells()[0].position().x < corner_start.x);

        cube.start_explode();
        run_until_idle(&mut cube, &mut rng);
        assert_eq!(cube.explode_direction(), 1.0);
        for cell in cube.cells() {
            assert_eq!(cell.explode_distance(), cube.cell_size());
        }
        let back = cube.cells()[0].position();
        assert!((back.x - corner_start.x).abs() < 1e-3);
    }

    #[test]
    fn test_centre_cell_never_moves_when_exploding() {
        let mut cube = cube();
        let mut rng = StdRng::seed_from_u64(4);
        cube.start_explode();
        run_until_idle(&mut cube, &mut rng);
        assert_eq!(cube.cells()[CENTRE_CELL].position(), Vector3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_never_exploding_and_turning_at_once() {
        let mut cube = cube();
        let mut rng = StdRng::seed_from_u64(5);
        cube.auto_transform = true;

        let mut seen = [false; 3];
        for _ in 0..5_000 {
            cube.update(FRAME, &mut rng);
            assert!(!(cube.is_exploding() && cube.is_turning()));
            match cube.state() {
                CubeState::Exploding => seen[0] = true,
                CubeState::TurningFace => seen[1] = true,
                CubeState::TurningWhole => seen[2] = true,
                CubeState::Idle => {}
            }
        }
        assert_eq!(seen, [true, true, true]);
    }

    #[test]
    fn test_auto_transform_waits_for_idle() {
        let mut cube = cube();
        let mut rng = StdRng::seed_from_u64(6);
        cube.turn_face_with(Face::U, 1.0);
        let marked: Vec<bool> = cube.cells().iter().map(Cell::is_animating).collect();

        cube.auto_transform(&mut rng);
        assert_eq!(cube.state(), CubeState::TurningFace);
        let still: Vec<bool> = cube.cells().iter().map(Cell::is_animating).collect();
        assert_eq!(marked, still);
    }

    #[test]
    fn test_manual_requests_only_start_from_idle() {
        let mut cube = cube();
        let mut rng = StdRng::seed_from_u64(8);
        assert!(cube.request_explode());
        assert!(!cube.request_turn_face(&mut rng));
        assert!(!cube.request_turn_cube(&mut rng));
        assert_eq!(cube.state(), CubeState::Exploding);
    }

    #[test]
    fn test_time_uniform_advances_every_frame() {
        let mut cube = cube();
        let mut rng = StdRng::seed_from_u64(9);
        cube.update(0.25, &mut rng);
        cube.update(0.25, &mut rng);
        for cell in cube.cells() {
            assert!((cell.uniforms.time - 0.5).abs() < EPS);
        }
    }

    #[test]
    fn test_random_turns_go_both_ways() {
        let mut rng = StdRng::seed_from_u64(11);
        let draws: Vec<f32> = (0..64).map(|_| random_direction(&mut rng)).collect();
        assert!(draws.iter().all(|d| d.abs() == 1.0));
        assert!(draws.contains(&1.0));
        assert!(draws.contains(&-1.0));
    }
}
