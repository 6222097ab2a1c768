//! A single element of the lattice cube.

use std::f32::consts::FRAC_PI_2;

use cgmath::{Matrix3, Matrix4, Rad, SquareMatrix, Vector3};

use super::face::Face;

/// Values fed to the cell shader every frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CellUniforms {
    /// Seconds of animation time, drives the rainbow palette.
    pub time: f32,
    /// The centre cell draws its face border inverted.
    pub is_centre: bool,
}

impl CellUniforms {
    /// Packs the uniforms into the per-object parameter slot.
    pub fn to_params(self) -> [f32; 4] {
        [self.time, if self.is_centre { 1.0 } else { 0.0 }, 0.0, 0.0]
    }
}

/// A unit cube of the lattice with its own animation bookkeeping.
#[derive(Debug, Clone)]
pub struct Cell {
    spawn_transform: Matrix4<f32>,
    size: f32,
    position: Vector3<f32>,
    rotation: Matrix3<f32>,
    animating: bool,
    turn_angle: f32,
    explode_distance: f32,
    explode_direction: Vector3<f32>,
    face: Option<Face>,
    pub uniforms: CellUniforms,
}

impl Cell {
    /// Creates a cell placed by `spawn_transform`.
    pub fn new(spawn_transform: Matrix4<f32>, size: f32) -> Self {
        let position = spawn_transform.w.truncate();
        let rotation = Matrix3::from_cols(
            spawn_transform.x.truncate(),
            spawn_transform.y.truncate(),
            spawn_transform.z.truncate(),
        );

        Self {
            spawn_transform,
            size,
            position,
            rotation,
            animating: false,
            turn_angle: 0.0,
            explode_distance: size,
            explode_direction: position,
            face: None,
            uniforms: CellUniforms::default(),
        }
    }

    pub fn spawn_transform(&self) -> Matrix4<f32> {
        self.spawn_transform
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn rotation(&self) -> Matrix3<f32> {
        self.rotation
    }

    /// XYZ Euler angles of the current orientation, in radians.
    pub fn euler(&self) -> [f32; 3] {
        euler_xyz(&self.rotation)
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Face being turned, only while animating.
    pub fn face(&self) -> Option<Face> {
        if self.animating {
            self.face
        } else {
            None
        }
    }

    /// Degrees turned so far in the current turn.
    pub fn turn_angle(&self) -> f32 {
        self.turn_angle
    }

    pub fn explode_distance(&self) -> f32 {
        self.explode_distance
    }

    pub fn explode_direction(&self) -> Vector3<f32> {
        self.explode_direction
    }

    /// Model matrix: translation, then orientation. The mesh is built at
    /// the cell's size.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position) * Matrix4::from(self.rotation)
    }

    /// Marks the cell as part of a turn about `face`.
    pub fn begin_turn(&mut self, face: Face) {
        self.animating = true;
        self.face = Some(face);
    }

    /// Rotates the cell about the world origin.
    ///
    /// Both position and orientation change, as when the mesh matrix is
    /// pre-multiplied by `rotation`.
    pub fn rotate_about_origin(&mut self, rotation: Matrix3<f32>) {
        self.position = rotation * self.position;
        self.rotation = rotation * self.rotation;
    }

    /// Adds `degrees` to the accumulated turn angle and returns the total.
    pub fn accumulate_turn(&mut self, degrees: f32) -> f32 {
        self.turn_angle += degrees;
        self.turn_angle
    }

    /// Moves the cell by `offset` without touching its orientation.
    pub fn translate(&mut self, offset: Vector3<f32>) {
        self.position += offset;
    }

    /// Adds `amount` to the explode distance and returns the total.
    pub fn accumulate_explode(&mut self, amount: f32) -> f32 {
        self.explode_distance += amount;
        self.explode_distance
    }

    /// Restores the explode distance to the cell size.
    pub fn reset_explode_distance(&mut self) {
        self.explode_distance = self.size;
    }

    /// Snaps the position onto the integer lattice.
    pub fn reset_position(&mut self) {
        self.position = self.position.map(f32::round);
        self.animating = false;
    }

    /// Snaps each Euler angle to a quarter turn and refreshes the explode
    /// direction from the current position.
    pub fn reset_rotation(&mut self) {
        let [x, y, z] = euler_xyz(&self.rotation);
        let snapped = rotation_from_euler_xyz([snap_quarter(x), snap_quarter(y), snap_quarter(z)]);
        // A quarter-turn rotation only has -1, 0 or 1 entries.
        self.rotation = Matrix3::from_cols(
            snapped.x.map(f32::round),
            snapped.y.map(f32::round),
            snapped.z.map(f32::round),
        );

        let size = self.size;
        self.explode_direction = self.position.map(|c| c.clamp(-size, size).round());

        self.animating = false;
        self.turn_angle = 0.0;
        self.face = None;
    }
}

fn snap_quarter(angle: f32) -> f32 {
    FRAC_PI_2 * (angle / FRAC_PI_2).round()
}

/// Decomposes a rotation matrix into XYZ Euler angles (radians).
///
/// Follows the `R = Rx * Ry * Rz` convention; at the poles of `y` the whole
/// remaining rotation is carried by `x`.
pub fn euler_xyz(m: &Matrix3<f32>) -> [f32; 3] {
    // cgmath indexes columns first: m.z.x is row 0, column 2.
    let m11 = m.x.x;
    let m12 = m.y.x;
    let m13 = m.z.x;
    let m22 = m.y.y;
    let m23 = m.z.y;
    let m32 = m.y.z;
    let m33 = m.z.z;

    let y = m13.clamp(-1.0, 1.0).asin();
    if m13.abs() < 0.999_999 {
        [(-m23).atan2(m33), y, (-m12).atan2(m11)]
    } else {
        [m32.atan2(m22), y, 0.0]
    }
}

/// Builds `Rx * Ry * Rz` from XYZ Euler angles (radians).
pub fn rotation_from_euler_xyz(angles: [f32; 3]) -> Matrix3<f32> {
    Matrix3::from_angle_x(Rad(angles[0]))
        * Matrix3::from_angle_y(Rad(angles[1]))
        * Matrix3::from_angle_z(Rad(angles[2]))
}

impl Default for Cell {
    fn default() -> Self {
        Self::new(Matrix4::identity(), 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, InnerSpace};

    const EPS: f32 = 1e-4;

    fn is_quarter_multiple(angle: f32) -> bool {
        let turns = angle / FRAC_PI_2;
        (turns - turns.round()).abs() < EPS
    }

    #[test]
    fn test_cell_starts_at_spawn_translation() {
        let cell = Cell::new(Matrix4::from_translation(Vector3::new(2.0, -2.0, 0.0)), 2.0);
        assert_eq!(cell.position(), Vector3::new(2.0, -2.0, 0.0));
        assert_eq!(cell.explode_direction(), Vector3::new(2.0, -2.0, 0.0));
        assert_eq!(cell.explode_distance(), 2.0);
        assert!(!cell.is_animating());
        assert!(cell.face().is_none());
    }

    #[test]
    fn test_reset_position_snaps_to_integers() {
        let mut cell = Cell::new(Matrix4::from_translation(Vector3::new(2.0, 0.0, 2.0)), 2.0);
        cell.begin_turn(Face::U);
        cell.rotate_about_origin(Matrix3::from_angle_y(Deg(93.7)));
        cell.reset_position();

        let p = cell.position();
        for c in [p.x, p.y, p.z] {
            assert!((c - c.round()).abs() < EPS, "{c} is not on the lattice");
        }
        assert!(!cell.is_animating());
    }

    #[test]
    fn test_reset_rotation_snaps_euler_angles() {
        let axes = [
            Vector3::unit_x(),
            Vector3::unit_y(),
            Vector3::unit_z(),
            -Vector3::unit_x(),
        ];
        let angles = [91.3, 88.2, 181.0, 269.5, 47.0];

        for axis in axes {
            for degrees in angles {
                let mut cell = Cell::default();
                cell.rotate_about_origin(Matrix3::from_axis_angle(axis.normalize(), Deg(degrees)));
                cell.rotate_about_origin(Matrix3::from_angle_x(Deg(92.0)));
                cell.reset_rotation();

                for angle in cell.euler() {
                    assert!(is_quarter_multiple(angle), "{angle} rad after snapping");
                }
            }
        }
    }

    #[test]
    fn test_reset_rotation_recomputes_explode_direction() {
        let mut cell = Cell::new(Matrix4::from_translation(Vector3::new(2.0, 2.0, 0.0)), 2.0);
        cell.begin_turn(Face::U);
        cell.accumulate_turn(95.0);
        cell.rotate_about_origin(Matrix3::from_angle_y(Deg(95.0)));
        cell.reset_rotation();

        assert_eq!(cell.explode_direction(), Vector3::new(0.0, 2.0, -2.0));
        assert_eq!(cell.turn_angle(), 0.0);
        assert!(!cell.is_animating());
        assert!(cell.face().is_none());
    }

    #[test]
    fn test_explode_direction_is_clamped_to_size() {
        let mut cell = Cell::new(Matrix4::from_translation(Vector3::new(4.3, -3.8, 0.2)), 2.0);
        cell.reset_rotation();
        assert_eq!(cell.explode_direction(), Vector3::new(2.0, -2.0, 0.0));
    }

    #[test]
    fn test_euler_round_trip() {
        let angles = [0.3, -0.7, 1.1];
        let back = euler_xyz(&rotation_from_euler_xyz(angles));
        for (a, b) in angles.iter().zip(back.iter()) {
            assert!((a - b).abs() < EPS);
        }
    }

    #[test]
    fn test_centre_flag_packs_into_params() {
        let uniforms = CellUniforms {
            time: 1.5,
            is_centre: true,
        };
        assert_eq!(uniforms.to_params(), [1.5, 1.0, 0.0, 0.0]);
    }
}
