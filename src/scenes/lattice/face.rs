//! Face labels of the lattice cube and their normal table.

use cgmath::Vector3;
use rand::Rng;

/// World axis a face normal points along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Component of `v` along this axis.
    pub fn component(self, v: Vector3<f32>) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }
}

/// One of the six symbolic cube faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    /// -x
    L,
    /// +x
    R,
    /// -y
    D,
    /// +y
    U,
    /// -z
    B,
    /// +z
    F,
}

impl Face {
    /// Face list in selection order.
    pub const ALL: [Face; 6] = [Face::L, Face::R, Face::D, Face::U, Face::B, Face::F];

    /// Axis and sign of the face normal.
    pub fn normal_entry(self) -> (Axis, f32) {
        match self {
            Face::L => (Axis::X, -1.0),
            Face::R => (Axis::X, 1.0),
            Face::D => (Axis::Y, -1.0),
            Face::U => (Axis::Y, 1.0),
            Face::B => (Axis::Z, -1.0),
            Face::F => (Axis::Z, 1.0),
        }
    }

    pub fn axis(self) -> Axis {
        self.normal_entry().0
    }

    pub fn sign(self) -> f32 {
        self.normal_entry().1
    }

    /// Outward unit normal, used as the rotation axis when turning.
    pub fn normal(self) -> Vector3<f32> {
        let (axis, sign) = self.normal_entry();
        match axis {
            Axis::X => Vector3::new(sign, 0.0, 0.0),
            Axis::Y => Vector3::new(0.0, sign, 0.0),
            Axis::Z => Vector3::new(0.0, 0.0, sign),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Face::L => "L",
            Face::R => "R",
            Face::D => "D",
            Face::U => "U",
            Face::B => "B",
            Face::F => "F",
        }
    }

    /// Whether a cell at `position` lies in this face's layer.
    ///
    /// The rounded coordinate along the face axis is compared against the
    /// signed boundary `sign * cell_size`: `<=` for negative faces, `>=` for
    /// positive ones.
    pub fn contains(self, position: Vector3<f32>, cell_size: f32) -> bool {
        let (axis, sign) = self.normal_entry();
        let coordinate = axis.component(position).round();
        let boundary = sign * cell_size;
        if sign < 0.0 {
            coordinate <= boundary
        } else {
            coordinate >= boundary
        }
    }

    /// Picks a face at random.
    ///
    /// The draw range stops one short of the list, so `F` is never chosen.
    /// Kept as-is: the lattice animation has always turned with this bias.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Face {
        Face::ALL[rng.random_range(0..Face::ALL.len() - 1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_normals_are_unit_and_opposed() {
        for face in Face::ALL {
            let n = face.normal();
            assert_eq!(n.x.abs() + n.y.abs() + n.z.abs(), 1.0);
        }
        assert_eq!(Face::L.normal(), -Face::R.normal());
        assert_eq!(Face::D.normal(), -Face::U.normal());
        assert_eq!(Face::B.normal(), -Face::F.normal());
    }

    #[test]
    fn test_layer_membership() {
        let size = 2.0;
        assert!(Face::R.contains(Vector3::new(2.0, 0.0, 0.0), size));
        assert!(Face::R.contains(Vector3::new(1.6, -2.0, 2.0), size));
        assert!(!Face::R.contains(Vector3::new(0.0, 2.0, 2.0), size));
        assert!(Face::L.contains(Vector3::new(-2.0, 2.0, 0.0), size));
        assert!(!Face::L.contains(Vector3::new(-0.4, 0.0, 0.0), size));
        assert!(Face::B.contains(Vector3::new(0.0, 0.0, -4.0), size));
        assert!(Face::U.contains(Vector3::new(0.0, 3.9, 0.0), size));
    }

    #[test]
    fn test_random_face_never_picks_front() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [false; 6];
        for _ in 0..2000 {
            let face = Face::random(&mut rng);
            assert_ne!(face, Face::F);
            let index = Face::ALL.iter().position(|f| *f == face).unwrap();
            seen[index] = true;
        }
        assert_eq!(seen, [true, true, true, true, true, false]);
    }
}
