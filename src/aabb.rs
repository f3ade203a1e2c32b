//! Axis aligned bounding boxes stored as center + half-extents.
//!
//! A default constructed [`Aabb`] has `calculated == false` and is the
//! "no region" sentinel: [`Aabb::intersection`] returns it when two boxes do
//! not overlap, and every containment test against it answers `false`.

use crate::float_types::{AABB_INFLATION, Real};
use nalgebra::{Point3, Vector3};

/// One of the eight sub-cubes of a box, named by the sign of x, y and z
/// relative to the parent's center (`p` = positive, `n` = negative).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Octant {
    Ppp = 0,
    Npp = 1,
    Pnp = 2,
    Nnp = 3,
    Ppn = 4,
    Npn = 5,
    Pnn = 6,
    Nnn = 7,
}

/// Sign pattern of every octant, indexed by `Octant as usize`.
pub const OCTANT_SIGNS: [[Real; 3]; 8] = [
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
    [1.0, -1.0, 1.0],
    [-1.0, -1.0, 1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [1.0, -1.0, -1.0],
    [-1.0, -1.0, -1.0],
];

impl Octant {
    /// All octants in table order.
    pub const ALL: [Octant; 8] = [
        Octant::Ppp,
        Octant::Npp,
        Octant::Pnp,
        Octant::Nnp,
        Octant::Ppn,
        Octant::Npn,
        Octant::Pnn,
        Octant::Nnn,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Unit sign vector pointing from the parent center into this octant.
    #[inline]
    pub fn direction(self) -> Vector3<Real> {
        let [x, y, z] = OCTANT_SIGNS[self.index()];
        Vector3::new(x, y, z)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    /// Center of the box
    pub origin: Point3<Real>,
    /// Half-extents, all components >= 0
    pub half_extents: Vector3<Real>,
    /// `false` marks the empty sentinel
    pub calculated: bool,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb {
    /// The "no region" sentinel.
    #[inline]
    pub fn empty() -> Self {
        Self {
            origin: Point3::origin(),
            half_extents: Vector3::zeros(),
            calculated: false,
        }
    }

    /// A box with exactly the given center and half-extents (no inflation).
    #[inline]
    pub fn new(origin: Point3<Real>, half_extents: Vector3<Real>) -> Self {
        Self {
            origin,
            half_extents: half_extents.abs(),
            calculated: true,
        }
    }

    /// Box spanning `mins..maxs`, half-extents inflated by [`AABB_INFLATION`].
    pub fn from_min_max(mins: Point3<Real>, maxs: Point3<Real>) -> Self {
        let half = (maxs - mins) * 0.5;
        Self {
            origin: mins + half,
            half_extents: half.abs() * AABB_INFLATION,
            calculated: true,
        }
    }

    /// Tight box around `points`, inflated by [`AABB_INFLATION`].
    /// Returns the sentinel when `points` is empty.
    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Point3<Real>>,
    {
        let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
        let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
        let mut any = false;
        for p in points {
            any = true;
            mins = mins.inf(p);
            maxs = maxs.sup(p);
        }
        if !any {
            return Self::empty();
        }
        Self::from_min_max(mins, maxs)
    }

    #[inline]
    pub fn mins(&self) -> Point3<Real> {
        self.origin - self.half_extents
    }

    #[inline]
    pub fn maxs(&self) -> Point3<Real> {
        self.origin + self.half_extents
    }

    /// Axis aligned overlap of two boxes.
    ///
    /// Returns the sentinel if either box is the sentinel or if the overlap is
    /// empty on any axis (`new_min >= new_max`). Touching boxes do not overlap.
    pub fn intersection(&self, other: &Aabb) -> Aabb {
        if !self.calculated || !other.calculated {
            return Aabb::empty();
        }
        let new_max = self.maxs().inf(&other.maxs());
        let new_min = self.mins().sup(&other.mins());

        for i in 0..3 {
            if new_min[i] >= new_max[i] {
                return Aabb::empty();
            }
        }

        Aabb::from_min_max(new_min, new_max)
    }

    /// Inclusive overlap test: boxes that only touch, or flat boxes lying on
    /// a face of the other, still overlap. Never `true` for the sentinel.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        if !self.calculated || !other.calculated {
            return false;
        }
        let d = (self.origin - other.origin).abs();
        let reach = self.half_extents + other.half_extents;
        d.x <= reach.x && d.y <= reach.y && d.z <= reach.z
    }

    /// `true` iff `p` lies within the half-extents on all three axes (inclusive).
    #[inline]
    pub fn contains_point(&self, p: &Point3<Real>) -> bool {
        self.calculated
            && (self.origin.x - p.x).abs() <= self.half_extents.x
            && (self.origin.y - p.y).abs() <= self.half_extents.y
            && (self.origin.z - p.z).abs() <= self.half_extents.z
    }

    /// Containment of another box, judged on its two diagonal corners only.
    ///
    /// With `completely` both corners must be inside, otherwise one suffices.
    /// This is a conservative pre-filter, not an exact overlap test.
    pub fn contains_aabb(&self, other: &Aabb, completely: bool) -> bool {
        if !self.calculated || !other.calculated {
            return false;
        }
        let hi = self.contains_point(&other.maxs());
        let lo = self.contains_point(&other.mins());
        if completely { hi && lo } else { hi || lo }
    }

    /// Sub-box occupying `octant`: half of this box's extents, offset from the
    /// center along the octant's sign pattern.
    pub fn octant_region(&self, octant: Octant) -> Aabb {
        let half = self.half_extents * 0.5;
        Aabb {
            origin: self.origin + half.component_mul(&octant.direction()),
            half_extents: half,
            calculated: self.calculated,
        }
    }

    /// The unique octant of this box that completely contains `candidate`.
    ///
    /// `None` if the candidate is not inside this box at all, or if zero or
    /// several octants contain it (it straddles a splitting plane).
    pub fn octant_of(&self, candidate: &Aabb) -> Option<Octant> {
        if !self.contains_aabb(candidate, true) {
            return None;
        }
        let mut found = None;
        for octant in Octant::ALL {
            if self.octant_region(octant).contains_aabb(candidate, true) {
                if found.is_some() {
                    return None;
                }
                found = Some(octant);
            }
        }
        found
    }

    /// Converts into parry's min/max representation.
    pub fn to_parry(&self) -> crate::float_types::parry3d::bounding_volume::Aabb {
        crate::float_types::parry3d::bounding_volume::Aabb::new(self.mins(), self.maxs())
    }
}
