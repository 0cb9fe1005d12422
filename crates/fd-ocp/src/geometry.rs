//! Hexagonal voltage-limit geometry and its constraint encodings.
//!
//! The inverter can realize any voltage vector inside a regular hexagon with
//! circumradius u_max. Two encodings of that limit are produced from the same
//! scalar radius:
//!
//! - a linear polytope: the two slanted-edge inequality rows
//!   q1 <= u_q + m1*u_d <= -q1 and q1 <= u_q - m1*u_d <= -q1, plus a box
//!   bound |u_q| <= q2 for the horizontal edges;
//! - an inscribed disc: the convex quadratic phi(r) = r0^2 + r1^2 over the
//!   auxiliary vector r = u, bounded above by (u_max*sqrt(3)/2)^2, composed
//!   with the slanted-edge rows.

use crate::config::Formulation;
use crate::error::{OcpError, OcpResult};
use fd_core::{Real, Tolerances};
use nalgebra::{DMatrix, DVector};
use std::f64::consts::PI;

/// Effectively unbounded lower limit for the disc constraint.
const PHI_LOWER: Real = -1.0e8;

/// Edge parameters of the regular hexagon with circumradius `u_max`.
#[derive(Clone, Copy, Debug)]
pub struct HexagonGeometry {
    /// Circumradius (maximum per-axis actuation magnitude).
    pub u_max: Real,
    /// Slope of the slanted edges.
    pub m1: Real,
    /// Intercept of the slanted edges (negative).
    pub q1: Real,
    /// Half-width of the horizontal edges.
    pub q2: Real,
}

impl HexagonGeometry {
    /// Derive the edge parameters from the circumradius.
    ///
    /// The slanted-edge line is fixed by the two vertices (u_max, 0) and
    /// (u_max*cos(pi/3), u_max*sin(pi/3)).
    pub fn new(u_max: Real) -> OcpResult<Self> {
        if !u_max.is_finite() || u_max <= 0.0 {
            return Err(OcpError::Geometry {
                what: format!("circumradius must be positive and finite, got {u_max}"),
            });
        }

        let (x1, y1) = (u_max, 0.0);
        let (x2, y2) = (u_max * (PI / 3.0).cos(), u_max * (PI / 3.0).sin());

        let q1 = -(y2 - y1 / x1 * x2) / (1.0 - x2 / x1);
        let m1 = -(y1 + q1) / x1;
        let q2 = u_max * (PI / 3.0).sin();

        if q2 <= 0.0 || !m1.is_finite() {
            return Err(OcpError::Geometry {
                what: format!("hexagon with circumradius {u_max} is degenerate"),
            });
        }

        Ok(Self { u_max, m1, q1, q2 })
    }

    /// Radius of the disc inscribed in the hexagon.
    pub fn inscribed_radius(&self) -> Real {
        self.u_max * 3.0_f64.sqrt() / 2.0
    }
}

/// Linear part of the hexagon encoding: general rows lg <= D*u + C*x <= ug
/// plus a box bound on one control index.
#[derive(Clone, Debug, PartialEq)]
pub struct PolytopeBlock {
    /// Control coupling matrix of the general rows (2 x nu).
    pub d: DMatrix<Real>,
    /// State coupling matrix of the general rows (2 x nx, identically zero).
    pub c: DMatrix<Real>,
    /// Lower bounds of the general rows.
    pub lg: DVector<Real>,
    /// Upper bounds of the general rows.
    pub ug: DVector<Real>,
    /// Control index carrying the box bound.
    pub idxbu: usize,
    /// Box lower bound.
    pub lbu: Real,
    /// Box upper bound.
    pub ubu: Real,
}

impl PolytopeBlock {
    fn from_geometry(geo: &HexagonGeometry) -> Self {
        let d = DMatrix::from_row_slice(2, 2, &[geo.m1, 1.0, -geo.m1, 1.0]);
        let c = DMatrix::zeros(2, 2);
        let lg = DVector::from_vec(vec![geo.q1, geo.q1]);
        let ug = DVector::from_vec(vec![-geo.q1, -geo.q1]);
        Self {
            d,
            c,
            lg,
            ug,
            idxbu: 1,
            lbu: -geo.q2,
            ubu: geo.q2,
        }
    }

    fn contains(&self, u: &[Real], tol: Tolerances) -> bool {
        if u.len() < 2 {
            return false;
        }
        for row in 0..self.d.nrows() {
            let g = self.d[(row, 0)] * u[0] + self.d[(row, 1)] * u[1];
            let s = tol.slack(self.ug[row]);
            if g < self.lg[row] - s || g > self.ug[row] + s {
                return false;
            }
        }
        let ub = u[self.idxbu];
        let s = tol.slack(self.ubu);
        ub >= self.lbu - s && ub <= self.ubu + s
    }
}

/// Active encoding of the voltage limit; exactly one per problem instance.
#[derive(Clone, Debug, PartialEq)]
pub enum InputLimit {
    /// Pure linear polytope.
    Polytope(PolytopeBlock),
    /// Inscribed-disc quadratic bound composed with the slanted-edge rows.
    InscribedDisc {
        polytope: PolytopeBlock,
        /// Lower bound on phi(r) (effectively unbounded).
        lphi: Real,
        /// Upper bound on phi(r) = r0^2 + r1^2.
        uphi: Real,
    },
}

impl InputLimit {
    pub fn from_geometry(geo: &HexagonGeometry, formulation: Formulation) -> Self {
        let polytope = PolytopeBlock::from_geometry(geo);
        match formulation {
            Formulation::Polytope => InputLimit::Polytope(polytope),
            Formulation::InscribedDisc => {
                let r = geo.inscribed_radius();
                InputLimit::InscribedDisc {
                    polytope,
                    lphi: PHI_LOWER,
                    uphi: r * r,
                }
            }
        }
    }

    /// Linear constraint rows of the encoding.
    pub fn polytope(&self) -> &PolytopeBlock {
        match self {
            InputLimit::Polytope(p) => p,
            InputLimit::InscribedDisc { polytope, .. } => polytope,
        }
    }

    /// Membership test for a control vector, used by reporting. Slack scales
    /// with the bound magnitudes so vertex-tight points stay admissible.
    pub fn contains(&self, u: &[Real], tol: Tolerances) -> bool {
        match self {
            InputLimit::Polytope(p) => p.contains(u, tol),
            InputLimit::InscribedDisc {
                polytope,
                lphi,
                uphi,
            } => {
                if u.len() < 2 {
                    return false;
                }
                let phi = u[0] * u[0] + u[1] * u[1];
                phi >= *lphi && phi <= *uphi + tol.slack(*uphi) && polytope.contains(u, tol)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fd_core::nearly_equal;

    #[test]
    fn unit_hexagon_edge_parameters() {
        let tol = Tolerances::default();
        let geo = HexagonGeometry::new(1.0).unwrap();
        assert!((geo.q2 - (PI / 3.0).sin()).abs() < 1e-15);
        assert!(nearly_equal(geo.m1, 3.0_f64.sqrt(), tol));
        assert!(nearly_equal(geo.q1, -(3.0_f64.sqrt()), tol));
    }

    #[test]
    fn degenerate_radius_is_rejected() {
        assert!(HexagonGeometry::new(0.0).is_err());
        assert!(HexagonGeometry::new(-1.0).is_err());
        assert!(HexagonGeometry::new(f64::NAN).is_err());
    }

    #[test]
    fn vertex_lies_on_the_boundary() {
        // (u_max, 0) is a hexagon vertex: both slanted rows are tight there.
        let u_max = 1.0;
        let geo = HexagonGeometry::new(u_max).unwrap();
        let block = PolytopeBlock::from_geometry(&geo);

        let g0 = block.d[(0, 0)] * u_max + block.d[(0, 1)] * 0.0;
        let g1 = block.d[(1, 0)] * u_max + block.d[(1, 1)] * 0.0;
        assert!((g0 - block.ug[0]).abs() < 1e-12);
        assert!((g1 - block.lg[1]).abs() < 1e-12);

        let tol = Tolerances::default();
        assert!(block.contains(&[u_max, 0.0], tol));
        assert!(!block.contains(&[2.0 * u_max, 0.0], tol));
    }

    #[test]
    fn disc_bound_uses_inscribed_radius() {
        let geo = HexagonGeometry::new(2.0).unwrap();
        let limit = InputLimit::from_geometry(&geo, Formulation::InscribedDisc);
        match &limit {
            InputLimit::InscribedDisc { uphi, .. } => {
                let r = 2.0 * 3.0_f64.sqrt() / 2.0;
                assert!((uphi - r * r).abs() < 1e-12);
            }
            InputLimit::Polytope(_) => panic!("expected disc formulation"),
        }

        // A point inside the disc is admissible, a hexagon vertex is not
        // (the disc is strictly inside the hexagon at the vertices).
        let tol = Tolerances::default();
        assert!(limit.contains(&[0.0, 1.0], tol));
        assert!(!limit.contains(&[2.0, 0.0], tol));
    }

    #[test]
    fn horizontal_edges_bound_the_q_axis() {
        let geo = HexagonGeometry::new(1.0).unwrap();
        let limit = InputLimit::from_geometry(&geo, Formulation::Polytope);
        let q2 = geo.q2;
        let tol = Tolerances::default();
        assert!(limit.contains(&[0.0, q2], tol));
        assert!(!limit.contains(&[0.0, q2 + 1e-3], tol));
        assert!(!limit.contains(&[0.0, -q2 - 1e-3], tol));
    }
}
