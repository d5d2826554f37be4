use std::ops::{Add, Div, Mul, Neg, Sub};

use num_traits::Float;

use super::{MathError, Vector, cross, dot};

/// A quaternion as a scalar real part plus a 3-vector imaginary part.
///
/// A unit quaternion represents a rotation; see [`Quaternion::rotate`] for
/// the sandwich product. Repeated composition drifts away from unit length,
/// so long-lived rotors should be re-normalized with [`Quaternion::unit`].
#[derive(Clone, Debug, PartialEq)]
pub struct Quaternion<T> {
    re: T,
    im: Vector<T>,
}

impl<T: Float> Quaternion<T> {
    pub fn new(re: T, im: Vector<T>) -> Result<Quaternion<T>, MathError> {
        if im.dim() != 3 {
            return Err(MathError::ImaginaryDimension { got: im.dim() });
        }
        Ok(Quaternion { re, im })
    }

    pub fn re(&self) -> T {
        self.re
    }

    pub fn im(&self) -> &Vector<T> {
        &self.im
    }

    pub fn conjugate(&self) -> Quaternion<T> {
        Quaternion {
            re: self.re,
            im: -&self.im,
        }
    }

    pub fn norm(&self) -> T {
        (self.re * self.re + self.im.mag_squared()).sqrt()
    }

    pub fn unit(&self) -> Result<Quaternion<T>, MathError> {
        let norm = self.norm();
        if norm == T::zero() {
            return Err(MathError::ZeroLength);
        }
        Ok(Quaternion {
            re: self.re / norm,
            im: &self.im / norm,
        })
    }

    /// Rotates a 3-vector by this quaternion using the sandwich product
    /// `q * (0, v) * conjugate(q)`, returning the imaginary part.
    pub fn rotate(&self, v: &Vector<T>) -> Result<Vector<T>, MathError> {
        let pure = Quaternion::new(T::zero(), v.clone())?;
        let rotated = self * &(&pure * &self.conjugate());
        Ok(rotated.im)
    }
}

impl<T: Float> Mul for &Quaternion<T> {
    type Output = Quaternion<T>;

    fn mul(self, rhs: &Quaternion<T>) -> Quaternion<T> {
        let im = &(&self.im.scale(rhs.re) + &rhs.im.scale(self.re))
            + &cross(&self.im, &rhs.im)
                .unwrap_or_else(|_| unreachable!("imaginary parts are 3-dimensional"));
        Quaternion {
            re: self.re * rhs.re - dot(&self.im, &rhs.im),
            im,
        }
    }
}

impl<T: Float> Mul for Quaternion<T> {
    type Output = Quaternion<T>;

    fn mul(self, rhs: Quaternion<T>) -> Quaternion<T> {
        &self * &rhs
    }
}

impl<T: Float> Add for &Quaternion<T> {
    type Output = Quaternion<T>;

    fn add(self, rhs: &Quaternion<T>) -> Quaternion<T> {
        Quaternion {
            re: self.re + rhs.re,
            im: &self.im + &rhs.im,
        }
    }
}

impl<T: Float> Sub for &Quaternion<T> {
    type Output = Quaternion<T>;

    fn sub(self, rhs: &Quaternion<T>) -> Quaternion<T> {
        Quaternion {
            re: self.re - rhs.re,
            im: &self.im - &rhs.im,
        }
    }
}

impl<T: Float> Neg for &Quaternion<T> {
    type Output = Quaternion<T>;

    fn neg(self) -> Quaternion<T> {
        Quaternion {
            re: -self.re,
            im: -&self.im,
        }
    }
}

impl<T: Float> Mul<T> for &Quaternion<T> {
    type Output = Quaternion<T>;

    fn mul(self, rhs: T) -> Quaternion<T> {
        Quaternion {
            re: self.re * rhs,
            im: self.im.scale(rhs),
        }
    }
}

impl<T: Float> Div<T> for &Quaternion<T> {
    type Output = Quaternion<T>;

    fn div(self, rhs: T) -> Quaternion<T> {
        Quaternion {
            re: self.re / rhs,
            im: &self.im / rhs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{assert, let_assert};
    use test_strategy::proptest;

    fn approx_vec(a: &Vector<f32>, b: &Vector<f32>, tolerance: f32) -> bool {
        a.dim() == b.dim() && a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= tolerance)
    }

    fn quat(re: f32, x: f32, y: f32, z: f32) -> Quaternion<f32> {
        Quaternion::new(re, Vector::from([x, y, z])).unwrap()
    }

    #[test]
    fn new_rejects_wrong_imaginary_dimension() {
        let_assert!(Err(e) = Quaternion::new(1.0f32, Vector::from([1.0, 2.0])));
        assert!(e == MathError::ImaginaryDimension { got: 2 });
    }

    #[test]
    fn basis_products() {
        // i * j = k, j * k = i, k * i = j
        let i = quat(0.0, 1.0, 0.0, 0.0);
        let j = quat(0.0, 0.0, 1.0, 0.0);
        let k = quat(0.0, 0.0, 0.0, 1.0);
        assert!(&i * &j == k);
        assert!(&j * &k == i);
        assert!(&k * &i == j);
    }

    #[test]
    fn product_real_part() {
        let p = quat(1.0, 2.0, 3.0, 4.0);
        let q = quat(5.0, 6.0, 7.0, 8.0);
        let r = &p * &q;
        assert!(r.re() == 1.0 * 5.0 - (2.0 * 6.0 + 3.0 * 7.0 + 4.0 * 8.0));
    }

    #[test]
    fn conjugate_negates_imaginary() {
        let q = quat(1.0, 2.0, 3.0, 4.0);
        let c = q.conjugate();
        assert!(c.re() == 1.0);
        assert!(c.im() == &Vector::from([-2.0, -3.0, -4.0]));
    }

    #[test]
    fn unit_of_zero_fails() {
        let q = quat(0.0, 0.0, 0.0, 0.0);
        let_assert!(Err(e) = q.unit());
        assert!(e == MathError::ZeroLength);
    }

    #[test]
    fn rotate_about_y_quarter_turn() {
        let half = std::f32::consts::FRAC_PI_4;
        let q = quat(half.cos(), 0.0, half.sin(), 0.0);
        let v = Vector::from([1.0f32, 0.0, 0.0]);
        let rotated = q.rotate(&v).unwrap();
        assert!(approx_vec(&rotated, &Vector::from([0.0, 0.0, -1.0]), 1e-6));
    }

    #[proptest]
    fn rotate_round_trips_through_conjugate(
        #[strategy(-3.0f32..3.0)] angle: f32,
        #[strategy(-10.0f32..10.0)] ax: f32,
        #[strategy(-10.0f32..10.0)] ay: f32,
        #[strategy(-10.0f32..10.0)] az: f32,
        #[strategy(-100.0f32..100.0)] vx: f32,
        #[strategy(-100.0f32..100.0)] vy: f32,
        #[strategy(-100.0f32..100.0)] vz: f32,
    ) {
        let axis = Vector::from([ax, ay, az]);
        proptest::prop_assume!(axis.magnitude() > 1e-3);
        let axis = axis.unit().unwrap();

        let half = angle / 2.0;
        let q = Quaternion::new(half.cos(), axis.scale(half.sin())).unwrap();
        let v = Vector::from([vx, vy, vz]);

        let there = q.rotate(&v).unwrap();
        let back = q.conjugate().rotate(&there).unwrap();
        let tolerance = v.magnitude().max(1.0) * 1e-4;
        assert!(approx_vec(&back, &v, tolerance));
    }
}
