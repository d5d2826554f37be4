use std::ops::{Add, AddAssign, Div, Index, Mul, Neg, Sub, SubAssign};

use num_traits::Float;

use super::MathError;

/// A vector with its dimension fixed at construction time.
///
/// Binary operations between two vectors of different dimensions operate over
/// the shorter of the two. This is deliberate, documented permissiveness, not
/// an error case; the one exception is [`cross`], which demands dimension 3
/// from both operands.
#[derive(Clone, Debug, PartialEq)]
pub struct Vector<T> {
    components: Vec<T>,
}

impl<T: Float> Vector<T> {
    pub fn new(components: Vec<T>) -> Vector<T> {
        Vector { components }
    }

    pub fn zeros(dim: usize) -> Vector<T> {
        Vector {
            components: vec![T::zero(); dim],
        }
    }

    pub fn dim(&self) -> usize {
        self.components.len()
    }

    pub fn get(&self, index: usize) -> Result<T, MathError> {
        self.components
            .get(index)
            .copied()
            .ok_or(MathError::IndexOutOfRange {
                index,
                dimension: self.dim(),
            })
    }

    pub fn set(&mut self, index: usize, value: T) -> Result<(), MathError> {
        let dimension = self.dim();
        match self.components.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(MathError::IndexOutOfRange { index, dimension }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.components.iter().copied()
    }

    pub fn mag_squared(&self) -> T {
        self.components
            .iter()
            .fold(T::zero(), |acc, &x| acc + x * x)
    }

    pub fn magnitude(&self) -> T {
        self.mag_squared().sqrt()
    }

    /// Normalizes to unit length. A zero-length vector has no direction, so
    /// it is reported as an error instead of producing non-finite components.
    pub fn unit(&self) -> Result<Vector<T>, MathError> {
        let mag = self.magnitude();
        if mag == T::zero() {
            return Err(MathError::ZeroLength);
        }
        Ok(self.scale(mag.recip()))
    }

    pub fn scale(&self, factor: T) -> Vector<T> {
        Vector {
            components: self.components.iter().map(|&x| x * factor).collect(),
        }
    }
}

/// Dot product over the shorter of the two dimensions.
pub fn dot<T: Float>(a: &Vector<T>, b: &Vector<T>) -> T {
    a.components
        .iter()
        .zip(&b.components)
        .fold(T::zero(), |acc, (&x, &y)| acc + x * y)
}

/// Cross product; both operands must have exactly dimension 3.
pub fn cross<T: Float>(a: &Vector<T>, b: &Vector<T>) -> Result<Vector<T>, MathError> {
    if a.dim() != 3 || b.dim() != 3 {
        return Err(MathError::CrossDimension {
            left: a.dim(),
            right: b.dim(),
        });
    }
    Ok(Vector::new(vec![
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]))
}

impl<T: Float, const N: usize> From<[T; N]> for Vector<T> {
    fn from(components: [T; N]) -> Vector<T> {
        Vector {
            components: components.to_vec(),
        }
    }
}

impl<T: Float> From<Vec<T>> for Vector<T> {
    fn from(components: Vec<T>) -> Vector<T> {
        Vector { components }
    }
}

impl<T: Float> Index<usize> for Vector<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.components[index]
    }
}

impl<T: Float> Add for &Vector<T> {
    type Output = Vector<T>;

    fn add(self, rhs: &Vector<T>) -> Vector<T> {
        Vector {
            components: self
                .components
                .iter()
                .zip(&rhs.components)
                .map(|(&x, &y)| x + y)
                .collect(),
        }
    }
}

impl<T: Float> Sub for &Vector<T> {
    type Output = Vector<T>;

    fn sub(self, rhs: &Vector<T>) -> Vector<T> {
        Vector {
            components: self
                .components
                .iter()
                .zip(&rhs.components)
                .map(|(&x, &y)| x - y)
                .collect(),
        }
    }
}

impl<T: Float> Add for Vector<T> {
    type Output = Vector<T>;

    fn add(self, rhs: Vector<T>) -> Vector<T> {
        &self + &rhs
    }
}

impl<T: Float> Sub for Vector<T> {
    type Output = Vector<T>;

    fn sub(self, rhs: Vector<T>) -> Vector<T> {
        &self - &rhs
    }
}

impl<T: Float> AddAssign<&Vector<T>> for Vector<T> {
    fn add_assign(&mut self, rhs: &Vector<T>) {
        for (x, &y) in self.components.iter_mut().zip(&rhs.components) {
            *x = *x + y;
        }
    }
}

impl<T: Float> SubAssign<&Vector<T>> for Vector<T> {
    fn sub_assign(&mut self, rhs: &Vector<T>) {
        for (x, &y) in self.components.iter_mut().zip(&rhs.components) {
            *x = *x - y;
        }
    }
}

impl<T: Float> Neg for &Vector<T> {
    type Output = Vector<T>;

    fn neg(self) -> Vector<T> {
        Vector {
            components: self.components.iter().map(|&x| -x).collect(),
        }
    }
}

impl<T: Float> Neg for Vector<T> {
    type Output = Vector<T>;

    fn neg(self) -> Vector<T> {
        -&self
    }
}

impl<T: Float> Mul<T> for &Vector<T> {
    type Output = Vector<T>;

    fn mul(self, rhs: T) -> Vector<T> {
        self.scale(rhs)
    }
}

impl<T: Float> Mul<T> for Vector<T> {
    type Output = Vector<T>;

    fn mul(self, rhs: T) -> Vector<T> {
        self.scale(rhs)
    }
}

impl<T: Float> Div<T> for &Vector<T> {
    type Output = Vector<T>;

    fn div(self, rhs: T) -> Vector<T> {
        Vector {
            components: self.components.iter().map(|&x| x / rhs).collect(),
        }
    }
}

impl<T: Float> Div<T> for Vector<T> {
    type Output = Vector<T>;

    fn div(self, rhs: T) -> Vector<T> {
        &self / rhs
    }
}
