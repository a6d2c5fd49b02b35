use crate::dtype::{DType, Scalar};
use crate::error::{DError, DResult};
use crate::shape::Shape;
use crate::Matrix;
use num_complex::{Complex32, Complex64};
use std::borrow::Cow;

/// Leaf of an expression: either the assignment destination itself or
/// another matrix.
#[derive(Clone, Copy, Debug)]
pub enum Operand<'a> {
    Dst,
    Ref(&'a Matrix),
}

/// Lazy matrix expression, evaluated by [`Matrix::assign`] or
/// [`NoAlias::assign`].
#[derive(Clone, Debug)]
pub enum Expr<'a> {
    Leaf(Operand<'a>),
    Neg(Box<Expr<'a>>),
    Add(Box<Expr<'a>>, Box<Expr<'a>>),
    Sub(Box<Expr<'a>>, Box<Expr<'a>>),
    Scale(Box<Expr<'a>>, Scalar),
    DivScalar(Box<Expr<'a>>, Scalar),
    Product(Box<Expr<'a>>, Box<Expr<'a>>),
    Transpose(Box<Expr<'a>>),
    Conjugate(Box<Expr<'a>>),
    Adjoint(Box<Expr<'a>>),
}

impl<'a> Expr<'a> {
    /// The matrix being assigned to.
    pub fn dst() -> Expr<'a> {
        Expr::Leaf(Operand::Dst)
    }

    pub fn of(m: &'a Matrix) -> Expr<'a> {
        Expr::Leaf(Operand::Ref(m))
    }

    pub fn transpose(self) -> Expr<'a> {
        Expr::Transpose(Box::new(self))
    }

    pub fn conjugate(self) -> Expr<'a> {
        Expr::Conjugate(Box::new(self))
    }

    pub fn adjoint(self) -> Expr<'a> {
        Expr::Adjoint(Box::new(self))
    }

    pub fn scale(self, k: impl Into<Scalar>) -> Expr<'a> {
        Expr::Scale(Box::new(self), k.into())
    }

    pub fn div_scalar(self, k: impl Into<Scalar>) -> Expr<'a> {
        Expr::DivScalar(Box::new(self), k.into())
    }

    pub fn reads_dst(&self) -> bool {
        match self {
            Expr::Leaf(Operand::Dst) => true,
            Expr::Leaf(Operand::Ref(_)) => false,
            Expr::Neg(e)
            | Expr::Scale(e, _)
            | Expr::DivScalar(e, _)
            | Expr::Transpose(e)
            | Expr::Conjugate(e)
            | Expr::Adjoint(e) => e.reads_dst(),
            Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Product(a, b) => a.reads_dst() || b.reads_dst(),
        }
    }

    /// True when the destination is read by a node whose output coefficient
    /// depends on other coordinates than its own.
    pub fn reads_dst_non_locally(&self) -> bool {
        match self {
            Expr::Leaf(_) => false,
            Expr::Product(a, b) => a.reads_dst() || b.reads_dst(),
            Expr::Transpose(e) | Expr::Adjoint(e) => e.reads_dst(),
            Expr::Neg(e) | Expr::Scale(e, _) | Expr::DivScalar(e, _) | Expr::Conjugate(e) => {
                e.reads_dst_non_locally()
            }
            Expr::Add(a, b) | Expr::Sub(a, b) => a.reads_dst_non_locally() || b.reads_dst_non_locally(),
        }
    }

    /// Fully evaluates the expression with `dst` standing in for
    /// [`Operand::Dst`].
    pub fn eval<'b>(&'b self, dst: &'b Matrix) -> DResult<Cow<'b, Matrix>> {
        self.materialize(Some(dst))
    }

    fn materialize<'b>(&'b self, dst: Option<&'b Matrix>) -> DResult<Cow<'b, Matrix>> {
        Ok(match self {
            Expr::Leaf(Operand::Ref(m)) => Cow::Borrowed(*m),
            Expr::Leaf(Operand::Dst) => match dst {
                Some(d) => Cow::Borrowed(d),
                None => return Err(DError::Unexpected("expression reads a detached destination".into())),
            },
            Expr::Neg(e) => Cow::Owned(e.materialize(dst)?.neg()),
            Expr::Add(a, b) => Cow::Owned(a.materialize(dst)?.add(&*b.materialize(dst)?)?),
            Expr::Sub(a, b) => Cow::Owned(a.materialize(dst)?.sub(&*b.materialize(dst)?)?),
            Expr::Scale(e, k) => Cow::Owned(e.materialize(dst)?.scale(*k)?),
            Expr::DivScalar(e, k) => Cow::Owned(e.materialize(dst)?.div_scalar(*k)?),
            Expr::Product(a, b) => Cow::Owned(a.materialize(dst)?.multiply(&*b.materialize(dst)?)?),
            Expr::Transpose(e) => Cow::Owned(e.materialize(dst)?.transpose()),
            Expr::Conjugate(e) => Cow::Owned(e.materialize(dst)?.conjugate()),
            Expr::Adjoint(e) => Cow::Owned(e.materialize(dst)?.adjoint()),
        })
    }

    // Coefficient-wise plan. Non-local subtrees are evaluated up front; they
    // never read the destination here.
    fn plan<'b>(&'b self, dst: &Matrix) -> DResult<Plan<'b>> {
        Ok(match self {
            Expr::Leaf(Operand::Dst) => Plan {
                node: Node::Dst,
                shape: dst.shape().clone(),
                dtype: dst.dtype(),
            },
            Expr::Leaf(Operand::Ref(_))
            | Expr::Product(..)
            | Expr::Transpose(_)
            | Expr::Adjoint(_) => {
                let m = self.materialize(None)?;
                Plan {
                    shape: m.shape().clone(),
                    dtype: m.dtype(),
                    node: Node::Mat(m),
                }
            }
            Expr::Neg(e) => e.plan(dst)?.wrap(|n| Node::Neg(Box::new(n))),
            Expr::Conjugate(e) => e.plan(dst)?.wrap(|n| Node::Conj(Box::new(n))),
            Expr::Scale(e, k) => {
                let p = e.plan(dst)?;
                let dtype = DType::promote_for("scale", p.dtype, k.dtype())?;
                Plan {
                    node: Node::Scale(Box::new(p.node), *k),
                    shape: p.shape,
                    dtype,
                }
            }
            Expr::DivScalar(e, k) => {
                let p = e.plan(dst)?;
                let dtype = DType::promote_for("div", p.dtype, k.dtype())?;
                if dtype.is_integer() && k.is_zero() {
                    return Err(DError::DivisionByZero);
                }
                Plan {
                    node: Node::Div(Box::new(p.node), *k),
                    shape: p.shape,
                    dtype,
                }
            }
            Expr::Add(a, b) => Plan::zip("add", a.plan(dst)?, b.plan(dst)?, |x, y| {
                Node::Add(Box::new(x), Box::new(y))
            })?,
            Expr::Sub(a, b) => Plan::zip("sub", a.plan(dst)?, b.plan(dst)?, |x, y| {
                Node::Sub(Box::new(x), Box::new(y))
            })?,
        })
    }
}

enum Node<'b> {
    Dst,
    Mat(Cow<'b, Matrix>),
    Neg(Box<Node<'b>>),
    Conj(Box<Node<'b>>),
    Add(Box<Node<'b>>, Box<Node<'b>>),
    Sub(Box<Node<'b>>, Box<Node<'b>>),
    Scale(Box<Node<'b>>, Scalar),
    Div(Box<Node<'b>>, Scalar),
}

impl Node<'_> {
    // Reads only (r, c) of the destination, so writing (r, c) right after is
    // safe.
    fn coeff(&self, dst: &Matrix, r: usize, c: usize) -> DResult<Scalar> {
        Ok(match self {
            Node::Dst => dst.get_unchecked(r, c),
            Node::Mat(m) => m.get_unchecked(r, c),
            Node::Neg(n) => n.coeff(dst, r, c)?.neg(),
            Node::Conj(n) => n.coeff(dst, r, c)?.conj(),
            Node::Add(a, b) => a.coeff(dst, r, c)?.add(b.coeff(dst, r, c)?)?,
            Node::Sub(a, b) => a.coeff(dst, r, c)?.sub(b.coeff(dst, r, c)?)?,
            Node::Scale(n, k) => n.coeff(dst, r, c)?.mul(*k)?,
            Node::Div(n, k) => n.coeff(dst, r, c)?.div(*k)?,
        })
    }
}

struct Plan<'b> {
    node: Node<'b>,
    shape: Shape,
    dtype: DType,
}

impl<'b> Plan<'b> {
    fn wrap(self, f: impl FnOnce(Node<'b>) -> Node<'b>) -> Plan<'b> {
        Plan {
            node: f(self.node),
            shape: self.shape,
            dtype: self.dtype,
        }
    }

    fn zip(
        op: &'static str,
        a: Plan<'b>,
        b: Plan<'b>,
        f: impl FnOnce(Node<'b>, Node<'b>) -> Node<'b>,
    ) -> DResult<Plan<'b>> {
        if a.shape != b.shape {
            return Err(DError::shape_mismatch(op, &a.shape, &b.shape));
        }
        let dtype = DType::promote_for(op, a.dtype, b.dtype)?;
        Ok(Plan {
            node: f(a.node, b.node),
            shape: a.shape,
            dtype,
        })
    }
}

#[derive(Clone, Copy)]
enum Update {
    Set,
    Add,
    Sub,
}

impl Update {
    fn op(self) -> &'static str {
        match self {
            Update::Set => "assign",
            Update::Add => "assign_add",
            Update::Sub => "assign_sub",
        }
    }
}

impl Matrix {
    /// `self = e`. The expression is evaluated into a temporary first, so it
    /// may read `self` through [`Expr::dst`] in any position.
    pub fn assign(&mut self, e: Expr<'_>) -> DResult<()> {
        let tmp = e.eval(self)?.into_owned();
        self.write_result(tmp)
    }

    /// `self += e` through a temporary.
    pub fn assign_add(&mut self, e: Expr<'_>) -> DResult<()> {
        let tmp = e.eval(self)?.into_owned();
        self.add_assign(&tmp)
    }

    /// `self -= e` through a temporary.
    pub fn assign_sub(&mut self, e: Expr<'_>) -> DResult<()> {
        let tmp = e.eval(self)?.into_owned();
        self.sub_assign(&tmp)
    }

    /// Opt-in path that writes into `self` without an intermediate matrix.
    pub fn noalias(&mut self) -> NoAlias<'_> {
        NoAlias { dst: self }
    }

    // Replaces shape and contents, keeping kind, order and fixed extents.
    fn write_result(&mut self, tmp: Matrix) -> DResult<()> {
        self.dtype().check_accepts("assign", tmp.dtype())?;
        let shape = self.shape.reshaped(tmp.rows(), tmp.cols())?;
        let tmp = tmp.cast(self.dtype()).to_order(self.order());
        self.shape = shape;
        self.storage = tmp.storage;
        self.reserve_bound();
        Ok(())
    }
}

/// Handle returned by [`Matrix::noalias`].
pub struct NoAlias<'m> {
    dst: &'m mut Matrix,
}

impl NoAlias<'_> {
    pub fn assign(&mut self, e: Expr<'_>) -> DResult<()> {
        self.update(e, Update::Set)
    }

    pub fn add_assign(&mut self, e: Expr<'_>) -> DResult<()> {
        self.update(e, Update::Add)
    }

    pub fn sub_assign(&mut self, e: Expr<'_>) -> DResult<()> {
        self.update(e, Update::Sub)
    }

    fn update(&mut self, e: Expr<'_>, how: Update) -> DResult<()> {
        if let Expr::Product(a, b) = &e {
            return self.product(a, b, how);
        }
        if e.reads_dst_non_locally() {
            log::debug!("{}: destination read by a non-local node, using a temporary", how.op());
            let tmp = e.eval(&*self.dst)?.into_owned();
            return match how {
                Update::Set => self.dst.write_result(tmp),
                Update::Add => self.dst.add_assign(&tmp),
                Update::Sub => self.dst.sub_assign(&tmp),
            };
        }
        self.coefficient_wise(&e, how)
    }

    fn product(&mut self, a: &Expr<'_>, b: &Expr<'_>, how: Update) -> DResult<()> {
        let snapshot = if a.reads_dst() || b.reads_dst() {
            log::debug!("{}: product operand reads the destination, snapshotting", how.op());
            Some(self.dst.clone())
        } else {
            None
        };
        let a = a.materialize(snapshot.as_ref())?;
        let b = b.materialize(snapshot.as_ref())?;
        if a.cols() != b.rows() {
            return Err(DError::shape_mismatch("multiply", a.shape(), b.shape()));
        }
        if let Update::Set = how {
            let dtype = DType::promote_for("multiply", a.dtype(), b.dtype())?;
            self.dst.dtype().check_accepts(how.op(), dtype)?;
            self.dst.resize(a.rows(), b.cols())?;
            self.dst.set_zero();
        }
        self.dst.gemm_acc(&a, &b, matches!(how, Update::Sub))
    }

    fn coefficient_wise(&mut self, e: &Expr<'_>, how: Update) -> DResult<()> {
        let plan = e.plan(&*self.dst)?;
        self.dst.dtype().check_accepts(how.op(), plan.dtype)?;
        match how {
            Update::Set if plan.shape != *self.dst.shape() => {
                self.dst.resize(plan.shape.rows(), plan.shape.cols())?;
            }
            Update::Set => {}
            Update::Add | Update::Sub => {
                if plan.shape != *self.dst.shape() {
                    return Err(DError::shape_mismatch(how.op(), self.dst.shape(), &plan.shape));
                }
            }
        }
        let coords: Vec<_> = self.dst.shape().iter().collect();
        for (r, c) in coords {
            let v = plan.node.coeff(&*self.dst, r, c)?;
            let v = match how {
                Update::Set => v,
                Update::Add => self.dst.get_unchecked(r, c).add(v)?,
                Update::Sub => self.dst.get_unchecked(r, c).sub(v)?,
            };
            self.dst.put(r, c, v);
        }
        Ok(())
    }
}

impl<'a> From<&'a Matrix> for Expr<'a> {
    fn from(m: &'a Matrix) -> Self {
        Expr::of(m)
    }
}

impl<'a> std::ops::Add for Expr<'a> {
    type Output = Expr<'a>;
    fn add(self, rhs: Expr<'a>) -> Expr<'a> {
        Expr::Add(Box::new(self), Box::new(rhs))
    }
}

impl<'a> std::ops::Sub for Expr<'a> {
    type Output = Expr<'a>;
    fn sub(self, rhs: Expr<'a>) -> Expr<'a> {
        Expr::Sub(Box::new(self), Box::new(rhs))
    }
}

impl<'a> std::ops::Mul for Expr<'a> {
    type Output = Expr<'a>;
    fn mul(self, rhs: Expr<'a>) -> Expr<'a> {
        Expr::Product(Box::new(self), Box::new(rhs))
    }
}

impl<'a> std::ops::Neg for Expr<'a> {
    type Output = Expr<'a>;
    fn neg(self) -> Expr<'a> {
        Expr::Neg(Box::new(self))
    }
}

macro_rules! impl_expr_scalar_op {
    ($($t:ty),*) => {
        $(
            impl<'a> std::ops::Mul<$t> for Expr<'a> {
                type Output = Expr<'a>;
                fn mul(self, k: $t) -> Expr<'a> {
                    self.scale(k)
                }
            }

            impl<'a> std::ops::Mul<Expr<'a>> for $t {
                type Output = Expr<'a>;
                fn mul(self, e: Expr<'a>) -> Expr<'a> {
                    e.scale(self)
                }
            }

            impl<'a> std::ops::Div<$t> for Expr<'a> {
                type Output = Expr<'a>;
                fn div(self, k: $t) -> Expr<'a> {
                    self.div_scalar(k)
                }
            }
        )*
    };
}

impl_expr_scalar_op!(i32, f32, f64, Complex32, Complex64, Scalar);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Extent, Order};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_self_transpose_through_temporary() {
        let mut a = mat![[1, 2, 3], [4, 5, 6]];
        a.assign(Expr::dst().transpose()).unwrap();
        assert_eq!(a, mat![[1, 4], [2, 5], [3, 6]]);

        let mut b = mat![[1, 2, 3], [4, 5, 6]];
        b.noalias().assign(Expr::dst().transpose()).unwrap();
        assert_eq!(b, a);
    }

    #[test]
    fn test_self_transpose_plus_self() {
        for order in [Order::ColMajor, Order::RowMajor] {
            let start = mat![[1, 2], [3, 4]].to_order(order);

            let mut slow = start.clone();
            slow.assign(Expr::dst().transpose() + Expr::dst()).unwrap();
            assert_eq!(slow, mat![[2, 5], [5, 8]]);

            let mut fast = start.clone();
            fast.noalias().assign(Expr::dst().transpose() + Expr::dst()).unwrap();
            assert_eq!(fast, slow);

            let mut acc = start.clone();
            acc.noalias().add_assign(Expr::dst().transpose()).unwrap();
            assert_eq!(acc, slow);
        }

        let mut rng = StdRng::seed_from_u64(41);
        let start = Matrix::random_with(&mut rng, 4, 4, DType::F64).unwrap();
        let mut slow = start.clone();
        slow.assign(Expr::dst().adjoint() - Expr::dst() * 0.5f64).unwrap();
        let mut fast = start.clone();
        fast.noalias().assign(Expr::dst().adjoint() - Expr::dst() * 0.5f64).unwrap();
        assert!(fast.approx_eq(&slow, 1e-12));
        assert!(slow.approx_eq(&start.transpose().sub(&start.scale(0.5f64).unwrap()).unwrap(), 1e-12));
    }

    #[test]
    fn test_self_product() {
        let mut a = mat![[1, 2], [3, 4]];
        a.assign(Expr::dst() * Expr::dst()).unwrap();
        assert_eq!(a, mat![[7, 10], [15, 22]]);

        let mut b = mat![[1, 2], [3, 4]];
        b.noalias().assign(Expr::dst() * Expr::dst()).unwrap();
        assert_eq!(b, a);

        let mut c = mat![[1, 2], [3, 4]];
        let id = Matrix::identity(2, DType::I32).unwrap();
        c.noalias().add_assign(Expr::dst() * Expr::of(&id)).unwrap();
        assert_eq!(c, mat![[2, 4], [6, 8]]);

        let mut d = mat![[1, 2], [3, 4]];
        d.noalias()
            .assign((Expr::dst() + Expr::dst()) * (Expr::dst() * Expr::of(&id) - Expr::of(&id)))
            .unwrap();
        assert_eq!(d, mat![[12, 16], [24, 36]]);
    }

    #[test]
    fn test_noalias_matches_default_path() {
        let mut rng = StdRng::seed_from_u64(29);
        let a = Matrix::random_with(&mut rng, 3, 4, DType::F64).unwrap();
        let b = Matrix::random_with(&mut rng, 4, 2, DType::F64).unwrap().to_order(Order::RowMajor);
        let c0 = Matrix::random_with(&mut rng, 3, 2, DType::F64).unwrap();

        let mut fast = c0.clone();
        fast.noalias().add_assign(Expr::of(&a) * Expr::of(&b)).unwrap();
        let mut slow = c0.clone();
        slow.assign_add(Expr::of(&a) * Expr::of(&b)).unwrap();
        assert!(fast.approx_eq(&slow, 1e-12));

        fast.noalias().sub_assign(Expr::of(&a) * Expr::of(&b)).unwrap();
        slow.assign_sub(Expr::of(&a) * Expr::of(&b)).unwrap();
        assert!(fast.approx_eq(&slow, 1e-12));
        assert!(fast.approx_eq(&c0, 1e-12));

        let mut d = Matrix::new(0, 0, DType::F64).unwrap();
        d.noalias().assign(Expr::of(&a) * Expr::of(&b)).unwrap();
        assert!(d.approx_eq(&a.multiply(&b).unwrap(), 1e-12));
    }

    #[test]
    fn test_coefficient_wise_expressions() {
        let a = mat![[1.0, 2.0], [3.0, 4.0]];
        let b = mat![[0.5, 0.5], [0.5, 0.5]];
        let mut m = mat![[1.0, 1.0], [1.0, 1.0]];
        m.noalias()
            .assign(Expr::dst() * 2.0f64 + Expr::of(&a) - Expr::of(&b).transpose())
            .unwrap();
        assert_eq!(m, mat![[2.5, 3.5], [4.5, 5.5]]);

        let mut n = mat![[1.0, 1.0], [1.0, 1.0]];
        n.assign(Expr::dst() * 2.0f64 + Expr::of(&a) - Expr::of(&b).transpose())
            .unwrap();
        assert_eq!(n, m);

        m.noalias().sub_assign(-Expr::of(&a) / 2.0f64).unwrap();
        assert_eq!(m, mat![[3.0, 4.5], [6.0, 7.5]]);

        let mut z = Matrix::new(1, 1, DType::F64).unwrap();
        z.noalias().assign(Expr::of(&a).conjugate()).unwrap();
        assert_eq!(z, a);
    }

    #[test]
    fn test_assign_validation() {
        let a = mat![[1.0, 2.0, 3.0]];
        let s = Shape::new(Extent::Fixed(2), Extent::Fixed(2), 2, 2).unwrap();
        let mut f = Matrix::from_shape(&s, DType::F64, Order::ColMajor).unwrap();
        assert!(matches!(f.assign(Expr::of(&a)), Err(DError::InvalidShape { .. })));
        assert!(matches!(f.noalias().assign(Expr::of(&a)), Err(DError::InvalidShape { .. })));

        let mut i = mat![[1, 2, 3]];
        assert!(matches!(i.assign(Expr::of(&a)), Err(DError::DTypeMismatch { .. })));
        assert!(matches!(
            i.noalias().add_assign(Expr::of(&a)),
            Err(DError::DTypeMismatch { .. })
        ));
        assert_eq!(i, mat![[1, 2, 3]]);

        let mut w = Matrix::new(2, 2, DType::F64).unwrap();
        assert!(matches!(w.assign_add(Expr::of(&a)), Err(DError::ShapeMismatch { .. })));
        assert!(matches!(
            w.noalias().add_assign(Expr::dst() + Expr::of(&a)),
            Err(DError::ShapeMismatch { op: "add", .. })
        ));
        assert!(matches!(
            i.noalias().assign(Expr::dst().div_scalar(0i32)),
            Err(DError::DivisionByZero)
        ));
    }

    #[test]
    fn test_widening_assign() {
        let src = mat![[1, 2], [3, 4]];
        let mut f = Matrix::with_order(1, 1, DType::F64, Order::RowMajor).unwrap();
        f.assign(Expr::of(&src)).unwrap();
        assert_eq!(f.dtype(), DType::F64);
        assert_eq!(f.order(), Order::RowMajor);
        assert_eq!(f, mat![[1.0, 2.0], [3.0, 4.0]]);
    }
}
