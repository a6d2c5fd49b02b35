use densa::{mat, vector, DResult, DType, Expr, Extent, Matrix, Order, Shape};

fn main() -> DResult<()> {
    let mut m = Matrix::new(2, 2, DType::F64)?;
    m.set(0, 0, 3.0)?;
    m.set(1, 0, 2.5)?;
    m.set(0, 1, -1.0)?;
    m.set(1, 1, m.get(1, 0)?.add(m.get(0, 1)?)?)?;
    println!("{}\n", m);

    let r = Matrix::random(3, 3, DType::F64)?;
    let shifted = r.scale(3.0f64)?.add(&Matrix::constant(3, 3, 7.0f64)?)?;
    println!("random in [4, 10]:\n{:.3}\n", shifted);
    let v = vector![1.0, 2.0, 3.0];
    println!("m * v =\n{}\n", (&shifted * &v)?);

    let fixed = Matrix::fixed(3, 3, DType::F32)?;
    println!("fixed 3x3 holds {} elements", fixed.size());
    let s = Shape::new(Extent::Dynamic, Extent::Fixed(2), 4, 2)?;
    let mut tall = Matrix::from_shape(&s, DType::I32, Order::RowMajor)?;
    tall.fill_from(1..=8)?;
    println!("{}\n", tall);

    let mut capped = Matrix::bounded(3, 4, 10, 10, DType::F64, Order::RowMajor)?;
    println!("bounded {}x{} reserves {} elements", capped.rows(), capped.cols(), capped.capacity());
    capped.resize(10, 10)?;
    println!("grown to {} elements in place", capped.size());

    let mut g = Matrix::new(2, 5, DType::F64)?;
    g.resize(4, 3)?;
    println!("resized to {}x{} ({} elements)", g.rows(), g.cols(), g.size());
    let mut c = mat![[1, 2], [3, 4]];
    c.conservative_resize(3, 3)?;
    println!("{}\n", c);

    let a = mat![[1, 2], [3, 4]];
    let b = mat![[2, 3], [1, 4]];
    println!("a + b =\n{}", (&a + &b)?);
    println!("a - b =\n{}", (&a - &b)?);
    let mut d = a.clone();
    d.add_assign(&b)?;
    d.noalias().sub_assign(Expr::of(&a) * Expr::of(&b))?;
    println!("a + b - a*b =\n{}", d);

    let mut t = mat![[1, 2, 3], [4, 5, 6]];
    t.assign(Expr::dst().transpose())?;
    println!("self-assigned transpose:\n{}", t);
    println!("sum {} trace {}", a.sum(), a.trace()?);
    println!("dot {}", vector![1, 2, 3].dot(&vector![0, 1, 2])?);
    Ok(())
}
