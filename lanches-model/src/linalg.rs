use anyhow::{Context, Result, bail};
use faer::{Mat, Side};
use faer::prelude::Solve;
use ndarray::{Array1, Array2, Axis};

/// Convert ndarray Array2 to faer Mat (column-major).
fn ndarray_to_faer(arr: &Array2<f64>) -> Mat<f64> {
    let (rows, cols) = (arr.nrows(), arr.ncols());
    Mat::from_fn(rows, cols, |i, j| arr[[i, j]])
}

/// Convert faer Mat back to ndarray Array2.
fn faer_to_ndarray(mat: &Mat<f64>) -> Array2<f64> {
    let (rows, cols) = (mat.nrows(), mat.ncols());
    Array2::from_shape_fn((rows, cols), |(i, j)| mat[(i, j)])
}

/// Solve a symmetric positive-definite system via Cholesky factorization.
/// Returns X such that A * X = B.
fn cholesky_solve(a: &Array2<f64>, b: &Array2<f64>) -> Result<Array2<f64>> {
    let a_faer = ndarray_to_faer(a);
    let b_faer = ndarray_to_faer(b);
    let llt = match a_faer.llt(Side::Lower) {
        Ok(llt) => llt,
        Err(_) => bail!("Cholesky: matriz não definida positiva (entrada singular)"),
    };
    let x_faer = llt.solve(&b_faer);
    Ok(faer_to_ndarray(&x_faer))
}

/// Least squares through the origin: w minimizing ||X w - y||² with no
/// intercept column.
///
/// - x: [n_samples, n_features]
/// - y: [n_samples]
/// - Returns w: [n_features]
///
/// Solved on the normal equations (XᵀX) w = Xᵀy, so XᵀX must be
/// positive-definite (every feature column carries some signal).
pub fn least_squares_through_origin(x: &Array2<f64>, y: &Array1<f64>) -> Result<Array1<f64>> {
    let (n, d) = x.dim();
    if n == 0 || d == 0 {
        bail!("Matriz de features vazia ({n}x{d})");
    }
    if y.len() != n {
        bail!("Dimensões incompatíveis: X tem {n} linhas, y tem {}", y.len());
    }

    let gram = x.t().dot(x);
    let xty = x.t().dot(y).insert_axis(Axis(1));

    let w = cholesky_solve(&gram, &xty).context("Falha na resolução das equações normais")?;
    let w = w.column(0).to_owned();

    if w.iter().any(|v| !v.is_finite()) {
        bail!("Pesos não finitos após a resolução: {w}");
    }
    Ok(w)
}
