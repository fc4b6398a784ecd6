use faer::Mat;

const MAX_SWEEPS: usize = 64;
const OFF_DIAGONAL_EPSILON: f64 = 1.0e-15;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SymmetricEigenError {
    #[error("eigen decomposition requires a square matrix, got {rows}x{cols}")]
    NonSquareMatrix { rows: usize, cols: usize },
    #[error("eigen decomposition requires a non-empty matrix")]
    EmptyMatrix,
    #[error("matrix contains non-finite entries")]
    NonFiniteEntry,
    #[error("Jacobi rotations did not converge after {sweeps} sweeps")]
    NotConverged { sweeps: usize },
}

/// Eigenvalues of a real symmetric matrix, ascending.
///
/// Cyclic Jacobi rotations; only the upper triangle drives the rotations, so
/// a slightly asymmetric input is treated as its symmetric part.
pub fn symmetric_eigenvalues(matrix: &Mat<f64>) -> Result<Vec<f64>, SymmetricEigenError> {
    let dimension = validate_square_shape(matrix)?;
    let mut work = Mat::<f64>::zeros(dimension, dimension);
    for row in 0..dimension {
        for col in 0..dimension {
            let value = 0.5 * (matrix[(row, col)] + matrix[(col, row)]);
            if !value.is_finite() {
                return Err(SymmetricEigenError::NonFiniteEntry);
            }
            work[(row, col)] = value;
        }
    }

    let scale = frobenius_norm(&work);
    if scale == 0.0 {
        return Ok(vec![0.0; dimension]);
    }

    let mut converged = false;
    for _ in 0..MAX_SWEEPS {
        if off_diagonal_norm(&work) <= OFF_DIAGONAL_EPSILON * scale {
            converged = true;
            break;
        }

        for p in 0..dimension {
            for q in (p + 1)..dimension {
                rotate(&mut work, p, q);
            }
        }
    }

    if !converged && off_diagonal_norm(&work) > OFF_DIAGONAL_EPSILON * scale {
        return Err(SymmetricEigenError::NotConverged { sweeps: MAX_SWEEPS });
    }

    let mut eigenvalues: Vec<f64> = (0..dimension).map(|index| work[(index, index)]).collect();
    eigenvalues.sort_by(|lhs, rhs| lhs.total_cmp(rhs));
    Ok(eigenvalues)
}

fn rotate(work: &mut Mat<f64>, p: usize, q: usize) {
    let apq = work[(p, q)];
    if apq == 0.0 {
        return;
    }

    let theta = (work[(q, q)] - work[(p, p)]) / (2.0 * apq);
    let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
    let c = 1.0 / (t * t + 1.0).sqrt();
    let s = t * c;

    let dimension = work.nrows();
    for k in 0..dimension {
        let akp = work[(k, p)];
        let akq = work[(k, q)];
        work[(k, p)] = c * akp - s * akq;
        work[(k, q)] = s * akp + c * akq;
    }
    for k in 0..dimension {
        let apk = work[(p, k)];
        let aqk = work[(q, k)];
        work[(p, k)] = c * apk - s * aqk;
        work[(q, k)] = s * apk + c * aqk;
    }
}

fn validate_square_shape(matrix: &Mat<f64>) -> Result<usize, SymmetricEigenError> {
    let rows = matrix.nrows();
    let cols = matrix.ncols();
    if rows != cols {
        return Err(SymmetricEigenError::NonSquareMatrix { rows, cols });
    }
    if rows == 0 {
        return Err(SymmetricEigenError::EmptyMatrix);
    }
    Ok(rows)
}

fn frobenius_norm(matrix: &Mat<f64>) -> f64 {
    let mut sum = 0.0;
    for row in 0..matrix.nrows() {
        for col in 0..matrix.ncols() {
            sum += matrix[(row, col)] * matrix[(row, col)];
        }
    }
    sum.sqrt()
}

fn off_diagonal_norm(matrix: &Mat<f64>) -> f64 {
    let mut sum = 0.0;
    for row in 0..matrix.nrows() {
        for col in 0..matrix.ncols() {
            if row != col {
                sum += matrix[(row, col)] * matrix[(row, col)];
            }
        }
    }
    sum.sqrt()
}
