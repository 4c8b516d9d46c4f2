//! Moindres carrés pénalisés (ridge) résolus par décomposition de Cholesky.
//!
//! Minimise `||y - X·β||² + Σ λ_j · β_j²` via les équations normales
//! `(XᵀX + diag(λ)) · β = Xᵀy`.

/// Matrice carrée dense, stockée ligne par ligne
#[derive(Debug, Clone)]
struct SquareMatrix {
    size: usize,
    values: Vec<f64>,
}

impl SquareMatrix {
    fn zeros(size: usize) -> Self {
        Self {
            size,
            values: vec![0.0; size * size],
        }
    }

    fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.size + col]
    }

    fn add(&mut self, row: usize, col: usize, value: f64) {
        self.values[row * self.size + col] += value;
    }

    fn set(&mut self, row: usize, col: usize, value: f64) {
        self.values[row * self.size + col] = value;
    }
}

/// Résout le problème ridge
///
/// - `rows` : lignes de la matrice de design (toutes de longueur p)
/// - `y` : cible, une valeur par ligne
/// - `penalties` : λ_j ≥ 0 par coefficient
///
/// Retourne None si le système n'est pas défini positif.
pub fn solve_ridge(rows: &[Vec<f64>], y: &[f64], penalties: &[f64]) -> Option<Vec<f64>> {
    let p = penalties.len();
    if rows.len() != y.len() || rows.iter().any(|row| row.len() != p) {
        return None;
    }

    // Équations normales (seul le triangle inférieur est rempli)
    let mut gram = SquareMatrix::zeros(p);
    let mut rhs = vec![0.0; p];
    for (row, &target) in rows.iter().zip(y) {
        for i in 0..p {
            let xi = row[i];
            if xi == 0.0 {
                continue;
            }
            rhs[i] += xi * target;
            for j in 0..=i {
                gram.add(i, j, xi * row[j]);
            }
        }
    }
    for (j, &lambda) in penalties.iter().enumerate() {
        gram.add(j, j, lambda);
    }

    let factor = cholesky(&gram)?;
    Some(cholesky_solve(&factor, &rhs))
}

/// Décomposition A = L·Lᵀ (L triangulaire inférieure)
fn cholesky(matrix: &SquareMatrix) -> Option<SquareMatrix> {
    let n = matrix.size;
    let mut lower = SquareMatrix::zeros(n);

    for i in 0..n {
        for j in 0..=i {
            let mut sum = matrix.get(i, j);
            for k in 0..j {
                sum -= lower.get(i, k) * lower.get(j, k);
            }

            if i == j {
                if !(sum > 0.0) || !sum.is_finite() {
                    return None;
                }
                lower.set(i, i, sum.sqrt());
            } else {
                lower.set(i, j, sum / lower.get(j, j));
            }
        }
    }

    Some(lower)
}

/// Résout L·Lᵀ·x = b (substitution avant puis arrière)
fn cholesky_solve(lower: &SquareMatrix, rhs: &[f64]) -> Vec<f64> {
    let n = lower.size;

    let mut z = vec![0.0; n];
    for i in 0..n {
        let mut sum = rhs[i];
        for k in 0..i {
            sum -= lower.get(i, k) * z[k];
        }
        z[i] = sum / lower.get(i, i);
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = z[i];
        for k in (i + 1)..n {
            sum -= lower.get(k, i) * x[k];
        }
        x[i] = sum / lower.get(i, i);
    }

    x
}
