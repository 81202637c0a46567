//! Ordinary least squares with intercept, and the regression metrics reported
//! after training.

use serde::Serialize;

use super::TrainingError;

#[derive(Debug, Clone, PartialEq)]
pub struct OlsFit {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

/// Fits `y ≈ intercept + X·β` by solving the centered normal equations.
///
/// Centering removes the intercept column from the system, which keeps it
/// better conditioned; the intercept is recovered from the means afterwards.
pub fn fit_ols<R: AsRef<[f64]>>(x: &[R], y: &[f64]) -> Result<OlsFit, TrainingError> {
    let n = x.len();
    let p = x.first().map(|row| row.as_ref().len()).unwrap_or(0);
    if n != y.len() {
        return Err(TrainingError::ShapeMismatch {
            rows: n,
            targets: y.len(),
        });
    }
    if n <= p {
        return Err(TrainingError::TooFewRows {
            rows: n,
            needed: p + 1,
        });
    }

    let nf = n as f64;
    let mut x_mean = vec![0.0; p];
    for row in x {
        let row = row.as_ref();
        if row.len() != p {
            return Err(TrainingError::RaggedRow {
                expected: p,
                actual: row.len(),
            });
        }
        for (m, v) in x_mean.iter_mut().zip(row) {
            *m += v / nf;
        }
    }
    let y_mean = y.iter().sum::<f64>() / nf;

    let mut xtx = vec![vec![0.0; p]; p];
    let mut xty = vec![0.0; p];
    for (row, target) in x.iter().zip(y) {
        let centered: Vec<f64> = row
            .as_ref()
            .iter()
            .zip(&x_mean)
            .map(|(v, m)| v - m)
            .collect();
        let dy = target - y_mean;
        for i in 0..p {
            xty[i] += centered[i] * dy;
            for j in i..p {
                xtx[i][j] += centered[i] * centered[j];
            }
        }
    }
    for i in 0..p {
        for j in 0..i {
            xtx[i][j] = xtx[j][i];
        }
    }

    let coefficients = solve(xtx, xty)?;
    let intercept = y_mean
        - coefficients
            .iter()
            .zip(&x_mean)
            .map(|(b, m)| b * m)
            .sum::<f64>();

    Ok(OlsFit {
        intercept,
        coefficients,
    })
}

/// Gaussian elimination with partial pivoting.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>, TrainingError> {
    let p = b.len();
    let max_diag = (0..p).map(|i| a[i][i].abs()).fold(0.0, f64::max);
    let tolerance = max_diag * 1e-12;

    for col in 0..p {
        let pivot = (col..p)
            .max_by(|&r, &s| a[r][col].abs().total_cmp(&a[s][col].abs()))
            .unwrap_or(col);
        if a[pivot][col].abs() <= tolerance {
            return Err(TrainingError::SingularMatrix);
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..p {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..p {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut solution = vec![0.0; p];
    for row in (0..p).rev() {
        let tail: f64 = (row + 1..p).map(|k| a[row][k] * solution[k]).sum();
        solution[row] = (b[row] - tail) / a[row][row];
    }
    Ok(solution)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    pub mse: f64,
    pub rmse: f64,
    pub r2: f64,
    pub mae: f64,
}

/// Metrics over paired targets and predictions; both must be non-empty and
/// the same length.
pub fn evaluate(y_true: &[f64], y_pred: &[f64]) -> Metrics {
    debug_assert_eq!(y_true.len(), y_pred.len());
    let n = y_true.len() as f64;

    let mut ss_res = 0.0;
    let mut abs_err = 0.0;
    for (t, p) in y_true.iter().zip(y_pred) {
        ss_res += (t - p).powi(2);
        abs_err += (t - p).abs();
    }

    let mean = y_true.iter().sum::<f64>() / n;
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();
    let r2 = if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else if ss_res == 0.0 {
        1.0
    } else {
        0.0
    };

    let mse = ss_res / n;
    Metrics {
        mse,
        rmse: mse.sqrt(),
        r2,
        mae: abs_err / n,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_exact_linear_relationship() {
        let x = vec![
            vec![1.0, 2.0],
            vec![2.0, 1.0],
            vec![3.0, 5.0],
            vec![4.0, 3.0],
            vec![5.0, 8.0],
        ];
        let y: Vec<f64> = x.iter().map(|r| 1.5 + 2.0 * r[0] - 0.5 * r[1]).collect();

        let fit = fit_ols(&x, &y).unwrap();
        assert!((fit.intercept - 1.5).abs() < 1e-9);
        assert!((fit.coefficients[0] - 2.0).abs() < 1e-9);
        assert!((fit.coefficients[1] + 0.5).abs() < 1e-9);
    }

    #[test]
    fn least_squares_line_through_noisy_points() {
        // Sxy = 4.9, Sxx = 5, so the OLS line is y = 0.08 + 0.98x.
        let x = vec![[0.0], [1.0], [2.0], [3.0]];
        let y = vec![0.0, 1.2, 2.0, 3.0];
        let fit = fit_ols(&x, &y).unwrap();
        assert!((fit.coefficients[0] - 0.98).abs() < 1e-9);
        assert!((fit.intercept - 0.08).abs() < 1e-9);
    }

    #[test]
    fn collinear_features_are_singular() {
        let x = vec![[1.0, 2.0], [2.0, 4.0], [3.0, 6.0], [4.0, 8.0]];
        let y = vec![1.0, 2.0, 3.0, 4.0];
        assert!(matches!(fit_ols(&x, &y), Err(TrainingError::SingularMatrix)));
    }

    #[test]
    fn needs_more_rows_than_features() {
        let x = vec![[1.0, 2.0], [2.0, 1.0]];
        let y = vec![1.0, 2.0];
        assert!(matches!(
            fit_ols(&x, &y),
            Err(TrainingError::TooFewRows { rows: 2, needed: 3 })
        ));
    }

    #[test]
    fn metrics_match_hand_computed_values() {
        let m = evaluate(&[1.0, 2.0, 3.0], &[1.0, 2.0, 4.0]);
        assert!((m.mse - 1.0 / 3.0).abs() < 1e-12);
        assert!((m.rmse - (1.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert!((m.mae - 1.0 / 3.0).abs() < 1e-12);
        // ss_tot = 2, ss_res = 1
        assert!((m.r2 - 0.5).abs() < 1e-12);
    }

    #[test]
    fn perfect_predictions_score_one() {
        let m = evaluate(&[0.5, 0.7], &[0.5, 0.7]);
        assert_eq!(m.mse, 0.0);
        assert_eq!(m.r2, 1.0);
    }
}
