//! Lagrange interpolation over GF(2053).
//!
//! For points `(x_i, y_i)` the value of the interpolating polynomial at `t` is
//! `sum_i y_i * L_i(t)` with `L_i(t) = prod_{j != i} (t - x_j) / (x_i - x_j)`. The
//! multipliers only depend on the x-coordinates, so they are computed once per set of shares
//! and applied to every polynomial shared at those coordinates.

use crate::error::{Error, Result};
use crate::field::Gf2053;

/// Lagrange basis values `L_i(t)` for the x-coordinates `xs` evaluated at `t`.
///
/// # Errors
///
/// * [`Error::DuplicateShareNumber`] if two x-coordinates coincide.
pub fn compute_lagrange_multipliers_at(xs: &[Gf2053], t: Gf2053) -> Result<Vec<Gf2053>> {
    let mut multipliers = Vec::with_capacity(xs.len());

    for (i, &x_i) in xs.iter().enumerate() {
        let mut numerator = Gf2053::ONE;
        let mut denominator = Gf2053::ONE;

        for (j, &x_j) in xs.iter().enumerate() {
            if i != j {
                numerator *= t - x_j;
                denominator *= x_i - x_j;
            }
        }

        let weight = numerator
            .checked_div(denominator)
            .map_err(|_| Error::DuplicateShareNumber(x_i.value()))?;
        multipliers.push(weight);
    }

    Ok(multipliers)
}

/// Lagrange multipliers `L_i(0)` used to recover a secret from shares at `xs`.
pub fn compute_lagrange_multipliers(xs: &[Gf2053]) -> Result<Vec<Gf2053>> {
    compute_lagrange_multipliers_at(xs, Gf2053::ZERO)
}

/// Applies precomputed multipliers to the y-values of one polynomial.
///
/// `ys[i]` must be the value at the x-coordinate the `i`-th multiplier was computed for.
pub fn lagrange_interpolate_at_zero(ys: &[Gf2053], multipliers: &[Gf2053]) -> Gf2053 {
    ys.iter()
        .zip(multipliers)
        .map(|(&y, &l)| y * l)
        .sum()
}

/// Interpolates the value at zero of the polynomial through `points` in one step.
pub fn interpolate_at_zero(points: &[(Gf2053, Gf2053)]) -> Result<Gf2053> {
    let xs: Vec<Gf2053> = points.iter().map(|&(x, _)| x).collect();
    let ys: Vec<Gf2053> = points.iter().map(|&(_, y)| y).collect();
    let multipliers = compute_lagrange_multipliers(&xs)?;
    Ok(lagrange_interpolate_at_zero(&ys, &multipliers))
}
