//! Ancillary latitude functions shared by the conformal and authalic
//! projections (Transverse Mercator, Lambert, Mercator, Albers — spec.
//! §4.3). Adapted from the teacher crate's `math::ancillary` module,
//! trimmed to the functions this engine's Snyder-style projections
//! actually call.

/// The Gudermannian function's inverse: `gd⁻¹(χ) = asinh(tan χ)`, the
/// isometric latitude of a point at conformal latitude `χ` on the sphere.
/// Used by the Mercator/Transverse-Mercator inverse series.
#[must_use]
pub fn gudermannian_inv(arg: f64) -> f64 {
    arg.tan().asinh()
}

/// `ts(φ)`, Snyder (1987) eq. (7-10): the exponential of the negated
/// isometric latitude, evaluated in the numerically stable way used by
/// PROJ's `pj_tsfn` (and the teacher crate's `math::ancillary::ts`).
///
/// `ts = exp(-ψ) = 1 / (tan χ + sec χ)`, where `χ` is the conformal
/// latitude corresponding to geographic latitude `φ`.
#[must_use]
pub fn ts(sincos: (f64, f64), e: f64) -> f64 {
    let factor = if sincos.0 > 0. {
        sincos.1 / (1. + sincos.0)
    } else {
        (1. - sincos.0) / sincos.1
    };
    (e * (e * sincos.0).atanh()).exp() * factor
}

/// Snyder (1982) eq. 14-15: `m(φ) = cos φ / sqrt(1 - e² sin²φ)`, the
/// Lambert/Albers `m` function named in spec. §4.3.
#[must_use]
pub fn pj_msfn(sincos: (f64, f64), es: f64) -> f64 {
    sincos.1 / (1. - sincos.0 * sincos.0 * es).sqrt()
}

/// Recover the conformal-latitude tangent from `ts`, the PROJ `pj_phi2`
/// equivalent, used by the Lambert/Mercator inverse.
#[must_use]
pub fn pj_phi2(ts0: f64, e: f64) -> f64 {
    sinhpsi_to_tanphi((1. / ts0 - ts0) / 2., e).atan()
}

/// The Albers authalic-latitude function `q(φ)` named in spec. §4.3:
///
/// `q(φ) = (1 − e²)·[sin φ/(1 − e² sin²φ) − 1/(2e)·ln((1 − e sin φ)/(1 + e sin φ))]`
#[must_use]
pub fn qs(sinphi: f64, e: f64) -> f64 {
    let es = e * e;
    let one_es = 1.0 - es;
    if e < 1e-7 {
        return 2.0 * sinphi;
    }
    let con = e * sinphi;
    let div1 = 1.0 - con * con;
    let div2 = 1.0 + con;
    one_es * (sinphi / div1 - (0.5 / e) * ((1. - con) / div2).ln())
}

/// Inverse isometric latitude, following Karney (2011) / PROJ's `phi2.cpp`,
/// used by [`pj_phi2`].
#[must_use]
pub fn sinhpsi_to_tanphi(taup: f64, e: f64) -> f64 {
    const MAX_ITER: usize = 5;

    let rooteps: f64 = f64::EPSILON.sqrt();
    let tol: f64 = rooteps / 10.;
    let tmax: f64 = 2. / rooteps;

    let e2m = 1. - e * e;
    let stol = tol * taup.abs().max(1.0);

    let mut tau = if taup.abs() > 70. {
        taup * (e * e.atanh()).exp()
    } else {
        taup / e2m
    };

    if (tau.abs() >= tmax) || tau.is_nan() {
        return tau;
    }

    for _ in 0..MAX_ITER {
        let tau1 = (1. + tau * tau).sqrt();
        let sig = (e * (e * tau / tau1).atanh()).sinh();
        let taupa = (1. + sig * sig).sqrt() * tau - sig * tau1;
        let dtau = (taup - taupa) * (1. + e2m * (tau * tau))
            / (e2m * tau1 * (1. + taupa * taupa).sqrt());
        tau += dtau;
        if (dtau.abs() < stol) || tau.is_nan() {
            return tau;
        }
    }
    f64::NAN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ts_and_phi2_round_trip() {
        let e = 0.081_819_19;
        let phi = 45f64.to_radians();
        let t = ts(phi.sin_cos(), e);
        let back = pj_phi2(t, e);
        assert!((back - phi).abs() < 1e-10);
    }

    #[test]
    fn qs_is_linear_for_a_sphere() {
        assert!((qs(0.5, 0.0) - 1.0).abs() < 1e-12);
    }
}
