//! Closed-form map projection math for the supported coordinate systems.
//!
//! Each projected CRS in the registry maps to one projection definition
//! here. Everything is evaluated with series expansions that are exact to
//! well below the platform's 1.5 metre transform tolerance, so no external
//! projection engine is needed.
//!
//! Coordinate convention throughout: `x` is easting/longitude and `y` is
//! northing/latitude, matching `geo_types::Coord`. Geodetic angles are
//! degrees at the API boundary and radians internally.

use crate::crs::CoordinateSystem;

/// GRS 80 semi-major axis in metres.
const GRS80_A: f64 = 6_378_137.0;
/// GRS 80 flattening.
const GRS80_F: f64 = 1.0 / 298.257_222_101;
/// Sphere radius of the web map pseudo-Mercator, metres.
const WEB_MERCATOR_RADIUS: f64 = 6_378_137.0;

/// SWEREF 99 TM: transverse Mercator over GRS 80, central meridian 15 E.
const SWEREF99TM_LON0_DEG: f64 = 15.0;
const SWEREF99TM_SCALE: f64 = 0.9996;
const SWEREF99TM_FALSE_EASTING: f64 = 500_000.0;
const SWEREF99TM_FALSE_NORTHING: f64 = 0.0;

/// RT90 2.5 gon V expressed as a direct projection of the SWEREF 99 datum.
/// The shifted central meridian (15 deg 48 min 22.624306 sec E) and scale
/// absorb the datum transition, good to a few tenths of a millimetre.
const RT90_LON0_DEG: f64 = 15.0 + 48.0 / 60.0 + 22.624_306 / 3_600.0;
const RT90_SCALE: f64 = 1.000_005_610_24;
const RT90_FALSE_EASTING: f64 = 1_500_064.274;
const RT90_FALSE_NORTHING: f64 = -667.711;

/// ETRS89-extended LAEA Europe: the EEA reference grid.
const LAEA_LAT0_DEG: f64 = 52.0;
const LAEA_LON0_DEG: f64 = 10.0;
const LAEA_FALSE_EASTING: f64 = 4_321_000.0;
const LAEA_FALSE_NORTHING: f64 = 3_210_000.0;

/// A map projection paired with its inverse.
#[derive(Debug, Clone)]
pub(crate) enum Projection {
    /// Geodetic longitude/latitude. Forward and inverse are the identity;
    /// datum differences between the geodetic systems in the registry are
    /// below the transform tolerance.
    Geodetic,
    TransverseMercator(TransverseMercator),
    LambertEqualArea(LambertEqualArea),
    PseudoMercator,
}

impl Projection {
    /// Returns the projection definition for a coordinate system.
    pub(crate) fn for_crs(crs: CoordinateSystem) -> Projection {
        match crs {
            CoordinateSystem::Wgs84 | CoordinateSystem::Sweref99 | CoordinateSystem::Etrs89 => {
                Projection::Geodetic
            }
            CoordinateSystem::Sweref99Tm => {
                Projection::TransverseMercator(TransverseMercator::new(
                    GRS80_A,
                    GRS80_F,
                    SWEREF99TM_LON0_DEG,
                    SWEREF99TM_SCALE,
                    SWEREF99TM_FALSE_EASTING,
                    SWEREF99TM_FALSE_NORTHING,
                ))
            }
            CoordinateSystem::Rt90 => Projection::TransverseMercator(TransverseMercator::new(
                GRS80_A,
                GRS80_F,
                RT90_LON0_DEG,
                RT90_SCALE,
                RT90_FALSE_EASTING,
                RT90_FALSE_NORTHING,
            )),
            CoordinateSystem::Etrs89Laea => Projection::LambertEqualArea(LambertEqualArea::new(
                GRS80_A,
                GRS80_F,
                LAEA_LAT0_DEG,
                LAEA_LON0_DEG,
                LAEA_FALSE_EASTING,
                LAEA_FALSE_NORTHING,
            )),
            CoordinateSystem::WebMercator => Projection::PseudoMercator,
        }
    }

    /// Projects geodetic degrees to this system's native coordinates.
    pub(crate) fn forward(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        match self {
            Projection::Geodetic => (lon_deg, lat_deg),
            Projection::TransverseMercator(tm) => tm.forward(lon_deg, lat_deg),
            Projection::LambertEqualArea(laea) => laea.forward(lon_deg, lat_deg),
            Projection::PseudoMercator => pseudo_mercator_forward(lon_deg, lat_deg),
        }
    }

    /// Restores geodetic degrees from this system's native coordinates.
    pub(crate) fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        match self {
            Projection::Geodetic => (x, y),
            Projection::TransverseMercator(tm) => tm.inverse(x, y),
            Projection::LambertEqualArea(laea) => laea.inverse(x, y),
            Projection::PseudoMercator => pseudo_mercator_inverse(x, y),
        }
    }
}

/// Gauss-Krueger transverse Mercator on an ellipsoid.
///
/// Series coefficients are precomputed from the ellipsoid at construction;
/// `forward` and `inverse` are then pure trigonometry. The expansion is
/// carried to the fourth power of n, exact to under a millimetre anywhere
/// within a zone.
#[derive(Debug, Clone)]
pub(crate) struct TransverseMercator {
    lon0: f64,
    scale: f64,
    false_easting: f64,
    false_northing: f64,
    e2: f64,
    a_hat: f64,
    beta: [f64; 4],
    delta: [f64; 4],
}

impl TransverseMercator {
    fn new(
        a: f64,
        f: f64,
        lon0_deg: f64,
        scale: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let e2 = f * (2.0 - f);
        let n = f / (2.0 - f);
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n2 * n2;
        let a_hat = a / (1.0 + n) * (1.0 + n2 / 4.0 + n4 / 64.0);

        let beta = [
            n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0 + 41.0 * n4 / 180.0,
            13.0 * n2 / 48.0 - 3.0 * n3 / 5.0 + 557.0 * n4 / 1440.0,
            61.0 * n3 / 240.0 - 103.0 * n4 / 140.0,
            49_561.0 * n4 / 161_280.0,
        ];
        let delta = [
            n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0 - n4 / 360.0,
            n2 / 48.0 + n3 / 15.0 - 437.0 * n4 / 1440.0,
            17.0 * n3 / 480.0 - 37.0 * n4 / 840.0,
            4_397.0 * n4 / 161_280.0,
        ];

        TransverseMercator {
            lon0: lon0_deg.to_radians(),
            scale,
            false_easting,
            false_northing,
            e2,
            a_hat,
            beta,
            delta,
        }
    }

    fn forward(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let phi = lat_deg.to_radians();
        let dlam = lon_deg.to_radians() - self.lon0;

        let e2 = self.e2;
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        let e8 = e4 * e4;
        // Conformal latitude.
        let a = e2;
        let b = (5.0 * e4 - e6) / 6.0;
        let c = (104.0 * e6 - 45.0 * e8) / 120.0;
        let d = 1237.0 * e8 / 1260.0;
        let sin2 = phi.sin() * phi.sin();
        let phi_star =
            phi - phi.sin() * phi.cos() * (a + b * sin2 + c * sin2 * sin2 + d * sin2 * sin2 * sin2);

        let xi = (phi_star.tan() / dlam.cos()).atan();
        let eta = (phi_star.cos() * dlam.sin()).atanh();

        let mut northing = xi;
        let mut easting = eta;
        for (i, b_i) in self.beta.iter().enumerate() {
            let k = 2.0 * (i + 1) as f64;
            northing += b_i * (k * xi).sin() * (k * eta).cosh();
            easting += b_i * (k * xi).cos() * (k * eta).sinh();
        }

        (
            self.false_easting + self.scale * self.a_hat * easting,
            self.false_northing + self.scale * self.a_hat * northing,
        )
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let xi = (y - self.false_northing) / (self.scale * self.a_hat);
        let eta = (x - self.false_easting) / (self.scale * self.a_hat);

        let mut xi_p = xi;
        let mut eta_p = eta;
        for (i, d_i) in self.delta.iter().enumerate() {
            let k = 2.0 * (i + 1) as f64;
            xi_p -= d_i * (k * xi).sin() * (k * eta).cosh();
            eta_p -= d_i * (k * xi).cos() * (k * eta).sinh();
        }

        let phi_star = (xi_p.sin() / eta_p.cosh()).asin();
        let dlam = (eta_p.sinh() / xi_p.cos()).atan();

        let e2 = self.e2;
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        let e8 = e4 * e4;
        let a_star = e2 + e4 + e6 + e8;
        let b_star = -(7.0 * e4 + 17.0 * e6 + 30.0 * e8) / 6.0;
        let c_star = (224.0 * e6 + 889.0 * e8) / 120.0;
        let d_star = -(4279.0 * e8) / 1260.0;
        let sin2 = phi_star.sin() * phi_star.sin();
        let phi = phi_star
            + phi_star.sin()
                * phi_star.cos()
                * (a_star + b_star * sin2 + c_star * sin2 * sin2 + d_star * sin2 * sin2 * sin2);

        ((self.lon0 + dlam).to_degrees(), phi.to_degrees())
    }
}

/// Oblique Lambert azimuthal equal-area on an ellipsoid, as specified for
/// the European Environment Agency grid.
#[derive(Debug, Clone)]
pub(crate) struct LambertEqualArea {
    lon0: f64,
    false_easting: f64,
    false_northing: f64,
    e: f64,
    e2: f64,
    qp: f64,
    rq: f64,
    d: f64,
    sin_beta0: f64,
    cos_beta0: f64,
}

impl LambertEqualArea {
    fn new(
        a: f64,
        f: f64,
        lat0_deg: f64,
        lon0_deg: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let e2 = f * (2.0 - f);
        let e = e2.sqrt();
        let qp = authalic_q(1.0, e, e2);
        let phi0 = lat0_deg.to_radians();
        let q0 = authalic_q(phi0.sin(), e, e2);
        let beta0 = (q0 / qp).clamp(-1.0, 1.0).asin();
        let rq = a * (qp / 2.0).sqrt();
        let m0 = phi0.cos() / (1.0 - e2 * phi0.sin() * phi0.sin()).sqrt();
        let d = a * m0 / (rq * beta0.cos());

        LambertEqualArea {
            lon0: lon0_deg.to_radians(),
            false_easting,
            false_northing,
            e,
            e2,
            qp,
            rq,
            d,
            sin_beta0: beta0.sin(),
            cos_beta0: beta0.cos(),
        }
    }

    fn forward(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let phi = lat_deg.to_radians();
        let lam = lon_deg.to_radians() - self.lon0;

        let q = authalic_q(phi.sin(), self.e, self.e2);
        let beta = (q / self.qp).clamp(-1.0, 1.0).asin();
        let b = self.rq
            * (2.0
                / (1.0
                    + self.sin_beta0 * beta.sin()
                    + self.cos_beta0 * beta.cos() * lam.cos()))
            .sqrt();

        (
            self.false_easting + b * self.d * beta.cos() * lam.sin(),
            self.false_northing
                + (b / self.d) * (self.cos_beta0 * beta.sin() - self.sin_beta0 * beta.cos() * lam.cos()),
        )
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let xr = (x - self.false_easting) / self.d;
        let yr = self.d * (y - self.false_northing);
        let rho = (xr * xr + yr * yr).sqrt();
        if rho < 1e-9 {
            let beta0 = self.sin_beta0.asin();
            return (self.lon0.to_degrees(), self.restore_latitude(beta0).to_degrees());
        }

        let c = 2.0 * (rho / (2.0 * self.rq)).clamp(-1.0, 1.0).asin();
        let beta_p = (c.cos() * self.sin_beta0 + yr * c.sin() * self.cos_beta0 / rho)
            .clamp(-1.0, 1.0)
            .asin();
        let lam = (xr * c.sin())
            .atan2(rho * self.cos_beta0 * c.cos() - yr * self.sin_beta0 * c.sin());

        (
            (self.lon0 + lam).to_degrees(),
            self.restore_latitude(beta_p).to_degrees(),
        )
    }

    /// Authalic-to-geodetic latitude series.
    fn restore_latitude(&self, beta: f64) -> f64 {
        let e2 = self.e2;
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        beta + (e2 / 3.0 + 31.0 * e4 / 180.0 + 517.0 * e6 / 5040.0) * (2.0 * beta).sin()
            + (23.0 * e4 / 360.0 + 251.0 * e6 / 3780.0) * (4.0 * beta).sin()
            + (761.0 * e6 / 45_360.0) * (6.0 * beta).sin()
    }
}

/// The authalic function q of EPSG guidance note 7-2.
fn authalic_q(sin_phi: f64, e: f64, e2: f64) -> f64 {
    (1.0 - e2)
        * (sin_phi / (1.0 - e2 * sin_phi * sin_phi)
            - (1.0 / (2.0 * e)) * ((1.0 - e * sin_phi) / (1.0 + e * sin_phi)).ln())
}

fn pseudo_mercator_forward(lon_deg: f64, lat_deg: f64) -> (f64, f64) {
    let x = WEB_MERCATOR_RADIUS * lon_deg.to_radians();
    let y = WEB_MERCATOR_RADIUS
        * (std::f64::consts::FRAC_PI_4 + lat_deg.to_radians() / 2.0)
            .tan()
            .ln();
    (x, y)
}

fn pseudo_mercator_inverse(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / WEB_MERCATOR_RADIUS).to_degrees();
    let lat = (2.0 * (y / WEB_MERCATOR_RADIUS).exp().atan() - std::f64::consts::FRAC_PI_2)
        .to_degrees();
    (lon, lat)
}
