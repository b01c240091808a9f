//! Coordinate frames and the WGS84 <-> ENU tangent-plane conversion

/// WGS84 semi-major axis in meters
const WGS84_A: f64 = 6_378_137.0;

/// WGS84 first eccentricity squared
const WGS84_E2: f64 = 6.69437999014e-3;

/// Geographic reference point defining the origin of the local ENU frame
///
/// Latitude and longitude are in degrees, altitude in meters. The datum itself
/// maps to the local origin `(0, 0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Datum {
    pub lat: f64,
    pub lon: f64,
    pub alt: f64,
}

impl Datum {
    pub fn new(lat: f64, lon: f64, alt: f64) -> Self {
        Self { lat, lon, alt }
    }

    /// Meridian (M) and prime-vertical (N) radii of curvature at this latitude
    fn radii(&self) -> (f64, f64) {
        let lat = self.lat.to_radians();
        let s2 = lat.sin() * lat.sin();
        let denom = (1.0 - WGS84_E2 * s2).sqrt();
        let n = WGS84_A / denom;
        let m = WGS84_A * (1.0 - WGS84_E2) / (denom * denom * denom);
        (m, n)
    }
}

/// Roll/pitch/yaw orientation in radians
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Euler {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl Euler {
    /// Orientation with only a yaw component, roll and pitch zero
    pub fn yaw_only(yaw: f64) -> Self {
        Self {
            roll: 0.0,
            pitch: 0.0,
            yaw,
        }
    }
}

/// Geographic (WGS84) coordinate: latitude/longitude in degrees, altitude in meters
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Wgs {
    pub lat: f64,
    pub lon: f64,
    pub alt: f64,
}

impl Wgs {
    pub fn new(lat: f64, lon: f64, alt: f64) -> Self {
        Self { lat, lon, alt }
    }

    /// Project into the local East-North-Up frame centered on `datum`
    pub fn to_enu(&self, datum: &Datum) -> Enu {
        let (m, n) = datum.radii();
        let cos_lat0 = datum.lat.to_radians().cos();
        Enu {
            x: (self.lon - datum.lon).to_radians() * (n + datum.alt) * cos_lat0,
            y: (self.lat - datum.lat).to_radians() * (m + datum.alt),
            z: self.alt - datum.alt,
        }
    }
}

/// Local East-North-Up coordinate in meters, relative to a [`Datum`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Enu {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Enu {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Convert back to geographic coordinates relative to `datum`
    ///
    /// Exact algebraic inverse of [`Wgs::to_enu`] for the same datum.
    pub fn to_wgs(&self, datum: &Datum) -> Wgs {
        let (m, n) = datum.radii();
        let cos_lat0 = datum.lat.to_radians().cos();
        Wgs {
            lat: datum.lat + (self.y / (m + datum.alt)).to_degrees(),
            lon: datum.lon + (self.x / ((n + datum.alt) * cos_lat0)).to_degrees(),
            alt: self.z + datum.alt,
        }
    }
}
