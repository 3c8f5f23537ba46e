//! Common test fixtures for producer tests.
//!
//! Bounding boxes are `[min_long, min_lat, max_long, max_lat]` in degrees.

/// Common bounding box definitions for testing.
pub mod bbox {
    /// Northern Adriatic coastal strip off Rimini.
    /// Tiles into 9 columns x 8 rows at 20 km² cells.
    pub const ADRIATIC: [f64; 4] = [12.0, 44.0, 12.5, 44.3];

    /// 0.1 degree square on the equator.
    /// Tiles into a 3 x 3 grid at 20 km² cells.
    pub const EQUATOR_SMALL: [f64; 4] = [0.0, 0.0, 0.1, 0.1];

    /// 1 degree square on the equator.
    /// Tiles into a 25 x 25 grid at 20 km² cells.
    pub const EQUATOR_DEGREE: [f64; 4] = [0.0, 0.0, 1.0, 1.0];

    /// English Channel, 2 x 1 degrees.
    pub const CHANNEL: [f64; 4] = [-1.0, 50.0, 1.0, 51.0];

    /// Zero height (degenerate).
    pub const FLAT: [f64; 4] = [0.0, 10.0, 1.0, 10.0];

    /// Invalid bbox (min > max)
    pub const INVERTED: [f64; 4] = [10.0, 10.0, 5.0, 5.0];
}

/// Area identifiers used across tests.
pub mod area {
    pub const MACROAREA: &str = "adriatic";
    pub const MICROAREA: &str = "rimini_01";
    pub const OTHER_MICROAREA: &str = "rimini_02";
}

/// Fixed timestamps in payload format.
pub mod time {
    pub const SAMPLE_TIMESTAMP: &str = "2025-06-01T10:15:30.123";
}
