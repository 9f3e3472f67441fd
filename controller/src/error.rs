//! Configuration and level setup error types.

/// Errors raised while loading or validating a [`crate::ControllerConfig`].
///
/// The controller itself has no runtime failure modes; everything here is a wiring or
/// tuning defect that should stop the program at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the config file from disk.
    #[error("failed to read config: {0}")]
    Read(#[source] std::io::Error),

    /// Failed to parse RON content.
    #[error("failed to parse config: {0}")]
    Parse(#[source] ron::error::SpannedError),

    /// A value must be strictly positive.
    #[error("`{field}` must be > 0 (got {value})")]
    NotPositive { field: &'static str, value: f32 },

    /// A value must be zero or positive.
    #[error("`{field}` must be >= 0 (got {value})")]
    Negative { field: &'static str, value: f32 },

    /// A value is NaN or infinite.
    #[error("`{field}` must be finite (got {value})")]
    NotFinite { field: &'static str, value: f32 },

    /// The pitch range is empty.
    #[error("camera pitch range is inverted: min {min} > max {max}")]
    InvertedPitch { min: f32, max: f32 },

    /// Gravity must pull downward for the jump equation to have a real solution.
    #[error("gravity intensity must be < 0 (got {0})")]
    UpwardGravity(f32),

    /// The animation state table references a state it does not define.
    #[error("animation state `{from}` references unknown state `{to}`")]
    UnknownState { from: String, to: String },
}

/// Errors raised while building a [`crate::RapierQueryWorld`].
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A collider names a layer the query masks cannot represent.
    #[error("collider {id} uses layer {layer}, layers must be < {}", crate::LayerMask::LAYER_COUNT)]
    LayerOutOfRange { id: u32, layer: u8 },
}
