//! Precision models applied to every ordinate on read and write.
//!
//! Named and shaped after the JTS/NTS `PrecisionModel` vocabulary `spec.md`
//! itself uses (§6); no literal source to ground this on survived retrieval
//! (`original_source/` kept zero files for this pack), so this is designed
//! fresh from the prose description rather than translated from anything.

/// Quantizes a single ordinate value. Implementations must be idempotent:
/// `apply(apply(x)) == apply(x)`.
pub trait PrecisionModel: Send + Sync {
    fn apply(&self, value: f64) -> f64;
}

/// No quantization; stores values exactly as read or constructed.
#[derive(Debug, Default, Clone, Copy)]
pub struct FloatingPrecisionModel;

impl PrecisionModel for FloatingPrecisionModel {
    fn apply(&self, value: f64) -> f64 {
        value
    }
}

/// Rounds to the nearest multiple of `1 / scale`.
#[derive(Debug, Clone, Copy)]
pub struct FixedPrecisionModel {
    pub scale: f64,
}

impl FixedPrecisionModel {
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }
}

impl PrecisionModel for FixedPrecisionModel {
    fn apply(&self, value: f64) -> f64 {
        (value * self.scale).round() / self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floating_is_identity() {
        let pm = FloatingPrecisionModel;
        assert_eq!(pm.apply(1.23456789), 1.23456789);
    }

    #[test]
    fn fixed_rounds_to_scale() {
        let pm = FixedPrecisionModel::new(100.0);
        assert_eq!(pm.apply(1.2349), 1.23);
        assert_eq!(pm.apply(1.2351), 1.24);
    }

    #[test]
    fn fixed_is_idempotent() {
        let pm = FixedPrecisionModel::new(1000.0);
        let once = pm.apply(0.123456);
        assert_eq!(pm.apply(once), once);
    }
}
