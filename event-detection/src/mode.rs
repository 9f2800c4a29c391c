use crate::{DetectionError, DetectionResult, Real};
use serde::Serialize;

/// Direction in which a signal must cross a threshold to register.
///
/// Parsing an unsupported mode string fails with [strum::ParseError].
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Samples strictly greater than the threshold cross.
    #[default]
    Above,
    /// Samples strictly less than the threshold cross.
    Below,
}

impl Mode {
    /// Checks that `secondary` is no more restrictive than `primary` in this mode.
    pub fn check_order(&self, primary: Real, secondary: Real) -> DetectionResult<()> {
        if primary.is_nan() || secondary.is_nan() {
            return Err(DetectionError::InvalidThreshold);
        }
        let ordered = match self {
            Mode::Above => secondary <= primary,
            Mode::Below => secondary >= primary,
        };
        if ordered {
            Ok(())
        } else {
            Err(DetectionError::ThresholdOrder {
                mode: *self,
                primary,
                secondary,
            })
        }
    }
}
