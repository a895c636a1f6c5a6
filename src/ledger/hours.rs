use std::{fmt::Display, str::FromStr};

use rust_decimal::Decimal;

use crate::error::InputError;

/// Upper bound for a single task: a whole week.
pub const MAX_TASK_HOURS: Decimal = Decimal::from_parts(168, 0, 0, false, 0);

/// Amount of hours spent on a task. Always in `(0, MAX_TASK_HOURS]` and kept at 2 fractional
/// digits, so sums of [Hours] are exact and every value survives the trip through an f64.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hours(Decimal);

impl Hours {
    /// Rounds to 2 fractional digits (ties to even), then checks the bounds.
    pub fn try_new(value: Decimal) -> Result<Hours, InputError> {
        let value = value.round_dp(2);
        if value <= Decimal::ZERO {
            Err(InputError::NonPositiveHours)
        } else if value > MAX_TASK_HOURS {
            Err(InputError::TooManyHours { max: MAX_TASK_HOURS })
        } else {
            Ok(Hours(value))
        }
    }

    pub fn value(self) -> Decimal {
        self.0
    }
}

impl Display for Hours {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}h", self.0)
    }
}

impl FromStr for Hours {
    type Err = InputError;

    /// Accepts both `1.5` and `1,5`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace(',', ".");
        let value = Decimal::from_str(&normalized)
            .or_else(|_| Decimal::from_scientific(&normalized))
            .map_err(|_| InputError::InvalidHours(s.trim().to_string()))?;
        Hours::try_new(value)
    }
}

/// Stores hours as a plain JSON number. Values are bounded by [super::MAX_TASK_HOURS],
/// far below the point where an f64 stops telling cents apart, so rounding back to 2 digits
/// restores the exact value.
pub(crate) mod hours_ser {
    use rust_decimal::{
        prelude::{FromPrimitive, ToPrimitive},
        Decimal,
    };
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use super::Hours;

    pub fn serialize<S>(hours: &Hours, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let value = hours
            .value()
            .to_f64()
            .ok_or_else(|| {
                <S::Error as serde::ser::Error>::custom(format!("{hours} doesn't fit into f64"))
            })?;
        serializer.serialize_f64(value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Hours, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = f64::deserialize(deserializer)?;
        let value = Decimal::from_f64(raw)
            .ok_or_else(|| D::Error::custom(format!("{raw} is not a valid amount of hours")))?;
        Hours::try_new(value).map_err(|e| D::Error::custom(format!("{raw} hours: {e}")))
    }
}
