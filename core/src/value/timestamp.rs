//! Tick-based time stamps.

use core::fmt;

use crate::error::{EngineError, Result};

/// Smallest permitted tick rate.
pub const MIN_TPS: u32 = 1;

/// Largest permitted tick rate; millisecond resolution at best.
pub const MAX_TPS: u32 = 1000;

/// A point in time measured in ticks at a fixed tick rate.
///
/// The canonical form is `hh:mm:ss:fff`, where `fff` is the tick remainder
/// within the second:
///
/// ```
/// use annotdb_core::TimeStamp;
///
/// let ts = TimeStamp::new(60, 3_723 * 60 + 7)?;
/// assert_eq!(ts.to_string(), "01:02:03:007");
/// assert_eq!(ts.to_diagnostic_string(), "(60,01:02:03:007)");
/// # Ok::<(), annotdb_core::EngineError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawTimeStamp"))]
pub struct TimeStamp {
    tps: u32,
    ticks: u64,
}

/// Unchecked wire shape of a [`TimeStamp`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawTimeStamp {
    tps: u32,
    ticks: u64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawTimeStamp> for TimeStamp {
    type Error = EngineError;

    fn try_from(raw: RawTimeStamp) -> Result<Self> {
        Self::new(raw.tps, raw.ticks)
    }
}

impl TimeStamp {
    /// Creates a time stamp.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidArgument`] if `tps` is outside
    /// `MIN_TPS..=MAX_TPS`.
    pub fn new(tps: u32, ticks: u64) -> Result<Self> {
        check_tps(tps)?;
        Ok(Self { tps, ticks })
    }

    /// Time zero at the given tick rate.
    ///
    /// # Errors
    ///
    /// Same as [`TimeStamp::new`].
    pub fn zero(tps: u32) -> Result<Self> {
        Self::new(tps, 0)
    }

    /// Ticks per second.
    #[must_use]
    pub fn ticks_per_second(&self) -> u32 {
        self.tps
    }

    /// Elapsed ticks.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Whole hours.
    #[must_use]
    pub fn hours(&self) -> u64 {
        self.ticks / u64::from(self.tps) / 3600
    }

    /// Minutes past the hour.
    #[must_use]
    pub fn minutes(&self) -> u64 {
        self.ticks / u64::from(self.tps) / 60 % 60
    }

    /// Seconds past the minute.
    #[must_use]
    pub fn seconds(&self) -> u64 {
        self.ticks / u64::from(self.tps) % 60
    }

    /// Ticks past the second, in `0..tps`.
    #[must_use]
    pub fn sub_second_ticks(&self) -> u64 {
        self.ticks % u64::from(self.tps)
    }

    /// Re-expresses this time stamp at another tick rate, rounding to the
    /// nearest tick.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidArgument`] if `tps` is out of range.
    pub fn convert_to(&self, tps: u32) -> Result<Self> {
        check_tps(tps)?;
        if tps == self.tps {
            return Ok(*self);
        }
        let scaled = u128::from(self.ticks) * u128::from(tps);
        let old = u128::from(self.tps);
        let ticks = (scaled + old / 2) / old;
        Ok(Self {
            tps,
            ticks: u64::try_from(ticks).unwrap_or(u64::MAX),
        })
    }

    /// Clamps into `[min, max]`, comparing at this time stamp's tick rate.
    #[must_use]
    pub(crate) fn clamp_between(self, min: &Self, max: &Self) -> Self {
        let lo = min.convert_to(self.tps).map_or(min.ticks, |m| m.ticks);
        let hi = max.convert_to(self.tps).map_or(max.ticks, |m| m.ticks);
        Self {
            tps: self.tps,
            ticks: self.ticks.clamp(lo, hi.max(lo)),
        }
    }

    /// `(tps,hh:mm:ss:fff)`, the form used inside the diagnostic rendering.
    #[must_use]
    pub fn to_diagnostic_string(&self) -> String {
        format!("({},{self})", self.tps)
    }
}

fn check_tps(tps: u32) -> Result<()> {
    if (MIN_TPS..=MAX_TPS).contains(&tps) {
        Ok(())
    } else {
        Err(EngineError::invalid(format!(
            "ticks per second {tps} outside {MIN_TPS}..={MAX_TPS}"
        )))
    }
}

impl fmt::Display for TimeStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}:{:03}",
            self.hours(),
            self.minutes(),
            self.seconds(),
            self.sub_second_ticks()
        )
    }
}
