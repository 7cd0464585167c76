//! Indicator variants built from output lines, plus a headless one.
//!
//! | Variant | Outputs | Color mapping |
//! |---------|---------|---------------|
//! | [`TriStateLamp`] | positive, negative, session | green, red and blue channels |
//! | [`SingleLamp`] | one | on for any lit color |
//! | [`LogIndicator`] | none | every change is logged |

use crate::{
    HardwareError, Result,
    traits::{IndicatorDevice, OutputLine},
    types::{DeviceInfo, LedColor},
};
use tracing::info;

/// Three-segment lamp: positive (green), negative (red) and session (blue).
///
/// Each RGB channel of the requested color drives one segment, so mixed
/// colors light several segments at once (yellow lights positive and
/// negative together).
///
/// # Examples
///
/// ```
/// use rollcall_hardware::lamp::TriStateLamp;
/// use rollcall_hardware::mock::MockLine;
/// use rollcall_hardware::traits::IndicatorDevice;
/// use rollcall_hardware::types::LedColor;
///
/// #[tokio::main]
/// async fn main() -> rollcall_hardware::Result<()> {
///     let (pos, neg, session) = (MockLine::new(), MockLine::new(), MockLine::new());
///     let mut lamp = TriStateLamp::new(pos.clone(), neg.clone(), session.clone());
///
///     lamp.set_led(LedColor::Cyan).await?;
///     assert!(pos.is_active() && session.is_active() && !neg.is_active());
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct TriStateLamp<L: OutputLine> {
    positive: L,
    negative: L,
    session: L,
}

impl<L: OutputLine> TriStateLamp<L> {
    pub fn new(positive: L, negative: L, session: L) -> Self {
        Self {
            positive,
            negative,
            session,
        }
    }

    /// Build a lamp from exactly three lines, in positive, negative, session order.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for any other number of lines.
    pub fn from_lines(lines: Vec<L>) -> Result<Self> {
        let count = lines.len();
        let mut lines = lines.into_iter();
        match (lines.next(), lines.next(), lines.next(), lines.next()) {
            (Some(positive), Some(negative), Some(session), None) => {
                Ok(Self::new(positive, negative, session))
            }
            _ => Err(HardwareError::configuration(format!(
                "tri-state lamp needs 3 lines, got {}",
                count
            ))),
        }
    }
}

impl<L: OutputLine> IndicatorDevice for TriStateLamp<L> {
    async fn set_led(&mut self, color: LedColor) -> Result<()> {
        let (r, g, b) = color.as_rgb();
        self.positive.set_active(g > 0)?;
        self.negative.set_active(r > 0)?;
        self.session.set_active(b > 0)?;
        Ok(())
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new("status-lamp", "Tri-state lamp"))
    }
}

/// Single-segment lamp: lit for any color other than off.
///
/// Signals on this lamp are told apart by their pulse pattern only.
#[derive(Debug)]
pub struct SingleLamp<L: OutputLine> {
    line: L,
}

impl<L: OutputLine> SingleLamp<L> {
    pub fn new(line: L) -> Self {
        Self { line }
    }

    /// Build a lamp from exactly one line.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for any other number of lines.
    pub fn from_lines(lines: Vec<L>) -> Result<Self> {
        let count = lines.len();
        let mut lines = lines.into_iter();
        match (lines.next(), lines.next()) {
            (Some(line), None) => Ok(Self::new(line)),
            _ => Err(HardwareError::configuration(format!(
                "single lamp needs 1 line, got {}",
                count
            ))),
        }
    }
}

impl<L: OutputLine> IndicatorDevice for SingleLamp<L> {
    async fn set_led(&mut self, color: LedColor) -> Result<()> {
        self.line.set_active(color.is_lit())
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new("status-lamp", "Single lamp"))
    }
}

/// Headless indicator for terminals without lamps.
#[derive(Debug, Clone)]
pub struct LogIndicator {
    name: String,
    current: LedColor,
}

impl LogIndicator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            current: LedColor::Off,
        }
    }

    pub fn current(&self) -> LedColor {
        self.current
    }
}

impl Default for LogIndicator {
    fn default() -> Self {
        Self::new("indicator")
    }
}

impl IndicatorDevice for LogIndicator {
    async fn set_led(&mut self, color: LedColor) -> Result<()> {
        if color != self.current {
            info!(indicator = %self.name, ?color, "Indicator changed");
            self.current = color;
        }
        Ok(())
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new(self.name.clone(), "Log only"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockLine;
    use rstest::rstest;

    #[rstest]
    #[case(LedColor::Off, false, false, false)]
    #[case(LedColor::Green, true, false, false)]
    #[case(LedColor::Red, false, true, false)]
    #[case(LedColor::Blue, false, false, true)]
    #[case(LedColor::Yellow, true, true, false)]
    #[case(LedColor::Cyan, true, false, true)]
    #[case(LedColor::Magenta, false, true, true)]
    #[tokio::test]
    async fn test_tri_state_mapping(
        #[case] color: LedColor,
        #[case] positive: bool,
        #[case] negative: bool,
        #[case] session: bool,
    ) {
        let (pos, neg, ses) = (MockLine::new(), MockLine::new(), MockLine::new());
        let mut lamp = TriStateLamp::new(pos.clone(), neg.clone(), ses.clone());

        lamp.set_led(color).await.unwrap();

        assert_eq!(pos.is_active(), positive);
        assert_eq!(neg.is_active(), negative);
        assert_eq!(ses.is_active(), session);
    }

    #[test]
    fn test_tri_state_line_count() {
        assert!(TriStateLamp::from_lines(vec![MockLine::new(); 3]).is_ok());

        let err = TriStateLamp::from_lines(vec![MockLine::new(); 2]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: tri-state lamp needs 3 lines, got 2"
        );
        assert!(TriStateLamp::from_lines(vec![MockLine::new(); 4]).is_err());
    }

    #[tokio::test]
    async fn test_single_lamp() {
        let line = MockLine::new();
        let mut lamp = SingleLamp::new(line.clone());

        lamp.set_led(LedColor::Magenta).await.unwrap();
        assert!(line.is_active());

        lamp.set_led(LedColor::Off).await.unwrap();
        assert!(!line.is_active());
    }

    #[test]
    fn test_single_lamp_line_count() {
        assert!(SingleLamp::from_lines(vec![MockLine::new()]).is_ok());
        assert!(SingleLamp::<MockLine>::from_lines(vec![]).is_err());
        assert!(SingleLamp::from_lines(vec![MockLine::new(); 2]).is_err());
    }

    #[tokio::test]
    async fn test_log_indicator_tracks_color() {
        let mut indicator = LogIndicator::default();
        assert_eq!(indicator.current(), LedColor::Off);

        indicator.set_led(LedColor::Red).await.unwrap();
        assert_eq!(indicator.current(), LedColor::Red);

        let info = indicator.get_info().await.unwrap();
        assert_eq!(info.model, "Log only");
    }
}
