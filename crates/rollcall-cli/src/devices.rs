//! Device construction from settings.

use anyhow::{Context, Result};
use rollcall_hardware::lamp::{LogIndicator, SingleLamp, TriStateLamp};
use rollcall_hardware::line::SysfsLine;
use rollcall_hardware::mock::{MockReader, MockReaderHandle};
use rollcall_hardware::{AnyCardReader, AnyIndicator};

use crate::settings::{IndicatorKind, IndicatorSettings, ReaderKind, ReaderSettings};

/// Open the configured reader.
///
/// The stdin reader comes with the handle its feeder task presents cards
/// through.
pub fn build_reader(settings: &ReaderSettings) -> Result<(AnyCardReader, Option<MockReaderHandle>)> {
    match settings.kind {
        ReaderKind::Stdin => {
            let name = settings.name.clone().unwrap_or_else(|| "stdin".to_string());
            let (reader, handle) = MockReader::with_name(name);
            Ok((AnyCardReader::Mock(reader), Some(handle)))
        }
        #[cfg(feature = "hardware-pcsc")]
        ReaderKind::Pcsc => {
            let reader = rollcall_hardware::pcsc_reader::PcscReader::open(settings.name.as_deref())
                .context("opening PC/SC reader")?;
            Ok((AnyCardReader::Pcsc(reader), None))
        }
        #[cfg(not(feature = "hardware-pcsc"))]
        ReaderKind::Pcsc => {
            anyhow::bail!("PC/SC reader requested but rollcall was built without the hardware-pcsc feature")
        }
    }
}

/// Open the configured indicator.
pub fn build_indicator(settings: &IndicatorSettings) -> Result<AnyIndicator> {
    if settings.kind == IndicatorKind::Log {
        return Ok(AnyIndicator::Log(LogIndicator::default()));
    }

    let lines = settings
        .lines
        .iter()
        .map(|path| {
            SysfsLine::open(path, settings.active_low)
                .with_context(|| format!("opening output line {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let indicator = match settings.kind {
        IndicatorKind::Single => AnyIndicator::Single(SingleLamp::from_lines(lines)?),
        IndicatorKind::Tri => AnyIndicator::TriState(TriStateLamp::from_lines(lines)?),
        IndicatorKind::Log => AnyIndicator::Log(LogIndicator::default()),
    };
    Ok(indicator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn value_files(dir: &tempfile::TempDir, count: usize) -> Vec<PathBuf> {
        (0..count)
            .map(|i| {
                let path = dir.path().join(format!("gpio{}", i));
                fs::write(&path, "0").unwrap();
                path
            })
            .collect()
    }

    #[test]
    fn test_stdin_reader_has_handle() {
        let (reader, handle) = build_reader(&ReaderSettings {
            kind: ReaderKind::Stdin,
            name: None,
        })
        .unwrap();

        assert!(matches!(reader, AnyCardReader::Mock(_)));
        assert_eq!(handle.unwrap().name(), "stdin");
    }

    #[test]
    fn test_log_indicator() {
        let indicator = build_indicator(&IndicatorSettings {
            kind: IndicatorKind::Log,
            lines: vec![],
            active_low: true,
        })
        .unwrap();
        assert!(matches!(indicator, AnyIndicator::Log(_)));
    }

    #[test]
    fn test_tri_state_indicator() {
        let dir = tempfile::tempdir().unwrap();
        let indicator = build_indicator(&IndicatorSettings {
            kind: IndicatorKind::Tri,
            lines: value_files(&dir, 3),
            active_low: true,
        })
        .unwrap();
        assert!(matches!(indicator, AnyIndicator::TriState(_)));
    }

    #[test]
    fn test_missing_line_file() {
        let result = build_indicator(&IndicatorSettings {
            kind: IndicatorKind::Single,
            lines: vec![PathBuf::from("/nonexistent/gpio/value")],
            active_low: true,
        });
        assert!(result.is_err());
    }
}
