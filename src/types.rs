use std::fmt;

/// HID command codes understood by the FUNcube Dongle Pro+ firmware.
///
/// Read and write opcodes share one numeric namespace.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    /// Returns the "FCDAPP version" identity string.
    Query = 1,
    /// Send with 3 byte unsigned little endian frequency in kHz.
    SetFrequencyKhz = 100,
    /// Send with 4 byte unsigned little endian frequency in Hz, returns the frequency actually set.
    SetFrequencyHz = 101,
    /// Returns 4 byte unsigned little endian frequency in Hz.
    GetFrequencyHz = 102,
    SetLnaGain = 110,
    SetRfFilter = 113,
    SetMixerGain = 114,
    SetIfGain = 117,
    SetIfFilter = 122,
    SetBiasTee = 126,
    GetLnaGain = 150,
    GetRfFilter = 153,
    GetMixerGain = 154,
    GetIfGain = 157,
    GetIfFilter = 162,
    GetBiasTee = 166,
}

/// Tuner RF band-select filter.
///
/// Values the firmware reports outside the known set are kept in [`RfFilter::Unknown`]
/// so they survive a read/write round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RfFilter {
    /// 0-4MHz
    Mhz0To4,
    /// 4-8MHz
    Mhz4To8,
    /// 8-16MHz
    Mhz8To16,
    /// 16-32MHz
    Mhz16To32,
    /// 32-75MHz
    Mhz32To75,
    /// 75-125MHz
    Mhz75To125,
    /// 125-250MHz
    Mhz125To250,
    /// 145MHz
    Mhz145,
    /// 410-875MHz
    Mhz410To875,
    /// 435MHz
    Mhz435,
    /// 875-2000MHz
    Mhz875To2000,
    /// Raw value with no known band.
    Unknown(u8),
}

impl RfFilter {
    /// Human readable band label.
    pub fn label(self) -> &'static str {
        match self {
            RfFilter::Mhz0To4 => "0-4MHz",
            RfFilter::Mhz4To8 => "4-8MHz",
            RfFilter::Mhz8To16 => "8-16MHz",
            RfFilter::Mhz16To32 => "16-32MHz",
            RfFilter::Mhz32To75 => "32-75MHz",
            RfFilter::Mhz75To125 => "75-125MHz",
            RfFilter::Mhz125To250 => "125-250MHz",
            RfFilter::Mhz145 => "145MHz",
            RfFilter::Mhz410To875 => "410-875MHz",
            RfFilter::Mhz435 => "435MHz",
            RfFilter::Mhz875To2000 => "875-2000MHz",
            RfFilter::Unknown(_) => "unknown RF filter",
        }
    }
}

impl From<u8> for RfFilter {
    fn from(raw: u8) -> Self {
        match raw {
            0 => RfFilter::Mhz0To4,
            1 => RfFilter::Mhz4To8,
            2 => RfFilter::Mhz8To16,
            3 => RfFilter::Mhz16To32,
            4 => RfFilter::Mhz32To75,
            5 => RfFilter::Mhz75To125,
            6 => RfFilter::Mhz125To250,
            7 => RfFilter::Mhz145,
            8 => RfFilter::Mhz410To875,
            9 => RfFilter::Mhz435,
            10 => RfFilter::Mhz875To2000,
            other => RfFilter::Unknown(other),
        }
    }
}

impl From<RfFilter> for u8 {
    fn from(filter: RfFilter) -> Self {
        match filter {
            RfFilter::Mhz0To4 => 0,
            RfFilter::Mhz4To8 => 1,
            RfFilter::Mhz8To16 => 2,
            RfFilter::Mhz16To32 => 3,
            RfFilter::Mhz32To75 => 4,
            RfFilter::Mhz75To125 => 5,
            RfFilter::Mhz125To250 => 6,
            RfFilter::Mhz145 => 7,
            RfFilter::Mhz410To875 => 8,
            RfFilter::Mhz435 => 9,
            RfFilter::Mhz875To2000 => 10,
            RfFilter::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for RfFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tuner IF filter bandwidth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IfFilter {
    /// 200kHz
    Khz200,
    /// 300kHz
    Khz300,
    /// 600kHz
    Khz600,
    /// 1536kHz
    Khz1536,
    /// 5MHz
    Mhz5,
    /// 6MHz
    Mhz6,
    /// 7MHz
    Mhz7,
    /// 8MHz
    Mhz8,
    /// Raw value with no known bandwidth.
    Unknown(u8),
}

impl IfFilter {
    /// Human readable bandwidth label.
    pub fn label(self) -> &'static str {
        match self {
            IfFilter::Khz200 => "200kHz",
            IfFilter::Khz300 => "300kHz",
            IfFilter::Khz600 => "600kHz",
            IfFilter::Khz1536 => "1536kHz",
            IfFilter::Mhz5 => "5MHz",
            IfFilter::Mhz6 => "6MHz",
            IfFilter::Mhz7 => "7MHz",
            IfFilter::Mhz8 => "8MHz",
            IfFilter::Unknown(_) => "unknown IF filter",
        }
    }
}

impl From<u8> for IfFilter {
    fn from(raw: u8) -> Self {
        match raw {
            0 => IfFilter::Khz200,
            1 => IfFilter::Khz300,
            2 => IfFilter::Khz600,
            3 => IfFilter::Khz1536,
            4 => IfFilter::Mhz5,
            5 => IfFilter::Mhz6,
            6 => IfFilter::Mhz7,
            7 => IfFilter::Mhz8,
            other => IfFilter::Unknown(other),
        }
    }
}

impl From<IfFilter> for u8 {
    fn from(filter: IfFilter) -> Self {
        match filter {
            IfFilter::Khz200 => 0,
            IfFilter::Khz300 => 1,
            IfFilter::Khz600 => 2,
            IfFilter::Khz1536 => 3,
            IfFilter::Mhz5 => 4,
            IfFilter::Mhz6 => 5,
            IfFilter::Mhz7 => 6,
            IfFilter::Mhz8 => 7,
            IfFilter::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for IfFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Writable tuner parameters of the dongle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Tuned frequency in Hz.
    pub frequency_hz: u32,
    /// Low-noise amplifier (on/off).
    pub lna_gain: bool,
    /// RF band-select filter.
    pub rf_filter: RfFilter,
    /// Mixer gain (on/off).
    pub mixer_gain: bool,
    /// IF gain, 0-59dB.
    pub if_gain: u8,
    /// IF filter bandwidth.
    pub if_filter: IfFilter,
    /// DC power injected on the antenna port.
    pub bias_tee: bool,
}

/// Everything the dongle reports about itself.
///
/// The [`Display`](fmt::Display) impl renders the status report, one attribute per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    /// Firmware identity string, e.g. `FCDAPP 20.03`.
    pub identity: String,
    /// Current tuner state.
    pub settings: Settings,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.settings;
        writeln!(f, "{:>12} {}", "Query:", self.identity)?;
        writeln!(f, "{:>12} {} Hz", "Freq:", s.frequency_hz)?;
        writeln!(f, "{:>12} {}", "LNA gain:", s.lna_gain)?;
        writeln!(f, "{:>12} {}", "RF filter:", s.rf_filter)?;
        writeln!(f, "{:>12} {}", "Mixer gain:", s.mixer_gain)?;
        writeln!(f, "{:>12} {} dB", "IF gain:", s.if_gain)?;
        writeln!(f, "{:>12} {}", "IF filter:", s.if_filter)?;
        writeln!(f, "{:>12} {}", "Bias tee:", s.bias_tee)
    }
}

/// FUNcube Dongle errors.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Discovery did not resolve to exactly one device.
    #[error("expected exactly one FUNcube Dongle Pro+, found {found}")]
    Discovery {
        /// Number of matching devices seen on the bus.
        found: usize,
    },
    /// Enumerating or opening the device failed.
    #[error("open: {0}")]
    Open(#[from] std::io::Error),
    /// The device exposes no HID interface with interrupt endpoints.
    #[error("no HID interface with interrupt IN and OUT endpoints")]
    NoHidInterface,
    /// USB transfer error.
    #[error("transfer: {0}")]
    Transfer(#[from] nusb::transfer::TransferError),
    /// Transfer truncated.
    #[error("transfer truncated: {actual} of {expected} bytes")]
    TransferTruncated {
        /// Actual amount of bytes transferred.
        actual: usize,
        /// Expected number of bytes transferred.
        expected: usize,
    },
    /// Invalid argument provided.
    #[error("{0}")]
    Argument(&'static str),
}

/// Result type for operations that may return an `Error`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod test {
    use super::*;

    const RF_LABELS: [&str; 11] = [
        "0-4MHz",
        "4-8MHz",
        "8-16MHz",
        "16-32MHz",
        "32-75MHz",
        "75-125MHz",
        "125-250MHz",
        "145MHz",
        "410-875MHz",
        "435MHz",
        "875-2000MHz",
    ];

    const IF_LABELS: [&str; 8] = [
        "200kHz", "300kHz", "600kHz", "1536kHz", "5MHz", "6MHz", "7MHz", "8MHz",
    ];

    #[test]
    fn rf_filter_labels() {
        for raw in 0..=u8::MAX {
            let filter = RfFilter::from(raw);
            let expected = RF_LABELS
                .get(raw as usize)
                .copied()
                .unwrap_or("unknown RF filter");
            assert_eq!(filter.to_string(), expected, "raw {raw}");
            assert_eq!(u8::from(filter), raw);
        }
        assert_eq!(RfFilter::from(11), RfFilter::Unknown(11));
    }

    #[test]
    fn if_filter_labels() {
        for raw in 0..=u8::MAX {
            let filter = IfFilter::from(raw);
            let expected = IF_LABELS
                .get(raw as usize)
                .copied()
                .unwrap_or("unknown IF filter");
            assert_eq!(filter.to_string(), expected, "raw {raw}");
            assert_eq!(u8::from(filter), raw);
        }
        assert_eq!(IfFilter::from(0xFF), IfFilter::Unknown(0xFF));
    }

    #[test]
    fn status_report() {
        let status = Status {
            identity: "FCDAPP 20.03".into(),
            settings: Settings {
                frequency_hz: 100_000_000,
                lna_gain: true,
                rf_filter: RfFilter::Mhz75To125,
                mixer_gain: false,
                if_gain: 12,
                if_filter: IfFilter::Unknown(42),
                bias_tee: false,
            },
        };

        let expected = concat!(
            "      Query: FCDAPP 20.03\n",
            "       Freq: 100000000 Hz\n",
            "   LNA gain: true\n",
            "  RF filter: 75-125MHz\n",
            " Mixer gain: false\n",
            "    IF gain: 12 dB\n",
            "  IF filter: unknown IF filter\n",
            "   Bias tee: false\n",
        );
        assert_eq!(status.to_string(), expected);
    }
}
