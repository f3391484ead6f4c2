#![deny(unsafe_code)]

//! # FUNcube Dongle Pro+ API
//!
//! This crate provides a Rust interface to the [FUNcube Dongle Pro+](http://www.funcubedongle.com/),
//! a USB software-defined radio (SDR) receiver. The dongle is controlled through 65-byte HID
//! reports: one command byte out, one fixed-layout response back.
//!
//! ## Example
//!
//! ```rust,no_run
//! use anyhow::Result;
//! use fcdpp::FunCube;
//!
//! fn main() -> Result<()> {
//!     let mut radio = FunCube::open_first()?;
//!
//!     println!("{}", radio.query()?);
//!     radio.set_frequency_hz(145_800_000)?;
//!     print!("{}", radio.status()?);
//!
//!     radio.close();
//!     Ok(())
//! }
//! ```
//!
//! ## License
//!
//! This crate is licensed under the MIT License.

#![cfg_attr(docsrs, feature(doc_cfg), feature(doc_auto_cfg))]
#![warn(missing_docs)]

mod report;
mod transport;
mod types;

use log::{debug, info};
pub use report::REPORT_LEN;
pub use transport::{scan, select_single, HidInterface, Transport};
pub use types::*;

use report::Report;

/// FUNcube Dongle Pro+ USB vendor ID.
pub const FCDPP_USB_VID: u16 = 0x04D8;
/// FUNcube Dongle Pro+ USB product ID.
pub const FCDPP_USB_PID: u16 = 0xFB31;

/// Highest IF gain the tuner accepts, in dB.
pub const MAX_IF_GAIN_DB: u8 = 59;

/// A session with one FUNcube Dongle Pro+.
///
/// Every call is a blocking request/response over a single report buffer, so a session
/// needs `&mut self` and serves one exchange at a time. The handle is released on drop.
pub struct FunCube<T: Transport = HidInterface> {
    transport: T,
    report: Report,
}

impl FunCube<HidInterface> {
    /// Opens the only attached dongle matching `vendor_id:product_id`.
    ///
    /// # Errors
    /// [`Error::Discovery`] unless exactly one device matches.
    pub fn open(vendor_id: u16, product_id: u16) -> Result<Self> {
        Self::from_candidates(scan(vendor_id, product_id)?, HidInterface::open)
    }

    /// Opens the only attached FUNcube Dongle Pro+.
    pub fn open_first() -> Result<Self> {
        Self::open(FCDPP_USB_VID, FCDPP_USB_PID)
    }
}

impl<T: Transport> FunCube<T> {
    /// Wraps an already opened transport.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            report: Report::new(),
        }
    }

    /// Resolves `candidates` to exactly one device and opens it with `opener`.
    ///
    /// `opener` is never called when discovery fails.
    pub fn from_candidates<C>(
        candidates: impl IntoIterator<Item = C>,
        opener: impl FnOnce(C) -> Result<T>,
    ) -> Result<Self> {
        let candidate = select_single(candidates)?;
        let transport = opener(candidate)?;
        info!("Opened FUNcube Dongle Pro+");
        Ok(Self::new(transport))
    }

    /// Releases the device.
    pub fn close(self) {
        debug!("Closing FUNcube Dongle Pro+");
        drop(self);
    }

    /// Returns the underlying transport.
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Reads the firmware identity string, e.g. `FCDAPP 20.03`.
    pub fn query(&mut self) -> Result<String> {
        self.exchange(Command::Query, &[])?;
        Ok(self.report.identity())
    }

    /// Reads the tuned frequency in Hz.
    pub fn frequency_hz(&mut self) -> Result<u32> {
        self.exchange(Command::GetFrequencyHz, &[])?;
        Ok(self.report.u32_le())
    }

    /// Reads whether the low-noise amplifier is on.
    pub fn lna_gain(&mut self) -> Result<bool> {
        self.exchange(Command::GetLnaGain, &[])?;
        Ok(self.report.flag())
    }

    /// Reads the RF band-select filter.
    pub fn rf_filter(&mut self) -> Result<RfFilter> {
        self.exchange(Command::GetRfFilter, &[])?;
        Ok(RfFilter::from(self.report.byte()))
    }

    /// Reads whether mixer gain is on.
    pub fn mixer_gain(&mut self) -> Result<bool> {
        self.exchange(Command::GetMixerGain, &[])?;
        Ok(self.report.flag())
    }

    /// Reads the IF gain in dB, as reported.
    pub fn if_gain(&mut self) -> Result<u8> {
        self.exchange(Command::GetIfGain, &[])?;
        Ok(self.report.byte())
    }

    /// Reads the IF filter bandwidth.
    pub fn if_filter(&mut self) -> Result<IfFilter> {
        self.exchange(Command::GetIfFilter, &[])?;
        Ok(IfFilter::from(self.report.byte()))
    }

    /// Reads whether the bias tee powers the antenna port.
    pub fn bias_tee(&mut self) -> Result<bool> {
        self.exchange(Command::GetBiasTee, &[])?;
        Ok(self.report.flag())
    }

    /// Reads every writable parameter.
    pub fn settings(&mut self) -> Result<Settings> {
        Ok(Settings {
            frequency_hz: self.frequency_hz()?,
            lna_gain: self.lna_gain()?,
            rf_filter: self.rf_filter()?,
            mixer_gain: self.mixer_gain()?,
            if_gain: self.if_gain()?,
            if_filter: self.if_filter()?,
            bias_tee: self.bias_tee()?,
        })
    }

    /// Reads the identity and every tuner parameter.
    ///
    /// Fails as a whole if any single exchange fails.
    pub fn status(&mut self) -> Result<Status> {
        Ok(Status {
            identity: self.query()?,
            settings: self.settings()?,
        })
    }

    /// Tunes to `khz`, which must fit in 24 bits.
    pub fn set_frequency_khz(&mut self, khz: u32) -> Result<()> {
        if khz > 0x00FF_FFFF {
            return Err(Error::Argument("frequency in kHz must fit in 24 bits"));
        }
        let buf = khz.to_le_bytes();
        self.exchange(Command::SetFrequencyKhz, &buf[..3])
    }

    /// Tunes to `hz`, returning the frequency the tuner actually settled on.
    pub fn set_frequency_hz(&mut self, hz: u32) -> Result<u32> {
        self.exchange(Command::SetFrequencyHz, &hz.to_le_bytes())?;
        Ok(self.report.u32_le())
    }

    /// Switches the low-noise amplifier.
    pub fn set_lna_gain(&mut self, enable: bool) -> Result<()> {
        self.exchange(Command::SetLnaGain, &[enable.into()])
    }

    /// Selects the RF band-select filter.
    pub fn set_rf_filter(&mut self, filter: RfFilter) -> Result<()> {
        self.exchange(Command::SetRfFilter, &[filter.into()])
    }

    /// Switches mixer gain.
    pub fn set_mixer_gain(&mut self, enable: bool) -> Result<()> {
        self.exchange(Command::SetMixerGain, &[enable.into()])
    }

    /// Sets the IF gain.
    ///
    /// Range 0 to 59dB in 1dB steps.
    pub fn set_if_gain(&mut self, db: u8) -> Result<()> {
        if db > MAX_IF_GAIN_DB {
            return Err(Error::Argument("if gain must be at most 59"));
        }
        self.exchange(Command::SetIfGain, &[db])
    }

    /// Selects the IF filter bandwidth.
    pub fn set_if_filter(&mut self, filter: IfFilter) -> Result<()> {
        self.exchange(Command::SetIfFilter, &[filter.into()])
    }

    /// Switches DC power onto the antenna port.
    pub fn set_bias_tee(&mut self, enable: bool) -> Result<()> {
        self.exchange(Command::SetBiasTee, &[enable.into()])
    }

    /// Writes every parameter in `settings`.
    ///
    /// The IF gain is validated before anything is sent.
    pub fn apply_settings(&mut self, settings: &Settings) -> Result<()> {
        if settings.if_gain > MAX_IF_GAIN_DB {
            return Err(Error::Argument("if gain must be at most 59"));
        }
        self.set_frequency_hz(settings.frequency_hz)?;
        self.set_lna_gain(settings.lna_gain)?;
        self.set_rf_filter(settings.rf_filter)?;
        self.set_mixer_gain(settings.mixer_gain)?;
        self.set_if_gain(settings.if_gain)?;
        self.set_if_filter(settings.if_filter)?;
        self.set_bias_tee(settings.bias_tee)?;

        Ok(())
    }

    /// One request/response over the shared report.
    fn exchange(&mut self, cmd: Command, payload: &[u8]) -> Result<()> {
        self.report.encode(cmd, payload);
        debug!("-> {cmd:?} {payload:02x?}");
        self.transport.write_report(self.report.bytes())?;
        self.transport.read_report(self.report.bytes_mut())?;
        let reply = self.report.bytes();
        debug!("<- echo {} status {}", reply[0], reply[1]);

        Ok(())
    }
}
