use futures_lite::future::block_on;
use log::{debug, info};
use nusb::{
    transfer::{Direction, EndpointType, RequestBuffer},
    DeviceInfo,
};

use crate::report::REPORT_LEN;
use crate::types::{Error, Result};

/// USB interface class code for HID.
const HID_CLASS: u8 = 0x03;

/// Bytes on the wire per report: unnumbered reports drop the report-ID byte.
const WIRE_LEN: usize = REPORT_LEN - 1;

/// Moves whole reports to and from the device.
///
/// Both calls block until the transfer completes.
pub trait Transport {
    /// Sends `report`. Byte 0 is the report ID.
    fn write_report(&mut self, report: &[u8; REPORT_LEN]) -> Result<()>;

    /// Receives one report into `report`.
    fn read_report(&mut self, report: &mut [u8; REPORT_LEN]) -> Result<()>;
}

/// The dongle's HID interface, claimed through nusb.
pub struct HidInterface {
    interface: nusb::Interface,
    endpoint_in: u8,
    endpoint_out: u8,
}

impl HidInterface {
    /// Opens `info` and claims its HID interface, detaching any kernel driver.
    pub fn open(info: DeviceInfo) -> Result<Self> {
        let device = info.open()?;

        let config = device
            .active_configuration()
            .map_err(std::io::Error::other)?;

        let mut found = None;
        for alt in config.interface_alt_settings() {
            if alt.class() != HID_CLASS {
                continue;
            }

            let mut endpoint_in = None;
            let mut endpoint_out = None;
            for endpoint in alt.endpoints() {
                if endpoint.transfer_type() != EndpointType::Interrupt {
                    continue;
                }
                match endpoint.direction() {
                    Direction::In => endpoint_in = Some(endpoint.address()),
                    Direction::Out => endpoint_out = Some(endpoint.address()),
                }
            }

            if let (Some(ep_in), Some(ep_out)) = (endpoint_in, endpoint_out) {
                found = Some((alt.interface_number(), ep_in, ep_out));
                break;
            }
        }

        let Some((number, endpoint_in, endpoint_out)) = found else {
            return Err(Error::NoHidInterface);
        };

        info!("Claiming HID interface {number} (in {endpoint_in:#04x}, out {endpoint_out:#04x})");
        let interface = device.detach_and_claim_interface(number)?;

        Ok(Self {
            interface,
            endpoint_in,
            endpoint_out,
        })
    }
}

impl Transport for HidInterface {
    fn write_report(&mut self, report: &[u8; REPORT_LEN]) -> Result<()> {
        let out = block_on(
            self.interface
                .interrupt_out(self.endpoint_out, wire_out(report)),
        )
        .into_result()?;

        if out.actual_length() != WIRE_LEN {
            return Err(Error::TransferTruncated {
                actual: out.actual_length(),
                expected: WIRE_LEN,
            });
        }
        Ok(())
    }

    fn read_report(&mut self, report: &mut [u8; REPORT_LEN]) -> Result<()> {
        let buf = block_on(
            self.interface
                .interrupt_in(self.endpoint_in, RequestBuffer::new(WIRE_LEN)),
        )
        .into_result()?;

        wire_in(report, &buf)
    }
}

/// Bytes sent for `report`: everything after the report-ID byte.
fn wire_out(report: &[u8; REPORT_LEN]) -> Vec<u8> {
    report[1..].to_vec()
}

/// Stores a received packet at the start of `report`.
///
/// Anything but a full packet is an error, so a short reply never leaves request bytes
/// in place of payload.
fn wire_in(report: &mut [u8; REPORT_LEN], packet: &[u8]) -> Result<()> {
    if packet.len() != WIRE_LEN {
        return Err(Error::TransferTruncated {
            actual: packet.len(),
            expected: WIRE_LEN,
        });
    }
    report[..WIRE_LEN].copy_from_slice(packet);
    Ok(())
}

/// Resolves discovery to exactly one candidate.
///
/// Zero or several matches are both an error: the target would be ambiguous.
pub fn select_single<C>(candidates: impl IntoIterator<Item = C>) -> Result<C> {
    let mut candidates: Vec<C> = candidates.into_iter().collect();
    debug!("Discovery found {} candidate(s)", candidates.len());
    match candidates.len() {
        1 => Ok(candidates.remove(0)),
        found => Err(Error::Discovery { found }),
    }
}

/// Lists every attached device matching `vendor_id:product_id`.
pub fn scan(vendor_id: u16, product_id: u16) -> Result<Vec<DeviceInfo>> {
    Ok(nusb::list_devices()?
        .filter(|d| d.vendor_id() == vendor_id && d.product_id() == product_id)
        .collect())
}
