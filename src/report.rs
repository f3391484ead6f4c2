use crate::types::Command;

/// Size of every report exchanged with the dongle, including the report-ID byte.
pub const REPORT_LEN: usize = 65;

/// Offset of the first payload byte, after the report ID and the command byte.
pub(crate) const PAYLOAD_OFFSET: usize = 2;

/// The single scratch buffer a session uses for every exchange.
///
/// Byte 0 is the HID report ID (always zero), byte 1 the command code on write.
/// On read the device echoes the command at byte 0 and a status at byte 1; the
/// response payload starts at [`PAYLOAD_OFFSET`] either way.
pub(crate) struct Report {
    buf: [u8; REPORT_LEN],
}

impl Report {
    pub fn new() -> Self {
        Self {
            buf: [0; REPORT_LEN],
        }
    }

    /// Clears the whole buffer, then writes `cmd` and `payload`.
    ///
    /// # Panics
    /// If `payload` does not fit in the report.
    pub fn encode(&mut self, cmd: Command, payload: &[u8]) {
        self.buf.fill(0);
        self.buf[1] = cmd as u8;
        self.buf[PAYLOAD_OFFSET..PAYLOAD_OFFSET + payload.len()].copy_from_slice(payload);
    }

    pub fn bytes(&self) -> &[u8; REPORT_LEN] {
        &self.buf
    }

    pub fn bytes_mut(&mut self) -> &mut [u8; REPORT_LEN] {
        &mut self.buf
    }

    /// First payload byte.
    pub fn byte(&self) -> u8 {
        self.buf[PAYLOAD_OFFSET]
    }

    /// Only an exact `1` means on.
    pub fn flag(&self) -> bool {
        self.byte() == 1
    }

    pub fn u32_le(&self) -> u32 {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&self.buf[PAYLOAD_OFFSET..PAYLOAD_OFFSET + 4]);
        u32::from_le_bytes(raw)
    }

    /// Zero terminated string starting at the payload.
    ///
    /// A payload with no terminator runs to the end of the buffer.
    pub fn identity(&self) -> String {
        // Search from the payload, not byte 0, so a zero echo byte can't end the string early.
        let payload = &self.buf[PAYLOAD_OFFSET..];
        let end = payload.iter().position(|&b| b == 0).unwrap_or(payload.len());
        String::from_utf8_lossy(&payload[..end]).into()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn with_payload(payload: &[u8]) -> Report {
        let mut report = Report::new();
        report.bytes_mut()[0] = 0x42;
        report.bytes_mut()[1] = 1;
        report.bytes_mut()[PAYLOAD_OFFSET..PAYLOAD_OFFSET + payload.len()]
            .copy_from_slice(payload);
        report
    }

    #[test]
    fn encode_clears_stale_bytes() {
        let mut report = Report::new();
        report.bytes_mut().fill(0xAA);

        report.encode(Command::Query, &[]);

        assert_eq!(report.bytes()[0], 0);
        assert_eq!(report.bytes()[1], 1);
        assert!(report.bytes()[PAYLOAD_OFFSET..].iter().all(|&b| b == 0));
    }

    #[test]
    fn encode_payload() {
        let mut report = Report::new();
        report.bytes_mut().fill(0x55);

        report.encode(Command::SetFrequencyHz, &[0x10, 0x27, 0, 0]);

        assert_eq!(report.bytes()[..6], [0, 101, 0x10, 0x27, 0, 0]);
        assert!(report.bytes()[6..].iter().all(|&b| b == 0));
    }

    #[test]
    fn decode_frequency() {
        assert_eq!(with_payload(&[0x10, 0x27, 0x00, 0x00]).u32_le(), 10_000);
        assert_eq!(with_payload(&[0xFF, 0xFF, 0xFF, 0xFF]).u32_le(), u32::MAX);
        assert_eq!(
            with_payload(&[0x40, 0x4B, 0x4C, 0x00]).u32_le(),
            5_000_000
        );
    }

    #[test]
    fn decode_flag() {
        assert!(with_payload(&[1]).flag());
        assert!(!with_payload(&[0]).flag());
        assert!(!with_payload(&[5]).flag());
    }

    #[test]
    fn decode_identity() {
        let report = with_payload(b"FCDAPP 1.0\0");
        assert_eq!(report.identity(), "FCDAPP 1.0");
    }

    #[test]
    fn decode_identity_ignores_zero_header() {
        let mut report = Report::new();
        report.bytes_mut()[PAYLOAD_OFFSET..PAYLOAD_OFFSET + 10].copy_from_slice(b"FCDAPP 1.0");
        assert_eq!(report.identity(), "FCDAPP 1.0");
    }

    #[test]
    fn decode_identity_unterminated() {
        let mut report = Report::new();
        report.bytes_mut()[PAYLOAD_OFFSET..].fill(b'x');
        assert_eq!(report.identity().len(), REPORT_LEN - PAYLOAD_OFFSET);
    }
}
