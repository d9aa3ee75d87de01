//! Extended protocol checksum pair
//!
//! Every frame ends with two check bytes computed over the region from the
//! Node ID through the last payload byte:
//! 1. XOR: `0xFF ^ b0 ^ b1 ^ ...`
//! 2. SUM: `b0 + b1 + ... + XOR`, truncated to one byte

use std::fmt;

use tracing::trace;

/// XOR and SUM check bytes of a frame
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Checksum {
    pub xor: u8,
    pub sum: u8,
}

impl fmt::Debug for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Checksum(xor=0x{:02X}, sum=0x{:02X})", self.xor, self.sum)
    }
}

/// Calculate the checksum pair over the checked region
///
/// # Examples
///
/// ```
/// use soyal_core::checksum;
///
/// // Node 0x01, command 0x18 (get status)
/// let checksum = checksum::calculate(&[0x01, 0x18]);
/// assert_eq!(checksum.xor, 0xE6);
/// assert_eq!(checksum.sum, 0xFF);
/// ```
pub fn calculate(region: &[u8]) -> Checksum {
    let (xor, sum) = region
        .iter()
        .fold((0xFFu8, 0u8), |(xor, sum), &b| (xor ^ b, sum.wrapping_add(b)));
    let sum = sum.wrapping_add(xor);
    
    trace!(
        region_len = region.len(),
        xor = format!("0x{:02X}", xor),
        sum = format!("0x{:02X}", sum),
        "Calculated checksum"
    );
    
    Checksum { xor, sum }
}

/// Verify received check bytes against the checked region
pub fn verify(region: &[u8], xor: u8, sum: u8) -> bool {
    calculate(region) == Checksum { xor, sum }
}
