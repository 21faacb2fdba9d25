//! CRC-16 used to protect UECP frames
//!
//! CCITT polynomial processed MSB first with an all-ones initial register,
//! followed by a final inversion of the register. The final XOR is what the
//! target encoders expect; the plain CCITT-FALSE variant is rejected.

/// CCITT generator polynomial
pub const POLYNOMIAL: u16 = 0x1021;
/// Initial register value
pub const INITIAL: u16 = 0xFFFF;
/// Value XORed into the register after the last byte
pub const FINAL_XOR: u16 = 0xFFFF;

/// Compute the frame CRC over `data`
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc = INITIAL;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ POLYNOMIAL;
            } else {
                crc <<= 1;
            }
        }
    }
    crc ^ FINAL_XOR
}
