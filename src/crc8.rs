//! Dallas/Maxim 1-Wire CRC-8.
//!
//! Reflected polynomial 0x8C (x^8 + x^5 + x^4 + 1), LSB first, initial value 0.
//! Matches the checksum computed by the microcontroller firmware.

const POLY: u8 = 0x8C;

/// Compute the CRC-8 of `data`. Each call starts from a zero seed.
pub fn compute(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |crc, &byte| update(crc, byte))
}

/// True when `claimed` equals the CRC-8 of `data`.
pub fn validate(data: &[u8], claimed: u8) -> bool {
    compute(data) == claimed
}

fn update(mut crc: u8, mut byte: u8) -> u8 {
    for _ in 0..8 {
        let mix = (byte ^ crc) & 0x01;
        crc >>= 1;
        if mix != 0 {
            crc ^= POLY;
        }
        byte >>= 1;
    }
    crc
}
