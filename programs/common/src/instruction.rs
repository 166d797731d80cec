//! Instruction data deserialization helpers
//!
//! Provides utilities for safely parsing instruction data from byte slices.
//! All functions perform bounds checking and return errors on invalid input.

use crate::error::LaunchError;
use crate::types::{Address, Amount};

/// Encoded width of an amount
pub const AMOUNT_LEN: usize = 32;

/// Encoded width of an address
pub const ADDRESS_LEN: usize = 20;

/// Read a u8 from instruction data
#[inline]
pub fn read_u8(data: &[u8], offset: usize) -> Result<u8, LaunchError> {
    data.get(offset).copied().ok_or(LaunchError::InvalidInstruction)
}

/// Read a fixed-size byte array from instruction data
#[inline]
pub fn read_bytes<const N: usize>(data: &[u8], offset: usize) -> Result<[u8; N], LaunchError> {
    let end = offset.checked_add(N).ok_or(LaunchError::InvalidInstruction)?;
    if end > data.len() {
        return Err(LaunchError::InvalidInstruction);
    }
    let mut bytes = [0u8; N];
    bytes.copy_from_slice(&data[offset..end]);
    Ok(bytes)
}

/// Read a 256-bit amount (little-endian) from instruction data
#[inline]
pub fn read_amount(data: &[u8], offset: usize) -> Result<Amount, LaunchError> {
    let bytes = read_bytes::<AMOUNT_LEN>(data, offset)?;
    Ok(Amount::from_le_bytes(bytes))
}

/// Read a 20-byte address from instruction data
#[inline]
pub fn read_address(data: &[u8], offset: usize) -> Result<Address, LaunchError> {
    let bytes = read_bytes::<ADDRESS_LEN>(data, offset)?;
    Ok(Address::from(bytes))
}

/// Append a 256-bit amount (little-endian)
#[inline]
pub fn write_amount(buf: &mut Vec<u8>, amount: Amount) {
    buf.extend_from_slice(&amount.to_le_bytes::<AMOUNT_LEN>());
}

/// Append a 20-byte address
#[inline]
pub fn write_address(buf: &mut Vec<u8>, address: Address) {
    buf.extend_from_slice(address.as_slice());
}
