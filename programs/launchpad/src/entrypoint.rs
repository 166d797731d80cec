//! Pool entrypoint - byte-encoded calls from collaborators

use crate::host::BaseTransfer;
use crate::instructions;
use crate::state::LaunchPool;
use fairlaunch_common::{
    read_address, read_amount, read_u8, write_address, write_amount, Address, Amount, LaunchError,
    LaunchResult, SwapReceipt, ADDRESS_LEN, AMOUNT_LEN,
};

/// Decoded pool call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 0: amount(32)
    SwapBaseForTokens { amount_in: Amount },
    /// 1: amount(32)
    SwapTokensForBase { amount_in: Amount },
    /// 2: spender(20) + amount(32)
    Approve { spender: Address, amount: Amount },
    /// 3: to(20) + amount(32)
    Transfer { to: Address, amount: Amount },
    /// 4: from(20) + to(20) + amount(32)
    TransferFrom { from: Address, to: Address, amount: Amount },
}

impl Instruction {
    pub fn discriminator(&self) -> u8 {
        match self {
            Instruction::SwapBaseForTokens { .. } => 0,
            Instruction::SwapTokensForBase { .. } => 1,
            Instruction::Approve { .. } => 2,
            Instruction::Transfer { .. } => 3,
            Instruction::TransferFrom { .. } => 4,
        }
    }

    /// Exact payload width after the discriminator byte
    fn payload_len(discriminator: u8) -> Option<usize> {
        match discriminator {
            0 | 1 => Some(AMOUNT_LEN),
            2 | 3 => Some(ADDRESS_LEN + AMOUNT_LEN),
            4 => Some(2 * ADDRESS_LEN + AMOUNT_LEN),
            _ => None,
        }
    }

    /// Decode a call. The payload must be exactly the width of its
    /// discriminator; short or trailing bytes are rejected.
    pub fn unpack(instruction_data: &[u8]) -> LaunchResult<Self> {
        let discriminator = read_u8(instruction_data, 0)?;
        let data = &instruction_data[1..];

        if let Some(expected) = Self::payload_len(discriminator) {
            if data.len() != expected {
                log::debug!(
                    "instruction {} payload is {} bytes, expected {}",
                    discriminator,
                    data.len(),
                    expected
                );
                return Err(LaunchError::InvalidInstruction);
            }
        }

        match discriminator {
            0 => Ok(Instruction::SwapBaseForTokens { amount_in: read_amount(data, 0)? }),
            1 => Ok(Instruction::SwapTokensForBase { amount_in: read_amount(data, 0)? }),
            2 => Ok(Instruction::Approve {
                spender: read_address(data, 0)?,
                amount: read_amount(data, ADDRESS_LEN)?,
            }),
            3 => Ok(Instruction::Transfer {
                to: read_address(data, 0)?,
                amount: read_amount(data, ADDRESS_LEN)?,
            }),
            4 => Ok(Instruction::TransferFrom {
                from: read_address(data, 0)?,
                to: read_address(data, ADDRESS_LEN)?,
                amount: read_amount(data, 2 * ADDRESS_LEN)?,
            }),
            _ => {
                log::debug!("unknown instruction discriminator {}", discriminator);
                Err(LaunchError::InvalidInstruction)
            }
        }
    }

    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(1 + 2 * ADDRESS_LEN + AMOUNT_LEN);
        buf.push(self.discriminator());
        match *self {
            Instruction::SwapBaseForTokens { amount_in } | Instruction::SwapTokensForBase { amount_in } => {
                write_amount(&mut buf, amount_in);
            }
            Instruction::Approve { spender, amount } => {
                write_address(&mut buf, spender);
                write_amount(&mut buf, amount);
            }
            Instruction::Transfer { to, amount } => {
                write_address(&mut buf, to);
                write_amount(&mut buf, amount);
            }
            Instruction::TransferFrom { from, to, amount } => {
                write_address(&mut buf, from);
                write_address(&mut buf, to);
                write_amount(&mut buf, amount);
            }
        }
        buf
    }
}

/// Result of a dispatched call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Swapped(SwapReceipt),
    Done,
}

/// Main entrypoint. Base attached to a buy is collected by the host around
/// this call; base owed by a sell is paid through `host`.
pub fn process_instruction<H: BaseTransfer + ?Sized>(
    pool: &mut LaunchPool,
    caller: Address,
    host: &mut H,
    instruction_data: &[u8],
) -> LaunchResult<Outcome> {
    match Instruction::unpack(instruction_data)? {
        Instruction::SwapBaseForTokens { amount_in } => {
            instructions::process_swap_base_for_tokens(pool, caller, amount_in).map(Outcome::Swapped)
        }
        Instruction::SwapTokensForBase { amount_in } => {
            instructions::process_swap_tokens_for_base(pool, caller, amount_in, host)
                .map(Outcome::Swapped)
        }
        Instruction::Approve { spender, amount } => {
            instructions::process_approve(pool, caller, spender, amount).map(|_| Outcome::Done)
        }
        Instruction::Transfer { to, amount } => {
            instructions::process_transfer(pool, caller, to, amount).map(|_| Outcome::Done)
        }
        Instruction::TransferFrom { from, to, amount } => {
            instructions::process_transfer_from(pool, caller, from, to, amount).map(|_| Outcome::Done)
        }
    }
}
