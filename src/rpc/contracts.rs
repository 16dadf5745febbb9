//! Typed contract interfaces and the closed contract command set.
//!
//! Every contract interaction in the engine goes through [`ContractCall`]:
//! a fixed set of variants encoded against the interfaces below, replacing
//! any dynamic method-name dispatch.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

sol! {
    /// Minimal ERC-20 surface used by payment flows.
    interface IERC20 {
        function transfer(address to, uint256 amount) external returns (bool);
        function balanceOf(address owner) external view returns (uint256);
    }

    /// ERC-6538 stealth meta-address registry.
    interface IERC6538Registry {
        function stealthMetaAddressOf(address registrant, uint256 schemeId)
            external view returns (bytes memory);
    }

    /// ERC-5564 announcer. Only the event is consumed; announcements are
    /// read from logs, not from a view function.
    interface IERC5564Announcer {
        event Announcement(
            uint256 indexed schemeId,
            address indexed stealthAddress,
            address indexed caller,
            bytes ephemeralPubKey,
            bytes metadata
        );
    }
}

/// A contract interaction the engine knows how to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
    /// ERC-20 `transfer(to, amount)`.
    Erc20Transfer {
        token: Address,
        to: Address,
        amount: U256,
    },
    /// ERC-20 `balanceOf(owner)` view.
    Erc20BalanceOf { token: Address, owner: Address },
    /// ERC-6538 `stealthMetaAddressOf(registrant, schemeId)` view.
    StealthMetaAddressOf {
        registry: Address,
        registrant: Address,
        scheme_id: u64,
    },
}

impl ContractCall {
    /// The contract the call targets.
    pub fn target(&self) -> Address {
        match self {
            ContractCall::Erc20Transfer { token, .. } => *token,
            ContractCall::Erc20BalanceOf { token, .. } => *token,
            ContractCall::StealthMetaAddressOf { registry, .. } => *registry,
        }
    }

    /// ABI-encoded call data.
    pub fn encode(&self) -> Bytes {
        let encoded = match self {
            ContractCall::Erc20Transfer { to, amount, .. } => IERC20::transferCall {
                to: *to,
                amount: *amount,
            }
            .abi_encode(),
            ContractCall::Erc20BalanceOf { owner, .. } => {
                IERC20::balanceOfCall { owner: *owner }.abi_encode()
            }
            ContractCall::StealthMetaAddressOf {
                registrant,
                scheme_id,
                ..
            } => IERC6538Registry::stealthMetaAddressOfCall {
                registrant: *registrant,
                schemeId: U256::from(*scheme_id),
            }
            .abi_encode(),
        };
        Bytes::from(encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_encoding_has_selector() {
        let call = ContractCall::Erc20Transfer {
            token: Address::repeat_byte(1),
            to: Address::repeat_byte(2),
            amount: U256::from(1_000_000u64),
        };
        let data = call.encode();
        // 4-byte selector + two 32-byte words.
        assert_eq!(data.len(), 68);
        assert_eq!(&data[..4], &IERC20::transferCall::SELECTOR);
        assert_eq!(call.target(), Address::repeat_byte(1));
    }

    #[test]
    fn test_balance_of_encoding() {
        let call = ContractCall::Erc20BalanceOf {
            token: Address::repeat_byte(1),
            owner: Address::repeat_byte(3),
        };
        assert_eq!(&call.encode()[..4], &IERC20::balanceOfCall::SELECTOR);
    }
}
