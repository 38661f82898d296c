//! Known contract operations and the static selector table

use std::collections::HashMap;

use alloy_primitives::Selector;

use super::ContractRole;
use crate::domain::abi::{selector_of, FunctionSignature};

/// State-changing functions of the two known contracts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownOperation {
    // NFTVault.sol
    DepositNft,
    WithdrawNft,
    ApproveWithdraw,
    RemoveApproval,
    // SimpleNFT.sol
    Mint,
    Approve,
    SetApprovalForAll,
    TransferFrom,
    SafeTransferFrom,
    SafeTransferFromWithData,
}

impl KnownOperation {
    pub const ALL: [KnownOperation; 10] = [
        KnownOperation::DepositNft,
        KnownOperation::WithdrawNft,
        KnownOperation::ApproveWithdraw,
        KnownOperation::RemoveApproval,
        KnownOperation::Mint,
        KnownOperation::Approve,
        KnownOperation::SetApprovalForAll,
        KnownOperation::TransferFrom,
        KnownOperation::SafeTransferFrom,
        KnownOperation::SafeTransferFromWithData,
    ];

    pub fn signature(self) -> &'static str {
        match self {
            KnownOperation::DepositNft => "depositNFT(address,uint256,address)",
            KnownOperation::WithdrawNft => "withdrawNFT(address,uint256)",
            KnownOperation::ApproveWithdraw => "approveWithdraw(address,uint256)",
            KnownOperation::RemoveApproval => "removeApproval(address,uint256)",
            KnownOperation::Mint => "mint(string)",
            KnownOperation::Approve => "approve(address,uint256)",
            KnownOperation::SetApprovalForAll => "setApprovalForAll(address,bool)",
            KnownOperation::TransferFrom => "transferFrom(address,address,uint256)",
            KnownOperation::SafeTransferFrom => "safeTransferFrom(address,address,uint256)",
            KnownOperation::SafeTransferFromWithData => {
                "safeTransferFrom(address,address,uint256,bytes)"
            }
        }
    }

    pub fn role(self) -> ContractRole {
        match self {
            KnownOperation::DepositNft
            | KnownOperation::WithdrawNft
            | KnownOperation::ApproveWithdraw
            | KnownOperation::RemoveApproval => ContractRole::Vault,
            _ => ContractRole::Minter,
        }
    }

    pub fn selector(self) -> Selector {
        selector_of(self.signature())
    }
}

/// A resolved function: one of ours, or whatever the directory returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Known(KnownOperation),
    Unrecognized(FunctionSignature),
}

impl Operation {
    /// Map a signature back to a known operation of `role` when the text matches
    pub fn from_signature(role: ContractRole, signature: FunctionSignature) -> Self {
        KnownOperation::ALL
            .into_iter()
            .find(|op| op.role() == role && op.signature() == signature.as_str())
            .map(Operation::Known)
            .unwrap_or(Operation::Unrecognized(signature))
    }

    pub fn signature(&self) -> FunctionSignature {
        match self {
            Operation::Known(op) => FunctionSignature::from_canonical(op.signature()),
            Operation::Unrecognized(sig) => sig.clone(),
        }
    }

    pub fn is_withdraw(&self) -> bool {
        matches!(self, Operation::Known(KnownOperation::WithdrawNft))
    }
}

/// Static selector table for the known contracts
#[derive(Debug, Clone)]
pub struct SelectorTable {
    entries: HashMap<(ContractRole, Selector), KnownOperation>,
}

impl SelectorTable {
    /// Build the table by hashing every known signature
    pub fn new() -> Self {
        let entries = KnownOperation::ALL
            .into_iter()
            .map(|op| ((op.role(), op.selector()), op))
            .collect();
        Self { entries }
    }

    pub fn lookup(&self, role: ContractRole, selector: Selector) -> Option<KnownOperation> {
        self.entries.get(&(role, selector)).copied()
    }
}

impl Default for SelectorTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::abi::selector_hex;

    #[test]
    fn test_vault_selectors() {
        let table = SelectorTable::new();
        let cases = [
            ("4e1ca120", KnownOperation::ApproveWithdraw),
            ("97be5523", KnownOperation::DepositNft),
            ("b537b269", KnownOperation::RemoveApproval),
            ("6088e93a", KnownOperation::WithdrawNft),
        ];
        for (hex_selector, op) in cases {
            assert_eq!(selector_hex(&op.selector()), hex_selector);
            let selector = Selector::from_slice(&hex::decode(hex_selector).unwrap());
            assert_eq!(table.lookup(ContractRole::Vault, selector), Some(op));
            assert_eq!(table.lookup(ContractRole::Minter, selector), None);
        }
    }

    #[test]
    fn test_minter_selectors() {
        let table = SelectorTable::new();
        let mint = Selector::from_slice(&hex::decode("d85d3d27").unwrap());
        assert_eq!(table.lookup(ContractRole::Minter, mint), Some(KnownOperation::Mint));
        assert_eq!(table.lookup(ContractRole::Unknown, mint), None);
        assert_eq!(table.entries.len(), KnownOperation::ALL.len());
    }

    #[test]
    fn test_from_signature() {
        let sig = FunctionSignature::parse("withdrawNFT(address,uint256)").unwrap();
        let op = Operation::from_signature(ContractRole::Vault, sig.clone());
        assert!(op.is_withdraw());

        // Same text on an unknown contract stays unrecognized
        let op = Operation::from_signature(ContractRole::Unknown, sig.clone());
        assert_eq!(op, Operation::Unrecognized(sig));
    }
}
