use mintline_crypto::{ContentHasher, Keypair, Signature};
use mintline_types::{Address, Blockhash};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult, RejectReason};
use crate::instruction::Instruction;

/// An ordered group of instructions applied atomically.
///
/// The fee payer funds the bundle's fees and always signs first; its
/// signature becomes the bundle's confirmation receipt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationBundle {
    fee_payer: Address,
    instructions: Vec<Instruction>,
}

impl OperationBundle {
    pub fn new(fee_payer: Address) -> Self {
        Self {
            fee_payer,
            instructions: Vec::new(),
        }
    }

    /// Append an instruction (builder style).
    pub fn with(mut self, instruction: Instruction) -> Self {
        self.instructions.push(instruction);
        self
    }

    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn fee_payer(&self) -> &Address {
        &self.fee_payer
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Every address that must sign, fee payer first, without duplicates.
    pub fn required_signers(&self) -> Vec<Address> {
        required_signers(&self.fee_payer, &self.instructions)
    }

    /// Bind the bundle to `recent_blockhash` and sign it with `signers`.
    ///
    /// Fails with [`LedgerError::MissingSigner`] before anything leaves the
    /// process if a required signer has no keypair in `signers`.
    pub fn sign(self, recent_blockhash: Blockhash, signers: &[&Keypair]) -> LedgerResult<SignedBundle> {
        let message = BundleMessage {
            fee_payer: self.fee_payer,
            recent_blockhash,
            instructions: self.instructions,
        };
        let digest = message.digest()?;

        let signatures = message
            .required_signers()
            .into_iter()
            .map(|address| {
                signers
                    .iter()
                    .find(|kp| kp.address() == address)
                    .map(|kp| SignatureEntry {
                        signer: address,
                        signature: kp.sign(&digest),
                    })
                    .ok_or(LedgerError::MissingSigner(address))
            })
            .collect::<LedgerResult<Vec<_>>>()?;

        Ok(SignedBundle {
            message,
            signatures,
        })
    }
}

/// The signed content of a bundle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleMessage {
    pub fee_payer: Address,
    pub recent_blockhash: Blockhash,
    pub instructions: Vec<Instruction>,
}

impl BundleMessage {
    /// Domain-separated hash of the canonical JSON message; this is what
    /// every signer signs.
    pub fn digest(&self) -> LedgerResult<[u8; 32]> {
        ContentHasher::BUNDLE
            .hash_json(self)
            .map_err(|e| LedgerError::Serialization(e.to_string()))
    }

    pub fn required_signers(&self) -> Vec<Address> {
        required_signers(&self.fee_payer, &self.instructions)
    }
}

/// One signer's signature over a [`BundleMessage`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureEntry {
    pub signer: Address,
    pub signature: Signature,
}

/// A bundle ready for submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedBundle {
    pub message: BundleMessage,
    pub signatures: Vec<SignatureEntry>,
}

impl SignedBundle {
    /// The fee payer's signature, which identifies the bundle.
    pub fn signature(&self) -> Option<Signature> {
        self.signatures
            .iter()
            .find(|entry| entry.signer == self.message.fee_payer)
            .map(|entry| entry.signature)
    }

    /// Check that the bundle is non-empty and carries exactly one valid
    /// signature from every required signer and none from anyone else.
    pub fn verify(&self) -> Result<(), RejectReason> {
        if self.message.instructions.is_empty() {
            return Err(RejectReason::EmptyBundle);
        }
        let required = self.message.required_signers();
        let mut seen = Vec::with_capacity(self.signatures.len());
        for entry in &self.signatures {
            if !required.contains(&entry.signer) {
                return Err(RejectReason::UnexpectedSignature(entry.signer));
            }
            if seen.contains(&entry.signer) {
                return Err(RejectReason::DuplicateSignature(entry.signer));
            }
            seen.push(entry.signer);
        }

        let digest = self
            .message
            .digest()
            .map_err(|_| RejectReason::InvalidSignature(self.message.fee_payer))?;

        for address in required {
            let entry = self
                .signatures
                .iter()
                .find(|entry| entry.signer == address)
                .ok_or(RejectReason::MissingSignature(address))?;
            mintline_crypto::verify(&address, &digest, &entry.signature)
                .map_err(|_| RejectReason::InvalidSignature(address))?;
        }
        Ok(())
    }
}

fn required_signers(fee_payer: &Address, instructions: &[Instruction]) -> Vec<Address> {
    let mut signers = vec![*fee_payer];
    for address in instructions.iter().flat_map(Instruction::required_signers) {
        if !signers.contains(&address) {
            signers.push(address);
        }
    }
    signers
}
