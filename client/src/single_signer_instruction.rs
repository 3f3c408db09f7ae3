use solana_instruction::Instruction;
use solana_sdk::signature::Keypair;

use crate::{
    error::LedgerResult,
    transactions::{
        Confirmation,
        CustomRpcClient,
    },
};

/// An instruction with exactly one signer, which can pay for and authorize its own transaction.
#[derive(Debug)]
pub struct SingleSignerInstruction(Instruction);

impl TryFrom<Instruction> for SingleSignerInstruction {
    type Error = anyhow::Error;

    fn try_from(instruction: Instruction) -> Result<Self, Self::Error> {
        match instruction.accounts.iter().filter(|meta| meta.is_signer).count() {
            1 => Ok(Self(instruction)),
            n => Err(anyhow::Error::msg(format!(
                "Expected exactly one signer, found {n}."
            ))),
        }
    }
}

impl From<SingleSignerInstruction> for Instruction {
    fn from(instruction: SingleSignerInstruction) -> Self {
        instruction.0
    }
}

impl SingleSignerInstruction {
    pub async fn send_single_signer(
        self,
        rpc: &CustomRpcClient,
        signer: &Keypair,
    ) -> LedgerResult<Confirmation> {
        rpc.send_single_signer(signer, [self.0]).await
    }
}
