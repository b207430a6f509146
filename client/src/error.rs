//! The failure taxonomy for workflow steps and helpers that classify Solana instruction,
//! transaction and RPC client errors into it.

use presale_interface::error::{
    AnchorFrameworkError,
    PoolError,
};
use solana_address::Address;
use solana_client::{
    client_error::{
        ClientError,
        ClientErrorKind,
    },
    rpc_request::{
        RpcError::RpcResponseError,
        RpcResponseErrorData,
    },
    rpc_response::RpcSimulateTransactionResult,
};
use solana_instruction::Instruction;
use solana_instruction_error::InstructionError;
use solana_transaction_error::TransactionError;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StepError {
    /// A derived address didn't match what the program recomputed from its seeds.
    #[error("address derivation mismatch: {0}")]
    Derivation(String),
    /// A required signer was missing or the signer isn't the recorded authority.
    #[error("unauthorized: {0}")]
    Authorization(String),
    /// The program, or a program it invoked, rejected the instruction. `from_presale` is set when
    /// the failing instruction targeted the presale program, so `code` is in its error space.
    #[error("rejected{}: {reason}", .code.map(|c| format!(" ({c})")).unwrap_or_default())]
    Rejected {
        code: Option<u32>,
        reason: String,
        from_presale: bool,
    },
    /// A record that had to be read back from the ledger was missing or undecodable.
    #[error("unresolved: {0}")]
    Resolution(String),
    /// A network or confirmation failure. The only retryable class.
    #[error("transient: {0}")]
    Transient(String),
    /// Not attempted because an earlier step failed under an aborting policy.
    #[error("aborted after an earlier failure")]
    Aborted,
}

impl StepError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    /// The presale program error behind a rejection. Custom codes raised by any other program
    /// are never read as presale errors.
    pub fn pool_error(&self) -> Option<PoolError> {
        match self {
            Self::Rejected {
                code: Some(code),
                from_presale: true,
                ..
            } => PoolError::from_code(*code),
            _ => None,
        }
    }

    pub fn rejected(error: PoolError) -> Self {
        Self::Rejected {
            code: Some(error.code()),
            reason: error.to_string(),
            from_presale: true,
        }
    }
}

impl From<PoolError> for StepError {
    fn from(error: PoolError) -> Self {
        Self::rejected(error)
    }
}

/// Classifies a single instruction's failure. `from_presale_program` tells whether the failing
/// instruction targeted the presale program, which decides how custom codes are read.
pub fn classify_instruction_error(
    error: InstructionError,
    from_presale_program: bool,
) -> StepError {
    match error {
        InstructionError::Custom(code) if from_presale_program => {
            if let Some(pool_error) = PoolError::from_code(code) {
                return StepError::rejected(pool_error);
            }
            match AnchorFrameworkError::from_code(code) {
                Some(
                    framework @ (AnchorFrameworkError::ConstraintHasOne
                    | AnchorFrameworkError::ConstraintSigner),
                ) => StepError::Authorization(framework.to_string()),
                Some(
                    framework @ (AnchorFrameworkError::ConstraintSeeds
                    | AnchorFrameworkError::ConstraintAddress),
                ) => StepError::Derivation(framework.to_string()),
                Some(
                    framework @ (AnchorFrameworkError::AccountDiscriminatorNotFound
                    | AnchorFrameworkError::AccountDiscriminatorMismatch),
                ) => StepError::Resolution(framework.to_string()),
                Some(framework) => StepError::Rejected {
                    code: Some(code),
                    reason: framework.to_string(),
                    from_presale: true,
                },
                // Anchor's `init` surfaces the system program's `AccountAlreadyInUse` as-is.
                None if code == 0 => StepError::Rejected {
                    code: Some(code),
                    reason: "account already in use".into(),
                    from_presale: true,
                },
                None => StepError::Rejected {
                    code: Some(code),
                    reason: format!("custom program error {code:#x}"),
                    from_presale: true,
                },
            }
        }
        InstructionError::Custom(code) => StepError::Rejected {
            code: Some(code),
            reason: format!("custom program error {code:#x}"),
            from_presale: false,
        },
        InstructionError::MissingRequiredSignature | InstructionError::IncorrectAuthority => {
            StepError::Authorization(error.to_string())
        }
        InstructionError::InvalidSeeds => StepError::Derivation(error.to_string()),
        InstructionError::UninitializedAccount => StepError::Resolution(error.to_string()),
        other => StepError::Rejected {
            code: None,
            reason: other.to_string(),
            from_presale: false,
        },
    }
}

/// Classifies a transaction-level failure, resolving instruction errors against the transaction's
/// instructions to find which program failed.
pub fn classify_transaction_error(
    error: TransactionError,
    instructions: &[Instruction],
    presale_program: &Address,
) -> StepError {
    match error {
        TransactionError::InstructionError(index, instruction_error) => {
            let from_presale_program = instructions
                .get(index as usize)
                .is_some_and(|ix| &ix.program_id == presale_program);
            classify_instruction_error(instruction_error, from_presale_program)
        }
        TransactionError::BlockhashNotFound
        | TransactionError::AlreadyProcessed
        | TransactionError::ClusterMaintenance
        | TransactionError::WouldExceedMaxBlockCostLimit
        | TransactionError::WouldExceedAccountDataBlockLimit => {
            StepError::Transient(error.to_string())
        }
        TransactionError::SignatureFailure | TransactionError::MissingSignatureForFee => {
            StepError::Authorization(error.to_string())
        }
        other => StepError::Rejected {
            code: None,
            reason: other.to_string(),
            from_presale: false,
        },
    }
}

/// Classifies an RPC client error. Preflight simulation failures are unpacked into the
/// transaction error they carry; transport failures are transient.
pub fn classify_client_error(
    error: &ClientError,
    instructions: &[Instruction],
    presale_program: &Address,
) -> StepError {
    match error.kind() {
        ClientErrorKind::RpcError(RpcResponseError {
            data:
                RpcResponseErrorData::SendTransactionPreflightFailure(RpcSimulateTransactionResult {
                    err: Some(ui_err),
                    ..
                }),
            ..
        }) => classify_transaction_error(ui_err.clone().into(), instructions, presale_program),
        ClientErrorKind::TransactionError(transaction_error) => {
            classify_transaction_error(transaction_error.clone(), instructions, presale_program)
        }
        ClientErrorKind::SigningError(signer_error) => {
            StepError::Authorization(signer_error.to_string())
        }
        _ => StepError::Transient(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_errors_are_rejections() {
        let error = classify_instruction_error(
            InstructionError::Custom(PoolError::InvalidPrice.code()),
            true,
        );
        assert_eq!(error.pool_error(), Some(PoolError::InvalidPrice));
        assert!(!error.is_retryable());
    }

    #[test]
    fn framework_codes() {
        assert!(matches!(
            classify_instruction_error(InstructionError::Custom(141), true),
            StepError::Authorization(_)
        ));
        assert!(matches!(
            classify_instruction_error(InstructionError::Custom(146), true),
            StepError::Derivation(_)
        ));
        assert!(matches!(
            classify_instruction_error(InstructionError::MissingRequiredSignature, true),
            StepError::Authorization(_)
        ));
    }

    #[test]
    fn custom_codes_from_other_programs_are_not_pool_errors() {
        let error = classify_instruction_error(InstructionError::Custom(303), false);
        assert_eq!(error.pool_error(), None);
        assert!(matches!(error, StepError::Rejected { code: Some(303), .. }));
    }

    #[test]
    fn failing_instruction_index_picks_the_error_space() {
        let presale = Address::new_from_array([1; 32]);
        let token = Address::new_from_array([2; 32]);
        let ixs = [presale, token].map(|program_id| Instruction {
            program_id,
            accounts: vec![],
            data: vec![],
        });

        let from_token = classify_transaction_error(
            TransactionError::InstructionError(1, InstructionError::Custom(303)),
            &ixs,
            &presale,
        );
        assert_eq!(from_token.pool_error(), None);

        let from_presale = classify_transaction_error(
            TransactionError::InstructionError(0, InstructionError::Custom(303)),
            &ixs,
            &presale,
        );
        assert_eq!(from_presale.pool_error(), Some(PoolError::PresaleLive));
    }

    #[test]
    fn preflight_failures_are_final_rejections() {
        let presale = Address::new_from_array([1; 32]);
        let ix = Instruction {
            program_id: presale,
            accounts: vec![],
            data: vec![],
        };
        let simulation = RpcSimulateTransactionResult {
            err: Some(
                TransactionError::InstructionError(
                    0,
                    InstructionError::Custom(PoolError::InvalidBidder.code()),
                )
                .into(),
            ),
            logs: None,
            accounts: None,
            units_consumed: None,
            loaded_accounts_data_size: None,
            return_data: None,
            inner_instructions: None,
            replacement_blockhash: None,
            fee: None,
            pre_balances: None,
            post_balances: None,
            pre_token_balances: None,
            post_token_balances: None,
            loaded_addresses: None,
        };
        let error = ClientError::from(RpcResponseError {
            code: -32002,
            message: "Transaction simulation failed".into(),
            data: RpcResponseErrorData::SendTransactionPreflightFailure(simulation),
        });

        let classified = classify_client_error(&error, &[ix], &presale);
        assert_eq!(classified.pool_error(), Some(PoolError::InvalidBidder));
        assert!(!classified.is_retryable());

        let transport = ClientError::from(ClientErrorKind::Custom("connection reset".into()));
        assert!(classify_client_error(&transport, &[], &presale).is_retryable());
    }

    #[test]
    fn transaction_errors() {
        let presale = Address::new_from_array([1; 32]);
        let ix = Instruction {
            program_id: presale,
            accounts: vec![],
            data: vec![],
        };
        let error = classify_transaction_error(
            TransactionError::InstructionError(0, InstructionError::Custom(0)),
            &[ix],
            &presale,
        );
        assert_eq!(
            error,
            StepError::Rejected {
                code: Some(0),
                reason: "account already in use".into(),
                from_presale: true,
            }
        );
        assert!(
            classify_transaction_error(TransactionError::BlockhashNotFound, &[], &presale)
                .is_retryable()
        );
    }

    #[test]
    fn display() {
        assert_eq!(
            StepError::rejected(PoolError::InvalidBidder).to_string(),
            "rejected (314): InvalidBidder: Invalid bidder"
        );
        assert_eq!(
            StepError::Rejected {
                code: None,
                reason: "oops".into(),
                from_presale: false,
            }
            .to_string(),
            "rejected: oops"
        );
    }
}
