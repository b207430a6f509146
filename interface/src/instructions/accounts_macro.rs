/// Generates one account struct per instruction, holding each account address in the order the
/// program expects them.
///
/// Each account is declared as `name: writable` or `name: readonly`, optionally followed by
/// `+ signer`.
///
/// ```ignore
/// instruction_accounts! {
///     /// Doc comment for the generated struct.
///     ControlPresaleLive => ControlPresaleLiveInstructionData {
///         pool: writable,
///         owner: writable + signer,
///     }
/// }
/// ```
macro_rules! instruction_accounts {
    (@signer) => { false };
    (@signer signer) => { true };

    (@meta writable, $address:expr, $is_signer:expr) => {
        ::solana_instruction::AccountMeta::new($address, $is_signer)
    };
    (@meta readonly, $address:expr, $is_signer:expr) => {
        ::solana_instruction::AccountMeta::new_readonly($address, $is_signer)
    };

    (
        $(
            $(#[$struct_meta:meta])*
            $name:ident => $data:ty {
                $(
                    $(#[$field_meta:meta])*
                    $field:ident: $access:ident $(+ $signer:ident)?
                ),* $(,)?
            }
        )*
    ) => {
        $(
            $(#[$struct_meta])*
            #[derive(Clone, Copy, Debug, PartialEq, Eq)]
            pub struct $name {
                $(
                    $(#[$field_meta])*
                    pub $field: ::solana_address::Address,
                )*
            }

            impl $name {
                /// The number of accounts the instruction expects.
                pub const LEN: usize = [$(stringify!($field)),*].len();

                #[cfg(feature = "client")]
                pub fn account_metas(&self) -> Vec<::solana_instruction::AccountMeta> {
                    vec![
                        $(
                            instruction_accounts!(
                                @meta $access, self.$field, instruction_accounts!(@signer $($signer)?)
                            ),
                        )*
                    ]
                }

                #[cfg(feature = "client")]
                pub fn create_instruction(
                    &self,
                    program_id: ::solana_address::Address,
                    data: $data,
                ) -> ::solana_instruction::Instruction {
                    ::solana_instruction::Instruction {
                        program_id,
                        accounts: self.account_metas(),
                        data: $crate::instructions::InstructionData::pack(&data),
                    }
                }

                /// Reads the account addresses back out of an instruction's metas. Returns `None`
                /// if too few accounts were passed.
                #[cfg(feature = "client")]
                pub fn try_from_account_metas(
                    metas: &[::solana_instruction::AccountMeta],
                ) -> Option<Self> {
                    let mut metas = metas.iter();
                    Some(Self {
                        $( $field: metas.next()?.pubkey, )*
                    })
                }
            }
        )*
    };
}
