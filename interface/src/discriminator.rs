//! Anchor-style 8-byte discriminators. Instructions are tagged with
//! `sha256("global:<snake_case_name>")[..8]` and program-owned accounts with
//! `sha256("account:<TypeName>")[..8]`.

use sha2::{
    Digest,
    Sha256,
};

pub const DISCRIMINATOR_LEN: usize = 8;

pub type Discriminator = [u8; DISCRIMINATOR_LEN];

const INSTRUCTION_NAMESPACE: &str = "global";
const ACCOUNT_NAMESPACE: &str = "account";

pub fn hashed_discriminator(namespace: &str, name: &str) -> Discriminator {
    let preimage = format!("{namespace}:{name}");
    let hash = Sha256::digest(preimage.as_bytes());
    let mut discriminator = [0u8; DISCRIMINATOR_LEN];
    discriminator.copy_from_slice(&hash[..DISCRIMINATOR_LEN]);
    discriminator
}

pub fn instruction_discriminator(snake_case_name: &str) -> Discriminator {
    hashed_discriminator(INSTRUCTION_NAMESPACE, snake_case_name)
}

pub fn account_discriminator(type_name: &str) -> Discriminator {
    hashed_discriminator(ACCOUNT_NAMESPACE, type_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_instruction_discriminators() {
        assert_eq!(
            instruction_discriminator("init_pool"),
            [116, 233, 199, 204, 115, 159, 171, 36]
        );
        assert_eq!(
            instruction_discriminator("set_whitelist"),
            [69, 161, 114, 252, 244, 66, 197, 48]
        );
        assert_eq!(
            instruction_discriminator("sell_nft"),
            [159, 159, 140, 34, 240, 239, 83, 89]
        );
    }

    #[test]
    fn known_account_discriminators() {
        assert_eq!(
            account_discriminator("Pool"),
            [241, 154, 109, 4, 17, 177, 109, 188]
        );
        assert_eq!(
            account_discriminator("Client"),
            [221, 237, 145, 143, 170, 194, 133, 115]
        );
        assert_eq!(
            account_discriminator("SaleManager"),
            [168, 46, 153, 158, 231, 71, 172, 124]
        );
        assert_eq!(
            account_discriminator("SalePot"),
            [187, 250, 64, 42, 55, 147, 33, 89]
        );
    }
}
