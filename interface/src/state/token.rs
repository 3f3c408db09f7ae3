use solana_sdk::pubkey::Pubkey;
use static_assertions::const_assert_eq;

use super::AccountState;
use crate::{
    codec::{
        Reader,
        ADDRESS_LEN,
    },
    error::{
        EncodingError,
        EncodingResult,
    },
    instructions::framework_token::{
        account_discriminator,
        DISCRIMINATOR_LEN,
    },
};

/// The leading byte of every native token program account.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(test, derive(strum_macros::FromRepr, strum_macros::EnumIter))]
pub enum AccountTag {
    Uninitialized,
    Mint,
    TokenAccount,
}

impl TryFrom<u8> for AccountTag {
    type Error = EncodingError;

    #[inline(always)]
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Uninitialized),
            1 => Ok(Self::Mint),
            2 => Ok(Self::TokenAccount),
            _ => Err(EncodingError::InvalidAccountTag),
        }
    }
}

fn expect_tag(reader: &mut Reader, expected: AccountTag) -> EncodingResult<()> {
    match AccountTag::try_from(reader.read_u8()?)? {
        tag if tag == expected => Ok(()),
        _ => Err(EncodingError::InvalidAccountTag),
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Mint {
    pub authority: Pubkey,
    pub supply: u64,
}

impl AccountState for Mint {
    const LEN: usize = 41;

    fn read(reader: &mut Reader) -> EncodingResult<Self> {
        expect_tag(reader, AccountTag::Mint)?;
        Ok(Self {
            authority: reader.read_address()?,
            supply: reader.read_u64()?,
        })
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenAccount {
    pub owner: Pubkey,
    pub mint: Pubkey,
    pub amount: u64,
}

impl AccountState for TokenAccount {
    const LEN: usize = 73;

    fn read(reader: &mut Reader) -> EncodingResult<Self> {
        expect_tag(reader, AccountTag::TokenAccount)?;
        Ok(Self {
            owner: reader.read_address()?,
            mint: reader.read_address()?,
            amount: reader.read_u64()?,
        })
    }
}

const_assert_eq!(Mint::LEN, 1 + ADDRESS_LEN + 8);
const_assert_eq!(TokenAccount::LEN, 1 + ADDRESS_LEN * 2 + 8);

fn expect_discriminator(reader: &mut Reader, account_name: &str) -> EncodingResult<()> {
    if reader.take(DISCRIMINATOR_LEN)? != account_discriminator(account_name) {
        return Err(EncodingError::InvalidAccountTag);
    }
    Ok(())
}

/// The framework token program's mint, prefixed by `account_discriminator("Mint")`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenMint {
    pub authority: Pubkey,
    pub supply: u64,
}

impl AccountState for TokenMint {
    const LEN: usize = DISCRIMINATOR_LEN + 40;

    fn read(reader: &mut Reader) -> EncodingResult<Self> {
        expect_discriminator(reader, "Mint")?;
        Ok(Self {
            authority: reader.read_address()?,
            supply: reader.read_u64()?,
        })
    }
}

/// The framework token program's token account. Note the mint precedes the owner here, the
/// reverse of the native [`TokenAccount`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FrameworkTokenAccount {
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
}

impl AccountState for FrameworkTokenAccount {
    const LEN: usize = DISCRIMINATOR_LEN + 72;

    fn read(reader: &mut Reader) -> EncodingResult<Self> {
        expect_discriminator(reader, "TokenAccount")?;
        Ok(Self {
            mint: reader.read_address()?,
            owner: reader.read_address()?,
            amount: reader.read_u64()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_account_tag_from_u8_exhaustive() {
        for variant in AccountTag::iter() {
            let variant_u8 = variant as u8;
            assert_eq!(
                AccountTag::from_repr(variant_u8).unwrap(),
                AccountTag::try_from(variant_u8).unwrap(),
            );
            assert_eq!(AccountTag::try_from(variant_u8).unwrap(), variant);
        }
        let last = AccountTag::iter().last().unwrap();
        let past_last = last as u8 + 1;
        assert!(AccountTag::from_repr(past_last).is_none());
        assert!(AccountTag::try_from(past_last).is_err());
    }

    #[test]
    fn native_token_account() {
        let (owner, mint) = (Pubkey::new_unique(), Pubkey::new_unique());
        let mut data = vec![AccountTag::TokenAccount as u8];
        data.extend_from_slice(owner.as_ref());
        data.extend_from_slice(mint.as_ref());
        data.extend_from_slice(&100u64.to_le_bytes());
        assert_eq!(
            TokenAccount::unpack(&data).unwrap(),
            TokenAccount {
                owner,
                mint,
                amount: 100,
            }
        );

        data[0] = AccountTag::Mint as u8;
        assert_eq!(
            TokenAccount::unpack(&data),
            Err(EncodingError::InvalidAccountTag)
        );
        data[0] = 9;
        assert_eq!(
            TokenAccount::unpack(&data),
            Err(EncodingError::InvalidAccountTag)
        );
    }

    #[test]
    fn framework_mint_checks_discriminator() {
        let authority = Pubkey::new_unique();
        let mut data = account_discriminator("Mint").to_vec();
        data.extend_from_slice(authority.as_ref());
        data.extend_from_slice(&7u64.to_le_bytes());
        assert_eq!(
            TokenMint::unpack(&data).unwrap(),
            TokenMint {
                authority,
                supply: 7,
            }
        );

        data[..DISCRIMINATOR_LEN].copy_from_slice(&account_discriminator("TokenAccount"));
        assert_eq!(TokenMint::unpack(&data), Err(EncodingError::InvalidAccountTag));
        assert_eq!(
            FrameworkTokenAccount::unpack(&data),
            Err(EncodingError::InsufficientByteLength)
        );
    }
}
