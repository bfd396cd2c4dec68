//! CBC mode encryption with PKCS#7 padding.

use alloc::vec::Vec;
use cbc::cipher::{
    block_padding::Pkcs7, BlockCipher, BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit,
};

use crate::algorithms::EncryptionAlgorithm;
use crate::errors::{Error, Result};

fn cbc_encrypt<C: BlockEncryptMut + BlockCipher + KeyInit>(
    key: &[u8],
    iv: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>> {
    let encryptor = cbc::Encryptor::<C>::new_from_slices(key, iv).map_err(|_| Error::Crypto)?;
    Ok(encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

fn cbc_decrypt<C: BlockDecryptMut + BlockCipher + KeyInit>(
    key: &[u8],
    iv: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    let decryptor = cbc::Decryptor::<C>::new_from_slices(key, iv).map_err(|_| Error::Crypto)?;
    decryptor
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| Error::Decryption)
}

/// Encrypt `plaintext` under `algorithm` in CBC mode with PKCS#7 padding.
pub fn encrypt_cbc(
    algorithm: EncryptionAlgorithm,
    key: &[u8],
    iv: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>> {
    match algorithm {
        EncryptionAlgorithm::TripleDes => cbc_encrypt::<des::TdesEde3>(key, iv, plaintext),
        EncryptionAlgorithm::Aes128 => cbc_encrypt::<aes::Aes128>(key, iv, plaintext),
        EncryptionAlgorithm::Aes192 => cbc_encrypt::<aes::Aes192>(key, iv, plaintext),
        EncryptionAlgorithm::Aes256 => cbc_encrypt::<aes::Aes256>(key, iv, plaintext),
    }
}

/// Decrypt `ciphertext` produced by [`encrypt_cbc`].
pub fn decrypt_cbc(
    algorithm: EncryptionAlgorithm,
    key: &[u8],
    iv: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    match algorithm {
        EncryptionAlgorithm::TripleDes => cbc_decrypt::<des::TdesEde3>(key, iv, ciphertext),
        EncryptionAlgorithm::Aes128 => cbc_decrypt::<aes::Aes128>(key, iv, ciphertext),
        EncryptionAlgorithm::Aes192 => cbc_decrypt::<aes::Aes192>(key, iv, ciphertext),
        EncryptionAlgorithm::Aes256 => cbc_decrypt::<aes::Aes256>(key, iv, ciphertext),
    }
}
