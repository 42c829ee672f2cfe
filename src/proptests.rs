//! Property-based tests for the codec and the disclosure policy.
//!
//! - Any plaintext within capacity survives encrypt/decrypt
//! - A different key pair never opens the ciphertext
//! - Anything over capacity is rejected, never truncated
//! - The sender of an envelope never sees plaintext

use proptest::prelude::*;

use crate::crypto::{decrypt, encrypt, max_plaintext_len, Ciphertext};
use crate::error::ChatError;
use crate::session::{resolve, Disclosure, MessageStore, ParticipantId, UndisclosedReason};
use crate::testing;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn roundtrip_within_capacity(payload in prop::collection::vec(any::<u8>(), 0..=190)) {
        let pair = testing::key_pair(0);
        let ciphertext = encrypt(&payload, pair.public_key()).unwrap();
        prop_assert_eq!(decrypt(&ciphertext, pair.private_key()).unwrap(), payload);
    }

    #[test]
    fn wrong_key_rejected(payload in prop::collection::vec(any::<u8>(), 0..=190)) {
        let recipient = testing::key_pair(0);
        let other = testing::key_pair(1);
        let ciphertext = encrypt(&payload, recipient.public_key()).unwrap();
        prop_assert!(matches!(decrypt(&ciphertext, other.private_key()), Err(ChatError::Decryption)));
    }

    #[test]
    fn over_capacity_rejected(extra in 1usize..300) {
        let pair = testing::key_pair(0);
        let max = max_plaintext_len(pair.public_key());
        let payload = vec![0u8; max + extra];
        let rejected = matches!(
            encrypt(&payload, pair.public_key()),
            Err(ChatError::PayloadTooLarge { len, max: limit }) if len == max + extra && limit == max
        );
        prop_assert!(rejected);
    }

    #[test]
    fn arbitrary_bytes_never_decrypt(bytes in prop::collection::vec(any::<u8>(), 0..300)) {
        let pair = testing::key_pair(0);
        let result = decrypt(&Ciphertext::from_bytes(bytes), pair.private_key());
        prop_assert!(matches!(result, Err(ChatError::Decryption)));
    }

    #[test]
    fn base64_wire_roundtrip(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let ciphertext = Ciphertext::from_bytes(bytes);
        prop_assert_eq!(Ciphertext::from_base64(&ciphertext.to_base64()).unwrap(), ciphertext);
    }

    #[test]
    fn sender_never_sees_plaintext(text in "[a-zA-Z0-9 ]{1,100}", key_index in 0usize..3, with_key in any::<bool>()) {
        let store = MessageStore::new("A".into(), "B".into()).unwrap();
        let sender = ParticipantId::from("A");
        let ciphertext = encrypt(text.as_bytes(), testing::key_pair(1).public_key()).unwrap();
        let envelope = store.append(&sender, &"B".into(), ciphertext).unwrap();

        let pair = testing::key_pair(key_index);
        let key = with_key.then(|| pair.private_key());
        prop_assert_eq!(
            resolve(&envelope, &sender, key).unwrap(),
            Disclosure::Undisclosed(UndisclosedReason::SenderCannotDecrypt)
        );
    }
}
