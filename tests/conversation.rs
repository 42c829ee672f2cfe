use securechat::{
    resolve, ChatError, Conversation, Disclosure, KeyManager, Participant, ParticipantId,
    UndisclosedReason,
};

fn alice() -> ParticipantId {
    ParticipantId::from("Alice")
}

fn bob() -> ParticipantId {
    ParticipantId::from("Bob")
}

fn conversation() -> Conversation {
    Conversation::new(Participant::new("Alice", "Alice"), Participant::new("Bob", "Bob")).unwrap()
}

#[test]
fn test_end_to_end_scenario() {
    let chat = conversation();
    chat.generate_keys(&alice()).unwrap();
    chat.generate_keys(&bob()).unwrap();

    chat.send(&alice(), "hello").unwrap();

    let bob_envelopes = chat.list_for(&bob());
    assert_eq!(bob_envelopes.len(), 1);
    let envelope = &bob_envelopes[0];
    assert_eq!(envelope.sender(), &alice());
    assert_eq!(envelope.receiver(), &bob());

    let bob_keys = chat.participant(&bob()).unwrap().key_pair().unwrap();
    assert_eq!(
        resolve(envelope, &bob(), Some(bob_keys.private_key())).unwrap(),
        Disclosure::Plaintext("hello".to_string())
    );

    let alice_keys = chat.participant(&alice()).unwrap().key_pair().unwrap();
    assert_eq!(
        resolve(envelope, &alice(), Some(alice_keys.private_key())).unwrap(),
        Disclosure::Undisclosed(UndisclosedReason::SenderCannotDecrypt)
    );

    assert!(matches!(
        resolve(envelope, &ParticipantId::from("Eve"), Some(bob_keys.private_key())),
        Err(ChatError::UnauthorizedViewer(_))
    ));
}

#[test]
fn test_regeneration_orphans_history() {
    let chat = conversation();
    chat.generate_keys(&alice()).unwrap();
    let original = chat.generate_keys(&bob()).unwrap();

    let envelope = chat.send(&alice(), "before regeneration").unwrap();
    let regenerated = chat.generate_keys(&bob()).unwrap();
    assert_ne!(original, regenerated);

    let bob_keys = chat.participant(&bob()).unwrap().key_pair().unwrap();
    assert_eq!(
        resolve(&envelope, &bob(), Some(bob_keys.private_key())).unwrap(),
        Disclosure::Undisclosed(UndisclosedReason::DecryptionFailed)
    );

    // The stored envelope itself is unchanged.
    assert_eq!(chat.store().get(envelope.id()).as_deref(), Some(envelope.as_ref()));
}

#[test]
fn test_fingerprint_import_encrypts_to_same_holder() {
    let chat = conversation();
    let fingerprint = chat.generate_keys(&bob()).unwrap();

    let imported = securechat::PublicKey::from_fingerprint(&fingerprint).unwrap();
    assert_eq!(KeyManager::export_fingerprint(&imported).unwrap(), fingerprint);

    let ciphertext = securechat::encrypt(b"via fingerprint", &imported).unwrap();
    let bob_keys = chat.participant(&bob()).unwrap().key_pair().unwrap();
    assert_eq!(
        securechat::decrypt(&ciphertext, bob_keys.private_key()).unwrap(),
        b"via fingerprint"
    );
}
