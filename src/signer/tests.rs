//! Signer Tests
//!
//! Cross-implementation vectors and end-to-end checks for the signing paths.

#[cfg(test)]
mod tests {
    use crate::signer::*;

    // Hardhat / Anvil account #0
    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
    const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

    fn test_key() -> PrivateKey {
        PrivateKey::from_hex(TEST_PRIVATE_KEY).unwrap()
    }

    // === Authorization Vectors ===

    #[test]
    fn test_authorization_golden_vector() {
        let signed = sign_authorization(1, ZERO_ADDRESS, 0, &test_key()).unwrap();

        assert_eq!(
            hex::encode(authorization_signing_hash(1, &[0u8; 20], 0)),
            "20aed0d1fcfcae79908c669252609bf10de3cc521c36d631c62eea3e826c79ad"
        );
        assert_eq!(
            signed.r_hex(),
            "0x3c35d6df195a251dca39364c71144c91dbf3530aae6461521a9f4455401e4368"
        );
        assert_eq!(
            signed.s_hex(),
            "0x1e0af8f6b2c79db6e58a31585915d2c3fb060707fd8678ec5cfd4dbae2c3730e"
        );
        assert_eq!(signed.y_parity(), 0);
        assert_eq!(signed.v(), 27);
    }

    #[test]
    fn test_authorization_strips_leading_zero_bytes() {
        let signed = sign_authorization(1, ZERO_ADDRESS, 29, &test_key()).unwrap();

        assert_eq!(
            hex::encode(signed.tuple().signing_hash()),
            "402678a4cd11e4d1d90a2c3e007eda104e2f057eb611f4b49f957c5c5949b551"
        );
        assert_eq!(
            signed.r_hex(),
            "0x78e726bd66dd57ae591b868dfa619cf825814dea619e3e506c4fb252227e544a"
        );
        // s has a leading 0x00 byte, so only 31 bytes are rendered
        assert_eq!(
            signed.s_hex(),
            "0x140a5c461679d0c26b5a860f78fbe164085f43cfad970d671301ad02e6f057"
        );
        assert_eq!(signed.signature().s()[0], 0x00);
        assert_eq!(signed.y_parity(), 1);
        assert_eq!(signed.v(), 28);
    }

    #[test]
    fn test_authorization_json_shape() {
        let signed = sign_authorization(1, ZERO_ADDRESS, 0, &test_key()).unwrap();
        let json: serde_json::Value = serde_json::to_value(&signed).unwrap();

        assert_eq!(json["chainId"], 1);
        assert_eq!(json["address"], ZERO_ADDRESS);
        assert_eq!(json["nonce"], 0);
        assert_eq!(json["v"], "27");
        assert_eq!(json["yParity"], 0);
        assert_eq!(
            json["r"],
            "0x3c35d6df195a251dca39364c71144c91dbf3530aae6461521a9f4455401e4368"
        );
    }

    #[test]
    fn test_authorization_json_accepts_short_scalars() {
        let signed = sign_authorization(1, ZERO_ADDRESS, 29, &test_key()).unwrap();
        let json = serde_json::to_string(&signed).unwrap();

        let parsed: SignedAuthorization = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, signed);
        assert!(verify_authorization(&parsed, TEST_ADDRESS).unwrap());
    }

    #[test]
    fn test_authorization_recovery() {
        let signed = sign_authorization(11155111, ZERO_ADDRESS, 3, &test_key()).unwrap();

        let recovered = recover_authorization_signer(&signed).unwrap();
        assert_eq!(to_checksum_address(&recovered), TEST_ADDRESS);
        assert!(!verify_authorization(&signed, "0xabababababababababababababababababababab").unwrap());
    }

    #[test]
    fn test_authorization_is_not_personal_signed() {
        // The same key over the same 32 bytes must give different signatures
        // on the two paths.
        let key = test_key();
        let hash = authorization_signing_hash(1, &[0u8; 20], 0);

        let authorization = sign_authorization(1, ZERO_ADDRESS, 0, &key).unwrap();
        let personal = sign_digest(&hash, &key).unwrap();

        assert_ne!(authorization.signature(), &personal);
        assert_eq!(recover_signer(&hash, &personal.to_bytes()).unwrap(), key.address().unwrap());
    }

    // === Message Signing Vectors ===

    #[test]
    fn test_personal_sign_golden_vector() {
        let digest: [u8; 32] = core::array::from_fn(|i| i as u8);
        let signature = sign_digest(&digest, &test_key()).unwrap();

        assert_eq!(
            signature.to_hex(),
            "0xc9707084087268bfd72c6593bedb608fcface1db084f932d5264903332749fb8\
             0dc91cdb3fb8452ba7137f430e852f7b33d8e9e76bb24863253ae98f466eefa81b"
        );
        assert_eq!(signature.v(), 27);
    }

    #[test]
    fn test_sign_verify_roundtrip_with_generated_key() {
        let key = PrivateKey::generate();
        let address = to_checksum_address(&key.address().unwrap());
        let digest = keccak256(b"user operation");

        let signature = sign_digest(&digest, &key).unwrap();
        assert!(verify_signature(&digest, &signature.to_bytes(), &address).unwrap());
    }

    #[test]
    fn test_signers_share_no_state_across_threads() {
        let handles: Vec<_> = (0u8..8)
            .map(|i| {
                std::thread::spawn(move || {
                    let key = PrivateKey::from_bytes([i + 1; 32]).unwrap();
                    let digest = [i; 32];
                    let signature = sign_digest(&digest, &key).unwrap();
                    let address = hex::encode(key.address().unwrap());
                    verify_signature(&digest, &signature.to_bytes(), &address).unwrap()
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }

    // === Custom Curve Backend ===

    struct CountingCurve {
        inner: Secp256k1Curve,
        signs: std::sync::atomic::AtomicUsize,
    }

    impl EcdsaCurve for CountingCurve {
        fn generate_key(&self) -> PrivateKey {
            self.inner.generate_key()
        }

        fn public_key(&self, key: &PrivateKey) -> SignerResult<[u8; 65]> {
            self.inner.public_key(key)
        }

        fn sign_prehash(&self, hash: &[u8; 32], key: &PrivateKey) -> SignerResult<Signature> {
            self.signs.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            self.inner.sign_prehash(hash, key)
        }

        fn recover_prehash(&self, hash: &[u8; 32], signature: &Signature) -> SignerResult<[u8; 65]> {
            self.inner.recover_prehash(hash, signature)
        }
    }

    #[test]
    fn test_injected_curve_is_used() {
        let curve = CountingCurve {
            inner: Secp256k1Curve::new(),
            signs: std::sync::atomic::AtomicUsize::new(0),
        };
        let signer = MessageSigner::with_curve(curve);
        signer.sign_digest(&[1u8; 32], &test_key()).unwrap();
        signer.sign_digest(&[2u8; 32], &test_key()).unwrap();

        assert_eq!(signer_sign_count(&signer), 2);
    }

    fn signer_sign_count(signer: &MessageSigner<CountingCurve>) -> usize {
        signer.curve().signs.load(std::sync::atomic::Ordering::SeqCst)
    }
}
