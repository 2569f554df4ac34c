#![no_main]
// Feeds a stream of length-prefixed APDUs to one applet instance and checks
// the invariants every response must uphold.
use libfuzzer_sys::fuzz_target;
use p256_applet::{
    apdu::StatusWord,
    export::{self, Selector},
    provider::{CryptoProvider, SoftwareProvider},
    Applet, AID,
};
use rand_chacha::{rand_core::SeedableRng, ChaChaRng};

const SUPPORTED: [u8; 5] = [0x40, 0xEA, 0xEB, 0xEC, 0xED];

fuzz_target!(|data: &[u8]| {
    if data.len() < 32 {
        return;
    }

    let (seed, mut stream) = data.split_at(32);
    let rng = ChaChaRng::from_seed(seed.try_into().unwrap());
    let checker = SoftwareProvider::new(ChaChaRng::from_seed([0; 32]));
    let mut applet = Applet::new(SoftwareProvider::new(rng));

    // Start selected so most inputs reach the handlers.
    let mut select = vec![0x00, 0xA4, 0x04, 0x00, AID.len() as u8];
    select.extend_from_slice(&AID);
    assert_eq!(applet.transmit(&select), [0x90, 0x00]);

    while let Some((&len, rest)) = stream.split_first() {
        let len = usize::from(len).min(rest.len());
        let (apdu, tail) = rest.split_at(len);
        stream = tail;

        let response = applet.transmit(apdu);
        assert!(response.len() >= 2, "response without status word");
        let (body, sw) = response.split_at(response.len() - 2);
        let status = StatusWord::from_bytes([sw[0], sw[1]]);

        if !status.is_success() {
            assert!(body.is_empty(), "error response carried data");
        }

        if apdu.len() >= 4 && !SUPPORTED.contains(&apdu[1]) && apdu[1] != 0xA4 {
            assert!(sw == [0x6D, 0x00] || sw == [0x67, 0x20] || sw == [0x69, 0x85]);
        }

        // The stored pair must stay consistent whatever was sent.
        let keys = applet.key_store().current();
        assert_eq!(
            checker.public_point(keys.private_scalar()).unwrap(),
            *keys.public_point()
        );
        assert_eq!(
            export::export(applet.key_store(), Selector::PublicPoint),
            &keys.public_point()[1..]
        );
    }
});
