//! Walk through a host session: select, read the curve, sign, verify,
//! regenerate the key.

use p256_applet::{provider::SoftwareProvider, Applet, AID};
use sha2::{Digest, Sha256};

fn print_exchange(label: &str, apdu: &[u8], response: &[u8]) {
    println!("{label}");
    println!(">> {:02X?}", apdu);
    println!("<< {:02X?}", response);
}

type OsApplet = Applet<SoftwareProvider<rand_core::OsRng>>;

fn exchange(applet: &mut OsApplet, label: &str, apdu: &[u8]) -> Vec<u8> {
    let response = applet.transmit(apdu);
    print_exchange(label, apdu, &response);
    response
}

fn main() {
    let mut applet = Applet::new(SoftwareProvider::from_os_rng());

    let mut select = vec![0x00, 0xA4, 0x04, 0x00, AID.len() as u8];
    select.extend_from_slice(&AID);
    exchange(&mut applet, "select", &select);

    exchange(&mut applet, "hello", &[0x00, 0x40, 0x00, 0x00]);
    exchange(&mut applet, "order", &[0x00, 0xEC, 0x06, 0x00]);
    exchange(&mut applet, "public key", &[0x00, 0xEC, 0x01, 0x00]);

    let message = b"ECDSA proves knowledge of a secret number in the context of a single message";
    let digest = Sha256::digest(message);

    let mut sign = vec![0x00, 0xEA, 0x00, 0x00, digest.len() as u8];
    sign.extend_from_slice(&digest);
    let mut signature = exchange(&mut applet, "sign", &sign);
    signature.truncate(signature.len() - 2);

    let mut verify = vec![
        0x00,
        0xEB,
        message.len() as u8,
        signature.len() as u8,
        (message.len() + signature.len()) as u8,
    ];
    verify.extend_from_slice(message);
    verify.extend_from_slice(&signature);
    exchange(&mut applet, "verify", &verify);

    exchange(&mut applet, "generate key", &[0x00, 0xED, 0x00, 0x00]);
    exchange(&mut applet, "verify with new key", &verify);
}
