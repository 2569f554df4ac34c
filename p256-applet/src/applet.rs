//! Command dispatcher.

use crate::{
    apdu::{Command, Instruction, Response},
    engine,
    export::{self, Selector},
    keystore::KeyStore,
    provider::CryptoProvider,
    Error, Result,
};
use alloc::vec::Vec;

/// Application identifier the applet answers `SELECT` for.
pub const AID: [u8; 12] = hex_literal::hex!("5714e4720af2152cb449b1d8");

/// Response to [`Instruction::Hello`].
pub const GREETING: &[u8; 12] = b"Hello World!";

/// Selection state as driven by the host.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum State {
    /// Installed, not selected: commands are refused.
    #[default]
    Unselected,
    /// Selected: commands are dispatched.
    Selected,
}

/// ECDSA/P-256 applet.
///
/// Owns the [`KeyStore`] and the [`CryptoProvider`] and hands both to one
/// handler per command. Commands run to completion one at a time; the only
/// state carried between them is the keypair.
#[derive(Debug)]
pub struct Applet<P> {
    state: State,
    store: KeyStore,
    provider: P,
}

impl<P: CryptoProvider> Applet<P> {
    /// Install the applet with the default keypair.
    pub fn new(provider: P) -> Self {
        Self {
            state: State::Unselected,
            store: KeyStore::initialize(),
            provider,
        }
    }

    /// Current selection state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Key material and domain parameters.
    pub fn key_store(&self) -> &KeyStore {
        &self.store
    }

    /// Host selected the applet.
    pub fn select(&mut self) {
        log::debug!("applet selected");
        self.state = State::Selected;
    }

    /// Host selected another applet.
    pub fn deselect(&mut self) {
        log::debug!("applet deselected");
        self.state = State::Unselected;
    }

    /// Execute one command and return its response data.
    pub fn handle(&mut self, command: &Command<'_>) -> Result<Vec<u8>> {
        if self.state != State::Selected {
            return Err(Error::NotSelected);
        }

        let instruction = Instruction::try_from(command.ins)?;
        log::debug!("dispatching {instruction:?}");

        match instruction {
            Instruction::Hello => Ok(GREETING.to_vec()),
            Instruction::Sign => engine::sign(&self.store, &self.provider, command.data),
            Instruction::Verify => self.verify(command),
            Instruction::GetParameter => {
                let selector = Selector::try_from(command.p1)?;
                Ok(export::export(&self.store, selector).to_vec())
            }
            Instruction::GenerateKey => {
                self.store.regenerate(&mut self.provider)?;
                Ok(Vec::new())
            }
        }
    }

    /// Execute one command and fold the outcome into a response APDU.
    pub fn respond(&mut self, command: &Command<'_>) -> Response {
        let result = self.handle(command);

        if let Err(err) = &result {
            log::warn!("INS {:#04x} failed: {err}", command.ins);
        }

        result.into()
    }

    /// Process a raw command APDU and return the raw response APDU.
    ///
    /// A `SELECT` by name for [`AID`] selects the applet; one naming
    /// anything else deselects it. Everything else, including a `SELECT`
    /// sent with a proprietary class, goes to [`Applet::respond`].
    pub fn transmit(&mut self, apdu: &[u8]) -> Vec<u8> {
        let command = match Command::parse(apdu) {
            Ok(command) => command,
            Err(err) => return Response::from(err).to_bytes(),
        };

        if command.is_select_by_name() {
            if command.is_select_of(&AID) {
                self.select();
                return Response::success(Vec::new()).to_bytes();
            }

            self.deselect();
        }

        self.respond(&command).to_bytes()
    }

    /// `P1` is the message length and `P2` the signature length; the data
    /// holds exactly the message followed by the signature.
    fn verify(&self, command: &Command<'_>) -> Result<Vec<u8>> {
        let message_len = usize::from(command.p1);
        let expected = message_len + usize::from(command.p2);

        if command.data.len() != expected {
            return Err(Error::WrongDataLength {
                expected,
                actual: command.data.len(),
            });
        }

        let (message, signature) = command.data.split_at(message_len);
        let valid = engine::verify(&self.store, &self.provider, message, signature)?;
        Ok(alloc::vec![u8::from(valid)])
    }
}
