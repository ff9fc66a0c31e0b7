use std::path::PathBuf;

use alloy::primitives::Bytes;

use crate::data::payload::InputError;
use crate::data::types::{ChainId, Submission, WalletInfo};

/// Which part of the screen receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    ChainSelector,
    AddressField,
    DropZone,
    Editor,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::ChainSelector => Focus::AddressField,
            Focus::AddressField => Focus::DropZone,
            Focus::DropZone => Focus::Editor,
            Focus::Editor => Focus::ChainSelector,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::ChainSelector => Focus::Editor,
            Focus::AddressField => Focus::ChainSelector,
            Focus::DropZone => Focus::AddressField,
            Focus::Editor => Focus::DropZone,
        }
    }

    pub fn is_text_entry(self) -> bool {
        matches!(self, Focus::AddressField | Focus::DropZone | Focus::Editor)
    }
}

/// Events flowing into the main app loop, from components and from background tasks.
#[derive(Debug)]
pub enum AppEvent {
    // Wallet requests
    Connect,
    Disconnect,
    SwitchChain(ChainId),
    DappAddressChanged(String),

    // Input requests
    ReadFile { seq: u64, path: PathBuf },
    SubmitInput(Bytes),

    // Wallet results
    WalletConnected(WalletInfo),
    WalletConnectFailed(String),
    WalletDisconnected,
    ChainSwitched(ChainId),
    ChainSwitchFailed(String),

    // Input results
    FileRead {
        seq: u64,
        result: Result<String, InputError>,
    },
    InputSubmitted(Submission),
    SubmissionFailed { error: String, payload: Bytes },

    Alert(String),
}
