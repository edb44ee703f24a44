use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::default::Default;
use std::fmt::Display;
use std::hash::{Hash, Hasher};

/// A tradable token. Identity is the address only; symbol, name and decimals are metadata.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Token {
    address: Address,
    #[serde(default = "default_decimals")]
    decimals: u8,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    symbol: Option<String>,
}

fn default_decimals() -> u8 {
    18
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address.hash(state)
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.get_address()
    }
}

impl Eq for Token {}

impl Ord for Token {
    fn cmp(&self, other: &Self) -> Ordering {
        self.address.cmp(&other.get_address())
    }
}

impl PartialOrd for Token {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get_symbol())
    }
}

impl From<Address> for Token {
    fn from(address: Address) -> Self {
        Token::new(address)
    }
}

impl Token {
    pub fn new(address: Address) -> Token {
        Token { address, decimals: 18, ..Token::default() }
    }

    pub fn new_with_data(address: Address, symbol: Option<String>, name: Option<String>, decimals: Option<u8>) -> Token {
        Token { address, symbol, name, decimals: decimals.unwrap_or(18) }
    }

    // For testing purposes
    pub fn random() -> Token {
        Token::new(Address::random())
    }

    // For testing purposes
    pub fn repeat_byte(byte: u8) -> Token {
        Token::new(Address::repeat_byte(byte))
    }

    pub fn get_symbol(&self) -> String {
        self.symbol.clone().unwrap_or(self.address.to_string())
    }

    pub fn get_name(&self) -> String {
        self.name.clone().unwrap_or(self.address.to_string())
    }

    pub fn get_decimals(&self) -> u8 {
        self.decimals
    }

    pub fn get_address(&self) -> Address {
        self.address
    }
}
