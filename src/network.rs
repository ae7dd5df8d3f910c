use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Serialize;

pub const DEFAULT_PORT: u16 = 7890;

/// NEM networks a node can belong to.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
    Mijin,
}

impl Network {
    pub fn id(self) -> i32 {
        match self {
            Network::Mainnet => 104,
            Network::Testnet => -104,
            Network::Mijin => 96,
        }
    }

    /// First character of every address on this network.
    pub fn address_prefix(self) -> char {
        match self {
            Network::Mainnet => 'N',
            Network::Testnet => 'T',
            Network::Mijin => 'M',
        }
    }

    pub fn from_address_prefix(c: char) -> Option<Self> {
        Self::value_variants()
            .iter()
            .copied()
            .find(|n| n.address_prefix() == c)
    }

    pub fn default_node(self) -> NodeEndpoint {
        match self {
            Network::Mainnet => NodeEndpoint::new("hugealice.nem.ninja", DEFAULT_PORT),
            Network::Testnet => NodeEndpoint::new("bigalice2.nem.ninja", DEFAULT_PORT),
            Network::Mijin => NodeEndpoint::new("b1.nem.foundation", 7895),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Mijin => "mijin",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("address must be 40 characters, got {0}")]
    Length(usize),
    #[error("address contains invalid character '{0}'")]
    InvalidCharacter(char),
    #[error("address prefix '{0}' does not match any known network")]
    UnknownNetwork(char),
}

/// A NEM address in its canonical form: 40 base32 characters, no dashes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Accepts the pretty `TDWZ55-R5VIHS-...` form as well as the plain one.
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        let plain: String = input
            .chars()
            .filter(|c| *c != '-' && !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .collect();

        let len = plain.chars().count();
        if len != 40 {
            return Err(AddressError::Length(len));
        }

        if let Some(bad) = plain
            .chars()
            .find(|c| !matches!(c, 'A'..='Z' | '2'..='7'))
        {
            return Err(AddressError::InvalidCharacter(bad));
        }

        // length was checked above
        let first = plain.chars().next().unwrap_or_default();
        if Network::from_address_prefix(first).is_none() {
            return Err(AddressError::UnknownNetwork(first));
        }

        Ok(Self(plain))
    }

    pub fn network(&self) -> Network {
        self.0
            .chars()
            .next()
            .and_then(Network::from_address_prefix)
            .unwrap_or(Network::Testnet)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Scheme, host and port of a NIS node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeEndpoint {
    scheme: String,
    host: String,
    port: u16,
}

impl NodeEndpoint {
    /// Keeps an explicit `http://` or `https://` scheme, defaults to `http`.
    /// A trailing path or slash on the host is dropped.
    pub fn new(host: &str, port: u16) -> Self {
        let host = host.trim();
        let (scheme, rest) = if let Some(rest) = host.strip_prefix("https://") {
            ("https", rest)
        } else if let Some(rest) = host.strip_prefix("http://") {
            ("http", rest)
        } else {
            ("http", host)
        };

        let host = rest.split('/').next().unwrap_or(rest).to_string();

        Self {
            scheme: scheme.to_string(),
            host,
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }
}

/// Picks the network for a command: an explicit choice wins, then the
/// address's own network, then testnet.
pub fn resolve_network(explicit: Option<Network>, address: Option<&Address>) -> Network {
    explicit
        .or_else(|| address.map(Address::network))
        .unwrap_or(Network::Testnet)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TESTNET_ADDR: &str = "TDWZ55R5VIHSH5WWK6CEGAIP7D35XVFZ3RU2S5UQ";

    #[test]
    fn parses_dashed_address() {
        let addr = Address::parse("tdwz55-r5vihs-h5wwk6-cegaip-7d35xv-fz3ru2-s5uq").unwrap();
        assert_eq!(addr.as_str(), TESTNET_ADDR);
        assert_eq!(addr.network(), Network::Testnet);
    }

    #[test]
    fn rejects_bad_addresses() {
        assert_eq!(Address::parse("TDWZ55"), Err(AddressError::Length(6)));

        let with_one = format!("{}1", &TESTNET_ADDR[..39]);
        assert_eq!(Address::parse(&with_one), Err(AddressError::InvalidCharacter('1')));

        let unknown = format!("X{}", &TESTNET_ADDR[1..]);
        assert_eq!(Address::parse(&unknown), Err(AddressError::UnknownNetwork('X')));
    }

    #[test]
    fn prefixes_map_back_to_networks() {
        for network in Network::value_variants() {
            assert_eq!(
                Network::from_address_prefix(network.address_prefix()),
                Some(*network)
            );
        }
        assert_eq!(Network::from_address_prefix('X'), None);
        assert_eq!(Network::Testnet.id(), -104);
    }

    #[test]
    fn explicit_network_beats_address_prefix() {
        let addr = Address::parse(TESTNET_ADDR).unwrap();
        assert_eq!(resolve_network(Some(Network::Mainnet), Some(&addr)), Network::Mainnet);
        assert_eq!(resolve_network(None, Some(&addr)), Network::Testnet);
        assert_eq!(resolve_network(None, None), Network::Testnet);
    }

    #[test]
    fn endpoint_normalizes_scheme() {
        assert_eq!(
            NodeEndpoint::new("hugealice.nem.ninja", 7890).base_url(),
            "http://hugealice.nem.ninja:7890"
        );
        assert_eq!(
            NodeEndpoint::new("https://node.example.org/", 443).base_url(),
            "https://node.example.org:443"
        );
        assert_eq!(Network::Mijin.default_node().port(), 7895);
    }
}
