use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Highest RFCOMM channel number.
pub const MAX_CHANNEL: i32 = 30;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid device address '{0}': expected 17 characters (XX:XX:XX:XX:XX:XX) or 12 hex digits")]
    Length(String),
    #[error("Invalid device address '{0}': octets must be separated by ':' or '-' consistently")]
    Separator(String),
    #[error("Invalid device address '{0}': non-hexadecimal digit")]
    Hex(String),
    #[error("Invalid channel {0}: must be between 1 and 30")]
    Channel(i32),
}

/// A 48-bit device address.
///
/// Accepts `00:16:53:18:8E:08`, `00-16-53-18-8E-08` or `001653188E08`.
/// Always displayed in upper-case colon form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceAddress([u8; 6]);

impl DeviceAddress {
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        let digits: Vec<u8> = match input.len() {
            17 => {
                let bytes = input.as_bytes();
                let sep = bytes.get(2).copied().unwrap_or(b':');
                if sep != b':' && sep != b'-' {
                    return Err(AddressError::Separator(input.to_string()));
                }
                let mut digits = Vec::with_capacity(12);
                for (i, &b) in bytes.iter().enumerate() {
                    if i % 3 == 2 {
                        if b != sep {
                            return Err(AddressError::Separator(input.to_string()));
                        }
                    } else {
                        digits.push(b);
                    }
                }
                digits
            }
            12 => input.as_bytes().to_vec(),
            _ => return Err(AddressError::Length(input.to_string())),
        };

        let mut octets = [0u8; 6];
        for (octet, pair) in octets.iter_mut().zip(digits.chunks(2)) {
            let text =
                std::str::from_utf8(pair).map_err(|_| AddressError::Hex(input.to_string()))?;
            if !text.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(AddressError::Hex(input.to_string()));
            }
            *octet =
                u8::from_str_radix(text, 16).map_err(|_| AddressError::Hex(input.to_string()))?;
        }
        Ok(Self(octets))
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            a, b, c, d, e, g
        )
    }
}

impl FromStr for DeviceAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DeviceAddress {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DeviceAddress> for String {
    fn from(value: DeviceAddress) -> Self {
        value.to_string()
    }
}

/// Where to connect. Validated on construction, so holders never re-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionParameters {
    pub address: DeviceAddress,
    pub channel: u8,
}

impl ConnectionParameters {
    pub fn new(address: &str, channel: i32) -> Result<Self, AddressError> {
        let address = DeviceAddress::parse(address)?;
        if !(1..=MAX_CHANNEL).contains(&channel) {
            return Err(AddressError::Channel(channel));
        }
        Ok(Self {
            address,
            channel: channel as u8,
        })
    }
}
