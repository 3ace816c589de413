use std::str::FromStr;

use base64::{Engine, engine::general_purpose::STANDARD};
use derive_more::Display;
use snafu::{ResultExt, Snafu};

/// Every encoding name accepted on a file value, aliases included.
pub const ENCODING_NAMES: [&str; 11] = [
    "utf8", "ascii", "utf-8", "binary", "ucs2", "ucs-2", "utf16le", "utf-16le", "hex", "base64",
    "buffer",
];

/// Character encoding a file's data is stored in.
///
/// Text encodings keep the data as a string, `Hex` and `Base64` keep a
/// binary payload in string form, and `Buffer` marks native bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Encoding {
    #[display("utf8")]
    Utf8,
    #[display("ascii")]
    Ascii,
    #[display("binary")]
    Latin1,
    #[display("ucs2")]
    Ucs2,
    #[display("hex")]
    Hex,
    #[display("base64")]
    Base64,
    #[display("buffer")]
    Buffer,
}

impl Encoding {
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            Encoding::Utf8 | Encoding::Ascii | Encoding::Latin1 | Encoding::Ucs2
        )
    }

    pub fn is_binary_string(&self) -> bool {
        matches!(self, Encoding::Hex | Encoding::Base64)
    }

    /// Converts string data held in this encoding into the bytes it stands for.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>, EncodingError> {
        match self {
            Encoding::Utf8 => Ok(text.as_bytes().to_vec()),
            Encoding::Ascii | Encoding::Latin1 => {
                Ok(text.encode_utf16().map(|unit| unit as u8).collect())
            }
            Encoding::Ucs2 => Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect()),
            Encoding::Hex => hex::decode(text).context(HexSnafu),
            Encoding::Base64 => STANDARD.decode(text).context(Base64Snafu),
            Encoding::Buffer => NotTextualSnafu { encoding: *self }.fail(),
        }
    }

    /// Renders bytes as a string in this encoding.
    ///
    /// UTF-8 decoding is lossy, invalid sequences become U+FFFD.
    pub fn decode(&self, bytes: &[u8]) -> Result<String, EncodingError> {
        match self {
            Encoding::Utf8 => Ok(String::from_utf8_lossy(bytes).into_owned()),
            Encoding::Ascii => Ok(bytes.iter().map(|b| char::from(b & 0x7f)).collect()),
            Encoding::Latin1 => Ok(bytes.iter().map(|b| char::from(*b)).collect()),
            Encoding::Ucs2 => {
                let pairs = bytes.chunks_exact(2);
                let dangling = !pairs.remainder().is_empty();
                let units = pairs
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                    .collect::<Vec<_>>();
                let mut text = String::from_utf16_lossy(&units);
                if dangling {
                    text.push(char::REPLACEMENT_CHARACTER);
                }
                Ok(text)
            }
            Encoding::Hex => Ok(hex::encode(bytes)),
            Encoding::Base64 => Ok(STANDARD.encode(bytes)),
            Encoding::Buffer => NotTextualSnafu { encoding: *self }.fail(),
        }
    }
}

impl FromStr for Encoding {
    type Err = EncodingError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "utf8" | "utf-8" => Ok(Encoding::Utf8),
            "ascii" => Ok(Encoding::Ascii),
            "binary" => Ok(Encoding::Latin1),
            "ucs2" | "ucs-2" | "utf16le" | "utf-16le" => Ok(Encoding::Ucs2),
            "hex" => Ok(Encoding::Hex),
            "base64" => Ok(Encoding::Base64),
            "buffer" => Ok(Encoding::Buffer),
            _ => UnknownSnafu { name }.fail(),
        }
    }
}

pub fn is_encoding(name: &str) -> bool {
    ENCODING_NAMES.contains(&name)
}

pub fn is_text_encoding(name: &str) -> bool {
    name.parse::<Encoding>().is_ok_and(|encoding| encoding.is_text())
}

#[derive(Debug, Snafu)]
pub enum EncodingError {
    #[snafu(display("Unknown encoding '{}'", name))]
    UnknownError { name: String },
    #[snafu(display("Data is not valid hex"))]
    HexError { source: hex::FromHexError },
    #[snafu(display("Data is not valid base64"))]
    Base64Error { source: base64::DecodeError },
    #[snafu(display("Encoding '{}' does not hold string data", encoding))]
    NotTextualError { encoding: Encoding },
}
