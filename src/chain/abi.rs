//! Minimal strict ABI codec for the calls and the one event this service consumes
//!
//! Payloads that do not match the expected word counts or layouts are
//! rejected with a decode error rather than partially interpreted.

use alloy::primitives::{keccak256, Address, I256, U256};
use rust_decimal::Decimal;

use crate::common::errors::{Result, WatcherError};
use crate::common::types::PositionModified;

/// A single 32-byte ABI word
pub type Word = [u8; 32];

/// Canonical signature of the trade-mutation event
pub const POSITION_MODIFIED_SIGNATURE: &str =
    "PositionModified(uint256,address,uint256,int256,int256,uint256,uint256,uint256,int256)";

/// keccak256 of [`POSITION_MODIFIED_SIGNATURE`], the topic0 filter value
pub const POSITION_MODIFIED_TOPIC: &str =
    "0xc0d933baa356386a245ade48f9a9c59db4612af2b5b9c17de5b451c628760f43";

/// Number of on-chain fixed-point decimals
pub const WEI_DECIMALS: u32 = 18;

/// Number of non-indexed data words in a `PositionModified` log
const POSITION_MODIFIED_DATA_WORDS: usize = 7;

/// Compute the 4-byte function selector for a canonical signature
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// ABI-encode a call: selector followed by the given 32-byte argument words
pub fn encode_call(signature: &str, args: &[Word]) -> String {
    let mut data = String::with_capacity(2 + 8 + args.len() * 64);
    data.push_str("0x");
    data.push_str(&hex::encode(selector(signature)));
    for word in args {
        data.push_str(&hex::encode(word));
    }
    data
}

/// Encode a bool as a 32-byte word
pub fn bool_word(value: bool) -> Word {
    let mut word = [0u8; 32];
    if value {
        word[31] = 1;
    }
    word
}

/// Parse a hex string (optionally `0x`-prefixed) into raw bytes
fn parse_hex(data: &str) -> Result<Vec<u8>> {
    let stripped = data.strip_prefix("0x").unwrap_or(data);
    hex::decode(stripped).map_err(|e| WatcherError::Decode(format!("invalid hex payload: {e}")))
}

/// Split raw return data into exact 32-byte words
fn split_words(bytes: &[u8]) -> Result<Vec<Word>> {
    if bytes.len() % 32 != 0 {
        return Err(WatcherError::Decode(format!(
            "payload length {} is not a multiple of 32",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(32)
        .map(|chunk| {
            let mut word = [0u8; 32];
            word.copy_from_slice(chunk);
            word
        })
        .collect())
}

/// Interpret a word as an address, requiring the 12 leading pad bytes to be zero
fn word_to_address(word: &Word) -> Result<Address> {
    if word[..12].iter().any(|b| *b != 0) {
        return Err(WatcherError::Decode(
            "address word has non-zero padding".to_string(),
        ));
    }
    Ok(Address::from_slice(&word[12..]))
}

fn word_to_u256(word: &Word) -> U256 {
    U256::from_be_slice(word)
}

fn word_to_i256(word: &Word) -> I256 {
    I256::from_raw(word_to_u256(word))
}

/// Decode a single-address return value (e.g. `proxy()`)
pub fn decode_address_word(data: &str) -> Result<Address> {
    let words = split_words(&parse_hex(data)?)?;
    match words.as_slice() {
        [word] => word_to_address(word),
        _ => Err(WatcherError::Decode(format!(
            "expected 1 return word, got {}",
            words.len()
        ))),
    }
}

/// Decode a dynamic `address[]` return value (e.g. `allMarkets(bool)`)
pub fn decode_address_array(data: &str) -> Result<Vec<Address>> {
    let words = split_words(&parse_hex(data)?)?;
    if words.len() < 2 {
        return Err(WatcherError::Decode(
            "address array payload too short".to_string(),
        ));
    }

    let offset = word_to_u256(&words[0]);
    if offset != U256::from(32u64) {
        return Err(WatcherError::Decode(format!(
            "unexpected array offset {offset}"
        )));
    }

    let count = usize::try_from(word_to_u256(&words[1]))
        .map_err(|_| WatcherError::Decode("array length exceeds usize".to_string()))?;
    if words.len() != 2 + count {
        return Err(WatcherError::Decode(format!(
            "expected {} array words, got {}",
            count,
            words.len() - 2
        )));
    }

    words[2..].iter().map(word_to_address).collect()
}

/// Decode a `PositionModified` log into a typed event
///
/// Requires exactly three topics (signature, indexed id, indexed account)
/// and exactly seven 32-byte data words; everything else is rejected.
pub fn decode_position_modified(
    market: Address,
    topics: &[String],
    data: &str,
) -> Result<PositionModified> {
    if topics.len() != 3 {
        return Err(WatcherError::Decode(format!(
            "expected 3 topics, got {}",
            topics.len()
        )));
    }
    if !topics[0].eq_ignore_ascii_case(POSITION_MODIFIED_TOPIC) {
        return Err(WatcherError::Decode(format!(
            "unexpected event topic {}",
            topics[0]
        )));
    }

    let id_word = topic_word(&topics[1])?;
    let account_word = topic_word(&topics[2])?;

    let words = split_words(&parse_hex(data)?)?;
    if words.len() != POSITION_MODIFIED_DATA_WORDS {
        return Err(WatcherError::Decode(format!(
            "expected {POSITION_MODIFIED_DATA_WORDS} data words, got {}",
            words.len()
        )));
    }

    Ok(PositionModified {
        market,
        id: word_to_u256(&id_word),
        account: word_to_address(&account_word)?,
        margin: word_to_u256(&words[0]),
        size: word_to_i256(&words[1]),
        trade_size: word_to_i256(&words[2]),
        last_price: word_to_u256(&words[3]),
        funding_index: word_to_u256(&words[4]),
        fee: word_to_u256(&words[5]),
        skew: word_to_i256(&words[6]),
    })
}

fn topic_word(topic: &str) -> Result<Word> {
    let bytes = parse_hex(topic)?;
    if bytes.len() != 32 {
        return Err(WatcherError::Decode(format!(
            "topic length {} is not 32 bytes",
            bytes.len()
        )));
    }
    let mut word = [0u8; 32];
    word.copy_from_slice(&bytes);
    Ok(word)
}

/// Convert an unsigned 18-decimal fixed-point word to a decimal value
pub fn u256_to_decimal(value: U256) -> Result<Decimal> {
    let raw = u128::try_from(value)
        .map_err(|_| WatcherError::Conversion(format!("value {value} exceeds 128 bits")))?;
    let raw = i128::try_from(raw)
        .map_err(|_| WatcherError::Conversion(format!("value {value} exceeds i128 range")))?;
    Decimal::try_from_i128_with_scale(raw, WEI_DECIMALS)
        .map_err(|e| WatcherError::Conversion(format!("value {value} out of decimal range: {e}")))
}

/// Convert the magnitude of a signed 18-decimal fixed-point word to a decimal value
pub fn i256_abs_to_decimal(value: I256) -> Result<Decimal> {
    u256_to_decimal(value.unsigned_abs())
}
