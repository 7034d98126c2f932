//! Receipt decoding.

use alloy::primitives::{LogData, U256};
use alloy::sol_types::SolEvent;

use crate::blockchain::contract::ModredIP;

/// Token id from the first ERC-721 `Transfer` log, taken from `topics[3]`.
///
/// Logs with other signatures, or a Transfer without the indexed id, are skipped.
pub fn extract_token_id<'a, I>(logs: I) -> Option<U256>
where
    I: IntoIterator<Item = &'a LogData>,
{
    logs.into_iter().find_map(|log| {
        let topics = log.topics();
        if topics.first() != Some(&ModredIP::Transfer::SIGNATURE_HASH) {
            return None;
        }
        topics.get(3).map(|t| U256::from_be_bytes(t.0))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{b256, Bytes, B256};

    fn transfer_log(token_id: u64) -> LogData {
        LogData::new_unchecked(
            vec![
                ModredIP::Transfer::SIGNATURE_HASH,
                B256::ZERO,
                B256::left_padding_from(&[0xd4, 0xa6]),
                B256::from(U256::from(token_id)),
            ],
            Bytes::new(),
        )
    }

    #[test]
    fn test_transfer_signature_matches_erc721() {
        assert_eq!(
            ModredIP::Transfer::SIGNATURE_HASH,
            b256!("ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef")
        );
    }

    #[test]
    fn test_extracts_first_transfer() {
        let unrelated = LogData::new_unchecked(vec![B256::repeat_byte(0x11)], Bytes::new());
        let logs = [unrelated, transfer_log(57), transfer_log(58)];

        assert_eq!(extract_token_id(logs.iter()), Some(U256::from(57)));
    }

    #[test]
    fn test_transfer_without_token_topic_skipped() {
        let truncated = LogData::new_unchecked(
            vec![ModredIP::Transfer::SIGNATURE_HASH, B256::ZERO],
            Bytes::new(),
        );
        assert_eq!(extract_token_id([truncated].iter()), None);
        assert_eq!(extract_token_id(std::iter::empty()), None);
    }
}
