use {crate::StateDiff, thiserror::Error};

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode state diffs: {0}")]
    Encode(#[from] ron::Error),

    #[error("failed to decode state diffs: {0}")]
    Decode(#[from] ron::error::SpannedError),
}

pub fn encode_diffs(diffs: &[StateDiff]) -> Result<String, CodecError> {
    Ok(ron::to_string(diffs)?)
}

pub fn decode_diffs(text: &str) -> Result<Vec<StateDiff>, CodecError> {
    Ok(ron::from_str(text)?)
}
