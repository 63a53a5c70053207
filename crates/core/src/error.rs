use thiserror::Error;

#[derive(Error, Debug)]
pub enum SurgeError {
    #[error("Invalid timestamp at index {index}: '{value}' ({source})")]
    InvalidTimestamp {
        index: usize,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Mismatched series: {intervals} intervals but {data} counts")]
    MismatchedSeries { intervals: usize, data: usize },
}

pub type Result<T> = std::result::Result<T, SurgeError>;
