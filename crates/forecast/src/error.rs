use surge_core::SurgeError;

/// Error type for forecast computation.
#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    /// The supplied history could not be parsed into samples.
    #[error("Invalid history: {0}")]
    Parse(#[from] SurgeError),

    /// Full-history series whose mean is zero; cv and the spike ratio are undefined.
    #[error("Degenerate series: mean of {samples} hourly samples is zero")]
    DegenerateSeries { samples: usize },

    /// Threshold parameters violate their contract (inverted or non-finite bounds).
    #[error("Invalid threshold parameters: {0}")]
    Configuration(String),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, ForecastError>;
