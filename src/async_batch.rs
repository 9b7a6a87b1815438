//! Async batch conversion module
//!
//! This module converts many containers concurrently. Each conversion is the
//! regular blocking one, run on tokio's blocking pool.

#[cfg(feature = "async")]
/// Concurrent conversion with a configurable concurrency limit
pub mod processor {
    use crate::container::{convert, output_path_for, ConversionReport};
    use crate::{DbcError, Result};
    use futures::stream::{self, StreamExt};
    use log::{info, warn};
    use std::path::{Path, PathBuf};

    /// Result of one conversion in a batch
    #[derive(Debug)]
    pub struct BatchOutcome {
        /// Container that was converted
        pub input: PathBuf,
        /// DBF file that was written
        pub output: PathBuf,
        /// Conversion result
        pub result: Result<ConversionReport>,
    }

    /// Concurrent DBC converter
    #[derive(Debug, Clone)]
    pub struct AsyncBatchConverter {
        concurrency_limit: usize,
        output_dir: Option<PathBuf>,
    }

    impl AsyncBatchConverter {
        /// Create a converter running one conversion per CPU
        pub fn new() -> Self {
            Self {
                concurrency_limit: num_cpus::get(),
                output_dir: None,
            }
        }

        /// Set the concurrency limit
        pub fn with_concurrency(mut self, limit: usize) -> Self {
            self.concurrency_limit = limit.max(1);
            self
        }

        /// Write DBF files into `dir` instead of next to their containers
        pub fn with_output_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
            self.output_dir = Some(dir.into());
            self
        }

        /// Convert one container without blocking the async runtime
        pub async fn convert_file(input: PathBuf, output: PathBuf) -> Result<ConversionReport> {
            tokio::task::spawn_blocking(move || convert(&input, &output))
                .await
                .map_err(|e| DbcError::Io(std::io::Error::other(e)))?
        }

        /// Convert every container in `files`, deriving the output names.
        ///
        /// Outcomes are returned in completion order; one failure does not
        /// stop the others.
        pub async fn convert_files<P: AsRef<Path>>(&self, files: Vec<P>) -> Vec<BatchOutcome> {
            let pairs = files
                .iter()
                .map(|path| {
                    let input = path.as_ref().to_path_buf();
                    let output = output_path_for(&input, self.output_dir.as_deref());
                    (input, output)
                })
                .collect();
            self.convert_pairs(pairs).await
        }

        /// Convert explicit (input, output) pairs
        pub async fn convert_pairs(&self, pairs: Vec<(PathBuf, PathBuf)>) -> Vec<BatchOutcome> {
            let outcomes: Vec<BatchOutcome> = stream::iter(pairs.into_iter().map(
                |(input, output)| async move {
                    let result = Self::convert_file(input.clone(), output.clone()).await;
                    match &result {
                        Ok(report) if report.has_trailing_data() => warn!(
                            "{}: {} leftover bytes after decompression",
                            input.display(),
                            report.trailing_bytes
                        ),
                        Ok(_) => info!("{} -> {}", input.display(), output.display()),
                        Err(e) => warn!("{}: {}", input.display(), e),
                    }
                    BatchOutcome {
                        input,
                        output,
                        result,
                    }
                },
            ))
            .buffer_unordered(self.concurrency_limit)
            .collect()
            .await;

            outcomes
        }
    }

    impl Default for AsyncBatchConverter {
        fn default() -> Self {
            Self::new()
        }
    }
}

#[cfg(feature = "async")]
pub use processor::{AsyncBatchConverter, BatchOutcome};
