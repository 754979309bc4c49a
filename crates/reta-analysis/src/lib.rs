//! Day-1 retention analysis over recorded player telemetry
//!
//! This crate turns raw game events into a fitted retention model:
//!
//! 1. **Query Events** ([`store::EventStore`]): Load the events of a [`window::TimeWindow`]
//! 2. **Extract Features** ([`features::extract_features`]): One [`features::PlayerFeatures`]
//!    row per player who could have returned on day 1
//! 3. **Split** ([`split::split_dataset`]): Stratified train/test split with a seedable
//!    random source
//! 4. **Fit and Evaluate** ([`predictor::Predictor`]): Logistic regression on the training
//!    rows, accuracy on the testing rows
//!
//! # Examples
//!
//! ```
//! use chrono::{TimeZone as _, Utc};
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg64;
//! use reta_analysis::{
//!     event::{Event, GAME_FEATURE_CONSUMED},
//!     features::extract_features,
//!     split::{SplitRatio, split_dataset},
//!     window::TimeWindow,
//! };
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let window = TimeWindow::new(
//!     Utc.with_ymd_and_hms(2014, 2, 1, 0, 0, 0).unwrap(),
//!     Utc.with_ymd_and_hms(2014, 2, 8, 0, 0, 0).unwrap(),
//! )?;
//! let events = (0..10)
//!     .map(|i| {
//!         let ts = Utc.with_ymd_and_hms(2014, 2, 1, i, 0, 0).unwrap();
//!         Event::new(format!("player-{i}"), GAME_FEATURE_CONSUMED, ts)
//!     })
//!     .collect::<Vec<_>>();
//!
//! let features = extract_features(&window, &events, &[]);
//! assert_eq!(features.len(), 10);
//!
//! let mut rng = Pcg64::seed_from_u64(0);
//! let split = split_dataset(features, SplitRatio::new(70, 30)?, &mut rng);
//! assert_eq!(split.training.len(), 7);
//! assert_eq!(split.testing.len(), 3);
//! # Ok(())
//! # }
//! ```

pub use self::error::{ConfigError, PredictError};

pub mod error;
pub mod event;
pub mod features;
pub mod predictor;
pub mod split;
pub mod store;
pub mod window;
