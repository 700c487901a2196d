pub mod client;

pub use client::{
    FetchError, NotionClient, Pacing, RecordSource, Sleeper, TokioSleeper, DEFAULT_PAGE_SIZE,
};
