//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter         | Implements      | Connects to                   |
//! |-----------------|-----------------|-------------------------------|
//! | `log_sink`      | EventSink       | `log` facade                  |
//! | `stream_source` | RecordSource    | Any `BufRead` (UART, file)    |
//! | `time`          | MonotonicClock  | `std::time::Instant`          |
//! |                 | WallClock       | Local time via `chrono`       |

pub mod log_sink;
pub mod stream_source;
pub mod time;
