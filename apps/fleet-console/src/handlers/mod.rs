//! Handlers 模块

pub mod apps;
pub mod dashboard;
pub mod devices;
pub mod favorites;
pub mod health;
pub mod logs;
pub mod metrics;
pub mod monitor;
pub mod products;

pub use apps::*;
pub use dashboard::*;
pub use devices::*;
pub use favorites::*;
pub use health::*;
pub use logs::*;
pub use metrics::*;
pub use monitor::*;
pub use products::*;
