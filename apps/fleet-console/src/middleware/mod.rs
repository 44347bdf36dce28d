//! 中间件
//!
//! - request_context：为每个请求注入 request_id/trace_id 并建立日志 span

pub mod request;

pub use request::request_context;
