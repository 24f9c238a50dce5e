//! Built-in vendor dialects.

pub mod huawei_vrp;
