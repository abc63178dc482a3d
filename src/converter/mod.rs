//! # PNG → 位图转换模块（converter）
//!
//! ## 设计思路
//!
//! 该模块将“输入加载 → PNG 解码归一化 → 位图打包 → 宿主缓冲交付”
//! 按职责拆分为多个子模块，核心流程不依赖宿主 ABI，可以脱离宿主单独测试。
//!
//! - `input`：内存 / 文件+偏移两种输入来源
//! - `reader`：面向解码器的内存读取器
//! - `decoder`：解码适配（颜色归一化 + 镜像行写入）
//! - `bitmap`：位图文件头 / 信息头 / 容器
//! - `sink`：宿主缓冲接口与成对释放
//! - `handler`：编排整条处理流水线
//! - `config/error/source`：配置、错误、中间数据模型
//!
//! ## 新同事快速上手
//!
//! ```text
//! plugin::ffi（宿主导出函数）
//!    ↓
//! input.rs（内存 / 文件加载）
//!    ↓
//! handler.rs（统一编排 + 阶段耗时日志）
//!    ├─ decoder.rs（png 解码 + BGRA 归一化 + 自底向上）
//!    ├─ bitmap.rs（尺寸字段计算 + 序列化）
//!    └─ sink.rs（LocalAlloc / 内存实现）
//!    ↓
//! 返回 ConvertError → plugin::status 映射为宿主状态码
//! ```

mod config;
mod decoder;
mod error;
mod handler;
mod reader;

pub mod bitmap;
pub mod input;
pub mod sink;
pub mod source;

pub use bitmap::{BitmapContainer, BitmapFileHeader, BitmapInfoHeader};
pub use config::{CONFIG_ENV_VAR, ConvertConfig};
pub use error::ConvertError;
pub use handler::Converter;
pub use input::{InputKind, InputSource};
pub use reader::MemoryReader;
pub use sink::{DeliveredBitmap, MemorySink, OutputSink, SinkError};
pub use source::{NormalizedRaster, PictureSummary, SourceImageInfo};
