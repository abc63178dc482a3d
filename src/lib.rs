//! # PNG 读取插件（库入口）
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │              宿主图片查看器（Susie 00IN 插件约定）         │
//! │  GetPluginInfo ─ IsSupported ─ GetPictureInfo ─ GetPicture│
//! └───────┬──────────────────────────────────────────────────┘
//!         ↕ extern "system"（状态码 + LocalAlloc 句柄）
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            本库 (Rust)                           │
//! │                                                          │
//! │  ┌─ plugin ──────── 导出函数 / 嗅探 / 状态码 / 元数据      │
//! │  │                                                       │
//! │  ├─ converter ───── 解码适配 + 位图打包 + 宿主缓冲接口      │
//! │  │   ├─ decoder     png 解码 → 自底向上 BGRA              │
//! │  │   ├─ bitmap      BMP 文件头 / 信息头                   │
//! │  │   └─ sink        OutputSink（成对分配与释放）          │
//! │  │                                                       │
//! │  ├─ error ───────── AppError（命令行工具）                │
//! │  └─ logging ─────── env_logger 惰性初始化                 │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`converter`] | PNG → 32 位 BGRA 自底向上位图，核心流程与宿主无关 |
//! | [`plugin`] | 宿主约定：元数据、格式嗅探、状态码、导出函数 |
//! | [`error`] | 顶层错误类型 `AppError` |
//! | [`logging`] | 日志初始化 |

pub mod converter;
pub mod error;
pub mod logging;
pub mod plugin;
