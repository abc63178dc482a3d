//! # png2bmp 命令行入口
//!
//! 与插件共用同一条转换链路，方便在没有宿主的环境下排查问题：
//!
//! ```text
//! png2bmp <input.png> <output.bmp>   转换并写出完整 .bmp 文件
//! png2bmp --info <input.png>         以 JSON 输出图片信息
//! ```

use std::process::ExitCode;

use serde::Serialize;
use spi_png::converter::{ConvertConfig, Converter, InputSource};
use spi_png::error::AppError;
use spi_png::plugin;

const USAGE: &str = "用法: png2bmp <input.png> <output.bmp> | png2bmp --info <input.png>";

#[derive(Serialize)]
struct InfoFailure<'a> {
    error: &'a AppError,
}

fn main() -> ExitCode {
    spi_png::logging::init_with_default("info");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let info_mode = args.first().is_some_and(|flag| flag == "--info");

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if info_mode {
                match serde_json::to_string(&InfoFailure { error: &err }) {
                    Ok(json) => println!("{json}"),
                    Err(e) => log::warn!("序列化错误信息失败: {e}"),
                }
            }
            log::error!("❌ {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<(), AppError> {
    let converter = Converter::new(ConvertConfig::from_env());

    match args {
        [flag, input] if flag == "--info" => {
            let bytes = InputSource::file(input, 0).load(converter.config())?;
            if !plugin::is_supported(&bytes) {
                return Err(AppError::Usage(format!("不是 PNG 文件：{input}")));
            }
            let summary = converter.picture_info(&bytes)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
        [input, output] => {
            let bytes = InputSource::file(input, 0).load(converter.config())?;
            if !plugin::is_supported(&bytes) {
                return Err(AppError::Usage(format!("不是 PNG 文件：{input}")));
            }
            let container = converter.convert(&bytes)?;
            std::fs::write(output, container.to_bytes())?;
            log::info!(
                "💾 已写出 {} - {}x{} {} 字节",
                output,
                container.width(),
                container.height(),
                container.file_header.bf_size
            );
            Ok(())
        }
        _ => Err(AppError::Usage(USAGE.to_string())),
    }
}
