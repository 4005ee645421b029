//! 操作系统剪贴板访问层
//!
//! # 设计思路
//!
//! 把"读当前剪贴板内容（带格式标签）/ 按格式写入"收敛成一个小 trait，
//! 监控器与写入路径只依赖该 trait，测试用内存假件替换真实系统剪贴板。
//!
//! # 实现思路
//!
//! - 文本读写委托 `arboard`（内部自带剪贴板打开/关闭的作用域式获取与释放）。
//! - 文件列表（CF_HDROP）为 Windows 专有格式，使用 `windows` crate 直接读写，
//!   打开剪贴板后无论成败都保证 `CloseClipboard`。
//! - 图片只探测"是否存在"，从不物化成可用载荷。
//! - 文件列表写入在非 Windows 平台直接返回错误。

use std::path::PathBuf;

use crate::error::AppError;

/// 一次剪贴板读取得到的可用格式集合
///
/// 各字段相互独立：浏览器复制等场景会同时放入多种格式。
/// 分类的优先级裁决不在这里做，由监控层按固定顺序挑选。
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Unicode 文本
    pub unicode: Option<String>,
    /// 传统编码文本（CF_TEXT；`arboard` 统一返回 Unicode，此槽位留给其他后端）
    pub text: Option<String>,
    /// 位图 / DIB 图片是否存在（内容不读取）
    pub image: bool,
    /// 文件拖放列表
    pub files: Option<Vec<PathBuf>>,
}

/// 系统剪贴板的受限访问接口
pub trait ClipboardBackend: Send {
    /// 读取当前剪贴板的可用格式与内容
    fn snapshot(&mut self) -> Result<Snapshot, AppError>;

    /// 以文本格式写入
    fn set_text(&mut self, text: &str) -> Result<(), AppError>;

    /// 以文件拖放格式写入
    fn set_files(&mut self, paths: &[PathBuf]) -> Result<(), AppError>;
}

// ============================================================================
// 真实系统剪贴板
// ============================================================================

/// 基于 `arboard` + Win32 的系统剪贴板后端
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl ClipboardBackend for SystemClipboard {
    fn snapshot(&mut self) -> Result<Snapshot, AppError> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| AppError::Clipboard(format!("打开剪贴板失败: {}", e)))?;

        // 按分类优先级逐级探测，排在前面的格式命中后不再继续读取
        let unicode = clipboard.get_text().ok();
        if unicode.is_some() {
            return Ok(Snapshot {
                unicode,
                ..Snapshot::default()
            });
        }

        if clipboard.get_image().is_ok() {
            return Ok(Snapshot {
                image: true,
                ..Snapshot::default()
            });
        }

        Ok(Snapshot {
            files: read_clipboard_files()?,
            ..Snapshot::default()
        })
    }

    fn set_text(&mut self, text: &str) -> Result<(), AppError> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| AppError::Clipboard(format!("打开剪贴板失败: {}", e)))?;
        clipboard
            .set_text(text)
            .map_err(|e| AppError::Clipboard(format!("写入文本失败: {}", e)))
    }

    fn set_files(&mut self, paths: &[PathBuf]) -> Result<(), AppError> {
        write_clipboard_files(paths)
    }
}

// ============================================================================
// CF_HDROP 文件列表（Windows 专用）
// ============================================================================

/// 从剪贴板读取文件列表（CF_HDROP 格式）
///
/// 用户在资源管理器中复制文件时，剪贴板中包含 CF_HDROP 数据。
#[cfg(target_os = "windows")]
fn read_clipboard_files() -> Result<Option<Vec<PathBuf>>, AppError> {
    use std::ffi::OsString;
    use std::os::windows::ffi::OsStringExt;
    use windows::Win32::System::DataExchange::{CloseClipboard, GetClipboardData, OpenClipboard};
    use windows::Win32::System::Ole::CF_HDROP;
    use windows::Win32::UI::Shell::{DragQueryFileW, HDROP};

    unsafe {
        if OpenClipboard(None).is_err() {
            return Ok(None);
        }

        let result = (|| -> Result<Option<Vec<PathBuf>>, AppError> {
            let handle = match GetClipboardData(CF_HDROP.0 as u32) {
                Ok(h) => h,
                Err(_) => return Ok(None),
            };

            let hdrop = HDROP(handle.0);
            let count = DragQueryFileW(hdrop, 0xFFFFFFFF, None);
            if count == 0 {
                return Ok(None);
            }

            let mut files = Vec::with_capacity(count as usize);
            for i in 0..count {
                let len = DragQueryFileW(hdrop, i, None);
                if len == 0 {
                    continue;
                }

                let mut buf = vec![0u16; (len + 1) as usize];
                DragQueryFileW(hdrop, i, Some(&mut buf));

                if let Some(pos) = buf.iter().position(|&c| c == 0) {
                    buf.truncate(pos);
                }

                files.push(PathBuf::from(OsString::from_wide(&buf)));
            }

            if files.is_empty() {
                Ok(None)
            } else {
                Ok(Some(files))
            }
        })();

        let _ = CloseClipboard();
        result
    }
}

#[cfg(not(target_os = "windows"))]
fn read_clipboard_files() -> Result<Option<Vec<PathBuf>>, AppError> {
    Ok(None)
}

/// 把文件列表以 CF_HDROP 格式写入剪贴板
#[cfg(target_os = "windows")]
fn write_clipboard_files(paths: &[PathBuf]) -> Result<(), AppError> {
    use std::os::windows::ffi::OsStrExt;
    use windows::Win32::Foundation::GlobalFree;
    use windows::Win32::System::DataExchange::{
        CloseClipboard, EmptyClipboard, OpenClipboard, SetClipboardData,
    };
    use windows::Win32::System::Memory::{GlobalAlloc, GlobalLock, GlobalUnlock, GMEM_MOVEABLE};
    use windows::Win32::System::Ole::CF_HDROP;
    use windows::Win32::UI::Shell::DROPFILES;

    if paths.is_empty() {
        return Err(AppError::Clipboard("没有可写入的文件路径".to_string()));
    }

    let encoded_paths: Vec<Vec<u16>> = paths
        .iter()
        .map(|path| {
            path.as_os_str()
                .encode_wide()
                .chain(std::iter::once(0))
                .collect::<Vec<u16>>()
        })
        .collect();

    unsafe {
        OpenClipboard(None).map_err(|e| AppError::Clipboard(format!("打开剪贴板失败: {:?}", e)))?;

        EmptyClipboard().map_err(|e| {
            let _ = CloseClipboard();
            AppError::Clipboard(format!("清空剪贴板失败: {:?}", e))
        })?;

        // DROPFILES 头 + 双零结尾的宽字符路径串
        let mut size = std::mem::size_of::<DROPFILES>();
        size += encoded_paths
            .iter()
            .map(|wide| wide.len() * std::mem::size_of::<u16>())
            .sum::<usize>();
        size += std::mem::size_of::<u16>();

        let hglobal = GlobalAlloc(GMEM_MOVEABLE, size).map_err(|e| {
            let _ = CloseClipboard();
            AppError::Clipboard(format!("分配内存失败: {:?}", e))
        })?;

        let ptr = GlobalLock(hglobal) as *mut u8;
        if ptr.is_null() {
            let _ = GlobalFree(Some(hglobal));
            let _ = CloseClipboard();
            return Err(AppError::Clipboard("锁定内存失败".to_string()));
        }

        let drop_files = ptr as *mut DROPFILES;
        std::ptr::write_bytes(drop_files, 0, 1);
        (*drop_files).pFiles = std::mem::size_of::<DROPFILES>() as u32;
        (*drop_files).pt.x = 0;
        (*drop_files).pt.y = 0;
        (*drop_files).fNC = false.into();
        (*drop_files).fWide = true.into();

        let mut file_ptr = ptr.add(std::mem::size_of::<DROPFILES>()) as *mut u16;
        for wide in &encoded_paths {
            std::ptr::copy_nonoverlapping(wide.as_ptr(), file_ptr, wide.len());
            file_ptr = file_ptr.add(wide.len());
        }
        *file_ptr = 0;

        let _ = GlobalUnlock(hglobal);

        if let Err(e) = SetClipboardData(
            CF_HDROP.0 as u32,
            Some(windows::Win32::Foundation::HANDLE(hglobal.0)),
        ) {
            let _ = GlobalFree(Some(hglobal));
            let _ = CloseClipboard();
            return Err(AppError::Clipboard(format!("写入文件列表失败: {:?}", e)));
        }

        let _ = CloseClipboard();
        log::debug!("📁 已写入 {} 个文件路径到剪贴板", paths.len());
        Ok(())
    }
}

#[cfg(not(target_os = "windows"))]
fn write_clipboard_files(_paths: &[PathBuf]) -> Result<(), AppError> {
    Err(AppError::Clipboard(
        "文件列表写入仅在 Windows 上支持".to_string(),
    ))
}
