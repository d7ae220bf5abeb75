use crate::config::HighlightConfig;
use crate::document::DocumentAccess;
use crate::document::search::slice_chars;
use crate::error::{HighlightError, Result};
use crate::model::{Color, ColorPrompt, RangeElement};

// ============================================================================
// Public API
// ============================================================================

/// 從目前的選取範圍提取搜尋字串
///
/// 依選取順序走訪每個 range element：部分選取取 `[start, end_inclusive + 1)`，
/// 完整選取取整段文字，最後串接在一起（不插入分隔符）。
/// 沒有可編輯文字的元素（例如圖片）會被略過。
///
/// # Arguments
/// * `doc` - 實作 `DocumentAccess` 的文件
///
/// # Returns
/// 串接後的純文字；沒有選取時回傳空字串，呼叫端需自行提示使用者
pub fn extract_selection_text<D>(doc: &D) -> Result<String>
where
    D: DocumentAccess + ?Sized,
{
    let Some(selection) = doc.selection() else {
        return Ok(String::new());
    };

    let mut pattern = String::new();
    let mut segments = 0usize;
    for range in selection.text_elements() {
        let text = doc.text(range.element)?;
        pattern.push_str(selected_slice(&text, range));
        segments += 1;
    }

    if segments > 1 {
        tracing::warn!(
            segments,
            "selection spans several elements; pieces are joined without a separator"
        );
    }
    Ok(pattern)
}

/// 讀取選取範圍第一個字元的背景色，用來預先設定顏色選擇器
///
/// 只看第一個有文字的元素（部分選取從 `start`，否則從 0）；
/// 沒有顏色或等於預設色 (`config.default_color`) 時往下一個元素找，
/// 全部找不到回傳 `None`。
pub fn extract_current_background_color<D>(
    doc: &D,
    config: &HighlightConfig,
) -> Result<Option<Color>>
where
    D: DocumentAccess + ?Sized,
{
    let Some(selection) = doc.selection() else {
        return Ok(None);
    };

    for range in selection.text_elements() {
        let len = doc.text(range.element)?.chars().count();
        let offset = range.start_offset();
        if offset >= len {
            continue;
        }
        match doc.background_color(range.element, offset)? {
            Some(color) if color != config.default_color => return Ok(Some(color)),
            _ => continue,
        }
    }
    Ok(None)
}

/// 開啟顏色選擇器前需要的資料：搜尋字串與目前的背景色
///
/// # Errors
/// - `NoSelection`：沒有選取，或選取範圍內沒有文字
pub fn prepare_color_prompt<D>(doc: &D, config: &HighlightConfig) -> Result<ColorPrompt>
where
    D: DocumentAccess + ?Sized,
{
    let pattern = extract_selection_text(doc)?;
    if pattern.is_empty() {
        return Err(HighlightError::NoSelection);
    }
    let initial_color = extract_current_background_color(doc, config)?;
    Ok(ColorPrompt {
        pattern,
        initial_color,
    })
}

// ============================================================================
// Internal Implementation
// ============================================================================

fn selected_slice<'a>(text: &'a str, range: &RangeElement) -> &'a str {
    match range.range {
        Some(partial) => slice_chars(text, partial.start, partial.end_inclusive),
        None => text,
    }
}

// ============================================================================
// Tests
// ============================================================================
