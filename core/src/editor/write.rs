use crate::document::DocumentAccess;
use crate::error::{HighlightError, Result};
use crate::model::{Directive, HighlightOutcome, HighlightRequest};
use crate::notify::Notifier;

use super::read::extract_selection_text;

// ============================================================================
// Highlight Loop
// ============================================================================

/// 在整份文件中找出 `pattern` 的每一個出現位置，並設定或清除背景色
///
/// 先一次找出所有 match（每個元素的文字只讀一次），再依序修改背景色；
/// 設定格式不會改變文字，所以 match 的位置在修改期間都有效。
/// 重疊的出現位置只算第一個，下一個 match 從前一個結尾之後開始。
///
/// # Arguments
/// * `doc` - 要修改的文件（整個掃描期間持有獨佔借用）
/// * `pattern` - 字面搜尋字串，不可為空
/// * `directive` - 要套用的顏色，或 `Directive::Clear`
///
/// # Returns
/// 被處理的 match 數量；0 代表沒有找到，文件不會被修改
///
/// # Errors
/// - `EmptyPattern`：`pattern` 是空字串，不會進行搜尋
/// - 文件本身回報的錯誤（元素不存在、offset 超出範圍）
pub fn apply_highlight<D>(doc: &mut D, pattern: &str, directive: &Directive) -> Result<usize>
where
    D: DocumentAccess + ?Sized,
{
    let mut written = 0;
    highlight_matches(doc, pattern, directive, &mut written)?;
    Ok(written)
}

/// 從目前選取範圍取出搜尋字串，並套用到整份文件
///
/// # Errors
/// - `NoSelection`：沒有選取，或選取範圍內沒有文字
/// - 其餘同 [`apply_highlight`]
pub fn highlight_selection<D>(doc: &mut D, directive: &Directive) -> Result<usize>
where
    D: DocumentAccess + ?Sized,
{
    let pattern = selection_pattern(doc)?;
    apply_highlight(doc, &pattern, directive)
}

// ============================================================================
// Action Entry Point
// ============================================================================

/// 處理一次使用者的「標示」動作
///
/// 把表單內容轉成 `Directive`，取出選取文字並套用到整份文件，
/// 最後透過 `notifier` 發出剛好一則通知。這個函數不會失敗，
/// 所有錯誤都會轉成通知文字。
///
/// # Arguments
/// * `doc` - 要修改的文件
/// * `notifier` - 接收通知的對象
/// * `request` - 使用者選的顏色，或清除
///
/// # Returns
/// 實際修改的 match 數量與送出的通知；中途失敗時，數量為失敗前已修改的部分
pub fn process_highlight<D, N>(
    doc: &mut D,
    notifier: &N,
    request: HighlightRequest,
) -> HighlightOutcome
where
    D: DocumentAccess + ?Sized,
    N: Notifier + ?Sized,
{
    let mut pattern = None;
    let mut written = 0;
    let result = request.into_directive().and_then(|directive| {
        let selected = pattern.insert(selection_pattern(doc)?);
        highlight_matches(doc, selected, &directive, &mut written)?;
        Ok(success_notice(selected, &directive, written))
    });

    let notice = match result {
        Ok(notice) => notice,
        Err(err) => {
            if err.is_user_error() {
                tracing::info!(error = %err, "highlight action rejected");
            } else {
                tracing::error!(error = %err, written, "highlight action failed");
            }
            match pattern {
                // 失敗前已經改過的部分不會還原，要讓使用者知道
                Some(pattern) if written > 0 => format!(
                    "{}; only {written} instance(s) of \"{pattern}\" were changed.",
                    err.notice()
                ),
                _ => err.notice(),
            }
        }
    };

    notifier.alert(&notice);
    HighlightOutcome {
        count: written,
        notice,
    }
}

// ============================================================================
// Internal Implementation
// ============================================================================

/// 找出並修改所有 match；`written` 在每次成功修改後累加，失敗時保留已完成的數量
#[tracing::instrument(skip(doc, written), fields(pattern_len = pattern.chars().count()))]
fn highlight_matches<D>(
    doc: &mut D,
    pattern: &str,
    directive: &Directive,
    written: &mut usize,
) -> Result<()>
where
    D: DocumentAccess + ?Sized,
{
    if pattern.is_empty() {
        return Err(HighlightError::EmptyPattern);
    }

    let color = directive.color();
    for found in doc.find_all(pattern)? {
        doc.set_background_color(found.element, found.start, found.end_inclusive, color)?;
        *written += 1;
        tracing::debug!(
            element = %found.element,
            start = found.start,
            end_inclusive = found.end_inclusive,
            "highlighted match"
        );
    }

    tracing::info!(count = *written, cleared = color.is_none(), "highlight pass finished");
    Ok(())
}

/// 選取文字為空時視為沒有選取
fn selection_pattern<D>(doc: &D) -> Result<String>
where
    D: DocumentAccess + ?Sized,
{
    let pattern = extract_selection_text(doc)?;
    if pattern.is_empty() {
        return Err(HighlightError::NoSelection);
    }
    Ok(pattern)
}

fn success_notice(pattern: &str, directive: &Directive, count: usize) -> String {
    match (count, directive) {
        (0, _) => format!("No matches found for \"{pattern}\"."),
        (n, Directive::Color(_)) => format!("Highlighted {n} instance(s) of \"{pattern}\"."),
        (n, Directive::Clear) => format!("Cleared highlight from {n} instance(s) of \"{pattern}\"."),
    }
}

// ============================================================================
// Tests
// ============================================================================
