//! Text helpers for the standard Helvetica font.
use encoding_rs::{EncoderResult, WINDOWS_1252};

/// Encode `text` for a simple font with `WinAnsiEncoding`.
///
/// Characters outside Windows-1252, and control characters, become `?`.
pub(super) fn to_win_ansi(text: &str) -> Vec<u8> {
    let cleaned: String = text
        .chars()
        .map(|c| if c.is_control() { '?' } else { c })
        .collect();

    let mut encoder = WINDOWS_1252.new_encoder();
    let mut out = Vec::with_capacity(cleaned.len());
    let mut buf = [0u8; 256];
    let mut rest = cleaned.as_str();
    loop {
        let (result, read, written) =
            encoder.encode_from_utf8_without_replacement(rest, &mut buf, true);
        out.extend_from_slice(&buf[..written]);
        rest = &rest[read..];
        match result {
            EncoderResult::InputEmpty => break,
            EncoderResult::OutputFull => {},
            EncoderResult::Unmappable(_) => out.push(b'?'),
        }
    }
    out
}

/// Rough number of characters that fit in `width` points at `size`.
///
/// Helvetica averages a little over half an em per character.
pub(super) fn chars_per_line(size: f32, width: f32) -> usize {
    ((width / (size * 0.55)) as usize).max(8)
}

/// Split `text` into lines of at most `limit` characters, preferring breaks
/// at spaces. Always returns at least one line.
pub(super) fn wrap(text: &str, limit: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split(' ') {
        let word_len = word.chars().count();
        let needed = if current_len == 0 { word_len } else { current_len + 1 + word_len };

        if needed <= limit {
            if current_len > 0 {
                current.push(' ');
            }
            current.push_str(word);
            current_len = needed;
            continue;
        }

        if current_len > 0 {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }

        // Hard-break words longer than a line
        let mut chars = word.chars().peekable();
        while chars.peek().is_some() {
            let piece: String = chars.by_ref().take(limit).collect();
            let piece_len = piece.chars().count();
            if piece_len == limit && chars.peek().is_some() {
                lines.push(piece);
            } else {
                current = piece;
                current_len = piece_len;
            }
        }
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Like [`wrap`], but keeps at most `max_lines` lines, ending the last kept
/// line with an ellipsis when text was dropped.
pub(super) fn wrap_capped(text: &str, limit: usize, max_lines: usize) -> Vec<String> {
    let mut lines = wrap(text, limit);
    if lines.len() <= max_lines.max(1) {
        return lines;
    }
    lines.truncate(max_lines.max(1));
    if let Some(last) = lines.last_mut() {
        let kept: String = last.chars().take(limit.saturating_sub(1)).collect();
        *last = format!("{}\u{2026}", kept.trim_end());
    }
    lines
}
