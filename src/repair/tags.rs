/*!
 * Emphasis tag balancer.
 *
 * Repairs `<i>`, `<b>` and `<u>` markup that OCR and hand editing leave
 * behind: unmatched opens, stray closes, empty pairs and spans broken at a
 * line break. Each tag name is repaired independently on the glyph stream
 * of the whole cue, so spans that legitimately cross a line break survive.
 */

use crate::markup::{self, EMPHASIS_TAGS, Glyph, Span};

use super::is_dash;

/// Repair emphasis tags in a cue's text.
pub fn balance_tags(text: &str) -> String {
    if !text.contains('<') {
        return text.to_string();
    }

    let mut glyphs = markup::glyphs(text);
    for tag in EMPHASIS_TAGS {
        if !glyphs.iter().any(|g| g.is_open(tag) || g.is_close(tag)) {
            continue;
        }
        remove_noise(&mut glyphs, tag);
        glyphs = pair_tags(&glyphs, tag);
        remove_noise(&mut glyphs, tag);
    }

    // dropping a stray of one tag can empty a pair of a tag already done
    loop {
        let before = glyphs.len();
        for tag in EMPHASIS_TAGS {
            remove_noise(&mut glyphs, tag);
        }
        if glyphs.len() == before {
            break;
        }
    }

    markup::render_glyphs(&glyphs)
}

/// Drop `<i></i>`, `<i> </i>` and `</i><i>` until none are left.
fn remove_noise(glyphs: &mut Vec<Glyph>, tag: &str) {
    loop {
        if let Some(i) =
            (1..glyphs.len()).find(|&i| glyphs[i - 1].is_close(tag) && glyphs[i].is_open(tag))
        {
            glyphs.drain(i - 1..=i);
            continue;
        }

        if let Some((start, end)) = find_empty_pair(glyphs, tag) {
            let had_space = end - start > 1;
            let word_before = start > 0 && is_visible(&glyphs[start - 1]);
            let word_after = end + 1 < glyphs.len() && is_visible(&glyphs[end + 1]);
            let replacement = if had_space && word_before && word_after {
                vec![Glyph::Char(' ')]
            } else {
                Vec::new()
            };
            glyphs.splice(start..=end, replacement);
            continue;
        }

        break;
    }
}

fn is_visible(glyph: &Glyph) -> bool {
    glyph.as_char().is_some_and(|c| !c.is_whitespace())
}

/// An open followed by a close with only same-line whitespace between.
fn find_empty_pair(glyphs: &[Glyph], tag: &str) -> Option<(usize, usize)> {
    for (start, glyph) in glyphs.iter().enumerate() {
        if !glyph.is_open(tag) {
            continue;
        }
        let mut end = start + 1;
        while end < glyphs.len()
            && glyphs[end]
                .as_char()
                .is_some_and(|c| c.is_whitespace() && c != '\n')
        {
            end += 1;
        }
        if end < glyphs.len() && glyphs[end].is_close(tag) {
            return Some((start, end));
        }
    }
    None
}

/// Only markup, whitespace and speaker dashes so far on this line
fn is_line_prefix(line: &[Glyph]) -> bool {
    line.iter().all(|glyph| match glyph.as_char() {
        Some(c) => c.is_whitespace() || is_dash(c),
        None => true,
    })
}

/// A close of `tag` follows `index` on the same line, before any open.
fn closes_later_on_line(glyphs: &[Glyph], index: usize, tag: &str) -> bool {
    for glyph in &glyphs[index + 1..] {
        if glyph.is_line_break() || glyph.is_open(tag) {
            return false;
        }
        if glyph.is_close(tag) {
            return true;
        }
    }
    false
}

#[derive(Debug, Clone, Copy)]
struct OpenTag {
    /// Position in the output glyphs
    index: usize,
    at_line_start: bool,
}

fn pair_tags(glyphs: &[Glyph], tag: &str) -> Vec<Glyph> {
    let mut close_after = vec![false; glyphs.len()];
    let mut seen_close = false;
    for i in (0..glyphs.len()).rev() {
        close_after[i] = seen_close;
        if glyphs[i].is_close(tag) {
            seen_close = true;
        }
    }

    let mut out: Vec<Glyph> = Vec::with_capacity(glyphs.len() + 2);
    let mut line_start = 0usize;
    let mut pending: Option<OpenTag> = None;
    let mut last_closed: Option<OpenTag> = None;

    for (i, glyph) in glyphs.iter().enumerate() {
        if glyph.is_line_break() {
            out.push(glyph.clone());
            line_start = out.len();
            continue;
        }

        if glyph.is_open(tag) {
            let at_line_start = is_line_prefix(&out[line_start..]);
            match pending {
                Some(open) => {
                    // No close anywhere ahead: the earlier span ends with its line
                    if !close_after[i] && at_line_start && open.index < line_start {
                        out.insert(line_start - 1, Glyph::Tag(Span::close(tag)));
                        line_start += 1;
                        out.push(glyph.clone());
                        pending = Some(OpenTag {
                            index: out.len() - 1,
                            at_line_start: true,
                        });
                    }
                }
                None => {
                    let continues_previous_line = !close_after[i]
                        && at_line_start
                        && line_start >= 2
                        && out[line_start - 2].is_close(tag)
                        && last_closed.is_some_and(|open| open.at_line_start);

                    if continues_previous_line {
                        out.remove(line_start - 2);
                        line_start -= 1;
                        pending = last_closed.take();
                    } else {
                        out.push(glyph.clone());
                        pending = Some(OpenTag {
                            index: out.len() - 1,
                            at_line_start,
                        });
                    }
                }
            }
            continue;
        }

        if glyph.is_close(tag) {
            if let Some(open) = pending.take() {
                out.push(glyph.clone());
                last_closed = Some(open);
            } else if is_line_prefix(&out[line_start..]) && closes_later_on_line(glyphs, i, tag) {
                // misplaced opener
                out.push(Glyph::Tag(Span::open(tag)));
                pending = Some(OpenTag {
                    index: out.len() - 1,
                    at_line_start: true,
                });
            }
            continue;
        }

        out.push(glyph.clone());
    }

    if let Some(open) = pending {
        let has_content = out[open.index + 1..].iter().any(is_visible);
        if open.at_line_start && has_content {
            let mut at = out.len();
            while at > open.index + 1 && out[at - 1].as_char().is_some_and(char::is_whitespace) {
                at -= 1;
            }
            out.insert(at, Glyph::Tag(Span::close(tag)));
        } else {
            out.remove(open.index);
        }
    }

    out
}
