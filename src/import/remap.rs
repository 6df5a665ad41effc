use std::collections::{BTreeMap, HashMap};

use crate::scanner::find_block_directives;

/// Point media URLs in `content` at the target site.
///
/// Explicit `url_map` entries are applied first, in one left-to-right pass
/// where the longest key matching at a position wins and replaced text is
/// never scanned again. Whatever still mentions `origin_base` afterwards is
/// moved to `target_base`.
pub fn rewrite_urls(
    content: &str,
    url_map: &BTreeMap<String, String>,
    origin_base: &str,
    target_base: &str,
) -> String {
    let mut rewritten = replace_longest(content, url_map);

    if !origin_base.is_empty() && !target_base.is_empty() && origin_base != target_base {
        rewritten = rewritten.replace(origin_base, target_base);
    }

    rewritten
}

fn replace_longest(content: &str, map: &BTreeMap<String, String>) -> String {
    let mut by_first_byte: HashMap<u8, Vec<(&str, &str)>> = HashMap::new();
    for (from, to) in map {
        if let Some(&first) = from.as_bytes().first() {
            by_first_byte
                .entry(first)
                .or_default()
                .push((from.as_str(), to.as_str()));
        }
    }
    if by_first_byte.is_empty() {
        return content.to_string();
    }
    for candidates in by_first_byte.values_mut() {
        candidates.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    }

    let bytes = content.as_bytes();
    let mut out = String::with_capacity(content.len());
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        let found = by_first_byte.get(&bytes[i]).and_then(|candidates| {
            candidates
                .iter()
                .find(|(from, _)| bytes[i..].starts_with(from.as_bytes()))
        });

        match found {
            Some((from, to)) => {
                out.push_str(&content[copied..i]);
                out.push_str(to);
                i += from.len();
                copied = i;
            }
            None => i += 1,
        }
    }

    out.push_str(&content[copied..]);
    out
}

/// Rewrite the `ref` of every block directive whose id has a mapping.
///
/// Unmapped refs are left as they are. Nothing but the digits of mapped
/// refs changes.
pub fn remap_block_refs(content: &str, block_ids: &HashMap<u64, u64>) -> String {
    if block_ids.is_empty() || content.is_empty() {
        return content.to_string();
    }

    let mut out = String::with_capacity(content.len());
    let mut copied = 0;

    for directive in find_block_directives(content) {
        let Some(new_id) = directive.ref_id.and_then(|id| block_ids.get(&id)) else {
            continue;
        };
        out.push_str(&content[copied..directive.ref_span.start]);
        out.push_str(&new_id.to_string());
        copied = directive.ref_span.end;
    }

    out.push_str(&content[copied..]);
    out
}
