//! Group pattern resolution.
//!
//! A pattern is first tried as an exact group code, then as a substring of
//! the group descriptions. The number of matched groups decides the shape of
//! the answer:
//!
//! * none: empty result;
//! * one: the group header, its full part listing and its images;
//! * up to the compact threshold: one line per group with a link, and all
//!   images concatenated, each line pointing at its own images;
//! * more: a plain list with no images.

use rusqlite::Connection;
use tracing::{debug, warn};

use crate::errors::EpcResult;
use crate::models::{GroupRecord, MediaHandle, QueryResult, ResolvedGroup};
use crate::query::format::{bilingual, format_group_header, group_line};
use crate::query::group::list_group_impl;
use crate::query::markdown::escape_markdown;
use crate::query::media::resolve_media;
use crate::store::catalogue::{groups_by_code, groups_by_description, Catalogue};
use crate::store::context::CatalogueContext;

/// Groups matching `pattern`: exact code match first, description match
/// only when no code matches.
///
/// Codes and English descriptions are stored upper-case, Russian
/// descriptions lower-case, so the pattern is folded to each column's case.
pub fn find_groups_impl(conn: &Connection, pattern: &str) -> EpcResult<Vec<GroupRecord>> {
    let upper = pattern.to_uppercase();
    let exact = groups_by_code(conn, &upper)?;
    if !exact.is_empty() {
        debug!("Pattern {pattern:?} matched group code exactly");
        return Ok(exact);
    }
    let lower = pattern.to_lowercase();
    let fuzzy = groups_by_description(conn, &upper, &lower)?;
    debug!(
        "Pattern {pattern:?} matched {} group descriptions",
        fuzzy.len()
    );
    Ok(fuzzy)
}

/// Position of a group's images inside the concatenated media list:
/// `"3"` for a single image, `"1-2"` for several, nothing for none.
/// `first` is the 1-based position of the group's first image.
pub fn picture_range(first: usize, count: usize) -> Option<String> {
    match count {
        0 => None,
        1 => Some(first.to_string()),
        n => Some(format!("{first}-{}", first + n - 1)),
    }
}

fn render_detail(
    catalogue: &Catalogue,
    conn: &Connection,
    group: GroupRecord,
) -> EpcResult<QueryResult> {
    let mut text = format_group_header(&group);
    text.push_str(&list_group_impl(conn, &group.code)?);
    let media = resolve_media(catalogue, &group.code);
    Ok(QueryResult { text, media })
}

fn render_compact(catalogue: &Catalogue, label: &str, groups: Vec<GroupRecord>) -> QueryResult {
    let resolved: Vec<ResolvedGroup> = groups
        .into_iter()
        .map(|group| ResolvedGroup {
            media: resolve_media(catalogue, &group.code),
            group,
        })
        .collect();

    let label = escape_markdown(label);
    let mut lines = Vec::with_capacity(resolved.len());
    let mut media: Vec<MediaHandle> = Vec::new();
    for ResolvedGroup {
        group,
        media: group_media,
    } in resolved
    {
        let mut line = format!("{label} {}", group.code);
        if let Some(range) = picture_range(media.len() + 1, group_media.len()) {
            line.push_str(&format!(" \\[{}\\]", escape_markdown(&range)));
        }
        line.push_str(&format!(
            " \\- {}",
            bilingual(&group.description_en, &group.description_ru)
        ));
        lines.push(line);
        media.extend(group_media);
    }

    QueryResult {
        text: lines.join("\n"),
        media,
    }
}

fn render_too_broad(groups: &[GroupRecord], threshold: usize) -> QueryResult {
    let mut text = format!(
        "Найдено групп: *{}*\\. Это больше {threshold}, поэтому изображения не показаны\\. \
         Уточните запрос\\.\n",
        groups.len()
    );
    let lines: Vec<String> = groups.iter().map(group_line).collect();
    text.push_str(&lines.join("\n"));
    QueryResult::text(text)
}

/// Resolve `pattern` against one catalogue.
pub fn resolve_impl(
    catalogue: &Catalogue,
    threshold: usize,
    label: &str,
    pattern: &str,
) -> EpcResult<QueryResult> {
    let conn = catalogue.connect()?;
    let mut groups = find_groups_impl(&conn, pattern)?;

    let result = match groups.len() {
        0 => QueryResult::empty(),
        1 => render_detail(catalogue, &conn, groups.remove(0))?,
        n if n <= threshold => render_compact(catalogue, label, groups),
        _ => render_too_broad(&groups, threshold),
    };
    Ok(result)
}

/// Resolve against the default catalogue, reporting a missing catalogue as
/// `EpcError::CatalogueUnavailable`.
pub fn try_resolve(ctx: &CatalogueContext, label: &str, pattern: &str) -> EpcResult<QueryResult> {
    let catalogue = ctx.default_catalogue()?;
    resolve_impl(catalogue, ctx.config().compact_threshold, label, pattern)
}

/// Resolve against the default catalogue. Never fails: an unavailable
/// catalogue or a read error gives the same empty result as no match.
pub fn resolve(ctx: &CatalogueContext, label: &str, pattern: &str) -> QueryResult {
    match try_resolve(ctx, label, pattern) {
        Ok(result) => result,
        Err(e) if e.is_unavailable() => {
            debug!("Group lookup for {pattern:?} skipped: {e}");
            QueryResult::empty()
        }
        Err(e) => {
            warn!("Group lookup for {pattern:?} failed: {e}");
            QueryResult::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EpcConfig;
    use crate::errors::EpcError;
    use crate::query::group::MULTIPLE_VARIANTS_MARKER;
    use crate::test_support::CatalogueFixture;

    fn media_names(result: &QueryResult) -> Vec<String> {
        result
            .media
            .iter()
            .map(|m| m.path().file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_picture_range() {
        assert_eq!(picture_range(1, 0), None);
        assert_eq!(picture_range(3, 1).as_deref(), Some("3"));
        assert_eq!(picture_range(1, 2).as_deref(), Some("1-2"));
        assert_eq!(picture_range(4, 3).as_deref(), Some("4-6"));
    }

    #[test]
    fn test_no_match_is_empty() {
        let fixture = CatalogueFixture::new();
        fixture.group("111", "CYLINDER HEAD", "головка блока");
        let result = resolve(&fixture.context(), "/g", "TURBO");
        assert!(result.is_empty());
    }

    #[test]
    fn test_exact_code_match_gives_detail() {
        let fixture = CatalogueFixture::new();
        fixture.group("111", "CYLINDER HEAD", "головка блока");
        fixture.group("1111", "HEAD COVER 111", "крышка");
        fixture.part("0K01110100", "111", None, 2, "0000000001", None);
        fixture.part("0K01110200", "111", None, 2, "0000000001", None);
        fixture.part("0K01110300", "111", None, 1, "0000000003", None);
        fixture.image("111", 1);
        fixture.image("111", 2);

        let result = resolve(&fixture.context(), "/g", "111");
        let marker_line = format!("*2*\\. {MULTIPLE_VARIANTS_MARKER}");
        let lines: Vec<&str> = result.text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Группа 111 \\- *CYLINDER HEAD* \\(головка блока\\):",
                "*1*\\. /p 0K01110300 \\(3 шт\\.\\)",
                marker_line.as_str(),
            ]
        );
        assert_eq!(media_names(&result), vec!["11111.png", "11121.png"]);
    }

    #[test]
    fn test_code_match_is_case_normalized() {
        let fixture = CatalogueFixture::new();
        fixture.group("A10", "BRAKE", "тормоз");
        let result = resolve(&fixture.context(), "/g", "a10");
        assert!(result.text.starts_with("Группа A10"));
    }

    #[test]
    fn test_single_fuzzy_match_gives_detail() {
        let fixture = CatalogueFixture::new();
        fixture.group("221", "VALVE COVER", "крышка клапанов");
        fixture.group("222", "PISTON", "поршень");
        fixture.part("0K22110100", "221", None, 1, "0000000001", None);
        let result = resolve(&fixture.context(), "/g", "Valve");
        assert!(result.text.starts_with("Группа 221"));
        assert!(result.text.contains("/p 0K22110100"));
        assert!(result.media.is_empty());
    }

    #[test]
    fn test_english_path_ignores_case() {
        let fixture = CatalogueFixture::new();
        fixture.group("300", "intake valve", "впуск");
        let result = resolve(&fixture.context(), "/g", "Valve");
        assert!(result.text.starts_with("Группа 300"));
    }

    #[test]
    fn test_russian_path_uses_lowercased_pattern() {
        let fixture = CatalogueFixture::new();
        fixture.group("400", "CAMSHAFT", "распредвал клапан");
        let conn = fixture.connect();

        let found = find_groups_impl(&conn, "КЛАПАН").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].code, "400");

        let result = resolve(&fixture.context(), "/g", "Клапан");
        assert!(result.text.starts_with("Группа 400"));
    }

    #[test]
    fn test_exact_match_wins_over_descriptions() {
        let fixture = CatalogueFixture::new();
        fixture.group("OIL", "OIL PUMP", "насос");
        fixture.group("500", "OIL FILTER", "фильтр");
        let conn = fixture.connect();
        let found = find_groups_impl(&conn, "oil").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].code, "OIL");
    }

    #[test]
    fn test_compact_listing_running_picture_ranges() {
        let fixture = CatalogueFixture::new();
        fixture.group("101", "FRONT DOOR", "передняя дверь");
        fixture.group("102", "REAR DOOR", "задняя дверь");
        fixture.group("103", "DOOR LOCK", "замок двери");
        fixture.image("102", 1);
        fixture.image("102", 2);
        fixture.image("103", 3);

        let result = resolve(&fixture.context(), "/g", "door");
        let lines: Vec<&str> = result.text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "/g 101 \\- *FRONT DOOR* \\(передняя дверь\\)",
                "/g 102 \\[1\\-2\\] \\- *REAR DOOR* \\(задняя дверь\\)",
                "/g 103 \\[3\\] \\- *DOOR LOCK* \\(замок двери\\)",
            ]
        );
        assert_eq!(media_names(&result), vec!["10211.png", "10221.png", "10331.png"]);
    }

    #[test]
    fn test_compact_listing_at_threshold() {
        let fixture = CatalogueFixture::new();
        for code in ["601", "602", "603", "604"] {
            fixture.group(code, &format!("SEAT {code}"), "сиденье");
        }
        let result = resolve(&fixture.context(), "/group", "seat");
        assert_eq!(result.text.lines().count(), 4);
        assert!(result.text.lines().all(|l| l.starts_with("/group 60")));
        assert!(result.media.is_empty());
    }

    #[test]
    fn test_too_broad_listing_has_no_media() {
        let fixture = CatalogueFixture::new();
        for code in ["701", "702", "703", "704", "705"] {
            fixture.group(code, &format!("BOLT {code}"), "болт");
            fixture.image(code, 1);
        }
        let result = resolve(&fixture.context(), "/g", "bolt");
        assert!(result.media.is_empty());
        let lines: Vec<&str> = result.text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("Найдено групп: *5*"));
        assert_eq!(lines[1], "701 \\- *BOLT 701* \\(болт\\)");
        assert!(!result.text.contains("\\["));
    }

    #[test]
    fn test_threshold_comes_from_config() {
        let fixture = CatalogueFixture::new();
        for code in ["801", "802", "803"] {
            fixture.group(code, "WHEEL", "колесо");
        }
        let ctx = fixture.context_with(EpcConfig {
            compact_threshold: 2,
            ..fixture.config()
        });
        let result = resolve(&ctx, "/g", "wheel");
        assert!(result.text.starts_with("Найдено групп: *3*"));
    }

    #[test]
    fn test_unavailable_catalogue_degrades_to_empty() {
        let fixture = CatalogueFixture::new();
        fixture.group("111", "CYLINDER HEAD", "головка блока");
        let ctx = fixture.context_with(EpcConfig {
            default_catalogue: "GENKFM999A".to_string(),
            ..fixture.config()
        });
        assert!(resolve(&ctx, "/g", "111").is_empty());
        assert!(matches!(
            try_resolve(&ctx, "/g", "111"),
            Err(EpcError::CatalogueUnavailable(_))
        ));
    }
}
