// metadiff-core/src/domain/template/scope.rs

// `user_*` catalog views have no OWNER column: everything belongs to the connecting user.
// The rewrite swaps the owner select item for a literal, drops the system-schema exclusion and
// groups by the literal instead. Column order and aliases are untouched.

use regex::{Captures, Regex};
use std::sync::OnceLock;

struct ScopeRegexes {
    owner_item: Regex,
    exclusion_then_and: Regex,
    exclusion: Regex,
    group_by: Regex,
}

fn regexes() -> &'static ScopeRegexes {
    static RE: OnceLock<ScopeRegexes> = OnceLock::new();
    RE.get_or_init(|| {
        let compile = |pattern: &str| {
            Regex::new(pattern).unwrap_or_else(|_| Regex::new("$^").unwrap_or_else(|_| unreachable!()))
        };
        ScopeRegexes {
            owner_item: compile(r"(?mi)^([ \t]*(?:SELECT[ \t]+)?)(owner)([ \t]*,[ \t]*)$"),
            exclusion_then_and: compile(
                r"(?mi)^[ \t]*WHERE[ \t]+owner[ \t]+NOT[ \t]+IN[ \t]*\([^)\n]*\)[ \t]*\r?\n([ \t]*)AND\b",
            ),
            exclusion: compile(
                r"(?mi)^[ \t]*WHERE[ \t]+owner[ \t]+NOT[ \t]+IN[ \t]*\([^)\n]*\)[ \t]*(?:\r?\n|$)",
            ),
            group_by: compile(r"(?i)(GROUP[ \t]+BY[ \t]+)owner\b"),
        }
    })
}

fn sql_string_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Rewrite a catalog query for the `user` view scope, binding ownership to `user`.
///
/// Applying the rewrite twice yields the same SQL as applying it once.
pub fn rewrite_for_user_scope(sql: &str, user: &str) -> String {
    let re = regexes();
    let literal = sql_string_literal(user);

    let sql = re.owner_item.replace_all(sql, |caps: &Captures| {
        format!("{}{} AS {}{}", &caps[1], literal, &caps[2], &caps[3])
    });
    // A dropped WHERE hands its keyword to the condition that followed it.
    let sql = re
        .exclusion_then_and
        .replace_all(&sql, |caps: &Captures| format!("{}WHERE", &caps[1]));
    let sql = re.exclusion.replace_all(&sql, "");
    let sql = re
        .group_by
        .replace_all(&sql, |caps: &Captures| format!("{}{}", &caps[1], literal));

    sql.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "SELECT '<db-name>' AS pkey,\n       owner,\n       object_type,\n       COUNT(*) AS object_count\nFROM <view_type>_objects\nWHERE owner NOT IN ('SYS', 'SYSTEM')\nGROUP BY owner, object_type\n";

    #[test]
    fn test_owner_becomes_user_literal() {
        let sql = rewrite_for_user_scope(TEMPLATE, "SCOTT");
        assert!(sql.contains("'SCOTT' AS owner,"));
        assert!(sql.contains("GROUP BY 'SCOTT', object_type"));
        assert!(!sql.contains("NOT IN ('SYS', 'SYSTEM')"));
        assert!(!sql.contains("GROUP BY owner"));
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let once = rewrite_for_user_scope(TEMPLATE, "SCOTT");
        let twice = rewrite_for_user_scope(&once, "SCOTT");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_column_order_is_preserved() {
        let sql = rewrite_for_user_scope(TEMPLATE, "SCOTT");
        let pkey = sql.find("AS pkey").unwrap_or(usize::MAX);
        let owner = sql.find("AS owner").unwrap_or(usize::MAX);
        let object_type = sql.find("object_type,").unwrap_or(usize::MAX);
        assert!(pkey < owner && owner < object_type);
    }

    #[test]
    fn test_following_and_becomes_where() {
        let sql = "SELECT owner,\n       table_name\nFROM user_tables\nWHERE owner NOT IN ('SYS', 'SYSTEM')\n  AND temporary = 'N'\n";
        let rewritten = rewrite_for_user_scope(sql, "HR");
        assert!(rewritten.contains("  WHERE temporary = 'N'"));
        assert!(!rewritten.contains("AND temporary"));
    }

    #[test]
    fn test_owner_prefixed_columns_untouched() {
        let sql = "SELECT owner_id,\n       name\nFROM t\nGROUP BY owner_id, name\n";
        assert_eq!(rewrite_for_user_scope(sql, "HR"), sql);
    }

    #[test]
    fn test_user_literal_is_escaped() {
        let sql = rewrite_for_user_scope("SELECT owner,\n  x\nFROM t\n", "O'BRIEN");
        assert!(sql.contains("'O''BRIEN' AS owner,"));
    }
}
