//! `SQLite` schema definitions for the durable word store.

/// SQL statement to create the entries table.
///
/// The entry itself is the primary key, which makes inserts idempotent.
pub const CREATE_ENTRIES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS entries (
    value TEXT PRIMARY KEY NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// Insert an entry, ignoring it if already present.
pub const INSERT_ENTRY: &str = "INSERT OR IGNORE INTO entries (value) VALUES (?1)";

/// Delete an entry; a missing entry affects no rows.
pub const DELETE_ENTRY: &str = "DELETE FROM entries WHERE value = ?1";

/// Read all entries in ascending order.
pub const SELECT_ENTRIES: &str = "SELECT value FROM entries ORDER BY value ASC";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_ENTRIES_TABLE, CREATE_METADATA_TABLE];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.is_empty());
        }
    }

    #[test]
    fn test_entries_table_keys_on_value() {
        assert!(CREATE_ENTRIES_TABLE.contains("value TEXT PRIMARY KEY"));
        assert!(INSERT_ENTRY.contains("OR IGNORE"));
    }

    #[test]
    fn test_create_metadata_table_structure() {
        assert!(CREATE_METADATA_TABLE.contains("key TEXT PRIMARY KEY"));
        assert!(CREATE_METADATA_TABLE.contains("value TEXT NOT NULL"));
    }
}
