//! `SQLite` schema definitions for the RSVP table.

/// SQL statement to create the RSVP table.
///
/// `seq` records insertion order and breaks ties between RSVPs submitted in
/// the same millisecond. `submitted_at` is stored as fixed-width RFC 3339
/// (`...T12:00:00.000Z`) so it sorts correctly as text.
pub const CREATE_RSVPS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS rsvps (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    attending TEXT NOT NULL CHECK (attending IN ('yes', 'no')),
    submitted_at TEXT NOT NULL
)
";

/// SQL statement to create an index matching the listing order.
pub const CREATE_SUBMITTED_AT_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_rsvps_submitted_at ON rsvps(submitted_at DESC, seq DESC)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_RSVPS_TABLE, CREATE_SUBMITTED_AT_INDEX];

/// Column list shared by every RSVP query, in `row_to_rsvp` order.
pub const RSVP_COLUMNS: &str = "id, name, attending, submitted_at";

/// Newest-first ordering used by listing and positional deletes.
pub const LISTING_ORDER: &str = "ORDER BY submitted_at DESC, seq DESC";

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
    fn test_create_rsvps_table_contains_required_columns() {
        assert!(CREATE_RSVPS_TABLE.contains("seq INTEGER PRIMARY KEY"));
        assert!(CREATE_RSVPS_TABLE.contains("id TEXT NOT NULL UNIQUE"));
        assert!(CREATE_RSVPS_TABLE.contains("name TEXT NOT NULL"));
        assert!(CREATE_RSVPS_TABLE.contains("attending TEXT NOT NULL"));
        assert!(CREATE_RSVPS_TABLE.contains("submitted_at TEXT NOT NULL"));
    }
}
