use rusqlite::{params, Connection, OpenFlags};
use std::collections::HashSet;
use std::path::{Component, Path};
use std::time::Duration;

/// Walks `stable_parents` upward from the item whose `cloud_id` matches,
/// stopping at a parentless item or once `?2` levels have been followed.
const ANCESTOR_CHAIN_QUERY: &str = "\
WITH RECURSIVE chain(stable_id, local_title, parent_id, depth) AS (
    SELECT i.stable_id, i.local_title, sp.parent_stable_id, 0
    FROM stable_ids s
    JOIN items i ON s.stable_id = i.stable_id
    LEFT JOIN stable_parents sp ON sp.item_stable_id = i.stable_id
    WHERE s.cloud_id = ?1
    UNION ALL
    SELECT i.stable_id, i.local_title, sp.parent_stable_id, c.depth + 1
    FROM chain c
    JOIN items i ON i.stable_id = c.parent_id
    LEFT JOIN stable_parents sp ON sp.item_stable_id = i.stable_id
    WHERE c.parent_id IS NOT NULL AND c.depth < ?2
)
SELECT stable_id, local_title, parent_id, depth FROM chain ORDER BY depth DESC";

/// One row of the ancestor chain, root-most first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ChainRow {
    pub stable_id: i64,
    pub title: Option<String>,
    pub parent_id: Option<i64>,
    pub depth: i64,
}

/// Returns the root-to-leaf display names of `cloud_id` in the store at
/// `db_path`, or `None` when the store cannot be read, the ID is unknown, or
/// the chain is incomplete.
pub fn query_path_segments(
    db_path: &Path,
    cloud_id: &str,
    busy_timeout: Duration,
    max_depth: u32,
) -> Option<Vec<String>> {
    let rows = match fetch_chain(db_path, cloud_id, busy_timeout, max_depth) {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!("Skipping metadata store {}: {}", db_path.display(), e);
            return None;
        }
    };

    if rows.is_empty() {
        tracing::debug!("{} not present in {}", cloud_id, db_path.display());
        return None;
    }

    let segments = segments_from_chain(rows);
    if segments.is_none() {
        tracing::debug!(
            "Discarding incomplete ancestor chain for {} in {}",
            cloud_id,
            db_path.display()
        );
    }
    segments
}

fn fetch_chain(
    db_path: &Path,
    cloud_id: &str,
    busy_timeout: Duration,
    max_depth: u32,
) -> rusqlite::Result<Vec<ChainRow>> {
    let conn = open_read_only(db_path, busy_timeout)?;
    let mut stmt = conn.prepare(ANCESTOR_CHAIN_QUERY)?;
    let rows = stmt
        .query_map(params![cloud_id, max_depth], |row| {
            Ok(ChainRow {
                stable_id: row.get(0)?,
                title: row.get(1)?,
                parent_id: row.get(2)?,
                depth: row.get(3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Opens a store read-only so DriveFS can keep writing to it.
fn open_read_only(db_path: &Path, busy_timeout: Duration) -> rusqlite::Result<Connection> {
    let conn = Connection::open_with_flags(
        db_path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    conn.busy_timeout(busy_timeout)?;
    Ok(conn)
}

/// Checks that a store has the tables the ancestor query needs and returns
/// how many items it maps to cloud IDs.
pub fn probe_store(db_path: &Path, busy_timeout: Duration) -> rusqlite::Result<i64> {
    let conn = open_read_only(db_path, busy_timeout)?;
    conn.prepare(ANCESTOR_CHAIN_QUERY)?;
    conn.query_row("SELECT COUNT(*) FROM stable_ids", [], |row| row.get(0))
}

/// Validates a root-first chain and extracts its names.
///
/// Rejects chains whose root still has a parent (depth bound reached or
/// dangling link), whose links or depths do not line up, that revisit a
/// stable id, or that hold a missing or unsafe name.
pub(crate) fn segments_from_chain(rows: Vec<ChainRow>) -> Option<Vec<String>> {
    let root = rows.first()?;
    if root.parent_id.is_some() {
        return None;
    }

    let len = i64::try_from(rows.len()).ok()?;
    let mut seen = HashSet::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let expected_depth = len - 1 - i64::try_from(index).ok()?;
        if row.depth != expected_depth || !seen.insert(row.stable_id) {
            return None;
        }
        if index > 0 && row.parent_id != Some(rows[index - 1].stable_id) {
            return None;
        }
    }

    rows.into_iter()
        .map(|row| row.title.filter(|title| is_safe_segment(title)))
        .collect()
}

fn is_safe_segment(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == name
    )
}
