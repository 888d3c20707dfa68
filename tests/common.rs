use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tempfile::TempDir;

pub const MOUNT_NAME: &str = "GoogleDrive-test@example.com";

/// Minimal DriveFS-like schema plus a few item hierarchies.
pub const FIXTURE_SQL: &str = r#"
CREATE TABLE stable_ids (
    stable_id INTEGER PRIMARY KEY,
    cloud_id TEXT
);
CREATE INDEX stable_ids_cloud_id_idx ON stable_ids(cloud_id);

CREATE TABLE items (
    stable_id INTEGER PRIMARY KEY,
    local_title TEXT,
    is_folder BOOLEAN
);

CREATE TABLE stable_parents (
    item_stable_id INTEGER PRIMARY KEY,
    parent_stable_id INTEGER
);

-- Drive/Docs/note.txt
INSERT INTO stable_ids VALUES (100, '0ADRIVE');
INSERT INTO items VALUES (100, 'Drive', 1);
INSERT INTO stable_ids VALUES (110, '1ADOCS');
INSERT INTO items VALUES (110, 'Docs', 1);
INSERT INTO stable_parents VALUES (110, 100);
INSERT INTO stable_ids VALUES (120, '1ANOTE');
INSERT INTO items VALUES (120, 'note.txt', 0);
INSERT INTO stable_parents VALUES (120, 110);

-- マイドライブ/Colab Notebooks/sample.py
INSERT INTO stable_ids VALUES (101, '0AROOT');
INSERT INTO items VALUES (101, 'マイドライブ', 1);
INSERT INTO stable_ids VALUES (201, '1AFOLDER');
INSERT INTO items VALUES (201, 'Colab Notebooks', 1);
INSERT INTO stable_parents VALUES (201, 101);
INSERT INTO stable_ids VALUES (301, '1BFILE');
INSERT INTO items VALUES (301, 'sample.py', 0);
INSERT INTO stable_parents VALUES (301, 201);

-- Computer backup: マイ iMac/backup.txt
INSERT INTO stable_ids VALUES (102, '0BCOMPUTER');
INSERT INTO items VALUES (102, 'マイ iMac', 1);
INSERT INTO stable_ids VALUES (302, '1CBACKUP');
INSERT INTO items VALUES (302, 'backup.txt', 0);
INSERT INTO stable_parents VALUES (302, 102);

-- Shared drive: TeamDrive/file.doc
INSERT INTO stable_ids VALUES (103, '0CTEAM');
INSERT INTO items VALUES (103, 'TeamDrive', 1);
INSERT INTO stable_ids VALUES (303, '1DSHARED');
INSERT INTO items VALUES (303, 'file.doc', 0);
INSERT INTO stable_parents VALUES (303, 103);

-- Leaf with NULL title
INSERT INTO stable_ids VALUES (999, '0DNULL');
INSERT INTO items VALUES (999, NULL, 0);

-- Named leaf under a NULL-titled folder
INSERT INTO stable_ids VALUES (400, '0ENULLROOT');
INSERT INTO items VALUES (400, NULL, 1);
INSERT INTO stable_ids VALUES (401, '1ECHILD');
INSERT INTO items VALUES (401, 'orphan.txt', 0);
INSERT INTO stable_parents VALUES (401, 400);

-- Parent cycle: 500 <-> 501
INSERT INTO stable_ids VALUES (500, '0FCYCLEA');
INSERT INTO items VALUES (500, 'LoopA', 1);
INSERT INTO stable_parents VALUES (500, 501);
INSERT INTO stable_ids VALUES (501, '1FCYCLEB');
INSERT INTO items VALUES (501, 'LoopB', 1);
INSERT INTO stable_parents VALUES (501, 500);

-- Dangling parent link
INSERT INTO stable_ids VALUES (600, '1GDANGLING');
INSERT INTO items VALUES (600, 'lost.txt', 0);
INSERT INTO stable_parents VALUES (600, 12345);
"#;

/// Writes a fixture database at `db_path`.
#[allow(dead_code)]
pub fn create_test_db(db_path: &Path) {
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent).expect("Failed to create DB dir");
    }
    let conn = Connection::open(db_path).expect("Failed to create test DB");
    conn.execute_batch(FIXTURE_SQL)
        .expect("Failed to populate test DB");
}

/// Adds a linear chain `Deep0/Deep1/.../Deep{depth}` rooted at a new item and
/// returns the leaf's cloud ID.
#[allow(dead_code)]
pub fn add_deep_chain(db_path: &Path, depth: i64) -> String {
    let conn = Connection::open(db_path).expect("Failed to open test DB");
    let base = 10_000;
    for level in 0..=depth {
        let stable_id = base + level;
        conn.execute(
            "INSERT INTO stable_ids VALUES (?1, ?2)",
            rusqlite::params![stable_id, format!("deep{}", level)],
        )
        .expect("insert stable_id");
        conn.execute(
            "INSERT INTO items VALUES (?1, ?2, 1)",
            rusqlite::params![stable_id, format!("Deep{}", level)],
        )
        .expect("insert item");
        if level > 0 {
            conn.execute(
                "INSERT INTO stable_parents VALUES (?1, ?2)",
                rusqlite::params![stable_id, stable_id - 1],
            )
            .expect("insert parent");
        }
    }
    format!("deep{}", depth)
}

/// Sandbox laid out like `~/Library`: a CloudStorage dir holding one Drive
/// mount and a DriveFS dir holding one account database.
#[allow(dead_code)]
pub struct DriveFixture {
    pub temp_dir: TempDir,
    pub cloud_storage_dir: PathBuf,
    pub mount: PathBuf,
    pub drivefs_dir: PathBuf,
    pub db_path: PathBuf,
}

#[allow(dead_code)]
impl DriveFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cloud_storage_dir = temp_dir.path().join("Library").join("CloudStorage");
        let mount = cloud_storage_dir.join(MOUNT_NAME);
        fs::create_dir_all(&mount).expect("Failed to create mount");

        let drivefs_dir = temp_dir.path().join("DriveFS");
        let db_path = drivefs_dir.join("1234567890").join("metadata_sqlite_db");
        create_test_db(&db_path);

        Self {
            temp_dir,
            cloud_storage_dir,
            mount,
            drivefs_dir,
            db_path,
        }
    }

    /// Creates `relative` under the mount, with parents. Names ending in a
    /// file extension become files, everything else a directory.
    pub fn touch(&self, relative: &str) -> PathBuf {
        touch_under(&self.mount, relative)
    }

    pub fn add_mount(&self, name: &str) -> PathBuf {
        let mount = self.cloud_storage_dir.join(name);
        fs::create_dir_all(&mount).expect("Failed to create mount");
        mount
    }

    /// Writes a `config.toml` pointing at this sandbox and returns its dir.
    pub fn write_config(&self) -> PathBuf {
        let config_dir = self.temp_dir.path().join("config");
        fs::create_dir_all(&config_dir).expect("Failed to create config dir");
        let content = format!(
            r#"[paths]
cloud_storage_dir = "{}"
drivefs_dir = "{}"
"#,
            self.cloud_storage_dir.display(),
            self.drivefs_dir.display()
        );
        fs::write(config_dir.join("config.toml"), content).expect("Failed to write config");
        config_dir
    }
}

#[allow(dead_code)]
pub fn touch_under(root: &Path, relative: &str) -> PathBuf {
    let path = root.join(relative);
    let is_file = Path::new(relative).extension().is_some();
    if is_file {
        fs::create_dir_all(path.parent().expect("relative path has a parent"))
            .expect("Failed to create parent dirs");
        fs::write(&path, "").expect("Failed to create file");
    } else {
        fs::create_dir_all(&path).expect("Failed to create dir");
    }
    path
}

/// In-memory attribute source that records every lookup.
#[allow(dead_code)]
#[derive(Default)]
pub struct MemoryReader {
    values: HashMap<PathBuf, String>,
    pub calls: Cell<usize>,
    pub seen: RefCell<Vec<PathBuf>>,
}

#[allow(dead_code)]
impl MemoryReader {
    pub fn tag(&mut self, path: &Path, id: &str) {
        self.values.insert(path.to_path_buf(), id.to_string());
    }
}

impl gdfid_finder::AttributeReader for MemoryReader {
    fn read_into(&self, path: &Path, buf: &mut [u8]) -> Option<usize> {
        self.calls.set(self.calls.get() + 1);
        self.seen.borrow_mut().push(path.to_path_buf());
        let value = self.values.get(path)?.as_bytes();
        if value.len() > buf.len() {
            return None;
        }
        buf[..value.len()].copy_from_slice(value);
        Some(value.len())
    }
}
