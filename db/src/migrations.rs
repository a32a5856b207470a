use super::queries;
use log::{info, trace};

use rusqlite::{Connection, Result};

macro_rules! migration {
    ( $n:literal, $( $x:literal ),* ) => {
        paste::item! {
            fn [< migration_$n >] (conn: &Connection) -> Result<()> {
                trace!("running migration {}", $n);

                $(
                    conn.execute($x, [])?;
                )*
                queries::set_version(conn, $n)?;
                trace!("finished migration {}", $n);
                Ok(())
            }
        }
    };
}

migration![
    1,
    // one row per source message that reached the board, board_message stays
    // NULL while the board post is being created
    "CREATE TABLE board (
        source INTEGER PRIMARY KEY,
        source_channel INTEGER NOT NULL,
        author INTEGER NOT NULL,
        board_message INTEGER DEFAULT NULL,
        count INTEGER NOT NULL,
        pinged BOOLEAN NOT NULL
    );",
    "CREATE UNIQUE INDEX idx_board_message ON board (board_message);",
    "CREATE TABLE suggestion (
        id INTEGER PRIMARY KEY,
        thread INTEGER,
        author INTEGER NOT NULL,
        title TEXT NOT NULL,
        answer TEXT NOT NULL DEFAULT 'Unanswered',
        count INTEGER NOT NULL DEFAULT 0,
        created_at NUMERIC NOT NULL
    );",
    "CREATE INDEX idx_suggestion_author ON suggestion (author, answer);",
    "CREATE TABLE xp (
        user INTEGER PRIMARY KEY,
        xp INTEGER NOT NULL DEFAULT 0,
        last_gain NUMERIC DEFAULT NULL
    );",
    "CREATE TABLE user_settings (
        user INTEGER PRIMARY KEY,
        board_pings BOOLEAN NOT NULL,
        level_up_pings BOOLEAN NOT NULL,
        weekly_pings BOOLEAN NOT NULL,
        autoreactions BOOLEAN NOT NULL
    );"
];

migration![
    2,
    // claims older than the board's lease may be taken over
    "ALTER TABLE board ADD COLUMN claimed_at NUMERIC DEFAULT NULL;"
];

pub fn migrate(conn: &mut Connection) -> Result<()> {
    // be sure to increment this everytime a new migration is added
    const FINAL_VER: u32 = 2;

    let ver = queries::get_version(conn)?;
    info!("database version is currently: {ver} with target ver {FINAL_VER}");
    if ver == FINAL_VER {
        return Ok(());
    }
    trace!("disabling foreign keys pre-migration");
    conn.pragma_update(None, "foreign_keys", "OFF")?;

    let tx = conn.transaction()?;

    trace!("starting migration transaction");

    if ver < 1 {
        migration_1(&tx)?;
    }
    if ver < 2 {
        migration_2(&tx)?;
    }

    trace!("commiting migration transaction");
    tx.commit()?;
    trace!("successfully commited migration transaction");

    conn.pragma_update(None, "foreign_keys", "ON")?;
    trace!("enabling foreign keys post-migration");
    info!("migration successful");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::params;
    use std::cmp::{Eq, PartialEq};
    use std::collections::HashMap;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct ColumnInfo {
        pub name: String,
        pub type_name: String,
        pub notnull: usize,
        pub default: Option<String>,
        pub pk: usize,
    }

    struct Table {
        pub rows: HashMap<String, ColumnInfo>,
    }

    impl Table {
        fn assert_row(
            &self,
            name: &str,
            type_name: &str,
            notnull: usize,
            default: Option<&str>,
            pk: usize,
        ) {
            assert_eq!(
                &ColumnInfo {
                    name: String::from(name),
                    type_name: String::from(type_name),
                    notnull,
                    default: default.map(String::from),
                    pk,
                },
                self.rows.get(name).unwrap()
            );
        }
    }

    fn get_migrated_db() -> Result<Connection> {
        let mut conn = Connection::open_in_memory()?;
        migrate(&mut conn)?;
        Ok(conn)
    }

    fn get_table_info(table_name: &str) -> Result<Table> {
        let conn = get_migrated_db()?;
        let mut stmt = conn.prepare("SELECT * FROM pragma_table_info(?1);")?;
        let rows = stmt.query_map(params![table_name], |row| {
            Ok(ColumnInfo {
                name: row.get(1)?,
                type_name: row.get(2)?,
                notnull: row.get(3)?,
                default: row.get(4)?,
                pk: row.get(5)?,
            })
        })?;

        let mut m = HashMap::new();
        for row in rows {
            let info = row?;
            m.insert(info.name.clone(), info);
        }
        Ok(Table { rows: m })
    }

    #[test]
    fn test_migrate_twice_is_noop() -> Result<()> {
        let mut conn = get_migrated_db()?;
        migrate(&mut conn)?;
        assert_eq!(queries::get_version(&conn)?, 2);
        Ok(())
    }

    #[test]
    fn test_board_table() -> Result<()> {
        let table = get_table_info("board")?;

        assert_eq!(table.rows.len(), 7);
        table.assert_row("source", "INTEGER", 0, None, 1);
        table.assert_row("source_channel", "INTEGER", 1, None, 0);
        table.assert_row("author", "INTEGER", 1, None, 0);
        table.assert_row("board_message", "INTEGER", 0, Some("NULL"), 0);
        table.assert_row("count", "INTEGER", 1, None, 0);
        table.assert_row("pinged", "BOOLEAN", 1, None, 0);
        table.assert_row("claimed_at", "NUMERIC", 0, Some("NULL"), 0);
        Ok(())
    }

    #[test]
    fn test_claims_survive_upgrade() -> Result<()> {
        let mut conn = Connection::open_in_memory()?;
        migration_1(&conn)?;
        conn.execute(
            "INSERT INTO board (source, source_channel, author, count, pinged)
            VALUES (1, 2, 3, 5, 0)",
            [],
        )?;

        migrate(&mut conn)?;
        assert_eq!(queries::get_version(&conn)?, 2);
        let entry = queries::get_board_entry(&conn, 1)?.unwrap();
        assert_eq!(entry.count, 5);
        assert_eq!(entry.claimed_at, None);
        Ok(())
    }

    #[test]
    fn test_suggestion_table() -> Result<()> {
        let table = get_table_info("suggestion")?;

        assert_eq!(table.rows.len(), 7);
        table.assert_row("id", "INTEGER", 0, None, 1);
        table.assert_row("thread", "INTEGER", 0, None, 0);
        table.assert_row("author", "INTEGER", 1, None, 0);
        table.assert_row("title", "TEXT", 1, None, 0);
        table.assert_row("answer", "TEXT", 1, Some("'Unanswered'"), 0);
        table.assert_row("count", "INTEGER", 1, Some("0"), 0);
        table.assert_row("created_at", "NUMERIC", 1, None, 0);
        Ok(())
    }

    #[test]
    fn test_xp_table() -> Result<()> {
        let table = get_table_info("xp")?;

        assert_eq!(table.rows.len(), 3);
        table.assert_row("user", "INTEGER", 0, None, 1);
        table.assert_row("xp", "INTEGER", 1, Some("0"), 0);
        table.assert_row("last_gain", "NUMERIC", 0, Some("NULL"), 0);
        Ok(())
    }

    #[test]
    fn test_user_settings_table() -> Result<()> {
        let table = get_table_info("user_settings")?;

        assert_eq!(table.rows.len(), 5);
        table.assert_row("user", "INTEGER", 0, None, 1);
        table.assert_row("board_pings", "BOOLEAN", 1, None, 0);
        table.assert_row("level_up_pings", "BOOLEAN", 1, None, 0);
        table.assert_row("weekly_pings", "BOOLEAN", 1, None, 0);
        table.assert_row("autoreactions", "BOOLEAN", 1, None, 0);
        Ok(())
    }
}
