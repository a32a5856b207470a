mod migrations;
mod queries;
mod read_only_db;
pub mod structs;
mod writeable_db;

pub use read_only_db::ReadOnlyDb;
pub use writeable_db::WriteableDb;

use log::warn;
use rusqlite::{Connection, OpenFlags, Result};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub(crate) mod connections {
    use rusqlite::{Connection, Params, Result};

    pub trait GetConnectionImmutable {
        fn get_connection(&self) -> &Connection;

        #[inline(always)]
        fn execute<P: Params>(&self, sql: &str, params: P) -> Result<usize> {
            self.get_connection().execute(sql, params)
        }
    }

    pub trait GetConnectionMutable {
        fn get_mutable_connection(&mut self) -> &mut Connection;
    }
}

pub struct ReadOnlyConn {
    conn: Connection,
}

impl connections::GetConnectionImmutable for ReadOnlyConn {
    #[inline]
    fn get_connection(&self) -> &Connection {
        &self.conn
    }
}

impl ReadOnlyDb for ReadOnlyConn {}

pub struct WriteableConn {
    conn: Connection,
}

impl connections::GetConnectionImmutable for WriteableConn {
    #[inline]
    fn get_connection(&self) -> &Connection {
        &self.conn
    }
}

impl connections::GetConnectionMutable for WriteableConn {
    #[inline]
    fn get_mutable_connection(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

impl ReadOnlyDb for WriteableConn {}

impl WriteableDb for WriteableConn {}

const DEFAULT_DB_PATH: &str = "./board.db3";

static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Sets the database file used by every connection. Only the first call has
/// any effect, it should happen once at startup before [`migrate`].
pub fn set_path(path: impl AsRef<Path>) {
    if DB_PATH.set(path.as_ref().to_path_buf()).is_err() {
        warn!("database path already set, ignoring {:?}", path.as_ref());
    }
}

#[inline(always)]
fn db_path() -> &'static Path {
    DB_PATH.get_or_init(|| PathBuf::from(DEFAULT_DB_PATH))
}

#[inline(always)]
fn open_database(read_only: bool) -> Result<Connection> {
    if read_only {
        Connection::open_with_flags(
            db_path(),
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
    } else {
        Connection::open(db_path())
    }
}

impl ReadOnlyConn {
    #[inline(always)]
    fn new() -> Result<ReadOnlyConn> {
        Ok(ReadOnlyConn {
            conn: open_database(true)?,
        })
    }
}

impl WriteableConn {
    #[inline(always)]
    fn new() -> Result<WriteableConn> {
        Ok(WriteableConn {
            conn: open_database(false)?,
        })
    }

    /// A fresh, fully migrated database that lives only as long as the
    /// returned connection.
    pub fn in_memory() -> Result<WriteableConn> {
        let mut conn = Connection::open_in_memory()?;
        migrations::migrate(&mut conn)?;
        Ok(WriteableConn { conn })
    }
}

#[inline]
pub fn get_read_only_db() -> Result<impl ReadOnlyDb> {
    ReadOnlyConn::new()
}

#[inline]
pub fn get_writeable_db() -> Result<impl WriteableDb> {
    WriteableConn::new()
}

#[inline]
pub fn migrate() -> Result<()> {
    migrations::migrate(&mut open_database(false)?)
}

#[inline]
pub fn writable_db_call<F, T>(f: F) -> Result<T>
where
    F: FnOnce(WriteableConn) -> Result<T>,
{
    f(WriteableConn::new()?)
}

#[inline]
pub fn read_only_db_call<F, T>(f: F) -> Result<T>
where
    F: FnOnce(ReadOnlyConn) -> Result<T>,
{
    f(ReadOnlyConn::new()?)
}
