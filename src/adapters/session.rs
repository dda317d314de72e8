use crate::config::dsn::ConnectParams;
use crate::domain::model::{ObjectAttributes, TestRecord};
use crate::domain::ports::RecordCaller;
use crate::utils::error::{HarnessError, Result};
use oracle::pool::{Pool, PoolBuilder};
use oracle::sql_type::Object;
use oracle::Connection;
use std::sync::Mutex;

pub const OBJECT_TYPE_NAME: &str = "TEST_TYPE";

pub const CALL_SQL: &str = "begin test_pkg_sample.test_record_in(:rec); end;";

/// Type, package spec and package body, executed in this order.
pub const SCHEMA_DDL: [&str; 3] = [
    "create or replace type test_type force as object (
   id    number(10)
)",
    "create or replace package test_pkg_sample as
  procedure test_record_in (
    rec in out test_type
  );
end test_pkg_sample;",
    "create or replace package body test_pkg_sample as
  procedure test_record_in (
    rec in out test_type
  ) is
  begin
    rec.id := rec.id + 1;
  end test_record_in;
end test_pkg_sample;",
];

enum Backend {
    // 單一連線，所有 worker 共用
    Standalone(Mutex<Connection>),
    // 每次呼叫從 pool 取得自己的 session
    Pooled(Pool),
}

pub struct OracleSession {
    backend: Backend,
}

impl OracleSession {
    pub fn open(params: &ConnectParams) -> Result<Self> {
        let backend = if params.standalone {
            tracing::debug!("Opening standalone connection to {}", params);
            let conn = Connection::connect(
                &params.username,
                &params.password,
                &params.connect_string,
            )?;
            Backend::Standalone(Mutex::new(conn))
        } else {
            tracing::debug!(
                "Creating session pool for {} (min={}, max={}, increment={})",
                params,
                params.pool.min_sessions,
                params.pool.max_sessions,
                params.pool.session_increment
            );
            let pool = PoolBuilder::new(
                &params.username,
                &params.password,
                &params.connect_string,
            )
            .min_connections(params.pool.min_sessions)
            .max_connections(params.pool.max_sessions)
            .connection_increment(params.pool.session_increment)
            .build()?;
            Backend::Pooled(pool)
        };

        Ok(Self { backend })
    }

    pub fn is_standalone(&self) -> bool {
        matches!(self.backend, Backend::Standalone(_))
    }

    /// Creates (or replaces) the test object type and the package that increments it.
    pub fn provision_schema(&self) -> Result<()> {
        self.with_connection(|conn| {
            for ddl in SCHEMA_DDL {
                tracing::debug!("Executing DDL: {}", ddl.lines().next().unwrap_or_default());
                conn.execute(ddl, &[])?;
            }
            Ok(())
        })
    }

    fn with_connection<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        match &self.backend {
            Backend::Standalone(conn) => {
                let conn = conn.lock().map_err(|_| HarnessError::ConnectionError {
                    message: "standalone connection lock poisoned".to_string(),
                })?;
                f(&conn)
            }
            Backend::Pooled(pool) => {
                let conn = pool.get()?;
                f(&conn)
            }
        }
    }
}

impl RecordCaller for OracleSession {
    fn call_increment(&self, record: TestRecord) -> Result<TestRecord> {
        self.with_connection(|conn| call_increment_on(conn, record))
    }
}

fn call_increment_on(conn: &Connection, record: TestRecord) -> Result<TestRecord> {
    // 每次都重新查 object type 並建立新物件，這正是要觀察的路徑
    let object_type = conn.object_type(OBJECT_TYPE_NAME)?;
    let mut object = object_type.new_object()?;
    record.write_to(&mut object)?;

    let mut stmt = conn.statement(CALL_SQL).build()?;
    stmt.bind("rec", &object)?;
    stmt.execute(&[])?;

    let out: Object = stmt.bind_value("rec")?;
    TestRecord::read_from(&out)
}

impl ObjectAttributes for Object {
    fn attribute_names(&self) -> Vec<String> {
        self.object_type()
            .attributes()
            .iter()
            .map(|attr| attr.name().to_string())
            .collect()
    }

    fn set_null(&mut self, name: &str) -> Result<()> {
        self.set(name, &None::<i64>)?;
        Ok(())
    }

    fn set_i64(&mut self, name: &str, value: i64) -> Result<()> {
        self.set(name, &value)?;
        Ok(())
    }

    fn get_i64(&self, name: &str) -> Result<Option<i64>> {
        Ok(self.get::<Option<i64>>(name)?)
    }
}
