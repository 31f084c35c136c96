use buscrm::db::get_connection;

mod common;

#[test]
fn test_creates_and_removes_db_files() {
    let test_db = common::TestDb::new("test_in_memory_connection.db");
    let conn = test_db.pool().get();
    assert!(conn.is_ok());
}

#[test]
fn test_get_connection_draws_from_pool() {
    let test_db = common::TestDb::new("test_get_connection.db");
    let pool = test_db.pool();
    assert!(get_connection(&pool).is_ok());
}
